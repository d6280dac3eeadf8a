//! Parser for the action calls emitted by the phone model.
//!
//! The model answers with a single call, optionally wrapped in
//! `<answer>...</answer>`:
//!
//! ```text
//! do(action="Tap", element=[500, 320])
//! do(action="Type", text="coffee near me")
//! finish(message="Wi-Fi is now enabled")
//! ```
//!
//! Coordinates are relative to a 1000x1000 grid and are scaled to the real
//! screen size when converted into a [`DeviceAction`].

use crate::agent::AgentError;
use crate::device::{DeviceAction, Point};
use std::collections::HashMap;
use std::time::Duration;

const GRID: u32 = 1000;
const DEFAULT_WAIT_SECS: u64 = 1;

/// Position on the model's 1000x1000 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPoint {
    pub x: u32,
    pub y: u32,
}

impl GridPoint {
    fn to_screen(self, width: u32, height: u32) -> Point {
        let scale = |value: u32, size: u32| -> u32 {
            let scaled = u64::from(value) * u64::from(size) / u64::from(GRID);
            scaled.min(u64::from(size.saturating_sub(1))) as u32
        };
        Point {
            x: scale(self.x, width),
            y: scale(self.y, height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenAction {
    Tap(GridPoint),
    DoubleTap(GridPoint),
    LongPress(GridPoint),
    Swipe { start: GridPoint, end: GridPoint },
    Type(String),
    Back,
    Home,
    Launch(String),
    Wait(Duration),
}

impl ScreenAction {
    pub fn to_device(&self, width: u32, height: u32) -> DeviceAction {
        match self {
            ScreenAction::Tap(p) => DeviceAction::Tap(p.to_screen(width, height)),
            ScreenAction::DoubleTap(p) => DeviceAction::DoubleTap(p.to_screen(width, height)),
            ScreenAction::LongPress(p) => DeviceAction::LongPress(p.to_screen(width, height)),
            ScreenAction::Swipe { start, end } => DeviceAction::Swipe {
                start: start.to_screen(width, height),
                end: end.to_screen(width, height),
            },
            ScreenAction::Type(text) => DeviceAction::Type(text.clone()),
            ScreenAction::Back => DeviceAction::Back,
            ScreenAction::Home => DeviceAction::Home,
            ScreenAction::Launch(app) => DeviceAction::Launch(app.clone()),
            ScreenAction::Wait(duration) => DeviceAction::Wait(*duration),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentAction {
    Do(ScreenAction),
    Finish { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ArgValue {
    Text(String),
    Numbers(Vec<u32>),
    Bare(String),
}

pub fn parse_action(content: &str) -> Result<AgentAction, AgentError> {
    let body = extract_answer(content);
    let (name, args) = locate_call(body)?;
    let args = parse_arguments(args)?;

    match name {
        "finish" => Ok(AgentAction::Finish {
            message: text_arg(&args, "message").unwrap_or_default(),
        }),
        _ => parse_do(&args).map(AgentAction::Do),
    }
}

fn extract_answer(content: &str) -> &str {
    let body = match content.find("<answer>") {
        Some(start) => &content[start + "<answer>".len()..],
        None => content,
    };
    let body = match body.find("</answer>") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim()
}

fn locate_call(body: &str) -> Result<(&'static str, &str), AgentError> {
    let candidates = [("do", find_call(body, "do(")), ("finish", find_call(body, "finish("))];
    let (name, start) = candidates
        .into_iter()
        .filter_map(|(name, pos)| pos.map(|pos| (name, pos)))
        .min_by_key(|(_, pos)| *pos)
        .ok_or_else(|| AgentError::invalid_action("no do(...) or finish(...) call in response"))?;

    let open = start + name.len();
    let close = body
        .rfind(')')
        .filter(|close| *close > open)
        .ok_or_else(|| AgentError::invalid_action(format!("unterminated {name}(...) call")))?;
    Ok((name, &body[open + 1..close]))
}

/// Position of `needle` where it is not the tail of a longer identifier.
fn find_call(body: &str, needle: &str) -> Option<usize> {
    body.match_indices(needle).map(|(pos, _)| pos).find(|pos| {
        body[..*pos]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
    })
}

fn parse_arguments(input: &str) -> Result<HashMap<String, ArgValue>, AgentError> {
    let mut args = HashMap::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace() || *c == ',').is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=') {
            key.push(c);
        }
        if chars.next() != Some('=') {
            return Err(AgentError::invalid_action(format!(
                "argument '{}' has no value",
                key.trim()
            )));
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let value = match chars.peek().copied() {
            Some(quote @ ('"' | '\'')) => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some('n') => text.push('\n'),
                            Some(escaped) => text.push(escaped),
                            None => break,
                        },
                        c if c == quote => {
                            closed = true;
                            break;
                        }
                        c => text.push(c),
                    }
                }
                if !closed {
                    return Err(AgentError::invalid_action("unterminated string argument"));
                }
                ArgValue::Text(text)
            }
            Some('[') => {
                chars.next();
                let mut list = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    list.push(c);
                }
                if !closed {
                    return Err(AgentError::invalid_action("unterminated list argument"));
                }
                let numbers = list
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| {
                        item.parse::<u32>().map_err(|_| {
                            AgentError::invalid_action(format!("invalid coordinate '{item}'"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                ArgValue::Numbers(numbers)
            }
            _ => {
                let mut raw = String::new();
                while let Some(c) = chars.next_if(|c| *c != ',') {
                    raw.push(c);
                }
                ArgValue::Bare(raw.trim().to_string())
            }
        };

        args.insert(key.trim().to_string(), value);
    }

    Ok(args)
}

fn parse_do(args: &HashMap<String, ArgValue>) -> Result<ScreenAction, AgentError> {
    let action = text_arg(args, "action")
        .ok_or_else(|| AgentError::invalid_action("do(...) call without an action"))?;
    let normalized = action.trim().to_ascii_lowercase().replace(['_', '-'], " ");

    match normalized.as_str() {
        "tap" => Ok(ScreenAction::Tap(point_arg(args, "element")?)),
        "double tap" => Ok(ScreenAction::DoubleTap(point_arg(args, "element")?)),
        "long press" => Ok(ScreenAction::LongPress(point_arg(args, "element")?)),
        "swipe" => Ok(ScreenAction::Swipe {
            start: point_arg(args, "start")?,
            end: point_arg(args, "end")?,
        }),
        "type" | "type name" => text_arg(args, "text")
            .map(ScreenAction::Type)
            .ok_or_else(|| AgentError::invalid_action("Type action without text")),
        "back" => Ok(ScreenAction::Back),
        "home" => Ok(ScreenAction::Home),
        "launch" => text_arg(args, "app")
            .map(ScreenAction::Launch)
            .ok_or_else(|| AgentError::invalid_action("Launch action without app")),
        "wait" => Ok(ScreenAction::Wait(wait_duration(args))),
        _ => Err(AgentError::invalid_action(format!(
            "unsupported action '{action}'"
        ))),
    }
}

fn text_arg(args: &HashMap<String, ArgValue>, key: &str) -> Option<String> {
    match args.get(key)? {
        ArgValue::Text(text) | ArgValue::Bare(text) => Some(text.clone()),
        ArgValue::Numbers(_) => None,
    }
}

fn point_arg(args: &HashMap<String, ArgValue>, key: &str) -> Result<GridPoint, AgentError> {
    match args.get(key) {
        Some(ArgValue::Numbers(values)) => match values.as_slice() {
            [x, y] if *x <= GRID && *y <= GRID => Ok(GridPoint { x: *x, y: *y }),
            [_, _] => Err(AgentError::invalid_action(format!(
                "'{key}' is outside the {GRID}x{GRID} grid"
            ))),
            _ => Err(AgentError::invalid_action(format!(
                "'{key}' must hold exactly two coordinates"
            ))),
        },
        _ => Err(AgentError::invalid_action(format!(
            "missing coordinate argument '{key}'"
        ))),
    }
}

/// Accepts `duration="2 seconds"`, `duration="2"` or `duration=2`.
fn wait_duration(args: &HashMap<String, ArgValue>) -> Duration {
    let secs = text_arg(args, "duration")
        .and_then(|raw| {
            raw.split_whitespace()
                .next()
                .and_then(|number| number.parse::<f64>().ok())
        })
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64);
    secs.unwrap_or(Duration::from_secs(DEFAULT_WAIT_SECS))
}
