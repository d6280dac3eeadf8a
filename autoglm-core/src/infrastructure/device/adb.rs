use super::{DeviceAction, DeviceBridge, DeviceError, Point, Screenshot};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const LONG_PRESS_MS: u32 = 3000;
const SWIPE_MS: u32 = 500;
const KEYCODE_HOME: u32 = 3;
const KEYCODE_BACK: u32 = 4;

/// Drives an Android device through the `adb` command-line tool.
#[derive(Debug, Clone)]
pub struct AdbDevice {
    adb_path: PathBuf,
    device_id: Option<String>,
}

impl AdbDevice {
    pub fn new(adb_path: impl Into<PathBuf>, device_id: Option<String>) -> Self {
        Self {
            adb_path: adb_path.into(),
            device_id,
        }
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    async fn adb(&self, args: &[String]) -> Result<Vec<u8>, DeviceError> {
        let mut command = Command::new(&self.adb_path);
        if let Some(device_id) = &self.device_id {
            command.arg("-s").arg(device_id);
        }
        command.args(args).kill_on_drop(true);

        let rendered = args.join(" ");
        debug!(device = self.device_id.as_deref(), command = %rendered, "Running adb");

        let output = command.output().await.map_err(|source| DeviceError::Spawn {
            program: self.adb_path.display().to_string(),
            source,
        })?;
        if !output.status.success() {
            return Err(DeviceError::CommandFailed {
                command: rendered,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    async fn shell(&self, args: &[String]) -> Result<(), DeviceError> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push("shell".to_string());
        full.extend_from_slice(args);
        self.adb(&full).await.map(|_| ())
    }
}

#[async_trait]
impl DeviceBridge for AdbDevice {
    async fn screenshot(&self) -> Result<Screenshot, DeviceError> {
        let png = self
            .adb(&["exec-out".into(), "screencap".into(), "-p".into()])
            .await?;
        let (width, height) = png_dimensions(&png)?;
        Ok(Screenshot {
            png_base64: STANDARD.encode(&png),
            width,
            height,
        })
    }

    async fn perform(&self, action: &DeviceAction) -> Result<(), DeviceError> {
        match action {
            DeviceAction::Tap(point) => self.shell(&tap_args(*point)).await,
            DeviceAction::DoubleTap(point) => {
                self.shell(&tap_args(*point)).await?;
                self.shell(&tap_args(*point)).await
            }
            DeviceAction::LongPress(point) => {
                self.shell(&swipe_args(*point, *point, LONG_PRESS_MS)).await
            }
            DeviceAction::Swipe { start, end } => {
                self.shell(&swipe_args(*start, *end, SWIPE_MS)).await
            }
            DeviceAction::Type(text) => {
                self.shell(&[
                    "input".into(),
                    "text".into(),
                    escape_input_text(text),
                ])
                .await
            }
            DeviceAction::Back => self.shell(&keyevent_args(KEYCODE_BACK)).await,
            DeviceAction::Home => self.shell(&keyevent_args(KEYCODE_HOME)).await,
            DeviceAction::Launch(package) => {
                self.shell(&[
                    "monkey".into(),
                    "-p".into(),
                    package.clone(),
                    "-c".into(),
                    "android.intent.category.LAUNCHER".into(),
                    "1".into(),
                ])
                .await
            }
            DeviceAction::Wait(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(())
            }
        }
    }
}

fn tap_args(point: Point) -> Vec<String> {
    vec![
        "input".into(),
        "tap".into(),
        point.x.to_string(),
        point.y.to_string(),
    ]
}

fn swipe_args(start: Point, end: Point, duration_ms: u32) -> Vec<String> {
    vec![
        "input".into(),
        "swipe".into(),
        start.x.to_string(),
        start.y.to_string(),
        end.x.to_string(),
        end.y.to_string(),
        duration_ms.to_string(),
    ]
}

fn keyevent_args(code: u32) -> Vec<String> {
    vec!["input".into(), "keyevent".into(), code.to_string()]
}

/// `input text` runs through the device shell: spaces become `%s` and the
/// whole argument is single-quoted.
fn escape_input_text(text: &str) -> String {
    let spaced = text.replace(' ', "%s").replace('\'', r"'\''");
    format!("'{spaced}'")
}

/// Width and height from the IHDR chunk of a PNG.
fn png_dimensions(png: &[u8]) -> Result<(u32, u32), DeviceError> {
    if png.len() < 24 || !png.starts_with(PNG_SIGNATURE) {
        return Err(DeviceError::InvalidScreenshot(
            "device did not return a PNG image".into(),
        ));
    }
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    if width == 0 || height == 0 {
        return Err(DeviceError::InvalidScreenshot(format!(
            "empty screen size {width}x{height}"
        )));
    }
    Ok((width, height))
}
