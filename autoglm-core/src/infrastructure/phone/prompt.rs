use chrono::Local;

const SYSTEM_PROMPT: &str = r#"You operate an Android phone on behalf of the user.
Each turn you receive the current screenshot and the screen size. Reply with
your reasoning inside <think></think> and exactly one call inside <answer></answer>.

Available calls (coordinates use a 1000x1000 grid, origin top-left):
- do(action="Launch", app="<package name>")
- do(action="Tap", element=[x, y])
- do(action="Double Tap", element=[x, y])
- do(action="Long Press", element=[x, y])
- do(action="Swipe", start=[x1, y1], end=[x2, y2])
- do(action="Type", text="<text>")
- do(action="Back")
- do(action="Home")
- do(action="Wait", duration="<seconds> seconds")
- finish(message="<summary for the user>")

Call finish as soon as the task is complete or cannot be completed."#;

pub(super) fn system_prompt() -> String {
    let today = Local::now().format("%Y-%m-%d, %A");
    format!("Today is {today}.\n\n{SYSTEM_PROMPT}")
}

pub(super) fn screen_info(width: u32, height: u32) -> String {
    format!("** Screen Info **\n{{\"width\": {width}, \"height\": {height}}}")
}

pub(super) fn first_turn(task: &str, width: u32, height: u32) -> String {
    format!("{task}\n\n{}", screen_info(width, height))
}
