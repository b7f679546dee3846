mod error_text;
mod format;
mod json;
mod mode;
mod plan_text;
mod preview_text;

use std::io;

use paydrip_client::{ClientError, SuccessEnvelope};

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    println!("{body}");
    Ok(())
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    println!("{body}");
    Ok(())
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "plan create" => plan_text::render_plan_create(&success.data),
        "plan list" => plan_text::render_plan_list(&success.data),
        "plan show" => plan_text::render_plan_show(&success.data),
        "plan activate" | "plan pause" | "plan resume" | "plan cancel" => {
            plan_text::render_transition(&success.data)
        }
        "plan disburse" => plan_text::render_disburse(&success.data),
        "preview" => preview_text::render_preview(&success.data),
        "options" => preview_text::render_options(&success.data),
        "expiring" => preview_text::render_expiring(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
