mod error_text;
mod format;
mod import_text;
mod json;
mod mode;
mod session_text;
mod transfers_text;

use std::io;

use alugueis_client::ui::Notification;
use alugueis_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::{write_stderr_line, write_stdout_line};

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    write_stdout_line(&render_success(success, mode)?)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    write_stdout_line(&render_failure(error, mode)?)
}

/// Out-of-band notices, such as the inactivity warning, go to stderr.
pub fn print_notice(notification: &Notification) -> io::Result<()> {
    write_stderr_line(&format::notification_line(notification))
}

pub fn render_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<String> {
    match mode {
        OutputMode::Text => render_text_success(success),
        OutputMode::Json => json::render_success_json(success),
    }
}

pub fn render_failure(error: &ClientError, mode: OutputMode) -> io::Result<String> {
    match mode {
        OutputMode::Json => json::render_error_json(error),
        OutputMode::Text => Ok(error_text::render_error(error)),
    }
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    let data = &success.data;
    match success.command.as_str() {
        "login" | "logout" | "whoami" => session_text::render_session(data),
        "users" => session_text::render_users(data),
        "transfer list" => transfers_text::render_transfer_list(data),
        "transfer show" => transfers_text::render_transfer_detail(data),
        "transfer create" | "transfer update" | "transfer confirm" | "transfer delete" => {
            transfers_text::render_transfer_mutation(data)
        }
        "transfer export" => transfers_text::render_transfer_export(data),
        "import template" => import_text::render_template(data),
        "import file" => import_text::render_file_selection(data),
        "import preview" => import_text::render_preview(data),
        "import run" => import_text::render_run(data),
        "import check" => import_text::render_check(data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
