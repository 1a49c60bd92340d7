mod cli;
mod dispatch;
mod output;
mod prompt;
mod shell;
mod stdout_io;

use std::io;
use std::process::ExitCode;

use alugueis_client::ClientError;
use clap::{Parser, error::ErrorKind};
use stdout_io::write_stdout_text;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ALUGUEIS_LOG";

const ROOT_HELP: &str = "Aluguéis - rental management client

Usage:
  alugueis <command>

Start here:
  alugueis login --email <email>
  alugueis transfer list
  alugueis import template --help
";

const TOP_LEVEL_HELP: &str = "Aluguéis - rental management client

USAGE: alugueis <command>

Session:
  alugueis login --email <email>                 Start a session (add --password-stdin for scripts)
  alugueis whoami                                Show the authenticated user
  alugueis logout                                End the session
  alugueis shell                                 Interactive page, logs out after inactivity

Transfers between owners:
  alugueis transfer list [--mes 2025-11] [--status pendente]
  alugueis transfer create --origem <id> --destino <id> --valor 1500,00
  alugueis transfer confirm <id>                 Cannot be undone
  alugueis transfer delete <id>                  Cannot be undone
  alugueis transfer export <path.csv>            Save the filtered list as CSV

Import spreadsheets:
  1. alugueis import template <type>             proprietarios, imoveis, alugueis, participacoes
  2. alugueis import preview <path>              Check the file before importing
  3. alugueis import run <type> <path>           Import after confirmation

Every command accepts --json for machine-readable output.
Set ALUGUEIS_API_URL to point at another backend, ALUGUEIS_LOG=debug for logs.
";

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

/// Logs go to stderr so stdout stays parseable with `--json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return report_parse_error(&err, &raw_args),
    };

    if matches!(cli.command, cli::Commands::Shell) {
        return finish(shell::run().map(|()| None), output::OutputMode::Text);
    }

    let mode = output::mode_for_command(&cli.command);
    finish(dispatch::dispatch(&cli).map(Some), mode)
}

fn finish(
    result: Result<Option<alugueis_client::SuccessEnvelope>, ClientError>,
    mode: output::OutputMode,
) -> Result<ExitCode, ExitCode> {
    match result {
        Ok(success) => {
            if let Some(success) = success
                && output::print_success(&success, mode).is_err()
            {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn report_parse_error(err: &clap::Error, raw_args: &[String]) -> Result<ExitCode, ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let text = if is_top_level_help_request(raw_args) {
                TOP_LEVEL_HELP.to_string()
            } else {
                err.to_string()
            };
            if write_stdout_text(&text).is_err() {
                return Err(ExitCode::from(2));
            }
            return Ok(ExitCode::SUCCESS);
        }
        ErrorKind::DisplayVersion => {
            if write_stdout_text(&err.to_string()).is_err() {
                return Err(ExitCode::from(2));
            }
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let command_hint = if matches!(
        err.kind(),
        ErrorKind::MissingRequiredArgument
            | ErrorKind::InvalidValue
            | ErrorKind::ValueValidation
            | ErrorKind::WrongNumberOfValues
            | ErrorKind::UnknownArgument
            | ErrorKind::InvalidSubcommand
    ) {
        command_path_from_args(raw_args)
    } else {
        None
    };
    let parse_error = ClientError::invalid_argument_for_command(
        &strip_clap_boilerplate(&err.to_string()),
        command_hint.as_deref(),
    );
    if output::print_failure(&parse_error, infer_requested_output_mode(raw_args)).is_err() {
        return Err(ExitCode::from(2));
    }
    Err(ExitCode::from(1))
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's trailing usage and "For more information" lines.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_start_matches("error: ").trim_end().to_string()
}

/// The subcommand path for `--help` hints, e.g. `transfer create`.
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let words = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect::<Vec<&str>>();

    match words.as_slice() {
        [group @ ("transfer" | "import"), sub, ..] if is_known_subcommand(group, sub) => {
            Some(format!("{group} {sub}"))
        }
        [group @ ("transfer" | "import"), ..] => Some((*group).to_string()),
        [single @ ("login" | "logout" | "whoami" | "users" | "shell"), ..] => {
            Some((*single).to_string())
        }
        _ => None,
    }
}

fn is_known_subcommand(group: &str, sub: &str) -> bool {
    match group {
        "transfer" => matches!(
            sub,
            "list" | "show" | "create" | "update" | "confirm" | "delete" | "export"
        ),
        "import" => matches!(sub, "template" | "preview" | "run" | "check"),
        _ => false,
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.is_internal() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}
