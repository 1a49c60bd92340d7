use std::io::{self, BufRead, IsTerminal};
use std::sync::{Arc, Mutex, PoisonError};

use alugueis_client::ClientError;
use alugueis_client::ui::Confirm;
use tracing::debug;

/// Where command lines and typed answers come from.
///
/// `Stdin` takes the stdin lock for one line at a time, so a confirmation
/// asked in the middle of a shell command can read the next line.
#[derive(Clone)]
pub enum LineSource {
    Stdin,
    Scripted(Arc<Mutex<Box<dyn BufRead + Send>>>),
}

impl LineSource {
    pub fn scripted(reader: impl BufRead + Send + 'static) -> Self {
        Self::Scripted(Arc::new(Mutex::new(Box::new(reader))))
    }

    pub fn read_line(&self, buf: &mut String) -> io::Result<usize> {
        match self {
            Self::Stdin => io::stdin().lock().read_line(buf),
            Self::Scripted(reader) => reader
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .read_line(buf),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stdin) && io::stdin().is_terminal()
    }
}

/// Answers confirmation prompts on the terminal, or from one input line.
///
/// `assume_yes` comes from `--yes` and skips the question entirely.
#[derive(Clone)]
pub struct TerminalConfirm {
    assume_yes: bool,
    input: LineSource,
}

impl TerminalConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self::with_input(assume_yes, LineSource::Stdin)
    }

    pub fn with_input(assume_yes: bool, input: LineSource) -> Self {
        Self { assume_yes, input }
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        if self.input.is_terminal() {
            return dialoguer::Confirm::new()
                .with_prompt(message)
                .default(false)
                .interact()
                .unwrap_or(false);
        }

        eprintln!("{message} [s/N]");
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(_) => is_affirmative(&line),
            Err(error) => {
                debug!(%error, "could not read confirmation");
                false
            }
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    )
}

/// Reads the password from the first stdin line, or asks without echo.
pub fn read_password(from_stdin: bool) -> Result<String, ClientError> {
    if from_stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|error| password_error(&format!("Could not read stdin: {error}")))?;
        return non_empty(line.trim_end_matches(['\r', '\n']));
    }

    if !io::stdin().is_terminal() {
        return Err(password_error("No terminal available to ask for the password."));
    }
    let password = dialoguer::Password::new()
        .with_prompt("Senha")
        .interact()
        .map_err(|error| password_error(&format!("Could not read password: {error}")))?;
    non_empty(&password)
}

fn non_empty(password: &str) -> Result<String, ClientError> {
    if password.is_empty() {
        return Err(password_error("Password is empty."));
    }
    Ok(password.to_string())
}

fn password_error(message: &str) -> ClientError {
    ClientError::invalid_argument_with_recovery(
        message,
        vec![
            "Run `alugueis login --email <email>` in a terminal.".to_string(),
            "Or pipe it: `printf '%s\\n' \"$SENHA\" | alugueis login --email <email> --password-stdin`."
                .to_string(),
        ],
    )
}
