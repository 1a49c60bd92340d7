use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use alugueis_client::commands::{self, Page};
use alugueis_client::import::ImportKind;
use alugueis_client::import::wizard::check_dependencies;
use alugueis_client::month::ReferenceMonth;
use alugueis_client::session::{
    ActivityEvent, ActivitySink, GuardAction, LoadDecision, NavigationKind, PageLoad,
    SessionGuard, SharedGuard,
};
use alugueis_client::transfers::TransferFilters;
use alugueis_client::ui::Notification;
use alugueis_client::{ClientError, ClientResult, SuccessEnvelope};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use crate::cli::{CreateArgs, FilterArgs, UpdateArgs, parse_import_kind, parse_reference_month};
use crate::dispatch::{forget_session_if_unauthorized, run_import, run_transfer};
use crate::output::{self, OutputMode};
use crate::prompt::{LineSource, TerminalConfirm};

const TRANSFERS_PAGE: &str = "/transferencias";
const IMPORT_PAGE: &str = "/importacao";
const POLL_INTERVAL: Duration = Duration::from_secs(1);
const PROMPT: &str = "alugueis> ";

#[derive(Debug, Parser)]
#[command(name = "alugueis", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    /// Filter and reload the transfer list
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Clear the filters and reload
    Clear,
    /// Reload the list with the current filters
    Refresh,
    /// Show one transfer
    Show { id: i64 },
    /// Create a transfer
    Create {
        #[command(flatten)]
        fields: CreateArgs,
    },
    /// Change fields of a transfer
    Update {
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Confirm a pending transfer
    Confirm {
        id: i64,
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Delete a transfer
    Delete {
        id: i64,
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Write the filtered list to a CSV file
    Export {
        path: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List users
    Users,
    /// Choose the import type and download its template
    Template {
        #[arg(value_parser = parse_import_kind)]
        kind: ImportKind,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Select the file to import
    File { path: PathBuf },
    /// Preview the selected file, or `path`
    Preview { path: Option<PathBuf> },
    /// Import the selected file after confirmation
    Import {
        #[arg(long, value_parser = parse_import_kind)]
        kind: Option<ImportKind>,
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long = "mes", value_parser = parse_reference_month)]
        mes_referencia: Option<ReferenceMonth>,
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Check the server's import dependencies
    Check,
    /// Show the authenticated user
    Whoami,
    /// Reload the page; this ends the session
    Reload,
    /// End the session
    Logout,
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

impl ShellCommand {
    fn page_path(&self) -> Option<&'static str> {
        match self {
            Self::List { .. }
            | Self::Clear
            | Self::Refresh
            | Self::Show { .. }
            | Self::Create { .. }
            | Self::Update { .. }
            | Self::Confirm { .. }
            | Self::Delete { .. }
            | Self::Export { .. } => Some(TRANSFERS_PAGE),
            Self::Template { .. }
            | Self::File { .. }
            | Self::Preview { .. }
            | Self::Import { .. }
            | Self::Check => Some(IMPORT_PAGE),
            Self::Users | Self::Whoami | Self::Reload | Self::Logout | Self::Exit => None,
        }
    }
}

#[derive(Debug)]
pub enum LineOutcome {
    Output(SuccessEnvelope),
    Help(String),
    Nothing,
    Exit(Option<SuccessEnvelope>),
}

/// An open page plus its inactivity guard.
pub struct Shell {
    page: Page,
    guard: SharedGuard,
    input: LineSource,
    path: &'static str,
    ended: Arc<AtomicBool>,
}

impl Shell {
    pub fn new(page: Page, guard: SharedGuard) -> Self {
        let page = page.with_activity(Arc::new(guard.clone()));
        Self {
            page,
            guard,
            input: LineSource::Stdin,
            path: TRANSFERS_PAGE,
            ended: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reads command lines and confirmation answers from `input`.
    pub fn with_input(mut self, input: LineSource) -> Self {
        self.input = input;
        self
    }

    pub fn ended(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.ended)
    }

    pub fn guard(&self) -> &SharedGuard {
        &self.guard
    }

    /// Loads the transfer page, arming the guard.
    pub fn open(&mut self) -> ClientResult<SuccessEnvelope> {
        self.navigate(NavigationKind::Navigate, TRANSFERS_PAGE)?;
        self.guarded(|page| commands::transfers::list(page, TransferFilters::default()))
    }

    pub fn execute_line(&mut self, line: &str) -> ClientResult<LineOutcome> {
        if self.ended.load(Ordering::Relaxed) {
            return Ok(LineOutcome::Exit(None));
        }
        self.guard.record(ActivityEvent::KeyPress);

        let Some(words) = shlex::split(line) else {
            return Err(ClientError::invalid_argument("Unbalanced quotes in command line."));
        };
        if words.is_empty() {
            return Ok(LineOutcome::Nothing);
        }

        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(error)
                if matches!(
                    error.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                return Ok(LineOutcome::Help(error.to_string()));
            }
            Err(error) => {
                return Err(ClientError::invalid_argument_with_recovery(
                    &first_line(&error.to_string()),
                    vec!["Type `help` for the available commands.".to_string()],
                ));
            }
        };

        let command = parsed.command;
        if let Some(path) = command.page_path()
            && path != self.path
        {
            self.navigate(NavigationKind::Navigate, path)?;
        }

        match command {
            ShellCommand::Exit => Ok(LineOutcome::Exit(None)),
            ShellCommand::Reload => self.reload(),
            ShellCommand::Logout => {
                self.ended.store(true, Ordering::Relaxed);
                Ok(LineOutcome::Exit(Some(commands::auth::logout(&self.page)?)))
            }
            other => {
                let input = self.input.clone();
                self.guarded(|page| run_shell_command(page, other, &input))
                    .map(LineOutcome::Output)
            }
        }
    }

    fn reload(&mut self) -> ClientResult<LineOutcome> {
        match self.navigate(NavigationKind::Reload, self.path)? {
            Some(logged_out) => Ok(LineOutcome::Exit(Some(logged_out))),
            None => Ok(LineOutcome::Nothing),
        }
    }

    fn navigate(
        &mut self,
        navigation: NavigationKind,
        path: &'static str,
    ) -> ClientResult<Option<SuccessEnvelope>> {
        self.path = path;
        match self.guard.on_page_load(&PageLoad::new(navigation, path)) {
            LoadDecision::Continue => {
                if path == IMPORT_PAGE {
                    self.announce_missing_dependencies()?;
                }
                Ok(None)
            }
            LoadDecision::ForceLogout => {
                self.ended.store(true, Ordering::Relaxed);
                commands::auth::logout(&self.page).map(Some)
            }
        }
    }

    /// The import page checks the server's spreadsheet support when it loads.
    /// Only a lost session is an error here.
    fn announce_missing_dependencies(&mut self) -> ClientResult<()> {
        match check_dependencies(self.page.api()) {
            Ok((_, Some(notification))) => {
                if let Err(error) = output::print_notice(&notification) {
                    warn!(%error, "could not write dependency warning");
                }
                Ok(())
            }
            Ok((_, None)) => Ok(()),
            Err(error) if error.is_unauthorized() => {
                forget_session_if_unauthorized(&self.page, &error);
                self.ended.store(true, Ordering::Relaxed);
                Err(error)
            }
            Err(error) => {
                debug!(%error, "dependency check on page load failed");
                Ok(())
            }
        }
    }

    fn guarded<F>(&mut self, run: F) -> ClientResult<SuccessEnvelope>
    where
        F: FnOnce(&mut Page) -> ClientResult<SuccessEnvelope>,
    {
        let result = run(&mut self.page);
        if let Err(error) = &result
            && error.is_unauthorized()
        {
            forget_session_if_unauthorized(&self.page, error);
            self.ended.store(true, Ordering::Relaxed);
        }
        result
    }
}

fn run_shell_command(
    page: &mut Page,
    command: ShellCommand,
    input: &LineSource,
) -> ClientResult<SuccessEnvelope> {
    use crate::cli::{ImportCommand, TransferCommand};

    let prompt = |yes: bool| TerminalConfirm::with_input(yes, input.clone());

    match command {
        ShellCommand::List { filters } => commands::transfers::filter(page, filters.to_filters()),
        ShellCommand::Clear => commands::transfers::clear_filters(page),
        ShellCommand::Refresh => commands::transfers::refresh(page),
        ShellCommand::Show { id } => commands::transfers::show(page, id),
        ShellCommand::Create { fields } => {
            run_transfer(page, &TransferCommand::Create { fields, json: false })
        }
        ShellCommand::Update { fields } => {
            run_transfer(page, &TransferCommand::Update { fields, json: false })
        }
        ShellCommand::Confirm { id, yes } => {
            commands::transfers::confirm(page, id, &prompt(yes))
        }
        ShellCommand::Delete { id, yes } => {
            commands::transfers::delete(page, id, &prompt(yes))
        }
        ShellCommand::Export { path, filters } => run_transfer(
            page,
            &TransferCommand::Export {
                path,
                filters,
                json: false,
            },
        ),
        ShellCommand::Users => commands::users::run(page),
        ShellCommand::Template { kind, dir } => run_import(
            page,
            &ImportCommand::Template {
                kind,
                dir,
                json: false,
            },
        ),
        ShellCommand::File { path } => commands::import::select_file(page, &path),
        ShellCommand::Preview { path } => commands::import::preview(page, path.as_deref()),
        ShellCommand::Import {
            kind,
            path,
            mes_referencia,
            yes,
        } => commands::import::run(
            page,
            kind,
            path.as_deref(),
            mes_referencia,
            &prompt(yes),
        ),
        ShellCommand::Check => commands::import::check(page),
        ShellCommand::Whoami => commands::auth::whoami(page),
        ShellCommand::Reload | ShellCommand::Logout | ShellCommand::Exit => Err(
            ClientError::invalid_argument("This command is handled by the shell itself."),
        ),
    }
}

/// Polls the guard until the session ends. The expiry warning goes to
/// `notify`; once the grace period passes `logout` runs and `ended` is set.
pub fn spawn_watcher<N, L>(
    guard: SharedGuard,
    ended: Arc<AtomicBool>,
    interval: Duration,
    notify: N,
    logout: L,
) -> JoinHandle<()>
where
    N: Fn(&Notification) + Send + 'static,
    L: FnOnce() + Send + 'static,
{
    thread::spawn(move || {
        while !ended.load(Ordering::Relaxed) {
            thread::sleep(interval);
            match guard.poll() {
                Some(GuardAction::Notify(notification)) => notify(&notification),
                Some(GuardAction::PerformLogout) => {
                    ended.store(true, Ordering::Relaxed);
                    logout();
                    return;
                }
                None => {}
            }
        }
        debug!("inactivity watcher stopped");
    })
}

/// Runs the interactive shell until `exit`, logout or session expiry.
pub fn run() -> ClientResult<()> {
    let page = Page::open()?;
    if !page.api().session().is_authenticated() {
        return Err(ClientError::unauthorized(None));
    }
    let config = page.config().clone();
    let guard = SharedGuard::new(SessionGuard::new(
        config.inactivity_timeout,
        config.logout_grace,
    ));
    let mut shell = Shell::new(page, guard);

    let opened = shell.open();
    report(&opened);
    opened?;
    info!(
        timeout_secs = config.inactivity_timeout.as_secs(),
        "shell opened"
    );

    let watcher = spawn_watcher(
        shell.guard().clone(),
        shell.ended(),
        POLL_INTERVAL,
        |notification| {
            let _ = output::print_notice(notification);
        },
        || {
            let logged_out = Page::open().and_then(|page| commands::auth::logout(&page));
            report(&logged_out);
            let _ = output::print_notice(&Notification::info("Pressione Enter para sair."));
        },
    );

    let result = read_loop(&mut shell);
    shell.ended().store(true, Ordering::Relaxed);
    if watcher.join().is_err() {
        warn!("inactivity watcher panicked");
    }
    result
}

fn read_loop(shell: &mut Shell) -> ClientResult<()> {
    let input = shell.input.clone();
    loop {
        if shell.ended().load(Ordering::Relaxed) {
            return Ok(());
        }
        print!("{PROMPT}");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => return Ok(()),
            Ok(_) => {}
            Err(error) => {
                return Err(ClientError::invalid_argument(&format!(
                    "Could not read input: {error}"
                )));
            }
        }

        match shell.execute_line(&line) {
            Ok(LineOutcome::Output(success)) => report(&Ok(success)),
            Ok(LineOutcome::Help(text)) => {
                let _ = crate::stdout_io::write_stdout_text(&text);
            }
            Ok(LineOutcome::Nothing) => {}
            Ok(LineOutcome::Exit(success)) => {
                if let Some(success) = success {
                    report(&Ok(success));
                }
                return Ok(());
            }
            Err(error) if error.is_unauthorized() => return Err(error),
            Err(error) => report(&Err(error)),
        }
    }
}

fn report(result: &ClientResult<SuccessEnvelope>) {
    let printed = match result {
        Ok(success) => output::print_success(success, OutputMode::Text),
        Err(error) => output::print_failure(error, OutputMode::Text),
    };
    if let Err(error) = printed {
        warn!(%error, "could not write shell output");
    }
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or(message).trim().to_string()
}
