use std::path::PathBuf;

use alugueis_client::import::ImportKind;
use alugueis_client::month::ReferenceMonth;
use alugueis_client::transfers::{StatusFilter, TransferFilters};
use clap::{Args, Parser, Subcommand};

pub fn parse_reference_month(value: &str) -> Result<ReferenceMonth, String> {
    value
        .parse::<ReferenceMonth>()
        .map_err(|_| "month must use YYYY-MM format, e.g. 2025-11".to_string())
}

pub fn parse_import_kind(value: &str) -> Result<ImportKind, String> {
    value.parse::<ImportKind>().map_err(|_| {
        "type must be one of: proprietarios, imoveis, alugueis, participacoes".to_string()
    })
}

pub fn parse_status(value: &str) -> Result<StatusFilter, String> {
    value
        .parse::<StatusFilter>()
        .map_err(|_| "status must be `confirmada` or `pendente`".to_string())
}

pub fn parse_amount(value: &str) -> Result<f64, String> {
    let normalized = value.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .map_err(|_| "amount must be a number, e.g. 1500.00".to_string())
}

/// Extended help shown after `alugueis import run --help`.
pub const IMPORT_RUN_AFTER_HELP: &str = "\
How import works:
  1. Download the template:   alugueis import template <type>
  2. Fill it and check it:     alugueis import preview <path>
  3. Import it:                alugueis import run <type> <path>

  Accepted files: .xlsx, .xls or .csv, at most 10MB.
  The import cannot be undone; you are asked to confirm unless --yes is given.
  `--mes` is only sent for `participacoes`.
  `run` selects <type> first, which saves its template again into the download directory.
";

#[derive(Debug, Parser)]
#[command(
    name = "alugueis",
    version,
    about = "client for the Aluguéis rental management API",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a session with email and password
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Read the password from the first line of stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// End the session and forget stored cookies
    Logout {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show the authenticated user
    Whoami {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// List users available as transfer origin and destination
    Users {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Manage transfers between owners
    #[command(arg_required_else_help = true)]
    Transfer {
        #[command(subcommand)]
        command: TransferCommand,
    },
    /// Import spreadsheets into the backend
    #[command(arg_required_else_help = true)]
    Import {
        #[command(subcommand)]
        command: ImportCommand,
    },
    /// Open an interactive page with inactivity logout
    Shell,
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Reference month (YYYY-MM)
    #[arg(long = "mes", value_parser = parse_reference_month)]
    pub mes_referencia: Option<ReferenceMonth>,
    /// Origin user id
    #[arg(long = "origem")]
    pub origem_id: Option<i64>,
    /// Destination user id
    #[arg(long = "destino")]
    pub destino_id: Option<i64>,
    /// `confirmada` or `pendente`
    #[arg(long, value_parser = parse_status)]
    pub status: Option<StatusFilter>,
}

impl FilterArgs {
    pub fn to_filters(&self) -> TransferFilters {
        TransferFilters {
            mes_referencia: self.mes_referencia,
            origem_id: self.origem_id,
            destino_id: self.destino_id,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Origin user id
    #[arg(long = "origem")]
    pub origem_id: i64,
    /// Destination user id
    #[arg(long = "destino")]
    pub destino_id: i64,
    /// Amount in reais
    #[arg(long, value_parser = parse_amount, allow_negative_numbers = true)]
    pub valor: f64,
    /// Reference month (YYYY-MM), defaults to the current month
    #[arg(long = "mes", value_parser = parse_reference_month)]
    pub mes_referencia: Option<ReferenceMonth>,
    /// Free text description
    #[arg(long)]
    pub descricao: Option<String>,
    /// Create already confirmed
    #[arg(long)]
    pub confirmada: bool,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Transfer id
    pub id: i64,
    /// New origin user id
    #[arg(long = "origem")]
    pub origem_id: Option<i64>,
    /// New destination user id
    #[arg(long = "destino")]
    pub destino_id: Option<i64>,
    /// New amount in reais
    #[arg(long, value_parser = parse_amount, allow_negative_numbers = true)]
    pub valor: Option<f64>,
    /// New reference month (YYYY-MM)
    #[arg(long = "mes", value_parser = parse_reference_month)]
    pub mes_referencia: Option<ReferenceMonth>,
    /// New description
    #[arg(long)]
    pub descricao: Option<String>,
    /// Set the confirmed flag
    #[arg(long)]
    pub confirmada: Option<bool>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TransferCommand {
    /// List transfers with statistics
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show one transfer
    Show {
        /// Transfer id
        id: i64,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Create a transfer
    Create {
        #[command(flatten)]
        fields: CreateArgs,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Change fields of a transfer
    Update {
        #[command(flatten)]
        fields: UpdateArgs,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Confirm a pending transfer (cannot be undone)
    Confirm {
        /// Transfer id
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Delete a transfer (cannot be undone)
    Delete {
        /// Transfer id
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Write the filtered transfer list to a CSV file
    Export {
        /// Target CSV path
        path: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ImportCommand {
    /// Download the spreadsheet template for a type
    Template {
        /// proprietarios, imoveis, alugueis or participacoes
        #[arg(value_parser = parse_import_kind)]
        kind: ImportKind,
        /// Directory to save into, defaults to the configured download directory
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Validate a file locally and show the server's preview
    Preview {
        /// Path to a .xlsx, .xls or .csv file
        path: PathBuf,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Import a file after confirmation
    #[command(after_long_help = IMPORT_RUN_AFTER_HELP)]
    Run {
        /// proprietarios, imoveis, alugueis or participacoes
        #[arg(value_parser = parse_import_kind)]
        kind: ImportKind,
        /// Path to a .xlsx, .xls or .csv file
        path: PathBuf,
        /// Reference month for participacoes (YYYY-MM)
        #[arg(long = "mes", value_parser = parse_reference_month)]
        mes_referencia: Option<ReferenceMonth>,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Check whether the server can read spreadsheets
    Check {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
