use alugueis_client::commands::transfers::{TransferDraft, TransferPatch};
use alugueis_client::commands::{self, Page};
use alugueis_client::session::Credentials;
use alugueis_client::{ClientError, ClientResult, SuccessEnvelope};
use tracing::warn;

use crate::cli::{Cli, Commands, CreateArgs, ImportCommand, TransferCommand, UpdateArgs};
use crate::prompt::{TerminalConfirm, read_password};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    let mut page = Page::open()?;
    dispatch_on(&mut page, &cli.command)
}

/// Runs one command on `page`. A 401 anywhere drops the stored session so the
/// next command starts from login.
pub fn dispatch_on(page: &mut Page, command: &Commands) -> ClientResult<SuccessEnvelope> {
    let result = run_command(page, command);
    if let Err(error) = &result {
        forget_session_if_unauthorized(page, error);
    }
    result
}

pub fn forget_session_if_unauthorized(page: &Page, error: &ClientError) {
    if !error.is_unauthorized() {
        return;
    }
    if let Err(clear_error) = page.api().session().clear() {
        warn!(error = %clear_error, "could not clear the stored session");
    }
}

fn run_command(page: &mut Page, command: &Commands) -> ClientResult<SuccessEnvelope> {
    match command {
        Commands::Login {
            email,
            password_stdin,
            ..
        } => {
            let credentials = Credentials {
                email: email.clone(),
                password: read_password(*password_stdin)?,
            };
            commands::auth::login(page, &credentials)
        }
        Commands::Logout { .. } => commands::auth::logout(page),
        Commands::Whoami { .. } => commands::auth::whoami(page),
        Commands::Users { .. } => commands::users::run(page),
        Commands::Transfer { command } => run_transfer(page, command),
        Commands::Import { command } => run_import(page, command),
        Commands::Shell => Err(ClientError::invalid_argument(
            "The shell cannot be started from inside another command.",
        )),
    }
}

pub fn run_transfer(page: &mut Page, command: &TransferCommand) -> ClientResult<SuccessEnvelope> {
    match command {
        TransferCommand::List { filters, .. } => {
            commands::transfers::list(page, filters.to_filters())
        }
        TransferCommand::Show { id, .. } => commands::transfers::show(page, *id),
        TransferCommand::Create { fields, .. } => commands::transfers::create(page, draft(fields)),
        TransferCommand::Update { fields, .. } => {
            commands::transfers::update(page, fields.id, patch(fields))
        }
        TransferCommand::Confirm { id, yes, .. } => {
            commands::transfers::confirm(page, *id, &TerminalConfirm::new(*yes))
        }
        TransferCommand::Delete { id, yes, .. } => {
            commands::transfers::delete(page, *id, &TerminalConfirm::new(*yes))
        }
        TransferCommand::Export { path, filters, .. } => {
            commands::transfers::export(page, filters.to_filters(), path)
        }
    }
}

pub fn run_import(page: &mut Page, command: &ImportCommand) -> ClientResult<SuccessEnvelope> {
    match command {
        ImportCommand::Template { kind, dir, .. } => {
            commands::import::template(page, *kind, dir.as_deref())
        }
        ImportCommand::Preview { path, .. } => commands::import::preview(page, Some(path)),
        ImportCommand::Run {
            kind,
            path,
            mes_referencia,
            yes,
            ..
        } => commands::import::run(
            page,
            Some(*kind),
            Some(path),
            *mes_referencia,
            &TerminalConfirm::new(*yes),
        ),
        ImportCommand::Check { .. } => commands::import::check(page),
    }
}

fn draft(fields: &CreateArgs) -> TransferDraft {
    TransferDraft {
        origem_id: Some(fields.origem_id),
        destino_id: Some(fields.destino_id),
        mes_referencia: fields.mes_referencia,
        valor: Some(fields.valor),
        descricao: fields.descricao.clone(),
        confirmada: fields.confirmada,
    }
}

fn patch(fields: &UpdateArgs) -> TransferPatch {
    TransferPatch {
        origem_id: fields.origem_id,
        destino_id: fields.destino_id,
        mes_referencia: fields.mes_referencia,
        valor: fields.valor,
        descricao: fields.descricao.clone(),
        confirmada: fields.confirmada,
    }
}
