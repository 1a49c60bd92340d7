use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::ui::Redirect;

pub(crate) const LOGIN_COMMAND: &str = "alugueis login --email <email>";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Where the host must navigate after this error, if anywhere.
    pub fn redirect(&self) -> Option<Redirect> {
        if self.is_unauthorized() {
            return Some(Redirect::Login);
        }
        None
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code == "unauthorized"
    }

    pub fn is_internal(&self) -> bool {
        self.code.starts_with("internal_")
            || matches!(self.code.as_str(), "config_error" | "session_store_error")
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `alugueis {cmd} --help` for usage."),
            None => "Run `alugueis --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn validation(message: &str) -> Self {
        Self::new("validation_failed", message, Vec::new())
    }

    pub fn file_too_large(file_name: &str, size: u64, limit: u64) -> Self {
        Self::new(
            "validation_failed",
            "Arquivo muito grande. Máximo: 10MB",
            vec!["Split the spreadsheet or remove unused sheets, then retry.".to_string()],
        )
        .with_data(json!({
            "file_name": file_name,
            "size": size,
            "limit": limit,
        }))
    }

    pub fn unsupported_extension(file_name: &str, allowed: &[&str]) -> Self {
        Self::new(
            "validation_failed",
            "Formato inválido. Use .xlsx, .xls ou .csv",
            vec!["Save the spreadsheet as .xlsx, .xls or .csv and retry.".to_string()],
        )
        .with_data(json!({
            "file_name": file_name,
            "allowed_extensions": allowed,
        }))
    }

    pub fn no_file_selected() -> Self {
        Self::new(
            "validation_failed",
            "Nenhum arquivo selecionado",
            vec!["Select a .xlsx, .xls or .csv file first.".to_string()],
        )
    }

    pub fn import_selection_incomplete() -> Self {
        Self::new(
            "validation_failed",
            "Selecione um arquivo e tipo de importação",
            vec!["Pick an import type and a file, then retry.".to_string()],
        )
    }

    pub fn same_source_and_destination() -> Self {
        Self::validation("Origem e destino não podem ser iguais")
    }

    pub fn non_positive_amount() -> Self {
        Self::validation("Valor deve ser maior que zero")
    }

    pub fn invalid_reference_month(value: &str) -> Self {
        Self::new(
            "validation_failed",
            &format!("Mês de referência inválido: `{value}`."),
            vec!["Use the YYYY-MM format, e.g. 2025-11.".to_string()],
        )
    }

    pub fn transfer_not_found(id: i64) -> Self {
        Self::new(
            "not_found",
            "Transferência não encontrada",
            vec!["Reload the transfer list and pick an existing id.".to_string()],
        )
        .with_data(json!({ "id": id }))
    }

    pub fn unknown_import_kind(value: &str) -> Self {
        Self::invalid_argument_with_recovery(
            &format!("Unknown import type `{value}`."),
            vec!["Use one of: proprietarios, imoveis, alugueis, participacoes.".to_string()],
        )
    }

    pub fn unauthorized(detail: Option<&str>) -> Self {
        Self::new(
            "unauthorized",
            detail.unwrap_or("Não autenticado"),
            vec![format!("Run `{LOGIN_COMMAND}` to start a new session.")],
        )
        .with_data(json!({ "status": 401 }))
    }

    pub fn http_status(status: u16, detail: Option<String>) -> Self {
        let message = detail.unwrap_or_else(|| format!("HTTP error! status: {status}"));
        Self::new("http_error", &message, Vec::new()).with_data(json!({ "status": status }))
    }

    pub fn network(detail: &str) -> Self {
        Self::new(
            "network_error",
            &format!("Could not reach the Aluguéis API: {detail}"),
            vec![
                "Check that the API is running and `ALUGUEIS_API_URL` points at it.".to_string(),
            ],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn internal_decode(endpoint: &str, detail: &str) -> Self {
        Self::new(
            "internal_decode_error",
            &format!("Unexpected response from `{endpoint}`: {detail}"),
            Vec::new(),
        )
    }

    pub fn config_error(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "config_error",
            &format!("Cannot load client configuration at `{location}`: {detail}"),
            vec![format!(
                "Fix or remove `{location}`, or set `ALUGUEIS_HOME` to another directory."
            )],
        )
    }

    pub fn session_store(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "session_store_error",
            &format!("Cannot access session store at `{location}`: {detail}"),
            vec![format!("Grant write access to `{location}` or remove it.")],
        )
    }

    pub fn file_unreadable(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::invalid_argument_with_recovery(
            &format!("Could not read `{location}`: {detail}"),
            vec!["Verify the path exists and is readable.".to_string()],
        )
    }

    pub fn file_unwritable(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::invalid_argument_with_recovery(
            &format!("Could not write `{location}`: {detail}"),
            vec!["Choose a writable directory with `--dir`.".to_string()],
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
