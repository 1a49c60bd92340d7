use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::import::{ImportSummary, PreviewTable};
use crate::transfers::{TransferFilters, TransferRow};
use crate::ui::Notification;

fn not_available() -> String {
    "N/A".to_string()
}

fn null_as_not_available<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(not_available))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    pub nome: String,
}

/// The users endpoint has answered both wrapped and bare lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum UsersResponse {
    Wrapped {
        #[serde(default)]
        usuarios: Vec<UserRef>,
    },
    Bare(Vec<UserRef>),
}

impl UsersResponse {
    pub(crate) fn into_users(self) -> Vec<UserRef> {
        match self {
            Self::Wrapped { usuarios } => usuarios,
            Self::Bare(users) => users,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: i64,
    pub origem_id: i64,
    #[serde(default = "not_available", deserialize_with = "null_as_not_available")]
    pub origem_nome: String,
    pub destino_id: i64,
    #[serde(default = "not_available", deserialize_with = "null_as_not_available")]
    pub destino_nome: String,
    pub mes_referencia: String,
    pub valor: f64,
    #[serde(default)]
    pub confirmada: bool,
    #[serde(default)]
    pub data_confirmacao: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferPayload {
    pub origem_id: i64,
    pub destino_id: i64,
    pub mes_referencia: String,
    pub valor: f64,
    pub descricao: String,
    pub confirmada: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TransferListResponse {
    #[serde(default)]
    pub transferencias: Vec<Transfer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferStats {
    #[serde(default)]
    pub total_transferencias: i64,
    #[serde(default)]
    pub total_confirmadas: i64,
    #[serde(default)]
    pub total_pendentes: i64,
    #[serde(default)]
    pub valor_total: f64,
    #[serde(default)]
    pub valor_confirmado: f64,
    #[serde(default)]
    pub valor_pendente: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationAck {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewData {
    #[serde(default)]
    pub colunas: Vec<String>,
    #[serde(default)]
    pub preview: Vec<BTreeMap<String, Value>>,
    #[serde(default)]
    pub total_linhas_preview: i64,
    #[serde(default)]
    pub total_linhas: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub importados: i64,
    #[serde(default)]
    pub erros: Option<Vec<String>>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
    #[serde(default)]
    pub total_linhas: Option<i64>,
}

impl ImportOutcome {
    pub fn error_count(&self) -> usize {
        self.erros.as_ref().map(Vec::len).unwrap_or(0)
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.as_ref().map(Vec::len).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyStatus {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// The four user pickers of the transfer screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserOptions {
    pub form_origin: Vec<UserRef>,
    pub form_destination: Vec<UserRef>,
    pub filter_origin: Vec<UserRef>,
    pub filter_destination: Vec<UserRef>,
}

impl UserOptions {
    pub fn from_users(users: &[UserRef]) -> Self {
        Self {
            form_origin: users.to_vec(),
            form_destination: users.to_vec(),
            filter_origin: users.to_vec(),
            filter_destination: users.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransfersViewData {
    pub filters: TransferFilters,
    pub stats: Option<TransferStats>,
    pub transfers: Vec<Transfer>,
    pub rows: Vec<TransferRow>,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersData {
    pub users: Vec<UserRef>,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferDetailData {
    pub transfer: Transfer,
    pub row: TransferRow,
}

/// `confirmed` is false when the user declined the confirmation prompt.
#[derive(Debug, Clone, Serialize)]
pub struct TransferMutationData {
    pub action: String,
    pub id: Option<i64>,
    pub confirmed: bool,
    pub notification: Notification,
    pub view: TransfersViewData,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferExportData {
    pub path: String,
    pub rows: usize,
    pub filters: TransferFilters,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateDownloadData {
    pub import_type: String,
    pub file_name: String,
    pub saved_to: Option<String>,
    pub notification: Notification,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectedFileData {
    pub name: String,
    pub size: u64,
    pub size_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileSelectionData {
    pub file: SelectedFileData,
    pub notification: Notification,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportPreviewData {
    pub file: SelectedFileData,
    pub preview: PreviewData,
    pub table: PreviewTable,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportRunData {
    pub import_type: String,
    pub file: SelectedFileData,
    /// Present when this run selected the type and fetched its template.
    pub template: Option<TemplateDownloadData>,
    pub confirmed: bool,
    pub outcome: Option<ImportOutcome>,
    pub summary: Option<ImportSummary>,
    pub notification: Option<Notification>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DependencyCheckData {
    pub status: DependencyStatus,
    pub notification: Option<Notification>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionData {
    pub user: Option<UserRef>,
    pub redirect: Option<String>,
    pub notification: Notification,
}
