use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::contracts::types::{DependencyStatus, ImportOutcome, PreviewData, TemplateDownloadData};
use crate::import::ImportKind;
use crate::import::template::TemplateSink;
use crate::import::validate::{FileCandidate, SelectedFile};
use crate::month::ReferenceMonth;
use crate::ui::{Confirm, Notification};
use crate::{ClientError, ClientResult};

const PREVIEW_PATH: &str = "/api/importacao/preview";
const DEPENDENCIES_PATH: &str = "/api/importacao/check-dependencies";

/// The import screen's state: chosen type, accepted file and last responses.
///
/// Operations overwrite state; nothing is merged or kept across `reset`.
#[derive(Debug, Default)]
pub struct ImportWizard {
    kind: Option<ImportKind>,
    file: Option<SelectedFile>,
    last_preview: Option<PreviewData>,
    last_outcome: Option<ImportOutcome>,
}

#[derive(Debug, Clone)]
pub struct ImportCommit {
    pub outcome: ImportOutcome,
    pub notification: Notification,
}

impl ImportWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> Option<ImportKind> {
        self.kind
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn last_preview(&self) -> Option<&PreviewData> {
        self.last_preview.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&ImportOutcome> {
        self.last_outcome.as_ref()
    }

    /// Chooses the import type and downloads its template once.
    pub fn select_kind(
        &mut self,
        api: &ApiClient,
        kind: ImportKind,
        sink: &dyn TemplateSink,
    ) -> ClientResult<TemplateDownloadData> {
        self.kind = Some(kind);
        download_template(api, kind, sink)
    }

    /// Rejected files leave the wizard as it was.
    pub fn accept_file(&mut self, candidate: FileCandidate) -> ClientResult<Notification> {
        let file = candidate.accept().inspect_err(|rejection| {
            warn!(code = %rejection.code, error = %rejection, "file rejected");
        })?;
        info!(name = %file.name, size = file.size, "file accepted");
        self.file = Some(file);
        self.last_preview = None;
        Ok(Notification::success("Arquivo carregado com sucesso"))
    }

    pub fn clear_file(&mut self) {
        self.file = None;
        self.last_preview = None;
    }

    pub fn preview(&mut self, api: &ApiClient) -> ClientResult<&PreviewData> {
        let file = self.file.as_ref().ok_or_else(ClientError::no_file_selected)?;
        let preview: PreviewData = api
            .upload(PREVIEW_PATH, file.to_part(), Vec::new())
            .inspect_err(|failure| error!(error = %failure, "preview failed"))?;
        Ok(self.last_preview.insert(preview))
    }

    /// Uploads the file to the type's import endpoint after confirmation.
    ///
    /// Returns `Ok(None)` when the user declines.
    pub fn commit(
        &mut self,
        api: &ApiClient,
        confirm: &dyn Confirm,
        reference_month: Option<ReferenceMonth>,
    ) -> ClientResult<Option<ImportCommit>> {
        let (Some(kind), Some(file)) = (self.kind, self.file.as_ref()) else {
            return Err(ClientError::import_selection_incomplete());
        };

        if !confirm.confirm(&confirmation_message(kind)) {
            info!(kind = kind.as_str(), "import declined");
            return Ok(None);
        }

        let mut fields = Vec::new();
        if kind.accepts_reference_month()
            && let Some(month) = reference_month
        {
            fields.push(("mes_referencia".to_string(), month.to_string()));
        }

        let outcome: ImportOutcome = api
            .upload(&kind.import_path(), file.to_part(), fields)
            .inspect_err(|failure| error!(kind = kind.as_str(), error = %failure, "import failed"))?;
        info!(
            kind = kind.as_str(),
            imported = outcome.importados,
            errors = outcome.error_count(),
            warnings = outcome.warning_count(),
            "import finished"
        );

        let notification = Notification::success(format!(
            "Importação concluída! {} registro(s) importado(s)",
            outcome.importados
        ));
        self.last_outcome = Some(outcome.clone());
        Ok(Some(ImportCommit {
            outcome,
            notification,
        }))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn confirmation_message(kind: ImportKind) -> String {
    format!("Deseja importar {kind}? Esta ação não pode ser desfeita.")
}

/// One GET for the template. Failures become an error notification, except a
/// lost session, which is returned so the host can go to login.
pub fn download_template(
    api: &ApiClient,
    kind: ImportKind,
    sink: &dyn TemplateSink,
) -> ClientResult<TemplateDownloadData> {
    let file_name = kind.template_file_name();
    let saved = api
        .download(&kind.template_path())
        .and_then(|bytes| sink.save(&file_name, &bytes));

    let (saved_to, notification) = match saved {
        Ok(location) => (
            location.map(|path| path.display().to_string()),
            Notification::success(format!("Template de {kind} baixado com sucesso!")),
        ),
        Err(failure) if failure.is_unauthorized() => return Err(failure),
        Err(failure) => {
            error!(kind = kind.as_str(), error = %failure, "template download failed");
            (None, Notification::error("Erro ao baixar template"))
        }
    };

    Ok(TemplateDownloadData {
        import_type: kind.as_str().to_string(),
        file_name,
        saved_to,
        notification,
    })
}

/// Asks the backend whether its spreadsheet libraries are installed.
pub fn check_dependencies(
    api: &ApiClient,
) -> ClientResult<(DependencyStatus, Option<Notification>)> {
    let status: DependencyStatus = api
        .get_json(DEPENDENCIES_PATH, Vec::new())
        .inspect_err(|failure| error!(error = %failure, "dependency check failed"))?;
    if status.success {
        return Ok((status, None));
    }

    warn!(
        message = status.message.as_deref().unwrap_or(""),
        "import dependencies missing on the server"
    );
    Ok((
        status,
        Some(Notification::warning(
            "Aviso: Dependências de importação não instaladas completamente",
        )),
    ))
}
