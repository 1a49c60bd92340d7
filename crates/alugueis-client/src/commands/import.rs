use std::path::Path;

use crate::commands::Page;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    DependencyCheckData, FileSelectionData, ImportPreviewData, ImportRunData, SelectedFileData,
};
use crate::import::wizard::check_dependencies;
use crate::import::{DirectorySink, FileCandidate, ImportKind, ImportSummary, PreviewTable};
use crate::month::ReferenceMonth;
use crate::ui::Confirm;
use crate::{ClientError, ClientResult};

/// Selects `kind` and saves its template into `dir`, or the configured download directory.
pub fn template(page: &mut Page, kind: ImportKind, dir: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let target = dir.unwrap_or(&page.config().download_dir).to_path_buf();
    let sink = DirectorySink::new(&target);
    let data = page.import.select_kind(&page.api, kind, &sink)?;
    success("import template", data)
}

pub fn select_file(page: &mut Page, path: &Path) -> ClientResult<SuccessEnvelope> {
    let notification = page.import.accept_file(FileCandidate::from_path(path)?)?;
    let file = selected_summary(page)?;
    success("import file", FileSelectionData { file, notification })
}

/// Previews `path`, or the file already selected when none is given.
pub fn preview(page: &mut Page, path: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    if let Some(path) = path {
        page.import.accept_file(FileCandidate::from_path(path)?)?;
    }
    let preview = page.import.preview(&page.api)?.clone();
    let file = selected_summary(page)?;
    let table = PreviewTable::from_preview(&preview);
    success(
        "import preview",
        ImportPreviewData {
            file,
            preview,
            table,
        },
    )
}

pub fn run(
    page: &mut Page,
    kind: Option<ImportKind>,
    path: Option<&Path>,
    reference_month: Option<ReferenceMonth>,
    prompt: &dyn Confirm,
) -> ClientResult<SuccessEnvelope> {
    if let Some(path) = path {
        page.import.accept_file(FileCandidate::from_path(path)?)?;
    }
    // Picking a different type is a selection, which fetches its template.
    let template = match kind {
        Some(kind) if page.import.kind() != Some(kind) => {
            let sink = DirectorySink::new(&page.config().download_dir);
            Some(page.import.select_kind(&page.api, kind, &sink)?)
        }
        _ => None,
    };

    let committed = page.import.commit(&page.api, prompt, reference_month)?;
    let import_type = page
        .import
        .kind()
        .map(|kind| kind.as_str().to_string())
        .unwrap_or_default();
    let file = selected_summary(page)?;

    let data = match committed {
        Some(commit) => ImportRunData {
            import_type,
            file,
            template,
            confirmed: true,
            summary: Some(ImportSummary::from_outcome(&commit.outcome)),
            outcome: Some(commit.outcome),
            notification: Some(commit.notification),
        },
        None => ImportRunData {
            import_type,
            file,
            template,
            confirmed: false,
            outcome: None,
            summary: None,
            notification: None,
        },
    };
    success("import run", data)
}

pub fn check(page: &Page) -> ClientResult<SuccessEnvelope> {
    let (status, notification) = check_dependencies(&page.api)?;
    success("import check", DependencyCheckData { status, notification })
}

fn selected_summary(page: &Page) -> ClientResult<SelectedFileData> {
    page.import
        .file()
        .map(|file| file.summary())
        .ok_or_else(ClientError::no_file_selected)
}
