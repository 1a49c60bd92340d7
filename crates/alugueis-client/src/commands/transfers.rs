use std::path::Path;

use tracing::info;

use crate::ClientResult;
use crate::commands::Page;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{TransferDetailData, TransferExportData, TransferMutationData};
use crate::month::ReferenceMonth;
use crate::transfers::export::export_to_path;
use crate::transfers::{PendingKind, TransferFilters, TransferForm, TransferRow};
use crate::ui::{Confirm, Notification};

/// Field values for a new transfer.
#[derive(Debug, Clone, Default)]
pub struct TransferDraft {
    pub origem_id: Option<i64>,
    pub destino_id: Option<i64>,
    pub mes_referencia: Option<ReferenceMonth>,
    pub valor: Option<f64>,
    pub descricao: Option<String>,
    pub confirmada: bool,
}

/// Fields to change on an existing transfer; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TransferPatch {
    pub origem_id: Option<i64>,
    pub destino_id: Option<i64>,
    pub mes_referencia: Option<ReferenceMonth>,
    pub valor: Option<f64>,
    pub descricao: Option<String>,
    pub confirmada: Option<bool>,
}

impl TransferPatch {
    fn apply(self, form: &mut TransferForm) {
        if let Some(origem_id) = self.origem_id {
            form.origem_id = Some(origem_id);
        }
        if let Some(destino_id) = self.destino_id {
            form.destino_id = Some(destino_id);
        }
        if let Some(month) = self.mes_referencia {
            form.mes_referencia = month;
        }
        if let Some(valor) = self.valor {
            form.valor = valor;
        }
        if let Some(descricao) = self.descricao {
            form.descricao = descricao;
        }
        if let Some(confirmada) = self.confirmada {
            form.confirmada = confirmada;
        }
    }
}

/// Loads the screen with `filters`: users, list and statistics.
pub fn list(page: &mut Page, filters: TransferFilters) -> ClientResult<SuccessEnvelope> {
    page.transfers.set_filters(filters);
    let notifications = page.transfers.load(&page.api)?;
    success("transfer list", page.transfers.view_data(notifications))
}

/// Applies `filters` to an already loaded screen; users are not fetched again.
pub fn filter(page: &mut Page, filters: TransferFilters) -> ClientResult<SuccessEnvelope> {
    let notifications = page.transfers.apply_filters(&page.api, filters)?;
    success("transfer list", page.transfers.view_data(notifications))
}

pub fn clear_filters(page: &mut Page) -> ClientResult<SuccessEnvelope> {
    let notifications = page.transfers.clear_filters(&page.api)?;
    success("transfer list", page.transfers.view_data(notifications))
}

/// Reloads list and statistics, keeping the current filters.
pub fn refresh(page: &mut Page) -> ClientResult<SuccessEnvelope> {
    let notifications = page.transfers.refresh(&page.api)?;
    success("transfer list", page.transfers.view_data(notifications))
}

pub fn show(page: &Page, id: i64) -> ClientResult<SuccessEnvelope> {
    let transfer = page.transfers.show(&page.api, id)?;
    let row = TransferRow::from_transfer(&transfer);
    success("transfer show", TransferDetailData { transfer, row })
}

pub fn create(page: &mut Page, draft: TransferDraft) -> ClientResult<SuccessEnvelope> {
    let month = draft.mes_referencia.unwrap_or_else(ReferenceMonth::current);
    let mut form = page.transfers.open_new(month).clone();
    form.origem_id = draft.origem_id;
    form.destino_id = draft.destino_id;
    form.valor = draft.valor.unwrap_or(0.0);
    form.descricao = draft.descricao.unwrap_or_default();
    form.confirmada = draft.confirmada;

    let (notification, notifications) = save_form(page, form)?;
    success(
        "transfer create",
        TransferMutationData {
            action: "create".to_string(),
            id: None,
            confirmed: true,
            notification,
            view: page.transfers.view_data(notifications),
        },
    )
}

/// Edits from the loaded list, fetching it first when the page is fresh.
pub fn update(page: &mut Page, id: i64, patch: TransferPatch) -> ClientResult<SuccessEnvelope> {
    if page.transfers.find(id).is_none() {
        page.transfers.refresh(&page.api)?;
    }
    let mut form = page.transfers.edit(id)?.clone();
    patch.apply(&mut form);

    let (notification, notifications) = save_form(page, form)?;
    success(
        "transfer update",
        TransferMutationData {
            action: "update".to_string(),
            id: Some(id),
            confirmed: true,
            notification,
            view: page.transfers.view_data(notifications),
        },
    )
}

/// There is no open modal between commands, so a rejected form is dropped.
fn save_form(
    page: &mut Page,
    form: TransferForm,
) -> ClientResult<(Notification, Vec<Notification>)> {
    let saved = page.transfers.save(&page.api, form);
    if saved.is_err() {
        page.transfers.close_form();
    }
    saved
}

pub fn confirm(page: &mut Page, id: i64, prompt: &dyn Confirm) -> ClientResult<SuccessEnvelope> {
    run_pending(page, PendingKind::Confirm, id, prompt)
}

pub fn delete(page: &mut Page, id: i64, prompt: &dyn Confirm) -> ClientResult<SuccessEnvelope> {
    run_pending(page, PendingKind::Delete, id, prompt)
}

fn run_pending(
    page: &mut Page,
    kind: PendingKind,
    id: i64,
    prompt: &dyn Confirm,
) -> ClientResult<SuccessEnvelope> {
    let (command, action) = match kind {
        PendingKind::Confirm => ("transfer confirm", "confirm"),
        PendingKind::Delete => ("transfer delete", "delete"),
    };
    let message = match kind {
        PendingKind::Confirm => page.transfers.request_confirm(id),
        PendingKind::Delete => page.transfers.request_delete(id),
    };

    if !prompt.confirm(message) {
        page.transfers.cancel_pending();
        info!(id, action, "transfer action cancelled");
        return success(
            command,
            TransferMutationData {
                action: action.to_string(),
                id: Some(id),
                confirmed: false,
                notification: Notification::info("Operação cancelada"),
                view: page.transfers.view_data(Vec::new()),
            },
        );
    }

    // No dialog outlives the command, so a failed action is not left pending.
    let executed = page.transfers.execute_pending(&page.api);
    if executed.is_err() {
        page.transfers.cancel_pending();
    }
    let (notification, notifications) = match executed? {
        Some(result) => result,
        None => (Notification::info("Operação cancelada"), Vec::new()),
    };
    success(
        command,
        TransferMutationData {
            action: action.to_string(),
            id: Some(id),
            confirmed: true,
            notification,
            view: page.transfers.view_data(notifications),
        },
    )
}

pub fn export(page: &mut Page, filters: TransferFilters, path: &Path) -> ClientResult<SuccessEnvelope> {
    page.transfers.set_filters(filters);
    let mut notifications = page.transfers.refresh(&page.api)?;
    let rows = export_to_path(path, page.transfers.transfers())?;
    notifications.push(Notification::success(format!(
        "{rows} transferência(s) exportada(s)"
    )));
    success(
        "transfer export",
        TransferExportData {
            path: path.display().to_string(),
            rows,
            filters: page.transfers.filters().clone(),
            notifications,
        },
    )
}
