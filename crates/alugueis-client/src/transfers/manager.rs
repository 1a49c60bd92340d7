use serde::Serialize;
use tracing::{error, info, warn};

use super::{
    STATS_PATH, TRANSFERS_PATH, TransferFilters, TransferForm, USERS_PATH, confirm_path,
    transfer_path, transfer_rows,
};
use crate::api::ApiClient;
use crate::contracts::types::{
    MutationAck, Transfer, TransferListResponse, TransferStats, TransfersViewData, UserOptions,
    UserRef, UsersResponse,
};
use crate::http::Method;
use crate::month::ReferenceMonth;
use crate::ui::Notification;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    Confirm,
    Delete,
}

impl PendingKind {
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Confirm => {
                "Deseja realmente confirmar esta transferência? Esta ação não pode ser desfeita."
            }
            Self::Delete => {
                "Deseja realmente excluir esta transferência? Esta ação não pode ser desfeita."
            }
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            Self::Confirm => "Transferência confirmada com sucesso",
            Self::Delete => "Transferência excluída com sucesso",
        }
    }
}

/// A destructive action waiting on the confirmation dialog.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct PendingAction {
    pub kind: PendingKind,
    pub id: i64,
}

/// State of the transfer screen.
///
/// Every mutation reloads both the list and the statistics before returning.
#[derive(Debug, Default)]
pub struct TransferManager {
    users: Vec<UserRef>,
    options: UserOptions,
    transfers: Vec<Transfer>,
    stats: Option<TransferStats>,
    filters: TransferFilters,
    editing: Option<TransferForm>,
    pending: Option<PendingAction>,
}

impl TransferManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[UserRef] {
        &self.users
    }

    pub fn options(&self) -> &UserOptions {
        &self.options
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn stats(&self) -> Option<&TransferStats> {
        self.stats.as_ref()
    }

    pub fn filters(&self) -> &TransferFilters {
        &self.filters
    }

    pub fn editing(&self) -> Option<&TransferForm> {
        self.editing.as_ref()
    }

    pub fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    pub fn find(&self, id: i64) -> Option<&Transfer> {
        self.transfers.iter().find(|transfer| transfer.id == id)
    }

    /// Initial screen load: users, then list and statistics.
    pub fn load(&mut self, api: &ApiClient) -> ClientResult<Vec<Notification>> {
        let mut notifications = self.load_users(api)?;
        notifications.extend(self.refresh(api)?);
        Ok(notifications)
    }

    /// Reloads the list and statistics with the current filters.
    pub fn refresh(&mut self, api: &ApiClient) -> ClientResult<Vec<Notification>> {
        let mut notifications = Vec::new();
        self.reload_list(api, &mut notifications)?;
        self.reload_stats(api)?;
        Ok(notifications)
    }

    /// Fills the four user pickers. A failure leaves them as they were.
    pub fn load_users(&mut self, api: &ApiClient) -> ClientResult<Vec<Notification>> {
        match api.get_json::<UsersResponse>(USERS_PATH, Vec::new()) {
            Ok(response) => {
                self.users = response.into_users();
                self.options = UserOptions::from_users(&self.users);
                Ok(Vec::new())
            }
            Err(failure) if failure.is_unauthorized() => Err(failure),
            Err(failure) => {
                error!(error = %failure, "loading users failed");
                Ok(vec![Notification::error("Erro ao carregar usuários")])
            }
        }
    }

    fn reload_list(
        &mut self,
        api: &ApiClient,
        notifications: &mut Vec<Notification>,
    ) -> ClientResult<()> {
        match api.get_json::<TransferListResponse>(TRANSFERS_PATH, self.filters.list_query()) {
            Ok(response) => {
                self.transfers = response.transferencias;
                Ok(())
            }
            Err(failure) if failure.is_unauthorized() => Err(failure),
            Err(failure) => {
                error!(error = %failure, "loading transfers failed");
                notifications.push(Notification::error("Erro ao carregar transferências"));
                Ok(())
            }
        }
    }

    /// Statistics failures are logged only; the panel keeps its last values.
    fn reload_stats(&mut self, api: &ApiClient) -> ClientResult<()> {
        match api.get_json::<TransferStats>(STATS_PATH, self.filters.stats_query()) {
            Ok(stats) => {
                self.stats = Some(stats);
                Ok(())
            }
            Err(failure) if failure.is_unauthorized() => Err(failure),
            Err(failure) => {
                error!(error = %failure, "loading transfer statistics failed");
                Ok(())
            }
        }
    }

    /// Replaces the filters without reloading.
    pub fn set_filters(&mut self, filters: TransferFilters) {
        self.filters = filters;
    }

    pub fn apply_filters(
        &mut self,
        api: &ApiClient,
        filters: TransferFilters,
    ) -> ClientResult<Vec<Notification>> {
        self.filters = filters;
        self.refresh(api)
    }

    pub fn clear_filters(&mut self, api: &ApiClient) -> ClientResult<Vec<Notification>> {
        self.filters.clear();
        self.refresh(api)
    }

    pub fn open_new(&mut self, month: ReferenceMonth) -> &TransferForm {
        self.editing.insert(TransferForm::new_for(month))
    }

    /// Opens the edit form from the loaded list without a request.
    pub fn edit(&mut self, id: i64) -> ClientResult<&TransferForm> {
        let transfer = self.find(id).ok_or_else(|| ClientError::transfer_not_found(id))?;
        let form = TransferForm::from_transfer(transfer)?;
        Ok(self.editing.insert(form))
    }

    pub fn close_form(&mut self) {
        self.editing = None;
    }

    /// Validates locally, then creates or updates. Validation failures issue no request.
    pub fn save(
        &mut self,
        api: &ApiClient,
        form: TransferForm,
    ) -> ClientResult<(Notification, Vec<Notification>)> {
        let payload = form.validate().inspect_err(|rejection| {
            warn!(error = %rejection, "transfer form rejected");
        })?;

        let message = match form.id {
            Some(id) => {
                let _: MutationAck = api.send_json(Method::Put, &transfer_path(id), &payload)?;
                info!(id, "transfer updated");
                "Transferência atualizada com sucesso"
            }
            None => {
                let _: MutationAck = api.send_json(Method::Post, TRANSFERS_PATH, &payload)?;
                info!("transfer created");
                "Transferência criada com sucesso"
            }
        };

        self.editing = None;
        let refreshed = self.refresh(api)?;
        Ok((Notification::success(message), refreshed))
    }

    /// Opens the confirm dialog and returns its prompt.
    pub fn request_confirm(&mut self, id: i64) -> &'static str {
        self.request(PendingKind::Confirm, id)
    }

    pub fn request_delete(&mut self, id: i64) -> &'static str {
        self.request(PendingKind::Delete, id)
    }

    fn request(&mut self, kind: PendingKind, id: i64) -> &'static str {
        self.pending = Some(PendingAction { kind, id });
        kind.prompt()
    }

    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Runs the pending action. On failure it stays pending until
    /// `cancel_pending`.
    pub fn execute_pending(
        &mut self,
        api: &ApiClient,
    ) -> ClientResult<Option<(Notification, Vec<Notification>)>> {
        let Some(action) = self.pending else {
            return Ok(None);
        };

        let _: MutationAck = match action.kind {
            PendingKind::Confirm => api.send_empty(Method::Post, &confirm_path(action.id))?,
            PendingKind::Delete => api.send_empty(Method::Delete, &transfer_path(action.id))?,
        };
        info!(id = action.id, kind = ?action.kind, "transfer action executed");

        self.pending = None;
        let refreshed = self.refresh(api)?;
        Ok(Some((
            Notification::success(action.kind.success_message()),
            refreshed,
        )))
    }

    /// Fetches one transfer from the backend.
    pub fn show(&self, api: &ApiClient, id: i64) -> ClientResult<Transfer> {
        api.get_json(&transfer_path(id), Vec::new()).map_err(|failure| {
            if failure.code == "http_error"
                && failure
                    .data
                    .as_ref()
                    .and_then(|data| data.get("status"))
                    .and_then(serde_json::Value::as_u64)
                    == Some(404)
            {
                return ClientError::transfer_not_found(id);
            }
            failure
        })
    }

    pub fn view_data(&self, notifications: Vec<Notification>) -> TransfersViewData {
        TransfersViewData {
            filters: self.filters.clone(),
            stats: self.stats.clone(),
            transfers: self.transfers.clone(),
            rows: transfer_rows(&self.transfers),
            notifications,
        }
    }
}
