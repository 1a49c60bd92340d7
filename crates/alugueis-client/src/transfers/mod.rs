pub mod export;
pub mod filters;
pub mod form;
pub mod manager;
pub mod view;

pub use filters::{StatusFilter, TransferFilters};
pub use form::TransferForm;
pub use manager::{PendingAction, PendingKind, TransferManager};
pub use view::{RowAction, TransferRow, transfer_rows};

pub(crate) const TRANSFERS_PATH: &str = "/api/transferencias";
pub(crate) const STATS_PATH: &str = "/api/transferencias/estatisticas/resumo";
pub(crate) const USERS_PATH: &str = "/api/usuarios";

pub(crate) fn transfer_path(id: i64) -> String {
    format!("{TRANSFERS_PATH}/{id}")
}

pub(crate) fn confirm_path(id: i64) -> String {
    format!("{TRANSFERS_PATH}/{id}/confirmar")
}
