use serde::Serialize;

use crate::contracts::types::Transfer;
use crate::format::{format_brl, format_reference_month};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    Edit,
    Confirm,
    Delete,
}

/// One rendered line of the transfer table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRow {
    pub id: i64,
    pub origin: String,
    pub destination: String,
    pub month: String,
    pub amount: String,
    pub status: String,
    pub description: String,
    pub actions: Vec<RowAction>,
}

impl TransferRow {
    pub fn from_transfer(transfer: &Transfer) -> Self {
        let (status, actions) = if transfer.confirmada {
            ("Confirmada", vec![RowAction::Edit, RowAction::Delete])
        } else {
            (
                "Pendente",
                vec![RowAction::Edit, RowAction::Confirm, RowAction::Delete],
            )
        };
        Self {
            id: transfer.id,
            origin: transfer.origem_nome.clone(),
            destination: transfer.destino_nome.clone(),
            month: format_reference_month(Some(&transfer.mes_referencia)),
            amount: format_brl(transfer.valor),
            status: status.to_string(),
            description: transfer
                .descricao
                .as_deref()
                .filter(|text| !text.trim().is_empty())
                .unwrap_or("-")
                .to_string(),
            actions,
        }
    }
}

/// Confirm is offered only while a transfer is pending.
pub fn transfer_rows(transfers: &[Transfer]) -> Vec<TransferRow> {
    transfers.iter().map(TransferRow::from_transfer).collect()
}
