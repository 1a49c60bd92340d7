use serde::Serialize;

use crate::contracts::types::{Transfer, TransferPayload};
use crate::month::ReferenceMonth;
use crate::{ClientError, ClientResult};

/// Contents of the create/edit transfer modal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferForm {
    pub id: Option<i64>,
    pub origem_id: Option<i64>,
    pub destino_id: Option<i64>,
    pub mes_referencia: ReferenceMonth,
    pub valor: f64,
    pub descricao: String,
    pub confirmada: bool,
}

impl TransferForm {
    /// Blank form preset to `month`.
    pub fn new_for(month: ReferenceMonth) -> Self {
        Self {
            id: None,
            origem_id: None,
            destino_id: None,
            mes_referencia: month,
            valor: 0.0,
            descricao: String::new(),
            confirmada: false,
        }
    }

    pub fn from_transfer(transfer: &Transfer) -> ClientResult<Self> {
        Ok(Self {
            id: Some(transfer.id),
            origem_id: Some(transfer.origem_id),
            destino_id: Some(transfer.destino_id),
            mes_referencia: transfer.mes_referencia.parse()?,
            valor: transfer.valor,
            descricao: transfer.descricao.clone().unwrap_or_default(),
            confirmada: transfer.confirmada,
        })
    }

    /// Checks run in form order; the first failure wins.
    pub fn validate(&self) -> ClientResult<TransferPayload> {
        let (Some(origem_id), Some(destino_id)) = (self.origem_id, self.destino_id) else {
            return Err(ClientError::validation("Origem e destino são obrigatórios"));
        };
        if origem_id == destino_id {
            return Err(ClientError::same_source_and_destination());
        }
        if !self.valor.is_finite() || self.valor <= 0.0 {
            return Err(ClientError::non_positive_amount());
        }

        Ok(TransferPayload {
            origem_id,
            destino_id,
            mes_referencia: self.mes_referencia.to_string(),
            valor: self.valor,
            descricao: self.descricao.trim().to_string(),
            confirmada: self.confirmada,
        })
    }
}
