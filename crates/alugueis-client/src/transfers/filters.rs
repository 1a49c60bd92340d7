use std::str::FromStr;

use serde::Serialize;

use crate::ClientError;
use crate::api::{Query, query_pairs};
use crate::month::ReferenceMonth;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Confirmada,
    Pendente,
}

impl StatusFilter {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Confirmada => "true",
            Self::Pendente => "false",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "confirmada" | "confirmadas" | "true" => Ok(Self::Confirmada),
            "pendente" | "pendentes" | "false" => Ok(Self::Pendente),
            _ => Err(ClientError::invalid_argument_with_recovery(
                &format!("Unknown status filter `{value}`."),
                vec!["Use `confirmada` or `pendente`.".to_string()],
            )),
        }
    }
}

/// The filter bar of the transfer screen. Unset controls are left out of the query.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct TransferFilters {
    pub mes_referencia: Option<ReferenceMonth>,
    pub origem_id: Option<i64>,
    pub destino_id: Option<i64>,
    pub status: Option<StatusFilter>,
}

impl TransferFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn list_query(&self) -> Query {
        query_pairs([
            ("mes_referencia", self.mes_referencia.map(|month| month.to_string())),
            ("origem_id", self.origem_id.map(|id| id.to_string())),
            ("destino_id", self.destino_id.map(|id| id.to_string())),
            (
                "confirmada",
                self.status.map(|status| status.as_query_value().to_string()),
            ),
        ])
    }

    /// Statistics only follow the month filter.
    pub fn stats_query(&self) -> Query {
        query_pairs([(
            "mes_referencia",
            self.mes_referencia.map(|month| month.to_string()),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::{StatusFilter, TransferFilters};

    #[test]
    fn empty_filters_produce_no_query() {
        let filters = TransferFilters::default();
        assert!(filters.is_empty());
        assert!(filters.list_query().is_empty());
        assert!(filters.stats_query().is_empty());
    }

    #[test]
    fn set_filters_become_query_parameters_in_order() {
        let filters = TransferFilters {
            mes_referencia: "2025-11".parse().ok(),
            origem_id: Some(3),
            destino_id: None,
            status: Some(StatusFilter::Pendente),
        };
        let pairs = filters
            .list_query()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<String>>();
        assert_eq!(
            pairs,
            vec!["mes_referencia=2025-11", "origem_id=3", "confirmada=false"]
        );
        assert_eq!(
            filters.stats_query(),
            vec![("mes_referencia".to_string(), "2025-11".to_string())]
        );
    }

    #[test]
    fn status_filter_accepts_labels_and_booleans() {
        assert_eq!("Confirmada".parse::<StatusFilter>().ok(), Some(StatusFilter::Confirmada));
        assert_eq!("false".parse::<StatusFilter>().ok(), Some(StatusFilter::Pendente));
        assert!("talvez".parse::<StatusFilter>().is_err());
    }
}
