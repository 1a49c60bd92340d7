use serde::Serialize;
use serde_json::Value;

use crate::contracts::types::{ImportOutcome, PreviewData};

/// Preview rows laid out under the server's column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub shown: i64,
    pub total: Option<i64>,
}

impl PreviewTable {
    pub fn from_preview(preview: &PreviewData) -> Self {
        let rows = preview
            .preview
            .iter()
            .map(|row| {
                preview
                    .colunas
                    .iter()
                    .map(|column| cell_text(row.get(column)))
                    .collect()
            })
            .collect();
        Self {
            headers: preview.colunas.clone(),
            rows,
            shown: preview.total_linhas_preview,
            total: preview.total_linhas,
        }
    }
}

/// Missing, null and blank cells render as `-`.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(text)) if text.trim().is_empty() => "-".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// The result panel shown after an import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub imported: i64,
    pub error_count: usize,
    pub warning_count: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ImportSummary {
    pub fn from_outcome(outcome: &ImportOutcome) -> Self {
        Self {
            imported: outcome.importados,
            error_count: outcome.error_count(),
            warning_count: outcome.warning_count(),
            errors: outcome.erros.clone().unwrap_or_default(),
            warnings: outcome.warnings.clone().unwrap_or_default(),
        }
    }
}
