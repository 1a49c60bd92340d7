pub mod template;
pub mod validate;
pub mod view;
pub mod wizard;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::ClientError;

pub use template::{DirectorySink, TemplateSink};
pub use validate::{ALLOWED_EXTENSIONS, FileCandidate, MAX_UPLOAD_BYTES, SelectedFile};
pub use view::{ImportSummary, PreviewTable};
pub use wizard::{ImportCommit, ImportWizard};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Proprietarios,
    Imoveis,
    Alugueis,
    Participacoes,
}

impl ImportKind {
    pub const ALL: [ImportKind; 4] = [
        Self::Proprietarios,
        Self::Imoveis,
        Self::Alugueis,
        Self::Participacoes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proprietarios => "proprietarios",
            Self::Imoveis => "imoveis",
            Self::Alugueis => "alugueis",
            Self::Participacoes => "participacoes",
        }
    }

    pub fn template_file_name(&self) -> String {
        format!("template_{}.xlsx", self.as_str())
    }

    pub fn template_path(&self) -> String {
        format!("/api/importacao/template/{}", self.as_str())
    }

    pub fn import_path(&self) -> String {
        format!("/api/importacao/{}", self.as_str())
    }

    /// Only participations take a reference month alongside the file.
    pub fn accepts_reference_month(&self) -> bool {
        matches!(self, Self::Participacoes)
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportKind {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value.trim().to_ascii_lowercase())
            .ok_or_else(|| ClientError::unknown_import_kind(value))
    }
}
