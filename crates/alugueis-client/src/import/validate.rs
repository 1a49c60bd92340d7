use std::fs;
use std::path::{Path, PathBuf};

use crate::contracts::types::SelectedFileData;
use crate::format::format_file_size;
use crate::http::FilePart;
use crate::{ClientError, ClientResult};

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];

#[derive(Debug, Clone)]
enum CandidateSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file offered by drag-drop or the picker, not yet accepted.
///
/// Only the name and size are known until validation passes.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub name: String,
    pub size: u64,
    source: CandidateSource,
}

impl FileCandidate {
    pub fn from_path(path: &Path) -> ClientResult<Self> {
        let metadata =
            fs::metadata(path).map_err(|error| ClientError::file_unreadable(path, &error.to_string()))?;
        if !metadata.is_file() {
            return Err(ClientError::file_unreadable(path, "not a regular file"));
        }
        let name = path
            .file_name()
            .map(|value| value.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            size: metadata.len(),
            source: CandidateSource::Path(path.to_path_buf()),
        })
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            source: CandidateSource::Bytes(bytes),
        }
    }

    pub(crate) fn accept(self) -> ClientResult<SelectedFile> {
        check_upload_rules(&self.name, self.size)?;
        let bytes = match self.source {
            CandidateSource::Bytes(bytes) => bytes,
            CandidateSource::Path(path) => fs::read(&path)
                .map_err(|error| ClientError::file_unreadable(&path, &error.to_string()))?,
        };
        Ok(SelectedFile {
            name: self.name,
            size: bytes.len() as u64,
            bytes,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn summary(&self) -> SelectedFileData {
        SelectedFileData {
            name: self.name.clone(),
            size: self.size,
            size_label: format_file_size(self.size),
        }
    }

    pub(crate) fn to_part(&self) -> FilePart {
        FilePart {
            field: "file".to_string(),
            file_name: self.name.clone(),
            bytes: self.bytes.clone(),
        }
    }
}

/// Size is checked before the extension, and neither touches the network.
pub fn check_upload_rules(name: &str, size: u64) -> ClientResult<()> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ClientError::file_too_large(name, size, MAX_UPLOAD_BYTES));
    }

    let extension = name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase());
    match extension {
        Some(extension) if ALLOWED_EXTENSIONS.contains(&extension.as_str()) => Ok(()),
        _ => Err(ClientError::unsupported_extension(name, &ALLOWED_EXTENSIONS)),
    }
}
