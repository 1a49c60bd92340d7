use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::{ClientError, ClientResult};

/// Receives a downloaded template under its suggested file name.
pub trait TemplateSink {
    /// Returns where the template ended up, when it has a location.
    fn save(&self, file_name: &str, bytes: &[u8]) -> ClientResult<Option<PathBuf>>;
}

/// Writes templates into a directory, creating it when needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
}

impl TemplateSink for DirectorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> ClientResult<Option<PathBuf>> {
        fs::create_dir_all(&self.dir)
            .map_err(|error| ClientError::file_unwritable(&self.dir, &error.to_string()))?;
        let target = self.dir.join(file_name);
        fs::write(&target, bytes)
            .map_err(|error| ClientError::file_unwritable(&target, &error.to_string()))?;
        info!(path = %target.display(), bytes = bytes.len(), "template saved");
        Ok(Some(target))
    }
}
