use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{ClientError, ClientResult};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_LOGOUT_GRACE: Duration = Duration::from_secs(2);

const CONFIG_FILE_NAME: &str = "config.json";
const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub home: PathBuf,
    pub api_url: String,
    pub inactivity_timeout: Duration,
    pub logout_grace: Duration,
    pub download_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_url: Option<String>,
    inactivity_timeout_secs: Option<u64>,
    logout_grace_secs: Option<u64>,
    download_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn load() -> ClientResult<Self> {
        Self::load_with_home_override(None)
    }

    pub fn load_with_home_override(home_override: Option<&Path>) -> ClientResult<Self> {
        let home = resolve_client_home(home_override)?;
        let file = read_config_file(&home.join(CONFIG_FILE_NAME))?;

        let api_url = std::env::var("ALUGUEIS_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let download_dir = match file.download_dir {
            Some(dir) => absolutize(&dir)?,
            None => absolutize(Path::new("."))?,
        };

        Ok(Self {
            home,
            api_url,
            inactivity_timeout: file
                .inactivity_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_INACTIVITY_TIMEOUT),
            logout_grace: file
                .logout_grace_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_LOGOUT_GRACE),
            download_dir,
        })
    }

    pub fn session_path(&self) -> PathBuf {
        self.home.join(SESSION_FILE_NAME)
    }
}

pub fn resolve_client_home(home_override: Option<&Path>) -> ClientResult<PathBuf> {
    let candidate = match home_override {
        Some(path) => path.to_path_buf(),
        None => {
            if let Some(override_path) = std::env::var_os("ALUGUEIS_HOME") {
                PathBuf::from(override_path)
            } else if let Some(home_path) = home::home_dir() {
                home_path.join(".alugueis")
            } else {
                return Err(ClientError::config_error(
                    Path::new("."),
                    "Could not resolve a home directory for the client.",
                ));
            }
        }
    };

    absolutize(&candidate)
}

pub fn ensure_client_directory(path: &Path) -> ClientResult<()> {
    fs::create_dir_all(path)
        .map_err(|error| ClientError::session_store(path, &error.to_string()))?;
    set_private_permissions_best_effort(path);
    Ok(())
}

fn read_config_file(path: &Path) -> ClientResult<ConfigFile> {
    let body = match fs::read_to_string(path) {
        Ok(body) => body,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ConfigFile::default());
        }
        Err(error) => return Err(ClientError::config_error(path, &error.to_string())),
    };

    serde_json::from_str(&body).map_err(|error| ClientError::config_error(path, &error.to_string()))
}

fn absolutize(path: &Path) -> ClientResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| ClientError::config_error(path, &error.to_string()))
}

#[cfg(unix)]
pub(crate) fn set_private_permissions_best_effort(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let mode = if path.is_dir() { 0o700 } else { 0o600 };
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(mode));
}

#[cfg(not(unix))]
pub(crate) fn set_private_permissions_best_effort(_path: &Path) {}
