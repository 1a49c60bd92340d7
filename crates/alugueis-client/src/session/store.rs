use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ensure_client_directory, set_private_permissions_best_effort};
use crate::{ClientError, ClientResult};

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    cookies: BTreeMap<String, String>,
}

/// Session cookies issued by the backend, replayed on every request.
///
/// When backed by a file the jar is rewritten whenever a response changes it.
#[derive(Debug, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
    cookies: Mutex<BTreeMap<String, String>>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> ClientResult<Self> {
        let cookies = match fs::read_to_string(path) {
            Ok(body) => serde_json::from_str::<SessionFile>(&body)
                .map_err(|error| ClientError::session_store(path, &error.to_string()))?
                .cookies,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(ClientError::session_store(path, &error.to_string())),
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            cookies: Mutex::new(cookies),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.jar().contains_key("access_token")
    }

    pub fn cookie_header(&self) -> Option<String> {
        let jar = self.jar();
        if jar.is_empty() {
            return None;
        }
        Some(
            jar.iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<String>>()
                .join("; "),
        )
    }

    /// Applies `Set-Cookie` headers from a response.
    pub fn absorb(&self, set_cookies: &[String]) -> ClientResult<()> {
        if set_cookies.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let mut changed = false;
        {
            let mut jar = self.jar();
            for header in set_cookies {
                match parse_set_cookie(header, now) {
                    Some(CookieChange::Set(name, value)) => {
                        if jar.get(&name) != Some(&value) {
                            jar.insert(name, value);
                            changed = true;
                        }
                    }
                    Some(CookieChange::Remove(name)) => {
                        changed |= jar.remove(&name).is_some();
                    }
                    None => {}
                }
            }
        }

        if changed {
            self.persist()?;
        }
        Ok(())
    }

    pub fn clear(&self) -> ClientResult<()> {
        self.jar().clear();
        if let Some(path) = &self.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
                Err(error) => return Err(ClientError::session_store(path, &error.to_string())),
            }
        }
        Ok(())
    }

    fn persist(&self) -> ClientResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            ensure_client_directory(parent)?;
        }

        let file = SessionFile {
            cookies: self.jar().clone(),
        };
        let body = serde_json::to_string_pretty(&file)
            .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
        fs::write(path, body).map_err(|error| ClientError::session_store(path, &error.to_string()))?;
        set_private_permissions_best_effort(path);
        debug!(path = %path.display(), "session cookies persisted");
        Ok(())
    }

    fn jar(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.cookies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[derive(Debug, Eq, PartialEq)]
enum CookieChange {
    Set(String, String),
    Remove(String),
}

/// `Max-Age` takes precedence over `Expires`; an empty value also removes.
fn parse_set_cookie(header: &str, now: DateTime<Utc>) -> Option<CookieChange> {
    let mut parts = header.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"');

    let mut max_age = None;
    let mut expires = None;
    for attribute in parts {
        let Some((key, raw)) = attribute.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.eq_ignore_ascii_case("max-age") {
            max_age = raw.trim().parse::<i64>().ok();
        } else if key.eq_ignore_ascii_case("expires") {
            expires = parse_cookie_date(raw.trim());
        }
    }
    let expired = match (max_age, expires) {
        (Some(seconds), _) => seconds <= 0,
        (None, Some(at)) => at <= now,
        (None, None) => false,
    };

    if value.is_empty() || expired {
        return Some(CookieChange::Remove(name.to_string()));
    }
    Some(CookieChange::Set(name.to_string(), value.to_string()))
}

/// HTTP dates, plus the older `01-Jan-1970` spelling.
fn parse_cookie_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%a, %d-%b-%Y %H:%M:%S GMT")
        .ok()
        .map(|naive| naive.and_utc())
}
