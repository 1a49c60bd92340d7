#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use alugueis_client::commands::Page;
use alugueis_client::config::ClientConfig;
use alugueis_client::http::{
    HttpRequest, HttpResponse, Method, RequestBody, Transport, TransportError,
};
use serde_json::Value;
use tempfile::{Builder, TempDir};

struct Route {
    method: Method,
    path: String,
    responses: VecDeque<HttpResponse>,
}

/// Scripted backend. Each route replays its queued responses in order and
/// repeats the last one; unknown routes answer 404.
#[derive(Default)]
pub struct FakeBackend {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
    offline: Mutex<bool>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, method: Method, path: &str, response: HttpResponse) {
        let mut routes = self.routes.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(route) = routes
            .iter_mut()
            .find(|route| route.method == method && route.path == path)
        {
            route.responses.push_back(response);
            return;
        }
        routes.push(Route {
            method,
            path: path.to_string(),
            responses: VecDeque::from([response]),
        });
    }

    pub fn go_offline(&self) {
        *self.offline.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = true;
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }

    pub fn last(&self, method: Method, path: &str) -> Option<HttpRequest> {
        self.requests()
            .into_iter()
            .rev()
            .find(|request| request.method == method && request.path == path)
    }
}

impl Transport for FakeBackend {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request.clone());

        if *self.offline.lock().unwrap_or_else(std::sync::PoisonError::into_inner) {
            return Err(TransportError("connection refused".to_string()));
        }

        let mut routes = self.routes.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let route = routes
            .iter_mut()
            .find(|route| route.method == request.method && route.path == request.path);
        let Some(route) = route else {
            return Ok(json(404, serde_json::json!({ "detail": "Not Found" })));
        };
        if route.responses.len() > 1 {
            return Ok(route.responses.pop_front().unwrap_or_default());
        }
        Ok(route.responses.front().cloned().unwrap_or_default())
    }
}

pub fn json(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        set_cookies: Vec::new(),
        body: body.to_string().into_bytes(),
    }
}

pub fn bytes(status: u16, body: &[u8]) -> HttpResponse {
    HttpResponse {
        status,
        set_cookies: Vec::new(),
        body: body.to_vec(),
    }
}

pub fn temp_home(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir()?;
    let home = dir.path().join("alugueis-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

pub fn open_page(backend: &Arc<FakeBackend>, home: &Path) -> Option<Page> {
    let config = ClientConfig::load_with_home_override(Some(home));
    assert!(config.is_ok());
    let page = Page::with_transport(config.ok()?, backend.clone());
    assert!(page.is_ok());
    page.ok()
}

pub fn multipart_fields(request: &HttpRequest) -> Vec<(String, String)> {
    match &request.body {
        RequestBody::Multipart { fields, .. } => fields.clone(),
        _ => Vec::new(),
    }
}

pub fn json_body(request: &HttpRequest) -> Value {
    match &request.body {
        RequestBody::Json(value) => value.clone(),
        _ => Value::Null,
    }
}

pub fn accept(_: &str) -> bool {
    true
}

pub fn decline(_: &str) -> bool {
    false
}
