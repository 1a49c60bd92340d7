use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::http::{FilePart, HttpRequest, HttpResponse, Method, RequestBody, Transport};
use crate::session::guard::{ActivityEvent, ActivitySink};
use crate::session::store::SessionStore;
use crate::{ClientError, ClientResult};

pub type Query = Vec<(String, String)>;

/// Authenticated access to the backend REST API.
///
/// Every call carries the stored session cookies, counts as user activity,
/// turns 401 into an `unauthorized` error and any other non-2xx status into an
/// `http_error` whose message is the server `detail` when one was sent.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionStore,
    activity: Option<Arc<dyn ActivitySink>>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self {
            transport,
            session,
            activity: None,
        }
    }

    pub fn with_activity(mut self, sink: Arc<dyn ActivitySink>) -> Self {
        self.activity = Some(sink);
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn get_json<T>(&self, path: &str, query: Query) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(HttpRequest::new(Method::Get, path).with_query(query))?;
        decode(path, &response)
    }

    pub fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let value = serde_json::to_value(body)
            .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
        let response =
            self.execute(HttpRequest::new(method, path).with_body(RequestBody::Json(value)))?;
        decode(path, &response)
    }

    pub fn send_empty<T>(&self, method: Method, path: &str) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(HttpRequest::new(method, path))?;
        decode(path, &response)
    }

    pub fn upload<T>(
        &self,
        path: &str,
        file: FilePart,
        fields: Vec<(String, String)>,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let request = HttpRequest::new(Method::Post, path)
            .with_body(RequestBody::Multipart { file, fields });
        let response = self.execute(request)?;
        decode(path, &response)
    }

    pub fn download(&self, path: &str) -> ClientResult<Vec<u8>> {
        let response = self.execute(HttpRequest::new(Method::Get, path))?;
        Ok(response.body)
    }

    pub fn execute(&self, mut request: HttpRequest) -> ClientResult<HttpResponse> {
        if let Some(sink) = &self.activity {
            sink.record(ActivityEvent::ApiRequest);
        }
        request.cookie = self.session.cookie_header();

        debug!(method = request.method.as_str(), path = %request.path, "api request");
        let response = self.transport.send(&request).map_err(|transport_error| {
            error!(path = %request.path, error = %transport_error, "api request failed");
            ClientError::network(&transport_error.0)
        })?;

        self.session.absorb(&response.set_cookies)?;

        if response.status == 401 {
            warn!(path = %request.path, "api answered 401, session is no longer valid");
            return Err(ClientError::unauthorized(extract_detail(&response.body).as_deref()));
        }

        if !response.is_success() {
            let detail = extract_detail(&response.body);
            error!(
                path = %request.path,
                status = response.status,
                detail = detail.as_deref().unwrap_or(""),
                "api request rejected"
            );
            return Err(ClientError::http_status(response.status, detail));
        }

        Ok(response)
    }
}

fn decode<T>(path: &str, response: &HttpResponse) -> ClientResult<T>
where
    T: DeserializeOwned,
{
    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body
    };
    serde_json::from_slice(body).map_err(|error| ClientError::internal_decode(path, &error.to_string()))
}

/// Pulls `detail` out of an error body. FastAPI validation errors send a list,
/// which is kept as compact JSON.
fn extract_detail(body: &[u8]) -> Option<String> {
    let value = serde_json::from_slice::<Value>(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Builds the query string pairs, dropping unset values.
pub fn query_pairs<I, K>(pairs: I) -> Query
where
    I: IntoIterator<Item = (K, Option<String>)>,
    K: Into<String>,
{
    pairs
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key.into(), value)))
        .collect()
}
