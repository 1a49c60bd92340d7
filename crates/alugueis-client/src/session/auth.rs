use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ClientResult;
use crate::api::ApiClient;
use crate::contracts::types::UserRef;
use crate::http::Method;
use crate::ui::Redirect;

const LOGIN_PATH: &str = "/api/auth/login";
const LOGOUT_PATH: &str = "/api/auth/logout";
const ME_PATH: &str = "/api/auth/me";

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LoginResponse {
    user: UserRef,
}

/// Authenticates and keeps the issued session cookies in the client's store.
pub fn login(api: &ApiClient, credentials: &Credentials) -> ClientResult<UserRef> {
    let response: LoginResponse = api.send_json(Method::Post, LOGIN_PATH, credentials)?;
    info!(user_id = response.user.id, "logged in");
    Ok(response.user)
}

pub fn current_user(api: &ApiClient) -> ClientResult<UserRef> {
    api.get_json(ME_PATH, Vec::new())
}

/// Ends the server session and always lands on the login page.
///
/// Failures are logged and otherwise ignored; local cookies are dropped either way.
pub fn perform_logout(api: &ApiClient) -> Redirect {
    if let Err(error) = api.send_empty::<serde_json::Value>(Method::Post, LOGOUT_PATH) {
        warn!(code = %error.code, error = %error, "logout request failed");
    }
    if let Err(error) = api.session().clear() {
        warn!(error = %error, "could not clear stored session");
    }
    Redirect::Login
}
