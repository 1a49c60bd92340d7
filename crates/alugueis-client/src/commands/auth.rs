use crate::ClientResult;
use crate::commands::Page;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::SessionData;
use crate::session::{Credentials, auth, perform_logout};
use crate::ui::Notification;

pub fn login(page: &Page, credentials: &Credentials) -> ClientResult<SuccessEnvelope> {
    let user = auth::login(page.api(), credentials)?;
    let notification = Notification::success(format!("Bem-vindo, {}!", user.nome));
    success(
        "login",
        SessionData {
            user: Some(user),
            redirect: None,
            notification,
        },
    )
}

/// Always succeeds; the server call is best effort.
pub fn logout(page: &Page) -> ClientResult<SuccessEnvelope> {
    let redirect = perform_logout(page.api());
    success(
        "logout",
        SessionData {
            user: None,
            redirect: Some(redirect.path().to_string()),
            notification: Notification::info("Sessão encerrada"),
        },
    )
}

pub fn whoami(page: &Page) -> ClientResult<SuccessEnvelope> {
    let user = auth::current_user(page.api())?;
    let notification = Notification::info(format!("Conectado como {}", user.nome));
    success(
        "whoami",
        SessionData {
            user: Some(user),
            redirect: None,
            notification,
        },
    )
}
