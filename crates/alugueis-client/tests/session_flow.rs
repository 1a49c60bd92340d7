mod support;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use alugueis_client::commands::{auth, transfers};
use alugueis_client::http::{HttpResponse, Method};
use alugueis_client::session::{
    Credentials, GuardState, LoadDecision, NavigationKind, PageLoad, SessionGuard, SharedGuard,
};
use alugueis_client::transfers::TransferFilters;
use serde_json::json;

use support::{FakeBackend, json, json_body, open_page, temp_home};

fn login_response() -> HttpResponse {
    let mut response = json(200, json!({"user": {"id": 4, "nome": "Carla"}}));
    response.set_cookies = vec![
        "access_token=abc; HttpOnly; Path=/; SameSite=Lax".to_string(),
        "refresh_token=def; HttpOnly; Path=/".to_string(),
    ];
    response
}

#[test]
fn login_persists_cookies_and_replays_them() {
    let backend = FakeBackend::new();
    backend.route(Method::Post, "/api/auth/login", login_response());
    backend.route(Method::Get, "/api/auth/me", json(200, json!({"id": 4, "nome": "Carla"})));

    let home = temp_home("alugueis-session-login");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(page) = open_page(&backend, &home) else { return };

    let logged_in = auth::login(
        &page,
        &Credentials {
            email: "carla@example.com".to_string(),
            password: "segredo".to_string(),
        },
    );
    assert!(logged_in.is_ok());
    if let Ok(envelope) = logged_in {
        assert_eq!(envelope.data["user"]["nome"], "Carla");
        assert_eq!(envelope.data["notification"]["message"], "Bem-vindo, Carla!");
    }
    let sent = backend.last(Method::Post, "/api/auth/login");
    assert!(sent.is_some());
    if let Some(request) = sent {
        assert_eq!(
            json_body(&request),
            json!({"email": "carla@example.com", "password": "segredo"})
        );
        assert_eq!(request.cookie, None);
    }
    assert!(home.join("session.json").exists());

    // A second page reads the persisted jar.
    let Some(reopened) = open_page(&backend, &home) else { return };
    assert!(reopened.api().session().is_authenticated());
    let me = auth::whoami(&reopened);
    assert!(me.is_ok());
    let replayed = backend.last(Method::Get, "/api/auth/me");
    assert!(replayed.is_some());
    if let Some(request) = replayed {
        assert_eq!(
            request.cookie.as_deref(),
            Some("access_token=abc; refresh_token=def")
        );
    }
}

#[test]
fn logout_clears_the_session_even_when_the_server_fails() {
    let backend = FakeBackend::new();
    backend.route(Method::Post, "/api/auth/login", login_response());
    backend.route(Method::Post, "/api/auth/logout", json(500, json!({})));

    let home = temp_home("alugueis-session-logout");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(page) = open_page(&backend, &home) else { return };

    let credentials = Credentials {
        email: "carla@example.com".to_string(),
        password: "segredo".to_string(),
    };
    assert!(auth::login(&page, &credentials).is_ok());

    let logged_out = auth::logout(&page);
    assert!(logged_out.is_ok());
    if let Ok(envelope) = logged_out {
        assert_eq!(envelope.data["redirect"], "/login");
    }
    assert!(!page.api().session().is_authenticated());
    assert!(!home.join("session.json").exists());

    backend.go_offline();
    let offline = auth::logout(&page);
    assert!(offline.is_ok());
}

#[test]
fn cleared_cookie_is_dropped_from_the_store() {
    let backend = FakeBackend::new();
    backend.route(Method::Post, "/api/auth/login", login_response());
    let mut expiring = json(401, json!({"detail": "Token expirado"}));
    expiring.set_cookies = vec!["access_token=; Max-Age=0; Path=/".to_string()];
    backend.route(Method::Get, "/api/auth/me", expiring);

    let home = temp_home("alugueis-session-expire");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(page) = open_page(&backend, &home) else { return };

    let credentials = Credentials {
        email: "carla@example.com".to_string(),
        password: "segredo".to_string(),
    };
    assert!(auth::login(&page, &credentials).is_ok());

    let me = auth::whoami(&page);
    assert!(me.is_err());
    if let Err(error) = me {
        assert_eq!(error.code, "unauthorized");
        assert_eq!(error.message, "Token expirado");
    }
    assert!(!page.api().session().is_authenticated());
    let stored = fs::read_to_string(home.join("session.json")).unwrap_or_default();
    assert!(stored.contains("refresh_token"));
    assert!(!stored.contains("access_token"));
}

#[test]
fn api_requests_count_as_activity_for_the_guard() {
    let backend = FakeBackend::new();
    backend.route(Method::Get, "/api/usuarios", json(200, json!([])));
    backend.route(Method::Get, "/api/transferencias", json(200, json!({"transferencias": []})));

    let home = temp_home("alugueis-session-guard");
    assert!(home.is_ok());
    let Ok((_dir, home)) = home else { return };
    let Some(page) = open_page(&backend, &home) else { return };

    let guard = SharedGuard::new(SessionGuard::new(
        Duration::from_secs(60),
        Duration::from_secs(2),
    ));
    assert_eq!(
        guard.on_page_load(&PageLoad::new(NavigationKind::Navigate, "/transferencias")),
        LoadDecision::Continue
    );
    let before = guard.lock().next_deadline();
    std::thread::sleep(Duration::from_millis(20));

    let mut page = page.with_activity(Arc::new(guard.clone()));
    assert!(transfers::list(&mut page, TransferFilters::default()).is_ok());

    let after = guard.lock().next_deadline();
    assert!(before.is_some() && after.is_some());
    assert!(after > before);
    assert!(matches!(guard.lock().state(), GuardState::Armed { .. }));
}

#[test]
fn reload_outside_login_forces_logout() {
    let guard = SharedGuard::new(SessionGuard::new(
        Duration::from_secs(60),
        Duration::from_secs(2),
    ));
    assert_eq!(
        guard.on_page_load(&PageLoad::new(NavigationKind::Reload, "/importacao")),
        LoadDecision::ForceLogout
    );
    assert_eq!(guard.lock().state(), GuardState::LoggedOut);

    assert_eq!(
        guard.on_page_load(&PageLoad::new(NavigationKind::Reload, "/login")),
        LoadDecision::Continue
    );
    assert_eq!(guard.lock().state(), GuardState::Disabled);
}
