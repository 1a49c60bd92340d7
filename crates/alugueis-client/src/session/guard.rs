use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::ui::Notification;

pub const EXPIRED_MESSAGE: &str = "Sessão expirada por inatividade";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationKind {
    Navigate,
    Reload,
    BackForward,
    Prerender,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PageLoad {
    pub navigation: NavigationKind,
    pub path: String,
}

impl PageLoad {
    pub fn new(navigation: NavigationKind, path: impl Into<String>) -> Self {
        Self {
            navigation,
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LoadDecision {
    Continue,
    /// Log out and go to login before any other page logic runs.
    ForceLogout,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityEvent {
    MouseDown,
    MouseMove,
    KeyPress,
    Scroll,
    TouchStart,
    Click,
    ApiRequest,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GuardState {
    Disabled,
    Armed { deadline: Instant },
    Expired { logout_at: Instant },
    LoggedOut,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum GuardAction {
    Notify(Notification),
    PerformLogout,
}

pub fn is_login_path(path: &str) -> bool {
    path.contains("/login")
}

#[derive(Debug, Clone)]
pub struct SessionGuard {
    timeout: Duration,
    grace: Duration,
    state: GuardState,
}

impl SessionGuard {
    pub fn new(timeout: Duration, grace: Duration) -> Self {
        Self {
            timeout,
            grace,
            state: GuardState::Disabled,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn on_page_load(&mut self, load: &PageLoad, now: Instant) -> LoadDecision {
        if is_login_path(&load.path) {
            self.state = GuardState::Disabled;
            return LoadDecision::Continue;
        }

        if load.navigation == NavigationKind::Reload {
            info!(path = %load.path, "reload detected, forcing logout");
            self.state = GuardState::LoggedOut;
            return LoadDecision::ForceLogout;
        }

        self.arm(now);
        LoadDecision::Continue
    }

    pub fn record_activity(&mut self, event: ActivityEvent, now: Instant) {
        if let GuardState::Armed { .. } = self.state {
            debug!(?event, "inactivity countdown reset");
            self.arm(now);
        }
    }

    pub fn poll(&mut self, now: Instant) -> Option<GuardAction> {
        match self.state {
            GuardState::Armed { deadline } if now >= deadline => {
                info!("session expired after inactivity");
                self.state = GuardState::Expired {
                    logout_at: now + self.grace,
                };
                Some(GuardAction::Notify(Notification::warning(EXPIRED_MESSAGE)))
            }
            GuardState::Expired { logout_at } if now >= logout_at => {
                self.state = GuardState::LoggedOut;
                Some(GuardAction::PerformLogout)
            }
            _ => None,
        }
    }

    /// Time until the next transition, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            GuardState::Armed { deadline } => Some(deadline),
            GuardState::Expired { logout_at } => Some(logout_at),
            GuardState::Disabled | GuardState::LoggedOut => None,
        }
    }

    fn arm(&mut self, now: Instant) {
        self.state = GuardState::Armed {
            deadline: now + self.timeout,
        };
    }
}

/// Receives user and request activity.
pub trait ActivitySink: Send + Sync {
    fn record(&self, event: ActivityEvent);
}

/// A guard shared between the input loop, the API client and the watcher.
#[derive(Debug, Clone)]
pub struct SharedGuard {
    inner: Arc<Mutex<SessionGuard>>,
}

impl SharedGuard {
    pub fn new(guard: SessionGuard) -> Self {
        Self {
            inner: Arc::new(Mutex::new(guard)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, SessionGuard> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn on_page_load(&self, load: &PageLoad) -> LoadDecision {
        self.lock().on_page_load(load, Instant::now())
    }

    pub fn poll(&self) -> Option<GuardAction> {
        self.lock().poll(Instant::now())
    }
}

impl ActivitySink for SharedGuard {
    fn record(&self, event: ActivityEvent) {
        self.lock().record_activity(event, Instant::now());
    }
}
