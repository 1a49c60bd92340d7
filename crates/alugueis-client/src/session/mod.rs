pub mod auth;
pub mod guard;
pub mod store;

pub use auth::{Credentials, perform_logout};
pub use guard::{
    ActivityEvent, ActivitySink, GuardAction, GuardState, LoadDecision, NavigationKind, PageLoad,
    SessionGuard, SharedGuard,
};
pub use store::SessionStore;
