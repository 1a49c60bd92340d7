pub mod api;
pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod format;
pub mod http;
pub mod import;
pub mod month;
pub mod session;
pub mod transfers;
pub mod ui;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
