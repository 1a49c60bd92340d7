use std::io;

use alugueis_client::contracts::envelope::failure_from_error;
use alugueis_client::{ClientError, SuccessEnvelope};
use serde::Serialize;

/// The full envelope, so scripts can branch on `ok` and `command`.
pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    serialize_json_pretty(success)
}

/// Failures carry `redirect` when the session is gone.
pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
