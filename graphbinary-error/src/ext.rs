use std::{any::Any, error::Error};

use crate::StatusCode;

/// Extension for library errors (object-safe).
///
/// Provides helpers for working with errors:
/// - extracting the status code,
/// - a safe message for the remote peer or end user,
/// - a detailed message for logs,
/// - tags for observability systems.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// Status code of the error.
    ///
    /// Defaults to [`StatusCode::Internal`].
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    /// Returns the error as [`Any`](std::any::Any) so callers can downcast
    /// to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Message that is safe to hand to a caller outside the process.
    ///
    /// Internal errors collapse to `"Internal error"`.
    fn client_message(&self) -> String {
        match self.status_code() {
            StatusCode::Internal => "Internal error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Detailed message for logs.
    fn log_message(&self) -> String {
        format!("{self:?}")
    }

    /// Key/value tags for metrics and structured logging.
    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        vec![
            ("error_type", self.type_name()),
            ("status_code", self.status_code().to_string()),
        ]
    }

    /// Short type name of the error.
    fn type_name(&self) -> String {
        std::any::type_name::<Self>()
            .split("::")
            .last()
            .unwrap_or("Unknown")
            .to_string()
    }
}
