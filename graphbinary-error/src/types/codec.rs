use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Error raised by the GraphBinary reader, writer or type registry.
///
/// Every variant identifies the offending tag or runtime type and, where it
/// makes sense, the byte offset in the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphBinaryError {
    /// A wire tag has no registered serializer (protocol/version mismatch).
    #[error("unknown type tag 0x{tag:02X} at offset {offset}")]
    UnknownType { tag: u8, offset: usize },

    /// A runtime value has no serializer for encoding.
    #[error("no serializer registered for runtime type {type_name}")]
    UnsupportedType { type_name: String },

    /// The cursor ran out before a field could be fully read.
    #[error(
        "truncated input while reading {what} at offset {offset}: \
         need {needed} bytes, {remaining} remaining"
    )]
    TruncatedInput {
        what: &'static str,
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A field lies outside its valid domain.
    #[error("malformed {what}{}: {reason}", format_offset(.offset))]
    MalformedValue {
        what: String,
        reason: String,
        offset: Option<usize>,
    },

    /// Conflicting registration while building a type registry.
    #[error("registration rejected: {reason}")]
    Registration { reason: String },
}

fn format_offset(offset: &Option<usize>) -> String {
    match offset {
        Some(o) => format!(" at offset {o}"),
        None => String::new(),
    }
}

impl GraphBinaryError {
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    pub fn malformed(
        what: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedValue {
            what: what.into(),
            reason: reason.into(),
            offset: None,
        }
    }

    /// Attaches an offset to errors that do not carry one yet.
    pub fn with_offset(
        mut self,
        at: usize,
    ) -> Self {
        if let Self::MalformedValue { offset, .. } = &mut self {
            if offset.is_none() {
                *offset = Some(at);
            }
        }
        self
    }

    /// Byte offset the error refers to, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnknownType { offset, .. } | Self::TruncatedInput { offset, .. } => Some(*offset),
            Self::MalformedValue { offset, .. } => *offset,
            Self::UnsupportedType { .. } | Self::Registration { .. } => None,
        }
    }

    /// `true` for errors produced while consuming input.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownType { .. } | Self::TruncatedInput { .. } | Self::MalformedValue { .. }
        )
    }
}

impl ErrorExt for GraphBinaryError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownType { .. } => StatusCode::UnknownType,
            Self::UnsupportedType { .. } => StatusCode::Unsupported,
            Self::TruncatedInput { .. } => StatusCode::UnexpectedEof,
            Self::MalformedValue { .. } => StatusCode::InvalidData,
            Self::Registration { .. } => StatusCode::AlreadyExists,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::UnknownType { tag, .. } => format!("Unknown GraphBinary type 0x{tag:02X}"),
            Self::UnsupportedType { type_name } => format!("Cannot serialize {type_name}"),
            Self::TruncatedInput { .. } => "Incomplete GraphBinary message".to_string(),
            Self::MalformedValue { what, .. } => format!("Malformed {what}"),
            Self::Registration { .. } => "Invalid serializer configuration".to_string(),
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", self.type_name()),
            ("status_code", self.status_code().to_string()),
        ];

        match self {
            Self::UnknownType { tag, .. } => tags.push(("type_tag", format!("0x{tag:02X}"))),
            Self::UnsupportedType { type_name } => tags.push(("runtime_type", type_name.clone())),
            Self::TruncatedInput { what, .. } => tags.push(("field", (*what).to_string())),
            Self::MalformedValue { what, .. } => tags.push(("field", what.clone())),
            Self::Registration { .. } => {}
        }

        tags
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_display_names_tag_and_offset() {
        let err = GraphBinaryError::UnknownType {
            tag: 0x7F,
            offset: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("0x7F"), "got: {msg}");
        assert!(msg.contains("12"), "got: {msg}");
        assert_eq!(err.status_code(), StatusCode::UnknownType);
        assert_eq!(err.offset(), Some(12));
    }

    #[test]
    fn test_malformed_with_offset_is_set_once() {
        let err = GraphBinaryError::malformed("length", "negative value -1")
            .with_offset(4)
            .with_offset(99);
        assert_eq!(err.offset(), Some(4));
        assert_eq!(err.to_string(), "malformed length at offset 4: negative value -1");
    }

    #[test]
    fn test_malformed_without_offset_display() {
        let err = GraphBinaryError::malformed("value-only null", "null has no payload");
        assert_eq!(err.to_string(), "malformed value-only null: null has no payload");
    }

    #[test]
    fn test_truncated_is_decode_error() {
        let err = GraphBinaryError::TruncatedInput {
            what: "Int",
            offset: 2,
            needed: 4,
            remaining: 1,
        };
        assert!(err.is_decode_error());
        assert_eq!(err.status_code(), StatusCode::UnexpectedEof);
        assert!(!GraphBinaryError::unsupported("Custom(point)").is_decode_error());
    }

    #[test]
    fn test_metrics_tags_include_runtime_type() {
        let err = GraphBinaryError::unsupported("Custom(point)");
        let tags = err.metrics_tags();
        assert!(tags
            .iter()
            .any(|(k, v)| *k == "runtime_type" && v == "Custom(point)"));
        assert_eq!(err.client_message(), "Cannot serialize Custom(point)");
    }

    /// Checks that every variant reports a code the enum can parse back, and
    /// that the variants cover every non-default code.
    #[test]
    fn test_every_variant_maps_to_a_live_code() {
        let errors = [
            GraphBinaryError::UnknownType { tag: 0x7F, offset: 0 },
            GraphBinaryError::unsupported("Custom(point)"),
            GraphBinaryError::TruncatedInput {
                what: "Int",
                offset: 0,
                needed: 4,
                remaining: 0,
            },
            GraphBinaryError::malformed("value", "nesting depth 65 exceeds 64"),
            GraphBinaryError::Registration {
                reason: "duplicate tag".into(),
            },
        ];
        let codes: Vec<StatusCode> = errors.iter().map(|e| e.status_code()).collect();
        for code in &codes {
            assert_eq!(StatusCode::from_u32(code.code()), Some(*code));
        }
        for expected in [
            StatusCode::UnknownType,
            StatusCode::Unsupported,
            StatusCode::UnexpectedEof,
            StatusCode::InvalidData,
            StatusCode::AlreadyExists,
        ] {
            assert!(codes.contains(&expected), "{expected} is never produced");
        }
        assert!(errors[2].status_code().is_retryable());
        assert!(errors.iter().all(|e| !e.status_code().is_critical()));
    }
}
