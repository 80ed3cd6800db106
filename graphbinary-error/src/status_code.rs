use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "serde_repr")]
use serde_repr::{Deserialize_repr, Serialize_repr};
#[cfg(feature = "strum_macros")]
use strum_macros::{AsRefStr, EnumIter};

/// Status codes used to categorise codec errors.
///
/// # Ranges
/// - 0xxx: success
/// - 1xxx: general errors (unsupported runtime types, internal faults)
/// - 2xxx: data errors
/// - 6xxx: input exhaustion
/// - 8xxx: wire protocol errors
///
/// # Implementation
/// - `num_enum::TryFromPrimitive` gives a native `TryFrom<u32>`, handy when a
///   code travels inside a server response.
/// - optional: `strum` for `AsRefStr`/`EnumIter` (feature = "strum_macros").
/// - optional: `serde_repr` to serialise as the numeric value
///   (feature = "serde_repr").
#[cfg_attr(feature = "strum_macros", derive(AsRefStr, EnumIter))]
#[cfg_attr(feature = "serde_repr", derive(Serialize_repr, Deserialize_repr))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Success ===
    Success = 0,

    // === 1xxx: General ===
    /// No serializer for a runtime value.
    Unsupported = 1001,
    /// Default for errors that do not pick a code.
    Internal = 1003,

    // === 2xxx: Data ===
    /// Conflicting registration.
    AlreadyExists = 2001,
    /// A decoded or encoded field outside its domain.
    InvalidData = 2009,

    // === 6xxx: Input ===
    UnexpectedEof = 6007,

    // === 8xxx: Protocol ===
    /// Tag byte outside the registered type table.
    UnknownType = 8012,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Inherent methods
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Numeric representation of the status code.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Tries to obtain a `StatusCode` variant from a `u32`.
    ///
    /// Uses `TryFrom<u32>` from `num_enum`; returns `None` when the value
    /// does not match any variant.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// Returns `true` if `code` denotes a successful result.
    pub fn is_success(code: u32) -> bool {
        Self::Success as u32 == code
    }

    /// The problem lies in the data handed to the codec (2xxx), or in a value
    /// the caller asked to encode.
    pub fn is_client_error(&self) -> bool {
        (2000..=2999).contains(&self.code()) || matches!(self, Self::Unsupported)
    }

    /// Protocol error (8xxx range).
    pub fn is_protocol_error(&self) -> bool {
        (8000..=8999).contains(&self.code())
    }

    /// Whether the error points at a bug rather than at bad input.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Internal)
    }

    /// Only exhausted input can succeed on a later attempt, once more bytes
    /// have arrived.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UnexpectedEof)
    }

    /// Recommended log level for this code.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::AlreadyExists => LogLevel::Debug,
            Self::InvalidData | Self::UnexpectedEof => LogLevel::Info,
            Self::Internal => LogLevel::Error,
            Self::Unsupported | Self::UnknownType => LogLevel::Warn,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Common trait implementations for StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        #[cfg(feature = "strum_macros")]
        {
            write!(f, "{} ({})", self.as_ref(), self.code())
        }
        #[cfg(not(feature = "strum_macros"))]
        {
            write!(f, "{:?} ({})", self, self.code())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
