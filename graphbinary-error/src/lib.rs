pub mod ext;
pub mod status_code;
pub mod types;

// Publicly re-export all error types and functions from the submodules to
// simplify access from external code.
pub use ext::*;
pub use status_code::*;
pub use types::*;

/// Result alias used by every codec operation.
pub type GraphBinaryResult<T> = Result<T, GraphBinaryError>;
