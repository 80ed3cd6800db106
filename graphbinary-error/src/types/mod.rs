pub mod codec;

// Public re-export of the error types from the nested modules.
pub use codec::*;
