pub mod settings;

pub use settings::{CodecConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PREALLOC};
