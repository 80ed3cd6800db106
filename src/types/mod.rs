//! In-memory values exchanged through the codec.
//!
//! - [`value`]: the closed [`Value`] union and its conversions
//! - [`bytecode`]: traversal programs and the process types used as
//!   arguments (bindings, lambdas, predicates, enumerations)
//! - [`graph`]: graph structures: vertices, edges, properties, paths
//! - [`numeric`]: arbitrary precision numbers and durations

pub mod bytecode;
pub mod graph;
pub mod numeric;
pub mod value;

pub use bytecode::*;
pub use graph::*;
pub use numeric::*;
pub use value::*;
