//! Value-only codecs of the built-in types.
//!
//! Each submodule exposes an `ENTRIES` table; [`default_entries`] stitches
//! them into the registry's default set.

pub mod bytecode;
pub mod collection;
pub mod custom;
pub mod graph;
pub mod process;
pub mod scalar;
pub mod temporal;

pub use bytecode::{read_bytecode, write_bytecode};
use graphbinary_error::GraphBinaryError;

use super::{DataType, SerializerEntry};
use crate::types::Value;

/// Every built-in serializer, one per tag.
pub fn default_entries() -> Vec<SerializerEntry> {
    [
        scalar::ENTRIES,
        temporal::ENTRIES,
        collection::ENTRIES,
        graph::ENTRIES,
        process::ENTRIES,
        bytecode::ENTRIES,
        custom::ENTRIES,
    ]
    .concat()
}

/// A serializer was handed a value of another runtime type.
fn mismatch(
    expected: DataType,
    found: &Value,
) -> GraphBinaryError {
    GraphBinaryError::unsupported(format!(
        "{} (serializer for {} cannot write it)",
        found.type_name(),
        expected.name()
    ))
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashSet;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_default_entries_are_unique_and_complete() {
        let entries = default_entries();
        let tags: FxHashSet<u8> = entries.iter().map(|e| e.data_type.tag()).collect();
        assert_eq!(tags.len(), entries.len(), "duplicate tag in defaults");
        assert_eq!(entries.len(), DataType::iter().count());
    }
}
