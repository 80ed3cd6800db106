//! GraphBinary encoding engine.
//!
//! Wire layout of a fully-qualified value:
//!
//! ```text
//! [type tag: u8][null flag: u8][value-only payload]
//! ```
//!
//! The payload is absent exactly when the flag is `0x01`. Lengths and counts
//! inside payloads are 4-byte big-endian signed integers.
//!
//! - [`tags`]: the type table
//! - [`cursor`]: bounded reads over the input
//! - [`buffer`]: output segments and the composite builder
//! - [`registry`]: tag to serializer dispatch
//! - [`reader`] / [`writer`]: the recursive decoder and encoder
//! - [`serializers`]: per-type payload codecs

pub mod buffer;
pub mod cursor;
pub mod reader;
pub mod registry;
pub mod serializers;
pub mod tags;
pub mod writer;

pub use buffer::{AllocatorMetrics, BufferAllocator, CompositeBufferBuilder, OutputBuffer, Segment};
pub use cursor::Cursor;
pub use reader::Reader;
pub use registry::{
    CustomTypeSerializer, ReadValueFn, SerializerEntry, TypeRegistry, TypeRegistryBuilder,
    WriteValueFn,
};
pub use tags::{DataType, VALUE_FLAG_NULL, VALUE_FLAG_PRESENT};
pub use writer::Writer;

use graphbinary_error::{GraphBinaryError, GraphBinaryResult};

use crate::types::Value;

/// Encodes `value` fully-qualified with the global registry.
pub fn to_bytes(value: &Value) -> GraphBinaryResult<Vec<u8>> {
    let mut writer = Writer::new(TypeRegistry::global());
    let out = writer.encode(value)?;
    Ok(out.to_vec())
}

/// Decodes exactly one fully-qualified value with the global registry.
/// Bytes left over after the value are an error.
pub fn from_bytes(bytes: &[u8]) -> GraphBinaryResult<Value> {
    let mut reader = Reader::new(TypeRegistry::global());
    let mut cursor = Cursor::new(bytes);
    let value = reader.decode(&mut cursor)?;
    if !cursor.is_exhausted() {
        return Err(GraphBinaryError::malformed(
            "message",
            format!("{} trailing bytes after value", cursor.remaining()),
        )
        .with_offset(cursor.position()));
    }
    Ok(value)
}
