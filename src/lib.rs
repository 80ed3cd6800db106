/// Encoding engine: type tags, registry, reader, writer, buffers and the
/// per-type serializers.
pub mod codec;
/// Codec limits loaded from defaults and the environment.
pub mod config;
/// Console logging set-up (compact, pretty or JSON).
pub mod logging;
/// In-memory values: scalars, collections, graph structures, bytecode.
pub mod types;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Encoding engine and its convenience entry points.
pub use codec::{
    from_bytes, to_bytes, AllocatorMetrics, BufferAllocator, CompositeBufferBuilder, Cursor,
    CustomTypeSerializer, DataType, OutputBuffer, Reader, SerializerEntry, TypeRegistry,
    TypeRegistryBuilder, Writer,
};
/// Codec configuration.
pub use config::CodecConfig;
/// Error taxonomy shared with the error crate.
pub use graphbinary_error::{ErrorExt, GraphBinaryError, GraphBinaryResult, StatusCode};
/// Logging configuration and initialization.
pub use logging::{init_logging, LogFormat, LoggingConfig};
/// Values and domain structures.
pub use types::{
    BigDecimal, BigInteger, Binding, Bytecode, CustomValue, Edge, ElementRef, EnumKind, EnumValue,
    GDuration, Instruction, Lambda, Path, Predicate, Property, Traverser, Value, Vertex,
    VertexProperty,
};
