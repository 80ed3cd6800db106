//! Type tags of the GraphBinary format.
//!
//! Each wire value is prefixed by a single byte naming its type. [`DataType`]
//! is the only place where tag values are defined; the registry, the reader
//! and the writer all go through it.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{EnumIter, IntoStaticStr};

/// Null flag: a payload follows.
pub const VALUE_FLAG_PRESENT: u8 = 0x00;
/// Null flag: the value is null, no payload follows.
pub const VALUE_FLAG_NULL: u8 = 0x01;

/// One-byte type discriminator of a fully-qualified value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, IntoStaticStr, EnumIter,
)]
#[repr(u8)]
pub enum DataType {
    Custom = 0x00,
    Int = 0x01,
    Long = 0x02,
    String = 0x03,
    Date = 0x04,
    Timestamp = 0x05,
    Class = 0x06,
    Double = 0x07,
    Float = 0x08,
    List = 0x09,
    Map = 0x0A,
    Set = 0x0B,
    Uuid = 0x0C,
    Edge = 0x0D,
    Path = 0x0E,
    Property = 0x0F,
    Vertex = 0x11,
    VertexProperty = 0x12,
    Barrier = 0x13,
    Binding = 0x14,
    Bytecode = 0x15,
    Cardinality = 0x16,
    Column = 0x17,
    Direction = 0x18,
    Operator = 0x19,
    Order = 0x1A,
    Pick = 0x1B,
    Pop = 0x1C,
    Lambda = 0x1D,
    P = 0x1E,
    Scope = 0x1F,
    T = 0x20,
    Traverser = 0x21,
    BigDecimal = 0x22,
    BigInteger = 0x23,
    Byte = 0x24,
    ByteBuffer = 0x25,
    Short = 0x26,
    Boolean = 0x27,
    TextP = 0x28,
    BulkSet = 0x2A,
    Char = 0x80,
    Duration = 0x81,
    UnspecifiedNull = 0xFE,
}

impl DataType {
    /// Wire byte of this type.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Resolves a wire byte; `None` for bytes outside the type table.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::try_from(tag).ok()
    }

    /// Variant name, used in error messages and logs.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for DataType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), self.tag())
    }
}
