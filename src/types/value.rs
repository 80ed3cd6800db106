use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{
    BigDecimal, BigInteger, Binding, Bytecode, Edge, EnumValue, GDuration, Lambda, Path,
    Predicate, Property, Traverser, Vertex, VertexProperty,
};
use crate::codec::DataType;

/// Any datum that can travel over the wire.
///
/// Every variant maps onto exactly one [`DataType`]; enumeration-like types
/// share [`Value::Enum`] and carry their own kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null typed by the serializer that would own a present value.
    Null(DataType),
    Int(i32),
    Long(i64),
    String(String),
    Date(DateTime<Utc>),
    Timestamp(DateTime<Utc>),
    /// Fully qualified class name.
    Class(String),
    Double(f64),
    Float(f32),
    List(Vec<Value>),
    /// Entries in insertion order.
    Map(Vec<(Value, Value)>),
    /// Members in insertion order.
    Set(Vec<Value>),
    Uuid(Uuid),
    Edge(Edge),
    Path(Path),
    Property(Property),
    Vertex(Vertex),
    VertexProperty(VertexProperty),
    Enum(EnumValue),
    Binding(Binding),
    Bytecode(Bytecode),
    Lambda(Lambda),
    P(Predicate),
    TextP(Predicate),
    Traverser(Traverser),
    BigDecimal(BigDecimal),
    BigInteger(BigInteger),
    Byte(i8),
    ByteBuffer(Bytes),
    Short(i16),
    Boolean(bool),
    /// Distinct values with their multiplicity.
    BulkSet(Vec<(Value, i64)>),
    Char(char),
    Duration(GDuration),
    Custom(CustomValue),
}

/// Value of an application-defined type, handled by a serializer registered
/// under `type_name`.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomValue {
    pub type_name: String,
    pub value: Box<Value>,
}

impl CustomValue {
    pub fn new(
        type_name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            value: Box::new(value.into()),
        }
    }
}

impl Value {
    /// Untyped null (`0xFE`).
    pub const NULL: Value = Value::Null(DataType::UnspecifiedNull);

    /// Runtime type of the value, i.e. the tag it is written with.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null(dt) => *dt,
            Value::Int(_) => DataType::Int,
            Value::Long(_) => DataType::Long,
            Value::String(_) => DataType::String,
            Value::Date(_) => DataType::Date,
            Value::Timestamp(_) => DataType::Timestamp,
            Value::Class(_) => DataType::Class,
            Value::Double(_) => DataType::Double,
            Value::Float(_) => DataType::Float,
            Value::List(_) => DataType::List,
            Value::Map(_) => DataType::Map,
            Value::Set(_) => DataType::Set,
            Value::Uuid(_) => DataType::Uuid,
            Value::Edge(_) => DataType::Edge,
            Value::Path(_) => DataType::Path,
            Value::Property(_) => DataType::Property,
            Value::Vertex(_) => DataType::Vertex,
            Value::VertexProperty(_) => DataType::VertexProperty,
            Value::Enum(e) => e.kind.data_type(),
            Value::Binding(_) => DataType::Binding,
            Value::Bytecode(_) => DataType::Bytecode,
            Value::Lambda(_) => DataType::Lambda,
            Value::P(_) => DataType::P,
            Value::TextP(_) => DataType::TextP,
            Value::Traverser(_) => DataType::Traverser,
            Value::BigDecimal(_) => DataType::BigDecimal,
            Value::BigInteger(_) => DataType::BigInteger,
            Value::Byte(_) => DataType::Byte,
            Value::ByteBuffer(_) => DataType::ByteBuffer,
            Value::Short(_) => DataType::Short,
            Value::Boolean(_) => DataType::Boolean,
            Value::BulkSet(_) => DataType::BulkSet,
            Value::Char(_) => DataType::Char,
            Value::Duration(_) => DataType::Duration,
            Value::Custom(_) => DataType::Custom,
        }
    }

    /// Human readable runtime type, as reported in encode errors.
    pub fn type_name(&self) -> String {
        match self {
            Value::Custom(c) => format!("Custom({})", c.type_name),
            Value::Null(dt) => format!("Null({})", dt.name()),
            other => other.data_type().name().to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_value! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    bool => Boolean,
    char => Char,
    String => String,
    Uuid => Uuid,
    Bytes => ByteBuffer,
    Vec<Value> => List,
    Bytecode => Bytecode,
    Vertex => Vertex,
    Edge => Edge,
    Path => Path,
    Property => Property,
    VertexProperty => VertexProperty,
    Traverser => Traverser,
    Binding => Binding,
    Lambda => Lambda,
    EnumValue => Enum,
    BigInteger => BigInteger,
    BigDecimal => BigDecimal,
    GDuration => Duration,
    CustomValue => Custom,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    /// `None` becomes the untyped null.
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::NULL, Into::into)
    }
}
