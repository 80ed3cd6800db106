//! Proptest strategies for every `Value` variant.
//!
//! Floats are never NaN so that `PartialEq` holds across a round trip; dates
//! carry millisecond precision because that is all the wire keeps.

#![allow(dead_code)]

use bytes::Bytes;
use chrono::DateTime;
use graphbinary::{
    BigDecimal, BigInteger, Binding, Bytecode, DataType, Edge, ElementRef, EnumKind, EnumValue,
    GDuration, Instruction, Lambda, Path, Predicate, Property, Traverser, Value, Vertex,
    VertexProperty,
};
use proptest::{collection::vec, prelude::*, sample::select};
use uuid::Uuid;

/// Millis within ±300 years of the epoch.
const MILLIS_RANGE: std::ops::Range<i64> = -9_500_000_000_000..9_500_000_000_000;

pub fn label_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,12}"
}

pub fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9 ]{1,24}",
        // multi-byte UTF-8
        "[¢€हÄß😀]{1,8}",
    ]
}

pub fn comparable_f64() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(-0.0),
        Just(f64::MAX),
        Just(f64::MIN_POSITIVE),
        Just(f64::INFINITY),
        proptest::num::f64::NORMAL | proptest::num::f64::SUBNORMAL,
    ]
}

pub fn comparable_f32() -> impl Strategy<Value = f32> {
    prop_oneof![
        Just(0.0f32),
        Just(f32::NEG_INFINITY),
        proptest::num::f32::NORMAL | proptest::num::f32::SUBNORMAL,
    ]
}

pub fn enum_strategy() -> impl Strategy<Value = EnumValue> {
    (select(EnumKind::ALL.to_vec()), label_strategy())
        .prop_map(|(kind, name)| EnumValue::new(kind, name))
}

/// Typed nulls of a representative set of types, including the untyped one.
pub fn null_strategy() -> impl Strategy<Value = Value> {
    select(vec![
        DataType::UnspecifiedNull,
        DataType::Int,
        DataType::String,
        DataType::List,
        DataType::Map,
        DataType::Vertex,
        DataType::Bytecode,
        DataType::Direction,
        DataType::Char,
        DataType::Duration,
    ])
    .prop_map(Value::Null)
}

pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::Int),
        any::<i64>().prop_map(Value::Long),
        text_strategy().prop_map(Value::String),
        MILLIS_RANGE.prop_filter_map("date out of range", |ms| {
            DateTime::from_timestamp_millis(ms).map(Value::Date)
        }),
        MILLIS_RANGE.prop_filter_map("timestamp out of range", |ms| {
            DateTime::from_timestamp_millis(ms).map(Value::Timestamp)
        }),
        "[a-z]{1,6}(\\.[a-z]{1,6}){0,3}\\.[A-Z][a-zA-Z]{0,10}".prop_map(Value::Class),
        comparable_f64().prop_map(Value::Double),
        comparable_f32().prop_map(Value::Float),
        any::<u128>().prop_map(|n| Value::Uuid(Uuid::from_u128(n))),
        enum_strategy().prop_map(Value::Enum),
        ("[a-z]{1,8}", "[a-z.()_ ]{0,24}", -1i32..4)
            .prop_map(|(lang, script, n)| Value::Lambda(Lambda::new(lang, script, n))),
        any::<i64>().prop_map(|n| Value::BigInteger(BigInteger::from(n))),
        (any::<i64>(), -20i32..20)
            .prop_map(|(n, scale)| Value::BigDecimal(BigDecimal::new(n, scale))),
        any::<i8>().prop_map(Value::Byte),
        vec(any::<u8>(), 0..64).prop_map(|b| Value::ByteBuffer(Bytes::from(b))),
        any::<i16>().prop_map(Value::Short),
        any::<bool>().prop_map(Value::Boolean),
        any::<char>().prop_map(Value::Char),
        (any::<i64>(), 0..GDuration::NANOS_PER_SECOND).prop_filter_map(
            "valid duration",
            |(s, n)| GDuration::new(s, n).ok().map(Value::Duration)
        ),
        null_strategy(),
    ]
}

fn instruction_strategy(inner: BoxedStrategy<Value>) -> impl Strategy<Value = Instruction> {
    (label_strategy(), vec(inner, 0..4)).prop_map(|(op, args)| Instruction::new(op, args))
}

fn vertex_property_strategy(inner: BoxedStrategy<Value>) -> impl Strategy<Value = VertexProperty> {
    (any::<i64>(), label_strategy(), inner)
        .prop_map(|(id, label, value)| VertexProperty::new(Value::Long(id), label, value))
}

fn path_strategy(inner: BoxedStrategy<Value>) -> impl Strategy<Value = Path> {
    vec((inner, vec(label_strategy(), 0..3)), 0..4).prop_map(|steps| {
        let mut path = Path::default();
        for (object, labels) in steps {
            path.push(object, labels);
        }
        path
    })
}

/// Any value, nested at most `depth` composite levels deep.
pub fn value_strategy_with_depth(depth: u32) -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(depth, 64, 6, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..6).prop_map(Value::List),
            vec(inner.clone(), 0..6).prop_map(Value::Set),
            vec((inner.clone(), inner.clone()), 0..5).prop_map(Value::Map),
            vec((inner.clone(), 1i64..1_000), 0..4).prop_map(Value::BulkSet),
            (any::<i64>(), inner.clone())
                .prop_map(|(bulk, v)| Value::Traverser(Traverser::new(bulk, v))),
            (label_strategy(), inner.clone())
                .prop_map(|(key, v)| Value::Binding(Binding::new(key, v))),
            (label_strategy(), vec(inner.clone(), 0..3))
                .prop_map(|(op, vs)| Value::P(Predicate::new(op, vs))),
            (label_strategy(), vec(inner.clone(), 0..3))
                .prop_map(|(op, vs)| Value::TextP(Predicate::new(op, vs))),
            (
                vec(instruction_strategy(inner.clone()), 0..4),
                vec(instruction_strategy(inner.clone()), 0..2),
            )
                .prop_map(|(steps, sources)| Value::Bytecode(Bytecode { steps, sources })),
            (
                inner.clone(),
                label_strategy(),
                vec(vertex_property_strategy(inner.clone()), 0..3),
            )
                .prop_map(|(id, label, properties)| {
                    let mut vertex = Vertex::new(id, label);
                    vertex.properties = properties;
                    Value::Vertex(vertex)
                }),
            (
                inner.clone(),
                label_strategy(),
                (any::<i64>(), label_strategy()),
                (any::<i64>(), label_strategy()),
            )
                .prop_map(|(id, label, (out_id, out_l), (in_id, in_l))| {
                    Value::Edge(Edge::new(
                        id,
                        label,
                        ElementRef::new(out_id, out_l),
                        ElementRef::new(in_id, in_l),
                    ))
                }),
            vertex_property_strategy(inner.clone()).prop_map(Value::VertexProperty),
            (label_strategy(), inner.clone())
                .prop_map(|(k, v)| Value::Property(Property::new(k, v))),
            path_strategy(inner).prop_map(Value::Path),
        ]
    })
}

pub fn value_strategy() -> impl Strategy<Value = Value> {
    value_strategy_with_depth(3)
}

/// Bytecode whose arguments are arbitrary values.
pub fn bytecode_strategy() -> impl Strategy<Value = Bytecode> {
    let arg = value_strategy_with_depth(2).boxed();
    (
        vec(instruction_strategy(arg.clone()), 0..6),
        vec(instruction_strategy(arg), 0..3),
    )
        .prop_map(|(steps, sources)| Bytecode { steps, sources })
}
