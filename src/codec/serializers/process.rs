//! Traversal process types: bindings, lambdas, predicates, traversers and
//! the enumeration families.

use graphbinary_error::{GraphBinaryError, GraphBinaryResult};

use super::mismatch;
use crate::{
    codec::{Cursor, DataType, OutputBuffer, Reader, SerializerEntry, Writer},
    types::{Binding, EnumKind, EnumValue, Lambda, Predicate, Traverser, Value},
};

pub(super) const ENTRIES: &[SerializerEntry] = &[
    SerializerEntry::new(DataType::Binding, write_binding, read_binding),
    SerializerEntry::new(DataType::Lambda, write_lambda, read_lambda),
    SerializerEntry::new(DataType::P, write_predicate, read_predicate),
    SerializerEntry::new(DataType::TextP, write_predicate, read_predicate),
    SerializerEntry::new(DataType::Traverser, write_traverser, read_traverser),
    SerializerEntry::new(DataType::Barrier, write_enum, read_enum),
    SerializerEntry::new(DataType::Cardinality, write_enum, read_enum),
    SerializerEntry::new(DataType::Column, write_enum, read_enum),
    SerializerEntry::new(DataType::Direction, write_enum, read_enum),
    SerializerEntry::new(DataType::Operator, write_enum, read_enum),
    SerializerEntry::new(DataType::Order, write_enum, read_enum),
    SerializerEntry::new(DataType::Pick, write_enum, read_enum),
    SerializerEntry::new(DataType::Pop, write_enum, read_enum),
    SerializerEntry::new(DataType::Scope, write_enum, read_enum),
    SerializerEntry::new(DataType::T, write_enum, read_enum),
];

fn write_binding(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::Binding(Binding { key, value }) = v else {
        return Err(mismatch(DataType::Binding, v));
    };
    w.composite(2, |w, b| {
        b.append_buffer(w.write_string(key)?);
        b.append_buffer(w.encode(value)?);
        Ok(())
    })
}

fn read_binding(
    _: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let key = c.read_string("Binding key")?;
    let value = r.decode(c)?;
    Ok(Value::Binding(Binding {
        key,
        value: Box::new(value),
    }))
}

fn write_lambda(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::Lambda(lambda) = v else {
        return Err(mismatch(DataType::Lambda, v));
    };
    w.composite(3, |w, b| {
        b.append_buffer(w.write_string(&lambda.language)?);
        b.append_buffer(w.write_string(&lambda.script)?);
        b.append_buffer(w.write_int(lambda.arguments));
        Ok(())
    })
}

fn read_lambda(
    _: DataType,
    c: &mut Cursor<'_>,
    _: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let language = c.read_string("Lambda language")?;
    let script = c.read_string("Lambda script")?;
    let arguments = c.read_i32("Lambda arguments")?;
    Ok(Value::Lambda(Lambda {
        language,
        script,
        arguments,
    }))
}

/// P and TextP: `{operator String}{count}{fq operand}...`.
fn write_predicate(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let (Value::P(p) | Value::TextP(p)) = v else {
        return Err(mismatch(v.data_type(), v));
    };
    w.composite(2 + p.values.len(), |w, b| {
        b.append_buffer(w.write_string(&p.operator)?);
        b.append_buffer(w.write_count(p.values.len(), "predicate operands")?);
        for operand in &p.values {
            b.append_buffer(w.encode(operand)?);
        }
        Ok(())
    })
}

fn read_predicate(
    dt: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let operator = c.read_string("predicate operator")?;
    let len = c.read_length("predicate operands")?;
    let values = r.decode_many(len, c)?;
    let p = Predicate { operator, values };
    Ok(match dt {
        DataType::TextP => Value::TextP(p),
        _ => Value::P(p),
    })
}

fn write_traverser(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::Traverser(Traverser { bulk, value }) = v else {
        return Err(mismatch(DataType::Traverser, v));
    };
    w.composite(2, |w, b| {
        b.append_buffer(w.write_long(*bulk));
        b.append_buffer(w.encode(value)?);
        Ok(())
    })
}

fn read_traverser(
    _: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let bulk = c.read_i64("Traverser bulk")?;
    let value = r.decode(c)?;
    Ok(Value::Traverser(Traverser {
        bulk,
        value: Box::new(value),
    }))
}

/// Enumeration members are written as a fully-qualified String name.
fn write_enum(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::Enum(e) = v else {
        return Err(mismatch(v.data_type(), v));
    };
    w.encode_with(DataType::String, |w| w.write_string(&e.name))
}

fn read_enum(
    dt: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let at = c.position();
    let kind = EnumKind::from_data_type(dt).ok_or_else(|| {
        GraphBinaryError::malformed(dt.name(), "not an enumeration type").with_offset(at)
    })?;
    let name = r.decode_string(c, "enumeration name")?;
    Ok(Value::Enum(EnumValue { kind, name }))
}
