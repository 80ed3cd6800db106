use bytes::Bytes;
use graphbinary_error::{GraphBinaryError, GraphBinaryResult};
use uuid::Uuid;

use super::mismatch;
use crate::{
    codec::{Cursor, DataType, OutputBuffer, Reader, SerializerEntry, Writer},
    types::{BigDecimal, BigInteger, Value},
};

pub(super) const ENTRIES: &[SerializerEntry] = &[
    SerializerEntry::new(DataType::Int, write_int, read_int),
    SerializerEntry::new(DataType::Long, write_long, read_long),
    SerializerEntry::new(DataType::String, write_string, read_string),
    SerializerEntry::new(DataType::Class, write_class, read_class),
    SerializerEntry::new(DataType::Double, write_double, read_double),
    SerializerEntry::new(DataType::Float, write_float, read_float),
    SerializerEntry::new(DataType::Uuid, write_uuid, read_uuid),
    SerializerEntry::new(DataType::BigDecimal, write_big_decimal, read_big_decimal),
    SerializerEntry::new(DataType::BigInteger, write_big_integer, read_big_integer),
    SerializerEntry::new(DataType::Byte, write_byte, read_byte),
    SerializerEntry::new(DataType::ByteBuffer, write_byte_buffer, read_byte_buffer),
    SerializerEntry::new(DataType::Short, write_short, read_short),
    SerializerEntry::new(DataType::Boolean, write_boolean, read_boolean),
    SerializerEntry::new(DataType::Char, write_char, read_char),
    SerializerEntry::new(DataType::UnspecifiedNull, write_null, read_null),
];

macro_rules! fixed_width {
    ($write:ident, $read:ident, $variant:ident, $width:expr, $put:ident, $get:ident) => {
        fn $write(
            v: &Value,
            w: &mut Writer<'_>,
        ) -> GraphBinaryResult<OutputBuffer> {
            match v {
                Value::$variant(x) => Ok(w.scalar($width, |seg| seg.$put(*x))),
                other => Err(mismatch(DataType::$variant, other)),
            }
        }

        fn $read(
            _: DataType,
            c: &mut Cursor<'_>,
            _: &mut Reader<'_>,
        ) -> GraphBinaryResult<Value> {
            c.$get(stringify!($variant)).map(Value::$variant)
        }
    };
}

fixed_width!(write_int, read_int, Int, 4, put_i32, read_i32);
fixed_width!(write_long, read_long, Long, 8, put_i64, read_i64);
fixed_width!(write_double, read_double, Double, 8, put_f64, read_f64);
fixed_width!(write_float, read_float, Float, 4, put_f32, read_f32);
fixed_width!(write_byte, read_byte, Byte, 1, put_i8, read_i8);
fixed_width!(write_short, read_short, Short, 2, put_i16, read_i16);

fn write_string(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    match v {
        Value::String(s) => w.write_string(s),
        other => Err(mismatch(DataType::String, other)),
    }
}

fn read_string(
    _: DataType,
    c: &mut Cursor<'_>,
    _: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    c.read_string("String").map(Value::String)
}

fn write_class(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    match v {
        Value::Class(name) => w.write_string(name),
        other => Err(mismatch(DataType::Class, other)),
    }
}

fn read_class(
    _: DataType,
    c: &mut Cursor<'_>,
    _: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    c.read_string("Class").map(Value::Class)
}

fn write_uuid(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    match v {
        Value::Uuid(id) => Ok(w.scalar(16, |seg| seg.put_slice(id.as_bytes()))),
        other => Err(mismatch(DataType::Uuid, other)),
    }
}

fn read_uuid(
    _: DataType,
    c: &mut Cursor<'_>,
    _: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let at = c.position();
    let bytes = c.read_bytes(16, "Uuid")?;
    Uuid::from_slice(bytes)
        .map(Value::Uuid)
        .map_err(|e| GraphBinaryError::malformed("Uuid", e.to_string()).with_offset(at))
}

fn write_big_integer(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    match v {
        Value::BigInteger(big) => w.write_bytes(big.as_be_bytes(), "BigInteger"),
        other => Err(mismatch(DataType::BigInteger, other)),
    }
}

fn read_big_integer(
    _: DataType,
    c: &mut Cursor<'_>,
    _: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    big_integer(c).map(Value::BigInteger)
}

fn big_integer(c: &mut Cursor<'_>) -> GraphBinaryResult<BigInteger> {
    let len = c.read_length("BigInteger length")?;
    let at = c.position();
    let bytes = c.read_bytes(len, "BigInteger")?;
    BigInteger::from_be_bytes(bytes).map_err(|e| e.with_offset(at))
}

fn write_big_decimal(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::BigDecimal(d) = v else {
        return Err(mismatch(DataType::BigDecimal, v));
    };
    let magnitude = d.unscaled.as_be_bytes();
    let len = i32::try_from(magnitude.len())
        .map_err(|_| GraphBinaryError::malformed("BigDecimal", "magnitude exceeds i32::MAX"))?;
    Ok(w.scalar(8 + magnitude.len(), |seg| {
        seg.put_i32(d.scale);
        seg.put_i32(len);
        seg.put_slice(magnitude);
    }))
}

fn read_big_decimal(
    _: DataType,
    c: &mut Cursor<'_>,
    _: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let scale = c.read_i32("BigDecimal scale")?;
    let unscaled = big_integer(c)?;
    Ok(Value::BigDecimal(BigDecimal { scale, unscaled }))
}

fn write_byte_buffer(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    match v {
        Value::ByteBuffer(bytes) => w.write_bytes(bytes, "ByteBuffer"),
        other => Err(mismatch(DataType::ByteBuffer, other)),
    }
}

fn read_byte_buffer(
    _: DataType,
    c: &mut Cursor<'_>,
    _: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let len = c.read_length("ByteBuffer length")?;
    let bytes = c.read_bytes(len, "ByteBuffer")?;
    Ok(Value::ByteBuffer(Bytes::copy_from_slice(bytes)))
}

fn write_boolean(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    match v {
        Value::Boolean(b) => Ok(w.scalar(1, |seg| seg.put_u8(u8::from(*b)))),
        other => Err(mismatch(DataType::Boolean, other)),
    }
}

fn read_boolean(
    _: DataType,
    c: &mut Cursor<'_>,
    _: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let at = c.position();
    match c.read_u8("Boolean")? {
        0x00 => Ok(Value::Boolean(false)),
        0x01 => Ok(Value::Boolean(true)),
        other => Err(GraphBinaryError::malformed(
            "Boolean",
            format!("expected 0x00 or 0x01, found 0x{other:02X}"),
        )
        .with_offset(at)),
    }
}

/// Chars travel as their bare UTF-8 encoding, 1 to 4 bytes.
fn write_char(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::Char(ch) = v else {
        return Err(mismatch(DataType::Char, v));
    };
    let mut buf = [0u8; 4];
    let encoded = ch.encode_utf8(&mut buf);
    Ok(w.scalar(encoded.len(), |seg| seg.put_slice(encoded.as_bytes())))
}

fn read_char(
    _: DataType,
    c: &mut Cursor<'_>,
    _: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let at = c.position();
    let lead = c.read_u8("Char")?;
    let width = utf8_width(lead).ok_or_else(|| {
        GraphBinaryError::malformed("Char", format!("invalid UTF-8 lead byte 0x{lead:02X}"))
            .with_offset(at)
    })?;

    let mut buf = [lead, 0, 0, 0];
    buf[1..width].copy_from_slice(c.read_bytes(width - 1, "Char")?);
    std::str::from_utf8(&buf[..width])
        .ok()
        .and_then(|s| s.chars().next())
        .map(Value::Char)
        .ok_or_else(|| {
            GraphBinaryError::malformed("Char", "invalid UTF-8 sequence").with_offset(at)
        })
}

fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None,
    }
}

fn write_null(
    v: &Value,
    _: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    Err(mismatch(DataType::UnspecifiedNull, v))
}

fn read_null(
    _: DataType,
    c: &mut Cursor<'_>,
    _: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    Err(
        GraphBinaryError::malformed("UnspecifiedNull", "untyped null cannot carry a payload")
            .with_offset(c.position()),
    )
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
