use graphbinary_error::GraphBinaryResult;

use super::mismatch;
use crate::{
    codec::{Cursor, DataType, OutputBuffer, Reader, SerializerEntry, Writer},
    types::Value,
};

pub(super) const ENTRIES: &[SerializerEntry] = &[
    SerializerEntry::new(DataType::List, write_list, read_list),
    SerializerEntry::new(DataType::Set, write_list, read_list),
    SerializerEntry::new(DataType::Map, write_map, read_map),
    SerializerEntry::new(DataType::BulkSet, write_bulk_set, read_bulk_set),
];

fn write_list(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    match v {
        Value::List(items) | Value::Set(items) => write_items(items, w),
        other => Err(mismatch(other.data_type(), other)),
    }
}

/// `{count}{fq item}...`, the payload of List and Set.
pub(crate) fn write_items(
    items: &[Value],
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    w.composite(1 + items.len(), |w, b| {
        b.append_buffer(w.write_count(items.len(), "List length")?);
        for item in items {
            b.append_buffer(w.encode(item)?);
        }
        Ok(())
    })
}

fn read_list(
    dt: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let len = c.read_length("List length")?;
    let items = r.decode_many(len, c)?;
    Ok(match dt {
        DataType::Set => Value::Set(items),
        _ => Value::List(items),
    })
}

fn write_map(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::Map(entries) = v else {
        return Err(mismatch(DataType::Map, v));
    };
    w.composite(1 + 2 * entries.len(), |w, b| {
        b.append_buffer(w.write_count(entries.len(), "Map length")?);
        for (key, value) in entries {
            b.append_buffer(w.encode(key)?);
            b.append_buffer(w.encode(value)?);
        }
        Ok(())
    })
}

fn read_map(
    _: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let len = c.read_length("Map length")?;
    let mut entries = Vec::with_capacity(r.capacity_hint(len));
    for _ in 0..len {
        let key = r.decode(c)?;
        let value = r.decode(c)?;
        entries.push((key, value));
    }
    Ok(Value::Map(entries))
}

fn write_bulk_set(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::BulkSet(entries) = v else {
        return Err(mismatch(DataType::BulkSet, v));
    };
    w.composite(1 + 2 * entries.len(), |w, b| {
        b.append_buffer(w.write_count(entries.len(), "BulkSet length")?);
        for (value, bulk) in entries {
            b.append_buffer(w.encode(value)?);
            b.append_buffer(w.write_long(*bulk));
        }
        Ok(())
    })
}

fn read_bulk_set(
    _: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let len = c.read_length("BulkSet length")?;
    let mut entries = Vec::with_capacity(r.capacity_hint(len));
    for _ in 0..len {
        let value = r.decode(c)?;
        let bulk = c.read_i64("BulkSet bulk")?;
        entries.push((value, bulk));
    }
    Ok(Value::BulkSet(entries))
}

#[cfg(test)]
mod tests {
    use graphbinary_error::GraphBinaryError;

    use super::*;
    use crate::codec::{from_bytes, to_bytes, TypeRegistry};

    #[test]
    fn test_list_layout() {
        let v = Value::List(vec![Value::Int(1), Value::Null(DataType::String)]);
        let bytes = to_bytes(&v).unwrap();
        assert_eq!(
            bytes,
            vec![0x09, 0x00, 0, 0, 0, 2, 0x01, 0x00, 0, 0, 0, 1, 0x03, 0x01]
        );
        assert_eq!(from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn test_set_keeps_its_tag_and_order() {
        let v = Value::Set(vec![Value::from("b"), Value::from("a")]);
        let bytes = to_bytes(&v).unwrap();
        assert_eq!(bytes[0], 0x0B);
        assert_eq!(from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn test_map_preserves_insertion_order() {
        let v = Value::Map(vec![
            (Value::from("z"), Value::Int(1)),
            (Value::from("a"), Value::List(vec![])),
            (Value::Int(3), Value::NULL),
        ]);
        assert_eq!(from_bytes(&to_bytes(&v).unwrap()).unwrap(), v);
    }

    #[test]
    fn test_bulk_set_layout() {
        let v = Value::BulkSet(vec![(Value::from("x"), 3)]);
        let bytes = to_bytes(&v).unwrap();
        let mut expected = vec![0x2A, 0x00, 0, 0, 0, 1, 0x03, 0x00, 0, 0, 0, 1, b'x'];
        expected.extend(3i64.to_be_bytes());
        assert_eq!(bytes, expected);
        assert_eq!(from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn test_negative_list_length_is_malformed() {
        let err = from_bytes(&[0x09, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, GraphBinaryError::MalformedValue { .. }));
        assert_eq!(err.offset(), Some(2));
    }

    /// Checks that the list writer reports the type it was dispatched for.
    #[test]
    fn test_list_writer_names_the_dispatched_type() {
        let registry = TypeRegistry::builder()
            .with_defaults()
            .without(DataType::Map)
            .register(SerializerEntry::new(DataType::Map, write_list, read_list))
            .build()
            .unwrap();
        let mut w = Writer::new(&registry);
        let err = w.encode(&Value::Map(vec![])).unwrap_err();
        assert!(matches!(err, GraphBinaryError::UnsupportedType { .. }));
        assert!(err.to_string().contains("serializer for Map"), "got: {err}");
        assert!(!err.to_string().contains("List"), "got: {err}");
    }
}
