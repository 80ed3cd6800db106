use graphbinary_error::GraphBinaryResult;

use super::mismatch;
use crate::{
    codec::{Cursor, DataType, OutputBuffer, Reader, SerializerEntry, Writer},
    types::{CustomValue, Value},
};

pub(super) const ENTRIES: &[SerializerEntry] =
    &[SerializerEntry::new(DataType::Custom, write_custom, read_custom)];

/// `{type name String}{payload of the named serializer}`.
fn write_custom(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::Custom(custom) = v else {
        return Err(mismatch(DataType::Custom, v));
    };
    let serializer = w.registry().custom_serializer(&custom.type_name)?;
    w.composite(2, |w, b| {
        b.append_buffer(w.write_string(&custom.type_name)?);
        b.append_buffer(serializer.write_value(&custom.value, w)?);
        Ok(())
    })
}

fn read_custom(
    _: DataType,
    c: &mut Cursor<'_>,
    r: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let type_name = c.read_string("Custom type name")?;
    let serializer = r.registry().custom_serializer(&type_name)?;
    let value = serializer.read_value(c, r)?;
    Ok(Value::Custom(CustomValue {
        type_name,
        value: Box::new(value),
    }))
}
