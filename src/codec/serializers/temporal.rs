use chrono::{DateTime, Utc};
use graphbinary_error::{GraphBinaryError, GraphBinaryResult};

use super::mismatch;
use crate::{
    codec::{Cursor, DataType, OutputBuffer, Reader, SerializerEntry, Writer},
    types::{GDuration, Value},
};

const NANOS_PER_MILLI: u32 = 1_000_000;

pub(super) const ENTRIES: &[SerializerEntry] = &[
    SerializerEntry::new(DataType::Date, write_instant, read_instant),
    SerializerEntry::new(DataType::Timestamp, write_instant, read_instant),
    SerializerEntry::new(DataType::Duration, write_duration, read_duration),
];

/// Date and Timestamp share the layout: milliseconds since the epoch.
fn write_instant(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let (Value::Date(at) | Value::Timestamp(at)) = v else {
        return Err(mismatch(v.data_type(), v));
    };
    // The wire keeps whole milliseconds.
    let sub_millis = at.timestamp_subsec_nanos() % NANOS_PER_MILLI;
    if sub_millis != 0 {
        return Err(GraphBinaryError::malformed(
            v.data_type().name(),
            format!("{at} has {sub_millis} ns below millisecond precision"),
        ));
    }
    Ok(w.write_long(at.timestamp_millis()))
}

fn read_instant(
    dt: DataType,
    c: &mut Cursor<'_>,
    _: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let at = c.position();
    let millis = c.read_i64(dt.name())?;
    let instant = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        GraphBinaryError::malformed(dt.name(), format!("{millis} ms is out of range"))
            .with_offset(at)
    })?;
    Ok(match dt {
        DataType::Timestamp => Value::Timestamp(instant),
        _ => Value::Date(instant),
    })
}

fn write_duration(
    v: &Value,
    w: &mut Writer<'_>,
) -> GraphBinaryResult<OutputBuffer> {
    let Value::Duration(d) = v else {
        return Err(mismatch(DataType::Duration, v));
    };
    // Same range check the reader applies.
    let d = GDuration::new(d.seconds, d.nanos)?;
    Ok(w.scalar(12, |seg| {
        seg.put_i64(d.seconds);
        seg.put_i32(d.nanos);
    }))
}

fn read_duration(
    _: DataType,
    c: &mut Cursor<'_>,
    _: &mut Reader<'_>,
) -> GraphBinaryResult<Value> {
    let seconds = c.read_i64("Duration seconds")?;
    let at = c.position();
    let nanos = c.read_i32("Duration nanos")?;
    GDuration::new(seconds, nanos)
        .map(Value::Duration)
        .map_err(|e| e.with_offset(at))
}
