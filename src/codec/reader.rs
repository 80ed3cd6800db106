use graphbinary_error::{ErrorExt, GraphBinaryError, GraphBinaryResult};
use tracing::{debug, trace};

use super::{Cursor, DataType, TypeRegistry, VALUE_FLAG_NULL, VALUE_FLAG_PRESENT};
use crate::{config::CodecConfig, types::Value};

/// Recursive decoder.
///
/// Decoded values own copies of their data; nothing borrows from the input.
/// On failure no partially decoded value escapes.
#[derive(Debug)]
pub struct Reader<'r> {
    registry: &'r TypeRegistry,
    max_depth: usize,
    max_prealloc: usize,
    depth: usize,
}

impl<'r> Reader<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_config(registry, &CodecConfig::default())
    }

    pub fn with_config(
        registry: &'r TypeRegistry,
        config: &CodecConfig,
    ) -> Self {
        Self {
            registry,
            max_depth: config.max_depth,
            max_prealloc: config.max_prealloc,
            depth: 0,
        }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Reads one fully-qualified value.
    pub fn decode(
        &mut self,
        cursor: &mut Cursor<'_>,
    ) -> GraphBinaryResult<Value> {
        let start = cursor.position();
        let res = self.decode_inner(cursor);
        if let Err(e) = &res {
            self.report(start, e);
        }
        res
    }

    /// Reads the value-only payload of a statically known type.
    pub fn decode_value(
        &mut self,
        data_type: DataType,
        cursor: &mut Cursor<'_>,
    ) -> GraphBinaryResult<Value> {
        let start = cursor.position();
        let res = self.read_payload(data_type, cursor);
        if let Err(e) = &res {
            self.report(start, e);
        }
        res
    }

    fn decode_inner(
        &mut self,
        cursor: &mut Cursor<'_>,
    ) -> GraphBinaryResult<Value> {
        let at = cursor.position();
        let tag = cursor.read_u8("type tag")?;
        let entry = *self.registry.serializer_for_tag(tag, at)?;

        let flag_at = cursor.position();
        match cursor.read_u8("value flag")? {
            VALUE_FLAG_NULL => {
                trace!(tag = %entry.data_type, offset = at, "decoded null");
                Ok(Value::Null(entry.data_type))
            }
            VALUE_FLAG_PRESENT => {
                let value = self.nested(|r| (entry.read_value)(entry.data_type, cursor, r))?;
                trace!(tag = %entry.data_type, offset = at, depth = self.depth, "decoded value");
                Ok(value)
            }
            other => Err(GraphBinaryError::malformed(
                "value flag",
                format!("expected 0x00 or 0x01, found 0x{other:02X}"),
            )
            .with_offset(flag_at)),
        }
    }

    fn read_payload(
        &mut self,
        data_type: DataType,
        cursor: &mut Cursor<'_>,
    ) -> GraphBinaryResult<Value> {
        let entry = *self.registry.serializer_for(data_type)?;
        self.nested(|r| (entry.read_value)(data_type, cursor, r))
    }

    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> GraphBinaryResult<T>,
    ) -> GraphBinaryResult<T> {
        if self.depth >= self.max_depth {
            return Err(GraphBinaryError::malformed(
                "nesting depth",
                format!("exceeds maximum of {}", self.max_depth),
            ));
        }
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    fn report(
        &self,
        start: usize,
        err: &GraphBinaryError,
    ) {
        if self.depth == 0 {
            debug!(
                offset = start,
                error_offset = ?err.offset(),
                status = %err.status_code(),
                error = %err,
                "decode failed"
            );
        }
    }

    /// Slots to reserve for `count` wire elements.
    pub fn capacity_hint(
        &self,
        count: usize,
    ) -> usize {
        count.min(self.max_prealloc)
    }

    /// Reads `count` fully-qualified values.
    pub fn decode_many(
        &mut self,
        count: usize,
        cursor: &mut Cursor<'_>,
    ) -> GraphBinaryResult<Vec<Value>> {
        let mut out = Vec::with_capacity(self.capacity_hint(count));
        for _ in 0..count {
            out.push(self.decode(cursor)?);
        }
        Ok(out)
    }

    /// Reads a fully-qualified value that must be a non-null String.
    pub fn decode_string(
        &mut self,
        cursor: &mut Cursor<'_>,
        what: &'static str,
    ) -> GraphBinaryResult<String> {
        let at = cursor.position();
        match self.decode(cursor)? {
            Value::String(s) => Ok(s),
            other => Err(GraphBinaryError::malformed(
                what,
                format!("expected String, found {}", other.type_name()),
            )
            .with_offset(at)),
        }
    }

    /// Reads a fully-qualified null of any type.
    pub fn expect_null(
        &mut self,
        cursor: &mut Cursor<'_>,
        what: &'static str,
    ) -> GraphBinaryResult<()> {
        let at = cursor.position();
        match self.decode(cursor)? {
            Value::Null(_) => Ok(()),
            other => Err(GraphBinaryError::malformed(
                what,
                format!("expected null, found {}", other.type_name()),
            )
            .with_offset(at)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_flag_yields_typed_null() {
        let mut r = Reader::new(TypeRegistry::global());
        let mut c = Cursor::new(&[0x03, 0x01]);
        assert_eq!(r.decode(&mut c).unwrap(), Value::Null(DataType::String));
        assert!(c.is_exhausted());
    }

    #[test]
    fn test_bad_flag_is_malformed_at_flag_offset() {
        let mut r = Reader::new(TypeRegistry::global());
        let mut c = Cursor::new(&[0x01, 0x02, 0, 0, 0, 1]);
        let err = r.decode(&mut c).unwrap_err();
        assert!(matches!(err, GraphBinaryError::MalformedValue { .. }));
        assert_eq!(err.offset(), Some(1));
    }

    #[test]
    fn test_unknown_tag() {
        let mut r = Reader::new(TypeRegistry::global());
        let mut c = Cursor::new(&[0x7F, 0x00]);
        assert_eq!(
            r.decode(&mut c).unwrap_err(),
            GraphBinaryError::UnknownType { tag: 0x7F, offset: 0 }
        );
    }

    #[test]
    fn test_capacity_hint_is_capped() {
        let cfg = CodecConfig::default().with_max_prealloc(16);
        let r = Reader::with_config(TypeRegistry::global(), &cfg);
        assert_eq!(r.capacity_hint(3), 3);
        assert_eq!(r.capacity_hint(i32::MAX as usize), 16);
    }

    #[test]
    fn test_hostile_count_fails_as_truncated() {
        // List claiming i32::MAX elements with nothing behind it.
        let mut r = Reader::new(TypeRegistry::global());
        let mut c = Cursor::new(&[0x09, 0x00, 0x7F, 0xFF, 0xFF, 0xFF]);
        let err = r.decode(&mut c).unwrap_err();
        assert!(matches!(err, GraphBinaryError::TruncatedInput { .. }));
    }

    #[test]
    fn test_depth_limit() {
        let cfg = CodecConfig::default().with_max_depth(2);
        let mut r = Reader::with_config(TypeRegistry::global(), &cfg);
        // List[List[Int 1]]
        let bytes = [
            0x09, 0x00, 0, 0, 0, 1, 0x09, 0x00, 0, 0, 0, 1, 0x01, 0x00, 0, 0, 0, 1,
        ];
        let err = r.decode(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(err.to_string().contains("nesting depth"), "got: {err}");

        let mut r = Reader::with_config(TypeRegistry::global(), &cfg);
        let ok = r.decode(&mut Cursor::new(&bytes[6..])).unwrap();
        assert_eq!(ok, Value::List(vec![Value::Int(1)]));
    }
}
