use graphbinary_error::{ErrorExt, GraphBinaryError, GraphBinaryResult};
use tracing::{debug, trace};

use super::{
    BufferAllocator, CompositeBufferBuilder, DataType, OutputBuffer, Segment, TypeRegistry,
    VALUE_FLAG_NULL, VALUE_FLAG_PRESENT,
};
use crate::{config::CodecConfig, types::Value};

/// Recursive encoder.
///
/// A writer owns its depth counter, so one instance serves one encode at a
/// time; independent encodes use independent writers.
#[derive(Debug)]
pub struct Writer<'r> {
    registry: &'r TypeRegistry,
    allocator: BufferAllocator,
    max_depth: usize,
    depth: usize,
}

impl<'r> Writer<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_config(registry, BufferAllocator::new(), &CodecConfig::default())
    }

    pub fn with_config(
        registry: &'r TypeRegistry,
        allocator: BufferAllocator,
        config: &CodecConfig,
    ) -> Self {
        Self {
            registry,
            allocator,
            max_depth: config.max_depth,
            depth: 0,
        }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    pub fn allocator(&self) -> &BufferAllocator {
        &self.allocator
    }

    /// Fully-qualified form: `[tag][flag][payload]`, or `[tag][0x01]` for
    /// a null.
    pub fn encode(
        &mut self,
        value: &Value,
    ) -> GraphBinaryResult<OutputBuffer> {
        let res = self.encode_inner(value);
        if let Err(e) = &res {
            self.report(value, e);
        }
        res
    }

    /// Value-only form of a non-null value.
    pub fn encode_value(
        &mut self,
        value: &Value,
    ) -> GraphBinaryResult<OutputBuffer> {
        let res = self.encode_value_inner(value);
        if let Err(e) = &res {
            self.report(value, e);
        }
        res
    }

    fn encode_inner(
        &mut self,
        value: &Value,
    ) -> GraphBinaryResult<OutputBuffer> {
        let entry = *self.registry.serializer_for_value(value)?;
        let tag = entry.data_type.tag();

        if value.is_null() {
            return Ok(self.scalar(2, |seg| {
                seg.put_u8(tag);
                seg.put_u8(VALUE_FLAG_NULL);
            }));
        }

        let out = self.framed(tag, |w| (entry.write_value)(value, w))?;
        trace!(tag = %entry.data_type, len = out.len(), depth = self.depth, "encoded value");
        Ok(out)
    }

    /// Fully-qualified value of `data_type` whose payload is produced by
    /// `payload`. Lets serializers emit nested typed values straight from
    /// borrowed fields.
    pub fn encode_with<F>(
        &mut self,
        data_type: DataType,
        payload: F,
    ) -> GraphBinaryResult<OutputBuffer>
    where
        F: FnOnce(&mut Writer<'r>) -> GraphBinaryResult<OutputBuffer>,
    {
        self.registry.serializer_for(data_type)?;
        self.framed(data_type.tag(), payload)
    }

    fn framed<F>(
        &mut self,
        tag: u8,
        payload: F,
    ) -> GraphBinaryResult<OutputBuffer>
    where
        F: FnOnce(&mut Writer<'r>) -> GraphBinaryResult<OutputBuffer>,
    {
        self.nested(|w| {
            w.composite(2, |w, b| {
                let header = b.segment(2);
                header.put_u8(tag);
                header.put_u8(VALUE_FLAG_PRESENT);
                b.append_buffer(payload(w)?);
                Ok(())
            })
        })
    }

    fn encode_value_inner(
        &mut self,
        value: &Value,
    ) -> GraphBinaryResult<OutputBuffer> {
        if value.is_null() {
            return Err(GraphBinaryError::malformed(
                "value-only null",
                format!("{} has no value-only form", value.type_name()),
            ));
        }
        let entry = *self.registry.serializer_for_value(value)?;
        self.nested(|w| (entry.write_value)(value, w))
    }

    fn report(
        &self,
        value: &Value,
        err: &GraphBinaryError,
    ) {
        // Nested failures propagate to the top-level call, log once there.
        if self.depth == 0 {
            debug!(
                runtime_type = %value.type_name(),
                status = %err.status_code(),
                error = %err,
                "encode failed"
            );
        }
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

    /// Runs `f` with a fresh [`CompositeBufferBuilder`]; see
    /// [`CompositeBufferBuilder::build`].
    pub fn composite<F>(
        &mut self,
        expected_segments: usize,
        f: F,
    ) -> GraphBinaryResult<OutputBuffer>
    where
        F: FnOnce(&mut Writer<'r>, &mut CompositeBufferBuilder) -> GraphBinaryResult<()>,
    {
        let allocator = self.allocator.clone();
        CompositeBufferBuilder::build(&allocator, expected_segments, |b| f(self, b))
    }

    /// Single-segment buffer filled by `f`.
    pub fn scalar(
        &self,
        capacity: usize,
        f: impl FnOnce(&mut Segment),
    ) -> OutputBuffer {
        let mut seg = self.allocator.allocate(capacity);
        f(&mut seg);
        OutputBuffer::from(seg)
    }

    pub fn write_int(
        &self,
        v: i32,
    ) -> OutputBuffer {
        self.scalar(4, |seg| seg.put_i32(v))
    }

    pub fn write_long(
        &self,
        v: i64,
    ) -> OutputBuffer {
        self.scalar(8, |seg| seg.put_i64(v))
    }

    /// 4-byte count or length prefix.
    pub fn write_count(
        &self,
        count: usize,
        what: &str,
    ) -> GraphBinaryResult<OutputBuffer> {
        let n = i32::try_from(count).map_err(|_| {
            GraphBinaryError::malformed(what, format!("length {count} exceeds i32::MAX"))
        })?;
        Ok(self.write_int(n))
    }

    /// Length-prefixed bytes in one segment.
    pub fn write_bytes(
        &self,
        bytes: &[u8],
        what: &str,
    ) -> GraphBinaryResult<OutputBuffer> {
        let n = i32::try_from(bytes.len()).map_err(|_| {
            GraphBinaryError::malformed(what, format!("length {} exceeds i32::MAX", bytes.len()))
        })?;
        Ok(self.scalar(4 + bytes.len(), |seg| {
            seg.put_i32(n);
            seg.put_slice(bytes);
        }))
    }

    /// Value-only String: length-prefixed UTF-8.
    pub fn write_string(
        &self,
        s: &str,
    ) -> GraphBinaryResult<OutputBuffer> {
        self.write_bytes(s.as_bytes(), "String")
    }
}
