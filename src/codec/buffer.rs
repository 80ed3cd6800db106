//! Output buffers for the encoder.
//!
//! Encoded bytes live in [`Segment`]s handed out by a [`BufferAllocator`].
//! Composite values never copy their children's bytes: a
//! [`CompositeBufferBuilder`] collects the child segments in field order and
//! [`finish`](CompositeBufferBuilder::finish)es them into one
//! [`OutputBuffer`]. If anything fails on the way, every collected segment is
//! released before the error leaves the builder.

use std::{
    io,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
};

use bytes::{BufMut, Bytes, BytesMut};
use graphbinary_error::GraphBinaryResult;
use tracing::trace;

////////////////////////////////////////////////////////////////////////////////
// Allocator
////////////////////////////////////////////////////////////////////////////////

/// Live and cumulative segment counters of one allocator.
#[derive(Debug, Default)]
pub struct AllocatorMetrics {
    live_segments: AtomicUsize,
    live_bytes: AtomicUsize,
    total_allocated: AtomicU64,
}

impl AllocatorMetrics {
    /// Segments allocated and not yet released or dropped.
    pub fn live_segments(&self) -> usize {
        self.live_segments.load(Ordering::Acquire)
    }

    /// Capacity held by live segments.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::Acquire)
    }

    /// Segments ever allocated.
    pub fn total_allocated(&self) -> u64 {
        self.total_allocated.load(Ordering::Relaxed)
    }
}

/// Source of output segments. Clones share the same metrics.
#[derive(Debug, Clone, Default)]
pub struct BufferAllocator {
    metrics: Arc<AllocatorMetrics>,
}

impl BufferAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(
        &self,
        capacity: usize,
    ) -> Segment {
        let data = BytesMut::with_capacity(capacity);
        let accounted = data.capacity();
        self.metrics.live_segments.fetch_add(1, Ordering::AcqRel);
        self.metrics.live_bytes.fetch_add(accounted, Ordering::AcqRel);
        self.metrics.total_allocated.fetch_add(1, Ordering::Relaxed);
        Segment {
            data,
            accounted,
            metrics: Arc::clone(&self.metrics),
        }
    }

    pub fn metrics(&self) -> &AllocatorMetrics {
        &self.metrics
    }
}

////////////////////////////////////////////////////////////////////////////////
// Segment
////////////////////////////////////////////////////////////////////////////////

/// Contiguous chunk of encoded bytes owned by exactly one holder.
///
/// Dropping the segment returns it to its allocator's accounting.
#[derive(Debug)]
pub struct Segment {
    data: BytesMut,
    accounted: usize,
    metrics: Arc<AllocatorMetrics>,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn put_u8(
        &mut self,
        v: u8,
    ) {
        self.data.put_u8(v);
    }

    pub fn put_i8(
        &mut self,
        v: i8,
    ) {
        self.data.put_i8(v);
    }

    pub fn put_i16(
        &mut self,
        v: i16,
    ) {
        self.data.put_i16(v);
    }

    pub fn put_i32(
        &mut self,
        v: i32,
    ) {
        self.data.put_i32(v);
    }

    pub fn put_i64(
        &mut self,
        v: i64,
    ) {
        self.data.put_i64(v);
    }

    pub fn put_f32(
        &mut self,
        v: f32,
    ) {
        self.data.put_f32(v);
    }

    pub fn put_f64(
        &mut self,
        v: f64,
    ) {
        self.data.put_f64(v);
    }

    pub fn put_slice(
        &mut self,
        v: &[u8],
    ) {
        self.data.put_slice(v);
    }

    /// Returns the segment to the allocator.
    pub fn release(self) {}

    fn take_bytes(mut self) -> Bytes {
        std::mem::take(&mut self.data).freeze()
    }
}

impl Drop for Segment {
    fn drop(&mut self) {
        self.metrics.live_segments.fetch_sub(1, Ordering::AcqRel);
        self.metrics
            .live_bytes
            .fetch_sub(self.accounted, Ordering::AcqRel);
    }
}

////////////////////////////////////////////////////////////////////////////////
// OutputBuffer
////////////////////////////////////////////////////////////////////////////////

/// Encoded value: logically contiguous, physically a list of segments.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    segments: Vec<Segment>,
    len: usize,
}

impl OutputBuffer {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Segment slices in wire order, for vectored writes.
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.segments.iter().map(Segment::as_slice)
    }

    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        for chunk in self.chunks() {
            out.extend_from_slice(chunk);
        }
        out
    }

    /// Materializes the buffer, copying only when it spans several segments.
    pub fn into_bytes(mut self) -> Bytes {
        if self.segments.len() == 1 {
            if let Some(seg) = self.segments.pop() {
                return seg.take_bytes();
            }
        }
        Bytes::from(self.to_vec())
    }

    /// Hands every segment back to the allocator.
    pub fn release(self) {
        trace!(segments = self.segments.len(), "output buffer released");
    }

    pub fn write_to<W: io::Write>(
        &self,
        w: &mut W,
    ) -> io::Result<()> {
        for chunk in self.chunks() {
            w.write_all(chunk)?;
        }
        Ok(())
    }
}

impl From<Segment> for OutputBuffer {
    fn from(seg: Segment) -> Self {
        Self {
            len: seg.len(),
            segments: vec![seg],
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// CompositeBufferBuilder
////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuilderState {
    Open,
    Finished,
    Released,
}

/// Collects segments for one composite value.
///
/// Exactly one of [`finish`](Self::finish) or
/// [`release_all`](Self::release_all) ends the builder's life; using it
/// afterwards panics.
#[derive(Debug)]
pub struct CompositeBufferBuilder {
    allocator: BufferAllocator,
    segments: Vec<Segment>,
    state: BuilderState,
}

impl CompositeBufferBuilder {
    pub fn new(allocator: &BufferAllocator) -> Self {
        Self::with_capacity(allocator, 0)
    }

    pub fn with_capacity(
        allocator: &BufferAllocator,
        expected_segments: usize,
    ) -> Self {
        Self {
            allocator: allocator.clone(),
            segments: Vec::with_capacity(expected_segments),
            state: BuilderState::Open,
        }
    }

    /// Runs `f` against a fresh builder.
    ///
    /// On `Ok` the collected segments are finished into one buffer; on `Err`
    /// they are all released and the error is returned unchanged.
    pub fn build<F>(
        allocator: &BufferAllocator,
        expected_segments: usize,
        f: F,
    ) -> GraphBinaryResult<OutputBuffer>
    where
        F: FnOnce(&mut CompositeBufferBuilder) -> GraphBinaryResult<()>,
    {
        let mut builder = Self::with_capacity(allocator, expected_segments);
        match f(&mut builder) {
            Ok(()) => Ok(builder.finish()),
            Err(e) => {
                builder.release_all();
                Err(e)
            }
        }
    }

    pub fn reserve(
        &mut self,
        expected_segments: usize,
    ) {
        self.assert_open("reserve");
        self.segments.reserve(expected_segments);
    }

    pub fn append(
        &mut self,
        segment: Segment,
    ) {
        self.assert_open("append");
        self.segments.push(segment);
    }

    /// Moves every segment of `buffer` into this builder.
    pub fn append_buffer(
        &mut self,
        mut buffer: OutputBuffer,
    ) {
        self.assert_open("append_buffer");
        self.segments.append(&mut buffer.segments);
    }

    /// Allocates a segment, appends it and returns it for filling.
    pub fn segment(
        &mut self,
        capacity: usize,
    ) -> &mut Segment {
        self.assert_open("segment");
        let seg = self.allocator.allocate(capacity);
        self.segments.push(seg);
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn release_all(&mut self) {
        self.assert_open("release_all");
        self.state = BuilderState::Released;
        trace!(segments = self.segments.len(), "composite buffer released");
        self.segments.clear();
    }

    pub fn finish(&mut self) -> OutputBuffer {
        self.assert_open("finish");
        self.state = BuilderState::Finished;
        // `segment` hands out slots that are filled after being pushed.
        let len = self.segments.iter().map(Segment::len).sum();
        OutputBuffer {
            segments: std::mem::take(&mut self.segments),
            len,
        }
    }

    fn assert_open(
        &self,
        op: &str,
    ) {
        assert!(
            self.state == BuilderState::Open,
            "CompositeBufferBuilder::{op} called on a {:?} builder",
            self.state
        );
    }
}

impl Drop for CompositeBufferBuilder {
    fn drop(&mut self) {
        if self.state == BuilderState::Open && !self.segments.is_empty() {
            trace!(
                segments = self.segments.len(),
                "unfinished composite buffer dropped"
            );
            self.segments.clear();
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use graphbinary_error::GraphBinaryError;

    use super::*;

    fn filled(
        alloc: &BufferAllocator,
        bytes: &[u8],
    ) -> Segment {
        let mut seg = alloc.allocate(bytes.len());
        seg.put_slice(bytes);
        seg
    }

    #[test]
    fn test_allocator_tracks_live_segments() {
        let alloc = BufferAllocator::new();
        let a = alloc.allocate(8);
        let b = alloc.allocate(8);
        assert_eq!(alloc.metrics().live_segments(), 2);
        assert!(alloc.metrics().live_bytes() >= 16);
        drop(a);
        b.release();
        assert_eq!(alloc.metrics().live_segments(), 0);
        assert_eq!(alloc.metrics().live_bytes(), 0);
        assert_eq!(alloc.metrics().total_allocated(), 2);
    }

    #[test]
    fn test_finish_concatenates_in_append_order() {
        let alloc = BufferAllocator::new();
        let mut b = CompositeBufferBuilder::new(&alloc);
        b.append(filled(&alloc, &[1, 2]));
        b.append_buffer(OutputBuffer::from(filled(&alloc, &[3])));
        b.segment(2).put_i16(0x0405);
        let out = b.finish();
        assert_eq!(out.to_vec(), vec![1, 2, 3, 4, 5]);
        assert_eq!(out.len(), 5);
        assert_eq!(out.segment_count(), 3);
        assert_eq!(alloc.metrics().live_segments(), 3);
        out.release();
        assert_eq!(alloc.metrics().live_segments(), 0);
    }

    #[test]
    fn test_build_releases_on_error() {
        let alloc = BufferAllocator::new();
        let res = CompositeBufferBuilder::build(&alloc, 2, |b| {
            b.append(filled(&alloc, &[1]));
            b.segment(4).put_i32(7);
            Err(GraphBinaryError::unsupported("Custom(x)"))
        });
        assert!(res.is_err());
        assert_eq!(alloc.metrics().live_segments(), 0);
    }

    #[test]
    fn test_drop_of_open_builder_releases() {
        let alloc = BufferAllocator::new();
        {
            let mut b = CompositeBufferBuilder::new(&alloc);
            b.append(filled(&alloc, &[9]));
        }
        assert_eq!(alloc.metrics().live_segments(), 0);
    }

    #[test]
    fn test_into_bytes_single_segment() {
        let alloc = BufferAllocator::new();
        let out = OutputBuffer::from(filled(&alloc, b"abc"));
        assert_eq!(out.into_bytes(), Bytes::from_static(b"abc"));
        assert_eq!(alloc.metrics().live_segments(), 0);
    }

    #[test]
    fn test_write_to_emits_all_chunks() {
        let alloc = BufferAllocator::new();
        let out = CompositeBufferBuilder::build(&alloc, 2, |b| {
            b.append(filled(&alloc, b"ab"));
            b.append(filled(&alloc, b"cd"));
            Ok(())
        })
        .unwrap();
        let mut sink = Vec::new();
        out.write_to(&mut sink).unwrap();
        assert_eq!(sink, b"abcd");
    }

    #[test]
    #[should_panic(expected = "append")]
    fn test_append_after_finish_panics() {
        let alloc = BufferAllocator::new();
        let mut b = CompositeBufferBuilder::new(&alloc);
        let _out = b.finish();
        b.append(alloc.allocate(1));
    }

    #[test]
    #[should_panic(expected = "release_all")]
    fn test_double_release_panics() {
        let alloc = BufferAllocator::new();
        let mut b = CompositeBufferBuilder::new(&alloc);
        b.release_all();
        b.release_all();
    }
}
