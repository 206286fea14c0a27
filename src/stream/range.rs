//! The `StreamRange` cursor and its single pull primitive.

use std::fmt;

use crate::config::EngineConfig;
use crate::error::TransduceError;
use crate::stream::sources::{Exhausted, Segment, SegmentList, SegmentSource};
use crate::stream::StreamStatus;
use crate::types::TypeTag;
use crate::value::{Payload, Value};

/// A lazy, possibly unbounded sequence of values backed by borrowed segments.
///
/// The range owns no payload memory: every value it yields is a borrowed view
/// into the current segment. Values remain valid after the range advances,
/// since they borrow the segment (`'a`), not the range.
pub struct StreamRange<'a> {
    tag: TypeTag,
    element_size: usize,
    segment: &'a [u8],
    // Byte offset into `segment`; always a multiple of `element_size`.
    cursor: usize,
    status: StreamStatus,
    source: Box<dyn SegmentSource<'a> + 'a>,
    max_consecutive_empty_segments: usize,
    elements_pulled: usize,
    segments_installed: usize,
}

//==================================================================================
// 1. Producers
//==================================================================================

impl<'a> StreamRange<'a> {
    /// A range that starts with no segment and pulls everything from `source`.
    pub fn with_source(source: impl SegmentSource<'a> + 'a) -> Self {
        Self {
            tag: TypeTag::Null,
            element_size: 0,
            segment: &[],
            cursor: 0,
            status: StreamStatus::NoError,
            source: Box::new(source),
            max_consecutive_empty_segments: EngineConfig::default().max_consecutive_empty_segments,
            elements_pulled: 0,
            segments_installed: 0,
        }
    }

    /// Wraps one contiguous buffer of `tag` elements as a single-segment stream.
    ///
    /// # Errors
    /// `BufferMismatch` if `bytes` is not a whole number of elements, and
    /// `TypeMismatch` if `tag` is `Null` (which has no element width).
    pub fn from_contiguous_buffer(bytes: &'a [u8], tag: TypeTag) -> Result<Self, TransduceError> {
        let element_size = tag.element_size();
        if element_size == 0 {
            return Err(TransduceError::TypeMismatch {
                expected: TypeTag::Float,
                found: tag,
            });
        }
        if bytes.len() % element_size != 0 {
            return Err(TransduceError::BufferMismatch(element_size, bytes.len()));
        }

        let mut range = Self::with_source(Exhausted);
        range.tag = tag;
        range.element_size = element_size;
        range.segment = bytes;
        range.segments_installed = 1;
        Ok(range)
    }

    pub fn from_floats(values: &'a [f32]) -> Self {
        Self::from_segment_unchecked(Segment::from_floats(values))
    }

    pub fn from_doubles(values: &'a [f64]) -> Self {
        Self::from_segment_unchecked(Segment::from_doubles(values))
    }

    // Typed slices are whole elements by construction.
    fn from_segment_unchecked(segment: Segment<'a>) -> Self {
        let mut range = Self::with_source(Exhausted);
        range.tag = segment.tag;
        range.element_size = segment.tag.element_size();
        range.segment = segment.bytes;
        range.segments_installed = 1;
        range
    }

    /// A multi-segment stream over `segments`, in order. Segments may differ in
    /// tag; malformed ones fault the stream when reached.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment<'a>>) -> Self {
        Self::with_source(SegmentList::new(segments))
    }

    /// Overrides the no-progress guard. Zero is treated as one.
    pub fn with_empty_segment_limit(mut self, limit: usize) -> Self {
        self.max_consecutive_empty_segments = limit.max(1);
        self
    }

    /// Applies the stream-related settings of `config`.
    pub fn configured(self, config: &EngineConfig) -> Self {
        self.with_empty_segment_limit(config.max_consecutive_empty_segments)
    }
}

//==================================================================================
// 2. Pull Protocol
//==================================================================================

impl<'a> StreamRange<'a> {
    /// Yields the next element as a borrowed value.
    ///
    /// Returns `Value::Null` once the status is terminal; the caller tells a
    /// real end apart by checking `status()` after the pull.
    pub fn pull_next(&mut self) -> Value<'a> {
        let mut empty_run = 0;
        while self.status == StreamStatus::NoError {
            if self.cursor < self.segment.len() {
                let segment = self.segment;
                let start = self.cursor;
                self.cursor += self.element_size;
                self.elements_pulled += 1;
                return Value::with_payload(self.tag, Payload::Borrowed(&segment[start..self.cursor]));
            }
            self.advance(&mut empty_run);
        }
        Value::Null
    }

    fn advance(&mut self, empty_run: &mut usize) {
        match self.source.advance() {
            Ok(segment) => self.install(segment, empty_run),
            Err(StreamStatus::NoError) => {
                log::warn!("segment source ended the stream with NoError; latching Fault");
                self.latch(StreamStatus::Fault);
            }
            Err(status) => self.latch(status),
        }
    }

    fn install(&mut self, segment: Segment<'a>, empty_run: &mut usize) {
        let element_size = segment.tag.element_size();
        if element_size == 0 {
            log::warn!("segment source produced a Null-tagged segment");
            return self.latch(StreamStatus::Fault);
        }
        if segment.bytes.len() % element_size != 0 {
            log::warn!(
                "segment of {} bytes is not a whole number of {} elements",
                segment.bytes.len(),
                segment.tag
            );
            return self.latch(StreamStatus::Fault);
        }
        if segment.bytes.is_empty() {
            *empty_run += 1;
            if *empty_run >= self.max_consecutive_empty_segments {
                log::warn!("{} consecutive empty segments; latching Fault", empty_run);
                self.latch(StreamStatus::Fault);
            }
            return;
        }

        *empty_run = 0;
        self.tag = segment.tag;
        self.element_size = element_size;
        self.segment = segment.bytes;
        self.cursor = 0;
        self.segments_installed += 1;
        log::trace!(
            "installed segment #{}: {} x {}",
            self.segments_installed,
            segment.len(),
            segment.tag
        );
    }

    // Terminal: drop the view of the last segment so nothing can read it again.
    fn latch(&mut self, status: StreamStatus) {
        log::debug!(
            "stream range latched {:?} after {} elements in {} segments",
            status,
            self.elements_pulled,
            self.segments_installed
        );
        self.status = status;
        self.tag = TypeTag::Null;
        self.element_size = 0;
        self.segment = &[];
        self.cursor = 0;
    }

    pub fn status(&self) -> StreamStatus {
        self.status
    }

    /// Tag of the elements in the current segment.
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Elements left in the current segment (not the whole stream).
    pub fn remaining_in_segment(&self) -> usize {
        match self.element_size {
            0 => 0,
            size => (self.segment.len() - self.cursor) / size,
        }
    }

    pub fn elements_pulled(&self) -> usize {
        self.elements_pulled
    }

    pub fn segments_installed(&self) -> usize {
        self.segments_installed
    }
}

impl<'a> Iterator for StreamRange<'a> {
    type Item = Value<'a>;

    fn next(&mut self) -> Option<Value<'a>> {
        let value = self.pull_next();
        if self.status.is_terminal() {
            return None;
        }
        Some(value)
    }
}

impl fmt::Debug for StreamRange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamRange")
            .field("tag", &self.tag)
            .field("element_size", &self.element_size)
            .field("segment_len", &self.segment.len())
            .field("cursor", &self.cursor)
            .field("status", &self.status)
            .finish()
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
