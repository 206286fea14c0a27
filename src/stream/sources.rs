//! Segment sources: the `advance` capability behind a `StreamRange`.

use std::collections::VecDeque;

use crate::stream::StreamStatus;
use crate::types::TypeTag;
use crate::utils::typed_slice_as_bytes;

/// One contiguous run of elements, all of type `tag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub tag: TypeTag,
    pub bytes: &'a [u8],
}

impl<'a> Segment<'a> {
    pub fn new(tag: TypeTag, bytes: &'a [u8]) -> Self {
        Self { tag, bytes }
    }

    pub fn from_floats(values: &'a [f32]) -> Self {
        Self::new(TypeTag::Float, typed_slice_as_bytes(values))
    }

    pub fn from_doubles(values: &'a [f64]) -> Self {
        Self::new(TypeTag::Double, typed_slice_as_bytes(values))
    }

    /// Number of whole elements in the segment.
    pub fn len(&self) -> usize {
        match self.tag.element_size() {
            0 => 0,
            size => self.bytes.len() / size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Supplies the next segment when a range's cursor reaches the end of the
/// current one.
///
/// Returning `Err(status)` ends the stream; the range latches `status`
/// (`NoError` is not a valid terminal status and is latched as `Fault`).
pub trait SegmentSource<'a> {
    fn advance(&mut self) -> Result<Segment<'a>, StreamStatus>;
}

/// Any closure producing segments is a source.
impl<'a, F> SegmentSource<'a> for F
where
    F: FnMut() -> Result<Segment<'a>, StreamStatus>,
{
    fn advance(&mut self) -> Result<Segment<'a>, StreamStatus> {
        self()
    }
}

/// A source with no further segments: the next advance ends the stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct Exhausted;

impl<'a> SegmentSource<'a> for Exhausted {
    fn advance(&mut self) -> Result<Segment<'a>, StreamStatus> {
        Err(StreamStatus::ReadPastEnd)
    }
}

/// A fixed, ordered list of segments (e.g. the chunks of a chunked read).
#[derive(Debug, Default, Clone)]
pub struct SegmentList<'a> {
    pending: VecDeque<Segment<'a>>,
}

impl<'a> SegmentList<'a> {
    pub fn new(segments: impl IntoIterator<Item = Segment<'a>>) -> Self {
        Self {
            pending: segments.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl<'a> SegmentSource<'a> for SegmentList<'a> {
    fn advance(&mut self) -> Result<Segment<'a>, StreamStatus> {
        self.pending.pop_front().ok_or(StreamStatus::ReadPastEnd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_len_counts_elements() {
        let values = [1.0f32, 2.0, 3.0];
        let segment = Segment::from_floats(&values);
        assert_eq!(segment.len(), 3);
        assert_eq!(segment.bytes.len(), 12);
        assert_eq!(Segment::new(TypeTag::Null, &[]).len(), 0);
    }

    #[test]
    fn test_segment_list_yields_in_order_then_ends() {
        let a = [1.0f32];
        let b = [2.0f64];
        let mut list = SegmentList::new([Segment::from_floats(&a), Segment::from_doubles(&b)]);
        assert_eq!(list.remaining(), 2);

        assert_eq!(list.advance().unwrap().tag, TypeTag::Float);
        assert_eq!(list.advance().unwrap().tag, TypeTag::Double);
        assert_eq!(list.advance(), Err(StreamStatus::ReadPastEnd));
        assert_eq!(list.advance(), Err(StreamStatus::ReadPastEnd));
    }

    #[test]
    fn test_exhausted_always_ends() {
        let mut source = Exhausted;
        assert_eq!(SegmentSource::advance(&mut source), Err(StreamStatus::ReadPastEnd));
    }
}
