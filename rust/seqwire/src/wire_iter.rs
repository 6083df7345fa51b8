//! The sequence implementation backed by a wire-format cursor.

use seqwire_common::{Result, error::Error};
use seqwire_json::TokenReader;

use crate::codec::ElementCodec;
use crate::skippable::SkippableIterator;

/// Cached answer of the last `has_next` query, re-derived from the cursor
/// exactly once per logical position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HasNext {
    /// The current position has not been queried yet.
    NotComputed,
    /// A pending, un-consumed element is available.
    Available,
    /// The array is exhausted and its close marker has been consumed.
    Exhausted,
}

/// A [`SkippableIterator`] whose elements are decoded from an open array on
/// a wire cursor.
///
/// The caller must have consumed the array-open token before constructing
/// the sequence; keeping that step outside lets the caller discriminate
/// null from array up front and choose what to build. Symmetrically, this
/// sequence consumes the array-close token itself: the first
/// [`has_next`](SkippableIterator::has_next) that observes exhaustion
/// retires the marker, leaving the cursor ready for whatever follows the
/// array in the document.
///
/// This is the only component that touches the cursor for element-level
/// movement; everything else composes over the [`SkippableIterator`]
/// contract. The cursor is borrowed, not owned, and must not be handed to
/// another live sequence at the same time.
pub struct WireSequence<'a, R: TokenReader, C: ElementCodec> {
    codec: C,
    reader: &'a mut R,
    state: HasNext,
}

impl<'a, R: TokenReader, C: ElementCodec> WireSequence<'a, R, C> {
    /// Creates a sequence over `reader`, which must be positioned just after
    /// the array-open token.
    pub fn new(codec: C, reader: &'a mut R) -> WireSequence<'a, R, C> {
        WireSequence {
            codec,
            reader,
            state: HasNext::NotComputed,
        }
    }
}

impl<R: TokenReader, C: ElementCodec> SkippableIterator for WireSequence<'_, R, C> {
    type Item = C::Value;

    fn has_next(&mut self) -> Result<bool> {
        match self.state {
            HasNext::Available => Ok(true),
            HasNext::Exhausted => Ok(false),
            HasNext::NotComputed => {
                if self.reader.has_next()? {
                    self.state = HasNext::Available;
                    Ok(true)
                } else {
                    // Retire the close marker now so the cursor can move on
                    // to sibling values of this array.
                    self.reader.end_array()?;
                    self.state = HasNext::Exhausted;
                    Ok(false)
                }
            }
        }
    }

    fn next_element(&mut self) -> Result<C::Value> {
        if !self.has_next()? {
            return Err(Error::no_element());
        }
        self.state = HasNext::NotComputed;
        self.codec.decode(&mut *self.reader)
    }

    fn skip(&mut self) -> Result<()> {
        if !self.has_next()? {
            return Err(Error::no_element());
        }
        self.state = HasNext::NotComputed;
        self.reader.skip_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::I64Codec;
    use seqwire_common::error::ErrorKind;
    use seqwire_json::JsonReader;

    #[test]
    fn test_iterates_in_order() {
        let mut reader = JsonReader::new(b"[5, 6, 7]");
        reader.begin_array().unwrap();
        let mut seq = WireSequence::new(I64Codec, &mut reader);
        assert!(seq.has_next().unwrap());
        assert_eq!(seq.next_element().unwrap(), 5);
        assert_eq!(seq.next_element().unwrap(), 6);
        assert_eq!(seq.next_element().unwrap(), 7);
        assert!(!seq.has_next().unwrap());
    }

    #[test]
    fn test_has_next_is_idempotent() {
        let mut reader = JsonReader::new(b"[1]");
        reader.begin_array().unwrap();
        let mut seq = WireSequence::new(I64Codec, &mut reader);
        assert!(seq.has_next().unwrap());
        assert!(seq.has_next().unwrap());
        assert_eq!(seq.next_element().unwrap(), 1);
        assert!(!seq.has_next().unwrap());
        assert!(!seq.has_next().unwrap());
    }

    #[test]
    fn test_exhaustion_retires_close_marker() {
        // has_next is a side-effecting query: observing exhaustion consumes
        // ']' so the sibling value is immediately readable.
        let mut reader = JsonReader::new(b"[[1], 42]");
        reader.begin_array().unwrap();
        reader.begin_array().unwrap();
        {
            let mut seq = WireSequence::new(I64Codec, &mut reader);
            assert_eq!(seq.next_element().unwrap(), 1);
            assert!(!seq.has_next().unwrap());
        }
        assert_eq!(reader.next_i64().unwrap(), 42);
    }

    #[test]
    fn test_next_after_exhaustion_fails() {
        let mut reader = JsonReader::new(b"[]");
        reader.begin_array().unwrap();
        let mut seq = WireSequence::new(I64Codec, &mut reader);
        assert!(!seq.has_next().unwrap());
        let err = seq.next_element().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NoElement));
        let err = seq.skip().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NoElement));
    }

    #[test]
    fn test_skip_bypasses_decode() {
        // A skipped element that would not decode as i64 must not fail.
        let mut reader = JsonReader::new(br#"[{"not": "an int"}, 9]"#);
        reader.begin_array().unwrap();
        let mut seq = WireSequence::new(I64Codec, &mut reader);
        seq.skip().unwrap();
        assert_eq!(seq.next_element().unwrap(), 9);
        assert!(!seq.has_next().unwrap());
    }

    #[test]
    fn test_close_drains_structurally() {
        let mut reader = JsonReader::new(br#"[[1, [2]], "x", 3.5, 0]"#);
        reader.begin_array().unwrap();
        let mut seq = WireSequence::new(I64Codec, &mut reader);
        seq.close().unwrap();
        assert!(!seq.has_next().unwrap());
    }

    #[test]
    fn test_malformed_input_propagates() {
        let mut reader = JsonReader::new(b"[1, 2");
        reader.begin_array().unwrap();
        let mut seq = WireSequence::new(I64Codec, &mut reader);
        assert_eq!(seq.next_element().unwrap(), 1);
        assert_eq!(seq.next_element().unwrap(), 2);
        let err = seq.has_next().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
    }
}
