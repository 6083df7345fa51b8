//! The encode/decode entry points bound to "sequence of T".

use seqwire_common::Result;
use seqwire_json::{JsonWriter, TokenKind, TokenReader};

use crate::codec::{DynCodec, ElementCodec};
use crate::lazy_sequence::LazySequence;
use crate::wire_iter::WireSequence;

/// Adapter exposing a sequence of elements as a serializable value.
///
/// On decode, the codec discriminates null from array before any element is
/// touched: a null token is consumed and yields `None` (a legitimate
/// encoding distinct from an empty array, not a failure), anything else must
/// open as an array. On encode, the sequence is traversed once, forward,
/// each element written through the element codec; nothing is buffered
/// beyond the element currently being written.
pub struct SequenceCodec<C: ElementCodec> {
    element: C,
}

impl SequenceCodec<DynCodec> {
    /// The untyped fallback: a sequence codec over [`serde_json::Value`]
    /// elements. Lower fidelity than a typed codec; see [`DynCodec`].
    pub fn dynamic() -> SequenceCodec<DynCodec> {
        SequenceCodec::new(DynCodec)
    }
}

impl<C: ElementCodec> SequenceCodec<C> {
    /// Creates a sequence codec from a fully resolved element codec.
    pub fn new(element: C) -> SequenceCodec<C> {
        SequenceCodec { element }
    }

    /// The codec used for individual elements.
    pub fn element(&self) -> &C {
        &self.element
    }

    /// Attempts to decode a sequence at the cursor position.
    ///
    /// Returns `Ok(None)` when the value is encoded as null. Otherwise opens
    /// the array and returns a lazy pipeline over it; elements are decoded
    /// only as the caller pulls them. Any non-array, non-null token is a
    /// malformed-input failure propagated from the cursor.
    ///
    /// The cursor stays mutably borrowed by the returned sequence for its
    /// whole lifetime; it is handed back (positioned just after the array's
    /// close marker) once the sequence is exhausted, closed or dropped.
    pub fn decode<'a, R: TokenReader>(
        &'a self,
        reader: &'a mut R,
    ) -> Result<Option<LazySequence<WireSequence<'a, R, &'a C>>>> {
        if reader.peek()? == TokenKind::Null {
            reader.next_null()?;
            return Ok(None);
        }
        reader.begin_array()?;
        Ok(Some(LazySequence::new(WireSequence::new(
            &self.element,
            reader,
        ))))
    }

    /// Encodes an optional sequence.
    ///
    /// `None` is delegated to the writer's null handling: whether anything
    /// is emitted is decided by its null-serialization policy. A present
    /// sequence is written as an array of element-codec-encoded values in
    /// iteration order. The first element failure aborts the whole write;
    /// no partial-array recovery is attempted.
    pub fn encode<I>(&self, writer: &mut JsonWriter, value: Option<I>) -> Result<()>
    where
        I: IntoIterator<Item = C::Value>,
    {
        self.encode_results(writer, value.map(|seq| seq.into_iter().map(Ok)))
    }

    /// Like [`encode`](SequenceCodec::encode) for sources that yield
    /// `Result` items, so a decoded lazy sequence can be re-encoded without
    /// collecting it first.
    pub fn encode_results<I>(&self, writer: &mut JsonWriter, value: Option<I>) -> Result<()>
    where
        I: IntoIterator<Item = Result<C::Value>>,
    {
        let Some(seq) = value else {
            return writer.null_value();
        };
        writer.begin_array()?;
        for item in seq {
            self.element.encode(writer, &item?)?;
        }
        writer.end_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{I64Codec, StringCodec};
    use seqwire_common::error::ErrorKind;
    use seqwire_json::JsonReader;

    #[test]
    fn test_decode_null_yields_none() {
        let codec = SequenceCodec::new(I64Codec);
        let mut reader = JsonReader::new(b"null");
        assert!(codec.decode(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_decode_empty_array_yields_empty_sequence() {
        let codec = SequenceCodec::new(I64Codec);
        let mut reader = JsonReader::new(b"[]");
        let mut seq = codec.decode(&mut reader).unwrap().expect("present");
        assert!(seq.next().is_none());
    }

    #[test]
    fn test_decode_non_array_is_malformed() {
        let codec = SequenceCodec::new(I64Codec);
        let mut reader = JsonReader::new(b"17");
        let err = codec.decode(&mut reader).err().unwrap();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
    }

    #[test]
    fn test_encode_none_with_serialize_nulls() {
        let codec = SequenceCodec::new(I64Codec);
        let mut writer = JsonWriter::new().with_serialize_nulls(true);
        writer.begin_object().unwrap();
        writer.name("values").unwrap();
        codec.encode(&mut writer, None::<Vec<i64>>).unwrap();
        writer.end_object().unwrap();
        assert_eq!(writer.as_str(), r#"{"values":null}"#);
    }

    #[test]
    fn test_encode_none_without_serialize_nulls() {
        let codec = SequenceCodec::new(I64Codec);
        let mut writer = JsonWriter::new();
        writer.begin_object().unwrap();
        writer.name("values").unwrap();
        codec.encode(&mut writer, None::<Vec<i64>>).unwrap();
        writer.end_object().unwrap();
        assert_eq!(writer.as_str(), "{}");
    }

    #[test]
    fn test_encode_writes_elements_in_order() {
        let codec = SequenceCodec::new(StringCodec);
        let mut writer = JsonWriter::new();
        codec
            .encode(&mut writer, Some(vec!["a".to_string(), "b".to_string()]))
            .unwrap();
        assert_eq!(writer.as_str(), r#"["a","b"]"#);
    }

    #[test]
    fn test_encode_failure_aborts_write() {
        let codec = SequenceCodec::new(I64Codec);
        let mut writer = JsonWriter::new();
        let items: Vec<seqwire_common::Result<i64>> = vec![
            Ok(1),
            Err(seqwire_common::error::Error::invalid_operation("boom")),
            Ok(3),
        ];
        let err = codec.encode_results(&mut writer, Some(items)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidOperation { .. }));
        // The array was left open; nothing after the failure was written.
        assert_eq!(writer.as_str(), "[1");
    }
}
