//! Per-element encode/decode logic.

use seqwire_common::{Result, error::Error};
use seqwire_json::{JsonWriter, TokenKind, TokenReader};

/// Encode/decode logic for a single element of a sequence.
///
/// The sequence machinery only ever invokes a codec for elements it actually
/// produces: skipped elements bypass the codec entirely and are discarded
/// through the cursor's structural skip primitive.
pub trait ElementCodec {
    type Value;

    /// Decodes one element from the cursor, leaving it positioned after the
    /// element's last token.
    fn decode(&self, reader: &mut dyn TokenReader) -> Result<Self::Value>;

    /// Encodes one element to the writer.
    fn encode(&self, writer: &mut JsonWriter, value: &Self::Value) -> Result<()>;
}

impl<C: ElementCodec + ?Sized> ElementCodec for &C {
    type Value = C::Value;

    fn decode(&self, reader: &mut dyn TokenReader) -> Result<Self::Value> {
        (**self).decode(reader)
    }

    fn encode(&self, writer: &mut JsonWriter, value: &Self::Value) -> Result<()> {
        (**self).encode(writer, value)
    }
}

/// Codec for `i64` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct I64Codec;

impl ElementCodec for I64Codec {
    type Value = i64;

    fn decode(&self, reader: &mut dyn TokenReader) -> Result<i64> {
        reader.next_i64()
    }

    fn encode(&self, writer: &mut JsonWriter, value: &i64) -> Result<()> {
        writer.i64_value(*value)
    }
}

/// Codec for `f64` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct F64Codec;

impl ElementCodec for F64Codec {
    type Value = f64;

    fn decode(&self, reader: &mut dyn TokenReader) -> Result<f64> {
        reader.next_f64()
    }

    fn encode(&self, writer: &mut JsonWriter, value: &f64) -> Result<()> {
        writer.f64_value(*value)
    }
}

/// Codec for `bool` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

impl ElementCodec for BoolCodec {
    type Value = bool;

    fn decode(&self, reader: &mut dyn TokenReader) -> Result<bool> {
        reader.next_bool()
    }

    fn encode(&self, writer: &mut JsonWriter, value: &bool) -> Result<()> {
        writer.bool_value(*value)
    }
}

/// Codec for `String` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl ElementCodec for StringCodec {
    type Value = String;

    fn decode(&self, reader: &mut dyn TokenReader) -> Result<String> {
        reader.next_str()
    }

    fn encode(&self, writer: &mut JsonWriter, value: &String) -> Result<()> {
        writer.string_value(value)
    }
}

/// Untyped fallback codec over [`serde_json::Value`].
///
/// Used when the element type cannot be resolved to a registered codec.
/// Lower fidelity than a typed codec: all numbers pass through an `f64`
/// reading path, so integers beyond 2^53 lose precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynCodec;

impl ElementCodec for DynCodec {
    type Value = serde_json::Value;

    fn decode(&self, reader: &mut dyn TokenReader) -> Result<serde_json::Value> {
        read_dyn_value(reader)
    }

    fn encode(&self, writer: &mut JsonWriter, value: &serde_json::Value) -> Result<()> {
        write_dyn_value(writer, value)
    }
}

fn read_dyn_value(reader: &mut dyn TokenReader) -> Result<serde_json::Value> {
    match reader.peek()? {
        TokenKind::Null => {
            reader.next_null()?;
            Ok(serde_json::Value::Null)
        }
        TokenKind::Bool => Ok(serde_json::Value::Bool(reader.next_bool()?)),
        TokenKind::Number => {
            let value = reader.next_f64()?;
            let number = if value.fract() == 0.0
                && value >= i64::MIN as f64
                && value <= i64::MAX as f64
            {
                serde_json::Number::from(value as i64)
            } else {
                serde_json::Number::from_f64(value)
                    .ok_or_else(|| Error::invalid_format("json number", "not representable"))?
            };
            Ok(serde_json::Value::Number(number))
        }
        TokenKind::String => Ok(serde_json::Value::String(reader.next_str()?)),
        TokenKind::BeginArray => {
            reader.begin_array()?;
            let mut items = Vec::new();
            while reader.has_next()? {
                items.push(read_dyn_value(reader)?);
            }
            reader.end_array()?;
            Ok(serde_json::Value::Array(items))
        }
        TokenKind::BeginObject => {
            reader.begin_object()?;
            let mut map = serde_json::Map::new();
            while reader.has_next()? {
                let name = reader.next_name()?;
                map.insert(name, read_dyn_value(reader)?);
            }
            reader.end_object()?;
            Ok(serde_json::Value::Object(map))
        }
        kind => Err(Error::invalid_format(
            "json value",
            format!("expected a value, found {kind:?}"),
        )),
    }
}

fn write_dyn_value(writer: &mut JsonWriter, value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Null => writer.null_value(),
        serde_json::Value::Bool(b) => writer.bool_value(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                writer.i64_value(i)
            } else {
                let f = n
                    .as_f64()
                    .ok_or_else(|| Error::invalid_format("json number", "not representable"))?;
                writer.f64_value(f)
            }
        }
        serde_json::Value::String(s) => writer.string_value(s),
        serde_json::Value::Array(items) => {
            writer.begin_array()?;
            for item in items {
                write_dyn_value(writer, item)?;
            }
            writer.end_array()
        }
        serde_json::Value::Object(map) => {
            writer.begin_object()?;
            for (name, item) in map {
                writer.name(name)?;
                write_dyn_value(writer, item)?;
            }
            writer.end_object()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqwire_json::JsonReader;

    #[test]
    fn test_dyn_codec_reads_nested_value() {
        let mut reader = JsonReader::new(br#"{"a": [1, "x", null], "b": true}"#);
        let value = DynCodec.decode(&mut reader).unwrap();
        assert_eq!(value, serde_json::json!({"a": [1, "x", null], "b": true}));
    }

    #[test]
    fn test_dyn_codec_round_trip() {
        let original = serde_json::json!([{"n": 42, "f": 1.25, "s": "hi"}, null, false]);
        let mut writer = JsonWriter::new().with_serialize_nulls(true);
        DynCodec.encode(&mut writer, &original).unwrap();
        let text = writer.into_string();
        let mut reader = JsonReader::new(text.as_bytes());
        let decoded = DynCodec.decode(&mut reader).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_string_codec_escaped_round_trip() {
        let mut writer = JsonWriter::new();
        StringCodec.encode(&mut writer, &"line\nbreak \"q\"".to_string()).unwrap();
        let text = writer.into_string();
        let mut reader = JsonReader::new(text.as_bytes());
        assert_eq!(
            StringCodec.decode(&mut reader).unwrap(),
            "line\nbreak \"q\""
        );
    }
}
