//! Best-effort, type-directed codec dispatch.
//!
//! The primary way to obtain a [`SequenceCodec`] is the compile-time generic
//! constructor, [`SequenceCodec::new`], with an explicit element codec. The
//! registry is a convenience layered on top for callers that only hold a
//! runtime element type: it resolves the element codec by `TypeId`, and when
//! the type is not registered the caller falls back to
//! [`SequenceCodec::dynamic`], which represents elements as
//! `serde_json::Value` at lower fidelity.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use seqwire_common::Result;
use seqwire_json::{JsonWriter, TokenReader};

use crate::codec::{BoolCodec, DynCodec, ElementCodec, F64Codec, I64Codec, StringCodec};
use crate::sequence_codec::SequenceCodec;

/// A shared, clonable handle to a registered element codec.
pub struct ArcCodec<T> {
    inner: Arc<dyn ElementCodec<Value = T>>,
}

impl<T> Clone for ArcCodec<T> {
    fn clone(&self) -> Self {
        ArcCodec {
            inner: self.inner.clone(),
        }
    }
}

impl<T> ElementCodec for ArcCodec<T> {
    type Value = T;

    fn decode(&self, reader: &mut dyn TokenReader) -> Result<T> {
        self.inner.decode(reader)
    }

    fn encode(&self, writer: &mut JsonWriter, value: &T) -> Result<()> {
        self.inner.encode(writer, value)
    }
}

/// A registry of element codecs keyed by their element type.
#[derive(Default)]
pub struct CodecRegistry {
    entries: HashMap<TypeId, Box<dyn Any>>,
}

impl CodecRegistry {
    /// An empty registry.
    pub fn new() -> CodecRegistry {
        CodecRegistry::default()
    }

    /// A registry pre-populated with the codecs this crate provides
    /// (`i64`, `f64`, `bool`, `String` and `serde_json::Value`).
    pub fn with_defaults() -> CodecRegistry {
        let mut registry = CodecRegistry::new();
        registry.register(I64Codec);
        registry.register(F64Codec);
        registry.register(BoolCodec);
        registry.register(StringCodec);
        registry.register(DynCodec);
        registry
    }

    /// Registers `codec` for its element type, replacing any previous
    /// registration for that type.
    pub fn register<C>(&mut self, codec: C)
    where
        C: ElementCodec + 'static,
        C::Value: 'static,
    {
        let handle: ArcCodec<C::Value> = ArcCodec {
            inner: Arc::new(codec),
        };
        self.entries.insert(TypeId::of::<C::Value>(), Box::new(handle));
    }

    /// Resolves the element codec registered for `T`, if any.
    pub fn element_codec<T: 'static>(&self) -> Option<ArcCodec<T>> {
        self.entries
            .get(&TypeId::of::<T>())?
            .downcast_ref::<ArcCodec<T>>()
            .cloned()
    }

    /// Produces a sequence codec for "sequence of `T`", when `T`'s element
    /// codec is registered.
    pub fn sequence_codec<T: 'static>(&self) -> Option<SequenceCodec<ArcCodec<T>>> {
        Some(SequenceCodec::new(self.element_codec::<T>()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqwire_json::JsonReader;

    #[test]
    fn test_default_registrations_resolve() {
        let registry = CodecRegistry::with_defaults();
        assert!(registry.element_codec::<i64>().is_some());
        assert!(registry.element_codec::<f64>().is_some());
        assert!(registry.element_codec::<bool>().is_some());
        assert!(registry.element_codec::<String>().is_some());
        assert!(registry.element_codec::<serde_json::Value>().is_some());
        assert!(registry.element_codec::<u32>().is_none());
    }

    #[test]
    fn test_registry_sequence_codec_decodes() {
        let registry = CodecRegistry::with_defaults();
        let codec = registry.sequence_codec::<i64>().expect("registered");
        let mut reader = JsonReader::new(b"[1, 2, 3]");
        let seq = codec.decode(&mut reader).unwrap().expect("present");
        let values: Vec<i64> = seq.map(|item| item.unwrap()).collect();
        assert_eq!(values, [1, 2, 3]);
    }

    #[test]
    fn test_dynamic_fallback_for_unregistered_type() {
        let registry = CodecRegistry::with_defaults();
        // No codec registered for this element type; fall back to the
        // untyped representation.
        assert!(registry.sequence_codec::<u32>().is_none());
        let codec = SequenceCodec::dynamic();
        let mut reader = JsonReader::new(br#"[1, "two", null]"#);
        let seq = codec.decode(&mut reader).unwrap().expect("present");
        let values: Vec<serde_json::Value> = seq.map(|item| item.unwrap()).collect();
        assert_eq!(values, [serde_json::json!(1), serde_json::json!("two"), serde_json::Value::Null]);
    }

    #[test]
    fn test_custom_registration_overrides() {
        struct UpperCodec;
        impl ElementCodec for UpperCodec {
            type Value = String;
            fn decode(&self, reader: &mut dyn TokenReader) -> Result<String> {
                Ok(reader.next_str()?.to_uppercase())
            }
            fn encode(&self, writer: &mut JsonWriter, value: &String) -> Result<()> {
                writer.string_value(value)
            }
        }

        let mut registry = CodecRegistry::with_defaults();
        registry.register(UpperCodec);
        let codec = registry.sequence_codec::<String>().expect("registered");
        let mut reader = JsonReader::new(br#"["ab"]"#);
        let seq = codec.decode(&mut reader).unwrap().expect("present");
        let values: Vec<String> = seq.map(|item| item.unwrap()).collect();
        assert_eq!(values, ["AB"]);
    }
}
