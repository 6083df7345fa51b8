//! Token-level JSON cursor and emitter for the seqwire format adapters.
//!
//! This crate provides the wire-format collaborators that the `seqwire` core
//! binds to:
//!
//! - [`reader::TokenReader`]: the trait capturing the small set of cursor
//!   primitives the core consumes (peek, begin/end array, has-next,
//!   skip-value, read-null, plus per-primitive reads for element codecs).
//! - [`reader::JsonReader`]: a forward-only token cursor over an in-memory
//!   JSON document.
//! - [`writer::JsonWriter`]: a single-pass JSON emitter with a configurable
//!   null-serialization policy.
//!
//! The cursor is a single-owner, non-shareable, mutable resource: exactly one
//! live sequence may borrow it at a time, and none of the types here are safe
//! for concurrent use from multiple threads.

pub mod reader;
pub mod token;
pub mod writer;

pub use reader::{JsonReader, TokenReader};
pub use token::TokenKind;
pub use writer::JsonWriter;
