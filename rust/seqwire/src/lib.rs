//! Lazily-decoded, skippable sequences over wire-format arrays.
//!
//! This crate lets a caller treat an array embedded in a serialized document
//! as a pull-based sequence of decoded elements instead of materializing the
//! whole array into memory. Elements are decoded one at a time, on demand;
//! unwanted elements are discarded from the underlying cursor without being
//! decoded.
//!
//! # Core Concepts
//!
//! ## The skippable contract
//!
//! [`SkippableIterator`](crate::skippable::SkippableIterator) extends the
//! usual pull protocol (`has_next`/`next_element`) with an explicit `skip`
//! (discard the next element via the cheapest structural primitive) and a
//! `close` that drains whatever remains. Every sequence-shaped component in
//! this crate composes over that contract.
//!
//! ## Deferred skipping
//!
//! [`DelayedSkip`](crate::delayed_skip::DelayedSkip) represents a pending
//! `skip(n)` as a counter rather than immediate cursor movement. The debt is
//! paid lazily, right before the first real operation, and layered skip
//! requests collapse into a single pass over the discarded elements.
//!
//! ## The wire-backed sequence
//!
//! [`WireSequence`](crate::wire_iter::WireSequence) is the only component
//! that touches the cursor for element-level movement. It decodes elements
//! through an [`ElementCodec`](crate::codec::ElementCodec), recognizes the
//! end of the array and retires the close marker so the cursor is ready for
//! whatever follows in the document.
//!
//! ## The pipeline
//!
//! [`LazySequence`](crate::lazy_sequence::LazySequence) implements
//! [`Iterator`], so the generic lazy operators (`filter`, `map`, `take`,
//! `collect`, ...) come from the standard library. Only
//! [`skip_elements`](crate::lazy_sequence::LazySequence::skip_elements) is
//! specialized: it layers a `DelayedSkip` instead of decoding the skipped
//! elements. Dropping the pipeline drains the remaining elements so the
//! array close marker is always consumed exactly once.
//!
//! # Example
//!
//! ```
//! use seqwire::{SequenceCodec, codec::I64Codec};
//! use seqwire_json::JsonReader;
//!
//! # fn main() -> seqwire_common::Result<()> {
//! let mut reader = JsonReader::new(b"[10, 20, 30, 40]");
//! let codec = SequenceCodec::new(I64Codec);
//! let seq = codec.decode(&mut reader)?.expect("non-null array");
//! let tail: Vec<i64> = seq.skip_elements(2)?.collect::<seqwire_common::Result<_>>()?;
//! assert_eq!(tail, [30, 40]);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod delayed_skip;
pub mod lazy_sequence;
pub mod registry;
pub mod sequence_codec;
pub mod skippable;
pub mod wire_iter;

pub use codec::ElementCodec;
pub use delayed_skip::DelayedSkip;
pub use lazy_sequence::LazySequence;
pub use registry::{ArcCodec, CodecRegistry};
pub use sequence_codec::SequenceCodec;
pub use skippable::SkippableIterator;
pub use wire_iter::WireSequence;
