//! Core definitions (error taxonomy and common result plumbing), relied upon
//! by all seqwire-* crates.

pub mod error;
pub mod macros;
pub mod result;

pub use result::Result;
