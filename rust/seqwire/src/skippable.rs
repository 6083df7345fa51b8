//! The pull-iteration contract extended with skip and close.

use seqwire_common::Result;

/// A pull iterator over elements, extended with an explicit skip operation
/// and a close operation that drains whatever remains without decoding it.
///
/// The expectation is that [`has_next`](SkippableIterator::has_next) is
/// consulted before [`next_element`](SkippableIterator::next_element) or
/// [`skip`](SkippableIterator::skip); both fail with a no-element error when
/// the sequence is exhausted.
///
/// Implementations are single-use and strictly sequential: once closed or
/// exhausted, further consuming operations fail, and none of them are safe
/// for concurrent invocation.
pub trait SkippableIterator {
    type Item;

    /// Returns `true` if a further element is available.
    ///
    /// Idempotent between consuming operations: repeated calls return the
    /// cached answer without touching the underlying source again. For
    /// wire-backed implementations this is a side-effecting query: the first
    /// call that observes exhaustion also retires the array's close marker.
    fn has_next(&mut self) -> Result<bool>;

    /// Decodes and returns the next element.
    ///
    /// Fails with a no-element error when `has_next` would return `false`.
    fn next_element(&mut self) -> Result<Self::Item>;

    /// Discards the next element using the cheapest available primitive.
    ///
    /// Same availability contract as `next_element`. The default decodes and
    /// drops the element; implementations backed by a structural cursor
    /// override this to avoid decoding entirely.
    fn skip(&mut self) -> Result<()> {
        self.next_element().map(|_| ())
    }

    /// Drains all remaining elements via repeated `skip`.
    ///
    /// Safe to call on an already-exhausted sequence (no-op) and safe to
    /// call repeatedly.
    fn close(&mut self) -> Result<()> {
        while self.has_next()? {
            self.skip()?;
        }
        Ok(())
    }
}
