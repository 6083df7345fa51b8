//! The operator surface a consumer chains against a sequence.

use seqwire_common::{Result, try_or_ret_some_err};

use crate::delayed_skip::DelayedSkip;
use crate::skippable::SkippableIterator;

/// A pipeline-capable view over a [`SkippableIterator`].
///
/// `LazySequence` implements [`Iterator`] with `Result` items, so the whole
/// generic operator vocabulary (`filter`, `map`, `take`, `fold`, `collect`,
/// ...) is supplied by the standard library. One operator is specialized:
/// [`skip_elements`](LazySequence::skip_elements) layers a [`DelayedSkip`]
/// over the sequence instead of decoding the skipped elements the way
/// [`Iterator::skip`] would.
///
/// Dropping the sequence — at any point, including before the first pull —
/// drains the remaining elements through the skippable contract, so the
/// underlying array is always fully consumed and its close marker retired
/// exactly once. A drain failure during drop is logged and suppressed; use
/// [`close`](LazySequence::close) to observe it instead.
pub struct LazySequence<I: SkippableIterator> {
    // `None` only after ownership moved to another layer or to `close`.
    inner: Option<I>,
}

impl<I: SkippableIterator> LazySequence<I> {
    /// Wraps `inner` into a pipeline view.
    pub fn new(inner: I) -> LazySequence<I> {
        LazySequence { inner: Some(inner) }
    }

    /// Declares that the next `n` elements are to be discarded.
    ///
    /// No cursor movement happens here: the skip is deferred until the first
    /// real operation on the returned sequence, and layered skip requests
    /// coalesce into a single pass. Fails with an invalid-argument error
    /// when `n` is negative.
    pub fn skip_elements(self, n: i64) -> Result<LazySequence<DelayedSkip<I>>> {
        let Some(inner) = self.into_inner() else {
            return Err(seqwire_common::error::Error::invalid_operation(
                "skip on a consumed sequence",
            ));
        };
        Ok(LazySequence::new(DelayedSkip::new(inner, n)?))
    }

    /// Drains all remaining elements without decoding them and reports any
    /// failure doing so.
    pub fn close(self) -> Result<()> {
        match self.into_inner() {
            Some(mut inner) => inner.close(),
            None => Ok(()),
        }
    }

    /// Unwraps the underlying sequence, disarming the drop-time drain.
    ///
    /// `None` is only possible when ownership already moved to another layer
    /// or to `close`; both consume the sequence, so callers holding one by
    /// value always get the inner sequence back.
    pub fn into_inner(mut self) -> Option<I> {
        self.inner.take()
    }
}

impl<I: SkippableIterator> Iterator for LazySequence<I> {
    type Item = Result<I::Item>;

    fn next(&mut self) -> Option<Result<I::Item>> {
        let inner = self.inner.as_mut()?;
        if try_or_ret_some_err!(inner.has_next()) {
            Some(inner.next_element())
        } else {
            None
        }
    }
}

impl<I: SkippableIterator> Drop for LazySequence<I> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.as_mut() {
            if let Err(err) = inner.close() {
                log::error!("failed to drain sequence on drop: {err}");
            }
        }
    }
}
