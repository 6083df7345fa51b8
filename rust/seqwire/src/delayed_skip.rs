//! Deferred, coalescing skip decorator.

use seqwire_common::{Result, verify_arg};

use crate::skippable::SkippableIterator;

/// Decorator that owes its delegate a number of skips, paid lazily.
///
/// Construction performs no cursor movement. The pending debt is settled
/// immediately before the first real operation on the decorator, so a chain
/// of skip requests collapses into a single accumulated pass over the
/// discarded elements. Once an element has been observed through this layer
/// (via `has_next` or `next_element`), it can no longer be claimed by this
/// decorator's debt.
///
/// If the delegate exhausts before the debt is settled, the remaining debt
/// is frozen; the decorator then reports exhaustion like its delegate. After
/// the debt reaches zero every operation is a pure pass-through, adding
/// nothing to steady-state iteration beyond one counter check.
///
/// Decorators layer: wrapping an already-wrapped sequence forms a linear
/// exclusive-ownership chain, each layer owning the one beneath it.
pub struct DelayedSkip<I: SkippableIterator> {
    delegate: I,
    to_skip: u64,
}

impl<I: SkippableIterator> DelayedSkip<I> {
    /// Wraps `delegate` with a pending debt of `to_skip` elements.
    ///
    /// Fails with an invalid-argument error when `to_skip` is negative,
    /// before the delegate is touched.
    pub fn new(delegate: I, to_skip: i64) -> Result<DelayedSkip<I>> {
        verify_arg!(to_skip, to_skip >= 0);
        Ok(DelayedSkip {
            delegate,
            to_skip: to_skip as u64,
        })
    }

    /// Elements still owed to be discarded from the delegate.
    pub fn pending(&self) -> u64 {
        self.to_skip
    }

    /// Settles the pending debt: skips delegate elements while the debt is
    /// positive and the delegate has more, freezing the remainder if the
    /// delegate exhausts first.
    fn do_skipping(&mut self) -> Result<()> {
        while self.to_skip > 0 {
            if !self.delegate.has_next()? {
                break;
            }
            self.delegate.skip()?;
            self.to_skip -= 1;
        }
        Ok(())
    }
}

impl<I: SkippableIterator> SkippableIterator for DelayedSkip<I> {
    type Item = I::Item;

    fn has_next(&mut self) -> Result<bool> {
        self.do_skipping()?;
        self.delegate.has_next()
    }

    fn next_element(&mut self) -> Result<I::Item> {
        self.do_skipping()?;
        self.delegate.next_element()
    }

    fn skip(&mut self) -> Result<()> {
        self.do_skipping()?;
        self.delegate.skip()
    }

    fn close(&mut self) -> Result<()> {
        self.do_skipping()?;
        self.delegate.close()
    }
}
