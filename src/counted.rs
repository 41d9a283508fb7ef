//! Scoped access to a mutable container with delta-based count
//! maintenance.

use crate::num::Count;

/// A container paired with a cached leaf count.
///
/// Every structural change goes through [`Counted::run`]: the transform
/// reports a signed delta alongside its result, the delta is applied to
/// the cached count before the scope returns, and the caller re-raises
/// the same delta to the parent node. Deltas originating further down
/// the tree are folded in through [`Counted::bump`].
#[derive(Debug)]
pub struct Counted<T> {
    inner: T,
    count: Count,
}

impl<T> Counted<T> {
    pub fn new(inner: T) -> Self {
        Counted {
            inner,
            count: Count::ZERO,
        }
    }

    pub fn count(&self) -> Count {
        self.count
    }

    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Runs `transform` over the container and applies the delta it
    /// reports before handing both back for propagation.
    pub fn run<R>(&mut self, transform: impl FnOnce(&mut T) -> (R, i64)) -> (R, i64) {
        let (result, delta) = transform(&mut self.inner);
        self.count = self.count.apply(delta);
        (result, delta)
    }

    /// Folds in a count change that happened beneath a child.
    pub fn bump(&mut self, delta: i64) {
        self.count = self.count.apply(delta);
    }
}
