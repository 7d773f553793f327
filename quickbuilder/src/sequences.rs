//! Traversal of builder sequences.
//!
//! A sequence starts at a seed builder and continues through each
//! [`Builder::next`] until it returns `None`. A seed whose `build()` reports
//! [`BuildError::Exhausted`] is the empty sequence.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{BuildError, Builder, SequenceBuilder, trace};

/// Build at most `n` values starting at `seed`.
pub fn build<T, B: Builder<T> + ?Sized>(seed: &B, n: usize) -> Result<Vec<T>, BuildError> {
    walk(seed, Some(n))
}

/// Build every value starting at `seed`.
pub fn build_all<T, B: Builder<T> + ?Sized>(seed: &B) -> Result<Vec<T>, BuildError> {
    walk(seed, None)
}

fn walk<T, B: Builder<T> + ?Sized>(seed: &B, limit: Option<usize>) -> Result<Vec<T>, BuildError> {
    let mut out = Vec::new();
    if limit == Some(0) {
        return Ok(out);
    }
    match seed.build() {
        Ok(value) => out.push(value),
        Err(BuildError::Exhausted) => return Ok(out),
        Err(e) => return Err(e),
    }
    let full = |out: &Vec<T>| limit.is_some_and(|n| out.len() >= n);
    let mut current = if full(&out) { None } else { seed.next() };
    while let Some(builder) = current {
        out.push(builder.build()?);
        trace!(index = out.len() - 1, "advanced sequence");
        current = if full(&out) { None } else { builder.next() };
    }
    Ok(out)
}

/// A sequence builder yielding at most `n` values of `seed`.
pub fn limit<T>(seed: Arc<dyn Builder<T>>, n: usize) -> Limit<T> {
    Limit { seed, remaining: n }
}

/// A lazy iterator over the sequence starting at `seed`.
pub fn iterator<T>(seed: Arc<dyn Builder<T>>) -> Iter<T> {
    Iter {
        state: State::At(seed),
    }
}

/// A sequence cut short after a fixed number of values.
pub struct Limit<T> {
    seed: Arc<dyn Builder<T>>,
    remaining: usize,
}

impl<T> Clone for Limit<T> {
    fn clone(&self) -> Self {
        Self {
            seed: Arc::clone(&self.seed),
            remaining: self.remaining,
        }
    }
}

impl<T: 'static> Builder<T> for Limit<T> {
    fn build(&self) -> Result<T, BuildError> {
        match self.remaining {
            0 => Err(BuildError::Exhausted),
            _ => self.seed.build(),
        }
    }

    fn next(&self) -> Option<Arc<dyn Builder<T>>> {
        if self.remaining <= 1 {
            return None;
        }
        let seed = self.seed.next()?;
        Some(Arc::new(Limit {
            seed,
            remaining: self.remaining - 1,
        }))
    }
}

impl<T: 'static> SequenceBuilder<T> for Limit<T> {}

enum State<T> {
    At(Arc<dyn Builder<T>>),
    Done,
}

/// Lazy iterator over a sequence. Each item is the result of one `build()`.
///
/// Iteration ends after the last builder or after the first error.
pub struct Iter<T> {
    state: State<T>,
}

impl<T> Clone for Iter<T> {
    fn clone(&self) -> Self {
        let state = match &self.state {
            State::At(builder) => State::At(Arc::clone(builder)),
            State::Done => State::Done,
        };
        Self { state }
    }
}

impl<T> Iterator for Iter<T> {
    type Item = Result<T, BuildError>;

    fn next(&mut self) -> Option<Self::Item> {
        let State::At(builder) = core::mem::replace(&mut self.state, State::Done) else {
            return None;
        };
        match builder.build() {
            Ok(value) => {
                if let Some(next) = builder.next() {
                    self.state = State::At(next);
                }
                Some(Ok(value))
            }
            Err(BuildError::Exhausted) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<T> core::iter::FusedIterator for Iter<T> {}
