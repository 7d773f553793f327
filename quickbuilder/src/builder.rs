use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::builders::SingleValue;
use crate::sequences::{self, Iter, Limit};
use crate::BuildError;

/// Produces values of `T`, optionally as the first step of a sequence.
///
/// `next` returns the builder for the following element, or `None` once the
/// sequence is exhausted. Builders never change when built or advanced.
pub trait Builder<T>: Send + Sync {
    /// Build the current value.
    fn build(&self) -> Result<T, BuildError>;

    /// The builder for the next element of the sequence, if any.
    fn next(&self) -> Option<Arc<dyn Builder<T>>>;

    /// Whether [`next`](Self::next) would return a builder.
    fn has_next(&self) -> bool {
        self.next().is_some()
    }
}

impl<T, B: Builder<T> + ?Sized> Builder<T> for Arc<B> {
    fn build(&self) -> Result<T, BuildError> {
        (**self).build()
    }

    fn next(&self) -> Option<Arc<dyn Builder<T>>> {
        (**self).next()
    }

    fn has_next(&self) -> bool {
        (**self).has_next()
    }
}

/// The sequence protocol, forwarded to [`sequences`] with `self` as seed.
pub trait SequenceBuilder<T: 'static>: Builder<T> + Clone + 'static {
    /// Build up to `n` values.
    fn build_n(&self, n: usize) -> Result<Vec<T>, BuildError> {
        sequences::build(self, n)
    }

    /// Build every value until the sequence is exhausted.
    ///
    /// Never returns for infinite sequences; use [`limit`](Self::limit).
    fn build_all(&self) -> Result<Vec<T>, BuildError> {
        sequences::build_all(self)
    }

    /// A sequence builder stopping after at most `n` values.
    fn limit(&self, n: usize) -> Limit<T> {
        sequences::limit(Arc::new(self.clone()), n)
    }

    /// A lazy iterator over the sequence. Every call starts from `self`.
    fn iter(&self) -> Iter<T> {
        sequences::iterator(Arc::new(self.clone()))
    }
}

/// Selects the [`Assign`] impl for plain values.
pub enum ByValue {}

/// Selects the [`Assign`] impl for builders.
pub enum ByBuilder {}

/// Something a with-method accepts for a property of type `T`: either a
/// plain `T` or a builder of `T`.
///
/// `M` is inferred and only exists to keep the two impls apart.
pub trait Assign<T, M> {
    /// Convert into the child builder stored in the slot.
    fn into_builder(self) -> Arc<dyn Builder<T>>;
}

impl<T: Clone + Send + Sync + 'static> Assign<T, ByValue> for T {
    fn into_builder(self) -> Arc<dyn Builder<T>> {
        Arc::new(SingleValue::new(self))
    }
}

impl<T, B: Builder<T> + 'static> Assign<T, ByBuilder> for B {
    fn into_builder(self) -> Arc<dyn Builder<T>> {
        Arc::new(self)
    }
}

/// Conversions available on every builder.
pub trait BuilderExt<T>: Builder<T> + Sized + 'static {
    /// Type-erase into a shared handle.
    fn shared(self) -> Arc<dyn Builder<T>> {
        Arc::new(self)
    }
}

impl<T, B: Builder<T> + 'static> BuilderExt<T> for B {}
