//! Small builders for property values: single values, repeated values,
//! fixed element lists, and sequential composition of other builders.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::{BuildError, Builder, SequenceBuilder};

/// Builds one value and never advances.
///
/// With-methods wrap plain values in this, so a property set to a plain
/// value ends any sequence after its first element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleValue<T> {
    value: T,
}

impl<T> SingleValue<T> {
    /// Wrap `value`.
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// The wrapped value.
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: Clone + Send + Sync> Builder<T> for SingleValue<T> {
    fn build(&self) -> Result<T, BuildError> {
        Ok(self.value.clone())
    }

    fn next(&self) -> Option<Arc<dyn Builder<T>>> {
        None
    }
}

impl<T: Clone + Send + Sync + 'static> SequenceBuilder<T> for SingleValue<T> {}

/// A one-element sequence.
pub fn once<T>(value: T) -> SingleValue<T> {
    SingleValue::new(value)
}

/// Builds the same value forever.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constant<T> {
    value: T,
}

impl<T: Clone + Send + Sync + 'static> Builder<T> for Constant<T> {
    fn build(&self) -> Result<T, BuildError> {
        Ok(self.value.clone())
    }

    fn next(&self) -> Option<Arc<dyn Builder<T>>> {
        Some(Arc::new(self.clone()))
    }
}

impl<T: Clone + Send + Sync + 'static> SequenceBuilder<T> for Constant<T> {}

/// An infinite sequence of `value`.
pub fn constant<T>(value: T) -> Constant<T> {
    Constant { value }
}

/// Builds the same value a fixed number of times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repeat<T> {
    value: T,
    remaining: usize,
}

impl<T: Clone + Send + Sync + 'static> Builder<T> for Repeat<T> {
    fn build(&self) -> Result<T, BuildError> {
        match self.remaining {
            0 => Err(BuildError::Exhausted),
            _ => Ok(self.value.clone()),
        }
    }

    fn next(&self) -> Option<Arc<dyn Builder<T>>> {
        (self.remaining > 1).then(|| {
            Arc::new(Repeat {
                value: self.value.clone(),
                remaining: self.remaining - 1,
            }) as Arc<dyn Builder<T>>
        })
    }
}

impl<T: Clone + Send + Sync + 'static> SequenceBuilder<T> for Repeat<T> {}

/// `value`, `times` times.
pub fn repeat<T>(value: T, times: usize) -> Repeat<T> {
    Repeat {
        value,
        remaining: times,
    }
}

/// Walks a fixed list of values.
#[derive(Debug)]
pub struct Elements<T> {
    items: Arc<[T]>,
    index: usize,
}

impl<T> Clone for Elements<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            index: self.index,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Builder<T> for Elements<T> {
    fn build(&self) -> Result<T, BuildError> {
        self.items
            .get(self.index)
            .cloned()
            .ok_or(BuildError::Exhausted)
    }

    fn next(&self) -> Option<Arc<dyn Builder<T>>> {
        (self.index + 1 < self.items.len()).then(|| {
            Arc::new(Elements {
                items: Arc::clone(&self.items),
                index: self.index + 1,
            }) as Arc<dyn Builder<T>>
        })
    }
}

impl<T: Clone + Send + Sync + 'static> SequenceBuilder<T> for Elements<T> {}

/// A sequence of the given values, in order.
pub fn elements<T>(values: impl IntoIterator<Item = T>) -> Elements<T> {
    Elements {
        items: values.into_iter().collect::<Vec<_>>().into(),
        index: 0,
    }
}

/// A sequence with no values.
pub struct Never<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Never<T> {
    fn clone(&self) -> Self {
        never()
    }
}

impl<T> core::fmt::Debug for Never<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Never")
    }
}

impl<T> Builder<T> for Never<T> {
    fn build(&self) -> Result<T, BuildError> {
        Err(BuildError::Exhausted)
    }

    fn next(&self) -> Option<Arc<dyn Builder<T>>> {
        None
    }
}

impl<T: 'static> SequenceBuilder<T> for Never<T> {}

/// The empty sequence.
pub fn never<T>() -> Never<T> {
    Never {
        _marker: PhantomData,
    }
}

/// Concatenation of several sequences.
pub struct Composed<T> {
    parts: Arc<[Arc<dyn Builder<T>>]>,
    index: usize,
    current: Option<Arc<dyn Builder<T>>>,
}

impl<T> Clone for Composed<T> {
    fn clone(&self) -> Self {
        Self {
            parts: Arc::clone(&self.parts),
            index: self.index,
            current: self.current.clone(),
        }
    }
}

impl<T: 'static> Builder<T> for Composed<T> {
    fn build(&self) -> Result<T, BuildError> {
        match &self.current {
            Some(current) => current.build(),
            None => Err(BuildError::Exhausted),
        }
    }

    fn next(&self) -> Option<Arc<dyn Builder<T>>> {
        let current = self.current.as_ref()?;
        let (index, current) = match current.next() {
            Some(next) if !is_empty(&*next) => (self.index, next),
            _ => first_nonempty(&self.parts, self.index + 1)?,
        };
        Some(Arc::new(Composed {
            parts: Arc::clone(&self.parts),
            index,
            current: Some(current),
        }))
    }
}

/// A builder that reports `Exhausted` has no values to contribute. Any
/// other error still counts as a value so that it surfaces to the caller.
fn is_empty<T>(builder: &dyn Builder<T>) -> bool {
    matches!(builder.build(), Err(BuildError::Exhausted))
}

fn first_nonempty<T>(
    parts: &[Arc<dyn Builder<T>>],
    from: usize,
) -> Option<(usize, Arc<dyn Builder<T>>)> {
    parts
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, part)| !is_empty(&***part))
        .map(|(index, part)| (index, Arc::clone(part)))
}

impl<T: 'static> SequenceBuilder<T> for Composed<T> {}

/// Every value of each builder in turn: `compose([once(a), once(b)])`
/// builds `a` then `b`.
pub fn compose<T>(parts: impl IntoIterator<Item = Arc<dyn Builder<T>>>) -> Composed<T> {
    let parts: Arc<[Arc<dyn Builder<T>>]> = parts.into_iter().collect::<Vec<_>>().into();
    let (index, current) = match first_nonempty(&parts, 0) {
        Some((index, current)) => (index, Some(current)),
        None => (parts.len(), None),
    };
    Composed {
        parts,
        index,
        current,
    }
}
