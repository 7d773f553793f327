use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, type_name};

use parking_lot::RwLock;

use crate::extract::Binding;
use crate::{
    Assign, BuildError, Builder, Implementation, Mode, NoValueError, Target, TypeDesc, Value, trace,
};

/// Type-erased generator stored in an instance.
pub type GeneratorFn<T> =
    Arc<dyn Fn(&BuilderInstance<T>) -> Result<T, BuildError> + Send + Sync>;

type Child = Arc<dyn Builder<Value>>;

/// Adapts a typed child builder to the [`Value`] slots of an instance.
struct Erased<V>(Arc<dyn Builder<V>>);

impl<V: Any + Send> Builder<Value> for Erased<V> {
    fn build(&self) -> Result<Value, BuildError> {
        self.0.build().map(Value::new)
    }

    fn next(&self) -> Option<Arc<dyn Builder<Value>>> {
        let next = self.0.next()?;
        Some(Arc::new(Erased(next)))
    }

    fn has_next(&self) -> bool {
        self.0.has_next()
    }
}

/// A builder synthesized from a contract.
///
/// Holds one optional child builder per property of its [`Implementation`].
/// Cloning the handle is cheap; in [`Mode::Mutable`] clones share their
/// property slots, in [`Mode::Immutable`] no slot table is ever written
/// after creation.
pub struct BuilderInstance<T> {
    implementation: Arc<Implementation<T>>,
    generator: Option<GeneratorFn<T>>,
    slots: Arc<RwLock<Vec<Option<Child>>>>,
}

impl<T> Clone for BuilderInstance<T> {
    fn clone(&self) -> Self {
        Self {
            implementation: Arc::clone(&self.implementation),
            generator: self.generator.clone(),
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<T: Target> BuilderInstance<T> {
    pub(crate) fn new(implementation: Arc<Implementation<T>>, generator: Option<GeneratorFn<T>>) -> Self {
        let slots = alloc::vec![None; implementation.properties().len()];
        Self {
            implementation,
            generator,
            slots: Arc::new(RwLock::new(slots)),
        }
    }

    /// Copy constructor: same implementation and generator, given slots.
    fn with_slots(&self, slots: Vec<Option<Child>>) -> Self {
        Self {
            implementation: Arc::clone(&self.implementation),
            generator: self.generator.clone(),
            slots: Arc::new(RwLock::new(slots)),
        }
    }

    fn snapshot(&self) -> Vec<Option<Child>> {
        self.slots.read().clone()
    }

    /// The shared implementation behind this instance.
    pub fn implementation(&self) -> &Arc<Implementation<T>> {
        &self.implementation
    }

    /// Whether `other` shares this instance's property slots.
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slots, &other.slots)
    }

    /// Set a property through its with-method.
    ///
    /// # Panics
    ///
    /// If `method` is not a with-method of the contract or `V` is not the
    /// property's type. Builders generated by [`contract!`](crate::contract)
    /// only pass names and types taken from the contract itself.
    pub fn with<V, M, A>(&self, method: &str, value: A) -> Self
    where
        V: Any + Send,
        A: Assign<V, M>,
    {
        match self.try_with(method, value) {
            Ok(instance) => instance,
            Err(e) => panic!("{e}"),
        }
    }

    /// Set a property through its with-method, reporting unknown methods and
    /// type mismatches as errors.
    pub fn try_with<V, M, A>(&self, method: &str, value: A) -> Result<Self, BuildError>
    where
        V: Any + Send,
        A: Assign<V, M>,
    {
        let Some(Binding::With(index)) = self.implementation.binding(method) else {
            return Err(self.unknown(method));
        };
        let expected = self.implementation.properties()[index].ty();
        if expected != TypeDesc::of::<V>() {
            return Err(BuildError::Cast {
                expected: expected.name,
                found: type_name::<V>(),
            });
        }
        let child: Child = Arc::new(Erased(value.into_builder()));
        Ok(match self.implementation.mode() {
            Mode::Immutable => {
                let mut slots = self.snapshot();
                slots[index] = Some(child);
                self.with_slots(slots)
            }
            Mode::Mutable => {
                self.slots.write()[index] = Some(child);
                self.clone()
            }
        })
    }

    /// Read a property through its accessor.
    pub fn get<V: Any>(&self, method: &str) -> Result<V, BuildError> {
        match self.implementation.binding(method) {
            Some(Binding::Accessor(index)) => self.built(index)?.unbox(),
            _ => Err(self.unknown(method)),
        }
    }

    /// Read a property through its optional accessor: `None` when unset.
    pub fn get_optional<V: Any>(&self, method: &str) -> Result<Option<V>, BuildError> {
        match self.implementation.binding(method) {
            Some(Binding::Optional(index)) => optional(self.built(index)),
            _ => Err(self.unknown(method)),
        }
    }

    /// Read through a method declared as returning `Option<V>`: an optional
    /// accessor of a `V` property, or an accessor of an `Option<V>` property.
    pub fn get_option<V: Any>(&self, method: &str) -> Result<Option<V>, BuildError> {
        match self.implementation.binding(method) {
            Some(Binding::Optional(index)) => optional(self.built(index)),
            Some(Binding::Accessor(index)) => self.built(index)?.unbox(),
            _ => Err(self.unknown(method)),
        }
    }

    /// Read a property by name, regardless of which accessors the contract
    /// declares.
    pub fn value<V: Any>(&self, property: &str) -> Result<V, BuildError> {
        match self.implementation.property_index(property) {
            Some(index) => self.built(index)?.unbox(),
            None => Err(self.unknown(property)),
        }
    }

    /// Read a property by name, `None` when unset.
    pub fn value_optional<V: Any>(&self, property: &str) -> Result<Option<V>, BuildError> {
        match self.implementation.property_index(property) {
            Some(index) => optional(self.built(index)),
            None => Err(self.unknown(property)),
        }
    }

    /// Whether the named property holds a child builder.
    pub fn is_set(&self, property: &str) -> bool {
        self.implementation
            .property_index(property)
            .is_some_and(|index| self.slots.read()[index].is_some())
    }

    fn built(&self, index: usize) -> Result<Value, BuildError> {
        let child = self.slots.read()[index].clone();
        match child {
            Some(child) => child.build(),
            None => Err(NoValueError::new(self.implementation.properties()[index].name()).into()),
        }
    }

    fn unknown(&self, method: &str) -> BuildError {
        BuildError::UnknownMethod {
            contract: self.implementation.contract(),
            method: method.into(),
        }
    }

    /// Build the target value.
    ///
    /// With a generator, returns whatever it produces. Otherwise constructs
    /// the target with its no-argument constructor and applies every set
    /// property that has a mutator, in property order.
    pub fn build(&self) -> Result<T, BuildError> {
        if let Some(generator) = &self.generator {
            return generator(self);
        }
        let shape = self.implementation.shape();
        let mut target = shape.construct()?;
        let slots = self.snapshot();
        for (property, child) in self.implementation.properties().iter().zip(slots) {
            let (Some(mutator), Some(child)) = (property.mutator(), child) else {
                continue;
            };
            shape.mutators()[mutator].apply(&mut target, child.build()?)?;
        }
        Ok(target)
    }

    /// Whether every set property can advance. Unset properties never block.
    pub fn has_next(&self) -> bool {
        self.snapshot().iter().flatten().all(|child| child.has_next())
    }

    /// The next instance of the sequence: every set property advanced by one
    /// step, unset properties carried over unset.
    pub fn next_instance(&self) -> Option<Self> {
        let mut advanced = Vec::with_capacity(self.implementation.properties().len());
        for child in self.snapshot() {
            advanced.push(match child {
                Some(child) => Some(child.next()?),
                None => None,
            });
        }
        trace!(contract = self.implementation.contract(), "advanced builder");
        Some(self.with_slots(advanced))
    }

    /// An independent copy: later with-calls on either side are not seen by
    /// the other, even in [`Mode::Mutable`].
    pub fn but(&self) -> Self {
        self.with_slots(self.snapshot())
    }
}

fn optional<V: Any>(built: Result<Value, BuildError>) -> Result<Option<V>, BuildError> {
    match built {
        Ok(value) => value.unbox().map(Some),
        Err(BuildError::NoValue(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

impl<T: Target> Builder<T> for BuilderInstance<T> {
    fn build(&self) -> Result<T, BuildError> {
        BuilderInstance::build(self)
    }

    fn next(&self) -> Option<Arc<dyn Builder<T>>> {
        let next = self.next_instance()?;
        Some(Arc::new(next))
    }

    fn has_next(&self) -> bool {
        BuilderInstance::has_next(self)
    }
}

impl<T> core::fmt::Debug for BuilderInstance<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let implementation = &self.implementation;
        let slots = self.slots.read();
        let mut map = f.debug_map();
        for (property, child) in implementation.properties().iter().zip(slots.iter()) {
            map.entry(&property.name(), &child.is_some());
        }
        map.finish()
    }
}
