//! Memoized synthesis, keyed by contract type.
//!
//! Every contract is synthesized at most once per registry. Lookups for
//! contracts that are already installed only take a read lock and never wait
//! on a synthesis in progress for another contract.

use alloc::sync::Arc;
use core::any::{Any, TypeId, type_name};
use core::sync::atomic::{AtomicUsize, Ordering};
use std::collections::HashMap;
use std::sync::{LazyLock, OnceLock};

use parking_lot::{Mutex, RwLock};

use crate::{BuilderInstance, Contract, ContractError, Generator, Implementation, trace};

type Erased = Arc<dyn Any + Send + Sync>;

/// One contract's entry: the finished implementation, and a gate that
/// serializes synthesis attempts for this key only.
#[derive(Default)]
struct Slot {
    implementation: OnceLock<Erased>,
    gate: Mutex<()>,
}

/// A cache of synthesized builder implementations.
///
/// ```
/// # use quickbuilder::Registry;
/// let registry = Registry::new();
/// assert!(registry.is_empty());
/// ```
#[derive(Default)]
pub struct Registry {
    slots: RwLock<HashMap<TypeId, Arc<Slot>>>,
    syntheses: AtomicUsize,
}

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by [`builder`](crate::builder) and
    /// [`builder_with`](crate::builder_with).
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// A fresh builder for `C`, with every property unset.
    ///
    /// The first call for a contract validates and synthesizes it; later
    /// calls reuse the implementation. Failures are not cached.
    pub fn builder<C: Contract>(&self) -> Result<C, ContractError> {
        let implementation = self.implementation::<C>()?;
        Ok(C::from_instance(BuilderInstance::new(implementation, None)))
    }

    /// A fresh builder for `C` whose `build()` delegates to `generator`.
    pub fn builder_with<C: Contract>(
        &self,
        generator: impl Generator<C>,
    ) -> Result<C, ContractError> {
        let implementation = self.implementation::<C>()?;
        let generator: crate::GeneratorFn<C::Target> =
            Arc::new(move |instance: &BuilderInstance<C::Target>| {
                generator.generate(&C::from_instance(instance.clone()))
            });
        Ok(C::from_instance(BuilderInstance::new(
            implementation,
            Some(generator),
        )))
    }

    /// The implementation of `C`, synthesizing it on first use.
    pub fn implementation<C: Contract>(
        &self,
    ) -> Result<Arc<Implementation<C::Target>>, ContractError> {
        let slot = self.slot(TypeId::of::<C>());
        let erased = match slot.implementation.get() {
            Some(found) => {
                trace!(contract = type_name::<C>(), "cache hit");
                Arc::clone(found)
            }
            None => self.synthesize::<C>(&slot)?,
        };
        // slots are keyed by the contract type, which fixes the target type
        match erased.downcast::<Implementation<C::Target>>() {
            Ok(implementation) => Ok(implementation),
            Err(_) => unreachable!("slot for {} holds another target", type_name::<C>()),
        }
    }

    fn synthesize<C: Contract>(&self, slot: &Slot) -> Result<Erased, ContractError> {
        let _gate = slot.gate.lock();
        // another thread may have finished while we waited
        if let Some(found) = slot.implementation.get() {
            return Ok(Arc::clone(found));
        }
        let implementation: Erased =
            Arc::new(Implementation::<C::Target>::synthesize(&C::declare())?);
        self.syntheses.fetch_add(1, Ordering::Relaxed);
        Ok(Arc::clone(
            slot.implementation.get_or_init(|| implementation),
        ))
    }

    fn slot(&self, key: TypeId) -> Arc<Slot> {
        if let Some(slot) = self.slots.read().get(&key) {
            return Arc::clone(slot);
        }
        Arc::clone(self.slots.write().entry(key).or_default())
    }

    /// Whether `C` has been synthesized.
    pub fn contains<C: Contract>(&self) -> bool {
        self.slots
            .read()
            .get(&TypeId::of::<C>())
            .is_some_and(|slot| slot.implementation.get().is_some())
    }

    /// Number of synthesized contracts.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|slot| slot.implementation.get().is_some())
            .count()
    }

    /// Whether nothing has been synthesized yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful synthesis runs. Never exceeds [`len`](Self::len).
    pub fn syntheses(&self) -> usize {
        self.syntheses.load(Ordering::Relaxed)
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.len())
            .field("syntheses", &self.syntheses())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContractDecl, MethodDecl, Target, TargetShape};
    use alloc::string::String;

    #[derive(Default)]
    struct Label {
        text: String,
    }

    impl Target for Label {
        fn shape() -> TargetShape<Self> {
            TargetShape::new("Label")
                .with_default()
                .mutator("text", |l: &mut Label, text: String| l.text = text)
        }
    }

    #[derive(Clone)]
    struct LabelBuilder(BuilderInstance<Label>);

    impl Contract for LabelBuilder {
        type Target = Label;

        fn declare() -> ContractDecl {
            ContractDecl::interface("LabelBuilder").method(MethodDecl::with::<String>("with_text"))
        }

        fn from_instance(instance: BuilderInstance<Label>) -> Self {
            Self(instance)
        }

        fn instance(&self) -> &BuilderInstance<Label> {
            &self.0
        }
    }

    #[derive(Clone)]
    struct BrokenBuilder(BuilderInstance<Label>);

    impl Contract for BrokenBuilder {
        type Target = Label;

        fn declare() -> ContractDecl {
            ContractDecl::interface("BrokenBuilder").method(MethodDecl::with::<i32>("with_text"))
        }

        fn from_instance(instance: BuilderInstance<Label>) -> Self {
            Self(instance)
        }

        fn instance(&self) -> &BuilderInstance<Label> {
            &self.0
        }
    }

    #[derive(Clone)]
    struct CaptionBuilder(BuilderInstance<Label>);

    impl Contract for CaptionBuilder {
        type Target = Label;

        fn declare() -> ContractDecl {
            ContractDecl::interface("CaptionBuilder")
                .mutable()
                .method(MethodDecl::with::<String>("with_text"))
        }

        fn from_instance(instance: BuilderInstance<Label>) -> Self {
            Self(instance)
        }

        fn instance(&self) -> &BuilderInstance<Label> {
            &self.0
        }
    }

    #[test]
    fn slots_hold_their_own_contract() {
        let registry = Registry::new();
        for _ in 0..2 {
            let label = registry.implementation::<LabelBuilder>().unwrap();
            let caption = registry.implementation::<CaptionBuilder>().unwrap();
            assert_eq!(label.contract(), "LabelBuilder");
            assert_eq!(caption.contract(), "CaptionBuilder");
            assert_eq!(label.target(), caption.target());
        }
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.syntheses(), 2);
    }

    #[test]
    fn second_lookup_is_a_hit() {
        let registry = Registry::new();
        let first = registry.implementation::<LabelBuilder>().unwrap();
        let second = registry.implementation::<LabelBuilder>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.syntheses(), 1);
        assert_eq!(first.target(), "Label");
    }

    #[test]
    fn failed_synthesis_leaves_an_empty_slot() {
        let registry = Registry::new();
        let err = registry.builder::<BrokenBuilder>().err().unwrap();
        assert_eq!(err.code(), "contract::no_setter");
        assert!(registry.is_empty());
        assert!(!registry.contains::<BrokenBuilder>());

        let built = registry
            .builder::<LabelBuilder>()
            .unwrap()
            .0
            .with::<String, crate::ByValue, _>("with_text", String::from("hi"))
            .build()
            .unwrap();
        assert_eq!(built.text, "hi");
        insta::assert_debug_snapshot!(registry, @r"
        Registry {
            len: 1,
            syntheses: 1,
        }
        ");
    }
}
