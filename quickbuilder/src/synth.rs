use alloc::sync::Arc;
use alloc::vec::Vec;
use std::collections::HashMap;

use crate::extract::{Binding, extract_model};
use crate::instance::GeneratorFn;
use crate::{BuilderInstance, ContractDecl, ContractError, Mode, Property, Target, TargetShape, debug};

/// A synthesized builder implementation: the validated property table of one
/// contract, interpreted by every [`BuilderInstance`] created from it.
///
/// Implementations are shared between all instances of a contract and are
/// never modified after synthesis.
pub struct Implementation<T> {
    contract: &'static str,
    mode: Mode,
    properties: Vec<Property>,
    methods: HashMap<&'static str, Binding>,
    shape: TargetShape<T>,
}

impl<T: Target> Implementation<T> {
    /// Validate `decl` against `T` and build its dispatch tables.
    pub fn synthesize(decl: &ContractDecl) -> Result<Self, ContractError> {
        let shape = T::shape();
        let model = match extract_model(decl, &shape) {
            Ok(model) => model,
            Err(e) => {
                debug!(contract = decl.name(), code = e.code(), "contract rejected: {e}");
                return Err(e);
            }
        };
        debug!(
            contract = decl.name(),
            target = shape.name(),
            properties = model.properties.len(),
            mode = ?decl.mutability(),
            "synthesized builder"
        );
        Ok(Self {
            contract: decl.name(),
            mode: decl.mutability(),
            properties: model.properties,
            methods: model.methods,
            shape,
        })
    }

    /// A fresh instance with every property unset.
    pub fn instantiate(self: &Arc<Self>, generator: Option<GeneratorFn<T>>) -> BuilderInstance<T> {
        BuilderInstance::new(Arc::clone(self), generator)
    }
}

impl<T> Implementation<T> {
    /// Name of the implemented contract.
    pub fn contract(&self) -> &'static str {
        self.contract
    }

    /// Whether with-methods copy or update in place.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The property table, in first-seen order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Name of the built type.
    pub fn target(&self) -> &'static str {
        self.shape.name()
    }

    /// Position of the property called `name`.
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    pub(crate) fn shape(&self) -> &TargetShape<T> {
        &self.shape
    }

    pub(crate) fn binding(&self, method: &str) -> Option<Binding> {
        self.methods.get(method).copied()
    }
}

impl<T> core::fmt::Debug for Implementation<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Implementation")
            .field("contract", &self.contract)
            .field("target", &self.shape.name())
            .field("mode", &self.mode)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}
