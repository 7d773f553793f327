use crate::{Primitive, TypeDesc};

/// One settable property derived from a contract.
///
/// Properties are immutable once extracted. Their position in
/// [`Implementation::properties`](crate::Implementation::properties) is the
/// order of first appearance in the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Property {
    pub(crate) name: &'static str,
    pub(crate) ty: TypeDesc,
    pub(crate) nested: bool,
    pub(crate) mutator: Option<usize>,
}

impl Property {
    /// Property name, as derived from its with-method.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type.
    pub fn ty(&self) -> TypeDesc {
        self.ty
    }

    /// Primitive classification of the declared type.
    pub fn primitive(&self) -> Primitive {
        self.ty.primitive
    }

    /// Whether the declared type is array-shaped.
    pub fn is_array(&self) -> bool {
        self.ty.array
    }

    /// Whether values are always supplied as builders.
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// Index of the target mutator, absent for accessor-only properties.
    pub fn mutator(&self) -> Option<usize> {
        self.mutator
    }

    /// Whether `build()` forwards this property to the target.
    pub fn has_mutator(&self) -> bool {
        self.mutator.is_some()
    }
}
