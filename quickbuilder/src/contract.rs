use alloc::vec::Vec;
use core::any::Any;

use crate::{BuildError, BuilderInstance, Target, TypeDesc};

/// Whether with-methods copy the builder or update it in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Every with-call returns a new builder; the receiver is untouched.
    #[default]
    Immutable,
    /// With-calls write into the receiver and return a handle to it.
    Mutable,
}

/// What a contract method returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Returns {
    /// The declaring contract.
    This,
    /// A named contract: the declaring one, an ancestor, or a base protocol.
    Contract(&'static str),
    /// A property value.
    Value(TypeDesc),
    /// An optional property value.
    Optional(TypeDesc),
    /// Nothing.
    Unit,
}

/// One declared parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamDecl {
    /// Declared type. For builder parameters this is the built type.
    pub ty: TypeDesc,
    /// The parameter only accepts builders of `ty`.
    pub builder: bool,
}

impl ParamDecl {
    /// A parameter accepting a `T` (or a builder of one).
    pub fn value<T: Any>() -> Self {
        Self {
            ty: TypeDesc::of::<T>(),
            builder: false,
        }
    }

    /// A parameter accepting only builders of `T`.
    pub fn builder<T: Any>() -> Self {
        Self {
            ty: TypeDesc::of::<T>(),
            builder: true,
        }
    }

    /// A wildcard-bounded generic parameter.
    pub fn wildcard(bound: &'static str) -> Self {
        Self {
            ty: TypeDesc::wildcard(bound),
            builder: false,
        }
    }
}

/// Signature of one contract method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    /// Method name.
    pub name: &'static str,
    /// Declared parameters.
    pub params: Vec<ParamDecl>,
    /// Declared return type.
    pub returns: Returns,
}

impl MethodDecl {
    /// A method with no parameters returning nothing; refine it with
    /// [`param`](Self::param) and [`returns`](Self::returns).
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            params: Vec::new(),
            returns: Returns::Unit,
        }
    }

    /// `fn name(value: T) -> Self`
    pub fn with<T: Any>(name: &'static str) -> Self {
        Self::new(name)
            .param(ParamDecl::value::<T>())
            .returns(Returns::This)
    }

    /// `fn name(value: impl Builder<T>) -> Self`
    pub fn with_builder<T: Any>(name: &'static str) -> Self {
        Self::new(name)
            .param(ParamDecl::builder::<T>())
            .returns(Returns::This)
    }

    /// `fn name() -> T`
    pub fn accessor<T: Any>(name: &'static str) -> Self {
        Self::new(name).returns(Returns::Value(TypeDesc::of::<T>()))
    }

    /// `fn name() -> Option<T>`
    pub fn optional<T: Any>(name: &'static str) -> Self {
        Self::new(name).returns(Returns::Optional(TypeDesc::of::<T>()))
    }

    /// `fn name() -> Option<T>` as written in a contract: an optional
    /// accessor of a `T` property when `name` starts with `__`, otherwise an
    /// accessor of an `Option<T>` property.
    pub fn option<T: Any>(name: &'static str) -> Self {
        if name.starts_with("__") {
            Self::optional::<T>(name)
        } else {
            Self::accessor::<Option<T>>(name)
        }
    }

    /// Append a parameter.
    pub fn param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    /// Set the return type.
    pub fn returns(mut self, returns: Returns) -> Self {
        self.returns = returns;
        self
    }
}

/// Whether a declaration is a pure method-signature description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Form {
    /// Signatures only.
    Interface,
    /// Carries state or implementation.
    Concrete,
}

/// Statically declared description of a builder contract.
///
/// Usually produced by [`contract!`](crate::contract); hand-written
/// declarations are useful for contracts the macro cannot express, such as
/// inheritance between contracts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractDecl {
    pub(crate) name: &'static str,
    pub(crate) form: Form,
    pub(crate) accessible: bool,
    pub(crate) mode: Mode,
    pub(crate) parents: Vec<ContractDecl>,
    pub(crate) methods: Vec<MethodDecl>,
}

impl ContractDecl {
    /// An accessible, immutable interface with no methods yet.
    pub fn interface(name: &'static str) -> Self {
        Self {
            name,
            form: Form::Interface,
            accessible: true,
            mode: Mode::Immutable,
            parents: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// A declaration carrying state or implementation. Never synthesizable.
    pub fn concrete(name: &'static str) -> Self {
        Self {
            form: Form::Concrete,
            ..Self::interface(name)
        }
    }

    /// Mark the declaration as not implementable from outside its scope.
    pub fn inaccessible(mut self) -> Self {
        self.accessible = false;
        self
    }

    /// Set the mutability mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `.mode(Mode::Mutable)`.
    pub fn mutable(self) -> Self {
        self.mode(Mode::Mutable)
    }

    /// Inherit the methods of `parent`.
    pub fn extends(mut self, parent: ContractDecl) -> Self {
        self.parents.push(parent);
        self
    }

    /// Declare a method.
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    /// Contract name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Mutability mode.
    pub fn mutability(&self) -> Mode {
        self.mode
    }

    /// Methods declared directly on this contract.
    pub fn methods(&self) -> &[MethodDecl] {
        &self.methods
    }

    /// Direct parents, in declaration order.
    pub fn parents(&self) -> &[ContractDecl] {
        &self.parents
    }

    /// This declaration followed by every ancestor, depth-first.
    pub(crate) fn lineage(&self) -> Vec<&ContractDecl> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![self];
        while let Some(decl) = stack.pop() {
            out.push(decl);
            stack.extend(decl.parents.iter().rev());
        }
        out
    }
}

/// A typed builder contract.
///
/// Implementors are thin wrappers around a [`BuilderInstance`]; the
/// [`contract!`](crate::contract) macro writes the whole impl.
pub trait Contract: Sized + Clone + Send + Sync + 'static {
    /// The type this contract builds.
    type Target: Target;

    /// The method table to validate and implement.
    fn declare() -> ContractDecl;

    /// Wrap a freshly synthesized instance.
    fn from_instance(instance: BuilderInstance<Self::Target>) -> Self;

    /// Borrow the underlying instance.
    fn instance(&self) -> &BuilderInstance<Self::Target>;
}

/// User-supplied construction, used by `build()` in place of the target's
/// no-argument constructor and mutators.
pub trait Generator<C: Contract>: Send + Sync + 'static {
    /// Produce a target value from the builder's current state.
    fn generate(&self, builder: &C) -> Result<C::Target, BuildError>;
}

impl<C, F> Generator<C> for F
where
    C: Contract,
    F: Fn(&C) -> Result<C::Target, BuildError> + Send + Sync + 'static,
{
    fn generate(&self, builder: &C) -> Result<C::Target, BuildError> {
        self(builder)
    }
}
