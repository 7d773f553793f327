#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
/// Forwards to tracing::trace when the tracing feature is enabled
macro_rules! trace {
    ($($tt:tt)*) => {};
}
#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
/// Forwards to tracing::debug when the tracing feature is enabled
macro_rules! debug {
    ($($tt:tt)*) => {};
}

mod error;
pub use error::*;

mod types;
pub use types::*;

mod value;
pub use value::*;

mod target;
pub use target::*;

mod contract;
pub use contract::{Contract, ContractDecl, Generator, MethodDecl, Mode, ParamDecl, Returns};

mod property;
pub use property::*;

mod extract;
pub use extract::extract;

mod synth;
pub use synth::*;

mod instance;
pub use instance::*;

mod builder;
pub use builder::*;

pub mod builders;
pub mod sequences;

mod registry;
pub use registry::*;

mod macros;

#[doc(hidden)]
pub mod __private {
    pub use alloc::sync::Arc;
}

/// A fresh builder for `C` from the [global registry](Registry::global).
///
/// Fails when `C` is not a valid contract for its target type.
pub fn builder<C: Contract>() -> Result<C, ContractError> {
    Registry::global().builder::<C>()
}

/// A fresh builder for `C` from the [global registry](Registry::global),
/// building through `generator` instead of the target's constructor.
pub fn builder_with<C: Contract>(generator: impl Generator<C>) -> Result<C, ContractError> {
    Registry::global().builder_with::<C>(generator)
}
