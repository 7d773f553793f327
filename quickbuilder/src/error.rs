use alloc::boxed::Box;
use alloc::string::String;

/// A builder contract could not be turned into an implementation.
///
/// Raised only while a contract is being extracted, before any builder
/// exists. It is never cached: asking again re-runs extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractError {
    contract: &'static str,
    kind: ContractErrorKind,
}

/// What exactly was wrong with a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractErrorKind {
    /// The declaration carries state or implementation.
    NotAnInterface,
    /// The declaration cannot be implemented from outside its defining scope.
    Inaccessible,
    /// A method fits none of the naming conventions.
    UnrecognisedMethod {
        /// Offending method.
        method: &'static str,
    },
    /// A with-method names a property the target type cannot receive.
    NoSetter {
        /// Property derived from the with-method.
        property: &'static str,
        /// Declared property type.
        ty: &'static str,
        /// Closest mutator name on the target, if any is close enough.
        suggestion: Option<&'static str>,
    },
    /// A property type is an unbounded or wildcard-bounded generic.
    Wildcards {
        /// Offending method.
        method: &'static str,
        /// The bound as declared.
        bound: &'static str,
    },
    /// An accessor declares parameters.
    AccessorParameters {
        /// Offending accessor.
        method: &'static str,
    },
    /// A method returns something other than what its role requires.
    WrongReturnType {
        /// Offending method.
        method: &'static str,
        /// What it should have returned.
        expected: String,
    },
    /// A with-method takes zero or several parameters.
    ParameterCount {
        /// Offending method.
        method: &'static str,
        /// Number of declared parameters.
        count: usize,
    },
    /// Two with-methods address the same property with different types.
    ConflictingTypes {
        /// Property name.
        property: &'static str,
        /// Type of the first declaration.
        first: &'static str,
        /// Type of the later declaration.
        second: &'static str,
    },
    /// An accessor has no with-method backing it.
    NoSuchProperty {
        /// Offending accessor.
        method: &'static str,
    },
    /// An accessor returns a different type than its property.
    AccessorTypeMismatch {
        /// Offending accessor.
        method: &'static str,
        /// Property name.
        property: &'static str,
        /// Property type.
        expected: &'static str,
        /// Declared accessor type.
        found: &'static str,
    },
}

impl ContractError {
    pub(crate) fn new(contract: &'static str, kind: ContractErrorKind) -> Self {
        Self { contract, kind }
    }

    /// Name of the contract that failed validation.
    pub fn contract(&self) -> &'static str {
        self.contract
    }

    /// Structured description of the failure.
    pub fn kind(&self) -> &ContractErrorKind {
        &self.kind
    }

    /// Stable, machine-readable code for the failed rule.
    pub fn code(&self) -> &'static str {
        match self.kind {
            ContractErrorKind::NotAnInterface => "contract::not_an_interface",
            ContractErrorKind::Inaccessible => "contract::inaccessible",
            ContractErrorKind::UnrecognisedMethod { .. } => "contract::unrecognised_method",
            ContractErrorKind::NoSetter { .. } => "contract::no_setter",
            ContractErrorKind::Wildcards { .. } => "contract::wildcards",
            ContractErrorKind::AccessorParameters { .. } => "contract::accessor_parameters",
            ContractErrorKind::WrongReturnType { .. } => "contract::wrong_return_type",
            ContractErrorKind::ParameterCount { .. } => "contract::parameter_count",
            ContractErrorKind::ConflictingTypes { .. } => "contract::conflicting_types",
            ContractErrorKind::NoSuchProperty { .. } => "contract::no_such_property",
            ContractErrorKind::AccessorTypeMismatch { .. } => "contract::accessor_type_mismatch",
        }
    }
}

impl core::fmt::Display for ContractErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ContractErrorKind::NotAnInterface => write!(f, "not an interface"),
            ContractErrorKind::Inaccessible => {
                write!(f, "cannot implement the interface, it is not accessible")
            }
            ContractErrorKind::UnrecognisedMethod { method } => {
                write!(f, "`{method}` is neither a with-method nor an accessor")
            }
            ContractErrorKind::NoSetter {
                property,
                ty,
                suggestion,
            } => {
                write!(f, "no setter found for {property} of type {ty}")?;
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean `{suggestion}`?)")?;
                }
                Ok(())
            }
            ContractErrorKind::Wildcards { method, bound } => {
                write!(f, "{method}: wildcards not currently supported (found {bound})")
            }
            ContractErrorKind::AccessorParameters { method } => {
                write!(f, "{method} should not have parameters")
            }
            ContractErrorKind::WrongReturnType { method, expected } => {
                write!(f, "{method} should declare return type as {expected}")
            }
            ContractErrorKind::ParameterCount { method, count } => {
                write!(
                    f,
                    "{method} should take exactly one parameter, but declares {count}"
                )
            }
            ContractErrorKind::ConflictingTypes {
                property,
                first,
                second,
            } => write!(
                f,
                "property {property} is declared with conflicting types {first} and {second}"
            ),
            ContractErrorKind::NoSuchProperty { method } => {
                write!(f, "{method} does not correspond to any declared property")
            }
            ContractErrorKind::AccessorTypeMismatch {
                method,
                property,
                expected,
                found,
            } => write!(
                f,
                "{method} returns {found}, but property {property} has type {expected}"
            ),
        }
    }
}

impl core::fmt::Display for ContractError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.contract, self.kind)
    }
}

impl core::error::Error for ContractError {}

/// A property was read before any value was set for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoValueError {
    property: &'static str,
}

impl NoValueError {
    pub(crate) fn new(property: &'static str) -> Self {
        Self { property }
    }

    /// The property that had no value.
    pub fn property(&self) -> &'static str {
        self.property
    }
}

impl core::fmt::Display for NoValueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "_{p}() called, but no value has been set for property {p}",
            p = self.property
        )
    }
}

impl core::error::Error for NoValueError {}

/// Errors raised while building a target value or reading a property.
///
/// These never leave the builder in a different state than before the call.
#[derive(Debug)]
pub enum BuildError {
    /// An unset property was dereferenced.
    NoValue(NoValueError),

    /// No generator was configured and the target has no no-argument constructor.
    NoConstructor {
        /// Target type name.
        target: &'static str,
    },

    /// A value could not be unboxed to the type a mutator or accessor expects.
    Cast {
        /// The requested type.
        expected: &'static str,
        /// What the value actually held.
        found: &'static str,
    },

    /// The contract has no method of that name.
    UnknownMethod {
        /// Contract name.
        contract: &'static str,
        /// The name that was asked for.
        method: String,
    },

    /// The sequence has no value left to build.
    Exhausted,

    /// Raised by user code (a generator, usually) and passed through untouched.
    Custom(Box<dyn core::error::Error + Send + Sync>),
}

impl BuildError {
    /// Wrap an error raised by a generator.
    pub fn custom(error: impl Into<Box<dyn core::error::Error + Send + Sync>>) -> Self {
        BuildError::Custom(error.into())
    }

    /// Whether this error reports an unset property.
    pub fn is_no_value(&self) -> bool {
        matches!(self, BuildError::NoValue(_))
    }

    /// Borrow the user error carried by [`BuildError::Custom`] as a concrete type.
    pub fn downcast_ref<E: core::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            BuildError::Custom(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

impl From<NoValueError> for BuildError {
    fn from(value: NoValueError) -> Self {
        BuildError::NoValue(value)
    }
}

impl core::fmt::Display for BuildError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BuildError::NoValue(inner) => write!(f, "{inner}"),
            BuildError::NoConstructor { target } => write!(
                f,
                "{target} has no no-argument constructor and no generator was supplied"
            ),
            BuildError::Cast { expected, found } => {
                write!(f, "cannot cast value of type {found} to {expected}")
            }
            BuildError::UnknownMethod { contract, method } => {
                write!(f, "{contract} has no method named `{method}`")
            }
            BuildError::Exhausted => write!(f, "sequence exhausted"),
            BuildError::Custom(inner) => write!(f, "{inner}"),
        }
    }
}

impl core::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            BuildError::NoValue(inner) => Some(inner),
            BuildError::Custom(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_value_message_names_the_accessor() {
        let err = BuildError::from(NoValueError::new("name"));
        assert!(err.is_no_value());
        insta::assert_snapshot!(err, @"_name() called, but no value has been set for property name");
    }

    #[test]
    fn contract_error_codes_are_stable() {
        let err = ContractError::new(
            "FruitBuilder",
            ContractErrorKind::NoSetter {
                property: "nmae",
                ty: "alloc::string::String",
                suggestion: Some("name"),
            },
        );
        assert_eq!(err.code(), "contract::no_setter");
        insta::assert_snapshot!(err, @"FruitBuilder: no setter found for nmae of type alloc::string::String (did you mean `name`?)");
    }

    #[test]
    fn custom_errors_pass_through() {
        #[derive(Debug)]
        struct Boom;
        impl core::fmt::Display for Boom {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("boom")
            }
        }
        impl core::error::Error for Boom {}

        let err = BuildError::custom(Boom);
        assert!(err.downcast_ref::<Boom>().is_some());
        assert_eq!(err.to_string(), "boom");
    }
}
