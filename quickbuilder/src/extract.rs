//! Property model extraction: turns a [`ContractDecl`] into an ordered,
//! de-duplicated property table and a method dispatch table, validating the
//! contract against the target's mutation surface on the way.

use alloc::vec::Vec;
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::contract::Form;
use crate::{
    Contract, ContractDecl, ContractError, ContractErrorKind, ParamDecl, Property, Returns, Target,
    TargetShape, TypeDesc, trace,
};

/// Method names belonging to the builder and sequence protocols.
const PROTOCOL_METHODS: &[&str] = &[
    "build",
    "next",
    "has_next",
    "build_n",
    "build_all",
    "limit",
    "iter",
    "but",
];

/// Base protocols a with-method may return instead of its own contract.
const BASE_CONTRACTS: &[&str] = &["Builder", "SequenceBuilder", "MutableBuilder"];

/// What a contract method resolves to at dispatch time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Binding {
    With(usize),
    Accessor(usize),
    Optional(usize),
}

/// Output of a successful extraction.
#[derive(Debug)]
pub(crate) struct Model {
    pub(crate) properties: Vec<Property>,
    pub(crate) methods: HashMap<&'static str, Binding>,
}

enum Role {
    With { property: &'static str },
    Accessor { property: &'static str, optional: bool },
    Protocol,
    Unrecognised,
}

fn classify(name: &'static str) -> Role {
    if PROTOCOL_METHODS.contains(&name) {
        return Role::Protocol;
    }
    if let Some(property) = name.strip_prefix("__") {
        return match property {
            "" => Role::Unrecognised,
            _ => Role::Accessor {
                property,
                optional: true,
            },
        };
    }
    if let Some(property) = name.strip_prefix('_') {
        return match property {
            "" => Role::Unrecognised,
            _ => Role::Accessor {
                property,
                optional: false,
            },
        };
    }
    match name.split_once('_') {
        Some((prefix, property))
            if !prefix.is_empty()
                && !property.is_empty()
                && prefix.bytes().all(|b| b.is_ascii_lowercase()) =>
        {
            Role::With { property }
        }
        _ => Role::Unrecognised,
    }
}

struct WithMethod {
    method: &'static str,
    property: &'static str,
    param: ParamDecl,
}

struct AccessorMethod {
    method: &'static str,
    property: &'static str,
    ty: TypeDesc,
    optional: bool,
}

/// Extract the ordered property set of contract `C`.
///
/// Runs the same validation as synthesis, without installing anything.
pub fn extract<C: Contract>() -> Result<Vec<Property>, ContractError> {
    let shape = C::Target::shape();
    extract_model(&C::declare(), &shape).map(|model| model.properties)
}

pub(crate) fn extract_model<T: 'static>(
    decl: &ContractDecl,
    shape: &TargetShape<T>,
) -> Result<Model, ContractError> {
    let contract = decl.name;
    let fail = |kind| Err(ContractError::new(contract, kind));

    let lineage = decl.lineage();
    for ancestor in &lineage {
        if ancestor.form == Form::Concrete {
            return fail(ContractErrorKind::NotAnInterface);
        }
        if !ancestor.accessible {
            return fail(ContractErrorKind::Inaccessible);
        }
    }

    let mut withs = Vec::new();
    let mut accessors = Vec::new();
    for method in lineage.iter().flat_map(|d| d.methods.iter()) {
        match classify(method.name) {
            Role::Protocol => continue,
            Role::Unrecognised => {
                return fail(ContractErrorKind::UnrecognisedMethod {
                    method: method.name,
                });
            }
            Role::Accessor { property, optional } => {
                if !method.params.is_empty() {
                    return fail(ContractErrorKind::AccessorParameters {
                        method: method.name,
                    });
                }
                let ty = match (optional, method.returns) {
                    (false, Returns::Value(ty)) | (true, Returns::Optional(ty)) => ty,
                    (false, _) => {
                        return fail(ContractErrorKind::WrongReturnType {
                            method: method.name,
                            expected: "the property type".into(),
                        });
                    }
                    (true, _) => {
                        return fail(ContractErrorKind::WrongReturnType {
                            method: method.name,
                            expected: "Option of the property type".into(),
                        });
                    }
                };
                if ty.wildcard {
                    return fail(ContractErrorKind::Wildcards {
                        method: method.name,
                        bound: ty.name,
                    });
                }
                accessors.push(AccessorMethod {
                    method: method.name,
                    property,
                    ty,
                    optional,
                });
            }
            Role::With { property } => {
                if method.params.len() != 1 {
                    return fail(ContractErrorKind::ParameterCount {
                        method: method.name,
                        count: method.params.len(),
                    });
                }
                let returns_builder = match method.returns {
                    Returns::This => true,
                    Returns::Contract(name) => {
                        BASE_CONTRACTS.contains(&name) || lineage.iter().any(|d| d.name == name)
                    }
                    _ => false,
                };
                if !returns_builder {
                    return fail(ContractErrorKind::WrongReturnType {
                        method: method.name,
                        expected: contract.into(),
                    });
                }
                let param = method.params[0];
                if param.ty.wildcard {
                    return fail(ContractErrorKind::Wildcards {
                        method: method.name,
                        bound: param.ty.name,
                    });
                }
                withs.push(WithMethod {
                    method: method.name,
                    property,
                    param,
                });
            }
        }
    }

    let mut properties: IndexMap<&'static str, Property> = IndexMap::new();
    let mut methods = HashMap::new();
    for with in &withs {
        let index = match properties.get_index_of(with.property) {
            Some(index) => {
                let first = properties[index].ty;
                if first != with.param.ty {
                    return fail(ContractErrorKind::ConflictingTypes {
                        property: with.property,
                        first: first.name,
                        second: with.param.ty.name,
                    });
                }
                index
            }
            None => {
                let mutator = shape.find_mutator(with.property, &with.param.ty);
                let accessor_only = accessors
                    .iter()
                    .any(|a| a.property == with.property && a.ty == with.param.ty);
                if mutator.is_none() && !accessor_only {
                    return fail(ContractErrorKind::NoSetter {
                        property: with.property,
                        ty: with.param.ty.name,
                        suggestion: suggest(with.property, shape),
                    });
                }
                trace!(
                    contract,
                    property = with.property,
                    ty = with.param.ty.name,
                    nested = with.param.builder,
                    accessor_only = mutator.is_none(),
                    "classified property"
                );
                let property = Property {
                    name: with.property,
                    ty: with.param.ty,
                    nested: with.param.builder,
                    mutator,
                };
                properties.insert_full(with.property, property).0
            }
        };
        methods.entry(with.method).or_insert(Binding::With(index));
    }

    for accessor in &accessors {
        let Some(index) = properties.get_index_of(accessor.property) else {
            return fail(ContractErrorKind::NoSuchProperty {
                method: accessor.method,
            });
        };
        let expected = properties[index].ty;
        if expected != accessor.ty {
            return fail(ContractErrorKind::AccessorTypeMismatch {
                method: accessor.method,
                property: accessor.property,
                expected: expected.name,
                found: accessor.ty.name,
            });
        }
        let binding = if accessor.optional {
            Binding::Optional(index)
        } else {
            Binding::Accessor(index)
        };
        methods.entry(accessor.method).or_insert(binding);
    }

    Ok(Model {
        properties: properties.into_values().collect(),
        methods,
    })
}

/// Closest differently-named mutator on the target.
#[cfg(feature = "suggestions")]
fn suggest<T: 'static>(property: &str, shape: &TargetShape<T>) -> Option<&'static str> {
    const SIMILARITY_THRESHOLD: f64 = 0.8;

    let mut best_match: Option<(&'static str, f64)> = None;
    for known in shape.mutators().iter().map(|m| m.property()) {
        if known == property {
            continue;
        }
        let similarity = strsim::jaro_winkler(property, known);
        if similarity >= SIMILARITY_THRESHOLD
            && best_match.is_none_or(|(_, best_sim)| similarity > best_sim)
        {
            best_match = Some((known, similarity));
        }
    }
    best_match.map(|(name, _)| name)
}

#[cfg(not(feature = "suggestions"))]
fn suggest<T: 'static>(_property: &str, _shape: &TargetShape<T>) -> Option<&'static str> {
    None
}
