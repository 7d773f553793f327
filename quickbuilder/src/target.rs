use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use crate::{BuildError, TypeDesc, Value};

/// A type that builders can construct.
///
/// The shape lists how to create a default instance and which properties
/// can be written afterwards. Nothing else about the type is inspected.
///
/// ```
/// use quickbuilder::{Target, TargetShape};
///
/// #[derive(Default)]
/// struct Fruit {
///     name: String,
/// }
///
/// impl Target for Fruit {
///     fn shape() -> TargetShape<Self> {
///         TargetShape::new("Fruit")
///             .with_default()
///             .mutator("name", |fruit: &mut Fruit, name: String| fruit.name = name)
///     }
/// }
/// ```
pub trait Target: Sized + Send + 'static {
    /// Describe the construction and mutation surface of `Self`.
    fn shape() -> TargetShape<Self>;
}

type ApplyFn<T> = dyn Fn(&mut T, Value) -> Result<(), BuildError> + Send + Sync;

/// A single writable property on a target type.
pub struct Mutator<T> {
    property: &'static str,
    param: TypeDesc,
    apply: Box<ApplyFn<T>>,
}

impl<T> Mutator<T> {
    /// Property written by this mutator.
    pub fn property(&self) -> &'static str {
        self.property
    }

    /// Declared parameter type.
    pub fn param(&self) -> TypeDesc {
        self.param
    }

    /// Unbox `value` to the parameter type and write it into `target`.
    pub fn apply(&self, target: &mut T, value: Value) -> Result<(), BuildError> {
        (self.apply)(target, value)
    }
}

impl<T> core::fmt::Debug for Mutator<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mutator")
            .field("property", &self.property)
            .field("param", &self.param.name)
            .finish_non_exhaustive()
    }
}

/// Construction and mutation surface of a [`Target`].
pub struct TargetShape<T> {
    name: &'static str,
    constructor: Option<fn() -> T>,
    mutators: Vec<Mutator<T>>,
}

impl<T: 'static> TargetShape<T> {
    /// A shape with no constructor and no mutators.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            constructor: None,
            mutators: Vec::new(),
        }
    }

    /// Use [`Default::default`] as the no-argument constructor.
    pub fn with_default(self) -> Self
    where
        T: Default,
    {
        self.constructor(T::default)
    }

    /// Set the no-argument constructor.
    pub fn constructor(mut self, constructor: fn() -> T) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Add an infallible mutator taking a `P`.
    pub fn mutator<P: Any>(self, property: &'static str, set: fn(&mut T, P)) -> Self {
        self.push(property, TypeDesc::of::<P>(), move |target, value| {
            set(target, value.unbox::<P>()?);
            Ok(())
        })
    }

    /// Add a mutator whose errors are passed through to `build()` unchanged.
    pub fn try_mutator<P: Any>(
        self,
        property: &'static str,
        set: fn(&mut T, P) -> Result<(), BuildError>,
    ) -> Self {
        self.push(property, TypeDesc::of::<P>(), move |target, value| {
            set(target, value.unbox::<P>()?)
        })
    }

    fn push(
        mut self,
        property: &'static str,
        param: TypeDesc,
        apply: impl Fn(&mut T, Value) -> Result<(), BuildError> + Send + Sync + 'static,
    ) -> Self {
        self.mutators.push(Mutator {
            property,
            param,
            apply: Box::new(apply),
        });
        self
    }
}

impl<T> TargetShape<T> {
    /// Type name used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether a no-argument constructor is available.
    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// All mutators, in declaration order.
    pub fn mutators(&self) -> &[Mutator<T>] {
        &self.mutators
    }

    /// Index of the mutator for `property` taking exactly `param`.
    pub fn find_mutator(&self, property: &str, param: &TypeDesc) -> Option<usize> {
        self.mutators
            .iter()
            .position(|m| m.property == property && m.param == *param)
    }

    pub(crate) fn construct(&self) -> Result<T, BuildError> {
        match self.constructor {
            Some(constructor) => Ok(constructor()),
            None => Err(BuildError::NoConstructor { target: self.name }),
        }
    }
}

impl<T> core::fmt::Debug for TargetShape<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TargetShape")
            .field("name", &self.name)
            .field("constructor", &self.constructor.is_some())
            .field("mutators", &self.mutators)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};

    #[derive(Default, Debug, PartialEq)]
    struct Point {
        x: i32,
        label: String,
    }

    fn shape() -> TargetShape<Point> {
        TargetShape::new("Point")
            .with_default()
            .mutator("x", |p: &mut Point, x: i32| p.x = x)
            .try_mutator("label", |p: &mut Point, label: String| {
                if label.is_empty() {
                    return Err(BuildError::custom("empty label"));
                }
                p.label = label;
                Ok(())
            })
    }

    #[test]
    fn finds_mutators_by_name_and_type() {
        let shape = shape();
        assert_eq!(shape.find_mutator("x", &TypeDesc::of::<i32>()), Some(0));
        assert_eq!(shape.find_mutator("x", &TypeDesc::of::<i64>()), None);
        assert_eq!(shape.find_mutator("label", &TypeDesc::of::<String>()), Some(1));
        assert_eq!(shape.find_mutator("y", &TypeDesc::of::<i32>()), None);
    }

    #[test]
    fn applies_unboxed_values() {
        let shape = shape();
        let mut point = shape.construct().unwrap();
        shape.mutators()[0].apply(&mut point, Value::new(-3i32)).unwrap();
        shape.mutators()[1]
            .apply(&mut point, Value::new("origin".to_string()))
            .unwrap();
        assert_eq!(
            point,
            Point {
                x: -3,
                label: "origin".into()
            }
        );
    }

    #[test]
    fn mutator_errors_pass_through() {
        let shape = shape();
        let mut point = shape.construct().unwrap();
        let err = shape.mutators()[1]
            .apply(&mut point, Value::new(String::new()))
            .unwrap_err();
        assert_eq!(err.to_string(), "empty label");

        let err = shape.mutators()[0]
            .apply(&mut point, Value::new(1i64))
            .unwrap_err();
        assert!(matches!(err, BuildError::Cast { .. }));
    }

    #[test]
    fn missing_constructor() {
        let shape = TargetShape::<Point>::new("Point");
        let err = shape.construct().unwrap_err();
        insta::assert_snapshot!(err, @"Point has no no-argument constructor and no generator was supplied");
    }
}
