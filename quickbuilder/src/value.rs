use alloc::boxed::Box;
use core::any::{Any, type_name};

use crate::{BuildError, Primitive};

/// A property value on its way from a child builder to a mutator or accessor.
///
/// Primitives are carried inline; everything else is boxed and downcast to
/// the requested type when it is consumed.
pub enum Value {
    /// `i32`
    Int(i32),
    /// `i64`
    Long(i64),
    /// `f32`
    Float(f32),
    /// `f64`
    Double(f64),
    /// `bool`
    Boolean(bool),
    /// `i8`
    Byte(i8),
    /// `i16`
    Short(i16),
    /// `char`
    Char(char),
    /// Any other type.
    Boxed {
        /// The value itself.
        value: Box<dyn Any + Send>,
        /// Name of the boxed type, for diagnostics.
        type_name: &'static str,
    },
}

impl Value {
    /// Wrap a value, keeping primitives unboxed.
    pub fn new<T: Any + Send>(value: T) -> Self {
        let any: &dyn Any = &value;
        let inline = match Primitive::of::<T>() {
            Primitive::None => None,
            Primitive::Int => any.downcast_ref().copied().map(Value::Int),
            Primitive::Long => any.downcast_ref().copied().map(Value::Long),
            Primitive::Float => any.downcast_ref().copied().map(Value::Float),
            Primitive::Double => any.downcast_ref().copied().map(Value::Double),
            Primitive::Boolean => any.downcast_ref().copied().map(Value::Boolean),
            Primitive::Byte => any.downcast_ref().copied().map(Value::Byte),
            Primitive::Short => any.downcast_ref().copied().map(Value::Short),
            Primitive::Char => any.downcast_ref().copied().map(Value::Char),
        };
        inline.unwrap_or_else(|| Value::Boxed {
            value: Box::new(value),
            type_name: type_name::<T>(),
        })
    }

    /// Primitive classification of the carried value.
    pub fn primitive(&self) -> Primitive {
        match self {
            Value::Int(_) => Primitive::Int,
            Value::Long(_) => Primitive::Long,
            Value::Float(_) => Primitive::Float,
            Value::Double(_) => Primitive::Double,
            Value::Boolean(_) => Primitive::Boolean,
            Value::Byte(_) => Primitive::Byte,
            Value::Short(_) => Primitive::Short,
            Value::Char(_) => Primitive::Char,
            Value::Boxed { .. } => Primitive::None,
        }
    }

    /// Name of the carried type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boxed { type_name, .. } => type_name,
            other => other.primitive().type_name(),
        }
    }

    /// Unbox into `T`, failing with [`BuildError::Cast`] on a type mismatch.
    pub fn unbox<T: Any>(self) -> Result<T, BuildError> {
        let found = self.type_name();
        let cast = match self {
            Value::Int(v) => reinterpret(v),
            Value::Long(v) => reinterpret(v),
            Value::Float(v) => reinterpret(v),
            Value::Double(v) => reinterpret(v),
            Value::Boolean(v) => reinterpret(v),
            Value::Byte(v) => reinterpret(v),
            Value::Short(v) => reinterpret(v),
            Value::Char(v) => reinterpret(v),
            Value::Boxed { value, .. } => value.downcast::<T>().ok().map(|boxed| *boxed),
        };
        cast.ok_or(BuildError::Cast {
            expected: type_name::<T>(),
            found,
        })
    }
}

/// Moves `value` out as `T` when both are the same type.
fn reinterpret<P: Any, T: Any>(value: P) -> Option<T> {
    let mut slot = Some(value);
    (&mut slot as &mut dyn Any)
        .downcast_mut::<Option<T>>()
        .and_then(Option::take)
}

impl core::fmt::Debug for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Value::Long(v) => f.debug_tuple("Long").field(v).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::Double(v) => f.debug_tuple("Double").field(v).finish(),
            Value::Boolean(v) => f.debug_tuple("Boolean").field(v).finish(),
            Value::Byte(v) => f.debug_tuple("Byte").field(v).finish(),
            Value::Short(v) => f.debug_tuple("Short").field(v).finish(),
            Value::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Value::Boxed { type_name, .. } => f.debug_tuple("Boxed").field(type_name).finish(),
        }
    }
}
