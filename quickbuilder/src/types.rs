use core::any::TypeId;

/// Primitive classification of a property type.
///
/// Only eight fixed-size scalar types are recognised; values of these types
/// travel unboxed through [`Value`](crate::Value).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Not a primitive: boxed and downcast on use
    None,
    /// `i32`
    Int,
    /// `i64`
    Long,
    /// `f32`
    Float,
    /// `f64`
    Double,
    /// `bool`
    Boolean,
    /// `i8`
    Byte,
    /// `i16`
    Short,
    /// `char`
    Char,
}

impl Primitive {
    /// Classify `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let id = TypeId::of::<T>();
        if id == TypeId::of::<i32>() {
            Primitive::Int
        } else if id == TypeId::of::<i64>() {
            Primitive::Long
        } else if id == TypeId::of::<f32>() {
            Primitive::Float
        } else if id == TypeId::of::<f64>() {
            Primitive::Double
        } else if id == TypeId::of::<bool>() {
            Primitive::Boolean
        } else if id == TypeId::of::<i8>() {
            Primitive::Byte
        } else if id == TypeId::of::<i16>() {
            Primitive::Short
        } else if id == TypeId::of::<char>() {
            Primitive::Char
        } else {
            Primitive::None
        }
    }

    /// True for everything except [`Primitive::None`].
    pub fn is_primitive(self) -> bool {
        self != Primitive::None
    }

    /// Rust name of the primitive type.
    pub fn type_name(self) -> &'static str {
        match self {
            Primitive::None => "boxed value",
            Primitive::Int => "i32",
            Primitive::Long => "i64",
            Primitive::Float => "f32",
            Primitive::Double => "f64",
            Primitive::Boolean => "bool",
            Primitive::Byte => "i8",
            Primitive::Short => "i16",
            Primitive::Char => "char",
        }
    }
}

/// Marker standing in for a wildcard-bounded generic in [`TypeDesc::wildcard`].
struct Wildcard;

/// Describes the declared type of a parameter, accessor or mutator.
///
/// Two descriptors are equal when they describe the same Rust type.
#[derive(Clone, Copy, Debug)]
pub struct TypeDesc {
    /// Identity of the described type.
    pub id: TypeId,
    /// Fully qualified name, as reported by [`core::any::type_name`].
    pub name: &'static str,
    /// Primitive classification.
    pub primitive: Primitive,
    /// Arrays, slices, boxed slices and vectors.
    pub array: bool,
    /// A generic bound rather than a concrete type.
    pub wildcard: bool,
}

impl TypeDesc {
    /// Describe `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let name = core::any::type_name::<T>();
        Self {
            id: TypeId::of::<T>(),
            name,
            primitive: Primitive::of::<T>(),
            array: is_array_name(name),
            wildcard: false,
        }
    }

    /// Describe a wildcard-bounded generic such as `impl Into<Number>`.
    ///
    /// Contracts may declare these, but extraction rejects them.
    pub fn wildcard(bound: &'static str) -> Self {
        Self {
            id: TypeId::of::<Wildcard>(),
            name: bound,
            primitive: Primitive::None,
            array: false,
            wildcard: true,
        }
    }

    /// Whether this descriptor describes `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        !self.wildcard && self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        // every wildcard shares one id, so tell them apart by bound
        self.id == other.id
            && self.wildcard == other.wildcard
            && (!self.wildcard || self.name == other.name)
    }
}

impl Eq for TypeDesc {}

fn is_array_name(name: &str) -> bool {
    name.starts_with('[')
        || name.starts_with("&[")
        || name.starts_with("alloc::vec::Vec<")
        || name.starts_with("alloc::boxed::Box<[")
}
