//! Type tags.

use crate::prelude::*;

/// Primitive value types. Pointer types point to a heap cell of one of these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Double,
}

impl Display for Primitive {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Int => write!(f, "i{}", crate::config::INT_BITS),
            Primitive::Double => write!(f, "f{}", crate::config::DOUBLE_BITS),
        }
    }
}

/// Type tag of a declaration, parameter or function return value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Double,
    /// Pointer to a heap allocated int, spelled `Int`.
    IntPtr,
    /// Pointer to a heap allocated double, spelled `Double`.
    DoublePtr,
}

impl Type {
    /// Returns the type denoted by the given keyword, if any.
    pub fn from_keyword(keyword: &str) -> Option<Type> {
        match keyword {
            "int"       => Some(Type::Int),
            "double"    => Some(Type::Double),
            "Int"       => Some(Type::IntPtr),
            "Double"    => Some(Type::DoublePtr),
            _           => None,
        }
    }
    /// Returns the keyword used to spell this type in source.
    pub fn keyword(self: Self) -> &'static str {
        match self {
            Type::Int       => "int",
            Type::Double    => "double",
            Type::IntPtr    => "Int",
            Type::DoublePtr => "Double",
        }
    }
    /// Returns the pointer type for the given primitive.
    pub fn pointer_to(primitive: Primitive) -> Type {
        match primitive {
            Primitive::Int => Type::IntPtr,
            Primitive::Double => Type::DoublePtr,
        }
    }
    /// Returns whether this is one of the pointer types.
    pub fn is_pointer(self: Self) -> bool {
        match self {
            Type::IntPtr | Type::DoublePtr => true,
            Type::Int | Type::Double => false,
        }
    }
    /// Returns the underlying primitive: the type itself or the pointee of a pointer.
    pub fn primitive(self: Self) -> Primitive {
        match self {
            Type::Int | Type::IntPtr => Primitive::Int,
            Type::Double | Type::DoublePtr => Primitive::Double,
        }
    }
}

impl From<Primitive> for Type {
    fn from(primitive: Primitive) -> Type {
        match primitive {
            Primitive::Int => Type::Int,
            Primitive::Double => Type::Double,
        }
    }
}

impl Display for Type {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}
