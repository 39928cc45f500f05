//! Value conversions and release helpers of the compiler.

use crate::frontend::ast::Positioned;
use crate::shared::types::{Primitive, Type};
use crate::backend::{Backend, Cast, Predicate};
use crate::compiler::{Compiler, Typed, ValueType, error::{CompileError, CompileErrorKind, CompileResult}};

impl<'b, B> Compiler<'b, B> where B: Backend {

    /// Loads the pointee if the value is a pointer.
    pub(super) fn deref(self: &mut Self, typed: Typed<B::Value>) -> Typed<B::Value> {
        match typed.ty {
            ValueType::Pointer(primitive) => Typed {
                value: self.backend.build_load(primitive, typed.value),
                ty: primitive.into(),
            },
            _ => typed,
        }
    }

    /// Dereferences pointers and widens booleans, returning a plain int or double value.
    pub(super) fn to_primitive(self: &mut Self, typed: Typed<B::Value>) -> (B::Value, Primitive) {
        let typed = self.deref(typed);
        match typed.ty {
            ValueType::Bool => (self.backend.build_cast(Cast::BoolToInt, typed.value), Primitive::Int),
            ValueType::Int => (typed.value, Primitive::Int),
            ValueType::Double => (typed.value, Primitive::Double),
            ValueType::Pointer(primitive) => (typed.value, primitive), // unreachable after deref
        }
    }

    /// Converts a value to the given primitive. Converting to the type the value already has emits nothing.
    pub(super) fn coerce(self: &mut Self, typed: Typed<B::Value>, target: Primitive) -> B::Value {
        let (value, primitive) = self.to_primitive(typed);
        match (primitive, target) {
            (Primitive::Int, Primitive::Double) => self.backend.build_cast(Cast::IntToDouble, value),
            (Primitive::Double, Primitive::Int) => self.backend.build_cast(Cast::DoubleToInt, value),
            _ => value,
        }
    }

    /// Converts a value for use where the given type is declared. Pointers pass through only to pointers of the same pointee.
    pub(super) fn coerce_to_type(self: &mut Self, item: &dyn Positioned, typed: Typed<B::Value>, target: Type) -> CompileResult<B::Value> {
        if target.is_pointer() {
            match typed.ty {
                ValueType::Pointer(primitive) if primitive == target.primitive() => Ok(typed.value),
                from => Err(CompileError::new(item, CompileErrorKind::IncompatiblePointer { from, to: target })),
            }
        } else {
            Ok(self.coerce(typed, target.primitive()))
        }
    }

    /// Converts a value into a branch condition: non-zero is true.
    pub(super) fn condition(self: &mut Self, typed: Typed<B::Value>) -> B::Value {
        let typed = self.deref(typed);
        match typed.ty {
            ValueType::Bool => typed.value,
            _ => {
                let (value, primitive) = self.to_primitive(typed);
                let zero = self.zero(primitive);
                self.backend.build_compare(Predicate::Ne, primitive, value, zero)
            }
        }
    }

    /// The zero value of the given primitive.
    pub(super) fn zero(self: &mut Self, primitive: Primitive) -> B::Value {
        match primitive {
            Primitive::Int => self.backend.const_int(0),
            Primitive::Double => self.backend.const_double(0.0),
        }
    }

    /// Copies the value behind a pointer into a fresh heap cell.
    pub(super) fn copy_to_heap(self: &mut Self, primitive: Primitive, ptr: B::Value) -> B::Value {
        let cell = self.backend.build_heap_alloc(primitive, "result");
        let value = self.backend.build_load(primitive, ptr);
        self.backend.build_store(value, cell);
        cell
    }

    /// Releases the heap cells returned by calls of the current statement, last first.
    pub(super) fn release_temporaries(self: &mut Self) {
        let temporaries: Vec<_> = self.temporaries.drain(..).rev().collect();
        if !temporaries.is_empty() {
            comment!(self, "release {} returned heap cells", temporaries.len());
        }
        self.release(temporaries);
    }

    /// Releases the given heap handles.
    pub(super) fn release(self: &mut Self, handles: Vec<B::Value>) {
        for handle in handles {
            self.backend.build_heap_free(handle);
        }
    }
}
