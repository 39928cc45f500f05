use crate::prelude::*;
use crate::frontend::ast::Prototype;
use crate::compiler::error::CompileErrorKind;

/// Prototypes seen so far, by function name. Entries are only added or refreshed, never removed.
pub struct Registry {
    prototypes  : UnorderedMap<String, Prototype>,
    defined     : UnorderedSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            prototypes  : UnorderedMap::new(),
            defined     : UnorderedSet::new(),
        }
    }
    /// Returns the prototype for the given name.
    pub fn get(self: &Self, name: &str) -> Option<&Prototype> {
        self.prototypes.get(name)
    }
    /// Records a prototype. A prototype may be repeated as long as its signature does not change.
    pub fn register(self: &mut Self, prototype: &Prototype) -> Result<(), CompileErrorKind> {
        if let Some(previous) = self.prototypes.get(&prototype.name) {
            if !previous.same_signature(prototype) {
                return Err(CompileErrorKind::ConflictingPrototype(prototype.name.clone()));
            }
        }
        self.prototypes.insert(prototype.name.clone(), prototype.clone());
        Ok(())
    }
    /// Whether a body was already lowered for the given name.
    pub fn is_defined(self: &Self, name: &str) -> bool {
        self.defined.contains(name)
    }
    /// Marks the given function as defined.
    pub fn set_defined(self: &mut Self, name: &str) {
        self.defined.insert(name.to_string());
    }
}
