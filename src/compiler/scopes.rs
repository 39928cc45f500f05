use crate::prelude::*;
use crate::shared::types::Type;
use crate::compiler::error::CompileErrorKind;

/// Storage bound to a name.
#[derive(Copy, Clone, Debug)]
pub struct Local<V> {
    /// Storage handle. For pointer types this is the pointer itself.
    pub storage : V,
    /// Declared type.
    pub ty      : Type,
    /// Whether the frame owns the heap allocation behind the storage.
    pub heap    : bool,
}

/// Names declared within one lexical scope.
pub struct ScopeFrame<V> {
    /// Maps a name to its storage.
    locals  : UnorderedMap<String, Local<V>>,
    /// Heap-owned names in declaration order.
    heap    : Vec<String>,
}

impl<V: Copy> ScopeFrame<V> {
    pub fn new() -> Self {
        ScopeFrame {
            locals  : UnorderedMap::new(),
            heap    : Vec::new(),
        }
    }
    /// Heap handles owned by this frame, in release order (last declared first).
    pub fn heap_handles(self: &Self) -> Vec<V> {
        self.heap.iter().rev().filter_map(|name| self.locals.get(name)).map(|local| local.storage).collect()
    }
}

/// A stack of scope frames, innermost last.
pub struct ScopeFrames<V>(Vec<ScopeFrame<V>>);

impl<V: Copy> ScopeFrames<V> {
    const NO_FRAME: &'static str = "Attempted to access empty scope stack";
    /// Create new scope frame stack.
    pub fn new() -> Self {
        ScopeFrames(Vec::new())
    }
    /// Enters a new innermost scope.
    pub fn push(self: &mut Self) {
        self.0.push(ScopeFrame::new());
    }
    /// Leaves the innermost scope and returns it.
    pub fn pop(self: &mut Self) -> Option<ScopeFrame<V>> {
        self.0.pop()
    }
    /// Drops all frames.
    pub fn clear(self: &mut Self) {
        self.0.clear();
    }
    /// Whether the name is declared in the innermost frame.
    pub fn is_declared(self: &Self, name: &str) -> bool {
        self.0.last().map_or(false, |frame| frame.locals.contains_key(name))
    }
    /// Declares a name in the innermost frame. Shadowing names of outer frames is permitted.
    pub fn declare(self: &mut Self, name: &str, local: Local<V>) -> Result<(), CompileErrorKind> {
        let frame = self.0.last_mut().ok_or_else(|| CompileErrorKind::Internal(Self::NO_FRAME.to_string()))?;
        if frame.locals.contains_key(name) {
            return Err(CompileErrorKind::Redeclared(name.to_string()));
        }
        if local.heap {
            frame.heap.push(name.to_string());
        }
        frame.locals.insert(name.to_string(), local);
        Ok(())
    }
    /// Finds the innermost declaration of a name and returns it along with the index of its frame.
    pub fn lookup(self: &Self, name: &str) -> Option<(usize, Local<V>)> {
        self.0.iter().enumerate().rev().find_map(|(index, frame)| frame.locals.get(name).map(|local| (index, *local)))
    }
    /// Resolves a name to its innermost declaration.
    pub fn resolve(self: &Self, name: &str) -> Result<Local<V>, CompileErrorKind> {
        self.lookup(name).map(|(_, local)| local).ok_or_else(|| CompileErrorKind::UnknownVariable(name.to_string()))
    }
    /// Heap handles of all frames from the innermost outward, skipping the given declaration (frame index and name).
    pub fn releases(self: &Self, except: Option<(usize, &str)>) -> Vec<V> {
        let mut handles = Vec::new();
        for (index, frame) in self.0.iter().enumerate().rev() {
            for name in frame.heap.iter().rev() {
                if except == Some((index, name.as_str())) {
                    continue;
                }
                if let Some(local) = frame.locals.get(name) {
                    handles.push(local.storage);
                }
            }
        }
        handles
    }
}
