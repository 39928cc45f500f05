use crate::frontend::ast::{Item, Function, Prototype};

/// Parsed source-file AST.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedProgram(pub(crate) Vec<Item>);

impl ParsedProgram {
    /// Returns an iterator over all items in source order.
    pub fn iter(self: &Self) -> std::slice::Iter<'_, Item> {
        self.0.iter()
    }
    /// Returns an iterator over the function definitions of the program.
    pub fn functions(self: &Self) -> impl Iterator<Item = &Function> {
        self.0.iter().filter_map(|item| match item {
            Item::Function(function) => Some(function),
            _ => None,
        })
    }
    /// Returns an iterator over the extern declarations of the program.
    pub fn externs(self: &Self) -> impl Iterator<Item = &Prototype> {
        self.0.iter().filter_map(|item| match item {
            Item::Extern(prototype) => Some(prototype),
            _ => None,
        })
    }
    /// Returns the number of items.
    pub fn len(self: &Self) -> usize {
        self.0.len()
    }
    pub fn is_empty(self: &Self) -> bool {
        self.0.is_empty()
    }
    /// Consumes the program and returns its items.
    pub fn into_items(self: Self) -> Vec<Item> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ParsedProgram {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;
    fn into_iter(self: Self) -> Self::IntoIter {
        self.0.iter()
    }
}
