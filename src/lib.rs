//! minic, the front-end of a small statically typed imperative language.
//!
//! Source text is lexed and parsed into a typed AST which is then lowered into block structured,
//! typed instructions against the [Backend](backend::Backend) instruction-construction interface.
//! The [Writer](backend::Writer) backend records those instructions into an inspectable
//! [Module](backend::ir::Module).
//!
//! ```
//! use minic::{compile, backend::Writer};
//!
//! let mut writer = Writer::new();
//! let errors = compile("
//!     extern double sqrt(double x);
//!     double hypot(double a, double b) {
//!         return sqrt(a * a + b * b);
//!     }
//! ", &mut writer);
//! assert!(errors.is_empty());
//! let module = writer.into_module();
//! assert!(module.function("hypot").is_some());
//! ```

pub(crate) mod prelude {
    pub use std::fmt::{self, Debug, Display};
    pub use std::collections::{HashMap as UnorderedMap, HashSet as UnorderedSet};
}

pub mod config;
mod shared;
mod frontend;
pub mod backend;
pub mod compiler;
mod interface;
mod run;

pub use interface::*;
pub use run::{compile, compile_with, compile_program};
