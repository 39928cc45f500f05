//! Compile-time configuration.

/// Type used to represent `int` values.
pub type IntValue = i32;

/// Type used to represent `double` values.
pub type DoubleValue = f64;

/// Bit width of the `int` primitive.
pub const INT_BITS: u32 = IntValue::BITS;

/// Bit width of the `double` primitive.
pub const DOUBLE_BITS: u32 = 64;

/// Label of the first block of every function.
pub const ENTRY_LABEL: &str = "entry";

/// Labels of the blocks generated for an if/else statement.
pub const THEN_LABEL: &str = "then";
pub const ELSE_LABEL: &str = "else";
pub const MERGE_LABEL: &str = "ifcont";

/// Labels of the blocks generated for a while loop.
pub const WHILE_LABEL: &str = "while";
pub const LOOP_LABEL: &str = "loop";
pub const CONT_LABEL: &str = "cont";
