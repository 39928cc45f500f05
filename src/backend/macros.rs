/// Generates the instruction enum along with its predicates and textual representation.
///
/// Each instruction lists its fields and a format string that must name every field.
/// Instructions flagged `[terminator]` end a block.
macro_rules! impl_instructions {
    (@terminator terminator) => { true };
    (@terminator) => { false };
    (
        $(
            $( #[ $attr:meta ] )*
            $( [ $flag:ident ] )?
            $name:ident { $( $field:ident : $ty:ty ),* } => $format:literal
        ),+ $(,)?
    ) => {
        /// A single recorded instruction.
        #[derive(Clone, Debug, PartialEq)]
        pub enum Instruction {
            $(
                $( #[ $attr ] )*
                $name { $( $field : $ty ),* },
            )+
        }

        impl Instruction {
            /// Whether the instruction ends its block.
            pub fn is_terminator(self: &Self) -> bool {
                match self {
                    $( Instruction::$name { .. } => impl_instructions!(@terminator $( $flag )?), )+
                }
            }
            paste::paste! {
                $(
                    pub fn [<is_ $name:snake>](self: &Self) -> bool {
                        matches!(self, Instruction::$name { .. })
                    }
                )+
            }
        }

        impl Display for Instruction {
            #[allow(unused_variables)]
            fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( Instruction::$name { $( $field ),* } => write!(f, $format $(, $field = $field )* ), )+
                }
            }
        }
    };
}
