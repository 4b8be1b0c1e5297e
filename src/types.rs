use std::fmt;

use crate::{ast::BinaryOperator, builtins::Builtins};

/// The closed set of compiler-level value types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Void,
    Int,
    Float,
    String,
    /// A single beamline component.
    Element,
    /// An ordered sequence of elements.
    Line,
}

impl ValueType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueType::Int | ValueType::Float)
    }

    /// Elements and lines, the values the line algebra operates on.
    pub fn is_beamline(self) -> bool {
        matches!(self, ValueType::Element | ValueType::Line)
    }

    /// The C type used to declare a variable of this type.
    pub fn c_name(self) -> &'static str {
        match self {
            ValueType::Void => "void",
            ValueType::Int => "int",
            ValueType::Float => "double",
            ValueType::String => "const char *",
            ValueType::Element => "Element",
            ValueType::Line => "Line",
        }
    }

    /// Whether a value of type `src` may initialize a binding declared with
    /// type `self`. The declared type always wins, so numbers convert freely.
    pub fn accepts(self, src: ValueType) -> bool {
        if self.is_numeric() {
            src.is_numeric()
        } else {
            self == src
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Void => "Void",
            ValueType::Int => "Int",
            ValueType::Float => "Float",
            ValueType::String => "String",
            ValueType::Element => "Element",
            ValueType::Line => "Line",
        };
        f.write_str(name)
    }
}

/// Type names that don't come from the builtin registry.
static PRIMITIVE_TYPE_NAMES: phf::Map<&'static str, ValueType> = phf::phf_map! {
    "int" => ValueType::Int,
    "float" => ValueType::Float,
    "Line" => ValueType::Line,
};

/// Resolves a type name written in a `let` declaration.
///
/// Besides the primitive names, every element constructor in the registry
/// (e.g. `Quad`) is also the name of a type, which resolves to `Element`.
pub fn resolve_type_name(name: &str, builtins: &Builtins) -> Option<ValueType> {
    if let Some(ty) = PRIMITIVE_TYPE_NAMES.get(name) {
        return Some(*ty);
    }
    builtins
        .get(name)
        .filter(|builtin| builtin.is_constructor())
        .map(|_| ValueType::Element)
}

/// Computes the result type of a binary operation, or `None` if the operand
/// types can't be combined with the operator.
pub fn binary_result(op: BinaryOperator, lhs: ValueType, rhs: ValueType) -> Option<ValueType> {
    use BinaryOperator::*;
    use ValueType::*;

    if lhs.is_numeric() && rhs.is_numeric() {
        return Some(if lhs == Float || rhs == Float {
            Float
        } else {
            Int
        });
    }
    let ty = match (op, lhs, rhs) {
        // Repetition. An element repeated `n` times is a line of `n` copies,
        // whichever side the count is on.
        (Mul, Int, Line | Element) | (Mul, Line | Element, Int) => Line,
        // Concatenation. `-` reverses its right operand first.
        (Add | Sub, Element | Line, Element | Line) => Line,
        _ => return None,
    };
    Some(ty)
}
