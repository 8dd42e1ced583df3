//! Type system for the Write language.
//!
//! Write has a small fixed set of types. `Unknown` stands for a value
//! whose type could not be determined yet (an undeclared variable seen
//! after an earlier error, or a call to a function with no declared
//! result); it is deliberately permissive so one type error does not
//! cascade into dozens of follow-up diagnostics.

use std::fmt;

use crate::lexer::TokenKind;

/// The type of a Write value or expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    Int,
    Float,
    Str,
    Bool,
    List,
    Array,
    Unknown,
}

impl Ty {
    /// Numeric types may appear in arithmetic, comparisons, and loop
    /// bounds. `Unknown` passes so earlier errors do not cascade.
    pub fn is_numeric(self) -> bool {
        matches!(self, Ty::Int | Ty::Float | Ty::Unknown)
    }

    /// Types usable as logical operands (`and`, `or`, `not`).
    pub fn is_logic(self) -> bool {
        matches!(self, Ty::Int | Ty::Float | Ty::Bool | Ty::Unknown)
    }

    pub fn is_container(self) -> bool {
        matches!(self, Ty::List | Ty::Array)
    }

    /// Map a type keyword token to its type, if the token is one.
    pub fn from_keyword(kind: TokenKind) -> Option<Ty> {
        let ty = match kind {
            TokenKind::Int => Ty::Int,
            TokenKind::Float => Ty::Float,
            TokenKind::StringTy => Ty::Str,
            TokenKind::Bool => Ty::Bool,
            TokenKind::List => Ty::List,
            TokenKind::Array => Ty::Array,
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ty::Int => "int",
            Ty::Float => "float",
            Ty::Str => "string",
            Ty::Bool => "bool",
            Ty::List => "list",
            Ty::Array => "array",
            Ty::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// Numeric promotion for arithmetic: `float` wins over `int`.
pub fn promote(left: Ty, right: Ty) -> Ty {
    if left == Ty::Float || right == Ty::Float {
        Ty::Float
    } else if left == Ty::Unknown || right == Ty::Unknown {
        Ty::Unknown
    } else {
        Ty::Int
    }
}

/// Whether a value of type `value` may be stored in a slot of type
/// `target`. Int widens to float; strings and bools only accept their
/// own kind.
pub fn assignable(target: Ty, value: Ty) -> bool {
    if target == Ty::Unknown || value == Ty::Unknown {
        return true;
    }
    if target == value {
        return true;
    }
    matches!(target, Ty::Int | Ty::Float) && matches!(value, Ty::Int | Ty::Float)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_wins_promotion() {
        assert_eq!(promote(Ty::Int, Ty::Float), Ty::Float);
        assert_eq!(promote(Ty::Float, Ty::Int), Ty::Float);
        assert_eq!(promote(Ty::Int, Ty::Int), Ty::Int);
    }

    #[test]
    fn strings_never_mix_with_numbers() {
        assert!(!assignable(Ty::Int, Ty::Str));
        assert!(!assignable(Ty::Str, Ty::Float));
        assert!(assignable(Ty::Str, Ty::Str));
    }

    #[test]
    fn int_widens_to_float() {
        assert!(assignable(Ty::Float, Ty::Int));
        assert!(assignable(Ty::Int, Ty::Float));
    }

    #[test]
    fn unknown_is_permissive() {
        assert!(assignable(Ty::Unknown, Ty::Str));
        assert!(assignable(Ty::Bool, Ty::Unknown));
        assert!(Ty::Unknown.is_numeric());
    }

    #[test]
    fn maps_type_keywords() {
        assert_eq!(Ty::from_keyword(TokenKind::List), Some(Ty::List));
        assert_eq!(Ty::from_keyword(TokenKind::Set), None);
    }
}
