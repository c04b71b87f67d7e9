//! Comparison operators for field clauses.

use std::cmp::Ordering;
use std::fmt;

/// Comparison operator of a [`Clause`](crate::Clause).
///
/// - **Any value**: `Eq`, `Ne`
/// - **Strings**: `StartsWith`, `EndsWith`, `Contains`, `Regex`
/// - **Numbers and timestamps**: `Gt`, `Gte`, `Lt`, `Lte`
/// - **Enums**: `In`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    StartsWith,
    EndsWith,
    Contains,
    Regex,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl Op {
    /// Returns `true` for operators that compare by ordering.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Op::Eq | Op::Ne | Op::Gt | Op::Gte | Op::Lt | Op::Lte
        )
    }

    /// Returns `true` for operators that only make sense on strings.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Op::StartsWith | Op::EndsWith | Op::Contains | Op::Regex
        )
    }

    /// Applies the operator to the result of `field.cmp(value)`.
    ///
    /// Non-ordering operators never match.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::StartsWith => "startswith",
            Op::EndsWith => "endswith",
            Op::Contains => "contains",
            Op::Regex => "regex",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::In => "in",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
