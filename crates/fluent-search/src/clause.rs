//! Field clauses: the declarative leaves of a predicate tree.
//!
//! A [`Clause`] names an index field key, an [`Op`] and an owned
//! [`ClauseValue`]. Unlike closures, clauses can be inspected and translated by
//! a host index, which is why the builders favour them.

use std::cmp::Ordering;

use regex::Regex;

use crate::op::Op;
use crate::traits::Searchable;
use crate::value::{Number, Timestamp, Value};

/// A single `field op value` comparison.
///
/// # Example
///
/// ```
/// use fluent_search::{Clause, Op, Value};
///
/// let clause = Clause::new("_name", Op::Contains, "Test");
/// assert!(clause.matches(&Value::String("Test Article 1")));
/// ```
#[derive(Debug, Clone)]
pub struct Clause {
    pub field: String,
    pub op: Op,
    pub value: ClauseValue,
}

impl Clause {
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluates the clause against the record's value for [`Clause::field`].
    pub fn matches_item<T: Searchable + ?Sized>(&self, item: &T) -> bool {
        self.matches(&item.field_value(&self.field))
    }

    /// Evaluates the clause against a field value.
    ///
    /// Missing values and type mismatches never match, for `Ne` as well.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        match (&self.value, field_value) {
            (_, Value::None) => false,
            (ClauseValue::String(pattern), Value::String(s)) => self.match_str(s, pattern),
            (ClauseValue::Regex(regex), Value::String(s)) => {
                self.op == Op::Regex && regex.is_match(s)
            }
            (ClauseValue::StringSet(set), Value::String(s)) => {
                self.op == Op::In && set.iter().any(|candidate| candidate == s)
            }
            (ClauseValue::Number(wanted), Value::Number(actual)) => actual
                .compare(*wanted)
                .is_some_and(|ordering| self.op.eval_ordering(ordering)),
            (ClauseValue::Timestamp(wanted), Value::Timestamp(actual)) => {
                self.op.eval_ordering(actual.cmp(wanted))
            }
            (ClauseValue::Enum(wanted), Value::Enum(actual)) => self.match_eq(actual.cmp(wanted)),
            (ClauseValue::EnumSet(set), Value::Enum(actual)) => {
                self.op == Op::In && set.contains(actual)
            }
            (ClauseValue::Bool(wanted), Value::Bool(actual)) => self.match_eq(actual.cmp(wanted)),
            _ => false,
        }
    }

    fn match_str(&self, field: &str, pattern: &str) -> bool {
        match self.op {
            Op::StartsWith => field.starts_with(pattern),
            Op::EndsWith => field.ends_with(pattern),
            Op::Contains => field.contains(pattern),
            op => op.eval_ordering(field.cmp(pattern)),
        }
    }

    fn match_eq(&self, ordering: Ordering) -> bool {
        matches!(self.op, Op::Eq | Op::Ne) && self.op.eval_ordering(ordering)
    }
}

/// Owned comparison value stored in a [`Clause`].
#[derive(Debug, Clone)]
pub enum ClauseValue {
    String(String),
    Number(Number),
    Timestamp(Timestamp),
    Enum(u32),
    /// Discriminants for `In`.
    EnumSet(Vec<u32>),
    /// Strings for `In`.
    StringSet(Vec<String>),
    Bool(bool),
    Regex(Regex),
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<&String> for ClauseValue {
    fn from(s: &String) -> Self {
        ClauseValue::String(s.clone())
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<Timestamp> for ClauseValue {
    fn from(t: Timestamp) -> Self {
        ClauseValue::Timestamp(t)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

impl From<Regex> for ClauseValue {
    fn from(r: Regex) -> Self {
        ClauseValue::Regex(r)
    }
}

impl From<Vec<u32>> for ClauseValue {
    fn from(v: Vec<u32>) -> Self {
        ClauseValue::EnumSet(v)
    }
}

impl From<Vec<String>> for ClauseValue {
    fn from(v: Vec<String>) -> Self {
        ClauseValue::StringSet(v)
    }
}

macro_rules! clause_number_from {
    ($($source:ty),*) => {
        $(
            impl From<$source> for ClauseValue {
                fn from(n: $source) -> Self {
                    ClauseValue::Number(Number::from(n))
                }
            }
        )*
    };
}

clause_number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
