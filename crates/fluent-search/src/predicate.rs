//! Composable predicate trees.
//!
//! A [`Predicate`] is a boolean expression over one record type. Leaves are
//! either declarative [`Clause`]s or closures; inner nodes combine them with
//! AND, OR and NOT. Trees are immutable: every combinator returns a new tree.
//!
//! The identities [`Predicate::True`] and [`Predicate::False`] exist so that
//! empty aggregates have a meaning, but combinators never leave them inside a
//! larger tree:
//!
//! ```
//! use fluent_search::{Clause, Op, Predicate};
//!
//! # struct Item;
//! let name = Predicate::<Item>::from(Clause::new("_name", Op::Contains, "Test"));
//!
//! assert!(Predicate::identity_true().and(name.clone()).is_clause());
//! assert!(Predicate::identity_false().or(name).is_clause());
//! ```

use std::fmt;
use std::rc::Rc;

use crate::clause::Clause;
use crate::traits::Searchable;

/// Boolean expression over records of type `T`.
pub enum Predicate<T> {
    /// Matches everything.
    True,
    /// Matches nothing.
    False,
    Clause(Clause),
    Fn(Rc<dyn Fn(&T) -> bool>),
    And(Box<Predicate<T>>, Box<Predicate<T>>),
    Or(Box<Predicate<T>>, Box<Predicate<T>>),
    Not(Box<Predicate<T>>),
}

impl<T> Predicate<T> {
    pub fn identity_true() -> Self {
        Predicate::True
    }

    pub fn identity_false() -> Self {
        Predicate::False
    }

    /// Wraps a closure as a leaf.
    pub fn from_fn(f: impl Fn(&T) -> bool + 'static) -> Self {
        Predicate::Fn(Rc::new(f))
    }

    /// Conjunction. `True` operands are dropped.
    pub fn and(self, other: Predicate<T>) -> Self {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (a, b) => Predicate::And(Box::new(a), Box::new(b)),
        }
    }

    /// Disjunction. `False` operands are dropped.
    pub fn or(self, other: Predicate<T>) -> Self {
        match (self, other) {
            (Predicate::False, p) | (p, Predicate::False) => p,
            (a, b) => Predicate::Or(Box::new(a), Box::new(b)),
        }
    }

    /// Negation. Double negation and negated identities are folded.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        match self {
            Predicate::True => Predicate::False,
            Predicate::False => Predicate::True,
            Predicate::Not(inner) => *inner,
            p => Predicate::Not(Box::new(p)),
        }
    }

    /// Folds with AND, starting from `True`. An empty input yields `True`.
    pub fn all_of(predicates: impl IntoIterator<Item = Predicate<T>>) -> Self {
        predicates
            .into_iter()
            .fold(Predicate::True, |acc, p| acc.and(p))
    }

    /// Folds with OR, starting from `False`. An empty input yields `False`.
    pub fn any_of(predicates: impl IntoIterator<Item = Predicate<T>>) -> Self {
        predicates
            .into_iter()
            .fold(Predicate::False, |acc, p| acc.or(p))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Predicate::True)
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Predicate::False)
    }

    pub fn is_clause(&self) -> bool {
        matches!(self, Predicate::Clause(_))
    }

    /// Number of leaves, identities included.
    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::And(a, b) | Predicate::Or(a, b) => a.leaf_count() + b.leaf_count(),
            Predicate::Not(inner) => inner.leaf_count(),
            _ => 1,
        }
    }

    /// Returns `true` if no leaf is a closure, i.e. a host index could
    /// translate the whole tree.
    pub fn is_declarative(&self) -> bool {
        match self {
            Predicate::Fn(_) => false,
            Predicate::And(a, b) | Predicate::Or(a, b) => a.is_declarative() && b.is_declarative(),
            Predicate::Not(inner) => inner.is_declarative(),
            _ => true,
        }
    }
}

impl<T: Searchable> Predicate<T> {
    /// Evaluates the tree against one record, short-circuiting AND and OR.
    pub fn matches(&self, item: &T) -> bool {
        match self {
            Predicate::True => true,
            Predicate::False => false,
            Predicate::Clause(clause) => clause.matches_item(item),
            Predicate::Fn(f) => f(item),
            Predicate::And(a, b) => a.matches(item) && b.matches(item),
            Predicate::Or(a, b) => a.matches(item) || b.matches(item),
            Predicate::Not(inner) => !inner.matches(item),
        }
    }

    /// Returns references to the matching items, preserving order.
    pub fn filter<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    pub fn count(&self, items: &[T]) -> usize {
        items.iter().filter(|item| self.matches(item)).count()
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Predicate::True => Predicate::True,
            Predicate::False => Predicate::False,
            Predicate::Clause(clause) => Predicate::Clause(clause.clone()),
            Predicate::Fn(f) => Predicate::Fn(Rc::clone(f)),
            Predicate::And(a, b) => Predicate::And(a.clone(), b.clone()),
            Predicate::Or(a, b) => Predicate::Or(a.clone(), b.clone()),
            Predicate::Not(inner) => Predicate::Not(inner.clone()),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::True => f.write_str("True"),
            Predicate::False => f.write_str("False"),
            Predicate::Clause(clause) => {
                write!(f, "{} {} {:?}", clause.field, clause.op, clause.value)
            }
            Predicate::Fn(_) => f.write_str("Fn(..)"),
            Predicate::And(a, b) => write!(f, "({:?} AND {:?})", a, b),
            Predicate::Or(a, b) => write!(f, "({:?} OR {:?})", a, b),
            Predicate::Not(inner) => write!(f, "NOT {:?}", inner),
        }
    }
}

impl<T> From<Clause> for Predicate<T> {
    fn from(clause: Clause) -> Self {
        Predicate::Clause(clause)
    }
}

impl<T> std::ops::BitAnd for Predicate<T> {
    type Output = Predicate<T>;

    fn bitand(self, rhs: Predicate<T>) -> Predicate<T> {
        self.and(rhs)
    }
}

impl<T> std::ops::BitOr for Predicate<T> {
    type Output = Predicate<T>;

    fn bitor(self, rhs: Predicate<T>) -> Predicate<T> {
        self.or(rhs)
    }
}

impl<T> std::ops::Not for Predicate<T> {
    type Output = Predicate<T>;

    fn not(self) -> Predicate<T> {
        Predicate::not(self)
    }
}
