//! Two-argument predicates and term substitution.
//!
//! A [`TermPredicate<T, R>`] reads like `|item, term| ...`: some of its leaves
//! refer to a search term that is not known yet. [`TermPredicate::rewrite`]
//! fixes the term and produces an ordinary [`Predicate<T>`], which is how the
//! `any`/`all` builder operations expand one template into one predicate per
//! term.
//!
//! ```
//! use fluent_search::{Op, TermPredicate};
//!
//! # struct Item;
//! let has_tag = TermPredicate::<Item, String>::field("tags", Op::Contains);
//!
//! let bound = has_tag.rewrite("{1F2D}".to_string());
//! assert!(bound.is_clause());
//! ```

use std::fmt;
use std::rc::Rc;

use crate::clause::{Clause, ClauseValue};
use crate::op::Op;
use crate::predicate::Predicate;

/// Predicate over a record and a search term.
pub enum TermPredicate<T, R> {
    /// Leaf that ignores the term.
    Item(Predicate<T>),
    /// `field op term`.
    Field {
        field: String,
        op: Op,
        value: Rc<dyn Fn(&R) -> ClauseValue>,
    },
    /// Closure over the record and the term.
    Fn(Rc<dyn Fn(&T, &R) -> bool>),
    And(Box<TermPredicate<T, R>>, Box<TermPredicate<T, R>>),
    Or(Box<TermPredicate<T, R>>, Box<TermPredicate<T, R>>),
    Not(Box<TermPredicate<T, R>>),
}

impl<T, R> TermPredicate<T, R> {
    pub fn from_fn(f: impl Fn(&T, &R) -> bool + 'static) -> Self {
        TermPredicate::Fn(Rc::new(f))
    }

    pub fn and(self, other: TermPredicate<T, R>) -> Self {
        TermPredicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: TermPredicate<T, R>) -> Self {
        TermPredicate::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        TermPredicate::Not(Box::new(self))
    }

    /// Returns `true` if some leaf refers to the term.
    pub fn uses_term(&self) -> bool {
        match self {
            TermPredicate::Item(_) => false,
            TermPredicate::Field { .. } | TermPredicate::Fn(_) => true,
            TermPredicate::And(a, b) | TermPredicate::Or(a, b) => a.uses_term() || b.uses_term(),
            TermPredicate::Not(inner) => inner.uses_term(),
        }
    }
}

impl<T: 'static, R: 'static> TermPredicate<T, R> {
    /// Compares `field` against the term with `op`.
    pub fn field(field: impl Into<String>, op: Op) -> Self
    where
        R: Clone + Into<ClauseValue>,
    {
        TermPredicate::Field {
            field: field.into(),
            op,
            value: Rc::new(|term: &R| term.clone().into()),
        }
    }

    /// Binds `term` and returns the equivalent one-argument predicate.
    ///
    /// Term leaves become clauses or closures over the constant; everything
    /// else keeps its shape. No simplification happens here, so the result
    /// has the same structure as `self`.
    pub fn rewrite(&self, term: R) -> Predicate<T> {
        self.bind(&Rc::new(term))
    }

    fn bind(&self, term: &Rc<R>) -> Predicate<T> {
        match self {
            TermPredicate::Item(p) => p.clone(),
            TermPredicate::Field { field, op, value } => {
                Predicate::Clause(Clause::new(field.clone(), *op, value(term.as_ref())))
            }
            TermPredicate::Fn(f) => {
                let f = Rc::clone(f);
                let term = Rc::clone(term);
                Predicate::from_fn(move |item| f(item, term.as_ref()))
            }
            TermPredicate::And(a, b) => Predicate::And(Box::new(a.bind(term)), Box::new(b.bind(term))),
            TermPredicate::Or(a, b) => Predicate::Or(Box::new(a.bind(term)), Box::new(b.bind(term))),
            TermPredicate::Not(inner) => Predicate::Not(Box::new(inner.bind(term))),
        }
    }
}

impl<T, R> Clone for TermPredicate<T, R> {
    fn clone(&self) -> Self {
        match self {
            TermPredicate::Item(p) => TermPredicate::Item(p.clone()),
            TermPredicate::Field { field, op, value } => TermPredicate::Field {
                field: field.clone(),
                op: *op,
                value: Rc::clone(value),
            },
            TermPredicate::Fn(f) => TermPredicate::Fn(Rc::clone(f)),
            TermPredicate::And(a, b) => TermPredicate::And(a.clone(), b.clone()),
            TermPredicate::Or(a, b) => TermPredicate::Or(a.clone(), b.clone()),
            TermPredicate::Not(inner) => TermPredicate::Not(inner.clone()),
        }
    }
}

impl<T, R> fmt::Debug for TermPredicate<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermPredicate::Item(p) => write!(f, "{:?}", p),
            TermPredicate::Field { field, op, .. } => write!(f, "{} {} <term>", field, op),
            TermPredicate::Fn(_) => f.write_str("Fn(.., <term>)"),
            TermPredicate::And(a, b) => write!(f, "({:?} AND {:?})", a, b),
            TermPredicate::Or(a, b) => write!(f, "({:?} OR {:?})", a, b),
            TermPredicate::Not(inner) => write!(f, "NOT {:?}", inner),
        }
    }
}

impl<T, R> From<Predicate<T>> for TermPredicate<T, R> {
    fn from(p: Predicate<T>) -> Self {
        TermPredicate::Item(p)
    }
}

impl<T, R> From<Clause> for TermPredicate<T, R> {
    fn from(clause: Clause) -> Self {
        TermPredicate::Item(Predicate::Clause(clause))
    }
}
