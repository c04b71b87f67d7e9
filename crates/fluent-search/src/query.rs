//! Query and filter stage builders.
//!
//! Both stages accumulate a single predicate in a [`PredicateOptions`] and
//! are driven by the same [`PredicateBuilder`]. The only difference between a
//! query (scoring) and a filter (non-scoring) predicate is which aggregate of
//! the [`SearchConfiguration`](crate::SearchConfiguration) the builder writes
//! to.
//!
//! # Example
//!
//! ```
//! use fluent_search::{PredicateBuilder, PredicateOptions};
//!
//! # struct Item;
//! let mut options = PredicateOptions::<Item>::default();
//! PredicateBuilder::new(&mut options)
//!     .and_contains("_name", "Test")
//!     .or(|b| {
//!         b.and_eq("_language", "es-ES").and_eq("_templatename", "Article");
//!     });
//!
//! assert!(options.predicate().is_some());
//! ```

use regex::Regex;

use crate::clause::{Clause, ClauseValue};
use crate::error::Result;
use crate::op::Op;
use crate::predicate::Predicate;
use crate::rewrite::TermPredicate;

/// What an empty aggregate means once it is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seed {
    /// Empty matches everything.
    #[default]
    And,
    /// Empty matches nothing.
    Or,
}

/// An accumulated predicate for one stage.
#[derive(Debug, Clone)]
pub struct PredicateOptions<T> {
    predicate: Option<Predicate<T>>,
    seed: Seed,
}

/// Options for the scoring stage.
pub type QueryOptions<T> = PredicateOptions<T>;

/// Options for the non-scoring stage.
pub type FilterOptions<T> = PredicateOptions<T>;

impl<T> Default for PredicateOptions<T> {
    fn default() -> Self {
        PredicateOptions::new(Seed::And)
    }
}

impl<T> PredicateOptions<T> {
    pub fn new(seed: Seed) -> Self {
        PredicateOptions {
            predicate: None,
            seed,
        }
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// The accumulated predicate, `None` if nothing was added.
    pub fn predicate(&self) -> Option<&Predicate<T>> {
        self.predicate.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.predicate.is_none()
    }

    /// The predicate to execute: the accumulated one or the seed's identity.
    pub fn resolved(&self) -> Predicate<T> {
        match (&self.predicate, self.seed) {
            (Some(p), _) => p.clone(),
            (None, Seed::And) => Predicate::True,
            (None, Seed::Or) => Predicate::False,
        }
    }

    pub fn into_predicate(self) -> Option<Predicate<T>> {
        self.predicate
    }

    /// Conjoins `p`; on an empty aggregate `p` becomes the aggregate.
    pub fn and(&mut self, p: Predicate<T>) {
        self.predicate = Some(match self.predicate.take() {
            Some(current) => current.and(p),
            None => p,
        });
    }

    /// Disjoins `p`; on an empty aggregate `p` becomes the aggregate.
    pub fn or(&mut self, p: Predicate<T>) {
        self.predicate = Some(match self.predicate.take() {
            Some(current) => current.or(p),
            None => p,
        });
    }
}

/// Fluent builder over one stage's [`PredicateOptions`].
///
/// Every operation returns `&mut Self` so calls chain. Nested scopes
/// ([`and`](Self::and), [`or`](Self::or), [`not`](Self::not)) run a closure on a
/// fresh builder and fold its result into this one.
pub struct PredicateBuilder<'a, T> {
    options: &'a mut PredicateOptions<T>,
}

/// Builder for the scoring stage.
pub type QueryBuilder<'a, T> = PredicateBuilder<'a, T>;

/// Builder for the non-scoring stage.
pub type FilterBuilder<'a, T> = PredicateBuilder<'a, T>;

impl<'a, T: 'static> PredicateBuilder<'a, T> {
    pub fn new(options: &'a mut PredicateOptions<T>) -> Self {
        PredicateBuilder { options }
    }

    pub fn options(&self) -> &PredicateOptions<T> {
        self.options
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    /// Conjoins a predicate.
    pub fn and_where(&mut self, p: impl Into<Predicate<T>>) -> &mut Self {
        self.options.and(p.into());
        self
    }

    /// Disjoins a predicate.
    pub fn or_where(&mut self, p: impl Into<Predicate<T>>) -> &mut Self {
        self.options.or(p.into());
        self
    }

    /// Conjoins a closure predicate.
    pub fn and_fn(&mut self, f: impl Fn(&T) -> bool + 'static) -> &mut Self {
        self.and_where(Predicate::from_fn(f))
    }

    /// Disjoins a closure predicate.
    pub fn or_fn(&mut self, f: impl Fn(&T) -> bool + 'static) -> &mut Self {
        self.or_where(Predicate::from_fn(f))
    }

    pub fn if_where(&mut self, condition: bool, p: impl Into<Predicate<T>>) -> &mut Self {
        if condition {
            self.and_where(p);
        }
        self
    }

    pub fn if_or_where(&mut self, condition: bool, p: impl Into<Predicate<T>>) -> &mut Self {
        if condition {
            self.or_where(p);
        }
        self
    }

    // ========================================================================
    // Nested scopes
    // ========================================================================

    /// Conjoins everything `scope` builds. An empty scope changes nothing.
    pub fn and(&mut self, scope: impl FnOnce(&mut PredicateBuilder<'_, T>)) -> &mut Self {
        if let Some(p) = Self::build_scope(scope) {
            self.options.and(p);
        }
        self
    }

    /// Disjoins everything `scope` builds. An empty scope changes nothing.
    pub fn or(&mut self, scope: impl FnOnce(&mut PredicateBuilder<'_, T>)) -> &mut Self {
        if let Some(p) = Self::build_scope(scope) {
            self.options.or(p);
        }
        self
    }

    /// Conjoins the negation of what `scope` builds. An empty scope changes
    /// nothing.
    #[allow(clippy::should_implement_trait)]
    pub fn not(&mut self, scope: impl FnOnce(&mut PredicateBuilder<'_, T>)) -> &mut Self {
        if let Some(p) = Self::build_scope(scope) {
            self.options.and(p.not());
        }
        self
    }

    fn build_scope(scope: impl FnOnce(&mut PredicateBuilder<'_, T>)) -> Option<Predicate<T>> {
        let mut nested = PredicateOptions::default();
        scope(&mut PredicateBuilder::new(&mut nested));
        nested.into_predicate()
    }

    // ========================================================================
    // Term expansion
    // ========================================================================

    /// Matches when `f` holds for at least one term; conjoined.
    pub fn any<R: 'static>(
        &mut self,
        terms: impl IntoIterator<Item = R>,
        f: TermPredicate<T, R>,
    ) -> &mut Self {
        if let Some(p) = expand_any(terms, &f) {
            self.options.and(p);
        }
        self
    }

    /// Matches when `f` holds for at least one term; disjoined.
    pub fn or_any<R: 'static>(
        &mut self,
        terms: impl IntoIterator<Item = R>,
        f: TermPredicate<T, R>,
    ) -> &mut Self {
        if let Some(p) = expand_any(terms, &f) {
            self.options.or(p);
        }
        self
    }

    /// Matches when `f` holds for every term; conjoined.
    pub fn all<R: 'static>(
        &mut self,
        terms: impl IntoIterator<Item = R>,
        f: TermPredicate<T, R>,
    ) -> &mut Self {
        if let Some(p) = expand_all(terms, &f) {
            self.options.and(p);
        }
        self
    }

    /// Matches when `f` holds for every term; disjoined.
    pub fn or_all<R: 'static>(
        &mut self,
        terms: impl IntoIterator<Item = R>,
        f: TermPredicate<T, R>,
    ) -> &mut Self {
        if let Some(p) = expand_all(terms, &f) {
            self.options.or(p);
        }
        self
    }

    /// Every group must have a term for which `f` holds; conjoined.
    ///
    /// Empty groups are skipped.
    pub fn many_any<R: 'static, G>(
        &mut self,
        groups: impl IntoIterator<Item = G>,
        f: TermPredicate<T, R>,
    ) -> &mut Self
    where
        G: IntoIterator<Item = R>,
    {
        if let Some(p) = expand_many_any(groups, &f) {
            self.options.and(p);
        }
        self
    }

    /// Every group must have a term for which `f` holds; disjoined.
    pub fn or_many_any<R: 'static, G>(
        &mut self,
        groups: impl IntoIterator<Item = G>,
        f: TermPredicate<T, R>,
    ) -> &mut Self
    where
        G: IntoIterator<Item = R>,
    {
        if let Some(p) = expand_many_any(groups, &f) {
            self.options.or(p);
        }
        self
    }

    pub fn if_any<R: 'static>(
        &mut self,
        condition: bool,
        terms: impl IntoIterator<Item = R>,
        f: TermPredicate<T, R>,
    ) -> &mut Self {
        if condition {
            self.any(terms, f);
        }
        self
    }

    pub fn if_or_any<R: 'static>(
        &mut self,
        condition: bool,
        terms: impl IntoIterator<Item = R>,
        f: TermPredicate<T, R>,
    ) -> &mut Self {
        if condition {
            self.or_any(terms, f);
        }
        self
    }

    pub fn if_all<R: 'static>(
        &mut self,
        condition: bool,
        terms: impl IntoIterator<Item = R>,
        f: TermPredicate<T, R>,
    ) -> &mut Self {
        if condition {
            self.all(terms, f);
        }
        self
    }

    pub fn if_or_all<R: 'static>(
        &mut self,
        condition: bool,
        terms: impl IntoIterator<Item = R>,
        f: TermPredicate<T, R>,
    ) -> &mut Self {
        if condition {
            self.or_all(terms, f);
        }
        self
    }

    pub fn if_many_any<R: 'static, G>(
        &mut self,
        condition: bool,
        groups: impl IntoIterator<Item = G>,
        f: TermPredicate<T, R>,
    ) -> &mut Self
    where
        G: IntoIterator<Item = R>,
    {
        if condition {
            self.many_any(groups, f);
        }
        self
    }

    pub fn if_or_many_any<R: 'static, G>(
        &mut self,
        condition: bool,
        groups: impl IntoIterator<Item = G>,
        f: TermPredicate<T, R>,
    ) -> &mut Self
    where
        G: IntoIterator<Item = R>,
    {
        if condition {
            self.or_many_any(groups, f);
        }
        self
    }

    // ========================================================================
    // Clause shorthands
    // ========================================================================

    /// Conjoins `field op value`.
    pub fn and_clause(&mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> &mut Self {
        self.and_where(Clause::new(field, op, value))
    }

    /// Disjoins `field op value`.
    pub fn or_clause(&mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> &mut Self {
        self.or_where(Clause::new(field, op, value))
    }

    /// Conjoins `NOT (field op value)`.
    pub fn not_clause(&mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> &mut Self {
        self.and_where(Predicate::<T>::from(Clause::new(field, op, value)).not())
    }

    pub fn and_eq(&mut self, field: &str, value: impl Into<ClauseValue>) -> &mut Self {
        self.and_clause(field, Op::Eq, value)
    }

    pub fn and_ne(&mut self, field: &str, value: impl Into<ClauseValue>) -> &mut Self {
        self.and_clause(field, Op::Ne, value)
    }

    pub fn and_gt(&mut self, field: &str, value: impl Into<ClauseValue>) -> &mut Self {
        self.and_clause(field, Op::Gt, value)
    }

    pub fn and_gte(&mut self, field: &str, value: impl Into<ClauseValue>) -> &mut Self {
        self.and_clause(field, Op::Gte, value)
    }

    pub fn and_lt(&mut self, field: &str, value: impl Into<ClauseValue>) -> &mut Self {
        self.and_clause(field, Op::Lt, value)
    }

    pub fn and_lte(&mut self, field: &str, value: impl Into<ClauseValue>) -> &mut Self {
        self.and_clause(field, Op::Lte, value)
    }

    pub fn and_contains(&mut self, field: &str, value: &str) -> &mut Self {
        self.and_clause(field, Op::Contains, value)
    }

    pub fn and_starts_with(&mut self, field: &str, value: &str) -> &mut Self {
        self.and_clause(field, Op::StartsWith, value)
    }

    pub fn and_ends_with(&mut self, field: &str, value: &str) -> &mut Self {
        self.and_clause(field, Op::EndsWith, value)
    }

    /// Conjoins a set-membership clause (`Vec<u32>` or `Vec<String>`).
    pub fn and_in(&mut self, field: &str, values: impl Into<ClauseValue>) -> &mut Self {
        self.and_clause(field, Op::In, values)
    }

    /// Conjoins a regex clause. Fails on an invalid pattern and leaves the
    /// builder unchanged.
    pub fn and_regex(&mut self, field: &str, pattern: &str) -> Result<&mut Self> {
        let regex = Regex::new(pattern)?;
        Ok(self.and_clause(field, Op::Regex, regex))
    }

    pub fn or_eq(&mut self, field: &str, value: impl Into<ClauseValue>) -> &mut Self {
        self.or_clause(field, Op::Eq, value)
    }

    pub fn or_contains(&mut self, field: &str, value: &str) -> &mut Self {
        self.or_clause(field, Op::Contains, value)
    }

    pub fn or_starts_with(&mut self, field: &str, value: &str) -> &mut Self {
        self.or_clause(field, Op::StartsWith, value)
    }

    pub fn or_in(&mut self, field: &str, values: impl Into<ClauseValue>) -> &mut Self {
        self.or_clause(field, Op::In, values)
    }

    pub fn or_regex(&mut self, field: &str, pattern: &str) -> Result<&mut Self> {
        let regex = Regex::new(pattern)?;
        Ok(self.or_clause(field, Op::Regex, regex))
    }

    pub fn not_eq(&mut self, field: &str, value: impl Into<ClauseValue>) -> &mut Self {
        self.not_clause(field, Op::Eq, value)
    }

    pub fn not_contains(&mut self, field: &str, value: &str) -> &mut Self {
        self.not_clause(field, Op::Contains, value)
    }
}

fn expand_any<T: 'static, R: 'static>(
    terms: impl IntoIterator<Item = R>,
    f: &TermPredicate<T, R>,
) -> Option<Predicate<T>> {
    terms
        .into_iter()
        .map(|term| f.rewrite(term))
        .reduce(Predicate::or)
}

fn expand_all<T: 'static, R: 'static>(
    terms: impl IntoIterator<Item = R>,
    f: &TermPredicate<T, R>,
) -> Option<Predicate<T>> {
    terms
        .into_iter()
        .map(|term| f.rewrite(term))
        .reduce(Predicate::and)
}

fn expand_many_any<T: 'static, R: 'static, G: IntoIterator<Item = R>>(
    groups: impl IntoIterator<Item = G>,
    f: &TermPredicate<T, R>,
) -> Option<Predicate<T>> {
    groups
        .into_iter()
        .filter_map(|group| expand_any(group, f))
        .reduce(Predicate::and)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Searchable;
    use crate::value::Value;

    #[derive(Debug)]
    struct Entry {
        name: &'static str,
        template: &'static str,
        semantics: Vec<u32>,
    }

    impl Searchable for Entry {
        fn field_value(&self, key: &str) -> Value<'_> {
            match key {
                "_name" => Value::String(self.name),
                "_templatename" => Value::String(self.template),
                _ => Value::None,
            }
        }

        fn search_fields() -> &'static [&'static str] {
            &["_name", "_templatename"]
        }
    }

    fn sample_entries() -> Vec<Entry> {
        vec![
            Entry { name: "Test Event 1", template: "Event", semantics: vec![1, 2] },
            Entry { name: "Test Event 2", template: "Event", semantics: vec![2, 3] },
            Entry { name: "Test Article 1", template: "Article", semantics: vec![3] },
            Entry { name: "Test Article 2", template: "Article", semantics: vec![1, 3] },
            Entry { name: "Category 1", template: "Category", semantics: vec![] },
            Entry { name: "Category 2", template: "Category", semantics: vec![4] },
        ]
    }

    fn has_semantic() -> TermPredicate<Entry, u32> {
        TermPredicate::from_fn(|entry: &Entry, id: &u32| entry.semantics.contains(id))
    }

    fn names(options: &PredicateOptions<Entry>) -> Vec<&'static str> {
        let p = options.resolved();
        sample_entries()
            .iter()
            .filter(|e| p.matches(e))
            .map(|e| e.name)
            .collect()
    }

    fn build(f: impl FnOnce(&mut PredicateBuilder<'_, Entry>)) -> PredicateOptions<Entry> {
        let mut options = PredicateOptions::default();
        f(&mut PredicateBuilder::new(&mut options));
        options
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    #[test]
    fn empty_aggregate_resolves_to_seed() {
        let and = PredicateOptions::<Entry>::new(Seed::And);
        let or = PredicateOptions::<Entry>::new(Seed::Or);

        assert!(and.is_empty());
        assert!(and.resolved().is_true());
        assert!(or.resolved().is_false());
        assert_eq!(names(&and).len(), 6);
    }

    #[test]
    fn first_predicate_becomes_aggregate() {
        let and = build(|b| {
            b.and_eq("_templatename", "Event");
        });
        let or = build(|b| {
            b.or_eq("_templatename", "Event");
        });

        assert!(and.predicate().is_some_and(|p| p.is_clause()));
        assert!(or.predicate().is_some_and(|p| p.is_clause()));
        assert_eq!(names(&or), vec!["Test Event 1", "Test Event 2"]);
    }

    // ========================================================================
    // Where / OrWhere
    // ========================================================================

    #[test]
    fn and_where_conjoins() {
        let options = build(|b| {
            b.and_contains("_name", "Test").and_eq("_templatename", "Article");
        });
        assert_eq!(names(&options), vec!["Test Article 1", "Test Article 2"]);
    }

    #[test]
    fn or_where_disjoins() {
        let options = build(|b| {
            b.and_eq("_templatename", "Article")
                .or_eq("_templatename", "Category");
        });
        assert_eq!(names(&options).len(), 4);
    }

    #[test]
    fn conditional_variants_skip_when_false() {
        let options = build(|b| {
            b.if_where(false, Clause::new("_name", Op::Eq, "nothing"))
                .if_or_where(false, Clause::new("_name", Op::Eq, "nothing"))
                .if_any(false, vec![1u32], has_semantic())
                .if_or_any(false, vec![1u32], has_semantic())
                .if_all(false, vec![1u32], has_semantic())
                .if_or_all(false, vec![1u32], has_semantic())
                .if_many_any(false, vec![vec![1u32]], has_semantic())
                .if_or_many_any(false, vec![vec![1u32]], has_semantic());
        });
        assert!(options.is_empty());

        let applied = build(|b| {
            b.if_where(true, Clause::new("_templatename", Op::Eq, "Category"));
        });
        assert_eq!(names(&applied), vec!["Category 1", "Category 2"]);
    }

    #[test]
    fn closure_predicates() {
        let options = build(|b| {
            b.and_fn(|e| e.name.ends_with('2')).or_fn(|e| e.semantics.is_empty());
        });
        assert_eq!(
            names(&options),
            vec!["Test Event 2", "Test Article 2", "Category 1", "Category 2"]
        );
    }

    #[test]
    fn regex_shorthand() {
        let mut options = PredicateOptions::default();
        let mut builder = PredicateBuilder::<Entry>::new(&mut options);

        assert!(builder.and_regex("_name", "(").is_err());
        assert!(builder.options().is_empty());

        builder.and_regex("_name", r"^Test \w+ 1$").unwrap();
        assert_eq!(names(&options), vec!["Test Event 1", "Test Article 1"]);
    }

    // ========================================================================
    // Nested scopes
    // ========================================================================

    #[test]
    fn nested_or_scope() {
        let options = build(|b| {
            b.and_contains("_name", "Test").and(|inner| {
                inner
                    .or_eq("_templatename", "Article")
                    .or_clause("_name", Op::EndsWith, "2");
            });
        });
        assert_eq!(
            names(&options),
            vec!["Test Event 2", "Test Article 1", "Test Article 2"]
        );
    }

    #[test]
    fn empty_scopes_are_no_ops() {
        let options = build(|b| {
            b.and_eq("_templatename", "Event")
                .and(|_| {})
                .or(|_| {})
                .not(|_| {});
        });
        assert!(options.predicate().is_some_and(|p| p.is_clause()));
    }

    #[test]
    fn not_scope_negates() {
        let options = build(|b| {
            b.and_contains("_name", "Test").not(|inner| {
                inner.and_eq("_templatename", "Event");
            });
        });
        assert_eq!(names(&options), vec!["Test Article 1", "Test Article 2"]);

        let only_not = build(|b| {
            b.not(|inner| {
                inner.and_contains("_name", "Test");
            });
        });
        assert_eq!(names(&only_not), vec!["Category 1", "Category 2"]);
    }

    #[test]
    fn or_scope_on_empty_parent() {
        let options = build(|b| {
            b.or(|inner| {
                inner.and_eq("_templatename", "Category");
            });
        });
        assert_eq!(names(&options).len(), 2);
    }

    // ========================================================================
    // Term expansion
    // ========================================================================

    #[test]
    fn any_matches_one_of_terms() {
        let options = build(|b| {
            b.any(vec![1u32, 4], has_semantic());
        });
        assert_eq!(
            names(&options),
            vec!["Test Event 1", "Test Article 2", "Category 2"]
        );
    }

    #[test]
    fn all_matches_every_term() {
        let options = build(|b| {
            b.all(vec![1u32, 3], has_semantic());
        });
        assert_eq!(names(&options), vec!["Test Article 2"]);
    }

    #[test]
    fn empty_term_lists_are_no_ops() {
        let options = build(|b| {
            b.any(Vec::<u32>::new(), has_semantic())
                .or_any(Vec::<u32>::new(), has_semantic())
                .all(Vec::<u32>::new(), has_semantic())
                .or_all(Vec::<u32>::new(), has_semantic())
                .many_any(Vec::<Vec<u32>>::new(), has_semantic())
                .many_any(vec![Vec::<u32>::new()], has_semantic());
        });
        assert!(options.is_empty());
        assert_eq!(names(&options).len(), 6);
    }

    #[test]
    fn or_any_and_or_all_disjoin() {
        let options = build(|b| {
            b.and_eq("_templatename", "Category")
                .or_any(vec![1u32], has_semantic());
        });
        assert_eq!(names(&options).len(), 4);

        let options = build(|b| {
            b.and_eq("_name", "Category 1")
                .or_all(vec![2u32, 3], has_semantic());
        });
        assert_eq!(names(&options), vec!["Test Event 2", "Category 1"]);
    }

    #[test]
    fn many_any_ors_within_and_ands_across_groups() {
        let options = build(|b| {
            b.many_any(vec![vec![1u32, 2], vec![3u32]], has_semantic());
        });
        assert_eq!(names(&options), vec!["Test Event 2", "Test Article 2"]);

        let options = build(|b| {
            b.and_eq("_templatename", "Category")
                .or_many_any(vec![vec![1u32], vec![2u32]], has_semantic());
        });
        assert_eq!(
            names(&options),
            vec!["Test Event 1", "Category 1", "Category 2"]
        );
    }

    #[test]
    fn field_term_templates() {
        let options = build(|b| {
            b.any(
                vec!["Event", "Category"],
                TermPredicate::field("_templatename", Op::Eq),
            );
        });
        assert_eq!(names(&options).len(), 4);
    }
}
