//! The host index seam.
//!
//! [`Queryable`] is the interface a search backend exposes: a chain of
//! restrictions, orderings and paging calls that ends in [`Queryable::results`]
//! or [`Queryable::facets`]. [`SearchContext`] hands out fresh queryables.
//!
//! [`MemoryIndex`] is a complete in-process implementation over a `Vec` of
//! records. It follows the same conventions as the search hosts this crate
//! targets: ordering calls are applied as successive stable sorts, so the last
//! call is the most significant key, and `total` counts matches before paging.

use std::rc::Rc;

use crate::error::IndexError;
use crate::facet::{FacetCategory, FacetOn};
use crate::predicate::Predicate;
use crate::radius::RadiusOptions;
use crate::results::Hits;
use crate::sorting::{Dir, OrderBy};
use crate::traits::Searchable;

/// A lazily evaluated search over records of type `T`.
///
/// Every call returns the refined queryable; nothing runs until
/// [`results`](Queryable::results) or [`facets`](Queryable::facets).
pub trait Queryable<T>: Sized {
    /// Restricts by a scoring predicate.
    fn where_query(self, predicate: Predicate<T>) -> Self;

    /// Restricts by a non-scoring predicate.
    fn filter(self, predicate: Predicate<T>) -> Self;

    /// Restricts to a geographic radius.
    fn within(self, radius: &RadiusOptions) -> Self;

    fn skip(self, count: usize) -> Self;

    fn take(self, count: usize) -> Self;

    /// Starts a new ordering.
    fn order_by(self, key: &str, dir: Dir) -> Self;

    /// Adds an ordering to the current one.
    fn then_by(self, key: &str, dir: Dir) -> Self;

    fn facet_on(self, facet: &FacetOn) -> Self;

    fn results(self) -> Result<Hits<T>, IndexError>;

    fn facets(self) -> Result<Vec<FacetCategory>, IndexError>;
}

/// An open connection to one index.
pub trait SearchContext<T> {
    type Queryable: Queryable<T>;

    fn queryable(&self) -> Self::Queryable;
}

/// In-memory index over a fixed set of records.
#[derive(Debug)]
pub struct MemoryIndex<T> {
    name: String,
    items: Rc<Vec<T>>,
    failure: Option<IndexError>,
}

impl<T> MemoryIndex<T> {
    pub fn new(name: impl Into<String>, items: Vec<T>) -> Self {
        MemoryIndex {
            name: name.into(),
            items: Rc::new(items),
            failure: None,
        }
    }

    /// An index whose every query fails with `message`.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        MemoryIndex {
            failure: Some(IndexError::for_index(name.clone(), message)),
            name,
            items: Rc::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Clone for MemoryIndex<T> {
    fn clone(&self) -> Self {
        MemoryIndex {
            name: self.name.clone(),
            items: Rc::clone(&self.items),
            failure: self.failure.clone(),
        }
    }
}

impl<T: Searchable + Clone> SearchContext<T> for MemoryIndex<T> {
    type Queryable = MemoryQueryable<T>;

    fn queryable(&self) -> MemoryQueryable<T> {
        MemoryQueryable {
            index: self.clone(),
            query: Predicate::True,
            filter: Predicate::True,
            radius: None,
            orderings: Vec::new(),
            skip: 0,
            take: None,
            facets: Vec::new(),
        }
    }
}

/// Queryable over a [`MemoryIndex`].
#[derive(Debug)]
pub struct MemoryQueryable<T> {
    index: MemoryIndex<T>,
    query: Predicate<T>,
    filter: Predicate<T>,
    radius: Option<RadiusOptions>,
    orderings: Vec<OrderBy>,
    skip: usize,
    take: Option<usize>,
    facets: Vec<FacetOn>,
}

impl<T: Searchable + Clone> MemoryQueryable<T> {
    fn matching(&self) -> Vec<&T> {
        self.index
            .items
            .iter()
            .filter(|item| self.query.matches(item) && self.filter.matches(item))
            .filter(|item| self.radius.as_ref().map_or(true, |r| r.contains(*item)))
            .collect()
    }

    fn check(&self) -> Result<(), IndexError> {
        match &self.index.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl<T: Searchable + Clone> Queryable<T> for MemoryQueryable<T> {
    fn where_query(mut self, predicate: Predicate<T>) -> Self {
        self.query = self.query.and(predicate);
        self
    }

    fn filter(mut self, predicate: Predicate<T>) -> Self {
        self.filter = self.filter.and(predicate);
        self
    }

    fn within(mut self, radius: &RadiusOptions) -> Self {
        self.radius = Some(radius.clone());
        self
    }

    fn skip(mut self, count: usize) -> Self {
        self.skip = self.skip.saturating_add(count);
        self
    }

    fn take(mut self, count: usize) -> Self {
        self.take = Some(self.take.map_or(count, |t| t.min(count)));
        self
    }

    fn order_by(mut self, key: &str, dir: Dir) -> Self {
        self.orderings.clear();
        self.orderings.push(OrderBy::new(key, dir));
        self
    }

    fn then_by(mut self, key: &str, dir: Dir) -> Self {
        self.orderings.push(OrderBy::new(key, dir));
        self
    }

    fn facet_on(mut self, facet: &FacetOn) -> Self {
        self.facets.push(facet.clone());
        self
    }

    fn results(self) -> Result<Hits<T>, IndexError> {
        self.check()?;

        let mut hits = self.matching();
        let total = hits.len();

        for order_by in &self.orderings {
            hits.sort_by(|a, b| order_by.compare_items(*a, *b));
        }
        if let Some(radius) = self.radius.as_ref().filter(|r| r.order_by_distance.is_some()) {
            hits.sort_by(|a, b| radius.compare_distance(*a, *b));
        }

        let items: Vec<T> = hits
            .into_iter()
            .skip(self.skip)
            .take(self.take.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        tracing::debug!(
            index = %self.index.name,
            total,
            returned = items.len(),
            "memory index search"
        );
        Ok(Hits::new(items, total))
    }

    fn facets(self) -> Result<Vec<FacetCategory>, IndexError> {
        self.check()?;

        let hits = self.matching();
        let categories: Vec<FacetCategory> = self
            .facets
            .iter()
            .map(|facet| facet.aggregate(hits.iter().copied()))
            .collect();

        tracing::debug!(
            index = %self.index.name,
            categories = categories.len(),
            "memory index facets"
        );
        Ok(categories)
    }
}
