//! Search result containers.

use crate::facet::FacetResults;

/// Raw page of records returned by a [`Queryable`](crate::Queryable).
#[derive(Debug, Clone, PartialEq)]
pub struct Hits<T> {
    pub items: Vec<T>,
    /// Matches before paging.
    pub total: usize,
}

impl<T> Hits<T> {
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Hits { items, total }
    }
}

impl<T> Default for Hits<T> {
    fn default() -> Self {
        Hits {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Records returned by a search, plus facets when they were requested.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults<T> {
    pub items: Vec<T>,
    /// Matches before paging.
    pub total: usize,
    pub facets: Option<FacetResults>,
}

impl<T> SearchResults<T> {
    pub fn empty() -> Self {
        SearchResults {
            items: Vec::new(),
            total: 0,
            facets: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> From<Hits<T>> for SearchResults<T> {
    fn from(hits: Hits<T>) -> Self {
        SearchResults {
            items: hits.items,
            total: hits.total,
            facets: None,
        }
    }
}

impl<T> IntoIterator for SearchResults<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a SearchResults<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
