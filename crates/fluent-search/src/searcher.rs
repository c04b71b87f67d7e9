//! The search configuration and the fluent facade that fills it in.
//!
//! A [`SearchConfiguration`] is created per search, filled in by a
//! [`SearcherBuilder`] closure, and then only read while the search runs.
//!
//! ```
//! use fluent_search::{SearchConfiguration, SearcherBuilder, Searchable, Value};
//!
//! struct Page {
//!     name: String,
//! }
//!
//! impl Searchable for Page {
//!     fn field_value(&self, key: &str) -> Value<'_> {
//!         match key {
//!             "_name" => Value::String(&self.name),
//!             _ => Value::None,
//!         }
//!     }
//!
//!     fn search_fields() -> &'static [&'static str] {
//!         &["_name"]
//!     }
//! }
//!
//! let mut config = SearchConfiguration::<Page>::new();
//! SearcherBuilder::new(&mut config)
//!     .paging(|p| {
//!         p.set_page(2).take(20);
//!     })
//!     .query(|q| {
//!         q.and_contains("_name", "Test");
//!     })
//!     .sort(|s| {
//!         s.by("_name");
//!     });
//!
//! assert_eq!(config.paging.starting_position(), 20);
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::rc::Rc;

use crate::error::{Result, SearchError};
use crate::facet::{FacetBuilder, FacetOptions};
use crate::paging::{PagingBuilder, PagingOptions};
use crate::query::{FilterOptions, PredicateBuilder, QueryOptions};
use crate::queryable::Queryable;
use crate::radius::{RadiusBuilder, RadiusOptions};
use crate::sorting::{SortingBuilder, SortingOptions};
use crate::traits::Searchable;

/// Optional projection applied to every returned record.
pub struct SelectOptions<T> {
    projection: Option<Rc<dyn Fn(T) -> T>>,
}

impl<T> Default for SelectOptions<T> {
    fn default() -> Self {
        SelectOptions { projection: None }
    }
}

impl<T> Clone for SelectOptions<T> {
    fn clone(&self) -> Self {
        SelectOptions {
            projection: self.projection.clone(),
        }
    }
}

impl<T> fmt::Debug for SelectOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectOptions")
            .field("projection", &self.projection.as_ref().map(|_| ".."))
            .finish()
    }
}

impl<T> SelectOptions<T> {
    pub fn is_set(&self) -> bool {
        self.projection.is_some()
    }

    pub fn project(&self, items: Vec<T>) -> Vec<T> {
        match &self.projection {
            Some(f) => items.into_iter().map(|item| f(item)).collect(),
            None => items,
        }
    }
}

/// Everything one search needs.
#[derive(Debug, Clone)]
pub struct SearchConfiguration<T> {
    pub paging: PagingOptions,
    pub query: QueryOptions<T>,
    pub filter: FilterOptions<T>,
    pub sorting: SortingOptions,
    pub facets: FacetOptions,
    pub radius: RadiusOptions,
    pub select: SelectOptions<T>,
    errors: Vec<SearchError>,
}

impl<T> Default for SearchConfiguration<T> {
    fn default() -> Self {
        SearchConfiguration {
            paging: PagingOptions::default(),
            query: QueryOptions::default(),
            filter: FilterOptions::default(),
            sorting: SortingOptions::default(),
            facets: FacetOptions::default(),
            radius: RadiusOptions::default(),
            select: SelectOptions::default(),
            errors: Vec::new(),
        }
    }
}

impl<T> SearchConfiguration<T> {
    pub fn new() -> Self {
        SearchConfiguration::default()
    }

    /// A configuration whose page size defaults to `display`.
    pub fn with_display(display: i32) -> Self {
        SearchConfiguration {
            paging: PagingOptions::with_display(display),
            ..SearchConfiguration::default()
        }
    }

    /// Errors recorded while the configuration was built.
    pub fn errors(&self) -> &[SearchError] {
        &self.errors
    }

    /// Returns the first recorded configuration error.
    pub fn validate(&self) -> Result<()> {
        match self.errors.first() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn apply_predicates<Q: Queryable<T>>(&self, queryable: Q) -> Q {
        let query = self.query.resolved();
        let queryable = if query.is_true() {
            queryable
        } else {
            queryable.where_query(query)
        };

        let filter = self.filter.resolved();
        let queryable = if filter.is_true() {
            queryable
        } else {
            queryable.filter(filter)
        };

        self.radius.apply(queryable)
    }

    /// Query, filter, radius, paging, then sorting.
    pub fn apply_results<Q: Queryable<T>>(&self, queryable: Q) -> Q {
        let queryable = self.apply_predicates(queryable);
        let queryable = self.paging.apply(queryable);
        self.sorting.apply(queryable)
    }

    /// Query, filter, radius, then one `facet_on` per requested facet.
    pub fn apply_facets<Q: Queryable<T>>(&self, queryable: Q) -> Q {
        self.facets
            .facets()
            .iter()
            .fold(self.apply_predicates(queryable), |q, facet| q.facet_on(facet))
    }
}

/// Fluent facade over a [`SearchConfiguration`].
///
/// Each method hands a builder for one part of the configuration to a closure.
pub struct SearcherBuilder<'a, T> {
    config: &'a mut SearchConfiguration<T>,
}

impl<'a, T: Searchable + 'static> SearcherBuilder<'a, T> {
    pub fn new(config: &'a mut SearchConfiguration<T>) -> Self {
        SearcherBuilder { config }
    }

    pub fn configuration(&self) -> &SearchConfiguration<T> {
        self.config
    }

    pub fn paging(&mut self, f: impl FnOnce(&mut PagingBuilder<'_>)) -> &mut Self {
        f(&mut PagingBuilder::new(&mut self.config.paging));
        self
    }

    /// Builds the scoring-stage predicate.
    pub fn query(&mut self, f: impl FnOnce(&mut PredicateBuilder<'_, T>)) -> &mut Self {
        f(&mut PredicateBuilder::new(&mut self.config.query));
        self
    }

    /// Builds the non-scoring-stage predicate.
    pub fn filter(&mut self, f: impl FnOnce(&mut PredicateBuilder<'_, T>)) -> &mut Self {
        f(&mut PredicateBuilder::new(&mut self.config.filter));
        self
    }

    pub fn sort(&mut self, f: impl FnOnce(&mut SortingBuilder<'_, T>)) -> &mut Self {
        let config = &mut *self.config;
        f(&mut SortingBuilder::new(&mut config.sorting, &mut config.errors));
        self
    }

    pub fn facet(&mut self, f: impl FnOnce(&mut FacetBuilder<'_, T>)) -> &mut Self {
        let config = &mut *self.config;
        f(&mut FacetBuilder::new(&mut config.facets, &mut config.errors));
        self
    }

    pub fn radius(&mut self, f: impl FnOnce(&mut RadiusBuilder<'_, T>)) -> &mut Self {
        let config = &mut *self.config;
        f(&mut RadiusBuilder::new(&mut config.radius, &mut config.errors));
        self
    }

    /// Sets the projection applied to each returned record.
    pub fn select(&mut self, projection: impl Fn(T) -> T + 'static) -> &mut Self {
        self.config.select.projection = Some(Rc::new(projection));
        self
    }
}
