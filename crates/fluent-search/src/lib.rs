//! Fluent search - composable query, filter, sort, paging and facet builders.
//!
//! A search is described with a tree of closures. Each closure receives a
//! builder for one part of the search; the builders fill in a
//! [`SearchConfiguration`], which a [`SearchManager`] then runs against a
//! search index through the [`Queryable`] seam.
//!
//! - Predicates: `and`/`or`/`not` over clauses, nested groups, and the
//!   `any`/`all`/`many_any` expansions over lists of search terms
//! - Two restriction stages: `query` (scored) and `filter` (non-scored)
//! - Multi-key sorting, page- or offset-based paging
//! - Facets, geographic radius restriction and result projection
//!
//! # Quick Start
//!
//! ```rust
//! use fluent_search::{
//!     Dir, MemoryIndex, Op, SearchManager, Searchable, TermPredicate, Value,
//! };
//!
//! #[derive(Clone)]
//! struct Article {
//!     name: String,
//!     template: &'static str,
//!     tags: Vec<String>,
//! }
//!
//! impl Searchable for Article {
//!     fn field_value(&self, key: &str) -> Value<'_> {
//!         match key {
//!             "_name" => Value::String(&self.name),
//!             "_templatename" => Value::String(self.template),
//!             _ => Value::None,
//!         }
//!     }
//!
//!     fn search_fields() -> &'static [&'static str] {
//!         &["_name", "_templatename"]
//!     }
//! }
//!
//! let articles = vec![
//!     Article { name: "Release notes".into(), template: "Article", tags: vec!["rust".into()] },
//!     Article { name: "Test drive".into(), template: "Article", tags: vec!["cars".into()] },
//!     Article { name: "Test event".into(), template: "Event", tags: vec!["rust".into()] },
//! ];
//! let manager: SearchManager<Article, _> =
//!     SearchManager::new(MemoryIndex::new("articles", articles));
//!
//! // Any article tagged with one of the requested tags.
//! let tagged = TermPredicate::from_fn(|a: &Article, tag: &String| a.tags.contains(tag));
//! let tags = vec!["rust".to_string(), "go".to_string()];
//!
//! let results = manager
//!     .results_for(|s| {
//!         s.query(|q| {
//!             q.and_contains("_name", "Test").any(tags, tagged);
//!         })
//!         .filter(|f| {
//!             f.and_clause("_templatename", Op::Eq, "Event");
//!         })
//!         .sort(|s| {
//!             s.by_dir("_name", Dir::Asc);
//!         })
//!         .paging(|p| {
//!             p.set_page(1).take(10);
//!         });
//!     })
//!     .unwrap();
//!
//! assert_eq!(results.total, 1);
//! assert_eq!(results.items[0].name, "Test event");
//! ```
//!
//! # Predicate Semantics
//!
//! Every predicate builder starts from an empty aggregate. The first
//! predicate added replaces it, whichever combinator adds it; later ones are
//! combined with `and` or `or`. Identity operands are removed as predicates
//! are combined, and negation folds:
//!
//! ```text
//! True and p = p         False or p = p
//! not True = False       not False = True
//! not (not p) = p
//! ```
//!
//! Absorbing operands (`False and p`, `True or p`) are kept in the tree; they
//! evaluate to `False` and `True` as usual.
//!
//! A [`TermPredicate`] is a predicate with a hole for one search term.
//! `any(terms, f)` ORs `f` bound to each term, `all(terms, f)` ANDs them, and
//! `many_any(groups, f)` ANDs the `any` of each group. Empty term lists add
//! nothing.
//!
//! # Execution Order
//!
//! Results: query, filter, radius, paging, then sorting. Facets: query,
//! filter, radius, then one facet request per facet key. Stages with
//! nothing configured are not issued.

mod clause;
mod error;
mod facet;
mod manager;
mod op;
mod paging;
mod predicate;
mod query;
mod queryable;
mod radius;
mod results;
mod rewrite;
mod searcher;
mod settings;
mod sorting;
mod traits;
mod value;

pub use clause::{Clause, ClauseValue};
pub use error::{IndexError, Result, SearchError};
pub use facet::{FacetBuilder, FacetCategory, FacetOn, FacetOptions, FacetResults, FacetValue};
pub use manager::{
    ContextProvider, DatabaseProvider, FailurePolicy, IndexConnector, IndexLookup, IndexProvider,
    MemoryCatalog, SearchManager, StaticDatabase, DEFAULT_DATABASE,
};
pub use op::Op;
pub use paging::{PageMode, PagingBuilder, PagingOptions, DEFAULT_DISPLAY};
pub use predicate::Predicate;
pub use query::{
    FilterBuilder, FilterOptions, PredicateBuilder, PredicateOptions, QueryBuilder, QueryOptions,
    Seed,
};
pub use queryable::{MemoryIndex, MemoryQueryable, Queryable, SearchContext};
pub use radius::{RadiusBuilder, RadiusOptions};
pub use results::{Hits, SearchResults};
pub use rewrite::TermPredicate;
pub use searcher::{SearchConfiguration, SearcherBuilder, SelectOptions};
pub use settings::SearchSettings;
pub use sorting::{compare_values, Dir, OrderBy, SortingBuilder, SortingOptions};
pub use traits::{SearchEnum, SearchTimestamp, Searchable};
pub use value::{Coordinate, Number, Timestamp, Value};
