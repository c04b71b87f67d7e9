//! Search execution against a lazily opened index.
//!
//! A [`SearchManager`] builds a [`SearchConfiguration`] from a closure, asks
//! its [`ContextProvider`] for a search context and runs the configuration
//! against a fresh queryable. The default provider, [`IndexProvider`], picks
//! the index for the current database from an [`IndexLookup`], opens it on
//! first use and releases it when dropped.
//!
//! ```
//! use fluent_search::{
//!     IndexLookup, IndexProvider, MemoryCatalog, MemoryIndex, SearchManager, Searchable,
//!     StaticDatabase, Value,
//! };
//!
//! #[derive(Clone)]
//! struct Page {
//!     name: &'static str,
//! }
//!
//! impl Searchable for Page {
//!     fn field_value(&self, key: &str) -> Value<'_> {
//!         match key {
//!             "_name" => Value::String(self.name),
//!             _ => Value::None,
//!         }
//!     }
//!
//!     fn search_fields() -> &'static [&'static str] {
//!         &["_name"]
//!     }
//! }
//!
//! let catalog = MemoryCatalog::new().with_index(MemoryIndex::new(
//!     "pages_web",
//!     vec![Page { name: "Home" }, Page { name: "Test page" }],
//! ));
//! let provider = IndexProvider::new(
//!     catalog,
//!     StaticDatabase::default(),
//!     IndexLookup::web_master("pages_web", "pages_master"),
//! );
//! let manager: SearchManager<Page, _> = SearchManager::new(provider);
//!
//! let results = manager
//!     .results_for(|s| {
//!         s.query(|q| {
//!             q.and_contains("_name", "Test");
//!         });
//!     })
//!     .unwrap();
//! assert_eq!(results.total, 1);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;

use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result, SearchError};
use crate::facet::FacetResults;
use crate::paging::DEFAULT_DISPLAY;
use crate::queryable::{MemoryIndex, Queryable, SearchContext};
use crate::results::SearchResults;
use crate::searcher::{SearchConfiguration, SearcherBuilder};
use crate::settings::SearchSettings;
use crate::traits::Searchable;

/// Database used when nothing else is configured.
pub const DEFAULT_DATABASE: &str = "web";

// =============================================================================
// Index lookup
// =============================================================================

/// Maps database names to index names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexLookup {
    indexes: BTreeMap<String, String>,
}

impl IndexLookup {
    pub fn new() -> Self {
        IndexLookup::default()
    }

    /// The usual two-database layout: `web` and `master`.
    pub fn web_master(web: impl Into<String>, master: impl Into<String>) -> Self {
        IndexLookup::new().with("web", web).with("master", master)
    }

    pub fn with(mut self, database: impl Into<String>, index: impl Into<String>) -> Self {
        self.insert(database, index);
        self
    }

    pub fn insert(&mut self, database: impl Into<String>, index: impl Into<String>) {
        self.indexes.insert(database.into(), index.into());
    }

    pub fn get(&self, database: &str) -> Option<&str> {
        self.indexes.get(database).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

impl<D, I> FromIterator<(D, I)> for IndexLookup
where
    D: Into<String>,
    I: Into<String>,
{
    fn from_iter<It: IntoIterator<Item = (D, I)>>(iter: It) -> Self {
        IndexLookup {
            indexes: iter
                .into_iter()
                .map(|(d, i)| (d.into(), i.into()))
                .collect(),
        }
    }
}

// =============================================================================
// Collaborator traits
// =============================================================================

/// Names the database searches should currently run against.
pub trait DatabaseProvider {
    fn database(&self) -> &str;
}

/// A fixed database name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticDatabase(String);

impl StaticDatabase {
    pub fn new(name: impl Into<String>) -> Self {
        StaticDatabase(name.into())
    }
}

impl Default for StaticDatabase {
    fn default() -> Self {
        StaticDatabase::new(DEFAULT_DATABASE)
    }
}

impl DatabaseProvider for StaticDatabase {
    fn database(&self) -> &str {
        &self.0
    }
}

/// Opens a search context on a named index.
pub trait IndexConnector<T> {
    type Context: SearchContext<T>;

    fn open(&self, index: &str) -> std::result::Result<Self::Context, IndexError>;
}

/// Hands out the search context a [`SearchManager`] runs against.
pub trait ContextProvider<T> {
    type Context: SearchContext<T>;

    fn context(&self) -> Result<&Self::Context>;
}

impl<T: Searchable + Clone> ContextProvider<T> for MemoryIndex<T> {
    type Context = MemoryIndex<T>;

    fn context(&self) -> Result<&MemoryIndex<T>> {
        Ok(self)
    }
}

/// Named in-memory indexes.
#[derive(Debug)]
pub struct MemoryCatalog<T> {
    indexes: HashMap<String, MemoryIndex<T>>,
}

impl<T> Default for MemoryCatalog<T> {
    fn default() -> Self {
        MemoryCatalog {
            indexes: HashMap::new(),
        }
    }
}

impl<T> MemoryCatalog<T> {
    pub fn new() -> Self {
        MemoryCatalog::default()
    }

    /// Registers `index` under its own name.
    pub fn with_index(mut self, index: MemoryIndex<T>) -> Self {
        self.indexes.insert(index.name().to_string(), index);
        self
    }
}

impl<T: Searchable + Clone> IndexConnector<T> for MemoryCatalog<T> {
    type Context = MemoryIndex<T>;

    fn open(&self, index: &str) -> std::result::Result<MemoryIndex<T>, IndexError> {
        self.indexes
            .get(index)
            .cloned()
            .ok_or_else(|| IndexError::for_index(index, "index not found"))
    }
}

// =============================================================================
// Index provider
// =============================================================================

/// Opens the index for the current database on first use.
///
/// The context is opened at most once and released when the provider is
/// dropped or [`close`](IndexProvider::close)d.
pub struct IndexProvider<T, C: IndexConnector<T>, D = StaticDatabase> {
    connector: C,
    database: D,
    lookup: IndexLookup,
    context: OnceCell<C::Context>,
    _record: PhantomData<fn() -> T>,
}

impl<T, C: IndexConnector<T>, D: DatabaseProvider> IndexProvider<T, C, D> {
    pub fn new(connector: C, database: D, lookup: IndexLookup) -> Self {
        IndexProvider {
            connector,
            database,
            lookup,
            context: OnceCell::new(),
            _record: PhantomData,
        }
    }

    /// Index configured for the current database.
    pub fn index_name(&self) -> Result<&str> {
        let database = self.database.database();
        self.lookup
            .get(database)
            .ok_or_else(|| SearchError::UnknownDatabase {
                database: database.to_string(),
            })
    }

    pub fn is_open(&self) -> bool {
        self.context.get().is_some()
    }

    /// Releases the context; the next search opens a new one.
    pub fn close(&mut self) {
        if self.context.take().is_some() {
            tracing::debug!(database = self.database.database(), "released search context");
        }
    }
}

impl<T, C: IndexConnector<T>> IndexProvider<T, C, StaticDatabase> {
    /// A provider for the database and indexes named in `settings`.
    pub fn from_settings(connector: C, settings: &SearchSettings) -> Self {
        IndexProvider::new(
            connector,
            StaticDatabase::new(settings.default_database.as_str()),
            settings.indexes.clone(),
        )
    }
}

impl<T, C: IndexConnector<T>, D: DatabaseProvider> ContextProvider<T> for IndexProvider<T, C, D> {
    type Context = C::Context;

    fn context(&self) -> Result<&C::Context> {
        self.context.get_or_try_init(|| {
            let index = self.index_name()?;
            let context = self.connector.open(index)?;
            tracing::debug!(index, database = self.database.database(), "opened search context");
            Ok(context)
        })
    }
}

impl<T, C: IndexConnector<T>, D> Drop for IndexProvider<T, C, D> {
    fn drop(&mut self) {
        if self.context.take().is_some() {
            tracing::debug!("released search context");
        }
    }
}

// =============================================================================
// Search manager
// =============================================================================

/// What a [`SearchManager`] does when the index fails.
///
/// Configuration errors, including a database missing from the index
/// lookup, are always returned; the policy only covers [`SearchError::Index`]
/// failures while opening or querying the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return the error.
    #[default]
    Propagate,
    /// Log the error and return empty results.
    EmptyResult,
}

/// Runs searches built with a [`SearcherBuilder`].
pub struct SearchManager<T, P> {
    provider: P,
    policy: FailurePolicy,
    display: i32,
    _record: PhantomData<fn() -> T>,
}

impl<T: Searchable + 'static, P: ContextProvider<T>> SearchManager<T, P> {
    pub fn new(provider: P) -> Self {
        SearchManager {
            provider,
            policy: FailurePolicy::default(),
            display: DEFAULT_DISPLAY,
            _record: PhantomData,
        }
    }

    /// A manager using the failure policy and page size from `settings`.
    pub fn with_settings(provider: P, settings: &SearchSettings) -> Self {
        SearchManager::new(provider)
            .with_policy(settings.on_failure)
            .with_display(settings.display)
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Page size for configurations this manager builds.
    pub fn with_display(mut self, display: i32) -> Self {
        self.display = display;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Builds a configuration without running it.
    pub fn build(&self, f: impl FnOnce(&mut SearcherBuilder<'_, T>)) -> SearchConfiguration<T> {
        let mut config = SearchConfiguration::with_display(self.display);
        f(&mut SearcherBuilder::new(&mut config));
        config
    }

    pub fn results_for(
        &self,
        f: impl FnOnce(&mut SearcherBuilder<'_, T>),
    ) -> Result<SearchResults<T>> {
        self.results(&self.build(f))
    }

    pub fn facets_for(&self, f: impl FnOnce(&mut SearcherBuilder<'_, T>)) -> Result<FacetResults> {
        self.facets(&self.build(f))
    }

    /// Runs the result and the facet pipeline of one configuration.
    pub fn results_with_facets_for(
        &self,
        f: impl FnOnce(&mut SearcherBuilder<'_, T>),
    ) -> Result<SearchResults<T>> {
        let config = self.build(f);
        let mut results = self.results(&config)?;
        if !config.facets.is_empty() {
            results.facets = Some(self.facets(&config)?);
        }
        Ok(results)
    }

    /// Runs the result pipeline of `config`.
    pub fn results(&self, config: &SearchConfiguration<T>) -> Result<SearchResults<T>> {
        config.validate()?;

        let outcome = self.provider.context().and_then(|context| {
            config
                .apply_results(context.queryable())
                .results()
                .map_err(SearchError::from)
        });
        let hits = self.recover(outcome, "results")?;

        tracing::debug!(total = hits.total, returned = hits.items.len(), "search results");
        Ok(SearchResults {
            items: config.select.project(hits.items),
            total: hits.total,
            facets: None,
        })
    }

    /// Runs the facet pipeline of `config`.
    pub fn facets(&self, config: &SearchConfiguration<T>) -> Result<FacetResults> {
        config.validate()?;
        if config.facets.is_empty() {
            return Ok(FacetResults::default());
        }

        let outcome = self.provider.context().and_then(|context| {
            config
                .apply_facets(context.queryable())
                .facets()
                .map_err(SearchError::from)
        });
        Ok(FacetResults::new(self.recover(outcome, "facets")?))
    }

    /// The configured queryable, for callers that want to refine it further.
    pub fn queryable(
        &self,
        f: impl FnOnce(&mut SearcherBuilder<'_, T>),
    ) -> Result<<P::Context as SearchContext<T>>::Queryable> {
        let config = self.build(f);
        config.validate()?;
        let context = self.provider.context()?;
        Ok(config.apply_results(context.queryable()))
    }

    fn recover<R: Default>(&self, outcome: Result<R>, operation: &'static str) -> Result<R> {
        match outcome {
            Ok(value) => Ok(value),
            Err(SearchError::Index(err)) if self.policy == FailurePolicy::EmptyResult => {
                tracing::error!(error = %err, operation, "search failed, returning empty");
                Ok(R::default())
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::value::Value;

    #[derive(Debug, Clone, PartialEq)]
    struct Doc {
        title: &'static str,
        lang: &'static str,
    }

    impl Searchable for Doc {
        fn field_value(&self, key: &str) -> Value<'_> {
            match key {
                "title" => Value::String(self.title),
                "lang" => Value::String(self.lang),
                _ => Value::None,
            }
        }

        fn search_fields() -> &'static [&'static str] {
            &["title", "lang"]
        }
    }

    fn docs() -> Vec<Doc> {
        vec![
            Doc { title: "alpha", lang: "en" },
            Doc { title: "beta", lang: "de" },
            Doc { title: "gamma", lang: "en" },
        ]
    }

    /// Connector that counts how often it is asked to open an index.
    struct CountingConnector {
        opened: Cell<usize>,
    }

    impl IndexConnector<Doc> for &CountingConnector {
        type Context = MemoryIndex<Doc>;

        fn open(&self, index: &str) -> std::result::Result<MemoryIndex<Doc>, IndexError> {
            self.opened.set(self.opened.get() + 1);
            Ok(MemoryIndex::new(index, docs()))
        }
    }

    fn catalog() -> MemoryCatalog<Doc> {
        MemoryCatalog::new()
            .with_index(MemoryIndex::new("docs_web", docs()))
            .with_index(MemoryIndex::failing("docs_master", "connection refused"))
    }

    fn lookup() -> IndexLookup {
        IndexLookup::web_master("docs_web", "docs_master")
    }

    #[test]
    fn lookup_helpers() {
        let lookup = lookup();
        assert_eq!(lookup.get("web"), Some("docs_web"));
        assert_eq!(lookup.get("master"), Some("docs_master"));
        assert_eq!(lookup.get("core"), None);

        let collected: IndexLookup = [("web", "a")].into_iter().collect();
        assert_eq!(collected.len(), 1);
    }

    #[test]
    fn provider_opens_context_once() {
        let connector = CountingConnector { opened: Cell::new(0) };
        let provider: IndexProvider<Doc, _> =
            IndexProvider::new(&connector, StaticDatabase::default(), lookup());
        assert!(!provider.is_open());

        let manager = SearchManager::new(provider);
        manager.results_for(|_| {}).unwrap();
        manager
            .facets_for(|s| {
                s.facet(|f| {
                    f.on("lang");
                });
            })
            .unwrap();

        assert!(manager.provider().is_open());
        assert_eq!(connector.opened.get(), 1);
    }

    #[test]
    fn close_releases_the_context() {
        let connector = CountingConnector { opened: Cell::new(0) };
        let mut provider: IndexProvider<Doc, _> =
            IndexProvider::new(&connector, StaticDatabase::default(), lookup());
        provider.context().unwrap();
        provider.close();
        assert!(!provider.is_open());
        provider.context().unwrap();
        assert_eq!(connector.opened.get(), 2);
    }

    #[test]
    fn unknown_database_is_an_error() {
        let provider = IndexProvider::new(catalog(), StaticDatabase::new("core"), lookup());
        let err = SearchManager::<Doc, _>::new(provider).results_for(|_| {}).unwrap_err();
        assert!(matches!(err, SearchError::UnknownDatabase { ref database } if database == "core"));
    }

    #[test]
    fn unknown_database_ignores_the_policy() {
        let provider = IndexProvider::new(catalog(), StaticDatabase::new("core"), lookup());
        let manager =
            SearchManager::<Doc, _>::new(provider).with_policy(FailurePolicy::EmptyResult);

        let err = manager.results_for(|_| {}).unwrap_err();
        assert!(matches!(err, SearchError::UnknownDatabase { ref database } if database == "core"));

        let err = manager
            .facets_for(|s| {
                s.facet(|f| {
                    f.on("lang");
                });
            })
            .unwrap_err();
        assert!(matches!(err, SearchError::UnknownDatabase { .. }));
    }

    #[test]
    fn index_failure_propagates_by_default() {
        let provider = IndexProvider::new(catalog(), StaticDatabase::new("master"), lookup());
        let err = SearchManager::<Doc, _>::new(provider).results_for(|_| {}).unwrap_err();
        assert!(matches!(err, SearchError::Index(ref e) if e.index.as_deref() == Some("docs_master")));
    }

    #[test]
    fn empty_result_policy_swallows_index_failures() {
        let provider = IndexProvider::new(catalog(), StaticDatabase::new("master"), lookup());
        let manager =
            SearchManager::<Doc, _>::new(provider).with_policy(FailurePolicy::EmptyResult);

        let results = manager.results_for(|_| {}).unwrap();
        assert!(results.is_empty());
        assert_eq!(results.total, 0);

        let facets = manager
            .facets_for(|s| {
                s.facet(|f| {
                    f.on("lang");
                });
            })
            .unwrap();
        assert!(facets.is_empty());
    }

    #[test]
    fn configuration_errors_ignore_the_policy() {
        let manager = SearchManager::new(MemoryIndex::new("docs", docs()))
            .with_policy(FailurePolicy::EmptyResult);
        let err = manager
            .results_for(|s| {
                s.sort(|s| {
                    s.by("Title");
                });
            })
            .unwrap_err();
        assert!(matches!(err, SearchError::NotAProperty { .. }));
    }

    #[test]
    fn results_with_facets() {
        let manager = SearchManager::new(MemoryIndex::new("docs", docs()));
        let results = manager
            .results_with_facets_for(|s| {
                s.filter(|f| {
                    f.and_eq("lang", "en");
                })
                .facet(|f| {
                    f.on_field("lang");
                });
            })
            .unwrap();

        assert_eq!(results.total, 2);
        let facets = results.facets.unwrap();
        assert_eq!(facets.total, 1);
        assert_eq!(
            facets.category("lang").and_then(|c| c.value("en")).map(|v| v.count),
            Some(2)
        );
    }

    #[test]
    fn facets_without_requests_are_empty() {
        let manager = SearchManager::new(MemoryIndex::new("docs", docs()));
        assert!(manager.facets_for(|_| {}).unwrap().is_empty());
        assert!(manager.results_with_facets_for(|_| {}).unwrap().facets.is_none());
    }

    #[test]
    fn manager_display_and_projection() {
        let manager = SearchManager::new(MemoryIndex::new("docs", docs())).with_display(2);
        let results = manager
            .results_for(|s| {
                s.sort(|s| {
                    s.by_desc("title");
                })
                .select(|mut d: Doc| {
                    d.lang = "xx";
                    d
                });
            })
            .unwrap();

        assert_eq!(results.total, 3);
        let titles: Vec<_> = results.iter().map(|d| d.title).collect();
        assert_eq!(titles, vec!["gamma", "beta"]);
        assert!(results.iter().all(|d| d.lang == "xx"));
    }

    #[test]
    fn queryable_can_be_refined() {
        let manager = SearchManager::new(MemoryIndex::new("docs", docs()));
        let hits = manager
            .queryable(|s| {
                s.filter(|f| {
                    f.and_eq("lang", "en");
                });
            })
            .unwrap()
            .skip(1)
            .results()
            .unwrap();

        assert_eq!(hits.total, 2);
        assert_eq!(hits.items, vec![Doc { title: "gamma", lang: "en" }]);
    }

    #[test]
    fn settings_configure_provider_and_manager() {
        let settings = SearchSettings {
            indexes: lookup(),
            default_database: "web".into(),
            on_failure: FailurePolicy::EmptyResult,
            display: 1,
        };
        let provider = IndexProvider::from_settings(catalog(), &settings);
        let manager = SearchManager::<Doc, _>::with_settings(provider, &settings);

        assert_eq!(manager.policy(), FailurePolicy::EmptyResult);
        assert_eq!(manager.results_for(|_| {}).unwrap().len(), 1);
    }
}
