//! Facets: per-field value counts over the matching records.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::error::{Result, SearchError};
use crate::traits::Searchable;

/// Request to count the values of one index field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetOn {
    key: String,
    minimum_count: Option<u32>,
    filters: Vec<String>,
}

impl FacetOn {
    /// Fails with [`SearchError::EmptyArgument`] for an empty key.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(SearchError::EmptyArgument { name: "key" });
        }
        Ok(FacetOn {
            key,
            minimum_count: None,
            filters: Vec::new(),
        })
    }

    /// Drops values counted fewer than `count` times.
    pub fn with_minimum_count(mut self, count: u32) -> Self {
        self.minimum_count = Some(count);
        self
    }

    /// Restricts the category to the listed values.
    pub fn with_filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters = filters.into_iter().map(Into::into).collect();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn minimum_count(&self) -> Option<u32> {
        self.minimum_count
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    /// Counts this facet over `items`.
    ///
    /// Values are ordered by descending count, then by name. Missing values
    /// are not counted.
    pub fn aggregate<'a, T, I>(&self, items: I) -> FacetCategory
    where
        T: Searchable + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for item in items {
            let value = item.field_value(&self.key);
            if value.is_none() {
                continue;
            }
            *counts.entry(value.to_string()).or_default() += 1;
        }

        let minimum = self.minimum_count.unwrap_or(0) as usize;
        let mut values: Vec<FacetValue> = counts
            .into_iter()
            .filter(|(name, count)| {
                *count >= minimum && (self.filters.is_empty() || self.filters.contains(name))
            })
            .map(|(name, count)| FacetValue { name, count })
            .collect();
        values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

        FacetCategory {
            name: self.key.clone(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetValue {
    pub name: String,
    pub count: usize,
}

/// Counted values of one facet key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCategory {
    pub name: String,
    pub values: Vec<FacetValue>,
}

impl FacetCategory {
    pub fn value(&self, name: &str) -> Option<&FacetValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

/// Facet categories returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetResults {
    /// Number of categories.
    pub total: usize,
    pub categories: Vec<FacetCategory>,
}

impl FacetResults {
    pub fn new(categories: Vec<FacetCategory>) -> Self {
        FacetResults {
            total: categories.len(),
            categories,
        }
    }

    pub fn category(&self, name: &str) -> Option<&FacetCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Requested facets, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetOptions {
    facets: Vec<FacetOn>,
}

impl FacetOptions {
    pub fn push(&mut self, facet: FacetOn) {
        self.facets.push(facet);
    }

    pub fn facets(&self) -> &[FacetOn] {
        &self.facets
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

/// Builder over [`FacetOptions`].
pub struct FacetBuilder<'a, T> {
    options: &'a mut FacetOptions,
    errors: &'a mut Vec<SearchError>,
    _record: PhantomData<fn(&T)>,
}

impl<'a, T: Searchable> FacetBuilder<'a, T> {
    pub fn new(options: &'a mut FacetOptions, errors: &'a mut Vec<SearchError>) -> Self {
        FacetBuilder {
            options,
            errors,
            _record: PhantomData,
        }
    }

    /// Facets on a raw index key. An empty key is ignored.
    pub fn on(&mut self, key: &str) -> &mut Self {
        match FacetOn::new(key) {
            Ok(facet) => self.on_facet(facet),
            Err(_) => {
                tracing::warn!("ignoring facet with an empty key");
                self
            }
        }
    }

    pub fn on_facet(&mut self, facet: FacetOn) -> &mut Self {
        self.options.push(facet);
        self
    }

    /// Facets on a record field; the key must be in `T::search_fields()`.
    pub fn on_field(&mut self, key: &str) -> &mut Self {
        if T::is_search_field(key) {
            self.on(key)
        } else {
            tracing::warn!(key, record = T::type_name(), "rejected facet key");
            self.errors.push(SearchError::NotAProperty {
                type_name: T::type_name(),
                field: key.to_string(),
            });
            self
        }
    }

    pub fn on_fields<'k>(&mut self, keys: impl IntoIterator<Item = &'k str>) -> &mut Self {
        for key in keys {
            self.on_field(key);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct Page {
        language: &'static str,
        template: Option<&'static str>,
    }

    impl Searchable for Page {
        fn field_value(&self, key: &str) -> Value<'_> {
            match (key, self.template) {
                ("_language", _) => Value::String(self.language),
                ("_templatename", Some(t)) => Value::String(t),
                _ => Value::None,
            }
        }

        fn search_fields() -> &'static [&'static str] {
            &["_language", "_templatename"]
        }

        fn type_name() -> &'static str {
            "Page"
        }
    }

    fn pages() -> Vec<Page> {
        vec![
            Page { language: "en-US", template: Some("Event") },
            Page { language: "es-ES", template: Some("Event") },
            Page { language: "en-US", template: Some("Article") },
            Page { language: "en-US", template: None },
        ]
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(
            FacetOn::new(""),
            Err(SearchError::EmptyArgument { name: "key" })
        ));
    }

    #[test]
    fn aggregate_counts_and_orders_values() {
        let category = FacetOn::new("_language").unwrap().aggregate(&pages());

        assert_eq!(category.name, "_language");
        assert_eq!(
            category.values,
            vec![
                FacetValue { name: "en-US".into(), count: 3 },
                FacetValue { name: "es-ES".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn aggregate_skips_missing_values() {
        let category = FacetOn::new("_templatename").unwrap().aggregate(&pages());
        let total: usize = category.values.iter().map(|v| v.count).sum();
        assert_eq!(total, 3);
        assert_eq!(category.values[0].name, "Event");
        assert_eq!(category.value("Article").map(|v| v.count), Some(1));
    }

    #[test]
    fn minimum_count_and_filters() {
        let min = FacetOn::new("_language")
            .unwrap()
            .with_minimum_count(2)
            .aggregate(&pages());
        assert_eq!(min.values.len(), 1);

        let filtered = FacetOn::new("_language")
            .unwrap()
            .with_filters(["es-ES"])
            .aggregate(&pages());
        assert_eq!(filtered.values, vec![FacetValue { name: "es-ES".into(), count: 1 }]);
    }

    #[test]
    fn builder_ignores_empty_keys() {
        let mut options = FacetOptions::default();
        let mut errors = Vec::new();
        FacetBuilder::<Page>::new(&mut options, &mut errors)
            .on("")
            .on("_language");

        assert_eq!(options.facets().len(), 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn builder_validates_field_keys() {
        let mut options = FacetOptions::default();
        let mut errors = Vec::new();
        FacetBuilder::<Page>::new(&mut options, &mut errors)
            .on_fields(["_templatename", "_language", "Language"]);

        let keys: Vec<_> = options.facets().iter().map(|f| f.key()).collect();
        assert_eq!(keys, vec!["_templatename", "_language"]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn results_total_counts_categories() {
        let results = FacetResults::new(vec![
            FacetOn::new("_language").unwrap().aggregate(&pages()),
            FacetOn::new("_templatename").unwrap().aggregate(&pages()),
        ]);
        assert_eq!(results.total, 2);
        assert!(results.category("_templatename").is_some());
        assert!(FacetResults::default().is_empty());
    }
}
