//! Record access traits.
//!
//! [`Searchable`] is how the library reads index fields from a result record.
//! It is normally derived with `#[derive(Searchable)]` from
//! `fluent-search-macros`.

use crate::value::{Timestamp, Value};

/// A result record whose index fields can be read by key.
///
/// # Manual Implementation
///
/// ```
/// use fluent_search::{Searchable, Value};
///
/// struct Article {
///     name: String,
///     language: String,
/// }
///
/// impl Searchable for Article {
///     fn field_value(&self, key: &str) -> Value<'_> {
///         match key {
///             "_name" => Value::String(&self.name),
///             "_language" => Value::String(&self.language),
///             _ => Value::None,
///         }
///     }
///
///     fn search_fields() -> &'static [&'static str] {
///         &["_name", "_language"]
///     }
/// }
///
/// assert!(Article::is_search_field("_name"));
/// assert!(!Article::is_search_field("summary"));
/// ```
pub trait Searchable {
    /// Returns the value stored under an index field key, or [`Value::None`].
    fn field_value(&self, key: &str) -> Value<'_>;

    /// Index field keys that map to plain properties of the record.
    ///
    /// Sorting and faceting by key are only accepted for these.
    fn search_fields() -> &'static [&'static str]
    where
        Self: Sized;

    /// Name used in error messages.
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }

    fn is_search_field(key: &str) -> bool
    where
        Self: Sized,
    {
        Self::search_fields().contains(&key)
    }
}

/// Maps an enum to a stable discriminant for `#[search(Enum)]` fields.
///
/// ```
/// use fluent_search::SearchEnum;
///
/// enum Template {
///     Event,
///     Article,
/// }
///
/// impl SearchEnum for Template {
///     fn discriminant(&self) -> u32 {
///         match self {
///             Template::Event => 1,
///             Template::Article => 2,
///         }
///     }
/// }
/// ```
pub trait SearchEnum {
    fn discriminant(&self) -> u32;
}

/// Converts a field to a [`Timestamp`] for `#[search(Timestamp)]` fields.
pub trait SearchTimestamp {
    fn timestamp(&self) -> Timestamp;
}

impl SearchTimestamp for i64 {
    fn timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl SearchTimestamp for u64 {
    fn timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self as i64)
    }
}

impl SearchTimestamp for Timestamp {
    fn timestamp(&self) -> Timestamp {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    struct Page {
        name: String,
        views: u32,
    }

    impl Searchable for Page {
        fn field_value(&self, key: &str) -> Value<'_> {
            match key {
                "_name" => Value::String(&self.name),
                "views" => Value::Number(Number::from(self.views)),
                _ => Value::None,
            }
        }

        fn search_fields() -> &'static [&'static str] {
            &["_name", "views"]
        }

        fn type_name() -> &'static str {
            "Page"
        }
    }

    #[test]
    fn manual_impl_reads_fields() {
        let page = Page {
            name: "Home".to_string(),
            views: 12,
        };

        assert_eq!(page.field_value("_name"), Value::String("Home"));
        assert_eq!(page.field_value("views"), Value::Number(Number::U64(12)));
        assert_eq!(page.field_value("missing"), Value::None);
    }

    #[test]
    fn search_field_lookup() {
        assert!(Page::is_search_field("views"));
        assert!(!Page::is_search_field("Views"));
        assert_eq!(Page::type_name(), "Page");
    }

    #[test]
    fn timestamp_conversions() {
        assert_eq!(1500i64.timestamp(), Timestamp(1500));
        assert_eq!(1500u64.timestamp(), Timestamp(1500));
    }
}
