//! Result ordering.
//!
//! Callers list sort keys primary first. Host indexes apply ordering calls the
//! other way around (the last call applied wins), so [`SortingOptions::apply`]
//! replays the list in reverse: the observable order is always the one the
//! caller wrote.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::queryable::Queryable;
use crate::traits::Searchable;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub dir: Dir,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Compares two values in this key's direction.
    ///
    /// Missing values, NaN and coordinates sort last in both directions.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        match (sort_rank(a), sort_rank(b)) {
            (Some(_), Some(_)) => self.dir.apply(compare_values(a, b)),
            _ => compare_values(a, b),
        }
    }

    /// Compares two records by this key.
    pub fn compare_items<T: Searchable>(&self, a: &T, b: &T) -> Ordering {
        self.compare(&a.field_value(&self.field), &b.field_value(&self.field))
    }
}

/// Position of a value's type in the cross-type order, `None` for values
/// that sort with the missing ones.
fn sort_rank(value: &Value<'_>) -> Option<u8> {
    match value {
        Value::Bool(_) => Some(0),
        Value::Number(n) if n.is_nan() => None,
        Value::Number(_) => Some(1),
        Value::Timestamp(_) => Some(2),
        Value::Enum(_) => Some(3),
        Value::String(_) => Some(4),
        Value::Coordinate(_) | Value::None => None,
    }
}

/// Ascending total order over values.
///
/// Values of one type compare naturally, numbers exactly across variants.
/// Different types rank bool, number, timestamp, enum, string. Missing
/// values, NaN and coordinates come after everything else and are equal to
/// each other.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (sort_rank(a), sort_rank(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) if x != y => x.cmp(&y),
        _ => match (a, b) {
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => a.total_cmp(*b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::Enum(a), Value::Enum(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            _ => Ordering::Equal,
        },
    }
}

/// Sort keys in the order the caller declared them, primary first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortingOptions {
    orderings: Vec<OrderBy>,
}

impl SortingOptions {
    pub fn new() -> Self {
        SortingOptions::default()
    }

    pub fn push(&mut self, order_by: OrderBy) {
        self.orderings.push(order_by);
    }

    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    pub fn is_empty(&self) -> bool {
        self.orderings.is_empty()
    }

    /// Issues the ordering calls against a queryable.
    ///
    /// The last declared key goes to `order_by`, the rest to `then_by`
    /// walking backwards, so that on a host where the last applied call is
    /// the most significant the first declared key ends up primary.
    pub fn apply<T, Q: Queryable<T>>(&self, queryable: Q) -> Q {
        let mut reversed = self.orderings.iter().rev();
        match reversed.next() {
            None => queryable,
            Some(last) => reversed.fold(queryable.order_by(&last.field, last.dir), |q, o| {
                q.then_by(&o.field, o.dir)
            }),
        }
    }
}

/// Builder over [`SortingOptions`].
///
/// Keys must be in `T::search_fields()`. An unknown key is not added; the
/// error is kept on the configuration and returned when the search runs.
pub struct SortingBuilder<'a, T> {
    options: &'a mut SortingOptions,
    errors: &'a mut Vec<SearchError>,
    _record: PhantomData<fn(&T)>,
}

impl<'a, T: Searchable> SortingBuilder<'a, T> {
    pub fn new(options: &'a mut SortingOptions, errors: &'a mut Vec<SearchError>) -> Self {
        SortingBuilder {
            options,
            errors,
            _record: PhantomData,
        }
    }

    /// Ascending by `key`.
    pub fn by(&mut self, key: &str) -> &mut Self {
        self.by_dir(key, Dir::Asc)
    }

    /// Descending by `key`.
    pub fn by_desc(&mut self, key: &str) -> &mut Self {
        self.by_dir(key, Dir::Desc)
    }

    pub fn by_dir(&mut self, key: &str, dir: Dir) -> &mut Self {
        if T::is_search_field(key) {
            self.options.push(OrderBy::new(key, dir));
        } else {
            tracing::warn!(key, record = T::type_name(), "rejected sort key");
            self.errors.push(SearchError::NotAProperty {
                type_name: T::type_name(),
                field: key.to_string(),
            });
        }
        self
    }
}
