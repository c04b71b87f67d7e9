//! Runtime field values read from result records.
//!
//! A [`Value`] is what a [`Searchable`](crate::Searchable) record hands back
//! for an index field key. Clauses compare against it, sorting orders by it and
//! facets group by its display form.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Field value borrowed from a result record.
///
/// # Example
///
/// ```
/// use fluent_search::{Number, Value};
///
/// struct Article {
///     name: String,
///     views: u32,
/// }
///
/// fn field<'a>(article: &'a Article, key: &str) -> Value<'a> {
///     match key {
///         "_name" => Value::String(&article.name),
///         "views" => Value::Number(Number::from(article.views)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    String(&'a str),
    Number(Number),
    Timestamp(Timestamp),
    /// Discriminant reported by [`SearchEnum`](crate::SearchEnum).
    Enum(u32),
    Bool(bool),
    Coordinate(Coordinate),
    /// The record has no value for the key.
    None,
}

impl<'a> Value<'a> {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_coordinate(&self) -> Option<Coordinate> {
        match self {
            Value::Coordinate(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the name of the variant, used in error messages and logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Timestamp(_) => "timestamp",
            Value::Enum(_) => "enum",
            Value::Bool(_) => "bool",
            Value::Coordinate(_) => "coordinate",
            Value::None => "none",
        }
    }
}

/// The facet form of a value: the string a search engine would bucket on.
///
/// `None` renders as an empty string and is never counted as a facet value.
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(Number::I64(n)) => write!(f, "{}", n),
            Value::Number(Number::U64(n)) => write!(f, "{}", n),
            Value::Number(Number::F64(n)) => write!(f, "{}", n),
            Value::Timestamp(t) => write!(f, "{}", t.as_millis()),
            Value::Enum(d) => write!(f, "{}", d),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Coordinate(c) => write!(f, "{},{}", c.latitude, c.longitude),
            Value::None => Ok(()),
        }
    }
}

/// An indexed number. Mixed-variant comparisons go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl Number {
    pub fn is_nan(self) -> bool {
        matches!(self, Number::F64(n) if n.is_nan())
    }

    /// Total order used for sorting.
    ///
    /// Exact across variants, so `I64(1)`, `U64(1)` and `F64(1.0)` are equal
    /// and large integers keep their order. `-0.0` equals `0.0`. NaN is
    /// greater than every number and equal to itself.
    pub fn total_cmp(self, other: Number) -> Ordering {
        match (self.integer(), other.integer()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (None, Some(b)) => cmp_float_integer(self.to_f64(), b),
            (Some(a), None) => cmp_float_integer(other.to_f64(), a).reverse(),
            (None, None) => {
                let (a, b) = (self.to_f64(), other.to_f64());
                match (a.is_nan(), b.is_nan()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) if a < b => Ordering::Less,
                    (false, false) if a > b => Ordering::Greater,
                    (false, false) => Ordering::Equal,
                }
            }
        }
    }

    fn integer(self) -> Option<i128> {
        match self {
            Number::I64(n) => Some(n as i128),
            Number::U64(n) => Some(n as i128),
            Number::F64(_) => None,
        }
    }
}

fn cmp_float_integer(float: f64, integer: i128) -> Ordering {
    if float.is_nan() {
        return Ordering::Greater;
    }
    // Saturating cast: infinities land outside the i64/u64 range.
    let whole = float.trunc();
    match (whole as i128).cmp(&integer) {
        Ordering::Equal if float > whole => Ordering::Greater,
        Ordering::Equal if float < whole => Ordering::Less,
        ordering => ordering,
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs * 1000)
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

/// Mean Earth radius in kilometres, as used by Solr's `geodist`.
const EARTH_RADIUS_KM: f64 = 6371.0087714;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometres (haversine).
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }

    /// Returns `true` if `other` lies inside the latitude/longitude box that
    /// encloses the circle of `radius_km` around this point.
    ///
    /// This is the cheaper `bbox` approximation: it accepts some points in the
    /// corners of the box that are further than `radius_km` away.
    pub fn box_contains(&self, other: &Coordinate, radius_km: f64) -> bool {
        let d_lat = (radius_km / EARTH_RADIUS_KM).to_degrees();
        let cos_lat = self.latitude.to_radians().cos().abs().max(f64::EPSILON);
        let d_lon = (radius_km / (EARTH_RADIUS_KM * cos_lat)).to_degrees();

        (other.latitude - self.latitude).abs() <= d_lat
            && (other.longitude - self.longitude).abs() <= d_lon
    }
}
