//! Geographic radius restriction.

use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::error::SearchError;
use crate::queryable::Queryable;
use crate::sorting::Dir;
use crate::traits::Searchable;
use crate::value::Coordinate;

/// Keep records whose coordinate field lies within `distance_km` of a point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RadiusOptions {
    /// Coordinate field key; `None` until [`RadiusBuilder::within`] is called.
    pub field: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: f64,
    /// Sorts by distance when set, ahead of every other sort key.
    pub order_by_distance: Option<Dir>,
    /// Uses the bounding box of the circle instead of the exact distance.
    pub use_box: bool,
}

impl RadiusOptions {
    pub fn is_set(&self) -> bool {
        self.field.is_some()
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Distance from the center to the record's coordinate, if it has one.
    pub fn distance_to<T: Searchable>(&self, item: &T) -> Option<f64> {
        let field = self.field.as_deref()?;
        let point = item.field_value(field).as_coordinate()?;
        Some(self.center().distance_km(&point))
    }

    /// Returns `true` if the record is inside the radius. Records without a
    /// coordinate never are.
    pub fn contains<T: Searchable>(&self, item: &T) -> bool {
        let Some(field) = self.field.as_deref() else {
            return true;
        };
        let Some(point) = item.field_value(field).as_coordinate() else {
            return false;
        };

        if self.use_box {
            self.center().box_contains(&point, self.distance_km)
        } else {
            self.center().distance_km(&point) <= self.distance_km
        }
    }

    /// Compares two records by distance in the configured direction.
    ///
    /// Records without a coordinate, or whose distance is NaN, sort last.
    pub fn compare_distance<T: Searchable>(&self, a: &T, b: &T) -> Ordering {
        let dir = self.order_by_distance.unwrap_or_default();
        let distance = |item: &T| self.distance_to(item).filter(|d| !d.is_nan());
        match (distance(a), distance(b)) {
            (Some(x), Some(y)) => dir.apply(x.total_cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    pub fn apply<T, Q: Queryable<T>>(&self, queryable: Q) -> Q {
        if self.is_set() {
            queryable.within(self)
        } else {
            queryable
        }
    }
}

/// Builder over [`RadiusOptions`].
pub struct RadiusBuilder<'a, T> {
    options: &'a mut RadiusOptions,
    errors: &'a mut Vec<SearchError>,
    _record: PhantomData<fn(&T)>,
}

impl<'a, T: Searchable> RadiusBuilder<'a, T> {
    pub fn new(options: &'a mut RadiusOptions, errors: &'a mut Vec<SearchError>) -> Self {
        RadiusBuilder {
            options,
            errors,
            _record: PhantomData,
        }
    }

    /// Restricts results to `distance_km` around `(latitude, longitude)`
    /// measured on the coordinate field `field`.
    pub fn within(&mut self, field: &str, latitude: f64, longitude: f64, distance_km: f64) -> &mut Self {
        if !T::is_search_field(field) {
            tracing::warn!(field, record = T::type_name(), "rejected radius field");
            self.errors.push(SearchError::NotAProperty {
                type_name: T::type_name(),
                field: field.to_string(),
            });
            return self;
        }

        self.options.field = Some(field.to_string());
        self.options.latitude = latitude;
        self.options.longitude = longitude;
        self.options.distance_km = distance_km;
        self
    }

    pub fn order_by_distance(&mut self, dir: Dir) -> &mut Self {
        self.options.order_by_distance = Some(dir);
        self
    }

    pub fn use_box(&mut self, use_box: bool) -> &mut Self {
        self.options.use_box = use_box;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct Venue {
        location: Option<Coordinate>,
    }

    impl Searchable for Venue {
        fn field_value(&self, key: &str) -> Value<'_> {
            match (key, self.location) {
                ("location", Some(c)) => Value::Coordinate(c),
                _ => Value::None,
            }
        }

        fn search_fields() -> &'static [&'static str] {
            &["location"]
        }
    }

    fn venue(lat: f64, lon: f64) -> Venue {
        Venue {
            location: Some(Coordinate::new(lat, lon)),
        }
    }

    fn configure(f: impl FnOnce(&mut RadiusBuilder<'_, Venue>)) -> (RadiusOptions, Vec<SearchError>) {
        let mut options = RadiusOptions::default();
        let mut errors = Vec::new();
        f(&mut RadiusBuilder::new(&mut options, &mut errors));
        (options, errors)
    }

    #[test]
    fn within_records_the_circle() {
        let (options, errors) = configure(|r| {
            r.within("location", 90.0, 180.0, 25.0);
        });

        assert!(errors.is_empty());
        assert_eq!(options.field.as_deref(), Some("location"));
        assert_eq!(options.latitude, 90.0);
        assert_eq!(options.longitude, 180.0);
        assert_eq!(options.distance_km, 25.0);
    }

    #[test]
    fn within_rejects_unknown_fields() {
        let (options, errors) = configure(|r| {
            r.within("geo", 0.0, 0.0, 1.0);
        });
        assert!(!options.is_set());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn contains_uses_distance_or_box() {
        let (mut options, _) = configure(|r| {
            r.within("location", 0.0, 0.0, 100.0);
        });

        assert!(options.contains(&venue(0.5, 0.5)));
        assert!(!options.contains(&venue(0.85, 0.85)));
        assert!(!options.contains(&Venue { location: None }));

        options.use_box = true;
        assert!(options.contains(&venue(0.85, 0.85)));
        assert!(!options.contains(&Venue { location: None }));
    }

    #[test]
    fn unset_radius_matches_everything() {
        assert!(RadiusOptions::default().contains(&Venue { location: None }));
    }

    #[test]
    fn distance_ordering() {
        let (options, _) = configure(|r| {
            r.within("location", 0.0, 0.0, 500.0).order_by_distance(Dir::Desc);
        });

        let near = venue(0.1, 0.0);
        let far = venue(1.0, 0.0);
        assert_eq!(options.compare_distance(&near, &far), Ordering::Greater);
        assert_eq!(
            options.compare_distance(&Venue { location: None }, &near),
            Ordering::Greater
        );
    }

    #[test]
    fn nan_distances_sort_last() {
        let broken = venue(f64::NAN, 0.0);
        let near = venue(0.1, 0.0);
        let far = venue(1.0, 0.0);

        for dir in [Dir::Asc, Dir::Desc] {
            let (options, _) = configure(|r| {
                r.within("location", 0.0, 0.0, 500.0).order_by_distance(dir);
            });
            assert_eq!(options.compare_distance(&broken, &near), Ordering::Greater);
            assert_eq!(options.compare_distance(&far, &broken), Ordering::Less);
            assert_eq!(
                options.compare_distance(&broken, &Venue { location: None }),
                Ordering::Equal
            );

            let mut venues = vec![broken.location, near.location, far.location];
            venues.sort_by(|a, b| {
                options.compare_distance(&Venue { location: *a }, &Venue { location: *b })
            });
            assert!(venues[2].is_some_and(|c| c.latitude.is_nan()));
        }
    }
}
