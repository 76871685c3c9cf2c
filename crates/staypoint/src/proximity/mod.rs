//! Radius filtering and distance ranking of the property catalog.

use geo::{GeodesicDistance, Point};
use rayon::prelude::*;
use serde::Serialize;
use staypoint_catalog::Catalog;
use tracing::{debug, instrument};

/// A catalog property within the search radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyProperty {
    pub property_name: String,
    /// Geodesic distance from the search centre, rounded to 2 decimals.
    pub distance_km: f64,
}

/// Geodesic distance on the WGS84 ellipsoid between two `(latitude, longitude)`
/// pairs, in kilometres.
pub fn geodesic_distance_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let from = Point::new(from.1, from.0);
    let to = Point::new(to.1, to.0);
    from.geodesic_distance(&to) / 1000.0
}

/// Round to 2 decimals on the exact decimal expansion of `value`, ties to even.
///
/// Scaling by 100 first can move a value across a rounding tie (`0.125`
/// becomes `12.5` and rounds away from zero); formatting does not.
pub(crate) fn round_2dp(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Every property whose distance from `center` is at most `radius_km`,
/// nearest first.
///
/// The radius check uses the exact distance; the reported distance is rounded
/// and ordering follows the rounded value. Equal distances keep catalog order.
#[instrument(name = "Find properties within radius", level = "debug", skip(catalog), fields(properties = catalog.len()))]
pub fn find_within(center: (f64, f64), catalog: &Catalog, radius_km: f64) -> Vec<NearbyProperty> {
    let mut nearby = catalog
        .properties()
        .par_iter()
        .filter_map(|property| {
            let distance_km = geodesic_distance_km(center, property.coordinates());
            (distance_km <= radius_km).then(|| NearbyProperty {
                property_name: property.name.clone(),
                distance_km: round_2dp(distance_km),
            })
        })
        .collect::<Vec<_>>();

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    debug!(found = nearby.len(), "Radius search complete");
    nearby
}
