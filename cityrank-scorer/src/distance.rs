//! Great-circle distance and the proximity contribution derived from it.

use std::f64::consts::PI;

use geo::Point;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two longitude/latitude points.
///
/// Uses the haversine formula with [`EARTH_RADIUS_KM`]. Identical points give
/// exactly `0.0`; antipodal points give `π·R` without producing NaN.
///
/// # Examples
/// ```
/// use geo::Point;
/// use cityrank_scorer::haversine_km;
///
/// let paris = Point::new(2.3522, 48.8566);
/// let london = Point::new(-0.1276, 51.5072);
/// let d = haversine_km(paris, london);
/// assert!((d - 344.0).abs() < 2.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "haversine distance is floating-point trigonometry"
)]
pub fn haversine_km(from: Point<f64>, to: Point<f64>) -> f64 {
    let lat1 = from.y() * PI / 180.0;
    let lat2 = to.y() * PI / 180.0;
    let dlat = (to.y() - from.y()) * PI / 180.0;
    let dlon = (to.x() - from.x()) * PI / 180.0;

    let raw = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let a = raw.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Map a distance onto `0.0..=1.0`, where `1.0` is the origin itself.
///
/// Distances at or beyond `max_km` score exactly `0.0`, as does any
/// non-finite distance.
///
/// # Examples
/// ```
/// use cityrank_scorer::proximity;
///
/// assert_eq!(proximity(0.0, 2000), 1.0);
/// assert_eq!(proximity(1000.0, 2000), 0.5);
/// assert_eq!(proximity(5000.0, 2000), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "proximity is a linear fall-off over the cut-off distance"
)]
pub fn proximity(distance_km: f64, max_km: u32) -> f64 {
    let max = f64::from(max_km);
    if !distance_km.is_finite() || distance_km >= max {
        return 0.0;
    }
    1.0 - distance_km.max(0.0) / max
}
