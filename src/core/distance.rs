use crate::models::Coordinates;

/// Earth's radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Calculate the Haversine distance between two points in miles
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in miles
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Great-circle distance in miles between two coordinate pairs
///
/// Inputs are not validated; coordinates coming from the reference data
/// were range-checked when the tables were loaded.
#[inline]
pub fn distance(origin: Coordinates, destination: Coordinates) -> f64 {
    haversine_distance(
        origin.latitude,
        origin.longitude,
        destination.latitude,
        destination.longitude,
    )
}
