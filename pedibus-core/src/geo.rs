//! Geographic helpers shared by the loaders, the planner and the
//! itinerary writer.
//!
//! Distances are great-circle miles over a spherical earth. Bearings are
//! measured clockwise from true north in decimal degrees.

use geo::Point;

/// Earth radius used for great-circle distances, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.88;

/// The 16-wind compass rose, clockwise from north.
const COMPASS_WINDS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Haversine distance between two locations in miles.
///
/// Points store longitude in `x` and latitude in `y`. Coincident points
/// yield exactly `0.0`.
pub fn haversine_miles(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat_a = a.y().to_radians();
    let lat_b = b.y().to_radians();
    let delta_lat = (b.y() - a.y()).to_radians();
    let delta_lon = (b.x() - a.x()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

/// Initial bearing from `a` to `b` in degrees, in `[0, 360)`.
///
/// Returns `0.0` when the points coincide, where the bearing is undefined.
pub fn initial_bearing(a: Point<f64>, b: Point<f64>) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat_a = a.y().to_radians();
    let lat_b = b.y().to_radians();
    let delta_lon = (b.x() - a.x()).to_radians();

    let y = delta_lon.sin() * lat_b.cos();
    let x = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * delta_lon.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Quantise a bearing to one of the 16 compass winds.
///
/// Bins are 22.5 degrees wide and centred on the cardinal multiples, so N
/// covers `[348.75, 11.25)`.
pub fn compass_direction(bearing: f64) -> &'static str {
    let normalised = (bearing % 360.0 + 360.0) % 360.0;
    let bin = ((normalised + 11.25) / 22.5) as usize % 16;
    COMPASS_WINDS[bin]
}

/// Format a location as degrees/minutes/seconds with hemisphere suffixes,
/// e.g. `38d 32' 24" N, 121d 44' 12" W`.
pub fn format_location(location: Point<f64>) -> String {
    let lat = location.y();
    let lon = location.x();
    let ns = if lat >= 0.0 { "N" } else { "S" };
    let ew = if lon >= 0.0 { "E" } else { "W" };
    let (lat_deg, lat_min, lat_sec) = to_dms(lat.abs());
    let (lon_deg, lon_min, lon_sec) = to_dms(lon.abs());
    format!("{lat_deg}d {lat_min}' {lat_sec}\" {ns}, {lon_deg}d {lon_min}' {lon_sec}\" {ew}")
}

/// Split decimal degrees into (degrees, minutes, seconds). Seconds are
/// rounded half-up and carry into minutes and degrees.
fn to_dms(degrees: f64) -> (u64, u64, u64) {
    let mut deg = degrees.floor() as u64;
    let minutes_full = (degrees - degrees.floor()) * 60.0;
    let mut min = minutes_full.floor() as u64;
    let mut sec = ((minutes_full - minutes_full.floor()) * 60.0).round() as u64;
    if sec == 60 {
        min += 1;
        sec = 0;
    }
    if min == 60 {
        deg += 1;
        min = 0;
    }
    (deg, min, sec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_points_have_zero_distance() {
        let p = Point::new(-121.74, 38.54);
        assert_eq!(haversine_miles(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_longitude_at_the_equator() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let expected = EARTH_RADIUS_MILES * std::f64::consts::PI / 180.0;
        assert!((haversine_miles(a, b) - expected).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(-121.74, 38.54);
        let b = Point::new(-121.49, 38.58);
        assert_eq!(haversine_miles(a, b), haversine_miles(b, a));
    }

    #[test]
    fn cardinal_bearings() {
        let origin = Point::new(0.0, 0.0);
        assert!((initial_bearing(origin, Point::new(0.0, 1.0)) - 0.0).abs() < 1e-9);
        assert!((initial_bearing(origin, Point::new(1.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((initial_bearing(origin, Point::new(0.0, -1.0)) - 180.0).abs() < 1e-9);
        assert!((initial_bearing(origin, Point::new(-1.0, 0.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_points_have_zero_bearing() {
        let p = Point::new(13.4, 52.5);
        assert_eq!(initial_bearing(p, p), 0.0);
    }

    #[test]
    fn compass_bins_wrap_around_north() {
        assert_eq!(compass_direction(0.0), "N");
        assert_eq!(compass_direction(348.75), "N");
        assert_eq!(compass_direction(11.24), "N");
        assert_eq!(compass_direction(11.25), "NNE");
        assert_eq!(compass_direction(348.74), "NNW");
        assert_eq!(compass_direction(90.0), "E");
        assert_eq!(compass_direction(180.0), "S");
        assert_eq!(compass_direction(270.0), "W");
        assert_eq!(compass_direction(360.0), "N");
    }

    #[test]
    fn formats_degrees_minutes_seconds() {
        let davis = Point::new(-121.7367, 38.54);
        assert_eq!(
            format_location(davis),
            "38d 32' 24\" N, 121d 44' 12\" W"
        );
    }

    #[test]
    fn seconds_carry_into_minutes_and_degrees() {
        let near = Point::new(0.0, 37.999_999);
        assert_eq!(format_location(near), "38d 0' 0\" N, 0d 0' 0\" E");
    }

    #[test]
    fn southern_and_western_hemispheres() {
        let p = Point::new(-58.3816, -34.6037);
        let formatted = format_location(p);
        assert!(formatted.ends_with("W"));
        assert!(formatted.contains("\" S,"));
    }
}
