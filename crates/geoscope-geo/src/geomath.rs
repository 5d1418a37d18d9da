//! Geographic aggregation of coordinates.
//!
//! [`center_of_minimum_distance`] computes the point minimizing the summed
//! great-circle distance to a set of coordinates (the geometric median). It is
//! used to pick a representative coordinate per grid cell during training.

use geo::{Destination, Distance, Haversine, Point};
use geoscope_core::models::Coordinate;

/// Mean earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Upper bound on refinement steps of the median search
const MAX_ITERATIONS: usize = 5000;

fn to_point(coordinate: &Coordinate) -> Point<f64> {
    Point::new(coordinate.lng(), coordinate.lat())
}

fn from_point(point: Point<f64>) -> Coordinate {
    Coordinate::clamped(point.y(), normalize_longitude(point.x()))
}

/// Wrap a longitude into [-180, 180]
pub fn normalize_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        return lng;
    }
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lng > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Great-circle distance in meters
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    Haversine.distance(to_point(a), to_point(b))
}

fn total_distance(point: &Coordinate, coordinates: &[Coordinate]) -> f64 {
    coordinates.iter().map(|c| distance(point, c)).sum()
}

/// Geographic midpoint: the normalized mean of the coordinates' unit vectors.
///
/// Returns `None` for an empty slice. When the mean vector degenerates (e.g.
/// antipodal inputs), (0, 0) is returned.
pub fn midpoint(coordinates: &[Coordinate]) -> Option<Coordinate> {
    match coordinates {
        [] => return None,
        [single] => return Some(*single),
        _ => {}
    }

    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
    for c in coordinates {
        let (lat, lng) = (c.lat().to_radians(), c.lng().to_radians());
        x += lat.cos() * lng.cos();
        y += lat.cos() * lng.sin();
        z += lat.sin();
    }
    let n = coordinates.len() as f64;
    let (x, y, z) = (x / n, y / n, z / n);

    if x.abs() < 1e-9 && y.abs() < 1e-9 && z.abs() < 1e-9 {
        return Some(Coordinate::clamped(0.0, 0.0));
    }

    let lng = y.atan2(x);
    let lat = z.atan2((x * x + y * y).sqrt());
    Some(Coordinate::clamped(lat.to_degrees(), lng.to_degrees()))
}

/// Center of minimum distance (geometric median on the sphere).
///
/// Starts from the better of the midpoint and the best input coordinate, then
/// probes eight bearings around the current point, moving to any probe that
/// lowers the summed distance and halving the probe distance otherwise.
pub fn center_of_minimum_distance(coordinates: &[Coordinate]) -> Option<Coordinate> {
    let mut current = midpoint(coordinates)?;
    if coordinates.len() == 1 {
        return Some(current);
    }

    let mut minimum = total_distance(&current, coordinates);
    for candidate in coordinates {
        let candidate_total = total_distance(candidate, coordinates);
        if candidate_total < minimum {
            minimum = candidate_total;
            current = *candidate;
        }
    }

    let mut step = EARTH_RADIUS_M * std::f64::consts::PI / 2.0;
    let min_step = 2.0e-8 * EARTH_RADIUS_M;
    let mut moved = false;
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS && (moved || step >= min_step) {
        iterations += 1;

        let origin = to_point(&current);
        let mut best: Option<(Coordinate, f64)> = None;
        for i in 0..8 {
            let probe = from_point(Haversine.destination(origin, i as f64 * 45.0, step));
            let probe_total = total_distance(&probe, coordinates);
            if best.map_or(true, |(_, d)| probe_total < d) {
                best = Some((probe, probe_total));
            }
        }

        match best {
            Some((probe, probe_total)) if probe_total < minimum => {
                current = probe;
                minimum = probe_total;
                moved = true;
            }
            _ => {
                step /= 2.0;
                moved = false;
            }
        }
    }

    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_distance_paris_london() {
        let d = distance(&coord(48.8566, 2.3522), &coord(51.5074, -0.1276));
        assert!(d > 339_000.0 && d < 349_000.0, "Paris-London distance {} should be ~344km", d);
    }

    #[test]
    fn test_midpoint_empty_and_single() {
        assert!(midpoint(&[]).is_none());
        assert_eq!(midpoint(&[coord(10.0, 20.0)]), Some(coord(10.0, 20.0)));
    }

    #[test]
    fn test_midpoint_symmetric() {
        let m = midpoint(&[coord(0.0, -10.0), coord(0.0, 10.0)]).unwrap();
        assert!(m.lat().abs() < 1e-9);
        assert!(m.lng().abs() < 1e-9);
    }

    #[test]
    fn test_midpoint_across_antimeridian() {
        let m = midpoint(&[coord(0.0, 179.0), coord(0.0, -179.0)]).unwrap();
        assert!((m.lng().abs() - 180.0).abs() < 1e-6, "got {}", m);
    }

    #[test]
    fn test_center_of_minimum_distance_ignores_outlier() {
        // Three points around Paris and one far away: the median stays near Paris
        let coordinates =
            [coord(48.85, 2.35), coord(48.86, 2.34), coord(48.84, 2.36), coord(40.0, 20.0)];
        let center = center_of_minimum_distance(&coordinates).unwrap();
        let paris = coord(48.85, 2.35);
        assert!(distance(&center, &paris) < 5_000.0, "median {} drifted from Paris", center);

        let mid = midpoint(&coordinates).unwrap();
        assert!(distance(&mid, &paris) > distance(&center, &paris));
    }

    #[test]
    fn test_center_of_minimum_distance_is_no_worse_than_inputs() {
        let coordinates = [coord(10.0, 10.0), coord(10.5, 11.0), coord(9.5, 10.2)];
        let center = center_of_minimum_distance(&coordinates).unwrap();
        let center_total = total_distance(&center, &coordinates);
        for c in &coordinates {
            assert!(center_total <= total_distance(c, &coordinates) + 1e-6);
        }
    }

    #[test]
    fn test_center_of_minimum_distance_single() {
        assert_eq!(center_of_minimum_distance(&[coord(1.0, 2.0)]), Some(coord(1.0, 2.0)));
        assert!(center_of_minimum_distance(&[]).is_none());
    }

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert_eq!(normalize_longitude(540.0), 180.0);
    }
}
