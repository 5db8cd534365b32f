//! Geodetic transforms and distance metrics.
//!
//! Points handed around as `[f64; 3]` are either Cartesian `[x, y, z]` in
//! meters or geodetic `[lat, lon, alt_m]`, depending on the function. Source
//! depths enter as negative altitudes.

use std::f64::consts::PI;

/// WGS84 semi-major axis in meters.
pub const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 semi-minor axis in meters.
pub const SEMI_MINOR_AXIS: f64 = 6_356_752.314_2;

/// Mean earth radius in meters, used for spherical approximations.
pub const SEMI_MEAN_AXIS: f64 = 6_371_000.8;

/// First eccentricity squared.
const ECCENTRICITY2: f64 = 1.0
    - (SEMI_MINOR_AXIS * SEMI_MINOR_AXIS) / (SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS);

/// Second eccentricity squared.
const EP2: f64 = (SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS - SEMI_MINOR_AXIS * SEMI_MINOR_AXIS)
    / (SEMI_MINOR_AXIS * SEMI_MINOR_AXIS);

const DEG: f64 = PI / 180.0;

/// Prime vertical radius of curvature at a geodetic latitude (degrees).
fn prime_vertical_radius(lat: f64) -> f64 {
    let sin_lat = (lat * DEG).sin();
    SEMI_MAJOR_AXIS / (1.0 - ECCENTRICITY2 * sin_lat * sin_lat).sqrt()
}

/// Convert geodetic coordinates to earth-centered Cartesian coordinates.
///
/// Latitude and longitude in degrees, altitude in meters above the ellipsoid.
#[must_use]
pub fn geodetic_to_cartesian(lat: f64, lon: f64, alt_m: f64) -> [f64; 3] {
    let n = prime_vertical_radius(lat);
    let (sin_lat, cos_lat) = (lat * DEG).sin_cos();
    let (sin_lon, cos_lon) = (lon * DEG).sin_cos();

    [
        (n + alt_m) * cos_lat * cos_lon,
        (n + alt_m) * cos_lat * sin_lon,
        ((1.0 - ECCENTRICITY2) * n + alt_m) * sin_lat,
    ]
}

/// Convert earth-centered Cartesian coordinates back to `(lat, lon, alt_m)`.
///
/// Uses Bowring's closed-form approximation, accurate to well below a
/// millimeter for points near the surface.
#[must_use]
pub fn cartesian_to_geodetic(p: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = p;
    let a = SEMI_MAJOR_AXIS;
    let b = SEMI_MINOR_AXIS;

    let p_xy = x.hypot(y);
    let theta = (z * a).atan2(p_xy * b);
    let (sin_t, cos_t) = theta.sin_cos();

    let lat = (z + EP2 * b * sin_t.powi(3)).atan2(p_xy - ECCENTRICITY2 * a * cos_t.powi(3));
    let lon = y.atan2(x);

    let lat_deg = lat / DEG;
    let n = prime_vertical_radius(lat_deg);
    let alt = if lat.cos().abs() > 1e-10 {
        p_xy / lat.cos() - n
    } else {
        z.abs() - b
    };

    (lat_deg, lon / DEG, alt)
}

/// Euclidean distance between two Cartesian points, in meters.
#[must_use]
pub fn distance_3d(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Calculate the great-circle distance between two points using the haversine formula.
///
/// Returns distance in meters on a sphere of radius [`SEMI_MEAN_AXIS`].
#[must_use]
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1 * DEG;
    let lat2_rad = lat2 * DEG;
    let delta_lat = (lat2 - lat1) * DEG;
    let delta_lon = (lon2 - lon1) * DEG;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    SEMI_MEAN_AXIS * c
}

/// Meters per degree of latitude and of longitude at a location.
#[must_use]
pub fn meters_per_degree(lat: f64, lon: f64) -> (f64, f64) {
    let lat_scale = haversine(lat, lon, lat + 1.0, lon);
    let lon_scale = haversine(lat, lon, lat, lon + 1.0);
    (lat_scale, lon_scale)
}

/// Fast distance between two geodetic points `[lat, lon, alt_m]`, in meters.
///
/// The horizontal offset is measured in degree space and scaled by the local
/// meters-per-degree at `a`; the vertical offset is added in quadrature.
#[must_use]
pub fn distance_deg_to_m(a: [f64; 3], b: [f64; 3]) -> f64 {
    let (lat_scale, lon_scale) = meters_per_degree(a[0], a[1]);
    let dy = (b[0] - a[0]) * lat_scale;
    let dx = (b[1] - a[1]) * lon_scale;
    let dz = b[2] - a[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Rupture end points for a centroid and a finite-fault approximation.
///
/// Projects half of `length_km` each way along `strike` (degrees clockwise
/// from north). Returns `[lon1, lat1, elev1, lon2, lat2, elev2]`; both ends
/// keep the centroid elevation.
#[must_use]
pub fn centroid_to_extremes(strike: f64, length_km: f64, lon: f64, lat: f64, elev: f64) -> [f64; 6] {
    let (lat_scale, lon_scale) = meters_per_degree(lat, lon);
    let half_m = length_km * 1000.0 / 2.0;
    let (sin_s, cos_s) = (strike * DEG).sin_cos();

    let dlat = half_m * cos_s / lat_scale;
    let dlon = half_m * sin_s / lon_scale;

    [lon - dlon, lat - dlat, elev, lon + dlon, lat + dlat, elev]
}

/// Distance from `point` (`[lat, lon]`) to the segment `start`..`end`
/// (`[lat, lon, elev]`), in meters along the surface.
///
/// Works in a local plane scaled by meters-per-degree at `start`. A
/// degenerate segment reduces to the point-to-point distance.
#[must_use]
pub fn distance_from_line(start: [f64; 3], end: [f64; 3], point: [f64; 2]) -> f64 {
    let (lat_scale, lon_scale) = meters_per_degree(start[0], start[1]);

    let ex = (end[1] - start[1]) * lon_scale;
    let ey = (end[0] - start[0]) * lat_scale;
    let px = (point[1] - start[1]) * lon_scale;
    let py = (point[0] - start[0]) * lat_scale;

    let len2 = ex * ex + ey * ey;
    let t = if len2 > 0.0 {
        ((px * ex + py * ey) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let dx = px - t * ex;
    let dy = py - t * ey;
    dx.hypot(dy)
}

/// Surface distance at which a spherical wavefront reaches the surface.
///
/// `depth` is the hypocenter depth, `wave_r` the wavefront radius and
/// `sphere_r` the earth radius, all in meters. Returns 0 while the wave has not
/// reached the surface or once it has passed the far side.
#[must_use]
pub fn seismic_wave_surface_distance_sphere(depth: f64, wave_r: f64, sphere_r: f64) -> f64 {
    if depth >= wave_r || 2.0 * sphere_r - depth < wave_r {
        return 0.0;
    }

    let core_dist = sphere_r - depth;
    let y = (sphere_r * sphere_r + core_dist * core_dist - wave_r * wave_r) / (2.0 * core_dist);
    let x = (sphere_r * sphere_r - y * y).max(0.0).sqrt();

    x.atan2(y) * sphere_r
}

/// [`seismic_wave_surface_distance_sphere`] on the mean earth sphere.
#[must_use]
pub fn seismic_wave_surface_distance(depth: f64, wave_r: f64) -> f64 {
    seismic_wave_surface_distance_sphere(depth, wave_r, SEMI_MEAN_AXIS)
}

/// [`seismic_wave_surface_distance_sphere`] using the ellipsoid radius of
/// curvature at the epicenter latitude.
#[must_use]
pub fn seismic_wave_surface_distance_at(lat: f64, depth: f64, wave_r: f64) -> f64 {
    seismic_wave_surface_distance_sphere(depth, wave_r, prime_vertical_radius(lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_one_degree_at_equator() {
        let d = haversine(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111_195.0).abs() / 111_195.0 < 0.001, "got {d}");
    }

    #[test]
    fn test_haversine_identity() {
        assert!(haversine(46.2, 7.3, 46.2, 7.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_identities() {
        let a = [46.0, 8.0, -10_000.0];
        assert!(distance_deg_to_m(a, a).abs() < f64::EPSILON);

        let c = geodetic_to_cartesian(a[0], a[1], a[2]);
        assert!(distance_3d(c, c).abs() < f64::EPSILON);
    }

    #[test]
    fn test_geodetic_cartesian_roundtrip() {
        let c = geodetic_to_cartesian(46.5, 7.25, 1200.0);
        let (lat, lon, alt) = cartesian_to_geodetic(c);
        assert!((lat - 46.5).abs() < 1e-7);
        assert!((lon - 7.25).abs() < 1e-7);
        assert!((alt - 1200.0).abs() < 1e-3);
    }

    #[test]
    fn test_equator_on_semi_major_axis() {
        let [x, y, z] = geodetic_to_cartesian(0.0, 0.0, 0.0);
        assert!((x - SEMI_MAJOR_AXIS).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
        assert!(z.abs() < 1e-6);
    }

    #[test]
    fn test_depth_only_distance() {
        let surface = geodetic_to_cartesian(46.0, 8.0, 0.0);
        let hypo = geodetic_to_cartesian(46.0, 8.0, -10_000.0);
        assert!((distance_3d(surface, hypo) - 10_000.0).abs() < 1e-6);
        assert!((distance_deg_to_m([46.0, 8.0, -10_000.0], [46.0, 8.0, 0.0]) - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_deg_distance_close_to_ellipsoid() {
        // Short range: the flat approximation stays within 1% of the 3D distance
        let a = [46.0, 8.0, -10_000.0];
        let b = [46.1, 8.1, 0.0];
        let fast = distance_deg_to_m(a, b);
        let exact = distance_3d(
            geodetic_to_cartesian(a[0], a[1], a[2]),
            geodetic_to_cartesian(b[0], b[1], b[2]),
        );
        assert!((fast - exact).abs() / exact < 0.01, "fast {fast} exact {exact}");
    }

    #[test]
    fn test_centroid_to_extremes_north_strike() {
        let e = centroid_to_extremes(0.0, 20.0, 8.0, 46.0, -5000.0);
        // Longitudes unchanged, latitudes spread symmetrically by ~10 km
        assert!((e[0] - 8.0).abs() < 1e-9);
        assert!((e[3] - 8.0).abs() < 1e-9);
        assert!(e[1] < 46.0 && e[4] > 46.0);
        let span = haversine(e[1], e[0], e[4], e[3]);
        assert!((span - 20_000.0).abs() < 1.0, "span {span}");
        assert!((e[2] + 5000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_from_line() {
        let start = [46.0, 8.0, 0.0];
        let end = [46.2, 8.0, 0.0];

        // On the segment
        assert!(distance_from_line(start, end, [46.1, 8.0]) < 1e-6);

        // Beside the middle: one tenth of a degree of longitude
        let (_, lon_scale) = meters_per_degree(46.0, 8.0);
        let d = distance_from_line(start, end, [46.1, 8.1]);
        assert!((d - 0.1 * lon_scale).abs() < 1e-6);

        // Past the end clamps to the end point
        let d = distance_from_line(start, end, [46.3, 8.0]);
        let (lat_scale, _) = meters_per_degree(46.0, 8.0);
        assert!((d - 0.1 * lat_scale).abs() < 1e-6);
    }

    #[test]
    fn test_wave_not_yet_at_surface() {
        assert!(seismic_wave_surface_distance_sphere(10_000.0, 5000.0, 6_371_000.0).abs() < f64::EPSILON);
        assert!(seismic_wave_surface_distance_sphere(10_000.0, 10_000.0, 6_371_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wave_surface_distance_flat_limit() {
        // For short ranges the result approaches the flat-earth cathetus
        let d = seismic_wave_surface_distance(10_000.0, 20_000.0);
        let flat = (20_000.0_f64.powi(2) - 10_000.0_f64.powi(2)).sqrt();
        assert!((d - flat).abs() / flat < 0.002, "d {d} flat {flat}");
    }

    #[test]
    fn test_wave_past_antipode() {
        let r = 6_371_000.0;
        assert!(seismic_wave_surface_distance_sphere(0.0, 2.0 * r + 1.0, r).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wave_distance_latitude_variant() {
        let equator = seismic_wave_surface_distance_at(0.0, 10_000.0, 50_000.0);
        let mean = seismic_wave_surface_distance(10_000.0, 50_000.0);
        assert!((equator - mean).abs() / mean < 0.001);
    }
}
