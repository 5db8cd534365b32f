//! ISNet relations for southern Italy.
//!
//! Two magnitude regimes: Akkar & Bommer (2007) from M 4 upwards, Emolo et
//! al. (2010) below. Both use the ellipsoidal hypocentral distance.

use crate::attenuation::{Pga, Pgv, Site, Source};
use crate::shaking::Shaking;

/// Magnitude at which the large-event regime takes over.
pub const REGIME_SWITCH_MAGNITUDE: f64 = 4.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct ISNet;

impl ISNet {
    /// `(log10 PGA [m/s²], sigma)` at hypocentral distance `r_km`.
    #[must_use]
    pub fn log_pga(magnitude: f64, r_km: f64) -> (f64, f64) {
        if magnitude >= REGIME_SWITCH_MAGNITUDE {
            // cm/s², hence the -2
            let log = 1.647 + 0.767 * magnitude - 0.074 * magnitude.powi(2)
                + (-3.162 + 0.321 * magnitude) * r_km.hypot(7.682).log10()
                - 2.0;
            let sigma = (0.557 - 0.049 * magnitude).hypot(0.189 - 0.017 * magnitude);
            (log, sigma)
        } else {
            (-2.024 + 0.469 * magnitude - 1.442 * r_km.log10(), 0.444)
        }
    }

    /// `(log10 PGV [m/s], sigma)` at hypocentral distance `r_km`.
    #[must_use]
    pub fn log_pgv(magnitude: f64, r_km: f64) -> (f64, f64) {
        if magnitude >= REGIME_SWITCH_MAGNITUDE {
            // cm/s, hence the -2
            let log = -1.36 + 1.063 * magnitude - 0.079 * magnitude.powi(2)
                + (-2.948 + 0.306 * magnitude) * r_km.hypot(5.547).log10()
                - 2.0;
            let sigma = (0.85 - 0.096 * magnitude).hypot(0.313 - 0.040 * magnitude);
            (log, sigma)
        } else {
            (-3.943 + 0.540 * magnitude - 1.458 * r_km.log10(), 0.359)
        }
    }
}

impl Pga for ISNet {
    fn pga(&self, source: &Source, site: &Site<'_>) -> Shaking {
        let (log, sigma) = Self::log_pga(source.magnitude, source.hypocentral_distance_km(site));
        Shaking::from_log10(log, sigma)
    }
}

impl Pgv for ISNet {
    fn pgv(&self, source: &Source, site: &Site<'_>) -> Shaking {
        let (log, sigma) = Self::log_pgv(source.magnitude, source.hypocentral_distance_km(site));
        Shaking::from_log10(log, sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attenuation::testing::{site, source};

    #[test]
    fn test_large_magnitude_branch() {
        let (log, sigma) = ISNet::log_pga(6.0, 10.0);
        assert!((log - 0.224_514_424_6).abs() < 1e-9);
        assert!((sigma - 0.277_016_245_0).abs() < 1e-9);

        let (log, sigma) = ISNet::log_pgv(6.0, 10.0);
        assert!((log - (-1.002_777_056_2)).abs() < 1e-9);
        assert!((sigma - 0.283_557_754_3).abs() < 1e-9);
    }

    #[test]
    fn test_small_magnitude_branch() {
        let (log, sigma) = ISNet::log_pga(3.5, 10.0);
        assert!((log - (-1.8245)).abs() < 1e-12);
        assert!((sigma - 0.444).abs() < f64::EPSILON);

        let (log, sigma) = ISNet::log_pgv(3.5, 10.0);
        assert!((log - (-3.511)).abs() < 1e-12);
        assert!((sigma - 0.359).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sigma_non_negative_across_magnitudes() {
        for tenths in 20..=90 {
            let m = f64::from(tenths) / 10.0;
            assert!(ISNet::log_pga(m, 20.0).1 >= 0.0);
            assert!(ISNet::log_pgv(m, 20.0).1 >= 0.0);
        }
    }

    #[test]
    fn test_scenario_pga_within_sigma_band() {
        // M6 at 10 km depth, target ~13.5 km away on the surface
        let src = source(6.0, 10.0);
        let target = site(760.0);
        let r = src.hypocentral_distance_km(&target);
        let (log, sigma) = ISNet::log_pga(6.0, r);

        let pga = ISNet.pga(&src, &target);
        assert!(pga.is_ordered());
        assert!(pga.percentile16 <= 10f64.powf(log) && 10f64.powf(log) <= pga.percentile84);
        assert!((pga.expected.log10() - log).abs() < 1e-12);
        assert!((pga.percentile84.log10() - pga.expected.log10() - sigma).abs() < 1e-9);
        // Order of magnitude check: roughly 1 m/s² close to an M6
        assert!(pga.expected > 0.3 && pga.expected < 3.0, "pga {}", pga.expected);
    }
}
