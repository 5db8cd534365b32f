//! Climent et al. (1994) relation for Central America.
//!
//! Spectral coefficients predict pseudo-spectral velocity; PSA follows from
//! `PSA = 2π/T · PSV`. Values are corrected from the larger horizontal
//! component to the geometric mean.

use std::f64::consts::PI;

use crate::attenuation::{period_index, psa_to_drs, Drs, Pga, Psa, Site, Source};
use crate::errors::ModelError;
use crate::shaking::Shaking;

/// Distances below this (km) are clamped.
pub const MIN_DISTANCE_KM: f64 = 6.056_877_878;

/// Sites with a VS30 below this are treated as soil.
pub const SOIL_VS30: f64 = 760.0;

pub const PERIODS: [f64; 8] = [0.025, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 4.0];

//  period   c1       c2      c3       c4        c5      sigma  r_sa   r_std
#[rustfmt::skip]
const COFS: [[f64; 9]; 9] = [
    [0.000, -1.6870, 0.5530, -0.5370, -0.00302, 0.3270, 0.750, 1.1000, 1.0200],
    [0.025, -7.2140, 0.5530, -0.5370, -0.00302, 0.3270, 0.750, 1.1000, 1.0200],
    [0.050, -5.4870, 0.4470, -0.5500, -0.00246, 0.3090, 0.780, 1.1000, 1.0200],
    [0.100, -4.7260, 0.4830, -0.5810, -0.00199, 0.3810, 0.800, 1.2020, 1.0200],
    [0.200, -4.8760, 0.6420, -0.6420, -0.00156, 0.4700, 0.820, 1.2040, 1.0200],
    [0.500, -5.8620, 0.9170, -0.7260, -0.00107, 0.5660, 0.820, 1.2100, 1.0200],
    [1.000, -6.7440, 1.0810, -0.7560, -0.00077, 0.5880, 0.820, 1.2200, 1.0200],
    [2.000, -7.3480, 1.1280, -0.7280, -0.00053, 0.5360, 0.790, 1.2400, 1.0200],
    [4.000, -7.4410, 1.0070, -0.6010, -0.00040, 0.4960, 0.730, 1.2800, 1.0200],
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Cli94;

impl Cli94 {
    /// Soil flag from VS30; `None` when the site class is undefined (-1).
    #[must_use]
    pub fn site_term(vs30: f64) -> Option<f64> {
        if vs30 == -1.0 {
            None
        } else if vs30 < SOIL_VS30 {
            Some(1.0)
        } else {
            Some(0.0)
        }
    }

    /// Natural-log median for a row, after distance clamping, and its sigma.
    #[must_use]
    pub fn ln_value(row: usize, mw: f64, r_km: f64, soil: f64) -> (f64, f64) {
        let c = &COFS[row];
        let r = r_km.max(MIN_DISTANCE_KM);
        let ln = c[1] + c[2] * mw + c[3] * r.ln() + c[4] * r + c[5] * soil;
        (ln, c[6] / c[8])
    }

    fn motion(row: usize, source: &Source, site: &Site<'_>) -> Shaking {
        let Some(soil) = Self::site_term(site.amplification) else {
            return Shaking::undefined();
        };
        let (ln, sigma) = Self::ln_value(row, source.magnitude, source.distance_km(site), soil);
        Shaking::from_ln(ln, sigma).scaled(1.0 / COFS[row][7])
    }
}

impl Pga for Cli94 {
    fn pga(&self, source: &Source, site: &Site<'_>) -> Shaking {
        Self::motion(0, source, site)
    }
}

impl Psa for Cli94 {
    fn periods(&self) -> &[f64] {
        &PERIODS
    }

    fn psa(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError> {
        let row = period_index(&PERIODS, period)? + 1;
        let psv = Self::motion(row, source, site);
        Ok(psv.scaled(2.0 * PI / COFS[row][0]))
    }
}

impl Drs for Cli94 {
    fn drs(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError> {
        Ok(psa_to_drs(self.psa(source, site, period)?, period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attenuation::testing::{site, source};

    #[test]
    fn test_site_term() {
        assert_eq!(Cli94::site_term(300.0), Some(1.0));
        assert_eq!(Cli94::site_term(760.0), Some(0.0));
        assert_eq!(Cli94::site_term(-1.0), None);
    }

    #[test]
    fn test_undefined_site_is_nan() {
        let pga = Cli94.pga(&source(6.0, 10.0), &site(-1.0));
        assert!(pga.expected.is_nan());
        assert!(pga.percentile16.is_nan());
        assert!(pga.percentile84.is_nan());
    }

    #[test]
    fn test_distance_clamped() {
        let (near, _) = Cli94::ln_value(0, 6.0, 1.0, 0.0);
        let (cutoff, _) = Cli94::ln_value(0, 6.0, MIN_DISTANCE_KM, 0.0);
        assert!((near - cutoff).abs() < 1e-12);
    }

    #[test]
    fn test_soil_amplifies_rock() {
        let src = source(6.0, 10.0);
        let soil = Cli94.pga(&src, &site(300.0));
        let rock = Cli94.pga(&src, &site(800.0));
        assert!(soil.expected > rock.expected);
        assert!(soil.is_ordered());
    }

    #[test]
    fn test_psa_and_unsupported_period() {
        let src = source(6.0, 10.0);
        let target = site(800.0);
        let psa = Cli94.psa(&src, &target, 1.0).unwrap();
        let drs = Cli94.drs(&src, &target, 1.0).unwrap();
        assert!(psa.expected > 0.0);
        assert!((drs.expected - psa_to_drs(psa, 1.0).expected).abs() < 1e-15);
        assert_eq!(
            Cli94.psa(&src, &target, 0.3),
            Err(ModelError::UnsupportedPeriod(0.3))
        );
    }
}
