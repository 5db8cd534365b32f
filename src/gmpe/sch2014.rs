//! Schmidt (2014) relations for Central America.
//!
//! Events shallower than [`SUBDUCTION_DEPTH_KM`] use the crustal equation
//! `log Y = c1 + c2·Mw + c3·log√(R² + c4²) + c5·S + c6·H`; deeper events use
//! the subduction equation with a fixed 5 km pseudo-depth. `S` flags soft
//! soil, `H` flags firm soil (class S II). Outputs are tabulated in cm/s².

use crate::attenuation::{period_index, psa_to_drs, Drs, Pga, Psa, Site, Source};
use crate::errors::ModelError;
use crate::shaking::Shaking;

pub const SUBDUCTION_DEPTH_KM: f64 = 25.0;
pub const MIN_DISTANCE_KM: f64 = 10.0;
const SUBDUCTION_PSEUDO_DEPTH_KM: f64 = 5.0;
const SOIL_VS30: f64 = 760.0;

/// Periods available for both regimes.
pub const PERIODS: [f64; 22] = [
    0.02, 0.075, 0.1, 0.15, 0.2, 0.24, 0.303, 0.34, 0.4, 0.44, 0.5, 0.6, 0.752, 0.9, 1.0, 1.25,
    1.493, 2.0, 2.5, 3.03, 4.0, 5.0,
];

//  period   c1        c2       c3        c4       c5 (S)    c6 (H)   sigma
#[rustfmt::skip]
const CRUSTAL: [[f64; 8]; 23] = [
    [   0.000,  0.12602,  0.49081, -1.03591,  4.22442,  0.22075,  0.11742,   0.4078],
    [   0.020,  0.15454,  0.48743, -1.03269,  3.83891,  0.21489,  0.11115,   0.4093],
    [   0.075,  0.65109,  0.44289, -1.06921,  2.15714,  0.21033,  0.16857,   0.4131],
    [   0.100,  0.73993,  0.45503, -1.08638,  4.65588,  0.15027,  0.12146,   0.4105],
    [   0.150,  0.75961,  0.48369, -1.14080,  8.92792,  0.17034,  0.07779,   0.4194],
    [   0.200,  0.47439,  0.51668, -1.12103,  8.40521,  0.24001,  0.13820,   0.4394],
    [   0.240,  0.13594,  0.53838, -1.06081,  6.43782,  0.35122,  0.18941,   0.4533],
    [   0.303, -0.30862,  0.57998, -1.02221,  4.81306,  0.49143,  0.25633,   0.4727],
    [   0.340, -0.54820,  0.60292, -0.99302,  3.71378,  0.53045,  0.26343,   0.4850],
    [   0.400, -0.83868,  0.64157, -0.99596,  3.50109,  0.55494,  0.27397,   0.4936],
    [   0.440, -1.00207,  0.66931, -1.01606,  4.30379,  0.56379,  0.26458,   0.4934],
    [   0.500, -1.20878,  0.70917, -1.05064,  5.31951,  0.55509,  0.24432,   0.4937],
    [   0.600, -1.43766,  0.74588, -1.07315,  6.41843,  0.52324,  0.18262,   0.5041],
    [   0.752, -1.82261,  0.80402, -1.11353,  7.88318,  0.49587,  0.17859,   0.5153],
    [   0.900, -2.14054,  0.84448, -1.11862,  7.77669,  0.45466,  0.14805,   0.5293],
    [   1.000, -2.26639,  0.85062, -1.10729,  7.93455,  0.43811,  0.13807,   0.5303],
    [   1.250, -2.46703,  0.85888, -1.11210,  9.40068,  0.41800,  0.13320,   0.5210],
    [   1.493, -2.76269,  0.87686, -1.09131,  7.94650,  0.40900,  0.12784,   0.5245],
    [   2.000, -3.12790,  0.90950, -1.11692,  7.67692,  0.39708,  0.10211,   0.5324],
    [   2.500, -3.24945,  0.89781, -1.11774,  7.38462,  0.36476,  0.09728,   0.5270],
    [   3.030, -3.33051,  0.87247, -1.09664,  6.02374,  0.35850,  0.09856,   0.5288],
    [   4.000, -3.40089,  0.83189, -1.06428,  3.28831,  0.33733,  0.08206,   0.5277],
    [   5.000, -3.41634,  0.80107, -1.06854,  2.46111,  0.33726,  0.08534,   0.5403],
];

//  period   c1       c2      c3      c4 (S)  c5 (H)  sigma
#[rustfmt::skip]
const SUBDUCTION: [[f64; 7]; 24] = [
    [   0.000,   0.4981,    0.537,   -1.301,   0.3596,    0.116,    0.352],
    [   0.020,   0.5250,    0.536,   -1.308,   0.3580,    0.119,    0.353],
    [   0.040,   0.7320,    0.524,   -1.365,   0.3450,    0.127,    0.352],
    [   0.075,   1.2270,    0.496,   -1.465,   0.2990,    0.134,    0.355],
    [   0.100,   1.2920,    0.486,   -1.403,   0.2520,    0.115,    0.349],
    [   0.150,   1.1370,    0.505,   -1.294,   0.2530,    0.034,    0.368],
    [   0.200,   0.7500,    0.544,   -1.215,   0.3110,    0.079,    0.362],
    [   0.240,   0.3400,    0.585,   -1.168,   0.4110,    0.122,    0.368],
    [   0.303,  -0.0810,    0.623,   -1.146,   0.5800,    0.168,    0.361],
    [   0.340,  -0.2910,    0.648,   -1.144,   0.6220,    0.173,    0.372],
    [   0.400,  -0.6700,    0.678,   -1.082,   0.6510,    0.172,    0.371],
    [   0.440,  -0.8820,    0.696,   -1.066,   0.6890,    0.186,    0.373],
    [   0.500,  -1.1480,    0.739,   -1.087,   0.6960,    0.190,    0.373],
    [   0.600,  -1.4710,    0.787,   -1.094,   0.6490,    0.134,    0.373],
    [   0.752,  -1.9140,    0.842,   -1.108,   0.6320,    0.135,    0.387],
    [   0.900,  -2.3330,    0.868,   -1.038,   0.6170,    0.132,    0.396],
    [   1.000,  -2.5550,    0.882,   -0.991,   0.5920,    0.119,    0.397],
    [   1.250,  -2.9250,    0.898,   -0.908,   0.5290,    0.113,    0.401],
    [   1.493,  -3.3000,    0.932,   -0.889,   0.5270,    0.106,    0.412],
    [   2.000,  -3.7060,    0.964,   -0.909,   0.5300,    0.130,    0.412],
    [   2.500,  -3.9270,    0.981,   -0.921,   0.4880,    0.135,    0.398],
    [   3.030,  -3.9540,    0.979,   -0.973,   0.4390,    0.124,    0.386],
    [   4.000,  -3.9430,    0.944,   -0.981,   0.3760,    0.108,    0.384],
    [   5.000,  -3.9540,    0.923,   -0.989,   0.3140,    0.112,    0.380],
];

/// Site terms of the equations. An amplification of -1 selects the S II
/// firm-soil branch (`H`), Vs30 below 760 m/s the soil branch (`S`), anything
/// else rock.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SiteFlags {
    soil: f64,
    firm_soil: f64,
}

impl SiteFlags {
    fn from_vs30(vs30: f64) -> Self {
        if vs30 == -1.0 {
            Self { soil: 0.0, firm_soil: 1.0 }
        } else if vs30 < SOIL_VS30 {
            Self { soil: 1.0, firm_soil: 0.0 }
        } else {
            Self { soil: 0.0, firm_soil: 0.0 }
        }
    }
}

/// Row of `period` in a table whose first row holds PGA.
fn row_of<const N: usize>(table: &[[f64; N]], period: f64) -> Result<usize, ModelError> {
    let periods: Vec<f64> = table.iter().skip(1).map(|row| row[0]).collect();
    Ok(period_index(&periods, period)? + 1)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SCH2014;

impl SCH2014 {
    /// `(log10 cm/s², sigma)` for a table row, picking the regime by depth.
    #[must_use]
    pub fn log_motion(row: usize, mw: f64, r_km: f64, depth_km: f64, vs30: f64) -> (f64, f64) {
        let r = r_km.max(MIN_DISTANCE_KM);
        let site = SiteFlags::from_vs30(vs30);

        if depth_km < SUBDUCTION_DEPTH_KM {
            let c = &CRUSTAL[row];
            let log = c[1] + c[2] * mw + c[3] * r.hypot(c[4]).log10()
                + c[5] * site.soil
                + c[6] * site.firm_soil;
            (log, c[7])
        } else {
            let c = &SUBDUCTION[row];
            let log = c[1] + c[2] * mw + c[3] * r.hypot(SUBDUCTION_PSEUDO_DEPTH_KM).log10()
                + c[4] * site.soil
                + c[5] * site.firm_soil;
            (log, c[6])
        }
    }

    fn motion(row: usize, source: &Source, site: &Site<'_>) -> Shaking {
        let (log, sigma) = Self::log_motion(
            row,
            source.magnitude,
            source.distance_km(site),
            source.depth_km(),
            site.amplification,
        );
        Shaking::from_log10(log, sigma).scaled(0.01)
    }
}

impl Pga for SCH2014 {
    fn pga(&self, source: &Source, site: &Site<'_>) -> Shaking {
        Self::motion(0, source, site)
    }
}

impl Psa for SCH2014 {
    fn periods(&self) -> &[f64] {
        &PERIODS
    }

    /// Subduction events additionally accept 0.04 s.
    fn psa(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError> {
        let row = if source.depth_km() < SUBDUCTION_DEPTH_KM {
            row_of(&CRUSTAL, period)?
        } else {
            row_of(&SUBDUCTION, period)?
        };
        Ok(Self::motion(row, source, site))
    }
}

impl Drs for SCH2014 {
    fn drs(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError> {
        Ok(psa_to_drs(self.psa(source, site, period)?, period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attenuation::testing::{site, source};

    #[test]
    fn test_period_rows() {
        assert_eq!(row_of(&CRUSTAL, 0.02), Ok(1));
        assert_eq!(row_of(&CRUSTAL, 5.0), Ok(22));
        assert_eq!(row_of(&SUBDUCTION, 0.04), Ok(2));
        assert!(row_of(&CRUSTAL, 0.04).is_err());
        for p in PERIODS {
            assert!(row_of(&CRUSTAL, p).is_ok());
            assert!(row_of(&SUBDUCTION, p).is_ok());
        }
    }

    #[test]
    fn test_crustal_pga_value() {
        // M6 rock at the 10 km cutoff: log10 = c1 + c2*6 + c3*log10(sqrt(100 + c4^2))
        let (log, sigma) = SCH2014::log_motion(0, 6.0, 2.0, 10.0, 800.0);
        let expected = 0.12602 + 0.49081 * 6.0 - 1.03591 * (100.0f64 + 4.22442 * 4.22442).sqrt().log10();
        assert!((log - expected).abs() < 1e-12);
        assert!((sigma - 0.4078).abs() < f64::EPSILON);
    }

    #[test]
    fn test_regime_switch_by_depth() {
        let (shallow, _) = SCH2014::log_motion(0, 6.0, 50.0, 24.9, 800.0);
        let (deep, _) = SCH2014::log_motion(0, 6.0, 50.0, 25.0, 800.0);
        let expected_deep = 0.4981 + 0.537 * 6.0 - 1.301 * (2500.0f64 + 25.0).sqrt().log10();
        assert!((deep - expected_deep).abs() < 1e-12);
        assert!((shallow - deep).abs() > 1e-3);
    }

    #[test]
    fn test_undefined_site_uses_firm_soil_term() {
        let (rock, _) = SCH2014::log_motion(0, 6.0, 30.0, 10.0, 800.0);
        let (firm, _) = SCH2014::log_motion(0, 6.0, 30.0, 10.0, -1.0);
        assert!((firm - rock - 0.11742).abs() < 1e-12);
    }

    #[test]
    fn test_site_flags() {
        assert_eq!(SiteFlags::from_vs30(-1.0), SiteFlags { soil: 0.0, firm_soil: 1.0 });
        assert_eq!(SiteFlags::from_vs30(400.0), SiteFlags { soil: 1.0, firm_soil: 0.0 });
        assert_eq!(SiteFlags::from_vs30(760.0), SiteFlags { soil: 0.0, firm_soil: 0.0 });

        // Subduction regime: c5 (H) of the PGA row
        let (rock, _) = SCH2014::log_motion(0, 7.0, 80.0, 40.0, 800.0);
        let (firm, _) = SCH2014::log_motion(0, 7.0, 80.0, 40.0, -1.0);
        assert!((firm - rock - 0.116).abs() < 1e-12);
    }

    #[test]
    fn test_pga_in_si() {
        let src = source(6.0, 10.0);
        let pga = SCH2014.pga(&src, &site(800.0));
        assert!(pga.is_ordered());
        // Tens of cm/s² at ~17 km, expressed in m/s²
        assert!(pga.expected > 0.05 && pga.expected < 5.0, "pga {}", pga.expected);
    }

    #[test]
    fn test_subduction_only_period() {
        let target = site(800.0);
        assert!(SCH2014.psa(&source(7.0, 40.0), &target, 0.04).is_ok());
        assert_eq!(
            SCH2014.psa(&source(7.0, 10.0), &target, 0.04),
            Err(ModelError::UnsupportedPeriod(0.04))
        );
    }
}
