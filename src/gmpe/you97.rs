//! Youngs et al. (1997) relations for subduction-zone earthquakes.
//!
//! One functional form covers interface and intraslab events; the zone enters
//! through the `Zt` flag. Predictions are in g with separate rock and soil
//! coefficient sets selected by VS30.

use super::rupture_distance;
use crate::attenuation::{period_index, psa_to_drs, Drs, Pga, Psa, Site, Source};
use crate::errors::ModelError;
use crate::shaking::{Shaking, EARTH_ACCELERATION};

pub const PERIODS: [f64; 12] = [0.075, 0.1, 0.2, 0.3, 0.4, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 4.0];

const SOIL_VS30: f64 = 760.0;

/// Sigma stops growing with magnitude above this.
const SIGMA_MAGNITUDE_CAP: f64 = 8.0;

/// Rock 4 s spectral values are the 3 s values scaled by this factor.
const ROCK_4S_RATIO: f64 = 0.399;

//  period  C1      C2       C3      C4    C5
#[rustfmt::skip]
const SOIL: [[f64; 6]; 13] = [
    [0.0,   0.0,    -0.0019, -2.329, 1.45, -0.1],
    [0.075, 2.4,    -0.0019, -2.697, 1.45, -0.1],
    [0.1,   2.516,  -0.0019, -2.697, 1.45, -0.1],
    [0.2,   1.549,  -0.002,  -2.464, 1.45, -0.1],
    [0.3,   0.793,  -0.002,  -2.327, 1.45, -0.1],
    [0.4,   0.144,  -0.0035, -2.23,  1.45, -0.1],
    [0.5,   -0.438, -0.0048, -2.14,  1.45, -0.1],
    [0.75,  -1.704, -0.0066, -1.952, 1.45, -0.1],
    [1.0,   -2.87,  -0.0114, -1.785, 1.45, -0.1],
    [1.5,   -5.101, -0.0164, -1.47,  1.5,  -0.1],
    [2.0,   -6.433, -0.0221, -1.29,  1.55, -0.1],
    [3.0,   -6.672, -0.0235, -1.347, 1.65, -0.1],
    [4.0,   -7.618, -0.0235, -1.272, 1.65, -0.1],
];

#[rustfmt::skip]
const ROCK: [[f64; 6]; 13] = [
    [0.0,   0.0,    0.0,     -2.552, 1.45, -0.1],
    [0.075, 1.275,  0.0,     -2.707, 1.45, -0.1],
    [0.1,   1.188,  -0.0011, -2.655, 1.45, -0.1],
    [0.2,   0.722,  -0.0027, -2.528, 1.45, -0.1],
    [0.3,   0.246,  -0.0036, -2.454, 1.45, -0.1],
    [0.4,   -0.115, -0.0043, -2.401, 1.45, -0.1],
    [0.5,   -0.4,   -0.0048, -2.36,  1.45, -0.1],
    [0.75,  -1.149, -0.0057, -2.286, 1.45, -0.1],
    [1.0,   -1.736, -0.0064, -2.234, 1.45, -0.1],
    [1.5,   -2.634, -0.0073, -2.16,  1.5,  -0.1],
    [2.0,   -3.328, -0.008,  -2.107, 1.55, -0.1],
    [3.0,   -4.511, -0.0089, -2.033, 1.65, -0.1],
    [4.0,   -4.511, -0.0089, -2.033, 1.65, -0.1],
];

/// Period-independent terms A1..A7.
struct SiteTerms {
    a1: f64,
    a2: f64,
    a3: f64,
    a4: f64,
    a5: f64,
    a6: f64,
    a7: f64,
    table: &'static [[f64; 6]; 13],
}

const ROCK_TERMS: SiteTerms = SiteTerms {
    a1: 0.2418,
    a2: 1.414,
    a3: 10.0,
    a4: 1.7818,
    a5: 0.554,
    a6: 0.00607,
    a7: 0.3846,
    table: &ROCK,
};

const SOIL_TERMS: SiteTerms = SiteTerms {
    a1: -0.6687,
    a2: 1.438,
    a3: 10.0,
    a4: 1.097,
    a5: 0.617,
    a6: 0.00648,
    a7: 0.3643,
    table: &SOIL,
};

/// Subduction zone type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Interface,
    Intraslab,
}

impl Zone {
    const fn flag(self) -> f64 {
        match self {
            Self::Interface => 0.0,
            Self::Intraslab => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct YOU97 {
    zone: Zone,
}

impl YOU97 {
    #[must_use]
    pub const fn interface() -> Self {
        Self {
            zone: Zone::Interface,
        }
    }

    #[must_use]
    pub const fn intraslab() -> Self {
        Self {
            zone: Zone::Intraslab,
        }
    }

    #[must_use]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// `(ln median in g, sigma)` for a table row; `None` for an undefined site.
    #[must_use]
    pub fn ln_motion(
        &self,
        row: usize,
        mw: f64,
        rrup_km: f64,
        depth_km: f64,
        vs30: f64,
    ) -> Option<(f64, f64)> {
        if vs30 == -1.0 {
            return None;
        }
        let terms = if vs30 < SOIL_VS30 { &SOIL_TERMS } else { &ROCK_TERMS };
        let c = &terms.table[row];

        let ln = terms.a1
            + terms.a2 * mw
            + c[1]
            + c[2] * (terms.a3 - mw).powi(3)
            + c[3] * (rrup_km + terms.a4 * (terms.a5 * mw).exp()).ln()
            + terms.a6 * depth_km
            + terms.a7 * self.zone.flag();
        let sigma = c[4] + c[5] * mw.min(SIGMA_MAGNITUDE_CAP);
        Some((ln, sigma))
    }

    fn motion(&self, row: usize, source: &Source, site: &Site<'_>) -> Shaking {
        let mw = source.magnitude;
        let rrup = rupture_distance(mw, source.hypocentral_distance_km(site));
        let Some((ln, sigma)) = self.ln_motion(row, mw, rrup, source.depth_km(), site.amplification)
        else {
            return Shaking::undefined();
        };

        let mut shaking = Shaking::from_ln(ln, sigma).scaled(EARTH_ACCELERATION);
        if row == ROCK.len() - 1 && site.amplification >= SOIL_VS30 {
            shaking = shaking.scaled(ROCK_4S_RATIO);
        }
        shaking
    }
}

impl Pga for YOU97 {
    fn pga(&self, source: &Source, site: &Site<'_>) -> Shaking {
        self.motion(0, source, site)
    }
}

impl Psa for YOU97 {
    fn periods(&self) -> &[f64] {
        &PERIODS
    }

    fn psa(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError> {
        let row = period_index(&PERIODS, period)? + 1;
        Ok(self.motion(row, source, site))
    }
}

impl Drs for YOU97 {
    fn drs(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError> {
        Ok(psa_to_drs(self.psa(source, site, period)?, period))
    }
}
