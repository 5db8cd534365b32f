//! Zhao et al. (2006) relations for crustal, interface and slab events.
//!
//! All three share the magnitude, distance, depth and site-class terms and
//! differ in their tectonic-source terms:
//!
//! `ln y = a·M + b·R − ln(R + c·e^(d·M)) + e·(h − 15) + S + source terms`
//!
//! where `h` is capped at 125 km and the depth term only applies from 15 km.
//! Predictions are in cm/s².

use super::rupture_distance;
use crate::attenuation::{period_index, psa_to_drs, Drs, Pga, Psa, Site, Source};
use crate::errors::ModelError;
use crate::shaking::Shaking;

pub const PERIODS: [f64; 20] = [
    0.05, 0.1, 0.15, 0.2, 0.25, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.25, 1.5, 2.0, 2.5, 3.0,
    4.0, 5.0,
];

const DEPTH_REFERENCE_KM: f64 = 15.0;
const DEPTH_CAP_KM: f64 = 125.0;
const CRUSTAL_INTERFACE_MAGNITUDE: f64 = 6.3;
const SLAB_MAGNITUDE: f64 = 6.5;
/// Floor for the slab `ln R` term.
const MIN_SLAB_DISTANCE_KM: f64 = 0.1;

//  period  a        b         c        d        e        FR       CH       C1       C2       C3       C4       sigma
#[rustfmt::skip]
const COMMON: [[f64; 13]; 21] = [
    [     0.0,    1.101, -0.00564,   0.0055,     1.08,  0.01412,    0.251,    0.293,    1.111,    1.344,    1.355,     1.42,    0.604],
    [    0.05,    1.076, -0.00671,   0.0075,     1.06,  0.01463,    0.251,    0.939,    1.684,    1.793,    1.747,    1.814,     0.64],
    [     0.1,    1.118, -0.00787,    0.009,    1.083,  0.01423,     0.24,    1.499,    2.061,    2.135,    2.031,    2.082,    0.694],
    [    0.15,    1.134, -0.00722,     0.01,    1.053,  0.01509,    0.251,    1.462,    1.916,    2.168,    2.052,    2.113,    0.702],
    [     0.2,    1.147, -0.00659,    0.012,    1.014,  0.01462,     0.26,     1.28,    1.669,    2.085,    2.001,     2.03,    0.692],
    [    0.25,    1.149,  -0.0059,    0.014,    0.966,  0.01459,    0.269,    1.121,    1.468,    1.942,    1.941,    1.937,    0.682],
    [     0.3,    1.163,  -0.0052,    0.015,    0.934,  0.01458,    0.259,    0.852,    1.172,    1.683,    1.808,     1.77,     0.67],
    [     0.4,      1.2, -0.00422,     0.01,    0.959,  0.01257,    0.248,    0.365,    0.655,    1.127,    1.482,    1.397,    0.659],
    [     0.5,     1.25, -0.00338,    0.006,    1.008,  0.01114,    0.247,   -0.207,    0.071,    0.515,    0.934,    0.955,    0.653],
    [     0.6,    1.293, -0.00282,    0.003,    1.088,  0.01019,    0.233,   -0.705,   -0.429,   -0.003,    0.394,    0.559,    0.653],
    [     0.7,    1.336, -0.00258,   0.0025,    1.084,  0.00979,     0.22,   -1.144,   -0.866,   -0.449,   -0.111,    0.188,    0.652],
    [     0.8,    1.386, -0.00242,   0.0022,    1.088,  0.00944,    0.232,   -1.609,   -1.325,   -0.928,    -0.62,   -0.246,    0.647],
    [     0.9,    1.433, -0.00232,    0.002,    1.109,  0.00972,     0.22,   -2.023,   -1.732,   -1.349,   -1.066,   -0.643,    0.653],
    [     1.0,    1.479,  -0.0022,    0.002,    1.115,  0.01005,    0.211,   -2.451,   -2.152,   -1.776,   -1.523,   -1.084,    0.657],
    [    1.25,    1.551, -0.00207,    0.002,    1.083,  0.01003,    0.251,   -3.243,   -2.923,   -2.542,   -2.327,   -1.936,     0.66],
    [     1.5,    1.621, -0.00224,    0.002,    1.091,  0.00928,    0.248,   -3.888,   -3.548,   -3.169,   -2.979,   -2.661,    0.664],
    [     2.0,    1.694, -0.00201,   0.0025,    1.055,  0.00833,    0.263,   -4.783,    -4.41,   -4.039,   -3.871,    -3.64,    0.669],
    [     2.5,    1.748, -0.00187,   0.0028,    1.052,  0.00776,    0.262,   -5.444,   -5.049,   -4.698,   -4.496,   -4.341,    0.671],
    [     3.0,    1.759, -0.00147,   0.0032,    1.025,  0.00644,    0.307,   -5.839,   -5.431,   -5.089,   -4.893,   -4.758,    0.667],
    [     4.0,    1.826, -0.00195,    0.004,    1.044,   0.0059,    0.353,   -6.598,   -6.181,   -5.882,   -5.698,   -5.588,    0.647],
    [     5.0,    1.825, -0.00237,    0.005,    1.065,   0.0051,    0.248,   -6.752,   -6.347,   -6.051,   -5.873,   -5.798,    0.643],
];

//  QC        WC       tauC
#[rustfmt::skip]
const CRUSTAL: [[f64; 3]; 21] = [
    [     0.0,      0.0,  0.303],
    [     0.0,      0.0,  0.326],
    [     0.0,      0.0,  0.342],
    [     0.0,      0.0,  0.331],
    [     0.0,      0.0,  0.312],
    [     0.0,      0.0,  0.298],
    [     0.0,      0.0,    0.3],
    [ -0.0126,   0.0116,  0.346],
    [ -0.0329,   0.0202,  0.338],
    [ -0.0501,   0.0274,  0.349],
    [  -0.065,   0.0336,  0.351],
    [ -0.0781,   0.0391,  0.356],
    [ -0.0899,    0.044,  0.348],
    [ -0.1006,   0.0485,  0.338],
    [ -0.1236,   0.0573,  0.313],
    [ -0.1428,   0.0647,  0.306],
    [ -0.1747,   0.0768,  0.283],
    [ -0.2023,   0.0874,  0.287],
    [ -0.2284,   0.0955,  0.278],
    [ -0.2663,   0.1033,  0.273],
    [ -0.2694,   0.1193,  0.275],
];

//  QI        WI       tauI     SI
#[rustfmt::skip]
const INTERFACE: [[f64; 4]; 21] = [
    [     0.0,      0.0,    0.308,      0.0],
    [     0.0,      0.0,    0.343,      0.0],
    [     0.0,      0.0,    0.403,      0.0],
    [ -0.0138,   0.0286,    0.367,      0.0],
    [ -0.0256,   0.0352,    0.328,      0.0],
    [ -0.0348,   0.0403,    0.289,      0.0],
    [ -0.0423,   0.0445,     0.28,      0.0],
    [ -0.0541,   0.0511,    0.271,   -0.041],
    [ -0.0632,   0.0562,    0.277,   -0.053],
    [ -0.0707,   0.0604,    0.296,   -0.103],
    [ -0.0771,   0.0639,    0.313,   -0.146],
    [ -0.0825,    0.067,    0.329,   -0.164],
    [ -0.0874,   0.0697,    0.324,   -0.206],
    [ -0.0917,   0.0721,    0.328,   -0.239],
    [ -0.1009,   0.0772,    0.339,   -0.256],
    [ -0.1083,   0.0814,    0.352,   -0.306],
    [ -0.1202,    0.088,     0.36,   -0.321],
    [ -0.1293,   0.0931,    0.356,   -0.337],
    [ -0.1368,   0.0972,    0.338,   -0.331],
    [ -0.1486,   0.1038,    0.307,    -0.39],
    [ -0.1578,    0.109,    0.272,   -0.498],
];

//  QS        WS       tauS     SS       SSL      PS
#[rustfmt::skip]
const SLAB: [[f64; 6]; 21] = [
    [  0.1584,  -0.0529,    0.321,    2.607,   -0.528,   0.1392],
    [  0.1932,  -0.0841,    0.378,    2.764,   -0.551,   0.1636],
    [  0.2057,  -0.0877,     0.42,    2.156,    -0.42,    0.169],
    [  0.1984,  -0.0773,    0.372,    2.161,   -0.431,   0.1669],
    [  0.1856,  -0.0644,    0.324,    1.901,   -0.372,   0.1631],
    [  0.1714,  -0.0515,    0.294,    1.814,    -0.36,   0.1588],
    [  0.1573,  -0.0395,    0.284,    2.181,    -0.45,   0.1544],
    [  0.1309,  -0.0183,    0.278,    2.432,   -0.506,    0.146],
    [  0.1078,  -0.0008,    0.272,    2.629,   -0.554,   0.1381],
    [  0.0878,   0.0136,    0.285,    2.702,   -0.575,   0.1307],
    [  0.0705,   0.0254,     0.29,    2.654,   -0.572,   0.1239],
    [  0.0556,   0.0352,    0.299,     2.48,    -0.54,   0.1176],
    [  0.0426,   0.0432,    0.289,    2.332,   -0.522,   0.1116],
    [  0.0314,   0.0498,    0.286,    2.233,   -0.509,    0.106],
    [  0.0093,   0.0612,    0.277,    2.029,   -0.469,   0.0933],
    [ -0.0062,   0.0674,    0.282,    1.589,   -0.379,   0.0821],
    [ -0.0235,   0.0692,      0.3,    0.966,   -0.248,   0.0628],
    [ -0.0287,   0.0622,    0.292,    0.789,   -0.221,   0.0465],
    [ -0.0261,   0.0496,    0.274,    1.037,   -0.263,   0.0322],
    [ -0.0065,    0.015,    0.281,    0.561,   -0.169,   0.0083],
    [  0.0246,  -0.0268,    0.296,    0.225,    -0.12,  -0.0117],
];

/// Tectonic setting of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tectonic {
    /// Shallow crustal; the focal mechanism is unknown in real time so no
    /// faulting term is applied.
    Crustal,
    /// Subduction interface, assumed reverse.
    Interface,
    /// Subduction intraslab.
    Slab,
}

/// Site-class term for a VS30 value; `None` when the site is undefined.
fn site_term(row: &[f64; 13], vs30: f64) -> Option<f64> {
    if vs30 == -1.0 {
        return None;
    }
    let column = if vs30 > 1100.0 {
        7
    } else if vs30 > 600.0 {
        8
    } else if vs30 > 300.0 {
        9
    } else if vs30 > 200.0 {
        10
    } else {
        11
    };
    Some(row[column])
}

#[derive(Debug, Clone, Copy)]
pub struct ZEA06 {
    tectonic: Tectonic,
}

impl ZEA06 {
    #[must_use]
    pub const fn crustal() -> Self {
        Self {
            tectonic: Tectonic::Crustal,
        }
    }

    #[must_use]
    pub const fn interface() -> Self {
        Self {
            tectonic: Tectonic::Interface,
        }
    }

    #[must_use]
    pub const fn slab() -> Self {
        Self {
            tectonic: Tectonic::Slab,
        }
    }

    #[must_use]
    pub const fn tectonic(&self) -> Tectonic {
        self.tectonic
    }

    /// `(ln median in cm/s², sigma)` for a table row; `None` for an
    /// undefined site.
    #[must_use]
    pub fn ln_motion(
        &self,
        row: usize,
        mw: f64,
        r_km: f64,
        depth_km: f64,
        vs30: f64,
    ) -> Option<(f64, f64)> {
        let c = &COMMON[row];
        let site = site_term(c, vs30)?;

        let h = depth_km.min(DEPTH_CAP_KM);
        let depth_term = if h >= DEPTH_REFERENCE_KM {
            c[5] * (h - DEPTH_REFERENCE_KM)
        } else {
            0.0
        };
        let base = c[1] * mw + c[2] * r_km - (r_km + c[3] * (c[4] * mw).exp()).ln() + depth_term + site;

        let (source_terms, tau) = match self.tectonic {
            Tectonic::Crustal => {
                let [q, w, tau] = CRUSTAL[row];
                (q * (mw - CRUSTAL_INTERFACE_MAGNITUDE).powi(2) + w, tau)
            }
            Tectonic::Interface => {
                let [q, w, tau, si] = INTERFACE[row];
                let dm = mw - CRUSTAL_INTERFACE_MAGNITUDE;
                (q * dm * dm + w + si + c[6], tau)
            }
            Tectonic::Slab => {
                let [q, w, tau, ss, ssl, ps] = SLAB[row];
                let dm = mw - SLAB_MAGNITUDE;
                let slab_path = ssl * r_km.max(MIN_SLAB_DISTANCE_KM).ln();
                (ps * dm + q * dm * dm + w + ss + slab_path, tau)
            }
        };

        Some((base + source_terms, c[12].hypot(tau)))
    }

    fn motion(&self, row: usize, source: &Source, site: &Site<'_>) -> Shaking {
        let mw = source.magnitude;
        let r = rupture_distance(mw, source.distance_km(site));
        match self.ln_motion(row, mw, r, source.depth_km(), site.amplification) {
            Some((ln, sigma)) => Shaking::from_ln(ln, sigma).scaled(0.01),
            None => Shaking::undefined(),
        }
    }
}

impl Pga for ZEA06 {
    fn pga(&self, source: &Source, site: &Site<'_>) -> Shaking {
        self.motion(0, source, site)
    }
}

impl Psa for ZEA06 {
    fn periods(&self) -> &[f64] {
        &PERIODS
    }

    fn psa(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError> {
        let row = period_index(&PERIODS, period)? + 1;
        Ok(self.motion(row, source, site))
    }
}

impl Drs for ZEA06 {
    fn drs(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError> {
        Ok(psa_to_drs(self.psa(source, site, period)?, period))
    }
}
