//! Allen et al. (2012) intensity prediction for active crustal regions.
//!
//! `I = c0 + c1·M + c2·ln√(R² + Rm²) [+ c4·ln(R/50) beyond 50 km]` with
//! `Rm = m1 + m2·e^(M−5)` and a distance-dependent sigma.

use crate::attenuation::{Intensity, Site, Source};
use crate::shaking::Shaking;

const C0: f64 = 2.085;
const C1: f64 = 1.428;
const C2: f64 = -1.402;
const C4: f64 = 0.078;
const M1: f64 = -0.209;
const M2: f64 = 2.042;

/// Distance (km) beyond which the far-field term applies.
pub const FAR_FIELD_KM: f64 = 50.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct AEA12;

impl AEA12 {
    #[must_use]
    pub fn mean_intensity(magnitude: f64, r_km: f64) -> f64 {
        let rm = M1 + M2 * (magnitude - 5.0).exp();
        let near = C0 + C1 * magnitude + C2 * r_km.hypot(rm).ln();
        if r_km <= FAR_FIELD_KM {
            near
        } else {
            near + C4 * (r_km / FAR_FIELD_KM).ln()
        }
    }

    #[must_use]
    pub fn sigma(r_km: f64) -> f64 {
        let x = r_km / 22.9;
        0.82 + 0.37 / (1.0 + x * x)
    }
}

impl Intensity for AEA12 {
    fn intensity(&self, source: &Source, site: &Site<'_>) -> Shaking {
        let r = source.distance_km(site);
        let i = Self::mean_intensity(source.magnitude, r);
        let sigma = Self::sigma(r);
        Shaking::new(i, i - sigma, i + sigma)
    }
}
