//! Faccioli & Cauzzi (2006) EMS-98 intensity prediction.

use crate::attenuation::{Intensity, Site, Source};
use crate::shaking::Shaking;

pub const SIGMA: f64 = 0.5344;

#[derive(Debug, Clone, Copy, Default)]
pub struct FC06;

impl FC06 {
    #[must_use]
    pub fn mean_intensity(magnitude: f64, r_km: f64) -> f64 {
        1.0157 + 1.2566 * magnitude - 0.6547 * r_km.hypot(2.0).ln()
    }
}

impl Intensity for FC06 {
    fn intensity(&self, source: &Source, site: &Site<'_>) -> Shaking {
        let i = Self::mean_intensity(source.magnitude, source.distance_km(site));
        Shaking::new(i, i - SIGMA, i + SIGMA)
    }
}
