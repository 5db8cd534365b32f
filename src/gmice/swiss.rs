//! Conversions used for Switzerland, after Faenza & Michelini (2010).
//!
//! Both relations take cm-based motion and never predict less than
//! intensity I.

use crate::attenuation::{IntensityFromAcceleration, IntensityFromVelocity};
use crate::shaking::Shaking;

pub const MIN_INTENSITY: f64 = 1.0;

/// Clamp to [`MIN_INTENSITY`], letting NaN through.
fn floor_intensity(i: f64) -> f64 {
    if i < MIN_INTENSITY { MIN_INTENSITY } else { i }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SwissGMICE;

impl SwissGMICE {
    /// Intensity for a PGV in m/s.
    #[must_use]
    pub fn from_velocity(pgv: f64) -> f64 {
        floor_intensity(5.11 + 2.35 * (100.0 * pgv).log10())
    }

    /// Intensity for a PGA in m/s².
    #[must_use]
    pub fn from_acceleration(pga: f64) -> f64 {
        floor_intensity(1.68 + 2.58 * (100.0 * pga).log10())
    }
}

impl IntensityFromVelocity for SwissGMICE {
    fn intensity_from_velocity(&self, pgv: Shaking) -> Shaking {
        pgv.map(Self::from_velocity)
    }
}

impl IntensityFromAcceleration for SwissGMICE {
    fn intensity_from_acceleration(&self, pga: Shaking) -> Shaking {
        pga.map(Self::from_acceleration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_conversion() {
        // 1 cm/s
        assert!((SwissGMICE::from_velocity(0.01) - 5.11).abs() < 1e-12);
        // 10 cm/s
        assert!((SwissGMICE::from_velocity(0.1) - 7.46).abs() < 1e-12);
    }

    #[test]
    fn test_acceleration_conversion() {
        // 100 cm/s²
        assert!((SwissGMICE::from_acceleration(1.0) - (1.68 + 2.58 * 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_minimum_intensity() {
        assert!((SwissGMICE::from_velocity(1e-6) - MIN_INTENSITY).abs() < f64::EPSILON);
        assert!((SwissGMICE::from_acceleration(0.0) - MIN_INTENSITY).abs() < f64::EPSILON);
        assert!(SwissGMICE::from_velocity(f64::NAN).is_nan());
    }

    #[test]
    fn test_triple_keeps_order() {
        let i = SwissGMICE.intensity_from_velocity(Shaking::new(0.05, 0.02, 0.1));
        assert!(i.is_ordered());
        let i = SwissGMICE.intensity_from_acceleration(Shaking::new(0.5, 0.2, 1.0));
        assert!(i.is_ordered());
    }
}
