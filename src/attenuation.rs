//! Capability traits shared by every attenuation relation.
//!
//! A model implements the subset of [`Pga`], [`Pgv`], [`Psa`], [`Drs`],
//! [`Intensity`], [`IntensityFromAcceleration`] and [`IntensityFromVelocity`]
//! it supports. Instances are stateless apart from coefficient tables and are
//! shared across threads behind `Arc`.

use std::f64::consts::PI;

use crate::errors::ModelError;
use crate::geodesy;
use crate::shaking::Shaking;

/// `4π²`, converts between pseudo-spectral acceleration and displacement.
pub const PI2_4: f64 = 4.0 * PI * PI;

/// Tolerance used when matching a requested period against a model's table.
const PERIOD_TOLERANCE: f64 = 1e-6;

/// Finite-fault approximation of the rupture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rupture {
    pub length_km: f64,
    /// Degrees clockwise from north
    pub strike: f64,
}

/// Earthquake source as seen by a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source {
    pub magnitude: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Depth in meters, positive down
    pub depth_m: f64,
    pub rupture: Option<Rupture>,
}

/// Location at which shaking is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site<'a> {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
    /// Name of the amplification proxy (e.g. "vs30"); models may ignore it
    pub amplification_type: &'a str,
    /// Proxy value; interpretation is model-specific
    pub amplification: f64,
}

impl Source {
    /// Depth in kilometers.
    #[must_use]
    pub fn depth_km(&self) -> f64 {
        self.depth_m / 1000.0
    }

    /// Distance metric used by most models, in meters.
    ///
    /// With a rupture this is the distance to the rupture trace combined with
    /// the depth; otherwise the degree-scaled hypocentral distance.
    #[must_use]
    pub fn distance_to(&self, site: &Site<'_>) -> f64 {
        match self.rupture {
            Some(rupture) => {
                let e = geodesy::centroid_to_extremes(
                    rupture.strike,
                    rupture.length_km,
                    self.longitude,
                    self.latitude,
                    -self.depth_m,
                );
                let start = [e[1], e[0], e[2]];
                let end = [e[4], e[3], e[5]];
                let d = geodesy::distance_from_line(start, end, [site.latitude, site.longitude]);
                let dz = self.depth_m + site.elevation_m;
                (d * d + dz * dz).sqrt()
            }
            None => geodesy::distance_deg_to_m(
                [self.latitude, self.longitude, -self.depth_m],
                [site.latitude, site.longitude, site.elevation_m],
            ),
        }
    }

    /// [`Self::distance_to`] in kilometers.
    #[must_use]
    pub fn distance_km(&self, site: &Site<'_>) -> f64 {
        self.distance_to(site) / 1000.0
    }

    /// Ellipsoidal 3D hypocentral distance in meters.
    #[must_use]
    pub fn hypocentral_distance_to(&self, site: &Site<'_>) -> f64 {
        geodesy::distance_3d(
            geodesy::geodetic_to_cartesian(self.latitude, self.longitude, -self.depth_m),
            geodesy::geodetic_to_cartesian(site.latitude, site.longitude, site.elevation_m),
        )
    }

    /// [`Self::hypocentral_distance_to`] in kilometers.
    #[must_use]
    pub fn hypocentral_distance_km(&self, site: &Site<'_>) -> f64 {
        self.hypocentral_distance_to(site) / 1000.0
    }
}

/// Peak ground acceleration in m/s².
pub trait Pga: Send + Sync {
    fn pga(&self, source: &Source, site: &Site<'_>) -> Shaking;
}

/// Peak ground velocity in m/s.
pub trait Pgv: Send + Sync {
    fn pgv(&self, source: &Source, site: &Site<'_>) -> Shaking;
}

/// Pseudo-spectral acceleration in m/s² at discrete periods.
pub trait Psa: Send + Sync {
    /// Periods in seconds the model has coefficients for.
    fn periods(&self) -> &[f64];

    /// # Errors
    ///
    /// Returns [`ModelError::UnsupportedPeriod`] when `period` is not listed
    /// in [`Self::periods`].
    fn psa(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError>;
}

/// Displacement response spectrum in m.
pub trait Drs: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ModelError::UnsupportedPeriod`] for periods the model lacks.
    fn drs(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError>;
}

/// Macroseismic intensity predicted directly from the source.
pub trait Intensity: Send + Sync {
    fn intensity(&self, source: &Source, site: &Site<'_>) -> Shaking;
}

/// Intensity converted from peak ground acceleration (m/s²).
pub trait IntensityFromAcceleration: Send + Sync {
    fn intensity_from_acceleration(&self, pga: Shaking) -> Shaking;
}

/// Intensity converted from peak ground velocity (m/s).
pub trait IntensityFromVelocity: Send + Sync {
    fn intensity_from_velocity(&self, pgv: Shaking) -> Shaking;
}

/// Index of `period` in `periods`.
///
/// # Errors
///
/// Returns [`ModelError::UnsupportedPeriod`] when no entry is within
/// tolerance.
pub fn period_index(periods: &[f64], period: f64) -> Result<usize, ModelError> {
    periods
        .iter()
        .position(|p| (p - period).abs() <= PERIOD_TOLERANCE)
        .ok_or(ModelError::UnsupportedPeriod(period))
}

/// Convert a PSA triple (m/s²) to DRS (m) at `period`.
#[must_use]
pub fn psa_to_drs(psa: Shaking, period: f64) -> Shaking {
    psa.scaled(period * period / PI2_4)
}
