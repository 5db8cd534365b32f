//! Event records consumed by the shaking calculator.
//!
//! Events arrive already validated by an upstream collaborator; here they are
//! decoded from JSON (one object per event, or NDJSON for replays).

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::attenuation::{Rupture, Source};
use crate::errors::QuakeError;

/// A single earthquake solution. Immutable once constructed; a newer
/// solution replaces it entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier
    pub id: String,

    /// Origin time (ms since epoch)
    pub time: i64,

    /// Latitude (degrees)
    pub latitude: f64,

    /// Latitude uncertainty
    #[serde(default)]
    pub latitude_uncertainty: f64,

    /// Longitude (degrees)
    pub longitude: f64,

    /// Longitude uncertainty
    #[serde(default)]
    pub longitude_uncertainty: f64,

    /// Depth in meters, positive down
    pub depth: f64,

    /// Moment magnitude
    pub magnitude: f64,

    /// Likelihood that the event is real (0-1)
    #[serde(default)]
    pub likelihood: Option<f64>,

    /// Rupture length in kilometers
    #[serde(default)]
    pub rupture_length: Option<f64>,

    /// Rupture strike in degrees clockwise from north
    #[serde(default)]
    pub rupture_strike: Option<f64>,

    /// Marked as "not existing" upstream (exercise or test message)
    #[serde(default)]
    pub fake: bool,

    /// Station codes whose picks contributed to this solution
    #[serde(default)]
    pub triggered_stations: Vec<String>,
}

impl Event {
    /// Create a point-source event without uncertainties or rupture.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        time: i64,
        latitude: f64,
        longitude: f64,
        depth: f64,
        magnitude: f64,
    ) -> Self {
        Self {
            id: id.into(),
            time,
            latitude,
            latitude_uncertainty: 0.0,
            longitude,
            longitude_uncertainty: 0.0,
            depth,
            magnitude,
            likelihood: None,
            rupture_length: None,
            rupture_strike: None,
            fake: false,
            triggered_stations: Vec::new(),
        }
    }

    /// Attach a finite-fault approximation.
    #[must_use]
    pub fn with_rupture(mut self, length_km: f64, strike: f64) -> Self {
        self.rupture_length = Some(length_km);
        self.rupture_strike = Some(strike);
        self
    }

    /// Parse a single event from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the event is invalid.
    pub fn from_json(json: &str) -> Result<Self, QuakeError> {
        let event: Self = serde_json::from_str(json)?;
        event.validate()?;
        Ok(event)
    }

    /// Validate the event fields.
    ///
    /// # Errors
    ///
    /// Returns [`QuakeError::InvalidEvent`] describing the first problem found.
    pub fn validate(&self) -> Result<(), QuakeError> {
        if self.id.is_empty() {
            return Err(QuakeError::InvalidEvent("empty event ID".into()));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(QuakeError::InvalidEvent(format!(
                "latitude {} out of range [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(QuakeError::InvalidEvent(format!(
                "longitude {} out of range [-180, 180]",
                self.longitude
            )));
        }
        if !self.depth.is_finite() {
            return Err(QuakeError::InvalidEvent(format!("depth {} is not finite", self.depth)));
        }
        if !self.magnitude.is_finite() {
            return Err(QuakeError::InvalidEvent(format!(
                "magnitude {} is not finite",
                self.magnitude
            )));
        }
        match (self.rupture_length, self.rupture_strike) {
            (Some(_), None) => {
                return Err(QuakeError::InvalidEvent(
                    "rupture length given without strike".into(),
                ));
            }
            (Some(length), Some(_)) if length < 0.0 => {
                return Err(QuakeError::InvalidEvent(format!(
                    "rupture length {length} is negative"
                )));
            }
            _ => {}
        }
        Ok(())
    }

    /// Get the origin time as a `DateTime<Utc>`.
    #[must_use]
    pub fn origin_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.time).single()
    }

    /// Get depth in kilometers (positive down).
    #[must_use]
    pub fn depth_km(&self) -> f64 {
        self.depth / 1000.0
    }

    /// Finite-fault approximation, when both length and strike are known.
    #[must_use]
    pub fn rupture(&self) -> Option<Rupture> {
        match (self.rupture_length, self.rupture_strike) {
            (Some(length_km), Some(strike)) => Some(Rupture { length_km, strike }),
            _ => None,
        }
    }

    /// Source description handed to attenuation models.
    #[must_use]
    pub fn source(&self) -> Source {
        Source {
            magnitude: self.magnitude,
            latitude: self.latitude,
            longitude: self.longitude,
            depth_m: self.depth,
            rupture: self.rupture(),
        }
    }
}
