//! Engine configuration, decoded from JSON.
//!
//! Every field is optional in the file; missing ones take the values of
//! [`Config::default`]. Relative file paths are resolved against the
//! directory of the configuration file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::arrival::WaveModel;
use crate::errors::QuakeError;
use crate::filters::EventFilter;
use crate::shaking::ShakingType;

/// GMPE bindings, one model name per measure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GmpeBindings {
    pub pga: Option<String>,
    pub pgv: Option<String>,
    pub psa: Option<String>,
    pub drs: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpeBindings {
    pub intensity: Option<String>,
}

/// Ground-motion to intensity conversions, used only without an IPE.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GmiceBindings {
    pub pga: Option<String>,
    pub pgv: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelBindings {
    pub gmpe: GmpeBindings,
    pub ipe: IpeBindings,
    pub gmice: GmiceBindings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the site-amplification proxy handed to the models
    pub amplification_type: String,

    /// Period (s) of the single PSA/DRS value stored per point
    pub control_period: Option<f64>,

    /// Periods (s) of the response spectrum, sorted ascending on load
    pub periods: Vec<f64>,

    /// Measure used for the response spectrum (`psa` or `drs`)
    pub spectrum_parameter: Option<ShakingType>,

    /// Measure painted on the shake map
    pub shake_map_parameter: Option<ShakingType>,

    pub models: ModelBindings,

    /// Directory of `LookupTable` data files
    pub lookup_table_dir: Option<PathBuf>,

    /// Target CSV (`name,lon,lat,alt,amp`)
    pub targets_file: Option<PathBuf>,

    /// Station CSV, same format as targets
    pub stations_file: Option<PathBuf>,

    /// Shake-map grid CSV (`lon,lat,alt,amp`)
    pub shake_map_file: Option<PathBuf>,

    pub filter: EventFilter,

    /// P-wave velocity (km/s)
    pub vp: f64,

    /// S-wave velocity (km/s)
    pub vs: f64,

    /// Radius (km) around a target inside which no warning is possible
    pub blind_zone_radius_km: f64,

    /// Worker restarts allowed after a failed pass
    pub max_restarts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            amplification_type: "vs30".to_string(),
            control_period: None,
            periods: Vec::new(),
            spectrum_parameter: None,
            shake_map_parameter: None,
            models: ModelBindings::default(),
            lookup_table_dir: None,
            targets_file: None,
            stations_file: None,
            shake_map_file: None,
            filter: EventFilter::default(),
            vp: 5.5,
            vs: 3.3,
            blind_zone_radius_km: 40.0,
            max_restarts: 5,
        }
    }
}

impl Config {
    /// Parse, normalize and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are
    /// inconsistent.
    pub fn from_json(json: &str) -> Result<Self, QuakeError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, resolving relative paths against its
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, QuakeError> {
        let text = std::fs::read_to_string(path).map_err(|e| QuakeError::io(path, e))?;
        let mut config = Self::from_json(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Velocity model for arrival timing.
    #[must_use]
    pub fn wave_model(&self) -> WaveModel {
        WaveModel {
            vp: self.vp,
            vs: self.vs,
            blind_zone_radius_km: self.blind_zone_radius_km,
        }
    }

    fn normalize(&mut self) {
        self.periods.sort_by(f64::total_cmp);
        self.periods.dedup();
    }

    fn validate(&self) -> Result<(), QuakeError> {
        for (name, speed) in [("vp", self.vp), ("vs", self.vs)] {
            if !(speed.is_finite() && speed > 0.0) {
                return Err(QuakeError::Config(format!("{name} must be positive, got {speed}")));
            }
        }
        if let Some(bad) = self
            .periods
            .iter()
            .chain(self.control_period.iter())
            .find(|p| !(p.is_finite() && **p > 0.0))
        {
            return Err(QuakeError::Config(format!("period {bad} must be positive")));
        }
        if let Some(kind) = self.spectrum_parameter
            && !matches!(kind, ShakingType::Psa | ShakingType::Drs)
        {
            return Err(QuakeError::Config(format!(
                "spectrum_parameter must be psa or drs, got {}",
                kind.as_str()
            )));
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.lookup_table_dir,
            &mut self.targets_file,
            &mut self.stations_file,
            &mut self.shake_map_file,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!((config.vp - 5.5).abs() < f64::EPSILON);
        assert!((config.vs - 3.3).abs() < f64::EPSILON);
        assert!((config.blind_zone_radius_km - 40.0).abs() < f64::EPSILON);
        assert_eq!(config.max_restarts, 5);
        assert_eq!(config.amplification_type, "vs30");
    }

    #[test]
    fn test_full_document() {
        let json = r#"{
            "control_period": 1.0,
            "periods": [2.0, 0.1, 1.0, 0.1],
            "spectrum_parameter": "psa",
            "shake_map_parameter": "intensity",
            "models": {
                "gmpe": {"pga": "ISNet", "pgv": "ISNet", "psa": "Swiss"},
                "gmice": {"pgv": "SwissGMICE"}
            },
            "targets_file": "targets.csv",
            "filter": {"minimum_magnitude": 2.0}
        }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.periods, vec![0.1, 1.0, 2.0]);
        assert_eq!(config.spectrum_parameter, Some(ShakingType::Psa));
        assert_eq!(config.shake_map_parameter, Some(ShakingType::Intensity));
        assert_eq!(config.models.gmpe.psa.as_deref(), Some("Swiss"));
        assert_eq!(config.models.gmpe.drs, None);
        assert_eq!(config.models.gmice.pgv.as_deref(), Some("SwissGMICE"));
        assert_eq!(config.filter.minimum_magnitude, Some(2.0));
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_json(r#"{"vs": 0}"#).is_err());
        assert!(Config::from_json(r#"{"periods": [-1.0]}"#).is_err());
        assert!(Config::from_json(r#"{"spectrum_parameter": "pga"}"#).is_err());
        assert!(Config::from_json(r#"{"shake_map_parameter": "sa"}"#).is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = Config {
            targets_file: Some(PathBuf::from("targets.csv")),
            shake_map_file: Some(PathBuf::from("/abs/grid.csv")),
            ..Config::default()
        };
        config.resolve_paths(Path::new("/etc/quakeshake"));
        assert_eq!(config.targets_file, Some(PathBuf::from("/etc/quakeshake/targets.csv")));
        assert_eq!(config.shake_map_file, Some(PathBuf::from("/abs/grid.csv")));
    }
}
