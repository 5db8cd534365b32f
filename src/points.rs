//! Targets, stations and shake-map grid points.
//!
//! Targets and stations share [`Target`]: a fixed position and amplification
//! plus a [`PointState`] snapshot holding the results of one event. A pass
//! builds a fresh state and swaps it in whole, so readers never see a mix of
//! two events.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::attenuation::Site;
use crate::errors::QuakeError;
use crate::shaking::{Shaking, ShakingType, SpectralValue};

/// Results of one event at one point.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointState {
    /// Event the values belong to; `None` before the first pass
    pub event_id: Option<String>,
    pub values: BTreeMap<ShakingType, Shaking>,
    /// Response spectrum, ordered by period
    pub spectrum: Vec<SpectralValue>,
    /// Station picked by the event
    pub triggered: bool,
}

impl PointState {
    #[must_use]
    pub fn for_event(event_id: &str) -> Self {
        Self {
            event_id: Some(event_id.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn get(&self, kind: ShakingType) -> Option<&Shaking> {
        self.values.get(&kind)
    }
}

/// A named point of interest (target or station).
#[derive(Debug)]
pub struct Target {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above sea level
    pub altitude: f64,
    pub amplification: f64,
    state: RwLock<Arc<PointState>>,
}

impl Target {
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, altitude: f64, amplification: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            altitude,
            amplification,
            state: RwLock::new(Arc::new(PointState::default())),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<PointState> {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the snapshot.
    pub fn publish(&self, state: PointState) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(state);
    }

    /// Model input for this point.
    #[must_use]
    pub fn site<'a>(&self, amplification_type: &'a str) -> Site<'a> {
        Site {
            latitude: self.latitude,
            longitude: self.longitude,
            elevation_m: self.altitude,
            amplification_type,
            amplification: self.amplification,
        }
    }
}

/// A shake-map grid node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub amplification: f64,
}

impl GridPoint {
    #[must_use]
    pub fn site<'a>(&self, amplification_type: &'a str) -> Site<'a> {
        Site {
            latitude: self.latitude,
            longitude: self.longitude,
            elevation_m: self.altitude,
            amplification_type,
            amplification: self.amplification,
        }
    }
}

/// Values painted on the shake map for one event, in display units.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GridValues {
    pub event_id: Option<String>,
    pub parameter: Option<ShakingType>,
    /// One value per grid point; NaN marks "no data"
    pub values: Vec<f64>,
}

impl GridValues {
    /// Finite values only.
    pub fn finite(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter(|v| v.is_finite())
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.finite().reduce(f64::max)
    }
}

/// Grid points plus their current values.
#[derive(Debug, Default)]
pub struct ShakeMap {
    pub points: Vec<GridPoint>,
    values: RwLock<Arc<GridValues>>,
}

impl ShakeMap {
    #[must_use]
    pub fn new(points: Vec<GridPoint>) -> Self {
        let values = GridValues {
            values: vec![f64::NAN; points.len()],
            ..GridValues::default()
        };
        Self {
            points,
            values: RwLock::new(Arc::new(values)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<GridValues> {
        let guard = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn publish(&self, values: GridValues) {
        let mut guard = self.values.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(values);
    }
}

/// Strip comments and surrounding whitespace.
fn content(line: &str) -> &str {
    line.split('#').next().unwrap_or_default().trim()
}

fn parse_fields(fields: &[&str], path: &Path, line: usize) -> Result<Vec<f64>, QuakeError> {
    fields
        .iter()
        .map(|f| {
            f.trim().parse::<f64>().map_err(|e| QuakeError::InvalidPoint {
                path: path.to_path_buf(),
                line,
                reason: format!("'{}': {e}", f.trim()),
            })
        })
        .collect()
}

/// Parse `name,lon,lat,alt,amp` lines. Lines with another field count are
/// skipped.
///
/// # Errors
///
/// Returns [`QuakeError::InvalidPoint`] when a numeric field does not parse.
pub fn parse_targets(text: &str, path: &Path) -> Result<Vec<Target>, QuakeError> {
    let mut targets = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = content(raw);
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let [name, rest @ ..] = fields.as_slice() else {
            continue;
        };
        if rest.len() != 4 {
            tracing::debug!("{}:{}: expected 5 fields, skipping", path.display(), i + 1);
            continue;
        }
        let v = parse_fields(rest, path, i + 1)?;
        targets.push(Target::new(name.trim(), v[1], v[0], v[2], v[3]));
    }
    Ok(targets)
}

/// Load a target or station file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains invalid numbers.
pub fn load_targets(path: &Path) -> Result<Vec<Arc<Target>>, QuakeError> {
    let text = std::fs::read_to_string(path).map_err(|e| QuakeError::io(path, e))?;
    let targets = parse_targets(&text, path)?;
    tracing::info!("loaded {} points from {}", targets.len(), path.display());
    Ok(targets.into_iter().map(Arc::new).collect())
}

/// Parse `lon,lat,alt,amp` grid lines. Malformed lines, headers included,
/// are skipped.
#[must_use]
pub fn parse_grid(text: &str) -> Vec<GridPoint> {
    text.lines()
        .map(content)
        .filter_map(|line| {
            let v: Vec<f64> = line
                .split(',')
                .map(|f| f.trim().parse::<f64>())
                .collect::<Result<_, _>>()
                .ok()?;
            match v.as_slice() {
                &[longitude, latitude, altitude, amplification] => Some(GridPoint {
                    latitude,
                    longitude,
                    altitude,
                    amplification,
                }),
                _ => None,
            }
        })
        .collect()
}

/// Load a shake-map grid file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_grid(path: &Path) -> Result<ShakeMap, QuakeError> {
    let text = std::fs::read_to_string(path).map_err(|e| QuakeError::io(path, e))?;
    let points = parse_grid(&text);
    tracing::info!("loaded {} grid points from {}", points.len(), path.display());
    Ok(ShakeMap::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_targets() {
        let text = "# name,lon,lat,alt,amp\nZurich,8.54,47.37,408,1.2\n\nBern, 7.45, 46.95, 540, 1.0 # capital\nbroken,1,2\n";
        let targets = parse_targets(text, Path::new("targets.csv")).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].name, "Zurich");
        assert!((targets[0].latitude - 47.37).abs() < f64::EPSILON);
        assert!((targets[0].longitude - 8.54).abs() < f64::EPSILON);
        assert!((targets[1].amplification - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_targets_rejects_bad_number() {
        let err = parse_targets("A,8.0,x,0,1\n", Path::new("t.csv")).unwrap_err();
        assert!(matches!(err, QuakeError::InvalidPoint { line: 1, .. }));
    }

    #[test]
    fn test_parse_grid_skips_malformed() {
        let text = "lon,lat,alt,amp\n8.0,46.0,0,1.5\n8.1,46.0,0\n8.2,46.0,10,2.0\n";
        let grid = parse_grid(text);
        assert_eq!(grid.len(), 2);
        assert!((grid[1].longitude - 8.2).abs() < f64::EPSILON);
        assert!((grid[1].altitude - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_replaced_whole() {
        let target = Target::new("T", 46.0, 8.0, 0.0, 760.0);
        let before = target.snapshot();
        assert!(before.event_id.is_none());

        let mut state = PointState::for_event("e1");
        state.values.insert(ShakingType::Pga, Shaking::new(1.0, 0.5, 2.0));
        target.publish(state);

        // Old readers keep their generation
        assert!(before.values.is_empty());
        let after = target.snapshot();
        assert_eq!(after.event_id.as_deref(), Some("e1"));
        assert_eq!(after.get(ShakingType::Pga), Some(&Shaking::new(1.0, 0.5, 2.0)));
    }

    #[test]
    fn test_shake_map_starts_without_data() {
        let map = ShakeMap::new(parse_grid("8,46,0,1\n8.1,46,0,1\n"));
        assert_eq!(map.len(), 2);
        let values = map.snapshot();
        assert!(values.values.iter().all(|v| v.is_nan()));
        assert_eq!(values.max(), None);
    }
}
