//! Ground motion read from precomputed magnitude/distance tables.
//!
//! The data directory holds `pga`, `pgv`, `psa{i}` and `drs{i}` tables, where
//! `i` indexes the configured period list. Each comes as three files:
//! `<name>.inp` (expected), `<name>_84.inp` and `<name>_16.inp`. Values are
//! interpolated at (magnitude, hypocentral km) and multiplied by the site
//! amplification.

use std::path::Path;

use crate::attenuation::{period_index, Drs, Pga, Pgv, Psa, Site, Source};
use crate::errors::ModelError;
use crate::float_table::FloatTable;
use crate::shaking::{Shaking, ShakingType};

pub const SUFFIX_EXPECTED: &str = ".inp";
pub const SUFFIX_PERCENTILE_84: &str = "_84.inp";
pub const SUFFIX_PERCENTILE_16: &str = "_16.inp";

/// The three tables of one measure. A component whose file is absent or
/// unreadable evaluates to NaN.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    expected: Option<FloatTable>,
    percentile84: Option<FloatTable>,
    percentile16: Option<FloatTable>,
}

fn load_one(path: &Path) -> Option<FloatTable> {
    if !path.is_file() {
        tracing::debug!("lookup table {} not present", path.display());
        return None;
    }
    match FloatTable::load(path) {
        Ok(table) => Some(table),
        Err(e) => {
            tracing::error!("lookup table unavailable: {e}");
            None
        }
    }
}

impl TableSet {
    /// Load `<base>.inp`, `<base>_84.inp` and `<base>_16.inp` from `dir`.
    #[must_use]
    pub fn load(dir: &Path, base: &str) -> Self {
        Self {
            expected: load_one(&dir.join(format!("{base}{SUFFIX_EXPECTED}"))),
            percentile84: load_one(&dir.join(format!("{base}{SUFFIX_PERCENTILE_84}"))),
            percentile16: load_one(&dir.join(format!("{base}{SUFFIX_PERCENTILE_16}"))),
        }
    }

    #[must_use]
    pub fn from_tables(expected: FloatTable, percentile16: FloatTable, percentile84: FloatTable) -> Self {
        Self {
            expected: Some(expected),
            percentile84: Some(percentile84),
            percentile16: Some(percentile16),
        }
    }

    /// True when the expected-value table is loaded.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.expected.is_some()
    }

    #[must_use]
    pub fn evaluate(&self, magnitude: f64, distance_km: f64, amplification: f64) -> Shaking {
        let at = |table: &Option<FloatTable>| {
            table
                .as_ref()
                .map_or(f64::NAN, |t| t.interpolate(magnitude, distance_km) * amplification)
        };
        Shaking::new(at(&self.expected), at(&self.percentile16), at(&self.percentile84))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    /// Configured periods, whether or not their tables loaded
    configured: Vec<f64>,
    pga: TableSet,
    pgv: TableSet,
    /// Periods with a loaded PSA table, in configuration order
    psa_periods: Vec<f64>,
    psa: Vec<TableSet>,
    drs_periods: Vec<f64>,
    drs: Vec<TableSet>,
}

impl LookupTable {
    /// Load all tables from `dir`. Spectral tables are looked up for every
    /// index of `periods`; missing ones are skipped.
    #[must_use]
    pub fn load(dir: &Path, periods: &[f64]) -> Self {
        let mut table = Self {
            configured: periods.to_vec(),
            pga: TableSet::load(dir, ShakingType::Pga.as_str()),
            pgv: TableSet::load(dir, ShakingType::Pgv.as_str()),
            ..Self::default()
        };

        for (i, period) in periods.iter().enumerate() {
            let psa = TableSet::load(dir, &format!("{}{i}", ShakingType::Psa.as_str()));
            if psa.is_available() {
                table.psa_periods.push(*period);
                table.psa.push(psa);
            }
            let drs = TableSet::load(dir, &format!("{}{i}", ShakingType::Drs.as_str()));
            if drs.is_available() {
                table.drs_periods.push(*period);
                table.drs.push(drs);
            }
        }

        tracing::info!(
            "lookup tables from {}: pga={} pgv={} psa={} drs={}",
            dir.display(),
            table.pga.is_available(),
            table.pgv.is_available(),
            table.psa.len(),
            table.drs.len()
        );
        table
    }

    /// Index of `period` among the loaded ones. A configured period whose
    /// table is missing is reported as unavailable.
    fn index(&self, loaded: &[f64], period: f64) -> Result<usize, ModelError> {
        period_index(loaded, period).map_err(|e| {
            if period_index(&self.configured, period).is_ok() {
                ModelError::Unavailable
            } else {
                e
            }
        })
    }

    /// Build from in-memory table sets.
    #[must_use]
    pub fn with_tables(pga: TableSet, pgv: TableSet, psa: Vec<(f64, TableSet)>, drs: Vec<(f64, TableSet)>) -> Self {
        let mut configured: Vec<f64> = psa.iter().chain(&drs).map(|(p, _)| *p).collect();
        configured.sort_by(f64::total_cmp);
        configured.dedup();
        let (psa_periods, psa) = psa.into_iter().unzip();
        let (drs_periods, drs) = drs.into_iter().unzip();
        Self {
            configured,
            pga,
            pgv,
            psa_periods,
            psa,
            drs_periods,
            drs,
        }
    }
}

impl Pga for LookupTable {
    fn pga(&self, source: &Source, site: &Site<'_>) -> Shaking {
        self.pga.evaluate(source.magnitude, source.hypocentral_distance_km(site), site.amplification)
    }
}

impl Pgv for LookupTable {
    fn pgv(&self, source: &Source, site: &Site<'_>) -> Shaking {
        self.pgv.evaluate(source.magnitude, source.hypocentral_distance_km(site), site.amplification)
    }
}

impl Psa for LookupTable {
    fn periods(&self) -> &[f64] {
        &self.psa_periods
    }

    fn psa(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError> {
        let i = self.index(&self.psa_periods, period)?;
        Ok(self.psa[i].evaluate(source.magnitude, source.hypocentral_distance_km(site), site.amplification))
    }
}

impl Drs for LookupTable {
    fn drs(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError> {
        let i = self.index(&self.drs_periods, period)?;
        Ok(self.drs[i].evaluate(source.magnitude, source.hypocentral_distance_km(site), site.amplification))
    }
}
