//! Two-dimensional lookup tables with bilinear interpolation.
//!
//! Text format: the first line is the tag `R/M` followed by the column-axis
//! values; every following line is a row-axis value followed by one value
//! per column. Lookup tables store magnitudes along the columns and
//! distances (km) along the rows.

use std::path::Path;

use crate::errors::QuakeError;

/// Tag expected as the first token of a table file.
pub const HEADER_TAG: &str = "R/M";

/// Dense table indexed by sorted column and row keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatTable {
    columns: Vec<f64>,
    rows: Vec<f64>,
    /// `values[row][column]`
    values: Vec<Vec<f64>>,
}

/// Indices of the keys around `x`, clamped at both ends, plus the
/// interpolation ratio between them. `None` for no keys or a NaN `x`.
fn bracket(keys: &[f64], x: f64) -> Option<(usize, usize, f64)> {
    if x.is_nan() {
        return None;
    }
    let last = keys.len().checked_sub(1)?;
    let i = keys.partition_point(|k| *k < x);

    if i <= last && keys[i] == x {
        return Some((i, i, 0.0));
    }
    if i == 0 {
        return Some((0, 0, 0.0));
    }
    if i > last {
        return Some((last, last, 0.0));
    }

    let (lo, hi) = (keys[i - 1], keys[i]);
    Some((i - 1, i, (x - lo) / (hi - lo)))
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t == 0.0 { a } else { a + (b - a) * t }
}

impl FloatTable {
    /// Build a table from column keys and `(row key, values)` pairs.
    ///
    /// Keys may come in any order; they are sorted here.
    ///
    /// # Errors
    ///
    /// Returns a message if a row length does not match the column count or
    /// a key is not finite.
    pub fn from_rows(columns: &[f64], rows: &[(f64, Vec<f64>)]) -> Result<Self, String> {
        if let Some(bad) = columns.iter().chain(rows.iter().map(|(k, _)| k)).find(|k| !k.is_finite()) {
            return Err(format!("axis value {bad} is not finite"));
        }

        let mut col_order: Vec<usize> = (0..columns.len()).collect();
        col_order.sort_by(|a, b| columns[*a].total_cmp(&columns[*b]));

        let mut sorted_rows: Vec<&(f64, Vec<f64>)> = rows.iter().collect();
        sorted_rows.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut values = Vec::with_capacity(rows.len());
        for (key, row) in &sorted_rows {
            if row.len() != columns.len() {
                return Err(format!(
                    "row {key} has {} values, expected {}",
                    row.len(),
                    columns.len()
                ));
            }
            values.push(col_order.iter().map(|&c| row[c]).collect());
        }

        Ok(Self {
            columns: col_order.iter().map(|&c| columns[c]).collect(),
            rows: sorted_rows.iter().map(|(k, _)| *k).collect(),
            values,
        })
    }

    /// Parse a table from text. `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`QuakeError::Table`] if the header tag is missing or any row
    /// is malformed; the whole table is rejected in that case.
    pub fn parse(text: &str, path: &Path) -> Result<Self, QuakeError> {
        let table_err = |line: usize, reason: String| QuakeError::Table {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (header_line, header) = lines
            .next()
            .ok_or_else(|| table_err(0, "empty file".into()))?;
        let mut tokens = header.split_whitespace();
        if tokens.next() != Some(HEADER_TAG) {
            return Err(table_err(header_line, format!("expected '{HEADER_TAG}' header tag")));
        }
        let columns = tokens
            .map(str::parse::<f64>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| table_err(header_line, format!("invalid header value: {e}")))?;

        let mut rows = Vec::new();
        for (line_no, line) in lines {
            let values = line
                .split_whitespace()
                .map(str::parse::<f64>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| table_err(line_no, format!("invalid value: {e}")))?;
            let Some((key, rest)) = values.split_first() else {
                continue;
            };
            if rest.len() != columns.len() {
                return Err(table_err(
                    line_no,
                    format!("{} values, expected {}", rest.len(), columns.len()),
                ));
            }
            rows.push((*key, rest.to_vec()));
        }

        Self::from_rows(&columns, &rows).map_err(|reason| table_err(0, reason))
    }

    /// Load and parse a table file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, QuakeError> {
        let text = std::fs::read_to_string(path).map_err(|e| QuakeError::io(path, e))?;
        Self::parse(&text, path)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    /// Value stored exactly at `(column, row)`, if both keys exist.
    #[must_use]
    pub fn get(&self, column: f64, row: f64) -> Option<f64> {
        let c = self.columns.iter().position(|k| *k == column)?;
        let r = self.rows.iter().position(|k| *k == row)?;
        Some(self.values[r][c])
    }

    /// Bilinear interpolation at `(column, row)`.
    ///
    /// Interpolates along the row axis first, then along the column axis.
    /// Outside the table the nearest edge value is used. Returns NaN for an
    /// empty table or a NaN coordinate.
    #[must_use]
    pub fn interpolate(&self, column: f64, row: f64) -> f64 {
        let (Some((c0, c1, tc)), Some((r0, r1, tr))) =
            (bracket(&self.columns, column), bracket(&self.rows, row))
        else {
            return f64::NAN;
        };

        let low = lerp(self.values[r0][c0], self.values[r1][c0], tr);
        let high = lerp(self.values[r0][c1], self.values[r1][c1], tr);
        lerp(low, high, tc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> FloatTable {
        // Corners (column, row): (0,0)=1, (0,1)=2, (1,0)=3, (1,1)=4
        FloatTable::from_rows(&[0.0, 1.0], &[(0.0, vec![1.0, 3.0]), (1.0, vec![2.0, 4.0])]).unwrap()
    }

    #[test]
    fn test_bilinear_center() {
        assert_eq!(square().interpolate(0.5, 0.5), 2.5);
    }

    #[test]
    fn test_exact_hits_and_get() {
        let t = square();
        assert_eq!(t.interpolate(0.0, 1.0), 2.0);
        assert_eq!(t.interpolate(1.0, 0.0), 3.0);
        assert_eq!(t.get(1.0, 1.0), Some(4.0));
        assert_eq!(t.get(0.5, 1.0), None);
    }

    #[test]
    fn test_edges_clamp() {
        let t = square();
        assert_eq!(t.interpolate(-5.0, -5.0), 1.0);
        assert_eq!(t.interpolate(9.0, 9.0), 4.0);
        // Beyond the rows but inside the columns
        assert_eq!(t.interpolate(0.5, 9.0), 3.0);
    }

    #[test]
    fn test_empty_table_is_nan() {
        assert!(FloatTable::default().interpolate(1.0, 1.0).is_nan());
    }

    #[test]
    fn test_nan_coordinates_are_nan() {
        let t = square();
        assert!(t.interpolate(f64::NAN, 0.5).is_nan());
        assert!(t.interpolate(0.5, f64::NAN).is_nan());
        assert!(t.interpolate(f64::NAN, f64::NAN).is_nan());
        // Infinite coordinates still clamp
        assert_eq!(t.interpolate(f64::INFINITY, f64::NEG_INFINITY), 3.0);
    }

    #[test]
    fn test_parse_text() {
        let text = "R/M 4.0 5.0 6.0\n10 1 2 3\n\n20 0.5 1 1.5\n";
        let t = FloatTable::parse(text, Path::new("pga.inp")).unwrap();
        assert_eq!(t.get(5.0, 20.0), Some(1.0));
        assert!((t.interpolate(5.5, 15.0) - 1.875).abs() < 1e-12);
    }

    #[test]
    fn test_parse_unsorted_axes() {
        let text = "R/M 6.0 4.0\n20 3 1\n10 6 2\n";
        let t = FloatTable::parse(text, Path::new("t.inp")).unwrap();
        assert_eq!(t.get(4.0, 10.0), Some(2.0));
        assert_eq!(t.get(6.0, 20.0), Some(3.0));
    }

    #[test]
    fn test_parse_rejects_bad_tables() {
        let p = Path::new("bad.inp");
        assert!(FloatTable::parse("M/R 1 2\n1 1 1\n", p).is_err());
        assert!(FloatTable::parse("R/M 1 2\n1 1\n", p).is_err());
        assert!(FloatTable::parse("R/M 1 2\n1 x 2\n", p).is_err());
        assert!(FloatTable::parse("", p).is_err());
    }
}
