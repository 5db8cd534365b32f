//! Output formatters for point results, pass reports and distances.
//!
//! Supports human-readable (with colors), JSON, and NDJSON formats.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::arrival::{Arrival, WaveFronts};
use crate::calculator::PassReport;
use crate::points::{GridValues, PointState, Target};
use crate::shaking::{Shaking, ShakingType, roman_numeral};

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

// Intensity-based colors
const RED: &str = "\x1b[91m"; // VIII and above
const YELLOW: &str = "\x1b[93m"; // VI-VII
const CYAN: &str = "\x1b[96m"; // IV-V
const GREEN: &str = "\x1b[92m"; // II-III
const WHITE: &str = "\x1b[97m"; // not felt or unknown

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// JSON array
    Json,
    /// Newline-delimited JSON (one object per line)
    Ndjson,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ndjson" => Ok(Self::Ndjson),
            _ => Err(format!("unknown format: {s} (expected: human, json, ndjson)")),
        }
    }
}

/// Whether a point is a target or a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Target,
    Station,
}

/// One point and its latest results, as written out.
#[derive(Debug, Clone, Serialize)]
pub struct PointRow<'a> {
    pub name: &'a str,
    pub kind: PointKind,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub state: &'a PointState,
}

impl<'a> PointRow<'a> {
    #[must_use]
    pub fn new(target: &'a Target, kind: PointKind, state: &'a PointState) -> Self {
        Self {
            name: &target.name,
            kind,
            latitude: target.latitude,
            longitude: target.longitude,
            state,
        }
    }
}

/// Distances and S-wave timing between an event and a location.
#[derive(Debug, Clone, Serialize)]
pub struct DistanceRow {
    pub event_id: String,
    /// Degree-scaled distance used by most models
    pub distance_km: f64,
    #[serde(flatten)]
    pub arrival: Arrival,
    pub origin_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wave_fronts: Option<WaveFronts>,
}

/// Intensity class: the value rounded half up.
#[must_use]
pub fn intensity_class(intensity: f64) -> Option<i64> {
    if !intensity.is_finite() {
        return None;
    }
    // Intensities are small; the cast cannot truncate
    #[allow(clippy::cast_possible_truncation)]
    let class = (intensity + 0.5).floor() as i64;
    Some(class)
}

fn intensity_color(intensity: Option<&Shaking>) -> &'static str {
    match intensity.and_then(|s| intensity_class(s.expected)) {
        Some(i) if i >= 8 => RED,
        Some(i) if i >= 6 => YELLOW,
        Some(i) if i >= 4 => CYAN,
        Some(i) if i >= 2 => GREEN,
        _ => WHITE,
    }
}

/// Human rendering of a single value: Roman numerals for intensity, display
/// units with the 16-84 range for everything else.
#[must_use]
pub fn format_value(kind: ShakingType, shaking: &Shaking) -> String {
    if kind == ShakingType::Intensity {
        return match intensity_class(shaking.expected) {
            Some(class) => format!("{} ({:.1})", roman_numeral(class), shaking.expected),
            None => "-".to_string(),
        };
    }
    if !shaking.expected.is_finite() {
        return "-".to_string();
    }

    let s = shaking.scaled(kind.display_scale());
    format!(
        "{:.3} {} [{:.3}..{:.3}]",
        s.expected,
        kind.display_unit(),
        s.percentile16,
        s.percentile84
    )
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> io::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write point results in human-readable format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_points_human<W: Write>(writer: &mut W, rows: &[PointRow<'_>]) -> io::Result<()> {
    for row in rows {
        let state = row.state;
        let color = intensity_color(state.get(ShakingType::Intensity));
        let kind = match row.kind {
            PointKind::Target => "target",
            PointKind::Station if state.triggered => "station*",
            PointKind::Station => "station",
        };

        let values: Vec<String> = state
            .values
            .iter()
            .map(|(kind, shaking)| format!("{} {}", kind.label(), format_value(*kind, shaking)))
            .collect();
        let values = if values.is_empty() {
            format!("{DIM}no data{RESET}")
        } else {
            values.join(" │ ")
        };

        writeln!(
            writer,
            "{color}{BOLD}{:<16}{RESET} {DIM}{kind:8} {:>7.3} {:>8.3}{RESET} │ {values}",
            row.name, row.latitude, row.longitude
        )?;

        if !state.spectrum.is_empty() {
            let curve: Vec<String> = state
                .spectrum
                .iter()
                .map(|v| format!("{}s={:.4}", v.period, v.shaking.expected))
                .collect();
            writeln!(writer, "{DIM}{:16} spectrum {}{RESET}", "", curve.join(" "))?;
        }
    }
    Ok(())
}

/// Write point results in the specified format.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_points<W: Write>(writer: &mut W, rows: &[PointRow<'_>], format: Format) -> io::Result<()> {
    match format {
        Format::Human => write_points_human(writer, rows),
        Format::Json => writeln!(writer, "{}", to_json(rows, true)?),
        Format::Ndjson => {
            for row in rows {
                writeln!(writer, "{}", to_json(row, false)?)?;
            }
            Ok(())
        }
    }
}

/// Write one pass report.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_report<W: Write>(writer: &mut W, report: &PassReport, format: Format) -> io::Result<()> {
    match format {
        Format::Human => {
            let skipped = if report.superseded > 0 {
                format!(" {DIM}(+{} superseded){RESET}", report.superseded)
            } else {
                String::new()
            };
            let map = match report.shake_map_ok {
                Some(true) => format!(
                    " │ map max {}",
                    report.max_grid_value.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"))
                ),
                Some(false) => format!(" │ {YELLOW}map unavailable{RESET}"),
                None => String::new(),
            };
            writeln!(
                writer,
                "{BOLD}{}{RESET} M{:.1} │ {} targets │ {} stations{map} │ {DIM}{:.1} ms{RESET}{skipped}",
                report.event_id, report.magnitude, report.targets, report.stations, report.elapsed_ms
            )
        }
        Format::Json => writeln!(writer, "{}", to_json(report, true)?),
        Format::Ndjson => writeln!(writer, "{}", to_json(report, false)?),
    }
}

/// Write one pass report and flush, for streaming output.
///
/// # Errors
///
/// Returns the first write or flush error.
pub fn emit_report<W: Write>(writer: &mut W, report: &PassReport, format: Format) -> io::Result<()> {
    write_report(writer, report, format)?;
    writer.flush()
}

/// Write a summary of the shake-map values.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_grid_summary<W: Write>(writer: &mut W, grid: &GridValues, format: Format) -> io::Result<()> {
    #[derive(Serialize)]
    struct Summary<'a> {
        event_id: Option<&'a str>,
        parameter: Option<ShakingType>,
        points: usize,
        with_data: usize,
        min: Option<f64>,
        max: Option<f64>,
    }

    let finite: Vec<f64> = grid.finite().collect();
    let summary = Summary {
        event_id: grid.event_id.as_deref(),
        parameter: grid.parameter,
        points: grid.values.len(),
        with_data: finite.len(),
        min: finite.iter().copied().reduce(f64::min),
        max: grid.max(),
    };

    match format {
        Format::Human => {
            let label = grid.parameter.map_or("-", |p| p.label());
            let unit = grid.parameter.map_or("", |p| p.display_unit());
            match (summary.min, summary.max) {
                (Some(min), Some(max)) => writeln!(
                    writer,
                    "shake map {label}: {}/{} points, {min:.3}..{max:.3} {unit}",
                    summary.with_data, summary.points
                ),
                _ => writeln!(writer, "shake map {label}: {DIM}no data{RESET}"),
            }
        }
        Format::Json => writeln!(writer, "{}", to_json(&summary, true)?),
        Format::Ndjson => writeln!(writer, "{}", to_json(&summary, false)?),
    }
}

/// Write distances between an event and a location.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_distance<W: Write>(writer: &mut W, row: &DistanceRow, format: Format) -> io::Result<()> {
    match format {
        Format::Human => {
            let a = &row.arrival;
            writeln!(writer, "{BOLD}{}{RESET}", row.event_id)?;
            writeln!(writer, "  hypocentral  {:>10.3} km", a.hypocentral_km)?;
            writeln!(writer, "  model        {:>10.3} km", row.distance_km)?;
            writeln!(writer, "  epicentral   {:>10.3} km", a.epicentral_km)?;
            if let Some(eta) = a.s_eta {
                let travel = row
                    .origin_time
                    .map(|o| crate::arrival::seconds_until(eta, o))
                    .unwrap_or(f64::NAN);
                writeln!(
                    writer,
                    "  S arrival    {} UTC (+{travel:.2} s)",
                    eta.format("%Y-%m-%d %H:%M:%S%.3f")
                )?;
            }
            if a.blind_zone {
                writeln!(writer, "  {YELLOW}inside blind zone{RESET}")?;
            }
            if let Some(fronts) = &row.wave_fronts {
                let km = |r: Option<f64>| r.map_or_else(|| "-".to_string(), |r| format!("{:.1} km", r / 1000.0));
                writeln!(
                    writer,
                    "  at +{:.1} s   P {} │ S {}",
                    fronts.elapsed_s,
                    km(fronts.p_radius_m),
                    km(fronts.s_radius_m)
                )?;
            }
            Ok(())
        }
        Format::Json => writeln!(writer, "{}", to_json(row, true)?),
        Format::Ndjson => writeln!(writer, "{}", to_json(row, false)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("human".parse::<Format>().unwrap(), Format::Human);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("NDJSON".parse::<Format>().unwrap(), Format::Ndjson);
        assert!("invalid".parse::<Format>().is_err());
    }

    #[test]
    fn test_intensity_class_rounds_half_up() {
        assert_eq!(intensity_class(5.49), Some(5));
        assert_eq!(intensity_class(5.5), Some(6));
        assert_eq!(intensity_class(f64::NAN), None);
    }

    #[test]
    fn test_format_value() {
        let pga = Shaking::new(0.9807, 0.49035, 1.9614);
        assert_eq!(format_value(ShakingType::Pga, &pga), "10.000 %g [5.000..20.000]");
        let i = Shaking::new(6.6, 6.0, 7.2);
        assert_eq!(format_value(ShakingType::Intensity, &i), "VII (6.6)");
        assert_eq!(format_value(ShakingType::Pgv, &Shaking::undefined()), "-");
    }

    #[test]
    fn test_points_json_flattens_state() {
        let target = Target::new("Bern", 46.95, 7.45, 540.0, 1.0);
        let mut state = PointState::for_event("ev");
        state.values.insert(ShakingType::Pga, Shaking::new(1.0, 0.5, 2.0));
        let rows = [PointRow::new(&target, PointKind::Target, &state)];

        let mut out = Vec::new();
        write_points(&mut out, &rows, Format::Ndjson).unwrap();
        let line = String::from_utf8(out).unwrap();
        let v: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(v["name"], "Bern");
        assert_eq!(v["kind"], "target");
        assert_eq!(v["event_id"], "ev");
        assert_eq!(v["values"]["pga"]["expected"], 1.0);
    }

    #[test]
    fn test_grid_summary_without_data() {
        let grid = GridValues {
            event_id: Some("ev".into()),
            parameter: Some(ShakingType::Pga),
            values: vec![f64::NAN, f64::NAN],
        };
        let mut out = Vec::new();
        write_grid_summary(&mut out, &grid, Format::Human).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("no data"));
    }

    /// Accepts writes, fails every flush.
    struct Unflushable(Vec<u8>);

    impl Write for Unflushable {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn report() -> PassReport {
        PassReport {
            event_id: "ev".into(),
            magnitude: 5.5,
            superseded: 2,
            targets: 3,
            stations: 0,
            grid_points: 0,
            shake_map_ok: None,
            max_grid_value: None,
            elapsed_ms: 1.5,
        }
    }

    #[test]
    fn test_emit_report_surfaces_flush_errors() {
        let mut out = Unflushable(Vec::new());
        let err = emit_report(&mut out, &report(), Format::Ndjson).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        // The line was written before the flush failed
        let v: serde_json::Value = serde_json::from_slice(out.0.trim_ascii()).unwrap();
        assert_eq!(v["event_id"], "ev");
        assert_eq!(v["superseded"], 2);
    }

    #[test]
    fn test_emit_report_human() {
        let mut out = Vec::new();
        emit_report(&mut out, &report(), Format::Human).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("M5.5"));
        assert!(text.contains("+2 superseded"));
    }
}
