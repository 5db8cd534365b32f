//! Shaking values and the shaking-type taxonomy.

use serde::{Deserialize, Serialize};

/// Standard gravity in m/s², used to express accelerations in %g.
pub const EARTH_ACCELERATION: f64 = 9.807;

/// Expected value with 16th and 84th percentile bounds.
///
/// Units are canonical SI per [`ShakingType`]: m/s² for PGA and PSA, m/s for
/// PGV, m for DRS, and intensity units for Intensity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Shaking {
    pub expected: f64,
    pub percentile16: f64,
    pub percentile84: f64,
}

impl Shaking {
    #[must_use]
    pub const fn new(expected: f64, percentile16: f64, percentile84: f64) -> Self {
        Self {
            expected,
            percentile16,
            percentile84,
        }
    }

    /// Build a triple from a base-10 log median and a base-10 sigma.
    #[must_use]
    pub fn from_log10(log_median: f64, sigma: f64) -> Self {
        Self::new(
            10f64.powf(log_median),
            10f64.powf(log_median - sigma),
            10f64.powf(log_median + sigma),
        )
    }

    /// Build a triple from a natural-log median and a natural-log sigma.
    #[must_use]
    pub fn from_ln(ln_median: f64, sigma: f64) -> Self {
        Self::new(
            ln_median.exp(),
            (ln_median - sigma).exp(),
            (ln_median + sigma).exp(),
        )
    }

    /// Triple of NaN, used when a site class is undefined.
    #[must_use]
    pub const fn undefined() -> Self {
        Self::new(f64::NAN, f64::NAN, f64::NAN)
    }

    /// Multiply all three components by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(
            self.expected * factor,
            self.percentile16 * factor,
            self.percentile84 * factor,
        )
    }

    /// Component-wise arithmetic mean of two triples.
    #[must_use]
    pub fn mean(a: Self, b: Self) -> Self {
        Self::new(
            0.5 * (a.expected + b.expected),
            0.5 * (a.percentile16 + b.percentile16),
            0.5 * (a.percentile84 + b.percentile84),
        )
    }

    /// Apply `f` to each component.
    #[must_use]
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.expected), f(self.percentile16), f(self.percentile84))
    }

    /// True when `percentile16 <= expected <= percentile84`.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.percentile16 <= self.expected && self.expected <= self.percentile84
    }
}

/// One point on a response spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralValue {
    /// Oscillator period in seconds
    pub period: f64,
    pub shaking: Shaking,
}

/// Shaking measures the engine can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShakingType {
    Pga,
    Pgv,
    Psa,
    Drs,
    Intensity,
}

impl ShakingType {
    pub const ALL: [Self; 5] = [Self::Pga, Self::Pgv, Self::Psa, Self::Drs, Self::Intensity];

    /// Configuration key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pga => "pga",
            Self::Pgv => "pgv",
            Self::Psa => "psa",
            Self::Drs => "drs",
            Self::Intensity => "intensity",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pga => "PGA",
            Self::Pgv => "PGV",
            Self::Psa => "PSA",
            Self::Drs => "DRS",
            Self::Intensity => "Intensity",
        }
    }

    /// Unit used when values are shown to humans or painted on the shake map.
    #[must_use]
    pub const fn display_unit(&self) -> &'static str {
        match self {
            Self::Pga | Self::Psa => "%g",
            Self::Pgv => "cm/s",
            Self::Drs => "cm",
            Self::Intensity => "",
        }
    }

    /// Factor converting the canonical SI value into [`Self::display_unit`].
    #[must_use]
    pub fn display_scale(&self) -> f64 {
        match self {
            Self::Pga | Self::Psa => 100.0 / EARTH_ACCELERATION,
            Self::Pgv | Self::Drs => 100.0,
            Self::Intensity => 1.0,
        }
    }
}

impl std::str::FromStr for ShakingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pga" => Ok(Self::Pga),
            "pgv" => Ok(Self::Pgv),
            "psa" => Ok(Self::Psa),
            "drs" => Ok(Self::Drs),
            "intensity" => Ok(Self::Intensity),
            _ => Err(format!(
                "unknown shaking type: {s} (expected: pga, pgv, psa, drs, intensity)"
            )),
        }
    }
}

impl std::fmt::Display for ShakingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

const ROMAN_NUMBERS: [u32; 13] = [1000, 900, 500, 400, 100, 90, 50, 40, 10, 9, 5, 4, 1];
const ROMAN_LETTERS: [&str; 13] = [
    "M", "CM", "D", "CD", "C", "XC", "L", "XL", "X", "IX", "V", "IV", "I",
];

/// Roman numeral for an intensity class; values outside 1..=3999 fall back
/// to decimal.
#[must_use]
pub fn roman_numeral(n: i64) -> String {
    let Ok(mut rest) = u32::try_from(n) else {
        return n.to_string();
    };
    if !(1..=3999).contains(&rest) {
        return n.to_string();
    }

    let mut roman = String::new();
    for (value, letters) in ROMAN_NUMBERS.iter().zip(ROMAN_LETTERS) {
        while rest >= *value {
            roman.push_str(letters);
            rest -= value;
        }
    }
    roman
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero_triple() {
        let s = Shaking::default();
        assert_eq!(s, Shaking::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_shaking_type_parse() {
        assert_eq!("pga".parse::<ShakingType>().unwrap(), ShakingType::Pga);
        assert_eq!("PSA".parse::<ShakingType>().unwrap(), ShakingType::Psa);
        assert_eq!(
            "Intensity".parse::<ShakingType>().unwrap(),
            ShakingType::Intensity
        );
        assert!("sa".parse::<ShakingType>().is_err());
    }

    #[test]
    fn test_keys_and_labels() {
        for t in ShakingType::ALL {
            assert_eq!(t.as_str().parse::<ShakingType>().unwrap(), t);
        }
        assert_eq!(ShakingType::Drs.label(), "DRS");
        assert_eq!(ShakingType::Intensity.to_string(), "Intensity");
    }

    #[test]
    fn test_from_log10_ordering() {
        let s = Shaking::from_log10(-1.0, 0.3);
        assert!((s.expected - 0.1).abs() < 1e-12);
        assert!(s.is_ordered());
        assert!((s.percentile84 / s.expected - 10f64.powf(0.3)).abs() < 1e-12);
    }

    #[test]
    fn test_mean_component_wise() {
        let m = Shaking::mean(Shaking::new(1.0, 0.5, 2.0), Shaking::new(3.0, 1.5, 4.0));
        assert_eq!(m, Shaking::new(2.0, 1.0, 3.0));
    }

    #[test]
    fn test_display_scale() {
        assert!((ShakingType::Pga.display_scale() * EARTH_ACCELERATION - 100.0).abs() < 1e-9);
        assert!((ShakingType::Pgv.display_scale() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roman_numeral() {
        assert_eq!(roman_numeral(1), "I");
        assert_eq!(roman_numeral(4), "IV");
        assert_eq!(roman_numeral(9), "IX");
        assert_eq!(roman_numeral(12), "XII");
        assert_eq!(roman_numeral(0), "0");
        assert_eq!(roman_numeral(-3), "-3");
    }
}
