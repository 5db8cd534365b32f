//! Event filtering applied before events reach the calculator.

use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Combined filter criteria. Unset criteria accept every event.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    pub minimum_magnitude: Option<f64>,
    /// Events without a likelihood always pass this check
    pub minimum_likelihood: Option<f64>,
}

impl EventFilter {
    /// Check if an event passes all filter criteria.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        self.check_magnitude(event) && self.check_likelihood(event)
    }

    fn check_magnitude(&self, event: &Event) -> bool {
        match self.minimum_magnitude {
            None => true,
            Some(min) => event.magnitude >= min,
        }
    }

    fn check_likelihood(&self, event: &Event) -> bool {
        match (self.minimum_likelihood, event.likelihood) {
            (Some(min), Some(likelihood)) => likelihood >= min,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(magnitude: f64, likelihood: Option<f64>) -> Event {
        let mut e = Event::new("f", 0, 46.0, 8.0, 10_000.0, magnitude);
        e.likelihood = likelihood;
        e
    }

    #[test]
    fn test_default_accepts_everything() {
        assert!(EventFilter::default().matches(&event(0.5, Some(0.0))));
    }

    #[test]
    fn test_minimum_magnitude() {
        let filter = EventFilter {
            minimum_magnitude: Some(3.0),
            ..EventFilter::default()
        };
        assert!(filter.matches(&event(3.0, None)));
        assert!(!filter.matches(&event(2.9, None)));
    }

    #[test]
    fn test_minimum_likelihood() {
        let filter = EventFilter {
            minimum_likelihood: Some(0.5),
            ..EventFilter::default()
        };
        assert!(filter.matches(&event(4.0, Some(0.8))));
        assert!(!filter.matches(&event(4.0, Some(0.2))));
        assert!(filter.matches(&event(4.0, None)));
    }

    #[test]
    fn test_parse_from_json() {
        let filter: EventFilter = serde_json::from_str(r#"{"minimum_magnitude": 2.5}"#).unwrap();
        assert_eq!(filter.minimum_magnitude, Some(2.5));
        assert_eq!(filter.minimum_likelihood, None);
    }
}
