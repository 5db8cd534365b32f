//! Wave arrival timing: S-wave ETA at a site and P/S wavefront radii.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::attenuation::Site;
use crate::event::Event;
use crate::geodesy;

// ============================================================================
// Velocity model
// ============================================================================

/// Homogeneous half-space used for countdowns and wave circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveModel {
    /// P-wave velocity in km/s
    pub vp: f64,
    /// S-wave velocity in km/s
    pub vs: f64,
    /// Epicentral radius inside which no warning is possible
    pub blind_zone_radius_km: f64,
}

impl Default for WaveModel {
    fn default() -> Self {
        Self {
            vp: 5.5,
            vs: 3.3,
            blind_zone_radius_km: 40.0,
        }
    }
}

/// Surface radii of both wavefronts at one instant. `None` while a front is
/// still underground or has passed the antipode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaveFronts {
    pub elapsed_s: f64,
    pub p_radius_m: Option<f64>,
    pub s_radius_m: Option<f64>,
}

/// Arrival summary for one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrival {
    /// Cartesian hypocentral distance in km
    pub hypocentral_km: f64,
    /// Great-circle epicentral distance in km
    pub epicentral_km: f64,
    pub s_eta: Option<DateTime<Utc>>,
    /// Seconds left until the S wave arrives; negative once it has passed
    pub countdown_s: Option<f64>,
    pub blind_zone: bool,
}

impl WaveModel {
    /// S-wave travel time in seconds over `distance_m`.
    #[must_use]
    pub fn s_travel_time(&self, distance_m: f64) -> f64 {
        distance_m / (self.vs * 1000.0)
    }

    /// Absolute S-wave arrival time at `site`.
    #[must_use]
    pub fn s_wave_eta(&self, event: &Event, site: &Site<'_>) -> Option<DateTime<Utc>> {
        let origin = event.origin_time()?;
        let travel = self.s_travel_time(event.source().hypocentral_distance_to(site));
        if !travel.is_finite() {
            return None;
        }
        // Millisecond resolution matches the event clock
        #[allow(clippy::cast_possible_truncation)]
        let millis = (travel * 1000.0).round() as i64;
        origin.checked_add_signed(Duration::milliseconds(millis))
    }

    /// Wavefront surface radii `elapsed_s` seconds after origin.
    #[must_use]
    pub fn wave_fronts(&self, event: &Event, elapsed_s: f64) -> WaveFronts {
        let radius = |v: f64| {
            let r = geodesy::seismic_wave_surface_distance_at(
                event.latitude,
                event.depth,
                v * 1000.0 * elapsed_s,
            );
            (r > 0.0).then_some(r)
        };
        WaveFronts {
            elapsed_s,
            p_radius_m: radius(self.vp),
            s_radius_m: radius(self.vs),
        }
    }

    /// True when the site lies inside the blind zone around the epicenter.
    #[must_use]
    pub fn in_blind_zone(&self, event: &Event, site: &Site<'_>) -> bool {
        epicentral_km(event, site) <= self.blind_zone_radius_km
    }

    /// Timing summary for `site`, with the countdown taken against `now`.
    #[must_use]
    pub fn arrival(&self, event: &Event, site: &Site<'_>, now: DateTime<Utc>) -> Arrival {
        let s_eta = self.s_wave_eta(event, site);
        Arrival {
            hypocentral_km: event.source().hypocentral_distance_km(site),
            epicentral_km: epicentral_km(event, site),
            s_eta,
            countdown_s: s_eta.map(|eta| seconds_until(eta, now)),
            blind_zone: self.in_blind_zone(event, site),
        }
    }
}

/// Great-circle distance from the epicenter in km.
#[must_use]
pub fn epicentral_km(event: &Event, site: &Site<'_>) -> f64 {
    geodesy::haversine(event.latitude, event.longitude, site.latitude, site.longitude) / 1000.0
}

/// Signed seconds from `now` until `eta`.
#[must_use]
pub fn seconds_until(eta: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let millis = (eta - now).num_milliseconds() as f64;
    millis / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        Event::new("ev", 1_700_000_000_000, 46.0, 8.0, 10_000.0, 6.0)
    }

    fn site(lat: f64, lon: f64) -> Site<'static> {
        Site {
            latitude: lat,
            longitude: lon,
            elevation_m: 0.0,
            amplification_type: "vs30",
            amplification: 760.0,
        }
    }

    #[test]
    fn test_s_eta_above_hypocenter() {
        let model = WaveModel::default();
        let ev = event();
        let eta = model.s_wave_eta(&ev, &site(46.0, 8.0)).unwrap();
        let dt = seconds_until(eta, ev.origin_time().unwrap());
        // 10 km straight up at 3.3 km/s
        assert!((dt - 10.0 / 3.3).abs() < 0.01, "dt {dt}");
    }

    #[test]
    fn test_countdown_sign() {
        let model = WaveModel::default();
        let ev = event();
        let origin = ev.origin_time().unwrap();
        let far = site(47.0, 8.0);

        let before = model.arrival(&ev, &far, origin);
        assert!(before.countdown_s.unwrap() > 0.0);
        assert!(!before.blind_zone);
        assert!((before.epicentral_km - 111.2).abs() < 1.0);

        let later = model.arrival(&ev, &far, origin + Duration::seconds(120));
        assert!(later.countdown_s.unwrap() < 0.0);
    }

    #[test]
    fn test_blind_zone() {
        let model = WaveModel::default();
        assert!(model.in_blind_zone(&event(), &site(46.1, 8.1)));
        assert!(!model.in_blind_zone(&event(), &site(46.5, 8.0)));
    }

    #[test]
    fn test_wave_fronts() {
        let model = WaveModel::default();
        let ev = event();

        // P front still underground after 1 s (5.5 km < 10 km depth)
        let early = model.wave_fronts(&ev, 1.0);
        assert_eq!(early.p_radius_m, None);
        assert_eq!(early.s_radius_m, None);

        let t = 10.0;
        let fronts = model.wave_fronts(&ev, t);
        let p = fronts.p_radius_m.unwrap();
        let s = fronts.s_radius_m.unwrap();
        assert!(p > s);
        // Flat-earth check for the P front
        let flat = (55_000.0_f64.powi(2) - 10_000.0_f64.powi(2)).sqrt();
        assert!((p - flat).abs() / flat < 0.01, "p {p} flat {flat}");
    }
}
