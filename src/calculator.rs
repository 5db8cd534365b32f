//! Shaking calculator: evaluates the resolved models for every point of
//! interest and the shake-map grid.
//!
//! [`Engine`] runs a single synchronous pass. [`Calculator`] wraps it in a
//! supervised background task fed by an unbounded queue: when several events
//! are waiting, only the newest one is computed.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::{JoinError, JoinHandle};

use crate::attenuation::{Site, Source};
use crate::config::Config;
use crate::errors::{ModelError, QuakeError};
use crate::event::Event;
use crate::points::{self, GridValues, PointState, ShakeMap, Target};
use crate::registry::{ModelContext, ResolvedModels};
use crate::shaking::{Shaking, ShakingType, SpectralValue};

/// Capacity of the pass-report channel; slow subscribers lag past this.
const REPORT_CHANNEL_CAPACITY: usize = 64;

/// What a pass computes, taken from the configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub amplification_type: String,
    pub control_period: Option<f64>,
    /// Sorted ascending
    pub periods: Vec<f64>,
    pub spectrum_parameter: Option<ShakingType>,
    pub shake_map_parameter: Option<ShakingType>,
}

impl Settings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            amplification_type: config.amplification_type.clone(),
            control_period: config.control_period,
            periods: config.periods.clone(),
            spectrum_parameter: config.spectrum_parameter,
            shake_map_parameter: config.shake_map_parameter,
        }
    }
}

/// Summary of one completed pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassReport {
    pub event_id: String,
    pub magnitude: f64,
    /// Queued events dropped in favour of this one
    pub superseded: usize,
    pub targets: usize,
    pub stations: usize,
    pub grid_points: usize,
    /// `None` when no shake map is configured
    pub shake_map_ok: Option<bool>,
    /// Largest grid value, in display units
    pub max_grid_value: Option<f64>,
    pub elapsed_ms: f64,
}

/// Models, settings and points for one configuration.
#[derive(Debug, Default)]
pub struct Engine {
    pub models: ResolvedModels,
    pub settings: Settings,
    pub targets: Vec<Arc<Target>>,
    pub stations: Vec<Arc<Target>>,
    pub shake_map: Option<Arc<ShakeMap>>,
}

impl Engine {
    #[must_use]
    pub fn new(models: ResolvedModels, settings: Settings) -> Self {
        Self {
            models,
            settings,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_targets(mut self, targets: Vec<Arc<Target>>) -> Self {
        self.targets = targets;
        self
    }

    #[must_use]
    pub fn with_stations(mut self, stations: Vec<Arc<Target>>) -> Self {
        self.stations = stations;
        self
    }

    #[must_use]
    pub fn with_shake_map(mut self, shake_map: ShakeMap) -> Self {
        self.shake_map = Some(Arc::new(shake_map));
        self
    }

    /// Resolve the configured models and load every configured point file.
    ///
    /// # Errors
    ///
    /// Returns an error if a point file cannot be read or parsed. Missing
    /// models only produce warnings.
    pub fn from_config(config: &Config) -> Result<Self, QuakeError> {
        let context = ModelContext {
            lookup_table_dir: config.lookup_table_dir.as_deref(),
            periods: &config.periods,
        };
        let models = ResolvedModels::from_bindings(&config.models, context);
        let mut engine = Self::new(models, Settings::from_config(config));

        if let Some(path) = &config.targets_file {
            engine.targets = points::load_targets(path)?;
        }
        if let Some(path) = &config.stations_file {
            engine.stations = points::load_targets(path)?;
        }
        if let Some(path) = &config.shake_map_file {
            engine.shake_map = Some(Arc::new(points::load_grid(path)?));
        }
        Ok(engine)
    }

    /// Compute a fresh state for one point.
    #[must_use]
    pub fn compute_point(&self, event_id: &str, source: &Source, site: &Site<'_>) -> PointState {
        let models = &self.models;
        let mut state = PointState::for_event(event_id);

        if let Some(gmpe) = &models.pga {
            let pga = gmpe.pga(source, site);
            state.values.insert(ShakingType::Pga, pga);
            if models.ipe.is_none()
                && let Some(gmice) = &models.gmice_pga
            {
                state
                    .values
                    .insert(ShakingType::Intensity, gmice.intensity_from_acceleration(pga));
            }
        }

        if let Some(gmpe) = &models.pgv {
            let pgv = gmpe.pgv(source, site);
            state.values.insert(ShakingType::Pgv, pgv);
            if models.ipe.is_none()
                && let Some(gmice) = &models.gmice_pgv
            {
                state
                    .values
                    .insert(ShakingType::Intensity, gmice.intensity_from_velocity(pgv));
            }
        }

        if let Some(gmpe) = &models.psa {
            self.spectral(&mut state, ShakingType::Psa, |t| gmpe.psa(source, site, t));
        }
        if let Some(gmpe) = &models.drs {
            self.spectral(&mut state, ShakingType::Drs, |t| gmpe.drs(source, site, t));
        }

        if let Some(ipe) = &models.ipe {
            state
                .values
                .insert(ShakingType::Intensity, ipe.intensity(source, site));
        }

        state
    }

    /// Control-period value plus, when `kind` is the spectrum parameter, the
    /// full curve.
    fn spectral(
        &self,
        state: &mut PointState,
        kind: ShakingType,
        eval: impl Fn(f64) -> Result<Shaking, ModelError>,
    ) {
        if let Some(period) = self.settings.control_period {
            match eval(period) {
                Ok(value) => {
                    state.values.insert(kind, value);
                }
                Err(e) => tracing::debug!("{kind} at control period skipped: {e}"),
            }
        }

        if self.settings.spectrum_parameter == Some(kind) {
            for &period in &self.settings.periods {
                match eval(period) {
                    Ok(shaking) => state.spectrum.push(SpectralValue { period, shaking }),
                    Err(e) => tracing::debug!("{kind} spectrum point skipped: {e}"),
                }
            }
        }
    }

    /// Expected value of `parameter` at `site`, in SI units.
    ///
    /// # Errors
    ///
    /// Returns a reason when no model covers the parameter or the model
    /// rejects the request.
    fn grid_value(&self, parameter: ShakingType, source: &Source, site: &Site<'_>) -> Result<f64, String> {
        let models = &self.models;
        let no_model = || format!("no model configured for {parameter}");
        let period = || {
            self.settings
                .control_period
                .ok_or_else(|| format!("{parameter} needs a control period"))
        };

        let shaking = match parameter {
            ShakingType::Pga => models.pga.as_ref().ok_or_else(no_model)?.pga(source, site),
            ShakingType::Pgv => models.pgv.as_ref().ok_or_else(no_model)?.pgv(source, site),
            ShakingType::Psa => models
                .psa
                .as_ref()
                .ok_or_else(no_model)?
                .psa(source, site, period()?)
                .map_err(|e| e.to_string())?,
            ShakingType::Drs => models
                .drs
                .as_ref()
                .ok_or_else(no_model)?
                .drs(source, site, period()?)
                .map_err(|e| e.to_string())?,
            ShakingType::Intensity => {
                if let Some(ipe) = &models.ipe {
                    ipe.intensity(source, site)
                } else if let (Some(gmpe), Some(gmice)) = (&models.pga, &models.gmice_pga) {
                    gmice.intensity_from_acceleration(gmpe.pga(source, site))
                } else if let (Some(gmpe), Some(gmice)) = (&models.pgv, &models.gmice_pgv) {
                    gmice.intensity_from_velocity(gmpe.pgv(source, site))
                } else {
                    return Err(no_model());
                }
            }
        };
        Ok(shaking.expected)
    }

    /// Evaluate the shake map. Any failure leaves every value at NaN.
    fn compute_grid(&self, map: &ShakeMap, parameter: ShakingType, event_id: &str, source: &Source) -> bool {
        let amplification_type = self.settings.amplification_type.as_str();
        let scale = parameter.display_scale();

        let values: Result<Vec<f64>, String> = map
            .points
            .iter()
            .map(|p| self.grid_value(parameter, source, &p.site(amplification_type)).map(|v| v * scale))
            .collect();

        let (values, ok) = match values {
            Ok(values) => (values, true),
            Err(reason) => {
                tracing::warn!("shake map for {event_id} unavailable: {reason}");
                (vec![f64::NAN; map.len()], false)
            }
        };

        map.publish(GridValues {
            event_id: Some(event_id.to_string()),
            parameter: Some(parameter),
            values,
        });
        ok
    }

    /// Run one full pass for `event` and publish the results.
    #[tracing::instrument(skip(self, event), fields(event = %event.id, magnitude = event.magnitude))]
    pub fn run_pass(&self, event: &Event, superseded: usize) -> PassReport {
        let started = Instant::now();
        let source = event.source();
        let amplification_type = self.settings.amplification_type.as_str();

        for target in &self.targets {
            let state = self.compute_point(&event.id, &source, &target.site(amplification_type));
            target.publish(state);
        }

        for station in &self.stations {
            let mut state = self.compute_point(&event.id, &source, &station.site(amplification_type));
            state.triggered = event.triggered_stations.iter().any(|s| *s == station.name);
            station.publish(state);
        }

        let (shake_map_ok, max_grid_value) = match (&self.shake_map, self.settings.shake_map_parameter) {
            (Some(map), Some(parameter)) => {
                let ok = self.compute_grid(map, parameter, &event.id, &source);
                (Some(ok), map.snapshot().max())
            }
            _ => (None, None),
        };

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            "pass for {} (M{:.1}) done in {elapsed_ms:.1} ms",
            event.id,
            event.magnitude
        );

        PassReport {
            event_id: event.id.clone(),
            magnitude: event.magnitude,
            superseded,
            targets: self.targets.len(),
            stations: self.stations.len(),
            grid_points: self.shake_map.as_ref().map_or(0, |m| m.len()),
            shake_map_ok,
            max_grid_value,
            elapsed_ms,
        }
    }
}

// ============================================================================
// Background worker
// ============================================================================

/// Handle to the background worker.
pub struct Calculator {
    engine: Arc<Engine>,
    queue: mpsc::UnboundedSender<Event>,
    reports: broadcast::Sender<PassReport>,
    supervisor: JoinHandle<()>,
}

impl Calculator {
    /// Start the worker on the current tokio runtime.
    ///
    /// A pass that panics restarts the worker on the same queue, up to
    /// `max_restarts` times.
    #[must_use]
    pub fn spawn(engine: Engine, max_restarts: u32) -> Self {
        let engine = Arc::new(engine);
        let (queue, rx) = mpsc::unbounded_channel();
        let (reports, _) = broadcast::channel(REPORT_CHANNEL_CAPACITY);

        let supervisor = tokio::spawn(supervise(
            Arc::clone(&engine),
            rx,
            reports.clone(),
            max_restarts,
        ));

        Self {
            engine,
            queue,
            reports,
            supervisor,
        }
    }

    /// Queue an event. Never blocks.
    ///
    /// # Errors
    ///
    /// Returns [`QuakeError::WorkerStopped`] once the worker has given up.
    pub fn process_event(&self, event: Event) -> Result<(), QuakeError> {
        tracing::debug!("queueing event {}", event.id);
        self.queue.send(event).map_err(|_| QuakeError::WorkerStopped)
    }

    /// Receive a report after every completed pass.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PassReport> {
        self.reports.subscribe()
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Stop accepting events, finish the queued ones and wait for the worker.
    pub async fn shutdown(self) {
        let Self { queue, supervisor, .. } = self;
        drop(queue);
        if let Err(e) = supervisor.await {
            tracing::error!("calculator supervisor failed: {e}");
        }
    }
}

async fn supervise(
    engine: Arc<Engine>,
    mut rx: mpsc::UnboundedReceiver<Event>,
    reports: broadcast::Sender<PassReport>,
    max_restarts: u32,
) {
    let mut restarts = 0;
    loop {
        match worker(&engine, &mut rx, &reports).await {
            Ok(()) => {
                tracing::debug!("event queue closed, calculator stopping");
                return;
            }
            Err(e) if restarts < max_restarts => {
                restarts += 1;
                tracing::error!("calculator pass failed: {e}; restarting ({restarts}/{max_restarts})");
            }
            Err(e) => {
                tracing::error!("calculator pass failed: {e}; giving up after {restarts} restarts");
                return;
            }
        }
    }
}

/// Drain the queue, one pass per wake-up. Returns `Ok` when every sender is
/// gone.
async fn worker(
    engine: &Arc<Engine>,
    rx: &mut mpsc::UnboundedReceiver<Event>,
    reports: &broadcast::Sender<PassReport>,
) -> Result<(), String> {
    while let Some(mut event) = rx.recv().await {
        let mut superseded = 0;
        while let Ok(newer) = rx.try_recv() {
            tracing::debug!("event {} superseded by {}", event.id, newer.id);
            event = newer;
            superseded += 1;
        }
        if superseded > 0 {
            tracing::info!("skipped {superseded} stale events, computing {}", event.id);
        }

        let engine = Arc::clone(engine);
        let pass = tokio::task::spawn_blocking(move || engine.run_pass(&event, superseded)).await;
        match pass {
            // No subscribers is fine
            Ok(report) => {
                let _ = reports.send(report);
            }
            Err(e) => return Err(join_error_message(e)),
        }
    }
    Ok(())
}

fn join_error_message(e: JoinError) -> String {
    if !e.is_panic() {
        return e.to_string();
    }
    let payload = e.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attenuation::{Intensity, Pga};
    use crate::gmice::SwissGMICE;
    use crate::gmpe::{CEA2014, ISNet};
    use crate::ipe::AEA12;
    use crate::points::parse_grid;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::broadcast::error::TryRecvError;

    fn isnet_models() -> ResolvedModels {
        ResolvedModels {
            pga: Some(Arc::new(ISNet)),
            pgv: Some(Arc::new(ISNet)),
            ..ResolvedModels::default()
        }
    }

    fn settings() -> Settings {
        Settings {
            amplification_type: "vs30".to_string(),
            ..Settings::default()
        }
    }

    fn target() -> Arc<Target> {
        Arc::new(Target::new("T", 46.1, 8.1, 0.0, 760.0))
    }

    fn event(id: &str) -> Event {
        Event::new(id, 1_700_000_000_000, 46.0, 8.0, 10_000.0, 6.0)
    }

    /// Panics on magnitudes above 9.
    struct Exploding;

    impl Pga for Exploding {
        fn pga(&self, source: &Source, _: &Site<'_>) -> Shaking {
            assert!(source.magnitude < 9.0, "magnitude out of range");
            Shaking::new(1.0, 0.5, 2.0)
        }
    }

    #[test]
    fn test_end_to_end_isnet_pga() {
        let t = target();
        let engine = Engine::new(isnet_models(), settings()).with_targets(vec![Arc::clone(&t)]);
        let ev = event("e2e");

        let report = engine.run_pass(&ev, 0);
        assert_eq!(report.targets, 1);
        assert_eq!(report.shake_map_ok, None);

        let state = t.snapshot();
        assert_eq!(state.event_id.as_deref(), Some("e2e"));
        let pga = state.get(ShakingType::Pga).unwrap();

        let r = ev.source().hypocentral_distance_km(&t.site("vs30"));
        let (log, sigma) = ISNet::log_pga(6.0, r);
        let expected = 10f64.powf(log);
        assert!((pga.expected - expected).abs() / expected < 1e-9);
        assert!(pga.percentile16 <= expected && expected <= pga.percentile84);
        assert!((pga.percentile84 / pga.expected - 10f64.powf(sigma)).abs() < 1e-9);
        // About 1 m/s² at ~17 km
        assert!(pga.expected > 0.5 && pga.expected < 2.0, "pga {}", pga.expected);
    }

    #[test]
    fn test_gmice_and_ipe_precedence() {
        let mut models = isnet_models();
        models.gmice_pga = Some(Arc::new(SwissGMICE));
        let t = target();
        let engine = Engine::new(models.clone(), settings()).with_targets(vec![Arc::clone(&t)]);
        engine.run_pass(&event("g"), 0);

        let state = t.snapshot();
        let pga = state.get(ShakingType::Pga).unwrap();
        let intensity = state.get(ShakingType::Intensity).unwrap();
        assert!((intensity.expected - SwissGMICE::from_acceleration(pga.expected)).abs() < 1e-9);

        models.ipe = Some(Arc::new(AEA12));
        let engine = Engine::new(models, settings()).with_targets(vec![Arc::clone(&t)]);
        engine.run_pass(&event("i"), 0);
        let state = t.snapshot();
        let ev = event("i");
        let direct = AEA12.intensity(&ev.source(), &t.site("vs30"));
        assert_eq!(state.get(ShakingType::Intensity), Some(&direct));
    }

    #[test]
    fn test_spectrum_skips_unsupported_periods() {
        let models = ResolvedModels {
            psa: Some(Arc::new(CEA2014)),
            drs: Some(Arc::new(CEA2014)),
            ..ResolvedModels::default()
        };
        let settings = Settings {
            control_period: Some(1.0),
            periods: vec![0.1, 0.3, 1.0],
            spectrum_parameter: Some(ShakingType::Psa),
            ..settings()
        };
        let t = target();
        let engine = Engine::new(models, settings).with_targets(vec![Arc::clone(&t)]);
        engine.run_pass(&event("s"), 0);

        let state = t.snapshot();
        let periods: Vec<f64> = state.spectrum.iter().map(|v| v.period).collect();
        assert_eq!(periods, vec![0.1, 1.0]);
        assert!(state.get(ShakingType::Psa).is_some());
        assert!(state.get(ShakingType::Drs).is_some());
        assert!(state.get(ShakingType::Pga).is_none());

        let psa = state.get(ShakingType::Psa).unwrap();
        assert_eq!(state.spectrum[1].shaking, *psa);
    }

    #[test]
    fn test_stations_triggered_from_event() {
        let stations = vec![
            Arc::new(Target::new("DIX", 46.08, 7.40, 2000.0, 760.0)),
            Arc::new(Target::new("SIMPL", 46.25, 8.02, 1500.0, 760.0)),
        ];
        let engine = Engine::new(isnet_models(), settings()).with_stations(stations.clone());
        let mut ev = event("st");
        ev.triggered_stations = vec!["SIMPL".to_string()];

        let report = engine.run_pass(&ev, 0);
        assert_eq!(report.stations, 2);
        assert!(!stations[0].snapshot().triggered);
        assert!(stations[1].snapshot().triggered);
    }

    #[test]
    fn test_shake_map_values_in_display_units() {
        let settings = Settings {
            shake_map_parameter: Some(ShakingType::Pga),
            ..settings()
        };
        let grid = ShakeMap::new(parse_grid("8.0,46.0,0,760\n8.5,46.5,0,760\n"));
        let engine = Engine::new(isnet_models(), settings).with_shake_map(grid);
        let ev = event("map");
        let report = engine.run_pass(&ev, 0);
        assert_eq!(report.shake_map_ok, Some(true));
        assert_eq!(report.grid_points, 2);

        let map = engine.shake_map.as_ref().unwrap();
        let values = map.snapshot();
        let site = map.points[0].site("vs30");
        let si = ISNet.pga(&ev.source(), &site).expected;
        assert!((values.values[0] - si * ShakingType::Pga.display_scale()).abs() < 1e-9);
        assert!(values.values[0] > values.values[1]);
        assert_eq!(report.max_grid_value, Some(values.values[0]));
    }

    #[test]
    fn test_shake_map_without_model_is_nan() {
        let settings = Settings {
            shake_map_parameter: Some(ShakingType::Psa),
            control_period: Some(1.0),
            ..settings()
        };
        let grid = ShakeMap::new(parse_grid("8.0,46.0,0,760\n"));
        let engine = Engine::new(isnet_models(), settings).with_shake_map(grid);
        let report = engine.run_pass(&event("nan"), 0);
        assert_eq!(report.shake_map_ok, Some(false));
        assert_eq!(report.max_grid_value, None);

        let values = engine.shake_map.as_ref().unwrap().snapshot();
        assert_eq!(values.event_id.as_deref(), Some("nan"));
        assert!(values.values.iter().all(|v| v.is_nan()));
    }

    #[tokio::test]
    async fn test_queued_events_coalesce() {
        let t = target();
        let engine = Engine::new(isnet_models(), settings()).with_targets(vec![Arc::clone(&t)]);
        let calculator = Calculator::spawn(engine, 0);
        let mut reports = calculator.subscribe();

        // The worker cannot run before the first await
        for id in ["E1", "E2", "E3"] {
            calculator.process_event(event(id)).unwrap();
        }

        let report = reports.recv().await.unwrap();
        assert_eq!(report.event_id, "E3");
        assert_eq!(report.superseded, 2);
        assert_eq!(t.snapshot().event_id.as_deref(), Some("E3"));

        calculator.shutdown().await;
        assert!(matches!(reports.try_recv(), Err(TryRecvError::Closed)));
    }

    /// Holds its first pass until released and records every magnitude.
    struct Gate {
        started: Mutex<std::sync::mpsc::Sender<()>>,
        release: Mutex<std::sync::mpsc::Receiver<()>>,
        seen: Mutex<Vec<f64>>,
    }

    impl Pga for Gate {
        fn pga(&self, source: &Source, _: &Site<'_>) -> Shaking {
            let first = {
                let mut seen = self.seen.lock().unwrap();
                seen.push(source.magnitude);
                seen.len() == 1
            };
            if first {
                self.started.lock().unwrap().send(()).unwrap();
                self.release.lock().unwrap().recv().unwrap();
            }
            Shaking::new(1.0, 0.5, 2.0)
        }
    }

    #[tokio::test]
    async fn test_events_arriving_during_a_pass_coalesce() {
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel();
        let gate = Arc::new(Gate {
            started: Mutex::new(started_tx),
            release: Mutex::new(release_rx),
            seen: Mutex::new(Vec::new()),
        });
        let pga: Arc<dyn Pga> = Arc::<Gate>::clone(&gate);
        let models = ResolvedModels {
            pga: Some(pga),
            ..ResolvedModels::default()
        };

        let t = target();
        let engine = Engine::new(models, settings()).with_targets(vec![Arc::clone(&t)]);
        let calculator = Calculator::spawn(engine, 0);
        let mut reports = calculator.subscribe();
        let with_mag = |id: &str, mag: f64| Event::new(id, 1_700_000_000_000, 46.0, 8.0, 10_000.0, mag);

        calculator.process_event(with_mag("E0", 5.0)).unwrap();
        tokio::time::timeout(
            Duration::from_secs(5),
            tokio::task::spawn_blocking(move || started_rx.recv()),
        )
        .await
        .expect("pass E0 never started")
        .unwrap()
        .unwrap();

        // E0 is still running
        for (id, mag) in [("E1", 5.1), ("E2", 5.2), ("E3", 5.3)] {
            calculator.process_event(with_mag(id, mag)).unwrap();
        }
        release_tx.send(()).unwrap();

        let first = tokio::time::timeout(Duration::from_secs(5), reports.recv()).await.unwrap().unwrap();
        assert_eq!(first.event_id, "E0");
        assert_eq!(first.superseded, 0);
        let second = tokio::time::timeout(Duration::from_secs(5), reports.recv()).await.unwrap().unwrap();
        assert_eq!(second.event_id, "E3");
        assert_eq!(second.superseded, 2);

        assert_eq!(*gate.seen.lock().unwrap(), vec![5.0, 5.3]);
        let state = t.snapshot();
        assert_eq!(state.event_id.as_deref(), Some("E3"));

        calculator.shutdown().await;
        assert!(matches!(reports.try_recv(), Err(TryRecvError::Closed)));
    }

    #[tokio::test]
    async fn test_worker_restarts_after_panic() {
        let models = ResolvedModels {
            pga: Some(Arc::new(Exploding)),
            ..ResolvedModels::default()
        };
        let t = target();
        let engine = Engine::new(models, settings()).with_targets(vec![Arc::clone(&t)]);
        let calculator = Calculator::spawn(engine, 1);
        let mut reports = calculator.subscribe();

        let mut bad = event("bad");
        bad.magnitude = 9.5;
        calculator.process_event(bad).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        calculator.process_event(event("good")).unwrap();
        let report = reports.recv().await.unwrap();
        assert_eq!(report.event_id, "good");
        assert_eq!(t.snapshot().event_id.as_deref(), Some("good"));

        calculator.shutdown().await;
    }

    #[tokio::test]
    async fn test_worker_gives_up_after_max_restarts() {
        let models = ResolvedModels {
            pga: Some(Arc::new(Exploding)),
            ..ResolvedModels::default()
        };
        let engine = Engine::new(models, settings()).with_targets(vec![target()]);
        let calculator = Calculator::spawn(engine, 0);

        let mut bad = event("bad");
        bad.magnitude = 9.5;
        calculator.process_event(bad).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(matches!(
            calculator.process_event(event("late")),
            Err(QuakeError::WorkerStopped)
        ));
    }
}
