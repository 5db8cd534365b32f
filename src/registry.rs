//! Model registry: resolves configured model names to shared instances.
//!
//! Names map to constructors through a static table. Each name is built at
//! most once and its instance is shared between every slot that names it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::attenuation::{Drs, Intensity, IntensityFromAcceleration, IntensityFromVelocity, Pga, Pgv, Psa};
use crate::config::ModelBindings;
use crate::gmice::SwissGMICE;
use crate::gmpe::{BEA2014, CEA2014, CentralAmerica, Cli94, ISNet, LookupTable, SCH2014, Swiss, YOU97, ZEA06};
use crate::ipe::{AEA12, FC06};

/// What a model can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Pga,
    Pgv,
    Psa,
    Drs,
    Intensity,
    IntensityFromPga,
    IntensityFromPgv,
}

impl Capability {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pga => "pga",
            Self::Pgv => "pgv",
            Self::Psa => "psa",
            Self::Drs => "drs",
            Self::Intensity => "intensity",
            Self::IntensityFromPga => "intensity(pga)",
            Self::IntensityFromPgv => "intensity(pgv)",
        }
    }
}

/// Inputs some constructors need.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelContext<'a> {
    pub lookup_table_dir: Option<&'a Path>,
    pub periods: &'a [f64],
}

/// One instance viewed through each capability it offers.
#[derive(Clone, Default)]
pub struct ModelHandle {
    pub pga: Option<Arc<dyn Pga>>,
    pub pgv: Option<Arc<dyn Pgv>>,
    pub psa: Option<Arc<dyn Psa>>,
    pub drs: Option<Arc<dyn Drs>>,
    pub intensity: Option<Arc<dyn Intensity>>,
    pub intensity_from_pga: Option<Arc<dyn IntensityFromAcceleration>>,
    pub intensity_from_pgv: Option<Arc<dyn IntensityFromVelocity>>,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("pga", &self.pga.is_some())
            .field("pgv", &self.pgv.is_some())
            .field("psa", &self.psa.is_some())
            .field("drs", &self.drs.is_some())
            .field("intensity", &self.intensity.is_some())
            .finish_non_exhaustive()
    }
}

fn full_gmpe<M: Pga + Pgv + Psa + Drs + 'static>(model: M) -> ModelHandle {
    let m = Arc::new(model);
    ModelHandle {
        pga: Some(m.clone()),
        pgv: Some(m.clone()),
        psa: Some(m.clone()),
        drs: Some(m),
        ..ModelHandle::default()
    }
}

fn spectral_gmpe<M: Pga + Psa + Drs + 'static>(model: M) -> ModelHandle {
    let m = Arc::new(model);
    ModelHandle {
        pga: Some(m.clone()),
        psa: Some(m.clone()),
        drs: Some(m),
        ..ModelHandle::default()
    }
}

fn ipe<M: Intensity + 'static>(model: M) -> ModelHandle {
    ModelHandle {
        intensity: Some(Arc::new(model)),
        ..ModelHandle::default()
    }
}

fn build_isnet(_: &ModelContext<'_>) -> ModelHandle {
    let m = Arc::new(ISNet);
    ModelHandle {
        pga: Some(m.clone()),
        pgv: Some(m),
        ..ModelHandle::default()
    }
}

fn build_swiss(_: &ModelContext<'_>) -> ModelHandle {
    full_gmpe(Swiss)
}

fn build_bea2014(_: &ModelContext<'_>) -> ModelHandle {
    full_gmpe(BEA2014)
}

fn build_cea2014(_: &ModelContext<'_>) -> ModelHandle {
    full_gmpe(CEA2014)
}

fn build_cli94(_: &ModelContext<'_>) -> ModelHandle {
    spectral_gmpe(Cli94)
}

fn build_sch2014(_: &ModelContext<'_>) -> ModelHandle {
    spectral_gmpe(SCH2014)
}

fn build_you97_interface(_: &ModelContext<'_>) -> ModelHandle {
    spectral_gmpe(YOU97::interface())
}

fn build_you97_intraslab(_: &ModelContext<'_>) -> ModelHandle {
    spectral_gmpe(YOU97::intraslab())
}

fn build_zea06_crustal(_: &ModelContext<'_>) -> ModelHandle {
    spectral_gmpe(ZEA06::crustal())
}

fn build_zea06_interface(_: &ModelContext<'_>) -> ModelHandle {
    spectral_gmpe(ZEA06::interface())
}

fn build_zea06_slab(_: &ModelContext<'_>) -> ModelHandle {
    spectral_gmpe(ZEA06::slab())
}

fn build_central_america(_: &ModelContext<'_>) -> ModelHandle {
    spectral_gmpe(CentralAmerica::default())
}

fn build_lookup_table(ctx: &ModelContext<'_>) -> ModelHandle {
    let dir = ctx.lookup_table_dir.unwrap_or_else(|| Path::new("."));
    full_gmpe(LookupTable::load(dir, ctx.periods))
}

fn build_aea12(_: &ModelContext<'_>) -> ModelHandle {
    ipe(AEA12)
}

fn build_fc06(_: &ModelContext<'_>) -> ModelHandle {
    ipe(FC06)
}

fn build_swiss_gmice(_: &ModelContext<'_>) -> ModelHandle {
    let m = Arc::new(SwissGMICE);
    ModelHandle {
        intensity_from_pga: Some(m.clone()),
        intensity_from_pgv: Some(m),
        ..ModelHandle::default()
    }
}

/// Static registry entry.
pub struct ModelEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub capabilities: &'static [Capability],
    build: fn(&ModelContext<'_>) -> ModelHandle,
}

use Capability::{Drs as D, Intensity as I, IntensityFromPga as IA, IntensityFromPgv as IV, Pga as A, Pgv as V, Psa as S};

pub static MODELS: &[ModelEntry] = &[
    ModelEntry { name: "ISNet", description: "ISNet, southern Italy", capabilities: &[A, V], build: build_isnet },
    ModelEntry { name: "Swiss", description: "Edwards & Fäh / Cauzzi 2014, Switzerland", capabilities: &[A, V, S, D], build: build_swiss },
    ModelEntry { name: "BEA2014", description: "Bindi et al. 2014", capabilities: &[A, V, S, D], build: build_bea2014 },
    ModelEntry { name: "CEA2014", description: "Cauzzi et al. 2014", capabilities: &[A, V, S, D], build: build_cea2014 },
    ModelEntry { name: "Cli94", description: "Climent et al. 1994", capabilities: &[A, S, D], build: build_cli94 },
    ModelEntry { name: "SCH2014", description: "Schmidt 2014, Central America", capabilities: &[A, S, D], build: build_sch2014 },
    ModelEntry { name: "YOU97IFC", description: "Youngs et al. 1997, interface", capabilities: &[A, S, D], build: build_you97_interface },
    ModelEntry { name: "YOU97ITS", description: "Youngs et al. 1997, intraslab", capabilities: &[A, S, D], build: build_you97_intraslab },
    ModelEntry { name: "ZEA06ASC", description: "Zhao et al. 2006, crustal", capabilities: &[A, S, D], build: build_zea06_crustal },
    ModelEntry { name: "ZEA06IFC", description: "Zhao et al. 2006, interface", capabilities: &[A, S, D], build: build_zea06_interface },
    ModelEntry { name: "ZEA06ITS", description: "Zhao et al. 2006, intraslab", capabilities: &[A, S, D], build: build_zea06_slab },
    ModelEntry { name: "CentralAmerica", description: "depth-band composite for Central America", capabilities: &[A, S, D], build: build_central_america },
    ModelEntry { name: "LookupTable", description: "precomputed tables", capabilities: &[A, V, S, D], build: build_lookup_table },
    ModelEntry { name: "AEA12", description: "Allen et al. 2012 IPE", capabilities: &[I], build: build_aea12 },
    ModelEntry { name: "FC06", description: "Faccioli & Cauzzi 2006 IPE", capabilities: &[I], build: build_fc06 },
    ModelEntry { name: "SwissGMICE", description: "Faenza & Michelini 2010 GMICE", capabilities: &[IA, IV], build: build_swiss_gmice },
];

/// Look up a registry entry by name.
#[must_use]
pub fn entry(name: &str) -> Option<&'static ModelEntry> {
    MODELS.iter().find(|e| e.name == name)
}

/// Instance cache for one configuration.
pub struct Registry<'a> {
    context: ModelContext<'a>,
    cache: HashMap<&'static str, ModelHandle>,
}

impl<'a> Registry<'a> {
    #[must_use]
    pub fn new(context: ModelContext<'a>) -> Self {
        Self {
            context,
            cache: HashMap::new(),
        }
    }

    /// Registered model names, in table order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        MODELS.iter().map(|e| e.name)
    }

    /// Instance for `name`, built on first use. `None` for unknown names.
    pub fn get(&mut self, name: &str) -> Option<&ModelHandle> {
        let entry = entry(name)?;
        let context = self.context;
        Some(
            self.cache
                .entry(entry.name)
                .or_insert_with(|| (entry.build)(&context)),
        )
    }

    /// Resolve one slot, logging when the name is unknown or lacks the
    /// capability.
    fn slot<T: ?Sized>(
        &mut self,
        slot: &str,
        name: Option<&str>,
        pick: impl Fn(&ModelHandle) -> Option<Arc<T>>,
    ) -> Option<Arc<T>> {
        let name = name?;
        let Some(handle) = self.get(name) else {
            tracing::warn!(
                "{slot}: unknown model '{name}' (known: {})",
                Self::names().collect::<Vec<_>>().join(", ")
            );
            return None;
        };
        let model = pick(handle);
        if model.is_none() {
            tracing::warn!("{slot}: model '{name}' does not provide this measure");
        } else {
            tracing::debug!("{slot}: using {name}");
        }
        model
    }

    /// Resolve every configured slot.
    pub fn resolve(&mut self, bindings: &ModelBindings) -> ResolvedModels {
        let gmpe = &bindings.gmpe;
        let mut models = ResolvedModels {
            pga: self.slot("gmpe.pga", gmpe.pga.as_deref(), |h| h.pga.clone()),
            pgv: self.slot("gmpe.pgv", gmpe.pgv.as_deref(), |h| h.pgv.clone()),
            psa: self.slot("gmpe.psa", gmpe.psa.as_deref(), |h| h.psa.clone()),
            drs: self.slot("gmpe.drs", gmpe.drs.as_deref(), |h| h.drs.clone()),
            ipe: self.slot("ipe.intensity", bindings.ipe.intensity.as_deref(), |h| {
                h.intensity.clone()
            }),
            ..ResolvedModels::default()
        };

        if models.ipe.is_none() {
            let gmice = &bindings.gmice;
            models.gmice_pga = self.slot("gmice.pga", gmice.pga.as_deref(), |h| {
                h.intensity_from_pga.clone()
            });
            models.gmice_pgv = self.slot("gmice.pgv", gmice.pgv.as_deref(), |h| {
                h.intensity_from_pgv.clone()
            });
        }
        models
    }
}

/// Models bound to each calculator slot.
#[derive(Clone, Default)]
pub struct ResolvedModels {
    pub pga: Option<Arc<dyn Pga>>,
    pub pgv: Option<Arc<dyn Pgv>>,
    pub psa: Option<Arc<dyn Psa>>,
    pub drs: Option<Arc<dyn Drs>>,
    pub ipe: Option<Arc<dyn Intensity>>,
    pub gmice_pga: Option<Arc<dyn IntensityFromAcceleration>>,
    pub gmice_pgv: Option<Arc<dyn IntensityFromVelocity>>,
}

impl ResolvedModels {
    /// Resolve `bindings` with a fresh registry.
    #[must_use]
    pub fn from_bindings(bindings: &ModelBindings, context: ModelContext<'_>) -> Self {
        Registry::new(context).resolve(bindings)
    }
}

impl std::fmt::Debug for ResolvedModels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedModels")
            .field("pga", &self.pga.is_some())
            .field("pgv", &self.pgv.is_some())
            .field("psa", &self.psa.is_some())
            .field("drs", &self.drs.is_some())
            .field("ipe", &self.ipe.is_some())
            .field("gmice_pga", &self.gmice_pga.is_some())
            .field("gmice_pgv", &self.gmice_pgv.is_some())
            .finish()
    }
}
