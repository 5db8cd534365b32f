//! Depth-dispatched composite for Central America.
//!
//! | depth (km)  | model                          |
//! |-------------|--------------------------------|
//! | `< 25`      | mean of Cli94 and ZEA06 crustal|
//! | `25..=60`   | YOU97 interface                |
//! | `> 60`      | mean of YOU97 and ZEA06 slab   |

use super::cli94::Cli94;
use super::you97::YOU97;
use super::zea06::ZEA06;
use crate::attenuation::{psa_to_drs, Drs, Pga, Psa, Site, Source};
use crate::errors::ModelError;
use crate::shaking::Shaking;

pub const CRUSTAL_MAX_DEPTH_KM: f64 = 25.0;
pub const INTERFACE_MAX_DEPTH_KM: f64 = 60.0;

/// Periods every band can serve.
pub const PERIODS: [f64; 6] = [0.1, 0.2, 0.5, 1.0, 2.0, 4.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthBand {
    Crustal,
    Interface,
    Intraslab,
}

impl DepthBand {
    #[must_use]
    pub fn of(depth_km: f64) -> Self {
        if depth_km < CRUSTAL_MAX_DEPTH_KM {
            Self::Crustal
        } else if depth_km <= INTERFACE_MAX_DEPTH_KM {
            Self::Interface
        } else {
            Self::Intraslab
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CentralAmerica {
    shallow: (Cli94, ZEA06),
    interface: YOU97,
    intraslab: (YOU97, ZEA06),
}

impl Default for CentralAmerica {
    fn default() -> Self {
        Self {
            shallow: (Cli94, ZEA06::crustal()),
            interface: YOU97::interface(),
            intraslab: (YOU97::intraslab(), ZEA06::slab()),
        }
    }
}

impl Pga for CentralAmerica {
    fn pga(&self, source: &Source, site: &Site<'_>) -> Shaking {
        match DepthBand::of(source.depth_km()) {
            DepthBand::Crustal => {
                let (a, b) = &self.shallow;
                Shaking::mean(a.pga(source, site), b.pga(source, site))
            }
            DepthBand::Interface => self.interface.pga(source, site),
            DepthBand::Intraslab => {
                let (a, b) = &self.intraslab;
                Shaking::mean(a.pga(source, site), b.pga(source, site))
            }
        }
    }
}

impl Psa for CentralAmerica {
    fn periods(&self) -> &[f64] {
        &PERIODS
    }

    fn psa(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError> {
        Ok(match DepthBand::of(source.depth_km()) {
            DepthBand::Crustal => {
                let (a, b) = &self.shallow;
                Shaking::mean(a.psa(source, site, period)?, b.psa(source, site, period)?)
            }
            DepthBand::Interface => self.interface.psa(source, site, period)?,
            DepthBand::Intraslab => {
                let (a, b) = &self.intraslab;
                Shaking::mean(a.psa(source, site, period)?, b.psa(source, site, period)?)
            }
        })
    }
}

impl Drs for CentralAmerica {
    fn drs(&self, source: &Source, site: &Site<'_>, period: f64) -> Result<Shaking, ModelError> {
        Ok(psa_to_drs(self.psa(source, site, period)?, period))
    }
}
