//! Ground-motion prediction equations.
//!
//! Every model returns SI values: m/s² for PGA and PSA, m/s for PGV and m
//! for DRS.

pub mod bea2014;
pub mod cea2014;
pub mod central_america;
pub mod cli94;
pub mod isnet;
pub mod lookup_table;
pub mod sch2014;
pub mod swiss;
pub mod you97;
pub mod zea06;

pub use bea2014::BEA2014;
pub use cea2014::CEA2014;
pub use central_america::CentralAmerica;
pub use cli94::Cli94;
pub use isnet::ISNet;
pub use lookup_table::LookupTable;
pub use sch2014::SCH2014;
pub use swiss::Swiss;
pub use you97::YOU97;
pub use zea06::ZEA06;

/// Magnitude from which the rupture distance is estimated from the
/// hypocentral distance instead of being taken equal to it.
pub const RUPTURE_CORRECTION_MAGNITUDE: f64 = 5.8;

/// Rupture distance (km) estimated from the hypocentral distance for
/// subduction models (Cauzzi et al. 2015), never negative.
#[must_use]
pub fn rupture_distance(magnitude: f64, rh_km: f64) -> f64 {
    if magnitude < RUPTURE_CORRECTION_MAGNITUDE {
        rh_km
    } else {
        (rh_km + 7.5 * magnitude - 38.0 - 1.38 - 0.014 * magnitude.exp()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rupture_distance() {
        assert!((rupture_distance(5.0, 30.0) - 30.0).abs() < f64::EPSILON);
        let expected = 30.0 + 45.0 - 39.38 - 0.014 * 6f64.exp();
        assert!((rupture_distance(6.0, 30.0) - expected).abs() < 1e-12);
        assert!(rupture_distance(9.0, 0.0) >= 0.0);
    }
}
