//! Intensity prediction equations.

pub mod aea12;
pub mod fc06;

pub use aea12::AEA12;
pub use fc06::FC06;
