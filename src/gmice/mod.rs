//! Ground-motion to intensity conversion equations.

pub mod swiss;

pub use swiss::SwissGMICE;
