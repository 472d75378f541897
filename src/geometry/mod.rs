//! Structural geometry: rigid transforms, principal-axis analysis,
//! Kabsch superposition, and iterative ensemble alignment.

pub mod eigen;
pub mod ensemble;
pub mod inertia;
pub mod superpose;
pub mod transform;
