//! Atoms, atom groups, and structure/trajectory file I/O.

pub mod atom;
pub mod coordinate;
pub mod core;
pub mod io;
