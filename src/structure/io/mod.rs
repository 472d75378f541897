//! Structure and trajectory file I/O.

pub mod dcd;
pub mod pdb;
