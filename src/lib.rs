//! # About project
//!
//! Trajalign is a toolkit for analyzing molecular-dynamics trajectories:
//! rigid-body superposition (Kabsch), principal-axis decomposition, and
//! iterative ensemble alignment, with DCD trajectory I/O.

pub mod cli;
pub mod error;
pub mod geometry;
pub mod structure;
pub mod utils;

pub mod prelude {
    pub use crate::error::Error;
    pub use crate::geometry::ensemble::{
        average_structure, iterative_alignment, AlignOptions, AlignmentReport, AlignmentStatus,
    };
    pub use crate::geometry::inertia::{moments_of_inertia, principal_axes};
    pub use crate::geometry::superpose::{align_onto, superposition};
    pub use crate::geometry::transform::XForm;
    pub use crate::structure::atom::Atom;
    pub use crate::structure::coordinate::Coordinate;
    pub use crate::structure::core::AtomGroup;
    pub use crate::structure::io::dcd::{DcdReader, DcdWriter};
    pub use crate::structure::io::pdb::Reader as PdbReader;
    pub use crate::utils::log::{log_msg, print_log_msg, DONE, FAIL, INFO, WARN};
}
