use rayon::prelude::*;

use crate::error::Error;
use crate::geometry::superpose::align_onto;
use crate::geometry::transform::XForm;
use crate::structure::core::AtomGroup;
use crate::structure::coordinate::Coordinate;

/// Tuning for the iterative aligner. Both values are caller
/// configuration rather than hardcoded literals.
#[derive(Debug, Clone, Copy)]
pub struct AlignOptions {
    /// Stop once the average structure moves less than this (RMSD).
    pub tolerance: f64,
    /// Iteration cap; hitting it is reported, not an error.
    pub max_iterations: usize,
}

impl Default for AlignOptions {
    fn default() -> Self {
        AlignOptions { tolerance: 1.0e-6, max_iterations: 1000 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentStatus {
    /// The average structure stabilized below the tolerance.
    Converged,
    /// The iteration cap was reached first.
    Exhausted,
}

#[derive(Debug)]
pub struct AlignmentReport {
    /// Per-frame transforms from the final iteration.
    pub transforms: Vec<XForm>,
    /// RMSD between the last two average structures.
    pub final_rmsd: f64,
    pub iterations: usize,
    pub status: AlignmentStatus,
}

/// Indexwise mean of the frame coordinates. Atom metadata comes from the
/// first frame.
pub fn average_structure(frames: &[AtomGroup]) -> Result<AtomGroup, Error> {
    let first = frames
        .first()
        .ok_or_else(|| Error::degenerate("average of an empty ensemble"))?;
    let n = first.len();
    for frame in frames {
        if frame.len() != n {
            return Err(Error::CardinalityMismatch { expected: n, found: frame.len() });
        }
    }
    let mut avg = first.clone();
    for (i, atom) in avg.atoms.iter_mut().enumerate() {
        let mut sum = Coordinate::zero();
        for frame in frames {
            sum = sum.add(&frame.atoms[i].coord);
        }
        atom.coord = sum.div(frames.len() as f64);
    }
    Ok(avg)
}

/// Iteratively align an ensemble onto its own average structure.
///
/// The first frame seeds the reference. Each iteration aligns every frame
/// onto the current reference (frames are independent, so this runs on
/// the rayon pool; the averaging step below is the barrier), averages the
/// aligned frames into a new reference, and measures how far the average
/// moved. Frames are mutated in place; positional order is preserved.
pub fn iterative_alignment(
    ensemble: &mut [AtomGroup],
    opts: &AlignOptions,
) -> Result<AlignmentReport, Error> {
    if ensemble.is_empty() {
        return Err(Error::degenerate("iterative alignment of an empty ensemble"));
    }

    let mut reference = ensemble[0].clone();
    let mut transforms: Vec<XForm> = Vec::new();
    let mut final_rmsd = f64::MAX;

    for iteration in 1..=opts.max_iterations {
        transforms = ensemble
            .par_iter_mut()
            .map(|frame| align_onto(frame, &reference))
            .collect::<Result<Vec<XForm>, Error>>()?;

        let avg = average_structure(ensemble)?;
        final_rmsd = avg.rmsd(&reference)?;
        reference = avg;

        if final_rmsd < opts.tolerance {
            return Ok(AlignmentReport {
                transforms,
                final_rmsd,
                iterations: iteration,
                status: AlignmentStatus::Converged,
            });
        }
    }

    Ok(AlignmentReport {
        transforms,
        final_rmsd,
        iterations: opts.max_iterations,
        status: AlignmentStatus::Exhausted,
    })
}
