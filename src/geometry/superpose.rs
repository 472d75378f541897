use nalgebra::Matrix3;

use crate::error::Error;
use crate::geometry::inertia::centered_coords;
use crate::geometry::transform::XForm;
use crate::structure::core::AtomGroup;
use crate::utils::log::{print_log_msg, WARN};

const SVD_EPSILON: f64 = 1.0e-12;
const SVD_MAX_ITER: usize = 256;

/// Below this, the smallest singular value of the cross-covariance matrix
/// indicates a near-indeterminate fit (collinear or coplanar atoms).
pub const ZERO_SINGULAR_VALUE: f64 = 1.0e-6;

/// Optimal rigid superposition of `moving` onto `reference` (Kabsch),
/// together with the singular values of the cross-covariance matrix so
/// callers can detect near-degenerate fits.
///
/// The returned transform maps the original (un-centered) coordinates of
/// `moving` onto `reference`; its rotation block is always a proper
/// rotation (determinant +1).
pub fn superposition_with_singular_values(
    moving: &AtomGroup,
    reference: &AtomGroup,
) -> Result<(XForm, [f64; 3]), Error> {
    if moving.len() != reference.len() {
        return Err(Error::CardinalityMismatch {
            expected: reference.len(),
            found: moving.len(),
        });
    }
    if moving.is_empty() {
        return Err(Error::degenerate("superposition of empty groups"));
    }

    // Center both groups at the origin.
    let xc = moving.centroid();
    let yc = reference.centroid();
    let x = centered_coords(moving, &xc);
    let y = centered_coords(reference, &yc);

    // Cross-covariance matrix.
    let r: Matrix3<f64> = &x * y.transpose();

    // Explicit cofactor expansion; the sign decides whether the best fit
    // needs the reflection correction.
    let det_r = r[(0, 0)] * (r[(1, 1)] * r[(2, 2)] - r[(1, 2)] * r[(2, 1)])
        - r[(0, 1)] * (r[(1, 0)] * r[(2, 2)] - r[(1, 2)] * r[(2, 0)])
        + r[(0, 2)] * (r[(1, 0)] * r[(2, 1)] - r[(1, 1)] * r[(2, 0)]);

    let svd = r
        .try_svd(true, true, SVD_EPSILON, SVD_MAX_ITER)
        .ok_or(Error::NumericalFailure {
            routine: "svd",
            status: SVD_MAX_ITER as i32,
        })?;
    let mut u = svd.u.ok_or(Error::NumericalFailure { routine: "svd", status: -1 })?;
    let v_t = svd.v_t.ok_or(Error::NumericalFailure { routine: "svd", status: -1 })?;
    let singular_values = [
        svd.singular_values[0],
        svd.singular_values[1],
        svd.singular_values[2],
    ];

    // Negating the column paired with the smallest singular value turns
    // an improper best fit into the best proper rotation.
    if det_r < 0.0 {
        u.column_mut(2).neg_mut();
    }

    // u * v_t takes the reference frame onto the moving frame; the
    // transpose is the rotation we want to apply to `moving`.
    let rotation = (u * v_t).transpose();

    let mut w = XForm::new();
    w.translate(&yc);
    w.concat(&rotation);
    w.translate(&xc.neg());

    Ok((w, singular_values))
}

/// Optimal rigid superposition of `moving` onto `reference`, warning on a
/// near-singular cross-covariance matrix.
pub fn superposition(moving: &AtomGroup, reference: &AtomGroup) -> Result<XForm, Error> {
    let (xform, singular_values) = superposition_with_singular_values(moving, reference)?;
    if singular_values[2] < ZERO_SINGULAR_VALUE {
        print_log_msg(
            WARN,
            &format!(
                "superposition is near-indeterminate (smallest singular value {:.3e}); consider using more atoms",
                singular_values[2]
            ),
        );
    }
    Ok(xform)
}

/// Compute the superposition, apply it to `moving` in place, and return
/// the transform used.
pub fn align_onto(moving: &mut AtomGroup, reference: &AtomGroup) -> Result<XForm, Error> {
    let xform = superposition(moving, reference)?;
    moving.apply_transform(&xform);
    Ok(xform)
}
