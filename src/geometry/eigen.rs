use nalgebra::{Matrix3, SymmetricEigen};

use crate::error::Error;
use crate::structure::coordinate::Coordinate;

// Convergence parameters for the Jacobi-style symmetric eigensolver.
const EIGEN_EPSILON: f64 = 1.0e-12;
const EIGEN_MAX_ITER: usize = 256;

/// Decompose a symmetric 3x3 matrix into eigenvalue/eigenvector pairs,
/// reordered so the largest eigenvalue comes first.
///
/// Returns four coordinates: the three unit eigenvectors (largest to
/// smallest eigenvalue) followed by the eigenvalue triple divided by
/// `n`, the number of points that built the matrix. Solver
/// non-convergence surfaces as `NumericalFailure` with the iteration cap
/// as status.
pub fn sorted_eigen_axes(matrix: Matrix3<f64>, n: usize) -> Result<[Coordinate; 4], Error> {
    if n == 0 {
        return Err(Error::degenerate("eigendecomposition over zero points"));
    }
    let eigen = SymmetricEigen::try_new(matrix, EIGEN_EPSILON, EIGEN_MAX_ITER)
        .ok_or(Error::NumericalFailure {
            routine: "symmetric_eigen",
            status: EIGEN_MAX_ITER as i32,
        })?;

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut results = [Coordinate::zero(); 4];
    for (slot, &i) in order.iter().enumerate() {
        let v = eigen.eigenvectors.column(i);
        results[slot] = Coordinate::new(v[0], v[1], v[2]);
    }
    results[3] = Coordinate::new(
        eigen.eigenvalues[order[0]],
        eigen.eigenvalues[order[1]],
        eigen.eigenvalues[order[2]],
    )
    .div(n as f64);

    Ok(results)
}

#[cfg(test)]
mod eigen_tests {
    use super::*;

    #[test]
    fn test_diagonal_matrix_ordering() {
        let m = Matrix3::new(2.0, 0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 1.0);
        let res = sorted_eigen_axes(m, 1).unwrap();
        // eigenvalues descending
        assert!((res[3].x - 5.0).abs() < 1e-10);
        assert!((res[3].y - 2.0).abs() < 1e-10);
        assert!((res[3].z - 1.0).abs() < 1e-10);
        // largest axis is y
        assert!(res[0].y.abs() > 0.999);
    }

    #[test]
    fn test_axes_orthonormal() {
        let m = Matrix3::new(4.0, 1.0, 0.5, 1.0, 3.0, 0.2, 0.5, 0.2, 2.0);
        let res = sorted_eigen_axes(m, 3).unwrap();
        for i in 0..3 {
            assert!((res[i].norm() - 1.0).abs() < 1e-10);
            for j in (i + 1)..3 {
                assert!(res[i].dot(&res[j]).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_eigenvalues_scaled_by_point_count() {
        let m = Matrix3::new(8.0, 0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 2.0);
        let res = sorted_eigen_axes(m, 4).unwrap();
        assert!((res[3].x - 2.0).abs() < 1e-10);
        assert!((res[3].z - 0.5).abs() < 1e-10);
    }
}
