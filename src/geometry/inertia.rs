use nalgebra::{Matrix3, Matrix3xX};

use crate::error::Error;
use crate::geometry::eigen::sorted_eigen_axes;
use crate::structure::core::AtomGroup;
use crate::structure::coordinate::Coordinate;

/// Inertia tensor about the center of mass.
pub fn moments_of_inertia_tensor(group: &AtomGroup) -> Result<Matrix3<f64>, Error> {
    let com = group.center_of_mass()?;
    let mut tensor = Matrix3::zeros();
    for atom in &group.atoms {
        let u = atom.coord.sub(&com);
        let m = atom.mass;
        tensor[(0, 0)] += m * (u.y * u.y + u.z * u.z);
        tensor[(1, 1)] += m * (u.x * u.x + u.z * u.z);
        tensor[(2, 2)] += m * (u.x * u.x + u.y * u.y);
        tensor[(0, 1)] -= m * u.x * u.y;
        tensor[(0, 2)] -= m * u.x * u.z;
        tensor[(1, 2)] -= m * u.y * u.z;
    }
    tensor[(1, 0)] = tensor[(0, 1)];
    tensor[(2, 0)] = tensor[(0, 2)];
    tensor[(2, 1)] = tensor[(1, 2)];
    Ok(tensor)
}

/// Centroid-subtracted coordinates as a 3xN matrix, one atom per column.
pub(crate) fn centered_coords(group: &AtomGroup, center: &Coordinate) -> Matrix3xX<f64> {
    Matrix3xX::from_fn(group.len(), |r, c| {
        let u = group.atoms[c].coord.sub(center);
        match r {
            0 => u.x,
            1 => u.y,
            _ => u.z,
        }
    })
}

/// Unweighted covariance of the centroid-subtracted coordinates, `A * At`.
pub fn scatter_matrix(group: &AtomGroup) -> Matrix3<f64> {
    let a = centered_coords(group, &group.centroid());
    &a * a.transpose()
}

fn require_enough_atoms(group: &AtomGroup) -> Result<(), Error> {
    if group.len() < 3 {
        return Err(Error::degenerate(format!(
            "{} atoms cannot support a 3x3 decomposition", group.len()
        )));
    }
    Ok(())
}

/// Principal moments of inertia: three axes ordered by descending moment
/// plus a fourth entry packing the scaled eigenvalues.
pub fn moments_of_inertia(group: &AtomGroup) -> Result<[Coordinate; 4], Error> {
    require_enough_atoms(group)?;
    let tensor = moments_of_inertia_tensor(group)?;
    sorted_eigen_axes(tensor, group.len())
}

/// Principal axes of the unweighted coordinate scatter.
pub fn principal_axes(group: &AtomGroup) -> Result<[Coordinate; 4], Error> {
    require_enough_atoms(group)?;
    sorted_eigen_axes(scatter_matrix(group), group.len())
}
