use regex::Regex;

use crate::error::Error;
use crate::geometry::transform::XForm;
use crate::structure::atom::Atom;
use crate::structure::coordinate::Coordinate;

/// An ordered group of atoms with positional correspondence semantics:
/// index i in one group corresponds to index i in another group of the
/// same cardinality. No operation reorders the atoms.
#[derive(Debug, Clone, Default)]
pub struct AtomGroup {
    pub atoms: Vec<Atom>,
    /// Periodic box lengths, if the frame carries one.
    pub periodic_box: Option<Coordinate>,
}

impl AtomGroup {
    pub fn new() -> AtomGroup {
        AtomGroup { atoms: Vec::new(), periodic_box: None }
    }

    pub fn from_atoms(atoms: Vec<Atom>) -> AtomGroup {
        AtomGroup { atoms, periodic_box: None }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn push(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn coords(&self) -> impl Iterator<Item = &Coordinate> {
        self.atoms.iter().map(|a| &a.coord)
    }

    /// Unweighted mean of all coordinates.
    pub fn centroid(&self) -> Coordinate {
        let mut sum = Coordinate::zero();
        for atom in &self.atoms {
            sum = sum.add(&atom.coord);
        }
        sum.div(self.len() as f64)
    }

    /// Mass-weighted mean. Zero or negative total mass cannot be divided
    /// through meaningfully and is rejected.
    pub fn center_of_mass(&self) -> Result<Coordinate, Error> {
        let mut sum = Coordinate::zero();
        let mut total_mass = 0.0;
        for atom in &self.atoms {
            sum = sum.add(&atom.coord.scale(atom.mass));
            total_mass += atom.mass;
        }
        if total_mass <= 0.0 {
            return Err(Error::degenerate(format!(
                "total mass {} is not positive", total_mass
            )));
        }
        Ok(sum.div(total_mass))
    }

    /// Root-mean-square deviation between corresponding atoms.
    pub fn rmsd(&self, other: &AtomGroup) -> Result<f64, Error> {
        if self.len() != other.len() {
            return Err(Error::CardinalityMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        if self.is_empty() {
            return Err(Error::degenerate("RMSD of empty groups"));
        }
        let sum_sq: f64 = self
            .atoms
            .iter()
            .zip(other.atoms.iter())
            .map(|(a, b)| {
                let d = a.coord.sub(&b.coord);
                d.dot(&d)
            })
            .sum();
        Ok((sum_sq / self.len() as f64).sqrt())
    }

    /// Apply a rigid transform to every coordinate in place.
    pub fn apply_transform(&mut self, xform: &XForm) {
        for atom in &mut self.atoms {
            atom.coord = xform.transform(&atom.coord);
        }
    }

    /// Order-preserving selection by atom name, e.g. `^CA$` for
    /// alpha-carbons.
    pub fn select_by_name(&self, pattern: &Regex) -> AtomGroup {
        let atoms = self
            .atoms
            .iter()
            .filter(|a| pattern.is_match(&a.name))
            .cloned()
            .collect();
        AtomGroup { atoms, periodic_box: self.periodic_box }
    }

    /// Indices of the atoms a selection would keep. Used to map a
    /// selection on the model onto per-frame coordinate arrays.
    pub fn indices_by_name(&self, pattern: &Regex) -> Vec<usize> {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, a)| pattern.is_match(&a.name))
            .map(|(i, _)| i)
            .collect()
    }

    /// Clone of this group with coordinates taken from `coords` at the
    /// given indices. `coords` holds one coordinate per model atom.
    pub fn with_frame_coords(
        &self,
        indices: &[usize],
        coords: &[Coordinate],
    ) -> Result<AtomGroup, Error> {
        if self.len() != indices.len() {
            return Err(Error::CardinalityMismatch {
                expected: self.len(),
                found: indices.len(),
            });
        }
        let mut group = self.clone();
        for (atom, &i) in group.atoms.iter_mut().zip(indices.iter()) {
            let coord = coords.get(i).ok_or_else(|| {
                Error::degenerate(format!(
                    "frame has {} coordinates but selection index {} was requested",
                    coords.len(), i
                ))
            })?;
            atom.coord = *coord;
        }
        Ok(group)
    }
}

#[cfg(test)]
mod group_tests {
    use super::*;

    fn group(coords: &[[f64; 3]]) -> AtomGroup {
        AtomGroup::from_atoms(
            coords
                .iter()
                .map(|&c| Atom::new("CA", 12.011, Coordinate::from_array(c)))
                .collect(),
        )
    }

    #[test]
    fn test_centroid_and_com() {
        let g = group(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        assert_eq!(g.centroid(), Coordinate::new(1.0, 0.0, 0.0));
        // equal masses: COM == centroid
        let com = g.center_of_mass().unwrap();
        assert!(com.distance(&g.centroid()) < 1e-12);
    }

    #[test]
    fn test_com_rejects_zero_mass() {
        let mut g = group(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        for atom in &mut g.atoms {
            atom.mass = 0.0;
        }
        assert!(matches!(g.center_of_mass(), Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn test_rmsd_symmetric() {
        let a = group(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 0.0, 1.0]]);
        let b = group(&[[0.5, 0.0, 0.0], [1.0, 2.0, 1.0], [2.0, 0.0, 3.0]]);
        let ab = a.rmsd(&b).unwrap();
        let ba = b.rmsd(&a).unwrap();
        assert!((ab - ba).abs() < 1e-12);
        assert!(a.rmsd(&a).unwrap() < 1e-12);
    }

    #[test]
    fn test_rmsd_cardinality_mismatch() {
        let a = group(&[[0.0, 0.0, 0.0]]);
        let b = group(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert!(matches!(
            a.rmsd(&b),
            Err(Error::CardinalityMismatch { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn test_select_preserves_order() {
        let mut g = group(&[[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        g.atoms[1].name = "CB".to_string();
        let re = Regex::new("^CA$").unwrap();
        let sel = g.select_by_name(&re);
        assert_eq!(sel.len(), 2);
        assert_eq!(sel.atoms[1].coord.x, 2.0);
        assert_eq!(g.indices_by_name(&re), vec![0, 2]);
    }
}
