use crate::structure::coordinate::Coordinate;

/// A single atom: a coordinate plus the metadata the alignment and
/// inertia routines need. Mass must be positive for mass-weighted
/// operations; the loaders guarantee this.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub name: String,
    pub mass: f64,
    pub coord: Coordinate,
}

impl Atom {
    pub fn new(name: &str, mass: f64, coord: Coordinate) -> Atom {
        Atom { name: name.to_string(), mass, coord }
    }
}
