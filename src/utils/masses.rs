//! Atomic masses for the elements that show up in biomolecular models.
//! Used by the PDB reader to assign per-atom masses.

pub const DEFAULT_MASS: f64 = 1.0;

pub fn mass_from_element(element: &str) -> Option<f64> {
    match element {
        "H" => Some(1.008),
        "C" => Some(12.011),
        "N" => Some(14.007),
        "O" => Some(15.999),
        "P" => Some(30.974),
        "S" => Some(32.06),
        "NA" => Some(22.990),
        "MG" => Some(24.305),
        "CL" => Some(35.45),
        "K" => Some(39.098),
        "CA" => Some(40.078),
        "MN" => Some(54.938),
        "FE" => Some(55.845),
        "ZN" => Some(65.38),
        "SE" => Some(78.971),
        _ => None,
    }
}

/// Fall back to the first letter of the atom name when the element
/// column is blank (common in minimized or hand-edited PDB files).
pub fn guess_mass(atom_name: &str, element: &str) -> f64 {
    if let Some(m) = mass_from_element(element) {
        return m;
    }
    let first = atom_name.trim_start_matches(|c: char| c.is_ascii_digit());
    match first.get(..1) {
        Some(c) => mass_from_element(c).unwrap_or(DEFAULT_MASS),
        None => DEFAULT_MASS,
    }
}
