pub mod align;
pub mod avgconv;

use std::io;

use regex::Regex;

use crate::error::Error;
use crate::structure::core::AtomGroup;
use crate::structure::io::dcd::DcdReader;
use crate::structure::io::pdb::Reader as PdbReader;

pub(crate) fn invalid_input(msg: String) -> Error {
    Error::Io(io::Error::new(io::ErrorKind::InvalidInput, msg))
}

/// Load the model, apply the selection, and expand the trajectory into an
/// ensemble of selected-atom frames with positional correspondence.
pub fn load_ensemble(
    model_path: &str,
    traj_path: &str,
    selection: &str,
) -> Result<(AtomGroup, Vec<AtomGroup>), Error> {
    let reader = PdbReader::from_file(model_path)?;
    let model = if model_path.ends_with(".gz") {
        reader.read_group_from_gz()?
    } else {
        reader.read_group()?
    };
    if model.is_empty() {
        return Err(Error::degenerate(format!("no atoms found in {}", model_path)));
    }

    let pattern = Regex::new(selection)
        .map_err(|e| invalid_input(format!("bad selection '{}': {}", selection, e)))?;
    let indices = model.indices_by_name(&pattern);
    let subset = model.select_by_name(&pattern);
    if subset.is_empty() {
        return Err(Error::degenerate(format!("selection '{}' matched no atoms", selection)));
    }

    let mut traj = DcdReader::open(traj_path)?;
    if traj.natoms != model.len() {
        return Err(Error::CardinalityMismatch {
            expected: model.len(),
            found: traj.natoms,
        });
    }
    let mut ensemble = Vec::new();
    while let Some(frame) = traj.read_frame()? {
        let mut group = subset.with_frame_coords(&indices, &frame.coords)?;
        group.periodic_box = frame.periodic_box;
        ensemble.push(group);
    }
    if ensemble.is_empty() {
        return Err(Error::degenerate(format!("trajectory {} has no frames", traj_path)));
    }
    Ok((subset, ensemble))
}
