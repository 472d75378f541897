use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::Error;
use crate::structure::atom::Atom;
use crate::structure::core::AtomGroup;
use crate::structure::coordinate::Coordinate;
use crate::utils::masses::guess_mass;

/// A PDB reader. Only ATOM/HETATM records are consumed; everything the
/// alignment engine needs is the atom name, the coordinates, and a mass
/// guessed from the element column.
#[derive(Debug)]
pub struct Reader<R: io::Read> {
    pub reader: R,
}

impl Reader<File> {
    pub fn new(file: File) -> Self {
        Reader { reader: file }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(Reader::new(File::open(path)?))
    }

    pub fn read_group(&self) -> Result<AtomGroup, Error> {
        read_group_from(BufReader::new(&self.reader))
    }

    pub fn read_group_from_gz(&self) -> Result<AtomGroup, Error> {
        read_group_from(BufReader::new(GzDecoder::new(&self.reader)))
    }
}

fn read_group_from<B: BufRead>(reader: B) -> Result<AtomGroup, Error> {
    let mut group = AtomGroup::new();
    for line in reader.lines() {
        let line = line?;
        if line.len() < 54 {
            continue;
        }
        match &line[..6] {
            "ATOM  " | "HETATM" => {
                // Malformed coordinate fields are skipped, as partial
                // records are common in hand-edited files.
                if let Some(atom) = parse_atom_line(&line) {
                    group.push(atom);
                }
            }
            _ => continue,
        }
    }
    Ok(group)
}

fn parse_atom_line(line: &str) -> Option<Atom> {
    let name = line.get(12..16)?.trim();
    let x = line.get(30..38)?.trim().parse::<f64>().ok()?;
    let y = line.get(38..46)?.trim().parse::<f64>().ok()?;
    let z = line.get(46..54)?.trim().parse::<f64>().ok()?;
    let element = line.get(76..78).unwrap_or("").trim();
    let mass = guess_mass(name, element);
    Some(Atom::new(name, mass, Coordinate::new(x, y, z)))
}
