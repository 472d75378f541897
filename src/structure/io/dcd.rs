use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Error;
use crate::structure::core::AtomGroup;
use crate::structure::coordinate::Coordinate;

// CHARMM-style DCD: every record is framed by its byte length on both
// sides (Fortran unformatted convention).
const HEADER_WORDS: usize = 21;
const TITLE_WIDTH: usize = 80;
const DCD_VERSION: u32 = 27;
const DEFAULT_UNIT_CELL_ANGLE: f64 = 90.0;
const DEFAULT_TIMESTEP: f32 = 1.0e-3;

fn fix_string_size(s: &str, n: usize) -> String {
    let mut result = s.to_string();
    if result.len() < n {
        result.push_str(&" ".repeat(n - result.len()));
    } else {
        result.truncate(n);
    }
    result
}

/// Writes a DCD trajectory. The atom count is fixed by the first frame;
/// appending past the declared frame count rewrites the header in place
/// with the bumped count before returning to the end of the file.
pub struct DcdWriter<W: Write + Seek> {
    out: W,
    titles: Vec<String>,
    natoms: usize,
    nsteps: u32,
    current: u32,
    timestep: f32,
    has_box: bool,
    header_written: bool,
}

impl DcdWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(DcdWriter::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write + Seek> DcdWriter<W> {
    pub fn new(out: W) -> Self {
        DcdWriter {
            out,
            titles: vec!["written by trajalign".to_string()],
            natoms: 0,
            nsteps: 0,
            current: 0,
            timestep: DEFAULT_TIMESTEP,
            has_box: false,
            header_written: false,
        }
    }

    pub fn set_titles(&mut self, titles: Vec<String>) {
        self.titles = titles;
    }

    pub fn set_timestep(&mut self, timestep: f32) {
        self.timestep = timestep;
    }

    /// Declare the frame count up front to avoid header rewrites.
    pub fn set_frame_count(&mut self, nsteps: u32) {
        self.nsteps = nsteps;
    }

    pub fn frames_written(&self) -> u32 {
        self.current
    }

    fn write_record(&mut self, data: &[u8]) -> Result<(), Error> {
        self.out.write_u32::<LittleEndian>(data.len() as u32)?;
        self.out.write_all(data)?;
        self.out.write_u32::<LittleEndian>(data.len() as u32)?;
        Ok(())
    }

    fn write_header(&mut self) -> Result<(), Error> {
        let mut block = Vec::with_capacity(HEADER_WORDS * 4);
        block.extend_from_slice(b"CORD");
        block.write_u32::<LittleEndian>(self.nsteps)?;
        block.write_u32::<LittleEndian>(1)?; // first step
        block.write_u32::<LittleEndian>(1)?; // step interval
        block.write_u32::<LittleEndian>(self.nsteps)?;
        for _ in 5..8 {
            block.write_u32::<LittleEndian>(0)?;
        }
        let dof = if self.natoms >= 2 { self.natoms as u32 * 3 - 6 } else { 0 };
        block.write_u32::<LittleEndian>(dof)?;
        block.write_u32::<LittleEndian>(0)?; // fixed atoms
        block.write_f32::<LittleEndian>(self.timestep)?;
        block.write_u32::<LittleEndian>(self.has_box as u32)?;
        for _ in 12..20 {
            block.write_u32::<LittleEndian>(0)?;
        }
        block.write_u32::<LittleEndian>(DCD_VERSION)?;
        self.write_record(&block)?;

        let mut titles = Vec::with_capacity(4 + TITLE_WIDTH * self.titles.len());
        titles.write_u32::<LittleEndian>(self.titles.len() as u32)?;
        for title in &self.titles {
            titles.extend_from_slice(fix_string_size(title, TITLE_WIDTH).as_bytes());
        }
        self.write_record(&titles)?;

        let natoms = (self.natoms as u32).to_le_bytes();
        self.write_record(&natoms)?;
        Ok(())
    }

    fn write_box(&mut self, lengths: &Coordinate) -> Result<(), Error> {
        let xtal = [
            lengths.x,
            DEFAULT_UNIT_CELL_ANGLE,
            lengths.y,
            DEFAULT_UNIT_CELL_ANGLE,
            DEFAULT_UNIT_CELL_ANGLE,
            lengths.z,
        ];
        let mut data = Vec::with_capacity(48);
        for v in xtal {
            data.write_f64::<LittleEndian>(v)?;
        }
        self.write_record(&data)
    }

    pub fn write_frame(&mut self, group: &AtomGroup) -> Result<(), Error> {
        if !self.header_written {
            // First frame fixes the atom count and box convention.
            self.natoms = group.len();
            self.has_box = group.periodic_box.is_some();
            self.write_header()?;
            self.header_written = true;
        } else if group.len() != self.natoms {
            return Err(Error::CardinalityMismatch {
                expected: self.natoms,
                found: group.len(),
            });
        }

        let box_lengths = if self.has_box {
            Some(group.periodic_box.ok_or_else(|| {
                Error::degenerate("trajectory carries a periodic box but this frame has none")
            })?)
        } else {
            None
        };

        if self.current >= self.nsteps {
            self.out.seek(SeekFrom::Start(0))?;
            self.nsteps += 1;
            self.write_header()?;
            self.out.seek(SeekFrom::End(0))?;
        }

        if let Some(lengths) = box_lengths {
            self.write_box(&lengths)?;
        }

        let picks: [fn(&Coordinate) -> f64; 3] = [|c| c.x, |c| c.y, |c| c.z];
        for pick in picks {
            let mut data = Vec::with_capacity(self.natoms * 4);
            for atom in &group.atoms {
                data.write_f32::<LittleEndian>(pick(&atom.coord) as f32)?;
            }
            self.write_record(&data)?;
        }

        self.out.flush()?;
        self.current += 1;
        Ok(())
    }
}

/// One frame read back from a DCD stream.
#[derive(Debug, Clone)]
pub struct DcdFrame {
    pub periodic_box: Option<Coordinate>,
    pub coords: Vec<Coordinate>,
}

/// Reads the framed DCD layout produced by `DcdWriter`.
pub struct DcdReader<R: Read> {
    inp: R,
    pub natoms: usize,
    pub nsteps: u32,
    pub timestep: f32,
    pub has_box: bool,
    pub titles: Vec<String>,
}

impl DcdReader<io::BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        DcdReader::new(io::BufReader::new(File::open(path)?))
    }
}

fn malformed(msg: &str) -> Error {
    Error::Io(io::Error::new(io::ErrorKind::InvalidData, msg.to_string()))
}

impl<R: Read> DcdReader<R> {
    pub fn new(mut inp: R) -> Result<Self, Error> {
        let header = read_record(&mut inp)?.ok_or_else(|| malformed("empty DCD stream"))?;
        if header.len() != HEADER_WORDS * 4 || &header[..4] != b"CORD" {
            return Err(malformed("not a DCD stream: bad header record"));
        }
        let word = |i: usize| u32::from_le_bytes(header[i * 4..i * 4 + 4].try_into().unwrap());
        let nsteps = word(1);
        let timestep = f32::from_le_bytes(header[40..44].try_into().unwrap());
        let has_box = word(11) != 0;

        let title_block =
            read_record(&mut inp)?.ok_or_else(|| malformed("truncated DCD title record"))?;
        if title_block.len() < 4 {
            return Err(malformed("truncated DCD title record"));
        }
        let ntitles = u32::from_le_bytes(title_block[..4].try_into().unwrap()) as usize;
        if title_block.len() != 4 + ntitles * TITLE_WIDTH {
            return Err(malformed("DCD title record length disagrees with title count"));
        }
        let titles = (0..ntitles)
            .map(|i| {
                let start = 4 + i * TITLE_WIDTH;
                String::from_utf8_lossy(&title_block[start..start + TITLE_WIDTH])
                    .trim_end()
                    .to_string()
            })
            .collect();

        let natoms_block =
            read_record(&mut inp)?.ok_or_else(|| malformed("truncated DCD atom-count record"))?;
        if natoms_block.len() != 4 {
            return Err(malformed("bad DCD atom-count record"));
        }
        let natoms = u32::from_le_bytes(natoms_block[..4].try_into().unwrap()) as usize;

        Ok(DcdReader { inp, natoms, nsteps, timestep, has_box, titles })
    }

    pub fn read_frame(&mut self) -> Result<Option<DcdFrame>, Error> {
        let first = match read_record(&mut self.inp)? {
            Some(record) => record,
            None => return Ok(None),
        };

        let (periodic_box, xs) = if self.has_box {
            if first.len() != 48 {
                return Err(malformed("bad DCD unit-cell record"));
            }
            let cell: Vec<f64> = (0..6)
                .map(|i| f64::from_le_bytes(first[i * 8..i * 8 + 8].try_into().unwrap()))
                .collect();
            let lengths = Coordinate::new(cell[0], cell[2], cell[5]);
            let xs = read_record(&mut self.inp)?
                .ok_or_else(|| malformed("truncated DCD frame"))?;
            (Some(lengths), xs)
        } else {
            (None, first)
        };

        let ys = read_record(&mut self.inp)?.ok_or_else(|| malformed("truncated DCD frame"))?;
        let zs = read_record(&mut self.inp)?.ok_or_else(|| malformed("truncated DCD frame"))?;
        let expected = self.natoms * 4;
        if xs.len() != expected || ys.len() != expected || zs.len() != expected {
            return Err(malformed("DCD coordinate record length disagrees with atom count"));
        }

        let at = |buf: &[u8], i: usize| {
            f32::from_le_bytes(buf[i * 4..i * 4 + 4].try_into().unwrap()) as f64
        };
        let coords = (0..self.natoms)
            .map(|i| Coordinate::new(at(&xs, i), at(&ys, i), at(&zs, i)))
            .collect();

        Ok(Some(DcdFrame { periodic_box, coords }))
    }

    pub fn read_all(&mut self) -> Result<Vec<DcdFrame>, Error> {
        let mut frames = Vec::new();
        while let Some(frame) = self.read_frame()? {
            frames.push(frame);
        }
        Ok(frames)
    }
}

fn read_record<R: Read>(inp: &mut R) -> Result<Option<Vec<u8>>, Error> {
    let mut lenbuf = [0u8; 4];
    let n = inp.read(&mut lenbuf)?;
    if n == 0 {
        return Ok(None); // clean end of stream
    }
    inp.read_exact(&mut lenbuf[n..])?;
    let len = u32::from_le_bytes(lenbuf) as usize;
    let mut data = vec![0u8; len];
    inp.read_exact(&mut data)?;
    let trailer = inp.read_u32::<LittleEndian>()?;
    if trailer as usize != len {
        return Err(malformed("DCD record framing mismatch"));
    }
    Ok(Some(data))
}

#[cfg(test)]
mod dcd_tests {
    use super::*;
    use crate::structure::atom::Atom;
    use std::io::Cursor;

    fn frame(offset: f64, boxed: bool) -> AtomGroup {
        let mut group = AtomGroup::from_atoms(
            (0..5)
                .map(|i| {
                    Atom::new(
                        "CA",
                        12.011,
                        Coordinate::new(i as f64 + offset, -(i as f64), 0.5 * i as f64),
                    )
                })
                .collect(),
        );
        if boxed {
            group.periodic_box = Some(Coordinate::new(30.0, 40.0, 50.0));
        }
        group
    }

    #[test]
    fn test_round_trip_without_box() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = DcdWriter::new(&mut buf);
            writer.set_titles(vec!["round trip".to_string()]);
            for k in 0..3 {
                writer.write_frame(&frame(k as f64, false)).unwrap();
            }
        }
        buf.set_position(0);
        let mut reader = DcdReader::new(&mut buf).unwrap();
        assert_eq!(reader.natoms, 5);
        assert_eq!(reader.nsteps, 3);
        assert!(!reader.has_box);
        assert_eq!(reader.titles, vec!["round trip".to_string()]);
        let frames = reader.read_all().unwrap();
        assert_eq!(frames.len(), 3);
        assert!((frames[2].coords[4].x - 6.0).abs() < 1e-6);
        assert!(frames[0].periodic_box.is_none());
    }

    #[test]
    fn test_header_rewrite_tracks_frame_count() {
        // declare 1 frame, write 4: every extra frame bumps the header
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = DcdWriter::new(&mut buf);
            writer.set_frame_count(1);
            for k in 0..4 {
                writer.write_frame(&frame(k as f64, true)).unwrap();
            }
            assert_eq!(writer.frames_written(), 4);
        }
        buf.set_position(0);
        let mut reader = DcdReader::new(&mut buf).unwrap();
        assert_eq!(reader.nsteps, 4);
        assert!(reader.has_box);
        let frames = reader.read_all().unwrap();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[1].periodic_box, Some(Coordinate::new(30.0, 40.0, 50.0)));
    }

    #[test]
    fn test_atom_count_mismatch_rejected() {
        let mut buf = Cursor::new(Vec::new());
        let mut writer = DcdWriter::new(&mut buf);
        writer.write_frame(&frame(0.0, false)).unwrap();
        let mut small = frame(0.0, false);
        small.atoms.pop();
        assert!(matches!(
            writer.write_frame(&small),
            Err(Error::CardinalityMismatch { expected: 5, found: 4 })
        ));
    }

    #[test]
    fn test_missing_box_rejected() {
        let mut buf = Cursor::new(Vec::new());
        let mut writer = DcdWriter::new(&mut buf);
        writer.write_frame(&frame(0.0, true)).unwrap();
        assert!(matches!(
            writer.write_frame(&frame(0.0, false)),
            Err(Error::DegenerateInput(_))
        ));
    }
}
