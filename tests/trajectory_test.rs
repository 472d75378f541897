use std::fs;
use std::path::PathBuf;

use trajalign::cli::config::AlignConfig;
use trajalign::cli::workflows::align::run_align;
use trajalign::cli::workflows::load_ensemble;
use trajalign::prelude::*;

const MODEL_PDB: &str = "\
REMARK toy three-residue model
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   1       1.458   0.000   0.000  1.00  0.00           C
ATOM      3  C   ALA A   1       2.009   1.420   0.000  1.00  0.00           C
ATOM      4  N   GLY A   2       3.332   1.536   0.000  1.00  0.00           N
ATOM      5  CA  GLY A   2       4.023   2.810   0.150  1.00  0.00           C
ATOM      6  C   GLY A   2       5.520   2.600   0.350  1.00  0.00           C
ATOM      7  N   SER A   3       6.240   3.710   0.420  1.00  0.00           N
ATOM      8  CA  SER A   3       7.690   3.680   0.610  1.00  0.00           C
ATOM      9  C   SER A   3       8.340   5.050   0.480  1.00  0.00           C
END
";

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("trajalign_{}_{}", std::process::id(), name))
}

fn write_test_inputs(tag: &str) -> (PathBuf, PathBuf) {
    let model_path = temp_path(&format!("{}_model.pdb", tag));
    fs::write(&model_path, MODEL_PDB).unwrap();

    let model = PdbReader::from_file(&model_path).unwrap().read_group().unwrap();
    assert_eq!(model.len(), 9);

    // frames are rigid-body motions of the model, so alignment must
    // collapse them back onto each other
    let traj_path = temp_path(&format!("{}_traj.dcd", tag));
    let mut writer = DcdWriter::create(&traj_path).unwrap();
    writer.set_frame_count(4);
    for k in 0..4 {
        let mut frame = model.clone();
        let mut w = XForm::new();
        w.translate(&Coordinate::new(2.0 * k as f64, -(k as f64), 0.5 * k as f64));
        frame.apply_transform(&w);
        writer.write_frame(&frame).unwrap();
    }
    (model_path, traj_path)
}

#[test]
fn test_load_ensemble_applies_selection_per_frame() {
    let (model_path, traj_path) = write_test_inputs("load");
    let (subset, ensemble) = load_ensemble(
        model_path.to_str().unwrap(),
        traj_path.to_str().unwrap(),
        "^CA$",
    )
    .unwrap();
    assert_eq!(subset.len(), 3);
    assert_eq!(ensemble.len(), 4);
    // frame 2 is the model shifted by (4, -2, 1); CA of residue 1 sits at
    // x = 1.458 in the model
    assert!((ensemble[2].atoms[0].coord.x - 5.458).abs() < 1e-4);

    fs::remove_file(model_path).ok();
    fs::remove_file(traj_path).ok();
}

#[test]
fn test_align_workflow_writes_aligned_trajectory() {
    let (model_path, traj_path) = write_test_inputs("align");
    let output_path = temp_path("aligned.dcd");

    let config = AlignConfig { selection: "^CA$".to_string(), ..AlignConfig::default() };
    run_align(
        model_path.to_str().unwrap(),
        traj_path.to_str().unwrap(),
        output_path.to_str().unwrap(),
        &config,
        false,
    )
    .unwrap();

    let mut reader = DcdReader::open(&output_path).unwrap();
    assert_eq!(reader.natoms, 3);
    let frames = reader.read_all().unwrap();
    assert_eq!(frames.len(), 4);
    // rigid copies collapse onto a common structure after alignment
    for frame in &frames[1..] {
        let rmsd: f64 = frames[0]
            .coords
            .iter()
            .zip(frame.coords.iter())
            .map(|(a, b)| {
                let d = a.sub(b);
                d.dot(&d)
            })
            .sum::<f64>()
            / frames[0].coords.len() as f64;
        assert!(rmsd.sqrt() < 1e-3);
    }

    fs::remove_file(model_path).ok();
    fs::remove_file(traj_path).ok();
    fs::remove_file(output_path).ok();
}
