//! Workflow for aligning a trajectory onto its self-consistent average
//! structure and writing the aligned frames back out as DCD.

use crate::cli::config::AlignConfig;
use crate::cli::workflows::load_ensemble;
use crate::error::Error;
use crate::geometry::ensemble::{iterative_alignment, AlignmentStatus};
use crate::structure::io::dcd::DcdWriter;
use crate::utils::log::{print_log_msg, DONE, INFO, WARN};

pub const HELP_ALIGN: &str = "\
USAGE: trajalign align [OPTIONS] <MODEL.pdb> <TRAJ.dcd> <OUTPUT.dcd>
Options:
    -s, --selection <REGEX>     Atom-name selection (default: ^CA$)
        --tolerance <RMSD>      Convergence threshold for the average structure
        --max-iter <N>          Iteration cap for the iterative aligner
    -c, --config <TOML>         Read selection/tolerance/max-iter from a TOML file
    -t, --threads <THREADS>     Number of threads to use
    -v, --verbose               Print alignment progress
    -h, --help                  Print this help menu
";

pub fn run_align(
    model_path: &str,
    traj_path: &str,
    output_path: &str,
    config: &AlignConfig,
    verbose: bool,
) -> Result<(), Error> {
    let (subset, mut ensemble) = load_ensemble(model_path, traj_path, &config.selection)?;
    if verbose {
        print_log_msg(
            INFO,
            &format!(
                "selection '{}' kept {} atoms over {} frames",
                config.selection,
                subset.len(),
                ensemble.len()
            ),
        );
    }

    let report = iterative_alignment(&mut ensemble, &config.align_options())?;
    match report.status {
        AlignmentStatus::Converged => print_log_msg(
            INFO,
            &format!(
                "iterative alignment converged to RMSD of {:.6e} with {} iterations",
                report.final_rmsd, report.iterations
            ),
        ),
        AlignmentStatus::Exhausted => print_log_msg(
            WARN,
            &format!(
                "iterative alignment hit the {}-iteration cap at RMSD {:.6e}",
                report.iterations, report.final_rmsd
            ),
        ),
    }

    let mut writer = DcdWriter::create(output_path)?;
    writer.set_titles(vec![format!(
        "trajalign align {} {} selection={}",
        model_path, traj_path, config.selection
    )]);
    writer.set_frame_count(ensemble.len() as u32);
    for frame in &ensemble {
        writer.write_frame(frame)?;
    }

    print_log_msg(
        DONE,
        &format!("wrote {} aligned frames to {}", ensemble.len(), output_path),
    );
    Ok(())
}
