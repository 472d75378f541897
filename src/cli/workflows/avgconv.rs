//! Workflow for measuring convergence of the average structure: grow a
//! block of frames, average it, and track the RMSD between successive
//! block averages.

use crate::cli::config::AlignConfig;
use crate::cli::workflows::{invalid_input, load_ensemble};
use crate::error::Error;
use crate::geometry::ensemble::{average_structure, iterative_alignment};
use crate::geometry::superpose::align_onto;
use crate::structure::core::AtomGroup;
use crate::utils::log::{print_log_msg, INFO};

pub const HELP_AVGCONV: &str = "\
USAGE: trajalign avgconv [OPTIONS] <MODEL.pdb> <TRAJ.dcd>
Options:
    -s, --selection <REGEX>     Atom-name selection (default: ^CA$)
    -r, --range <START:STEP:END>
                                Block sizes to test (default: nframes/100 stride)
        --local                 Iteratively align each block independently
                                instead of one global pass
    -t, --threads <THREADS>     Number of threads to use
    -v, --verbose               Print alignment progress
    -h, --help                  Print this help menu

Prints one 'n<TAB>rmsd' row per block size to stdout.
";

/// Parse `start:step:end` (inclusive end) or a comma-separated list.
pub fn parse_range_list(spec: &str) -> Result<Vec<usize>, Error> {
    let bad = || invalid_input(format!("bad range list '{}'", spec));
    if spec.contains(':') {
        let parts: Vec<&str> = spec.split(':').collect();
        if parts.len() != 3 {
            return Err(bad());
        }
        let start: usize = parts[0].parse().map_err(|_| bad())?;
        let step: usize = parts[1].parse().map_err(|_| bad())?;
        let end: usize = parts[2].parse().map_err(|_| bad())?;
        if step == 0 || start == 0 || end < start {
            return Err(bad());
        }
        Ok((start..=end).step_by(step).collect())
    } else {
        spec.split(',')
            .map(|s| s.trim().parse::<usize>().map_err(|_| bad()))
            .collect()
    }
}

fn block_average(
    ensemble: &[AtomGroup],
    size: usize,
    locally_optimal: bool,
    config: &AlignConfig,
) -> Result<AtomGroup, Error> {
    let mut block: Vec<AtomGroup> = ensemble[..size].to_vec();
    if locally_optimal {
        iterative_alignment(&mut block, &config.align_options())?;
    }
    average_structure(&block)
}

pub fn run_avgconv(
    model_path: &str,
    traj_path: &str,
    range: Option<&str>,
    locally_optimal: bool,
    config: &AlignConfig,
    verbose: bool,
) -> Result<(), Error> {
    let (subset, mut ensemble) = load_ensemble(model_path, traj_path, &config.selection)?;
    let nframes = ensemble.len();

    let blocks = match range {
        Some(spec) => parse_range_list(spec)?,
        None => {
            let step = nframes / 100;
            if step == 0 {
                return Err(Error::degenerate(
                    "too few frames for automatic block sizes; pass --range explicitly"
                        .to_string(),
                ));
            }
            (step..nframes).step_by(step).collect()
        }
    };
    if blocks.is_empty()
        || blocks.iter().any(|&size| size == 0 || size > nframes)
    {
        return Err(invalid_input(format!(
            "block sizes must lie in 1..={} frames",
            nframes
        )));
    }

    println!("# trajalign avgconv {} {} selection='{}'", model_path, traj_path, config.selection);
    println!("# Subset has {} atoms", subset.len());
    println!("# Trajectory has {} frames", nframes);
    println!("# Blocks = {}", blocks.len());

    if !locally_optimal {
        let report = iterative_alignment(&mut ensemble, &config.align_options())?;
        println!(
            "# Iterative alignment converged to RMSD of {:.6e} with {} iterations",
            report.final_rmsd, report.iterations
        );
    }
    if verbose {
        print_log_msg(INFO, &format!("computing {} block averages", blocks.len()));
    }

    println!("# n\trmsd");
    let mut preceding = block_average(&ensemble, blocks[0], locally_optimal, config)?;
    for &size in &blocks[1..] {
        let mut avg = block_average(&ensemble, size, locally_optimal, config)?;
        align_onto(&mut avg, &preceding)?;
        let rmsd = preceding.rmsd(&avg)?;
        println!("{}\t{}", size, rmsd);
        preceding = avg;
    }
    Ok(())
}

#[cfg(test)]
mod avgconv_tests {
    use super::*;

    #[test]
    fn test_parse_range_list() {
        assert_eq!(parse_range_list("10:10:50").unwrap(), vec![10, 20, 30, 40, 50]);
        assert_eq!(parse_range_list("5,8,13").unwrap(), vec![5, 8, 13]);
        assert!(parse_range_list("10:0:50").is_err());
        assert!(parse_range_list("10:5").is_err());
        assert!(parse_range_list("").is_err());
    }
}
