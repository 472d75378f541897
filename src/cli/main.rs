use trajalign::cli::config::{read_align_config_from_file, AlignConfig};
use trajalign::cli::workflows::align::{run_align, HELP_ALIGN};
use trajalign::cli::workflows::avgconv::{run_avgconv, HELP_AVGCONV};
use trajalign::cli::AppArgs;
use trajalign::utils::log::{print_log_msg, FAIL};

const HELP: &str = "\
USAGE: trajalign align [OPTIONS] <MODEL.pdb> <TRAJ.dcd> <OUTPUT.dcd>
       trajalign avgconv [OPTIONS] <MODEL.pdb> <TRAJ.dcd>

SUBCOMMANDS:
  align     Iteratively align a trajectory onto its average structure
  avgconv   Measure convergence of the average structure over growing blocks
OPTIONS:
  -t, --threads <THREADS>    Number of threads to use
  -h, --help                 Print this help menu
";

fn parse_arg() -> Result<AppArgs, Box<dyn std::error::Error>> {
    let mut args = pico_args::Arguments::from_env();
    match args.subcommand()?.as_deref() {
        Some("align") => {
            let parsed = AppArgs::Align {
                selection: args.opt_value_from_str(["-s", "--selection"])?,
                tolerance: args.opt_value_from_str("--tolerance")?,
                max_iterations: args.opt_value_from_str("--max-iter")?,
                config_path: args.opt_value_from_str(["-c", "--config"])?,
                threads: args.value_from_str(["-t", "--threads"]).unwrap_or(1),
                verbose: args.contains(["-v", "--verbose"]),
                help: args.contains(["-h", "--help"]),
                model_path: args.opt_free_from_str()?.unwrap_or_default(),
                traj_path: args.opt_free_from_str()?.unwrap_or_default(),
                output_path: args.opt_free_from_str()?.unwrap_or_default(),
            };
            Ok(parsed)
        }
        Some("avgconv") => {
            let parsed = AppArgs::Avgconv {
                selection: args.opt_value_from_str(["-s", "--selection"])?,
                range: args.opt_value_from_str(["-r", "--range"])?,
                locally_optimal: args.contains("--local"),
                threads: args.value_from_str(["-t", "--threads"]).unwrap_or(1),
                verbose: args.contains(["-v", "--verbose"]),
                help: args.contains(["-h", "--help"]),
                model_path: args.opt_free_from_str()?.unwrap_or_default(),
                traj_path: args.opt_free_from_str()?.unwrap_or_default(),
            };
            Ok(parsed)
        }
        Some(_) => Err("Invalid subcommand".into()),
        None => Ok(AppArgs::Global {
            help: args.contains(["-h", "--help"]),
        }),
    }
}

fn build_config(
    config_path: Option<&str>,
    selection: Option<String>,
    tolerance: Option<f64>,
    max_iterations: Option<usize>,
) -> AlignConfig {
    let mut config = match config_path {
        Some(path) => read_align_config_from_file(path).unwrap_or_else(|e| {
            print_log_msg(FAIL, &format!("could not read config {}: {}", path, e));
            std::process::exit(1);
        }),
        None => AlignConfig::default(),
    };
    if let Some(selection) = selection {
        config.selection = selection;
    }
    if let Some(tolerance) = tolerance {
        config.tolerance = tolerance;
    }
    if let Some(max_iterations) = max_iterations {
        config.max_iterations = max_iterations;
    }
    config
}

fn setup_threads(threads: usize) {
    if threads > 1 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .expect("Failed to configure the thread pool");
    }
}

fn main() {
    let parsed_args = parse_arg().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    match parsed_args {
        AppArgs::Global { help } => {
            if help {
                println!("{}", HELP);
            } else {
                println!("No subcommand specified. Try `trajalign --help` for more information.");
            }
        }
        AppArgs::Align {
            model_path,
            traj_path,
            output_path,
            selection,
            tolerance,
            max_iterations,
            config_path,
            threads,
            verbose,
            help,
        } => {
            if help || model_path.is_empty() || traj_path.is_empty() || output_path.is_empty() {
                println!("{}", HELP_ALIGN);
                return;
            }
            setup_threads(threads);
            let config = build_config(config_path.as_deref(), selection, tolerance, max_iterations);
            if let Err(e) = run_align(&model_path, &traj_path, &output_path, &config, verbose) {
                print_log_msg(FAIL, &e.to_string());
                std::process::exit(1);
            }
        }
        AppArgs::Avgconv {
            model_path,
            traj_path,
            selection,
            range,
            locally_optimal,
            threads,
            verbose,
            help,
        } => {
            if help || model_path.is_empty() || traj_path.is_empty() {
                println!("{}", HELP_AVGCONV);
                return;
            }
            setup_threads(threads);
            let config = build_config(None, selection, None, None);
            if let Err(e) = run_avgconv(
                &model_path,
                &traj_path,
                range.as_deref(),
                locally_optimal,
                &config,
                verbose,
            ) {
                print_log_msg(FAIL, &e.to_string());
                std::process::exit(1);
            }
        }
    }
}
