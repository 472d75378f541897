//! Command line interface for trajalign.

// Arguments of the CLI app are defined here

pub mod config;
pub mod workflows;

pub enum AppArgs {
    Global {
        help: bool,
    },
    Align {
        model_path: String,
        traj_path: String,
        output_path: String,
        selection: Option<String>,
        tolerance: Option<f64>,
        max_iterations: Option<usize>,
        config_path: Option<String>,
        threads: usize,
        verbose: bool,
        help: bool,
    },
    Avgconv {
        model_path: String,
        traj_path: String,
        selection: Option<String>,
        range: Option<String>,
        locally_optimal: bool,
        threads: usize,
        verbose: bool,
        help: bool,
    },
}
