use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use dlx_sudoku_solver::config::Config;
use dlx_sudoku_solver::pipeline;
use env_logger::Env;
use log::error;

const DEFAULT_INPUT: &str = "puzzles.txt";
const DEFAULT_OUTPUT: &str = "solutions.txt";

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().default_filter_or("info")); // RUST_LOG

    let mut args = env::args().skip(1);
    let input_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_INPUT.to_owned()));
    let output_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_owned()));

    let config = Config::from_env();

    match pipeline::run(&config, &input_path, &output_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
