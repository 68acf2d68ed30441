//! # r2rmod
//!
//! Transfers base modification calls from read-to-read alignments onto
//! reference-aligned reads.
use clap::Parser;
use env_logger::Env;
use r2rmod_core::{Cli, commands};

/// Main function, run the program. All business logic handled by `run`
fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level())).init();

    match commands::run(cli) {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error during execution: {e}");
            std::process::exit(1);
        }
    }
}
