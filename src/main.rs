use std::process::ExitCode;

use clap::Parser;
use crossterm::style::Stylize;

mod cli;
mod config;
mod genius;
mod library;
mod pipeline;
mod playlist;
mod producers;
mod query;
mod runtime;

fn main() -> ExitCode {
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version land here too, and are not failures.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    runtime::init_logging(args.verbose);

    match runtime::run(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "prodlist:".red().bold());
            ExitCode::FAILURE
        }
    }
}
