//! papi - resolve placeholder tags from the command line

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = papi::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
