// src/main.rs

use std::process::ExitCode;

use flowdag::{cli, logging, run};

/// Exit status 1 covers both an invalid flow file and a failed run; the
/// reason is printed to stderr.
#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("flowdag: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("flowdag error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
