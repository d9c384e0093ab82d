use clap::Parser;
use dp_pairwise_aligner::{cli::Cli, error::AlignError};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let stdout = std::io::stdout();
    match args.run(&mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            // Bad sequences or tables are input errors, everything else is a failure.
            match e.downcast_ref::<AlignError>() {
                Some(AlignError::Io(_)) | None => ExitCode::FAILURE,
                Some(_) => ExitCode::from(2),
            }
        }
    }
}
