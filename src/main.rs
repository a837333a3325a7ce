use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use veil::cli::{commands, output, Cli};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so command output on stdout stays pipeable.
    let filter = EnvFilter::try_from_env("VEIL_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("veil=debug")
        } else {
            EnvFilter::new("veil=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = commands::execute(&cli) {
        output::error(&e.to_string());
        if let Some(hint) = e.hint() {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
