//! `gurl`: fetch one URL and write its body to standard output or a file.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use gurl_net::{EnvPassphrase, PassphraseProvider, TerminalPrompt, fetch};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let env_passphrase = EnvPassphrase::default();
    let provider: &dyn PassphraseProvider = if env_passphrase.is_set() {
        &env_passphrase
    } else {
        &TerminalPrompt
    };

    match fetch(&cli.fetch_config(), provider) {
        Ok(summary) => {
            tracing::debug!("Wrote {} bytes", summary.bytes_copied);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("gurl: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so the body on stdout stays clean. `RUST_LOG` wins over
/// `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
