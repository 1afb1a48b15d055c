//! orgmark CLI - Org-mode to HTML converter

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::debug;

/// orgmark - Convert an Org-mode file to HTML.
///
/// Writes the HTML fragment to standard output.
#[derive(Parser, Debug)]
#[command(
    name = "orgmark",
    version,
    about = "Convert an Org-mode file to HTML",
    after_help = "Set RUST_LOG=debug to trace how malformed markup was handled."
)]
struct Cli {
    /// Org file to convert
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("orgmark: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Set up logging from `RUST_LOG`, warnings and errors by default.
fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let html = orgmark::convert_file(&cli.file)?;
    debug!("rendered {} bytes of HTML", html.len());

    let mut stdout = io::stdout().lock();
    stdout.write_all(html.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
