use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use dsse_pep740::convert::convert_file;

/// Convert a DSSE attestation to PEP 740 format for Pulp compatibility.
#[derive(Debug, Parser)]
#[command(name = "convert-dsse-to-pep740", version)]
struct Cli {
    /// Path to the input DSSE attestation file
    dsse_file: PathBuf,
    /// Path to write the PEP 740 formatted output
    output_file: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match convert_file(&cli.dsse_file, &cli.output_file) {
        Ok(()) => {
            println!("Created PEP 740 attestation: {}", cli.output_file.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: Failed to convert attestation: {e:#}");
            ExitCode::FAILURE
        }
    }
}
