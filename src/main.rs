//! # Almanac CLI
//!
//! Usage:
//!   almanac planner.json -o planner.pdf
//!   echo '{ ... }' | almanac -o planner.pdf
//!   almanac --example > planner.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use almanac::{compose, Planner, PlannerError};
use almanac::pdf::PdfWriter;

/// Compose a hyperlinked PDF planner from a JSON description.
#[derive(Parser)]
#[command(version, about, name = "almanac")]
struct Args {
    /// Planner description. Read from stdin when omitted.
    input: Option<PathBuf>,

    /// Where to write the PDF
    #[arg(short, long, default_value = "planner.pdf")]
    output: PathBuf,

    /// Print a sample planner description and exit
    #[arg(long)]
    example: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e);
            if let Some(hint) = e.hint() {
                eprintln!("  hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), PlannerError> {
    if args.example {
        println!("{}", Planner::sample().to_json_pretty()?);
        return Ok(());
    }

    let input = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let planner = Planner::from_json(&input)?;
    let composition = compose(&planner)?;
    for failure in composition.failures() {
        eprintln!(
            "! page '{}': {} skipped: {}",
            failure.page, failure.stage, failure.error
        );
    }

    let pdf_bytes = PdfWriter::new().write(composition.canvas(), &planner.metadata);
    fs::write(&args.output, &pdf_bytes)?;
    eprintln!(
        "✓ Written {} pages ({} bytes) to {}",
        composition.canvas().pages().len(),
        pdf_bytes.len(),
        args.output.display()
    );
    Ok(())
}
