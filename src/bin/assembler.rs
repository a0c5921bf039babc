//! `emu64-asm`: assemble a source file into a program image.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use emu64::{asm, logging};

#[derive(Debug, Parser)]
#[command(name = "emu64-asm", about = "Assemble emu64 source into an image", version)]
struct Args {
    /// Assembly source
    source: PathBuf,

    /// Output image
    dest: PathBuf,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let source = fs::read_to_string(&args.source)
        .with_context(|| format!("reading {}", args.source.display()))?;
    let image = asm::assemble(&source)
        .with_context(|| format!("assembling {}", args.source.display()))?;
    fs::write(&args.dest, &image)
        .with_context(|| format!("writing {}", args.dest.display()))?;
    info!(bytes = image.len(), dest = %args.dest.display(), "image written");
    Ok(())
}
