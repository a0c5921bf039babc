//! `emu64` runner: load an image, run it, dump machine state on a fault.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use emu64::config::MachineConfig;
use emu64::machine::Machine;
use emu64::{StopReason, logging};

#[derive(Debug, Parser)]
#[command(name = "emu64", about = "Run a program image on the emu64 machine", version)]
struct Args {
    /// Program image, loaded at address 0
    image: PathBuf,

    /// TOML machine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Memory size in bytes (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_u64)]
    memory_size: Option<u64>,

    /// Words reserved for the stack
    #[arg(long, value_parser = parse_u64)]
    stack_words: Option<u64>,

    /// Interrupt-vector table base address
    #[arg(long, value_parser = parse_u64)]
    ivt_base: Option<u64>,

    /// Stop after this many instructions
    #[arg(long, value_parser = parse_u64)]
    max_steps: Option<u64>,

    /// Dump machine state after a normal stop as well
    #[arg(long)]
    dump: bool,

    /// Increase log verbosity (-v debug, -vv per-instruction trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_u64(text: &str) -> Result<u64, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{text}': {e}"))
}

fn load_config(args: &Args) -> anyhow::Result<MachineConfig> {
    let mut cfg = match &args.config {
        Some(path) => MachineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MachineConfig::default(),
    };
    if let Some(v) = args.memory_size {
        cfg.memory_size = v;
    }
    if let Some(v) = args.stack_words {
        cfg.stack_words = v;
    }
    if args.ivt_base.is_some() {
        cfg.interrupt_vector_base = args.ivt_base;
    }
    if args.max_steps.is_some() {
        cfg.max_steps = args.max_steps;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let cfg = load_config(args)?;
    let image = fs::read(&args.image)
        .with_context(|| format!("reading image {}", args.image.display()))?;

    let mut machine = Machine::new(cfg)?;
    machine.load_image(&image)?;

    match machine.run() {
        Ok(reason) => {
            if reason == StopReason::StepLimit {
                info!(steps = machine.steps(), "step limit reached");
            }
            if args.dump {
                let mut out = io::stdout().lock();
                machine.dump(&mut out)?;
                out.flush()?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(fault) => {
            eprintln!("{fault}");
            let mut out = io::stdout().lock();
            machine.dump(&mut out)?;
            out.flush()?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("emu64: {e:#}");
            ExitCode::FAILURE
        }
    }
}
