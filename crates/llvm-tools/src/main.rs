//! `llvm-opt`: CLI driver for the local optimization pipeline.
//!
//! Parses an input module, runs the optimizer, writes the transformed
//! module back out, verifies it (unless disabled), and emits a `.stats`
//! CSV alongside the output.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser as ClapParser;
use llvm_core::Context;
use llvm_ir_parser::{parse_module, print_module};
use llvm_opt::{Optimizer, OptimizerOptions};

/// Local optimization pipeline for the textual IR assembly format.
#[derive(ClapParser, Debug)]
#[command(name = "llvm-opt", version, about)]
struct Args {
    /// Input IR file
    input: PathBuf,

    /// Output IR file
    output: PathBuf,

    /// Run memory-to-register promotion before the pipeline
    #[arg(long = "mem2reg")]
    mem2reg: bool,

    /// Skip the optimization pipeline entirely
    #[arg(long = "no-cse")]
    no_cse: bool,

    /// Dump statistics to stderr at exit
    #[arg(long = "verbose")]
    verbose: bool,

    /// Skip post-optimization verification
    #[arg(long = "no")]
    no_verify: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("llvm-opt: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let source = fs::read_to_string(&args.input).with_context(|| format!("reading `{}`", args.input.display()))?;

    let ctx = Context::new();
    let module_name = args.input.file_stem().and_then(|s| s.to_str()).unwrap_or("module").to_string();
    let module = parse_module(&source, ctx, module_name).with_context(|| format!("parsing `{}`", args.input.display()))?;

    let mut optimizer = Optimizer::new();
    optimizer.run(&module, OptimizerOptions { mem2reg: args.mem2reg, no_cse: args.no_cse });

    if !args.no_verify {
        llvm_core::verify_module(&module).context("post-optimization verification failed")?;
    }

    let rendered = print_module(&module);
    fs::write(&args.output, rendered).with_context(|| format!("writing `{}`", args.output.display()))?;

    write_stats(args, &optimizer)?;

    if args.verbose {
        for (name, value) in optimizer.stats().nonzero() {
            eprintln!("{name}: {value}");
        }
    }

    Ok(())
}

fn write_stats(args: &Args, optimizer: &Optimizer) -> Result<()> {
    let mut stats_path = args.output.clone().into_os_string();
    stats_path.push(".stats");
    let stats_path = PathBuf::from(stats_path);
    let mut body = String::new();
    for (name, value) in optimizer.stats().nonzero() {
        body.push_str(&format!("{name},{value}\n"));
    }
    fs::write(&stats_path, body).with_context(|| format!("writing `{}`", stats_path.display()))
}
