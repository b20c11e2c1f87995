//! # nmk CLI entry point
//!
//! Parses flags, merges them with the optional `nmk.toml` manifest into a
//! fully-resolved set of build options, and routes to clean, build and
//! run. All of the actual decision making lives in the library crate.

use anyhow::{Result, bail};
use clap::Parser;
use colored::*;
use std::path::Path;

use nmk::build;
use nmk::config;
use nmk::context::BuildContext;
use nmk::toolchain::Toolchain;

#[derive(Parser)]
#[command(name = "nmk")]
#[command(about = "A no-frills incremental build driver for C, C++ and Objective-C")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Build target defined in nmk.toml
    target: Option<String>,

    /// Compiler to use on all source files
    #[arg(short, long)]
    compiler: Option<String>,

    /// Modules to include in the build
    #[arg(short, long, num_args = 1..)]
    modules: Vec<String>,

    /// Delete previous build output
    #[arg(short = 'C', long)]
    clean: bool,

    /// Run the program after compiling
    #[arg(short, long)]
    run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let manifest = config::load_manifest(Path::new("."))?;
    let options = config::resolve_options(
        manifest.as_ref(),
        cli.target,
        cli.compiler,
        cli.modules,
        cli.clean,
        cli.run,
    )?;
    let layout = config::layout_for(manifest.as_ref());
    let ctx = BuildContext::new(&options, &layout);

    if options.clean {
        return build::clean(&ctx);
    }

    let toolchain = Toolchain::new(&ctx.compiler);
    if !toolchain.is_available() {
        println!("{} Compiler '{}' was not found", "x".red(), ctx.compiler);
        println!("  Pass one with --compiler, or set it in nmk.toml under [project]");
        bail!("no usable compiler");
    }

    build::build(&ctx)?;

    if options.run {
        build::run(&ctx);
    }
    Ok(())
}
