//! The build pipeline.
//!
//! Linear with early exit: discover, whole-build skip check, dependency
//! resolution, compile every stale group, link, and optionally run. The
//! first toolchain failure aborts the run; objects already written stay
//! on disk and are simply found fresh on the next attempt.

use crate::context::BuildContext;
use crate::deps;
use crate::index::{self, FileIndex};
use crate::stale;
use crate::toolchain::Toolchain;
use anyhow::{Context, Result, bail};
use colored::*;
use serde_json::json;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::{Instant, SystemTime};

pub const COMPILE_COMMANDS: &str = "compile_commands.json";

fn mtime_of(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok().and_then(|m| m.modified().ok())
}

/// Build the project described by `ctx`. Succeeds without touching the
/// toolchain when the executable is already newer than every input.
pub fn build(ctx: &BuildContext) -> Result<()> {
    let start = Instant::now();
    let idx = FileIndex::new(&ctx.modules_dir, &ctx.modules);

    let sources = idx.find_files(&ctx.src_dir, &index::source_extensions())?;
    let headers = idx.find_files(&ctx.src_dir, index::HEADER_EXTENSIONS)?;

    if sources.is_empty() {
        println!(
            "{} No source files under {}",
            "!".yellow(),
            ctx.src_dir.display()
        );
        return Ok(());
    }

    let exe_mtime = mtime_of(&ctx.exe_path);
    let input_times = sources.iter().chain(&headers).map(|f| f.mtime);
    if !stale::needs_full_build(exe_mtime, input_times) {
        println!("{} Up to date", "⚡".green());
        return Ok(());
    }

    let toolchain = Toolchain::new(&ctx.compiler);
    let source_paths: Vec<&str> = sources.iter().map(|s| s.path.as_str()).collect();
    let groups = deps::get_dependencies(&toolchain, &source_paths, &ctx.obj_dir)?;

    // Object timestamps are captured once, before any compiling, so each
    // group is judged against the state the build started from.
    let objects = idx.find_files(&ctx.obj_dir, index::OBJ_EXTENSIONS)?;
    let obj_mtimes: HashMap<&str, SystemTime> =
        objects.iter().map(|o| (o.path.as_str(), o.mtime)).collect();
    let input_mtimes: HashMap<&str, SystemTime> = sources
        .iter()
        .chain(&headers)
        .map(|f| (f.path.as_str(), f.mtime))
        .collect();
    let discovered: BTreeSet<&str> = source_paths.iter().copied().collect();

    fs::create_dir_all(&ctx.obj_dir)
        .with_context(|| format!("failed to create {}", ctx.obj_dir.display()))?;

    let cwd = std::env::current_dir()?;
    let mut compiled = 0usize;
    let mut commands = Vec::new();

    for group in &groups {
        let Some(primary) = group.primary_source(&discovered) else {
            bail!(
                "dependency record for '{}' matches no discovered source file; \
                 the toolchain and the source tree disagree",
                group.object
            );
        };

        commands.push(json!({
            "directory": cwd.to_string_lossy(),
            "command": toolchain.compile_command(primary, &group.object),
            "file": primary,
        }));

        let newest = stale::newest(group.inputs.iter().filter_map(|input| {
            input_mtimes
                .get(input.as_str())
                .copied()
                .or_else(|| mtime_of(Path::new(input)))
        }));
        if stale::object_stale(obj_mtimes.get(group.object.as_str()).copied(), newest) {
            toolchain.compile(primary, &group.object)?;
            compiled += 1;
        }
    }

    fs::write(COMPILE_COMMANDS, serde_json::to_string_pretty(&commands)?)
        .context("failed to write compile_commands.json")?;

    fs::create_dir_all(&ctx.bin_dir)
        .with_context(|| format!("failed to create {}", ctx.bin_dir.display()))?;
    let object_paths: Vec<&str> = groups.iter().map(|g| g.object.as_str()).collect();
    toolchain.link(&object_paths, &index::normalize(&ctx.exe_path))?;

    println!(
        "{} Build finished in {:.2?} ({} compiled, {} up to date)",
        "✓".green(),
        start.elapsed(),
        compiled,
        groups.len() - compiled
    );
    Ok(())
}

/// Execute the built program. Its exit status belongs to the program,
/// not to the build, so it is not propagated.
pub fn run(ctx: &BuildContext) {
    println!("{} Running {}\n", "▶".green(), ctx.exe_path.display());
    let _ = Command::new(&ctx.exe_path).status();
}
