//! Build output removal.

use super::core::COMPILE_COMMANDS;
use crate::context::BuildContext;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;

/// Remove the object and binary directories and the generated
/// compile_commands.json. Anything already missing is fine.
pub fn clean(ctx: &BuildContext) -> Result<()> {
    let mut cleaned = false;

    for dir in [&ctx.obj_dir, &ctx.bin_dir] {
        if dir.is_dir() {
            fs::remove_dir_all(dir)
                .with_context(|| format!("failed to remove {}", dir.display()))?;
            cleaned = true;
        }
    }

    if Path::new(COMPILE_COMMANDS).exists() {
        fs::remove_file(COMPILE_COMMANDS).context("failed to remove compile_commands.json")?;
        cleaned = true;
    }

    if cleaned {
        println!("{} Clean complete.", "✓".green());
    } else {
        println!("{} Nothing to clean", "!".yellow());
    }
    Ok(())
}
