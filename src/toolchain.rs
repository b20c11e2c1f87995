//! External compiler invocation.
//!
//! Everything the build does through the compiler goes through this thin
//! wrapper: the dependency scan, compiling one translation unit, and the
//! final link. The contract is narrow on purpose - command line in,
//! captured output and exit status out - so the rest of the crate never
//! has to know which compiler is behind it.

use anyhow::{Context, Result, bail};
use colored::*;
use std::process::Command;

pub struct Toolchain {
    compiler: String,
}

impl Toolchain {
    pub fn new(compiler: impl Into<String>) -> Self {
        Self {
            compiler: compiler.into(),
        }
    }

    pub fn compiler(&self) -> &str {
        &self.compiler
    }

    /// True if the compiler binary answers `--version`.
    pub fn is_available(&self) -> bool {
        Command::new(&self.compiler).arg("--version").output().is_ok()
    }

    /// Run the dependency scan (`-MM`) over every primary source, from
    /// the project root, and capture stdout.
    pub fn scan_includes(&self, sources: &[&str]) -> Result<String> {
        let output = Command::new(&self.compiler)
            .arg("-MM")
            .args(sources)
            .output()
            .with_context(|| format!("failed to launch compiler '{}'", self.compiler))?;
        if !output.status.success() {
            eprint!("{}", String::from_utf8_lossy(&output.stderr));
            bail!("dependency scan failed ({})", self.compiler);
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// The exact command line `compile` will execute, for logging and
    /// for compile_commands.json.
    pub fn compile_command(&self, source: &str, object: &str) -> String {
        format!(
            "{} -Wall -Werror -c {} -o {}",
            self.compiler, source, object
        )
    }

    /// Compile one translation unit into its object file. Warnings are
    /// errors.
    pub fn compile(&self, source: &str, object: &str) -> Result<()> {
        println!("   {} {}", "cc".cyan(), self.compile_command(source, object));
        let output = Command::new(&self.compiler)
            .args(["-Wall", "-Werror", "-c", source, "-o", object])
            .output()
            .with_context(|| format!("failed to launch compiler '{}'", self.compiler))?;
        if !output.status.success() {
            eprint!("{}", String::from_utf8_lossy(&output.stderr));
            bail!("compiling {source} failed");
        }
        Ok(())
    }

    /// Link the full object set into the executable.
    pub fn link(&self, objects: &[&str], exe: &str) -> Result<()> {
        println!(
            "   {} {} {} -o {}",
            "ld".cyan(),
            self.compiler,
            objects.join(" "),
            exe
        );
        let output = Command::new(&self.compiler)
            .args(objects)
            .args(["-o", exe])
            .output()
            .with_context(|| format!("failed to launch compiler '{}'", self.compiler))?;
        if !output.status.success() {
            eprint!("{}", String::from_utf8_lossy(&output.stderr));
            bail!("linking {exe} failed");
        }
        Ok(())
    }
}
