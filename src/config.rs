//! Build configuration.
//!
//! Two inputs feed a build: command-line flags (parsed in `main`) and the
//! optional `nmk.toml` manifest. They are merged here into one immutable
//! [`BuildOptions`] value before any build activity starts. Filesystem
//! conventions live in [`Layout`] with explicit defaults so nothing reads
//! process-wide globals.
//!
//! ## Manifest format
//!
//! ```toml
//! [project]
//! name = "myapp"
//! compiler = "clang++"
//!
//! [target.mac]
//! modules = ["mac", "posix"]
//! compiler = "clang"
//! ```

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

pub const MANIFEST_NAME: &str = "nmk.toml";
pub const DEFAULT_COMPILER: &str = "clang++";

/// Where a project keeps its sources and where build output goes.
#[derive(Debug, Clone)]
pub struct Layout {
    pub src_dir: String,
    pub modules_dir: String,
    pub obj_dir: String,
    pub bin_dir: String,
    pub app_name: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            src_dir: "src".to_string(),
            modules_dir: "src/modules".to_string(),
            obj_dir: "obj".to_string(),
            bin_dir: "bin".to_string(),
            app_name: "myapp".to_string(),
        }
    }
}

/// Fully-resolved options for one invocation. Constructed once, then
/// read-only for the rest of the run.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub compiler: String,
    pub modules: BTreeSet<String>,
    pub target: Option<String>,
    pub clean: bool,
    pub run: bool,
}

#[derive(Deserialize, Debug, Default)]
pub struct Manifest {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default, rename = "target")]
    pub targets: HashMap<String, TargetConfig>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ProjectConfig {
    pub name: Option<String>,
    pub compiler: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TargetConfig {
    #[serde(default)]
    pub modules: Vec<String>,
    pub compiler: Option<String>,
}

/// Read `nmk.toml` from `dir` if present. A missing manifest is fine;
/// a malformed one is not.
pub fn load_manifest(dir: &Path) -> Result<Option<Manifest>> {
    let path = dir.join(MANIFEST_NAME);
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let manifest = toml::from_str(&raw)
        .with_context(|| format!("failed to parse {} - check for syntax errors", path.display()))?;
    Ok(Some(manifest))
}

/// Merge CLI flags with the manifest into final [`BuildOptions`].
///
/// Precedence for the compiler: CLI flag, then the named target, then
/// `[project]`, then [`DEFAULT_COMPILER`]. Modules given on the command
/// line win over the target's module list.
pub fn resolve_options(
    manifest: Option<&Manifest>,
    target: Option<String>,
    compiler: Option<String>,
    modules: Vec<String>,
    clean: bool,
    run: bool,
) -> Result<BuildOptions> {
    let target_cfg = match &target {
        Some(name) => {
            let Some(manifest) = manifest else {
                bail!("target '{name}' requested but no {MANIFEST_NAME} found");
            };
            let Some(cfg) = manifest.targets.get(name) else {
                bail!("target '{name}' not found in {MANIFEST_NAME}");
            };
            Some(cfg)
        }
        None => None,
    };

    let modules: BTreeSet<String> = if modules.is_empty() {
        target_cfg
            .map(|t| t.modules.iter().cloned().collect())
            .unwrap_or_default()
    } else {
        modules.into_iter().collect()
    };

    let compiler = compiler
        .or_else(|| target_cfg.and_then(|t| t.compiler.clone()))
        .or_else(|| manifest.and_then(|m| m.project.compiler.clone()))
        .unwrap_or_else(|| DEFAULT_COMPILER.to_string());

    Ok(BuildOptions {
        compiler,
        modules,
        target,
        clean,
        run,
    })
}

/// Layout for the current project: defaults, with the app name taken
/// from the manifest when one is present.
pub fn layout_for(manifest: Option<&Manifest>) -> Layout {
    let mut layout = Layout::default();
    if let Some(name) = manifest.and_then(|m| m.project.name.clone()) {
        layout.app_name = name;
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_manifest() -> Manifest {
        toml::from_str(
            r#"
            [project]
            name = "demo"
            compiler = "g++"

            [target.mac]
            modules = ["mac", "posix"]
            compiler = "clang++"

            [target.bare]
            modules = ["bare"]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn manifest_parses_targets() {
        let m = sample_manifest();
        assert_eq!(m.project.name.as_deref(), Some("demo"));
        assert_eq!(m.targets["mac"].modules, vec!["mac", "posix"]);
        assert_eq!(m.targets["mac"].compiler.as_deref(), Some("clang++"));
        assert!(m.targets["bare"].compiler.is_none());
    }

    #[test]
    fn cli_compiler_wins_over_everything() {
        let m = sample_manifest();
        let opts = resolve_options(
            Some(&m),
            Some("mac".to_string()),
            Some("tcc".to_string()),
            vec![],
            false,
            false,
        )
        .unwrap();
        assert_eq!(opts.compiler, "tcc");
        assert!(opts.modules.contains("posix"));
    }

    #[test]
    fn target_compiler_wins_over_project() {
        let m = sample_manifest();
        let opts =
            resolve_options(Some(&m), Some("mac".to_string()), None, vec![], false, false).unwrap();
        assert_eq!(opts.compiler, "clang++");
    }

    #[test]
    fn project_compiler_is_fallback() {
        let m = sample_manifest();
        let opts =
            resolve_options(Some(&m), Some("bare".to_string()), None, vec![], false, false).unwrap();
        assert_eq!(opts.compiler, "g++");
    }

    #[test]
    fn default_compiler_without_manifest() {
        let opts = resolve_options(None, None, None, vec![], false, true).unwrap();
        assert_eq!(opts.compiler, DEFAULT_COMPILER);
        assert!(opts.modules.is_empty());
        assert!(opts.run);
    }

    #[test]
    fn cli_modules_override_target_modules() {
        let m = sample_manifest();
        let opts = resolve_options(
            Some(&m),
            Some("mac".to_string()),
            None,
            vec!["windows".to_string()],
            false,
            false,
        )
        .unwrap();
        assert_eq!(opts.modules.len(), 1);
        assert!(opts.modules.contains("windows"));
    }

    #[test]
    fn unknown_target_is_an_error() {
        let m = sample_manifest();
        let err = resolve_options(Some(&m), Some("nope".to_string()), None, vec![], false, false)
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn layout_takes_app_name_from_manifest() {
        let m = sample_manifest();
        assert_eq!(layout_for(Some(&m)).app_name, "demo");
        assert_eq!(layout_for(None).app_name, "myapp");
    }
}
