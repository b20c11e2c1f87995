//! Header dependency resolution.
//!
//! One `-MM` invocation over every primary source gives us, per
//! translation unit, the object it produces and the full set of files
//! that feed it. The compiler emits Makefile rule syntax:
//!
//! ```text
//! main.o: src/main.c src/util.h \
//!   src/log.h
//! ```
//!
//! Continuation lines are rejoined before parsing, each rule is split on
//! the first `:`, and the object name gets qualified with the configured
//! object directory. The output is never partially trusted: a scan that
//! fails to launch or exits non-zero aborts the build.

use crate::index::normalize;
use crate::toolchain::Toolchain;
use anyhow::{Result, bail};
use std::collections::BTreeSet;
use std::path::Path;

/// One object file and every path that feeds it: the primary source plus
/// any headers it transitively includes. Produced fresh per build.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyGroup {
    pub object: String,
    pub inputs: Vec<String>,
}

impl DependencyGroup {
    /// The source that compiles into this object: same base name as the
    /// object, and actually part of the discovered source set. `None`
    /// means the scan and the index disagree about the project.
    pub fn primary_source<'a>(&'a self, discovered: &BTreeSet<&str>) -> Option<&'a str> {
        let obj_stem = stem(&self.object);
        self.inputs
            .iter()
            .map(String::as_str)
            .find(|p| discovered.contains(*p) && stem(p) == obj_stem)
    }
}

fn stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.').map_or(name, |(s, _)| s)
}

/// Scan every primary source in one compiler invocation and parse the
/// result into dependency groups.
pub fn get_dependencies(
    toolchain: &Toolchain,
    sources: &[&str],
    obj_dir: &Path,
) -> Result<Vec<DependencyGroup>> {
    let output = toolchain.scan_includes(sources)?;
    parse_dep_output(&output, obj_dir)
}

/// Parse raw `-MM` output. Blank lines are skipped; a line without a `:`
/// separator means the compiler gave us something we cannot interpret.
pub fn parse_dep_output(output: &str, obj_dir: &Path) -> Result<Vec<DependencyGroup>> {
    let flat = output.replace("\\\r\n", " ").replace("\\\n", " ");

    let mut groups = Vec::new();
    for line in flat.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((object, inputs)) = line.split_once(':') else {
            bail!("unparseable dependency line from compiler: {line:?}");
        };
        groups.push(DependencyGroup {
            object: normalize(&obj_dir.join(object.trim())),
            inputs: inputs
                .split_whitespace()
                .map(|p| normalize(Path::new(p)))
                .collect(),
        });
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj_dir() -> &'static Path {
        Path::new("obj")
    }

    #[test]
    fn parses_one_rule_per_line() {
        let out = "main.o: src/main.c src/util.h\nutil.o: src/util.c src/util.h\n";
        let groups = parse_dep_output(out, obj_dir()).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].object, "obj/main.o");
        assert_eq!(groups[0].inputs, vec!["src/main.c", "src/util.h"]);
        assert_eq!(groups[1].object, "obj/util.o");
    }

    #[test]
    fn rejoins_backslash_continuations() {
        let out = "main.o: src/main.c \\\n  src/a.h \\\r\n  src/b.h\n";
        let groups = parse_dep_output(out, obj_dir()).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].inputs, vec!["src/main.c", "src/a.h", "src/b.h"]);
    }

    #[test]
    fn skips_blank_lines() {
        let out = "\nmain.o: src/main.c\n   \n\nutil.o: src/util.c\n";
        let groups = parse_dep_output(out, obj_dir()).unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn rejects_lines_without_separator() {
        let err = parse_dep_output("garbage without colon\n", obj_dir()).unwrap_err();
        assert!(err.to_string().contains("unparseable"));
    }

    #[test]
    fn trims_object_name_before_qualifying() {
        let groups = parse_dep_output("  main.o : src/main.c\n", obj_dir()).unwrap();
        assert_eq!(groups[0].object, "obj/main.o");
    }

    #[test]
    fn primary_source_matches_object_stem() {
        let group = DependencyGroup {
            object: "obj/util.o".to_string(),
            inputs: vec!["src/util.c".to_string(), "src/util.h".to_string()],
        };
        let discovered: BTreeSet<&str> = ["src/util.c", "src/main.c"].into_iter().collect();
        assert_eq!(group.primary_source(&discovered), Some("src/util.c"));
    }

    #[test]
    fn primary_source_requires_a_discovered_file() {
        let group = DependencyGroup {
            object: "obj/ghost.o".to_string(),
            inputs: vec!["src/ghost.c".to_string()],
        };
        let discovered: BTreeSet<&str> = ["src/main.c"].into_iter().collect();
        assert_eq!(group.primary_source(&discovered), None);
    }

    #[test]
    fn header_with_matching_stem_is_not_a_primary() {
        let group = DependencyGroup {
            object: "obj/util.o".to_string(),
            inputs: vec!["src/util.h".to_string(), "src/util.c".to_string()],
        };
        // Only the .c file is in the discovered primary set.
        let discovered: BTreeSet<&str> = ["src/util.c"].into_iter().collect();
        assert_eq!(group.primary_source(&discovered), Some("src/util.c"));
    }
}
