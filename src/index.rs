//! Source tree discovery.
//!
//! Recursively walks a directory, keeping files whose extension matches a
//! requested set. Direct children of the modules directory are further
//! filtered by the active module set, so `src/modules/mac.c` is only part
//! of the build when the `mac` module is enabled. Every other directory is
//! walked unconditionally.
//!
//! Paths are normalized to forward slashes so they line up with what the
//! compiler's dependency scan prints back at us.

use anyhow::Result;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

pub const OBJ_EXTENSIONS: &[&str] = &["o"];
pub const C_EXTENSIONS: &[&str] = &["c"];
pub const CPP_EXTENSIONS: &[&str] = &["C", "cxx", "cpp", "CPP", "CXX", "cc", "CC"];
pub const OBJC_EXTENSIONS: &[&str] = &["m", "M"];
pub const OBJCPP_EXTENSIONS: &[&str] = &["mm", "MM"];
pub const HEADER_EXTENSIONS: &[&str] = &["h", "H", "hh", "HH", "HPP", "hpp", "hxx", "HXX"];

/// All extensions that compile into an object file of their own.
pub fn source_extensions() -> Vec<&'static str> {
    [C_EXTENSIONS, CPP_EXTENSIONS, OBJC_EXTENSIONS, OBJCPP_EXTENSIONS].concat()
}

/// One discovered file: normalized path plus the modification time
/// captured at discovery. Re-captured fresh on every build.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub path: String,
    pub mtime: SystemTime,
}

/// Render a path with forward slashes, dropping `.` components.
pub fn normalize(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::RootDir => parts.push(String::new()),
            other => parts.push(other.as_os_str().to_string_lossy().into_owned()),
        }
    }
    parts.join("/")
}

/// Walks directory trees, applying the module allow-list inside the
/// designated modules directory.
pub struct FileIndex {
    modules_dir: PathBuf,
    modules: BTreeSet<String>,
}

impl FileIndex {
    pub fn new(modules_dir: impl Into<PathBuf>, modules: &BTreeSet<String>) -> Self {
        Self {
            modules_dir: modules_dir.into(),
            modules: modules.clone(),
        }
    }

    /// Every file under `directory` (recursively) whose extension is in
    /// `extensions`. A missing directory yields an empty list. The walk
    /// is sorted by file name so compile order is stable run to run.
    pub fn find_files(&self, directory: &Path, extensions: &[&str]) -> Result<Vec<SourceFile>> {
        if !directory.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(directory).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            let Some((stem, ext)) = name.rsplit_once('.') else {
                continue;
            };
            if !extensions.contains(&ext) {
                continue;
            }
            if !self.module_enabled(entry.path(), &name, stem) {
                continue;
            }
            let mtime = entry.metadata()?.modified()?;
            files.push(SourceFile {
                path: normalize(entry.path()),
                mtime,
            });
        }
        Ok(files)
    }

    /// The allow-list only applies to files sitting directly in the
    /// modules directory. A module may be named with or without its
    /// file extension.
    fn module_enabled(&self, path: &Path, name: &str, stem: &str) -> bool {
        if path.parent() != Some(self.modules_dir.as_path()) {
            return true;
        }
        self.modules.contains(name) || self.modules.contains(stem)
    }
}
