//! Per-invocation build context.

use crate::config::{BuildOptions, Layout};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Everything a build, clean or run needs to know, resolved once up
/// front. Owns no mutable state; each operation re-reads the disk.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub compiler: String,
    pub modules: BTreeSet<String>,
    pub app_name: String,
    pub src_dir: PathBuf,
    pub modules_dir: PathBuf,
    pub obj_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub exe_path: PathBuf,
}

impl BuildContext {
    pub fn new(options: &BuildOptions, layout: &Layout) -> Self {
        let bin_dir = PathBuf::from(&layout.bin_dir);
        let exe_name = if cfg!(windows) {
            format!("{}.exe", layout.app_name)
        } else {
            layout.app_name.clone()
        };
        let exe_path = bin_dir.join(exe_name);

        Self {
            compiler: options.compiler.clone(),
            modules: options.modules.clone(),
            app_name: layout.app_name.clone(),
            src_dir: PathBuf::from(&layout.src_dir),
            modules_dir: PathBuf::from(&layout.modules_dir),
            obj_dir: PathBuf::from(&layout.obj_dir),
            bin_dir,
            exe_path,
        }
    }
}
