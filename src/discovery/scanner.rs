//! Search-path index of installed abstractions and externals.
//!
//! Recursively scans include directories for patch files (`.pd`) and
//! compiled externals, and maps each object name to the directories that
//! provide it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

use super::object_name::ObjectName;
use super::SearchPath;

/// File extensions Pd loads objects from.
pub const OBJECT_EXTENSIONS: &[&str] = &["pd", "pd_linux", "pd_darwin", "dll", "so"];

#[derive(Debug, Clone)]
struct IndexEntry {
    /// Name as first found on disk.
    name: String,
    dirs: Vec<PathBuf>,
}

/// Object names found under a set of include directories.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    dirs: Vec<PathBuf>,
    entries: HashMap<String, IndexEntry>,
    case_insensitive: bool,
}

impl SearchIndex {
    /// Scan `dirs` and index every object file found.
    ///
    /// Directories that don't exist are skipped.
    pub fn build(dirs: &[PathBuf], case_insensitive: bool) -> Self {
        let mut index = Self {
            dirs: dirs.to_vec(),
            entries: HashMap::new(),
            case_insensitive,
        };

        for dir in dirs {
            index.scan_directory(dir);
        }

        log::debug!(
            "Indexed {} object names from {} directories",
            index.len(),
            dirs.len()
        );
        index
    }

    fn scan_directory(&mut self, root: &Path) {
        if !root.exists() {
            log::debug!("Skipping missing include directory {}", root.display());
            return;
        }

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_dir() || !is_object_file(path) {
                continue;
            }

            let (Some(name), Some(dir)) = (path.file_stem().and_then(|s| s.to_str()), path.parent())
            else {
                continue;
            };

            self.insert(name, dir);
        }
    }

    fn insert(&mut self, name: &str, dir: &Path) {
        let key = self.key(name);
        let entry = self
            .entries
            .entry(key)
            .or_insert_with(|| IndexEntry {
                name: name.to_string(),
                dirs: Vec::new(),
            });

        // An object can exist as both a patch and an external in one place
        if !entry.dirs.iter().any(|d| d == dir) {
            entry.dirs.push(dir.to_path_buf());
        }
    }

    fn key(&self, name: &str) -> String {
        if self.case_insensitive {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    /// Directories providing `name`, in discovery order.
    ///
    /// `name` may carry a partial path (`cyclone/abs~`), in which case only
    /// directories ending in that path are returned.
    pub fn get(&self, name: &str) -> Result<Vec<PathBuf>> {
        let name = ObjectName::parse(name)?;

        let Some(entry) = self.entries.get(&self.key(name.rname())) else {
            return Ok(Vec::new());
        };

        Ok(entry
            .dirs
            .iter()
            .filter(|dir| name.matches_dir(dir, self.case_insensitive))
            .cloned()
            .collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).map(|dirs| !dirs.is_empty()).unwrap_or(false)
    }

    /// All indexed object names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.values().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// The directories that were scanned.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Number of distinct object names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SearchPath for SearchIndex {
    fn lookup(&self, name: &str) -> Vec<PathBuf> {
        self.get(name).unwrap_or_else(|e| {
            log::debug!("{}", e);
            Vec::new()
        })
    }
}

/// Whether Pd could load an object from this file.
pub fn is_object_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| OBJECT_EXTENSIONS.contains(&ext))
}
