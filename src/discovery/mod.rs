//! Locating abstractions and externals on disk.
//!
//! Unknown object types in a patch are looked up on a search path: the
//! include directories from the user's [`Config`] plus any given on the
//! command line.
//!
//! # Example
//!
//! ```ignore
//! use pdpatch::discovery::{Config, SearchIndex, SearchPath};
//!
//! let config = Config::load(&Config::default_path().unwrap())?;
//! let index = SearchIndex::build(&config.include, config.is_case_insensitive());
//!
//! for dir in index.lookup("cyclone/abs~") {
//!     println!("{}", dir.display());
//! }
//! ```

mod config;
mod object_name;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use config::{Config, CONFIG_ENV, CONFIG_FILENAME, CONFIG_KEYS};
pub use object_name::{ObjectName, SEPARATOR};
pub use scanner::{is_object_file, SearchIndex, OBJECT_EXTENSIONS};

/// Where to find object types the built-in definitions don't cover.
pub trait SearchPath {
    /// Directories providing `name`; empty when it can't be found.
    fn lookup(&self, name: &str) -> Vec<PathBuf>;
}

/// A search path with nothing on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSearchPath;

impl SearchPath for NoSearchPath {
    fn lookup(&self, _name: &str) -> Vec<PathBuf> {
        Vec::new()
    }
}

/// Load the configuration at `path` (or the default location) and index
/// its include directories plus `extra`.
pub fn load_search_index(config_path: Option<&Path>, extra: &[PathBuf]) -> Result<(Config, SearchIndex)> {
    let config = match config_path.map(Path::to_path_buf).or_else(Config::default_path) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    let mut dirs = config.include.clone();
    dirs.extend(extra.iter().filter(|d| !config.include.contains(d)).cloned());

    let index = SearchIndex::build(&dirs, config.is_case_insensitive());
    Ok((config, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_no_search_path() {
        assert!(NoSearchPath.lookup("abs~").is_empty());
    }

    #[test]
    fn test_load_search_index_merges_dirs() {
        let dir = tempdir().unwrap();
        let configured = dir.path().join("configured");
        let extra = dir.path().join("extra");
        fs::create_dir_all(&configured).unwrap();
        fs::create_dir_all(&extra).unwrap();
        fs::write(configured.join("one.pd"), "").unwrap();
        fs::write(extra.join("two.pd"), "").unwrap();

        let config_path = dir.path().join("config.yaml");
        let config = Config {
            include: vec![configured.clone()],
            case_insensitive: Some(false),
        };
        config.save(&config_path).unwrap();

        let (loaded, index) = load_search_index(Some(&config_path), &[extra.clone(), configured.clone()]).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(index.dirs(), [configured.clone(), extra.clone()]);
        assert_eq!(index.lookup("one"), vec![configured]);
        assert_eq!(index.lookup("two"), vec![extra]);
    }
}
