//! Object names with optional library paths.
//!
//! Pd lets a patch name an abstraction by its bare name (`abs~`) or with
//! the trailing part of the directory it lives in (`cyclone/abs~`). The
//! separator is always `/`, whatever the platform.

use std::fmt;
use std::path::{Component, Path};

use crate::error::{PdError, Result};

pub const SEPARATOR: char = '/';

/// A validated object name, split into path parts and the bare name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName {
    name: String,
    path_parts: Vec<String>,
    rname: String,
}

impl ObjectName {
    /// Split `name` into its path parts and bare name.
    ///
    /// Names with a leading or trailing `/` are rejected.
    pub fn parse(name: &str) -> Result<Self> {
        let mut parts: Vec<&str> = name.split(SEPARATOR).collect();

        if parts.len() > 1 && (parts[0].is_empty() || parts[parts.len() - 1].is_empty()) {
            return Err(PdError::InvalidName {
                name: name.to_string(),
                message: format!("should not start or end with a \"{}\" character", SEPARATOR),
            });
        }

        let rname = parts.pop().unwrap_or_default().to_string();

        Ok(Self {
            name: name.to_string(),
            path_parts: parts.into_iter().map(str::to_string).collect(),
            rname,
        })
    }

    /// The name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bare object name, without any path parts.
    pub fn rname(&self) -> &str {
        &self.rname
    }

    pub fn path_parts(&self) -> &[String] {
        &self.path_parts
    }

    /// Whether the rightmost components of `dir` match the path parts.
    ///
    /// A name without path parts matches every directory.
    pub fn matches_dir(&self, dir: &Path, case_insensitive: bool) -> bool {
        let components: Vec<&str> = dir
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();

        self.matches_parts(&components, case_insensitive)
    }

    /// Whether the rightmost `parts` match the path parts.
    pub fn matches_parts<S: AsRef<str>>(&self, parts: &[S], case_insensitive: bool) -> bool {
        if self.path_parts.len() > parts.len() {
            return false;
        }

        self.path_parts
            .iter()
            .rev()
            .zip(parts.iter().rev())
            .all(|(want, have)| same_name(want, have.as_ref(), case_insensitive))
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Compare two names, folding case when asked.
pub(crate) fn same_name(a: &str, b: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        a.to_lowercase() == b.to_lowercase()
    } else {
        a == b
    }
}
