//! Known element and object definitions.
//!
//! The definitions table tells the parser the attribute names, in patch
//! file order, for every structural element (`canvas`, `obj`, `connect`,
//! ...) and every built-in object type (`osc~`, `metro`, ...). It is read
//! from a small sectioned text format:
//!
//! - `[elements]` names that may follow a chunk marker in a patch line
//! - `[objects]` object types named by the third parameter of an `obj` line
//! - `[aliases]` alternate names copied from an existing entry
//!
//! A few element names are internal:
//!
//! - `array-data` (`#A` lines have no element name in the patch text)
//! - `canvas-5` and `canvas-6` (the top-level canvas has 5 parameters,
//!   nested canvases have 6)

mod reader;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{PdError, Result};

pub use reader::{read_known_lines, Section, Sections};

pub const ELEMENTS_SECTION: &str = "elements";
pub const OBJECTS_SECTION: &str = "objects";
pub const ALIASES_SECTION: &str = "aliases";

/// Element entry holding the minimal `obj` attributes (x, y, type).
pub const OBJ: &str = "obj";

/// Position of the type name in the parameters of an `obj` line.
pub const TYPE_INDEX: usize = 2;

/// Definitions shipped with pdpatch, covering Pd vanilla.
const VANILLA_DEFS: &str = include_str!("vanilla.txt");

/// Immutable attribute-name tables for elements and objects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KnownDefs {
    elements: HashMap<String, Vec<String>>,
    objects: HashMap<String, Vec<String>>,
    min_obj_params: usize,
}

impl KnownDefs {
    /// The built-in Pd vanilla definitions.
    pub fn vanilla() -> Result<Self> {
        Self::parse(VANILLA_DEFS)
    }

    /// Load definitions from a file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PdError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read definitions: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse definitions from text.
    pub fn parse(content: &str) -> Result<Self> {
        let lines: Vec<&str> = content.lines().collect();
        Self::load(&lines)
    }

    /// Build the tables from definition lines, applying aliases.
    ///
    /// Fails if an alias names an entry found in neither the elements nor
    /// the objects section.
    pub fn load<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let mut sections = read_known_lines(lines)?;

        let mut elements: HashMap<String, Vec<String>> = sections
            .remove(ELEMENTS_SECTION)
            .unwrap_or_default()
            .into_iter()
            .collect();
        let mut objects: HashMap<String, Vec<String>> = sections
            .remove(OBJECTS_SECTION)
            .unwrap_or_default()
            .into_iter()
            .collect();

        for (name, aliases) in sections.remove(ALIASES_SECTION).unwrap_or_default() {
            let table = if elements.contains_key(&name) {
                &mut elements
            } else if objects.contains_key(&name) {
                &mut objects
            } else {
                return Err(PdError::Format {
                    message: format!(
                        "Cannot create alias. No element or object called \"{}\"",
                        name
                    ),
                    line: None,
                    help: Some(format!("Define {} in [elements] or [objects] first", name)),
                });
            };

            let attrs = table[&name].clone();
            for alias in aliases {
                table.insert(alias, attrs.clone());
            }
        }

        check_unique_attrs(&elements, &[])?;
        check_unique_attrs(&objects, elements.get(OBJ).map(Vec::as_slice).unwrap_or(&[]))?;

        let min_obj_params = elements.get(OBJ).map_or(0, Vec::len);

        Ok(Self {
            elements,
            objects,
            min_obj_params,
        })
    }

    /// Attribute names for a structural element.
    pub fn element(&self, name: &str) -> Option<&[String]> {
        self.elements.get(name).map(Vec::as_slice)
    }

    /// Type-specific attribute names for an object (without x, y, type).
    pub fn object(&self, name: &str) -> Option<&[String]> {
        self.objects.get(name).map(Vec::as_slice)
    }

    /// The attributes every `obj` line starts with.
    pub fn obj_attrs(&self) -> &[String] {
        self.element(OBJ).unwrap_or(&[])
    }

    /// Fewest parameters a well-formed `obj` line can have.
    pub fn min_obj_params(&self) -> usize {
        self.min_obj_params
    }

    /// Whether the name is built in, as an element or an object.
    pub fn is_vanilla(&self, name: &str) -> bool {
        self.objects.contains_key(name) || self.elements.contains_key(name)
    }

    /// All object names, sorted.
    pub fn object_names(&self) -> Vec<&str> {
        sorted_keys(&self.objects)
    }

    /// All element names, sorted.
    pub fn element_names(&self) -> Vec<&str> {
        sorted_keys(&self.elements)
    }
}

/// Every entry must name each attribute once, and object attributes follow
/// the `obj` base attributes so they can't reuse those names either.
fn check_unique_attrs(table: &HashMap<String, Vec<String>>, base: &[String]) -> Result<()> {
    for (name, attrs) in table {
        let mut seen: HashSet<&str> = base.iter().map(String::as_str).collect();
        for attr in attrs {
            if !seen.insert(attr.as_str()) {
                return Err(PdError::format(
                    format!("Attribute \"{}\" appears twice in the definition of \"{}\"", attr, name),
                    None,
                ));
            }
        }
    }
    Ok(())
}

fn sorted_keys(table: &HashMap<String, Vec<String>>) -> Vec<&str> {
    let mut names: Vec<&str> = table.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}
