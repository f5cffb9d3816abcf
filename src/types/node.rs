//! A single parsed patch line.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::discovery::SearchPath;
use crate::known::TYPE_INDEX;
use crate::parser::{Chunk, PatchLine};
use crate::resolver::Resolver;

pub const CANVAS: &str = "canvas";
pub const CONNECT: &str = "connect";
pub const OBJ: &str = "obj";
pub const RESTORE: &str = "restore";
pub const STRUCT: &str = "struct";

/// One patch line with its attributes resolved.
///
/// Nodes are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    line_num: usize,
    chunk: Chunk,
    element: String,
    attr_names: Vec<String>,
    attrs: BTreeMap<String, Option<String>>,
    extra_params: Vec<String>,
    recognized: bool,
    search_dirs: Vec<PathBuf>,
}

impl Node {
    /// Resolve a tokenized line into a node.
    ///
    /// Object types the definitions don't know are looked up on `search`.
    pub fn from_line(line: PatchLine, resolver: &mut Resolver<'_>, search: &dyn SearchPath) -> Self {
        let res = resolver.resolve(&line.element, &line.params);

        let search_dirs = if !res.recognized && line.element == OBJ {
            line.params
                .get(TYPE_INDEX)
                .map(|name| search.lookup(name))
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        Self {
            line_num: line.line_num,
            chunk: line.chunk,
            element: line.element,
            attr_names: res.attr_names,
            attrs: res.attrs.into_iter().collect(),
            extra_params: res.extras,
            recognized: res.recognized,
            search_dirs,
        }
    }

    /// 0-based line number of the first physical line.
    pub fn line_num(&self) -> usize {
        self.line_num
    }

    pub fn chunk(&self) -> Chunk {
        self.chunk
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    /// Attribute names in patch file order.
    pub fn attr_names(&self) -> &[String] {
        &self.attr_names
    }

    /// The value of an attribute, if the line supplied one.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(|v| v.as_deref())
    }

    /// Attribute name/value pairs in patch file order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.attr_names.iter().map(move |name| {
            let value = self.attrs.get(name).and_then(|v| v.as_deref());
            (name.as_str(), value)
        })
    }

    pub fn extra_params(&self) -> &[String] {
        &self.extra_params
    }

    /// Directories on the search path providing this object's type.
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Known to the built-in definitions (or a constant).
    pub fn vanilla(&self) -> bool {
        self.recognized
    }

    /// Built in, or found on the search path.
    pub fn known(&self) -> bool {
        self.recognized || !self.search_dirs.is_empty()
    }

    /// Look up `chunk`, `element` or an attribute value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "chunk" => Some(self.chunk.as_str()),
            "element" => Some(&self.element),
            _ => self.attr(key),
        }
    }

    /// Whether this line opens a canvas.
    pub fn is_canvas(&self) -> bool {
        self.element == CANVAS
    }

    /// Whether this line is a connection between two objects.
    pub fn is_connect(&self) -> bool {
        self.element == CONNECT
    }

    /// Whether this restore closes a subpatch.
    ///
    /// A nameless `#C restore` closes nothing.
    pub fn closes_canvas(&self) -> bool {
        self.element == RESTORE && self.name() != RESTORE
    }

    /// The name used in reports: the object type for `obj` lines, the
    /// subpatch name for canvases and restores, the element otherwise.
    pub fn name(&self) -> String {
        match self.element.as_str() {
            OBJ => self
                .attr_names
                .get(TYPE_INDEX)
                .and_then(|type_attr| self.attr(type_attr))
                .unwrap_or(OBJ)
                .to_string(),
            CANVAS => match self.attr("name") {
                Some(name) => format!("{} {}", CANVAS, name),
                None => CANVAS.to_string(),
            },
            RESTORE => self.restore_name(),
            other => other.to_string(),
        }
    }

    fn restore_name(&self) -> String {
        // restore x y pd name; restore x y pd; restore x y graph; restore;
        match self.attr("name") {
            Some("pd") => match self.extra_params.first() {
                Some(sub) => format!("{} {}", RESTORE, sub),
                None => format!("{} (subpatch)", RESTORE),
            },
            Some("graph") => format!("{} (graph-on-parent subpatch)", RESTORE),
            Some(name) => format!("{} {}", RESTORE, name),
            None => RESTORE.to_string(),
        }
    }
}

impl fmt::Display for Node {
    /// The patch text of this line, without the terminator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.chunk.as_str())?;
        if self.chunk != Chunk::Array {
            write!(f, " {}", self.element)?;
        }

        let values = self.attrs().filter_map(|(_, v)| v);
        for value in values.chain(self.extra_params.iter().map(String::as_str)) {
            write!(f, " {}", value)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::NoSearchPath;
    use crate::known::KnownDefs;
    use crate::parser::split_line;
    use std::path::Path;

    struct FixedSearch;

    impl SearchPath for FixedSearch {
        fn lookup(&self, name: &str) -> Vec<PathBuf> {
            if name == "my-abs" {
                vec![PathBuf::from("/pd/extra/mine")]
            } else {
                Vec::new()
            }
        }
    }

    fn node_with(text: &str, search: &dyn SearchPath) -> Node {
        let defs = KnownDefs::vanilla().unwrap();
        let mut resolver = Resolver::new(&defs);
        Node::from_line(split_line(0, text).unwrap(), &mut resolver, search)
    }

    fn node(text: &str) -> Node {
        node_with(text, &NoSearchPath)
    }

    #[test]
    fn test_obj_node() {
        let n = node("#X obj 30 27 osc~ 440");

        assert_eq!(n.element(), "obj");
        assert_eq!(n.chunk(), Chunk::Element);
        assert_eq!(n.attr("type"), Some("osc~"));
        assert_eq!(n.attr("frequency"), Some("440"));
        assert_eq!(n.get("element"), Some("obj"));
        assert_eq!(n.get("chunk"), Some("#X"));
        assert_eq!(n.name(), "osc~");
        assert!(n.vanilla());
        assert!(n.known());
    }

    #[test]
    fn test_attr_count_matches_names() {
        let n = node("#X obj 30 27 metro");

        assert_eq!(n.attrs().count(), n.attr_names().len());
        assert_eq!(n.attr("interval"), None);
        assert!(n.extra_params().is_empty());
    }

    #[test]
    fn test_unknown_abstraction_on_search_path() {
        let n = node_with("#X obj 1 2 my-abs 3", &FixedSearch);

        assert!(!n.vanilla());
        assert!(n.known());
        assert_eq!(n.search_dirs(), [Path::new("/pd/extra/mine")]);
        assert_eq!(n.extra_params(), ["3"]);
    }

    #[test]
    fn test_unknown_abstraction_missing() {
        let n = node_with("#X obj 1 2 other-abs", &FixedSearch);

        assert!(!n.vanilla());
        assert!(!n.known());
        assert!(n.search_dirs().is_empty());
    }

    #[test]
    fn test_restore_names() {
        assert_eq!(node("#X restore 10 20 pd synth").name(), "restore synth");
        assert_eq!(node("#X restore 10 20 pd").name(), "restore (subpatch)");
        assert_eq!(node("#X restore 10 20 graph").name(), "restore (graph-on-parent subpatch)");
        assert_eq!(node("#C restore").name(), "restore");

        assert!(node("#X restore 10 20 pd synth").closes_canvas());
        assert!(!node("#C restore").closes_canvas());
    }

    #[test]
    fn test_canvas_names() {
        assert_eq!(node("#N canvas 0 0 450 300 10").name(), "canvas");
        assert_eq!(node("#N canvas 0 0 450 300 synth 0").name(), "canvas synth");
    }

    #[test]
    fn test_obj_name_follows_type_position() {
        let defs = KnownDefs::parse("[elements]\nobj x, y, name\n[objects]\nbang\n").unwrap();
        let mut resolver = Resolver::new(&defs);
        let line = split_line(0, "#X obj 10 20 bang").unwrap();

        let n = Node::from_line(line, &mut resolver, &NoSearchPath);

        assert_eq!(n.attr("name"), Some("bang"));
        assert_eq!(n.name(), "bang");
        assert_eq!(node("#X obj 10 20").name(), "obj");
    }

    #[test]
    fn test_json_is_stable() {
        let n = node("#X obj 30 27 osc~ 440");
        let first = serde_json::to_string(&n).unwrap();

        for _ in 0..10 {
            assert_eq!(serde_json::to_string(&node("#X obj 30 27 osc~ 440")).unwrap(), first);
        }

        insta::assert_json_snapshot!(n, @r##"
        {
          "line_num": 0,
          "chunk": "#X",
          "element": "obj",
          "attr_names": [
            "x",
            "y",
            "type",
            "frequency"
          ],
          "attrs": {
            "frequency": "440",
            "type": "osc~",
            "x": "30",
            "y": "27"
          },
          "extra_params": [],
          "recognized": true,
          "search_dirs": []
        }
        "##);
    }

    #[test]
    fn test_display_round_trip_text() {
        assert_eq!(node("#X obj 30 27 osc~ 440").to_string(), "#X obj 30 27 osc~ 440");
        assert_eq!(node("#X obj 1 2 my-abs a b").to_string(), "#X obj 1 2 my-abs a b");
        assert_eq!(node("#A 0 0.5 0.25").to_string(), "#A 0 0.5 0.25");
        assert_eq!(node("#C restore").to_string(), "#C restore");
    }
}
