//! Pd patches.
//!
//! A [`Patch`] is the tree of nodes parsed from one patch file. The root
//! is the top-level canvas, and every nested canvas opens a branch holding
//! the lines of that subpatch.
//!
//! Pd addresses objects by position: ids start at zero within each canvas
//! and count every line except connections and canvas declarations. They
//! are not stored anywhere, so [`Patch::iter`] works them out on every
//! traversal.
//!
//! # Example
//!
//! ```ignore
//! use pdpatch::{KnownDefs, NoSearchPath, Patch, Predicate, Resolver};
//!
//! let defs = KnownDefs::vanilla()?;
//! let mut resolver = Resolver::new(&defs);
//! let patch = Patch::parse_file(Path::new("synth.pd"), &mut resolver, &NoSearchPath)?;
//!
//! for entry in patch.select(&[Predicate::Vanilla(false)]) {
//!     println!("{} is not built in", entry.node.name());
//! }
//! ```

mod builder;
mod select;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::discovery::SearchPath;
use crate::error::{PdError, Result};
use crate::parser::{read_lines, tokenize};
use crate::resolver::Resolver;
use crate::types::{Iter, Node, NodeId, Tree};

pub use builder::build_tree;
pub use select::{matches_all, Predicate};

/// Separator placed between lines when rendering a patch.
#[cfg(windows)]
pub const LINE_ENDING: &str = ";\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = ";\n";

/// A parsed patch file.
#[derive(Debug, Clone)]
pub struct Patch {
    path: Option<PathBuf>,
    tree: Tree<Node>,
    structs: Vec<Node>,
}

/// One node visited by [`Patch::iter`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PatchEntry<'a> {
    #[serde(skip)]
    pub id: NodeId,
    /// Pd object id within the enclosing canvas; `None` for the root,
    /// canvas declarations and connections.
    pub obj_id: Option<usize>,
    pub depth: usize,
    pub node: &'a Node,
}

impl Patch {
    /// Parse a patch file.
    pub fn parse_file(
        path: &Path,
        resolver: &mut Resolver<'_>,
        search: &dyn SearchPath,
    ) -> Result<Self> {
        log::debug!("Parsing {}", path.display());

        let lines = read_lines(path)?;
        let mut patch = Self::parse_lines(&lines, resolver, search)?;
        patch.path = Some(path.to_path_buf());
        Ok(patch)
    }

    /// Parse patch text.
    pub fn parse_str(source: &str, resolver: &mut Resolver<'_>, search: &dyn SearchPath) -> Result<Self> {
        let lines: Vec<&str> = source.lines().collect();
        Self::parse_lines(&lines, resolver, search)
    }

    /// Parse physical patch lines.
    pub fn parse_lines<S: AsRef<str>>(
        lines: &[S],
        resolver: &mut Resolver<'_>,
        search: &dyn SearchPath,
    ) -> Result<Self> {
        let (tree, structs) = build_tree(tokenize(lines)?, resolver, search)?;
        Ok(Self::from_parts(tree, structs))
    }

    /// Wrap an already assembled tree.
    pub fn from_parts(tree: Tree<Node>, structs: Vec<Node>) -> Self {
        Self {
            path: None,
            tree,
            structs,
        }
    }

    /// The file this patch was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn tree(&self) -> &Tree<Node> {
        &self.tree
    }

    /// The top-level canvas.
    pub fn canvas(&self) -> &Node {
        self.tree.value(self.tree.root())
    }

    /// Struct declarations found before the top-level canvas.
    pub fn structs(&self) -> &[Node] {
        &self.structs
    }

    /// Number of nodes, not counting the top-level canvas.
    pub fn len(&self) -> usize {
        self.tree.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit every node depth first with its object id.
    pub fn iter(&self) -> Entries<'_> {
        Entries::new(&self.tree)
    }

    /// The top-level object with the given id.
    ///
    /// Subpatches restart their ids at zero, so only the top-level canvas
    /// is searched.
    pub fn get(&self, obj_id: usize) -> Option<&Node> {
        self.iter()
            .find(|e| e.depth == 1 && e.obj_id == Some(obj_id))
            .map(|e| e.node)
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.tree.iter().any(|(_, n, _)| n == node)
    }

    /// Every node matching all of `predicates`, in traversal order.
    pub fn select(&self, predicates: &[Predicate]) -> Vec<PatchEntry<'_>> {
        self.iter()
            .filter(|e| matches_all(e.node, predicates))
            .collect()
    }

    /// Call `f` for every tree node in traversal order.
    pub fn apply<F>(&self, f: F)
    where
        F: FnMut(NodeId, &Node, usize),
    {
        self.tree.apply(f)
    }

    /// Patches are read-only.
    pub fn insert(&mut self, _obj_id: usize, _node: Node) -> Result<()> {
        Err(PdError::NotImplemented("inserting objects into a patch"))
    }

    /// Patches are read-only.
    pub fn remove(&mut self, _obj_id: usize) -> Result<Node> {
        Err(PdError::NotImplemented("removing objects from a patch"))
    }

    /// Patches are read-only.
    pub fn replace(&mut self, _obj_id: usize, _node: Node) -> Result<Node> {
        Err(PdError::NotImplemented("replacing objects in a patch"))
    }
}

impl fmt::Display for Patch {
    /// Render struct declarations and tree nodes, one patch line each.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self
            .structs
            .iter()
            .chain(self.tree.iter().map(|(_, node, _)| node))
            .map(Node::to_string)
            .collect::<Vec<_>>();
        f.write_str(&lines.join(LINE_ENDING))
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = PatchEntry<'a>;
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over patch entries, numbering objects as it goes.
#[derive(Debug)]
pub struct Entries<'a> {
    inner: Iter<'a, Node>,
    /// Last id handed out at each depth.
    counters: Vec<Option<usize>>,
}

impl<'a> Entries<'a> {
    fn new(tree: &'a Tree<Node>) -> Self {
        Self {
            inner: tree.iter(),
            counters: Vec::new(),
        }
    }

    fn next_obj_id(&mut self, depth: usize) -> usize {
        if self.counters.len() <= depth {
            self.counters.resize(depth + 1, None);
        }
        let obj_id = self.counters[depth].map_or(0, |n| n + 1);
        self.counters[depth] = Some(obj_id);
        obj_id
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = PatchEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, node, depth) = self.inner.next()?;

        let obj_id = if node.is_canvas() {
            // A new canvas restarts numbering for its children
            self.counters.truncate(depth + 1);
            None
        } else if node.is_connect() {
            None
        } else {
            Some(self.next_obj_id(depth))
        };

        Some(PatchEntry {
            id,
            obj_id,
            depth,
            node,
        })
    }
}
