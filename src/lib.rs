//! pdpatch - Pure Data patch file reader
//!
//! Reads Pd patch files into a tree of canvases and resolved nodes, and
//! checks the objects a patch uses against the Pd vanilla built-ins and
//! the abstractions installed on a search path.

pub mod cli;
pub mod discovery;
pub mod error;
pub mod known;
pub mod output;
pub mod parser;
pub mod patch;
pub mod resolver;
pub mod suggest;
pub mod types;

pub use discovery::{Config, NoSearchPath, ObjectName, SearchIndex, SearchPath};
pub use error::{PdError, Result};
pub use known::KnownDefs;
pub use parser::{tokenize, Chunk, PatchLine};
pub use patch::{Patch, PatchEntry, Predicate};
pub use resolver::{Resolution, Resolver};
pub use suggest::closest_matches;
pub use types::{Node, NodeId, Tree};
