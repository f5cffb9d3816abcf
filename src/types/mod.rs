//! Core domain types for pdpatch.
//!
//! - `Node` - one patch line with its attributes resolved
//! - `Tree` - ordered tree used to hold the canvas/subpatch structure

mod node;
mod tree;

pub use node::{Node, CANVAS, CONNECT, OBJ, RESTORE, STRUCT};
pub use tree::{Iter, NodeId, Tree};
