//! Assembles tokenized lines into the canvas/subpatch tree.

use crate::discovery::SearchPath;
use crate::error::{PdError, Result};
use crate::parser::PatchLine;
use crate::resolver::Resolver;
use crate::types::{Node, Tree, STRUCT};

/// Build the patch tree and collect the struct declarations before it.
///
/// The first canvas becomes the root. Each later canvas opens a branch
/// and a restore carrying a subpatch name closes it again.
pub fn build_tree(
    lines: Vec<PatchLine>,
    resolver: &mut Resolver<'_>,
    search: &dyn SearchPath,
) -> Result<(Tree<Node>, Vec<Node>)> {
    let mut lines = lines.into_iter();
    let mut structs = Vec::new();
    let mut canvas = None;

    for line in lines.by_ref() {
        let node = Node::from_line(line, resolver, search);
        if node.is_canvas() {
            canvas = Some(node);
            break;
        } else if node.element() == STRUCT {
            structs.push(node);
        } else {
            return Err(PdError::InvalidPatch {
                message: format!(
                    "Unexpected line before canvas at line {}: \"{}\"",
                    node.line_num(),
                    node
                ),
                help: Some("A patch starts with #N canvas, optionally preceded by #N struct lines".to_string()),
            });
        }
    }

    let Some(canvas) = canvas else {
        return Err(PdError::InvalidPatch {
            message: "No starting canvas definition found".to_string(),
            help: None,
        });
    };

    let mut tree = Tree::new(canvas);
    let mut current = tree.root();

    for line in lines {
        let node = Node::from_line(line, resolver, search);

        if node.is_canvas() {
            current = tree.add(current, node);
        } else if node.closes_canvas() {
            let line_num = node.line_num();
            tree.add(current, node);
            current = tree.parent(current).ok_or_else(|| PdError::InvalidPatch {
                message: format!("Restore at line {} has no subpatch to close", line_num),
                help: Some("Every named restore needs a matching nested #N canvas".to_string()),
            })?;
        } else {
            tree.add(current, node);
        }
    }

    Ok((tree, structs))
}
