//! Attribute resolution for patch lines.
//!
//! Pairs the positional parameters of a patch line with the attribute
//! names the definitions table lists for its element or object type.

use std::collections::{HashMap, HashSet};

use crate::known::{KnownDefs, TYPE_INDEX};

/// Element names handled specially by the resolver.
const CANVAS: &str = "canvas";
const CANVAS_TOPLEVEL: &str = "canvas-5";
const CANVAS_NESTED: &str = "canvas-6";
const OBJ: &str = "obj";

/// The top-level canvas line has exactly this many parameters.
const TOPLEVEL_CANVAS_PARAMS: usize = 5;

/// Attribute names and values resolved for one patch line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Attribute names in patch file order.
    pub attr_names: Vec<String>,
    /// Value for every name in `attr_names`; `None` when the line ran short.
    pub attrs: HashMap<String, Option<String>>,
    /// Parameters left over once every attribute has a value.
    pub extras: Vec<String>,
    /// Whether the element or object type is built in (or a constant).
    pub recognized: bool,
}

/// Resolves element names and parameters against a definitions table.
///
/// The table itself is never modified. Element names with no definition
/// are remembered in a separate miss cache so each one is only reported
/// once.
#[derive(Debug)]
pub struct Resolver<'a> {
    defs: &'a KnownDefs,
    misses: HashSet<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(defs: &'a KnownDefs) -> Self {
        Self {
            defs,
            misses: HashSet::new(),
        }
    }

    /// The definitions this resolver reads from.
    pub fn defs(&self) -> &'a KnownDefs {
        self.defs
    }

    /// Element names seen without a definition, sorted.
    pub fn misses(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.misses.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve the attribute names for `element` and pair them with `params`.
    ///
    /// Never fails: unknown names degrade to fewer attributes and
    /// `recognized == false`.
    pub fn resolve(&mut self, element: &str, params: &[String]) -> Resolution {
        let (attr_names, recognized) = match element {
            CANVAS => (self.canvas_attrs(params), true),
            OBJ => self.obj_attrs(params),
            _ => self.element_attrs(element),
        };

        let (attrs, extras) = make_attrs(&attr_names, params);

        Resolution {
            attr_names,
            attrs,
            extras,
            recognized,
        }
    }

    fn canvas_attrs(&self, params: &[String]) -> Vec<String> {
        let name = if params.len() == TOPLEVEL_CANVAS_PARAMS {
            CANVAS_TOPLEVEL
        } else {
            CANVAS_NESTED
        };
        self.defs.element(name).unwrap_or(&[]).to_vec()
    }

    fn obj_attrs(&self, params: &[String]) -> (Vec<String>, bool) {
        let base = self.defs.obj_attrs();

        let type_name = if params.len() < self.defs.min_obj_params() {
            None
        } else {
            params.get(TYPE_INDEX)
        };

        // Not even x, y and type: keep what we can, the line may be malformed.
        let Some(type_name) = type_name else {
            return (base.to_vec(), false);
        };

        match self.defs.object(type_name) {
            Some(specific) => {
                let mut names = base.to_vec();
                names.extend_from_slice(specific);
                (names, true)
            }
            // Numbers and dollar args are constants, anything else is
            // probably an external abstraction.
            None => (base.to_vec(), is_const_param(type_name)),
        }
    }

    fn element_attrs(&mut self, element: &str) -> (Vec<String>, bool) {
        match self.defs.element(element) {
            Some(names) => (names.to_vec(), true),
            None => {
                if self.misses.insert(element.to_string()) {
                    log::warn!("No built-in definition for {}", element);
                }
                (Vec::new(), false)
            }
        }
    }
}

/// Pair names with values positionally.
///
/// Surplus values are returned as extras; names without a value map to
/// `None`.
pub fn make_attrs(
    names: &[String],
    params: &[String],
) -> (HashMap<String, Option<String>>, Vec<String>) {
    let attrs = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), params.get(i).cloned()))
        .collect();

    let extras = params.get(names.len()..).unwrap_or(&[]).to_vec();

    (attrs, extras)
}

fn is_num_param(text: &str) -> bool {
    text.parse::<f64>().is_ok()
}

/// A Pd dollar argument, written `\$1` in patch files.
fn is_var_param(text: &str) -> bool {
    text.len() > 2 && text.starts_with("\\$")
}

fn is_const_param(text: &str) -> bool {
    is_num_param(text) || is_var_param(text)
}
