//! `pdpatch element`: show the attributes of a built-in.

use std::io::{self, Write};

use clap::Args;

use crate::error::Result;
use crate::known::KnownDefs;
use crate::output::Printer;
use crate::suggest::closest_matches;

/// Print the attribute names of a built-in element or object
#[derive(Args, Debug)]
pub struct ElementArgs {
    /// Element (e.g. canvas-6, connect) or object (e.g. osc~) name
    pub name: String,
}

pub fn run(args: ElementArgs, printer: &Printer) -> Result<bool> {
    let defs = KnownDefs::vanilla()?;

    let stdout = io::stdout();
    let found = describe(&mut stdout.lock(), &defs, &args.name)?;

    if !found {
        let mut pool = defs.object_names();
        pool.extend(defs.element_names());
        let suggestions = closest_matches(&args.name, &pool, 5);

        printer.error("Unknown", &format!("element or object '{}'", args.name));
        if !suggestions.is_empty() {
            printer.info("Did you mean", &suggestions.join(", "));
        }
    }

    Ok(found)
}

/// Write the attribute lists for `name`. Returns false when it isn't built in.
///
/// Object attributes start with the ones every `obj` line carries.
pub fn describe<W: Write>(out: &mut W, defs: &KnownDefs, name: &str) -> io::Result<bool> {
    let mut found = false;

    if let Some(attrs) = defs.element(name) {
        writeln!(out, "{} (element): {}", name, attrs.join(", "))?;
        found = true;
    }

    if let Some(attrs) = defs.object(name) {
        let all: Vec<&str> = defs
            .obj_attrs()
            .iter()
            .chain(attrs)
            .map(String::as_str)
            .collect();
        writeln!(out, "{} (object): {}", name, all.join(", "))?;
        found = true;
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe_str(name: &str) -> (String, bool) {
        let defs = KnownDefs::vanilla().unwrap();
        let mut out = Vec::new();
        let found = describe(&mut out, &defs, name).unwrap();
        (String::from_utf8(out).unwrap(), found)
    }

    #[test]
    fn test_describe_element() {
        let (out, found) = describe_str("connect");

        assert!(found);
        assert_eq!(out, "connect (element): source, outlet, sink, inlet\n");
    }

    #[test]
    fn test_describe_object() {
        let (out, found) = describe_str("osc~");

        assert!(found);
        assert_eq!(out, "osc~ (object): x, y, type, frequency\n");
    }

    #[test]
    fn test_describe_unknown() {
        let (out, found) = describe_str("no-such-thing");

        assert!(!found);
        assert!(out.is_empty());
    }
}
