//! `pdpatch have`: check where objects are available.

use std::io::{self, Write};
use std::path::Path;

use clap::Args;

use crate::discovery::{load_search_index, SearchIndex, SearchPath};
use crate::error::Result;
use crate::known::KnownDefs;
use crate::suggest::closest_matches;

/// Stands in for a directory when an object is built into Pd.
pub const VANILLA_DIR: &str = "<< vanilla built-in >>";

/// Suggestions taken from each pool (built-ins, then installed).
const MATCHES_PER_POOL: usize = 3;

/// Lines longer than this are split, one directory per line.
const MAX_LINE: usize = 80;

/// Check where objects are available
#[derive(Args, Debug)]
pub struct HaveArgs {
    /// Object names, optionally with a library path (cyclone/abs~)
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Add a directory to search
    #[arg(short, long = "include", value_name = "DIR")]
    pub include: Vec<std::path::PathBuf>,

    /// Only check the objects built into Pd vanilla
    #[arg(short, long, conflicts_with = "include")]
    pub vanilla: bool,

    /// List the closest matches even when a name is found
    #[arg(short, long)]
    pub closest: bool,
}

/// Where one requested name can be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub name: String,
    /// Directories providing the name, or [`VANILLA_DIR`].
    pub dirs: Vec<String>,
    /// Similar names and where they live, best first.
    pub closest: Vec<(String, Vec<String>)>,
}

/// Run `have`. Returns false when any name wasn't found, unless only
/// the closest matches were asked for.
pub fn run(args: HaveArgs, config: Option<&Path>) -> Result<bool> {
    let defs = KnownDefs::vanilla()?;
    let index = if args.vanilla {
        None
    } else {
        Some(load_search_index(config, &args.include)?.1)
    };

    let results = find(&args.names, &defs, index.as_ref(), args.closest);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for result in &results {
        write_availability(&mut out, result, args.closest)?;
    }
    out.flush()?;

    Ok(args.closest || results.iter().all(|r| !r.dirs.is_empty()))
}

/// Look up each name among the built-ins and on the search path.
///
/// With `closest_only`, exact lookups are skipped and every name gets a
/// list of similar names instead.
pub fn find(
    names: &[String],
    defs: &KnownDefs,
    index: Option<&SearchIndex>,
    closest_only: bool,
) -> Vec<Availability> {
    let builtins = defs.object_names();
    let installed = index.map(SearchIndex::names).unwrap_or_default();

    names
        .iter()
        .map(|name| {
            let dirs = if closest_only {
                Vec::new()
            } else if defs.is_vanilla(name) {
                vec![VANILLA_DIR.to_string()]
            } else {
                index.map(|i| dir_strings(i, name)).unwrap_or_default()
            };

            let closest = if dirs.is_empty() {
                let mut closest: Vec<(String, Vec<String>)> =
                    closest_matches(name, &builtins, MATCHES_PER_POOL)
                        .into_iter()
                        .map(|m| (m, vec![VANILLA_DIR.to_string()]))
                        .collect();

                if let Some(index) = index {
                    for m in closest_matches(name, &installed, MATCHES_PER_POOL) {
                        let found = dir_strings(index, &m);
                        match closest.iter_mut().find(|(n, _)| *n == m) {
                            Some((_, dirs)) => dirs.extend(found),
                            None => closest.push((m, found)),
                        }
                    }
                }
                closest
            } else {
                Vec::new()
            };

            Availability {
                name: name.clone(),
                dirs,
                closest,
            }
        })
        .collect()
}

fn dir_strings(index: &SearchIndex, name: &str) -> Vec<String> {
    index
        .lookup(name)
        .iter()
        .map(|d| d.display().to_string())
        .collect()
}

/// Print one result.
pub fn write_availability<W: Write>(out: &mut W, result: &Availability, closest_only: bool) -> io::Result<()> {
    if !result.dirs.is_empty() {
        return write_name_dirs(out, &result.name, &result.dirs, 0);
    }

    write!(out, "{}:", result.name)?;
    if !closest_only {
        write!(out, " not found.")?;
    }

    if result.closest.is_empty() {
        return writeln!(out, " No matches.");
    }

    writeln!(out, " Closest matches:")?;

    // An exact match leads the list
    let (exact, others): (Vec<_>, Vec<_>) = result.closest.iter().partition(|(n, _)| *n == result.name);
    for (name, dirs) in exact.into_iter().chain(others) {
        write_name_dirs(out, name, dirs, 4)?;
    }
    Ok(())
}

fn write_name_dirs<W: Write>(out: &mut W, name: &str, dirs: &[String], indent: usize) -> io::Result<()> {
    if let [dir] = dirs {
        let line = format!("{:indent$}{}: {}", "", name, dir, indent = indent);
        if line.len() < MAX_LINE {
            return writeln!(out, "{}", line);
        }
    }

    writeln!(out, "{:indent$}{}:", "", name, indent = indent)?;
    for dir in dirs {
        writeln!(out, "{:indent$}{}", "", dir, indent = indent + 4)?;
    }
    Ok(())
}
