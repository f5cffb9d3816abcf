//! `pdpatch list`: report on the contents of patch files.
//!
//! Each file is parsed and queried for one of: its tree, the objects Pd
//! vanilla lacks, the objects missing from the search path, or the
//! directories its abstractions come from.

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args};

use crate::discovery::{load_search_index, NoSearchPath, SearchPath};
use crate::error::Result;
use crate::known::KnownDefs;
use crate::output::{display_path, plural, Printer};
use crate::patch::{Patch, PatchEntry, Predicate};
use crate::resolver::Resolver;

/// Note printed when abstractions used by a patch can't be found.
pub const MISSING_NOTE: &str = "Contains missing abstractions. Use --missing to see these.";

/// Indentation per tree level.
const INDENT: usize = 4;

/// Show information about patch files
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("action")
        .args(["tree", "vanilla", "extended", "missing", "depend"])
        .multiple(false)
))]
pub struct ListArgs {
    /// Patch files to inspect
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Print the structure of each patch (default)
    #[arg(short, long)]
    pub tree: bool,

    /// Print objects not built into Pd vanilla
    #[arg(short, long, conflicts_with = "include")]
    pub vanilla: bool,

    /// Print objects neither built in nor on the search path
    #[arg(short, long, conflicts_with = "include")]
    pub extended: bool,

    /// Print objects not found in any search directory
    #[arg(short, long)]
    pub missing: bool,

    /// Print the directories providing the abstractions used
    #[arg(short, long)]
    pub depend: bool,

    /// Add a directory to search for abstractions
    #[arg(short, long = "include", value_name = "DIR")]
    pub include: Vec<PathBuf>,

    /// Don't print file names; merge missing/depend output across files
    #[arg(short, long)]
    pub no_names: bool,

    /// Print the tree as JSON
    #[arg(long, conflicts_with_all = ["vanilla", "extended", "missing", "depend"])]
    pub json: bool,
}

/// What to report about each patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Tree,
    Vanilla,
    Extended,
    Missing,
    Depend,
}

impl ListArgs {
    pub fn action(&self) -> ListAction {
        if self.vanilla {
            ListAction::Vanilla
        } else if self.extended {
            ListAction::Extended
        } else if self.missing {
            ListAction::Missing
        } else if self.depend {
            ListAction::Depend
        } else {
            ListAction::Tree
        }
    }
}

/// Run `list`. Returns false when any file failed or didn't conform.
pub fn run(args: ListArgs, config: Option<&Path>, printer: &Printer) -> Result<bool> {
    let action = args.action();
    let defs = KnownDefs::vanilla()?;
    let mut resolver = Resolver::new(&defs);

    // Vanilla compatibility only depends on the built-in table
    let index = if action == ListAction::Vanilla {
        None
    } else {
        Some(load_search_index(config, &args.include)?.1)
    };
    let search: &dyn SearchPath = match &index {
        Some(index) => index,
        None => &NoSearchPath,
    };

    let stdout = io::stdout();
    let mut lister = Lister::new(action, !args.no_names, args.json, stdout.lock());
    let mut failed = 0;

    for file in &args.files {
        match Patch::parse_file(file, &mut resolver, search) {
            Ok(patch) => lister.patch(file, &patch)?,
            Err(e) => {
                failed += 1;
                lister.failed();
                printer.error("Failed", &format!("to parse {}: {}", display_path(file), e));
            }
        }
    }

    let ok = lister.finish()?;
    if failed > 0 {
        printer.warning("Skipped", &plural(failed, "file", "files"));
    }

    Ok(ok && failed == 0)
}

/// Writes `list` reports for a batch of patches.
pub struct Lister<W: Write> {
    action: ListAction,
    print_names: bool,
    json: bool,
    out: W,
    collected: BTreeSet<String>,
    have_missing: bool,
    ok: bool,
}

impl<W: Write> Lister<W> {
    pub fn new(action: ListAction, print_names: bool, json: bool, out: W) -> Self {
        Self {
            action,
            print_names,
            json,
            out,
            collected: BTreeSet::new(),
            have_missing: false,
            ok: true,
        }
    }

    /// Report on one parsed patch.
    pub fn patch(&mut self, file: &Path, patch: &Patch) -> Result<()> {
        let name = file.display().to_string();

        match self.action {
            ListAction::Tree => self.tree(&name, patch)?,
            ListAction::Vanilla => {
                let missing = missing_names(patch, Predicate::Vanilla(false));
                self.compatibility(&name, "pd-vanilla", &missing)?;
            }
            ListAction::Extended => {
                let missing = missing_names(patch, Predicate::Known(false));
                self.compatibility(&name, "pd-extended", &missing)?;
            }
            ListAction::Missing => self.missing(&name, patch)?,
            ListAction::Depend => self.depend(&name, patch)?,
        }

        Ok(())
    }

    /// Record a file that failed to parse.
    pub fn failed(&mut self) {
        self.ok = false;
    }

    fn tree(&mut self, name: &str, patch: &Patch) -> Result<()> {
        if self.json {
            let entries: Vec<PatchEntry<'_>> = patch.iter().collect();
            serde_json::to_writer_pretty(&mut self.out, &entries).map_err(io::Error::from)?;
            writeln!(self.out)?;
            return Ok(());
        }

        if self.print_names {
            writeln!(self.out, "{}", name)?;
        }
        for entry in patch {
            writeln!(
                self.out,
                "{:indent$}{}",
                "",
                entry.node.name(),
                indent = entry.depth * INDENT
            )?;
        }
        Ok(())
    }

    fn compatibility(&mut self, name: &str, flavour: &str, missing: &BTreeSet<String>) -> Result<()> {
        if missing.is_empty() {
            if self.print_names {
                writeln!(self.out, "{} is {} compatible", name, flavour)?;
            }
            return Ok(());
        }

        self.ok = false;
        if self.print_names {
            writeln!(self.out, "{} is not {} compatible. Missing:", name, flavour)?;
            for object in missing {
                writeln!(self.out, "\t{}", object)?;
            }
        }
        Ok(())
    }

    fn missing(&mut self, name: &str, patch: &Patch) -> Result<()> {
        let missing = missing_names(patch, Predicate::Known(false));
        if !missing.is_empty() {
            self.ok = false;
        }

        if self.print_names {
            writeln!(self.out, "{}", name)?;
            for object in &missing {
                writeln!(self.out, "\t{}", object)?;
            }
        } else {
            self.collected.extend(missing);
        }
        Ok(())
    }

    fn depend(&mut self, name: &str, patch: &Patch) -> Result<()> {
        let dirs: BTreeSet<String> = patch
            .iter()
            .flat_map(|e| e.node.search_dirs())
            .map(|d| d.display().to_string())
            .collect();
        let has_missing = !missing_names(patch, Predicate::Known(false)).is_empty();

        if self.print_names {
            writeln!(self.out, "{}", name)?;
            for dir in &dirs {
                writeln!(self.out, "{:indent$}{}", "", dir, indent = INDENT)?;
            }
            if has_missing {
                writeln!(self.out, "{}", MISSING_NOTE)?;
            }
        } else {
            self.collected.extend(dirs);
            self.have_missing |= has_missing;
        }
        Ok(())
    }

    /// Print merged output and return whether every file conformed.
    pub fn finish(&mut self) -> Result<bool> {
        if !self.print_names && matches!(self.action, ListAction::Missing | ListAction::Depend) {
            for line in &self.collected {
                writeln!(self.out, "{}", line)?;
            }
            if self.have_missing {
                writeln!(self.out, "{}", MISSING_NOTE)?;
            }
        }
        self.out.flush()?;
        Ok(self.ok)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Report names of the nodes matching `predicate`, deduplicated.
fn missing_names(patch: &Patch, predicate: Predicate) -> BTreeSet<String> {
    patch
        .select(&[predicate])
        .into_iter()
        .map(|e| e.node.name())
        .collect()
}
