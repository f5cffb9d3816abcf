//! `pdpatch setup`: edit the configuration file.

use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args};

use crate::discovery::Config;
use crate::error::{PdError, Result};
use crate::output::{display_path, plural, Printer};

/// Edit include directories and name matching in the config file
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("changes")
        .args(["include", "remove", "windows", "unix"])
        .required(true)
        .multiple(true)
))]
pub struct SetupArgs {
    /// Save a directory to search for abstractions
    #[arg(short, long = "include", value_name = "DIR")]
    pub include: Vec<PathBuf>,

    /// Remove a key (include, case_insensitive) from the config file
    #[arg(short, long = "remove", value_name = "KEY")]
    pub remove: Vec<String>,

    /// Match object names case-insensitively, as on Windows
    #[arg(short, long, conflicts_with = "unix")]
    pub windows: bool,

    /// Match object names case-sensitively, as on Unix
    #[arg(short, long)]
    pub unix: bool,
}

pub fn run(args: SetupArgs, config: Option<&Path>, printer: &Printer) -> Result<()> {
    let path = match config.map(Path::to_path_buf).or_else(Config::default_path) {
        Some(path) => path,
        None => {
            return Err(PdError::Config {
                message: "Could not determine the config directory".to_string(),
                help: Some("Use --config or set PDPATCH_CONFIG".to_string()),
            })
        }
    };

    let mut cfg = Config::load(&path)?;

    let dirs: Vec<PathBuf> = args
        .include
        .iter()
        .map(|dir| {
            dir.canonicalize().unwrap_or_else(|_| {
                printer.warning("Missing", &format!("{} does not exist", display_path(dir)));
                dir.clone()
            })
        })
        .collect();

    apply(&mut cfg, dirs, &args, printer)?;

    cfg.save(&path)?;
    printer.success("Saved", &display_path(&path));
    Ok(())
}

/// Apply the requested changes: includes, then matching, then removals.
pub fn apply(cfg: &mut Config, dirs: Vec<PathBuf>, args: &SetupArgs, printer: &Printer) -> Result<()> {
    if !dirs.is_empty() {
        let added = cfg.add_includes(dirs);
        printer.status("Added", &plural(added, "include directory", "include directories"));
    }

    if args.windows {
        cfg.case_insensitive = Some(true);
    } else if args.unix {
        cfg.case_insensitive = Some(false);
    }

    for key in &args.remove {
        if cfg.remove(key)? {
            printer.status("Removed", key);
        } else {
            printer.info("Unset", key);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use tempfile::tempdir;

    fn parse_args(args: &[&str]) -> std::result::Result<SetupArgs, clap::Error> {
        let argv = ["pdpatch", "setup"].iter().chain(args);
        match Cli::try_parse_from(argv)?.command {
            Commands::Setup(args) => Ok(args),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_requires_a_change() {
        assert!(parse_args(&[]).is_err());
        assert!(parse_args(&["-w", "-u"]).is_err());
        assert!(parse_args(&["-w"]).is_ok());
    }

    #[test]
    fn test_apply_changes() {
        let args = parse_args(&["-i", "/a", "-w", "-r", "include"]).unwrap();
        let mut cfg = Config::default();

        apply(&mut cfg, vec![PathBuf::from("/a")], &args, &Printer::new()).unwrap();

        // Removal runs last, so the new include is cleared again
        assert!(cfg.include.is_empty());
        assert_eq!(cfg.case_insensitive, Some(true));
    }

    #[test]
    fn test_apply_unknown_key() {
        let args = parse_args(&["-r", "pd"]).unwrap();
        let mut cfg = Config::default();

        let err = apply(&mut cfg, Vec::new(), &args, &Printer::new()).unwrap_err();

        assert!(matches!(err, PdError::Config { .. }));
    }

    #[test]
    fn test_run_writes_config() {
        let dir = tempdir().unwrap();
        let include = dir.path().join("abstractions");
        std::fs::create_dir_all(&include).unwrap();
        let path = dir.path().join("pdpatch/config.yaml");

        let args = parse_args(&["-i", include.to_str().unwrap(), "-u"]).unwrap();
        run(args, Some(&path), &Printer::new()).unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.include, vec![include.canonicalize().unwrap()]);
        assert_eq!(cfg.case_insensitive, Some(false));
    }
}
