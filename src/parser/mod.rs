//! Tokenizer for Pd patch files.
//!
//! A patch file is a sequence of `;`-terminated logical lines, each
//! starting with a chunk marker:
//!
//! ```text
//! #N canvas 0 0 450 300 10;
//! #X obj 30 27 osc~ 440;
//! #X obj 30 60 dac~;
//! #X connect 0 0 1 0;
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use pdpatch::parser::{read_lines, tokenize};
//!
//! let lines = read_lines(Path::new("synth.pd"))?;
//! for line in tokenize(&lines)? {
//!     println!("{} {} {:?}", line.chunk, line.element, line.params);
//! }
//! ```

mod chunk;
mod lines;

use std::path::Path;

use crate::error::{PdError, Result};

pub use chunk::{split_line, Chunk, PatchLine, ARRAY_DATA, RESTORE};
pub use lines::{logical_lines, LogicalLine};

/// Tokenize raw physical lines into split patch lines.
///
/// Fails on the first line with a bad chunk marker, a `#C` line that is
/// not a restore, or too few tokens.
pub fn tokenize<S: AsRef<str>>(lines: &[S]) -> Result<Vec<PatchLine>> {
    logical_lines(lines)
        .iter()
        .map(|line| split_line(line.line_num, &line.text))
        .collect()
}

/// Read a patch file into physical lines.
///
/// Both `\n` and `\r\n` line endings are accepted. Bytes that are not
/// valid UTF-8 (old patches often use Latin-1 in comments) are replaced.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|e| PdError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read file: {}", e),
    })?;

    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_tokenize_patch() {
        let lines = [
            "#N canvas 0 0 450 300 10;",
            "#X obj 30 27 osc~ 440;",
            "",
            "#X msg 30 60 \\; pd dsp 1",
            "  ;",
            "#X connect 0 0 1 0;",
        ];

        let tokens = tokenize(&lines).unwrap();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].element, "canvas");
        assert_eq!(tokens[1].line_num, 1);
        assert_eq!(tokens[2].line_num, 3);
        assert_eq!(tokens[2].element, "msg");
        assert_eq!(tokens[2].params, vec!["30", "60", "\\;", "pd", "dsp", "1"]);
        assert_eq!(tokens[3].element, "connect");
    }

    #[test]
    fn test_tokenize_reports_line_number() {
        let lines = ["#N canvas 0 0 450 300 10;", "", "#Q nonsense;"];

        match tokenize(&lines).unwrap_err() {
            PdError::Parse { line_num, .. } => assert_eq!(line_num, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_lines_unix_and_dos() {
        let dir = tempdir().unwrap();
        let lines = ["  ", "some line     ", "     ", "  another   line    ", "", " "];

        for sep in ["\n", "\r\n"] {
            let path = dir.path().join("lines.pd");
            let content: String = lines.iter().map(|l| format!("{}{}", l, sep)).collect();
            fs::write(&path, content).unwrap();

            assert_eq!(read_lines(&path).unwrap(), lines);
        }
    }

    #[test]
    fn test_read_lines_missing_file() {
        let err = read_lines(Path::new("/nonexistent/patch.pd")).unwrap_err();

        assert!(matches!(err, PdError::Io { .. }));
    }
}
