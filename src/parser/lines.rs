//! Logical-line assembly.
//!
//! A Pd logical line ends with an unescaped `;` and may span several
//! physical lines.

const LINE_SEP: char = ';';
const ESCAPED_LINE_SEP: &str = "\\;";

/// One logical patch line, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// 0-based index of the first physical line.
    pub line_num: usize,
    /// Physical line texts joined with single spaces.
    pub text: String,
}

impl LogicalLine {
    pub fn new(line_num: usize, text: impl Into<String>) -> Self {
        Self {
            line_num,
            text: text.into(),
        }
    }
}

/// Assemble physical lines into logical lines.
///
/// Lines are trimmed and tabs become single spaces. Blank lines are
/// skipped but still counted. Text after the last terminator is dropped
/// with a warning.
pub fn logical_lines<S: AsRef<str>>(lines: &[S]) -> Vec<LogicalLine> {
    let mut logical = Vec::new();
    let mut pending: Vec<(usize, String)> = Vec::new();

    for (line_num, line) in lines.iter().enumerate() {
        let line = clean_line(line.as_ref());
        if line.is_empty() {
            continue;
        }

        if is_line_end(&line) {
            let last = line[..line.len() - LINE_SEP.len_utf8()].trim_end().to_string();
            pending.push((line_num, last));

            let start = pending[0].0;
            let text = pending
                .drain(..)
                .map(|(_, text)| text)
                .collect::<Vec<_>>()
                .join(" ");
            logical.push(LogicalLine::new(start, text));
        } else {
            pending.push((line_num, line));
        }
    }

    if let Some((start, _)) = pending.first() {
        log::warn!("Unterminated patch line at line {} ignored", start);
    }

    logical
}

fn clean_line(line: &str) -> String {
    line.trim_matches(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
        .replace('\t', " ")
}

fn is_line_end(line: &str) -> bool {
    line.ends_with(LINE_SEP) && !line.ends_with(ESCAPED_LINE_SEP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input() {
        let lines: [&str; 0] = [];
        assert!(logical_lines(&lines).is_empty());
    }

    #[test]
    fn test_one_line() {
        let lines = ["  one line only    ;\n"];

        assert_eq!(logical_lines(&lines), vec![LogicalLine::new(0, "one line only")]);
    }

    #[test]
    fn test_multi_line() {
        let lines = [
            "first line\n",
            "   second part of first line;\n",
            "second logical line;\n",
            "\n",
            "   escaped line sep  \\;\n",
            "1st continued escaped line sep  \n",
            "      2nd continued escaped line sep\n",
            "   3rd and last continued escaped line sep  ;\n",
            "last line;\n",
        ];

        let expected = vec![
            LogicalLine::new(0, "first line second part of first line"),
            LogicalLine::new(2, "second logical line"),
            LogicalLine::new(
                4,
                "escaped line sep  \\; 1st continued escaped line sep \
                 2nd continued escaped line sep \
                 3rd and last continued escaped line sep",
            ),
            LogicalLine::new(8, "last line"),
        ];

        assert_eq!(logical_lines(&lines), expected);
    }

    #[test]
    fn test_tabs_expand_to_spaces() {
        let lines = ["\t#X\tobj 1\t2 bang;\t"];

        assert_eq!(logical_lines(&lines), vec![LogicalLine::new(0, "#X obj 1 2 bang")]);
    }

    #[test]
    fn test_dos_line_endings() {
        let lines = ["#N canvas 0 0 450 300 10;\r\n", "\r\n", "#X obj 1 2 f;\r\n"];

        assert_eq!(
            logical_lines(&lines),
            vec![
                LogicalLine::new(0, "#N canvas 0 0 450 300 10"),
                LogicalLine::new(2, "#X obj 1 2 f"),
            ]
        );
    }

    #[test]
    fn test_unterminated_tail_dropped() {
        let lines = ["a;", "b"];

        assert_eq!(logical_lines(&lines), vec![LogicalLine::new(0, "a")]);
    }

    #[test]
    fn test_escaped_separator_never_ends_line() {
        let lines = ["#X msg 1 2 \\;", "pd dsp 1;"];

        let logical = logical_lines(&lines);

        assert_eq!(logical.len(), 1);
        assert_eq!(logical[0].text, "#X msg 1 2 \\; pd dsp 1");
    }
}
