use miette::Diagnostic;
use thiserror::Error;

/// Main error type for pdpatch operations
#[derive(Error, Diagnostic, Debug)]
pub enum PdError {
    #[error("IO error: {0}")]
    #[diagnostic(code(pdpatch::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(pdpatch::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    /// Malformed known-definitions source.
    #[error("Format error{}: {message}", .line.map(|n| format!(" at line {}", n)).unwrap_or_default())]
    #[diagnostic(code(pdpatch::format))]
    Format {
        message: String,
        line: Option<usize>,
        #[help]
        help: Option<String>,
    },

    /// Malformed patch line. `line_num` is 0-based.
    #[error("Parse error: {message}:{line_num} \"{line_text}\"")]
    #[diagnostic(code(pdpatch::parse))]
    Parse {
        message: String,
        line_text: String,
        line_num: usize,
    },

    /// Structural violation found while assembling the patch tree.
    #[error("Invalid patch: {message}")]
    #[diagnostic(code(pdpatch::invalid_patch))]
    InvalidPatch {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Not implemented: {0}")]
    #[diagnostic(code(pdpatch::not_implemented))]
    NotImplemented(&'static str),

    #[error("Config error: {message}")]
    #[diagnostic(code(pdpatch::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid object name \"{name}\": {message}")]
    #[diagnostic(code(pdpatch::name))]
    InvalidName { name: String, message: String },
}

impl PdError {
    pub(crate) fn parse(message: impl Into<String>, line_text: &str, line_num: usize) -> Self {
        PdError::Parse {
            message: message.into(),
            line_text: line_text.to_string(),
            line_num,
        }
    }

    pub(crate) fn format(message: impl Into<String>, line: Option<usize>) -> Self {
        PdError::Format {
            message: message.into(),
            line,
            help: None,
        }
    }

    /// Whether this error signals an unsupported operation rather than bad input.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, PdError::NotImplemented(_))
    }
}

pub type Result<T> = std::result::Result<T, PdError>;
