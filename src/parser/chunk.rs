//! Chunk markers and element splitting.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{PdError, Result};

/// Element name given to `#A` lines, which carry none in the patch text.
pub const ARRAY_DATA: &str = "array-data";

/// The only element allowed after a `#C` marker.
pub const RESTORE: &str = "restore";

/// The leading marker of every patch line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Chunk {
    /// `#N`: a new canvas or struct declaration.
    #[serde(rename = "#N")]
    New,
    /// `#C`: closes a canvas (`#C restore`).
    #[serde(rename = "#C")]
    Close,
    /// `#A`: array data.
    #[serde(rename = "#A")]
    Array,
    /// `#X`: objects, messages, connections and most other elements.
    #[serde(rename = "#X")]
    Element,
}

impl Chunk {
    pub fn as_str(self) -> &'static str {
        match self {
            Chunk::New => "#N",
            Chunk::Close => "#C",
            Chunk::Array => "#A",
            Chunk::Element => "#X",
        }
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chunk {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "#N" => Ok(Chunk::New),
            "#C" => Ok(Chunk::Close),
            "#A" => Ok(Chunk::Array),
            "#X" => Ok(Chunk::Element),
            _ => Err(()),
        }
    }
}

/// A logical line split into its chunk, element and parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchLine {
    pub line_num: usize,
    pub chunk: Chunk,
    pub element: String,
    pub params: Vec<String>,
}

/// Split a logical line into chunk, element and parameters.
pub fn split_line(line_num: usize, text: &str) -> Result<PatchLine> {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    let Some(first) = tokens.first() else {
        return Err(PdError::parse("Too few values to parse in parameters", text, line_num));
    };

    let chunk: Chunk = first
        .parse()
        .map_err(|_| PdError::parse(format!("Unrecognized chunk type \"{}\"", first), text, line_num))?;

    let (element, params) = match chunk {
        Chunk::Array => (ARRAY_DATA, &tokens[1..]),
        Chunk::New | Chunk::Close | Chunk::Element => match tokens.get(1) {
            Some(element) => (*element, &tokens[2..]),
            None => {
                return Err(PdError::parse(
                    "Too few values to parse in parameters",
                    text,
                    line_num,
                ))
            }
        },
    };

    if chunk == Chunk::Close && element != RESTORE {
        return Err(PdError::parse(
            format!("Invalid chunk/element combination \"{} {}\"", chunk, element),
            text,
            line_num,
        ));
    }

    Ok(PatchLine {
        line_num,
        chunk,
        element: element.to_string(),
        params: params.iter().map(|p| p.to_string()).collect(),
    })
}
