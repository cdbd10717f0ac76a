//! Tree edge types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Type of a tree edge, stored on the child vertex under `edge_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    /// `<` — the child continues the parent's axis.
    Successor,
    /// `+` — the child starts a new axis borne by the parent.
    Branch,
}

impl EdgeType {
    /// Symbol used in the MTG textual notation.
    pub fn symbol(self) -> char {
        match self {
            EdgeType::Successor => '<',
            EdgeType::Branch => '+',
        }
    }

    pub fn is_branch(self) -> bool {
        matches!(self, EdgeType::Branch)
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for EdgeType {
    type Error = Error;

    fn try_from(c: char) -> Result<Self, Error> {
        match c {
            '<' => Ok(EdgeType::Successor),
            '+' => Ok(EdgeType::Branch),
            other => Err(Error::TypeError {
                expected: "edge symbol '<' or '+'".into(),
                got: format!("'{other}'"),
            }),
        }
    }
}

impl FromStr for EdgeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => EdgeType::try_from(c),
            _ => Err(Error::TypeError {
                expected: "edge symbol '<' or '+'".into(),
                got: format!("\"{s}\""),
            }),
        }
    }
}
