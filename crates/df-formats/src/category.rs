//! Office-suite application categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The office-suite module a format belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Writer,
    Calc,
    Impress,
    Draw,
    Math,
    Graphic,
}

impl DocumentCategory {
    /// Every category, in registry order.
    pub const ALL: [DocumentCategory; 6] = [
        Self::Writer,
        Self::Calc,
        Self::Impress,
        Self::Draw,
        Self::Math,
        Self::Graphic,
    ];
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Writer => write!(f, "writer"),
            Self::Calc => write!(f, "calc"),
            Self::Impress => write!(f, "impress"),
            Self::Draw => write!(f, "draw"),
            Self::Math => write!(f, "math"),
            Self::Graphic => write!(f, "graphic"),
        }
    }
}

/// Returned when a string does not name a known category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown document category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for DocumentCategory {
    type Err = UnknownCategory;

    /// Case-insensitive: `"Writer"`, `"WRITER"` and `"writer"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "writer" => Ok(Self::Writer),
            "calc" => Ok(Self::Calc),
            "impress" => Ok(Self::Impress),
            "draw" => Ok(Self::Draw),
            "math" => Ok(Self::Math),
            "graphic" => Ok(Self::Graphic),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}
