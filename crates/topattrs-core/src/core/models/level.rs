use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A tier of the structural hierarchy.
///
/// Every attribute is indexed by exactly one level (its native level), and every group
/// addresses entities of exactly one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Atom,
    Residue,
    Segment,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Atom, Level::Residue, Level::Segment];
}

#[derive(Debug, Error)]
#[error("Invalid level string")]
pub struct ParseLevelError;

impl FromStr for Level {
    type Err = ParseLevelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "atom" | "atoms" => Ok(Level::Atom),
            "residue" | "residues" => Ok(Level::Residue),
            "segment" | "segments" => Ok(Level::Segment),
            _ => Err(ParseLevelError),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Level::Atom => "atom",
                Level::Residue => "residue",
                Level::Segment => "segment",
            }
        )
    }
}
