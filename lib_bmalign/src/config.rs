use std::{fmt::Display, str::FromStr};

use crate::{block::UnalignedJustification, error::Error};

pub mod io;
#[cfg(test)]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentConfiguration {
    /// How to proceed if the pairwise records do not determine a unique master sequence.
    pub master_selection: MasterSelection,
    /// The justification used when rendering unaligned blocks.
    pub justification: UnalignedJustification,
}

/// The policy for choosing a master sequence among ambiguous candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MasterSelection {
    /// An ambiguous master is an error.
    #[default]
    Strict,
    /// An ambiguous master falls back to the first sequence of the first record.
    Permissive,
}

impl Display for MasterSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Permissive => write!(f, "permissive"),
        }
    }
}

impl FromStr for MasterSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            other => Err(Error::Parser {
                input: other.to_string(),
                kind: nom::error::ErrorKind::Tag,
            }),
        }
    }
}
