use std::{fmt::Display, rc::Rc, str::FromStr};

use crate::error::Error;

pub(crate) mod io;
#[cfg(test)]
mod tests;

/// An external identifier of a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SequenceIdentifier {
    Gi(u64),
    /// An accession, optionally with a version.
    ///
    /// If either side of a comparison has no version, only the accessions are compared.
    Accession {
        accession: String,
        version: Option<u32>,
    },
    Local(String),
    Pdb {
        molecule: String,
        chain: char,
    },
}

/// An immutable biological sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    primary_identifier: SequenceIdentifier,
    aliases: Vec<SequenceIdentifier>,
    residues: Vec<u8>,
    is_protein: bool,
}

/// The owner of all sequences that alignments refer to.
#[derive(Debug, Clone, Default)]
pub struct SequenceSet {
    sequences: Vec<Rc<Sequence>>,
}

impl SequenceIdentifier {
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Accession {
                    accession: accession_a,
                    version: version_a,
                },
                Self::Accession {
                    accession: accession_b,
                    version: version_b,
                },
            ) => {
                accession_a == accession_b
                    && match (version_a, version_b) {
                        (Some(version_a), Some(version_b)) => version_a == version_b,
                        _ => true,
                    }
            }
            (
                Self::Pdb {
                    molecule: molecule_a,
                    chain: chain_a,
                },
                Self::Pdb {
                    molecule: molecule_b,
                    chain: chain_b,
                },
            ) => molecule_a.eq_ignore_ascii_case(molecule_b) && chain_a == chain_b,
            (a, b) => a == b,
        }
    }
}

impl Display for SequenceIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gi(gi) => write!(f, "gi|{gi}"),
            Self::Accession {
                accession,
                version: Some(version),
            } => write!(f, "acc|{accession}.{version}"),
            Self::Accession {
                accession,
                version: None,
            } => write!(f, "acc|{accession}"),
            Self::Local(name) => write!(f, "lcl|{name}"),
            Self::Pdb { molecule, chain } => write!(f, "pdb|{molecule}|{chain}"),
        }
    }
}

impl FromStr for SequenceIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        io::parse_identifier_complete(s)
    }
}

impl Sequence {
    /// Creates a sequence that is written as `primary_identifier` and also matches any of the `aliases`.
    pub fn new(
        primary_identifier: SequenceIdentifier,
        aliases: impl IntoIterator<Item = SequenceIdentifier>,
        residues: impl Into<Vec<u8>>,
        is_protein: bool,
    ) -> Self {
        Self {
            primary_identifier,
            aliases: aliases.into_iter().collect(),
            residues: residues.into(),
            is_protein,
        }
    }

    /// Creates a protein sequence with a single local identifier.
    pub fn new_local_protein(name: &str, residues: &str) -> Self {
        Self::new(
            SequenceIdentifier::Local(name.to_string()),
            [],
            residues.as_bytes(),
            true,
        )
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Returns the residue at `index` as an upper case character.
    pub fn residue_at(&self, index: usize) -> Option<char> {
        self.residues
            .get(index)
            .map(|residue| char::from(residue.to_ascii_uppercase()))
    }

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    /// The primary identifier followed by all aliases.
    pub fn identifiers(&self) -> impl Iterator<Item = &SequenceIdentifier> {
        std::iter::once(&self.primary_identifier).chain(&self.aliases)
    }

    /// The identifier used when this sequence is written into a record.
    pub fn primary_identifier(&self) -> &SequenceIdentifier {
        &self.primary_identifier
    }

    pub fn is_protein(&self) -> bool {
        self.is_protein
    }

    pub fn matches(&self, identifier: &SequenceIdentifier) -> bool {
        self.identifiers()
            .any(|own_identifier| own_identifier.matches(identifier))
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.primary_identifier())
    }
}

impl SequenceSet {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, sequence: Sequence) -> Rc<Sequence> {
        let sequence = Rc::new(sequence);
        self.sequences.push(sequence.clone());
        sequence
    }

    /// Returns the first sequence matching `identifier`.
    pub fn find(&self, identifier: &SequenceIdentifier) -> Option<&Rc<Sequence>> {
        self.sequences
            .iter()
            .find(|sequence| sequence.matches(identifier))
    }

    pub fn resolve(&self, identifier: &SequenceIdentifier) -> crate::error::Result<Rc<Sequence>> {
        self.find(identifier)
            .cloned()
            .ok_or_else(|| Error::UnresolvedIdentifier(identifier.clone()))
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<Sequence>> {
        self.sequences.iter()
    }
}

impl FromIterator<Sequence> for SequenceSet {
    fn from_iter<T: IntoIterator<Item = Sequence>>(iter: T) -> Self {
        Self {
            sequences: iter.into_iter().map(Rc::new).collect(),
        }
    }
}
