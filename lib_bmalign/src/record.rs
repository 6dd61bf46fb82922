//! The external pairwise-alignment record format.
//!
//! Records are what alignments are imported from and exported to.
//! Their plain text encoding lives in the [`io`](self) submodule.

use std::{fmt::Display, str::FromStr};

use crate::{
    block::Range,
    error::Error,
    sequence::{Sequence, SequenceIdentifier},
};

mod io;

pub use io::write_plain_all;

/// The type of a pairwise record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecordKind {
    NotSet,
    Global,
    Diags,
    Partial,
    Disc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairwiseRecord {
    kind: RecordKind,
    segments: Segments,
}

/// The encoding of the aligned segments of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segments {
    /// Independent ungapped diagonals, each naming its own sequences.
    DenseDiagonals(Vec<DenseDiagonal>),
    /// A series of segments over a fixed list of sequences, where a missing start marks a gap.
    DenseSegment(DenseSegment),
    /// Any other encoding, which is not supported for alignment construction.
    Standard {
        identifiers: Vec<SequenceIdentifier>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseDiagonal {
    pub identifiers: Vec<SequenceIdentifier>,
    pub starts: Vec<usize>,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseSegment {
    pub identifiers: Vec<SequenceIdentifier>,
    pub entries: Vec<DenseSegmentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseSegmentEntry {
    pub starts: Vec<Option<usize>>,
    pub length: usize,
}

/// A uniform view of one segment, independent of the encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSegment<'record> {
    pub identifiers: &'record [SequenceIdentifier],
    pub starts: Vec<Option<usize>>,
    pub length: usize,
}

impl PairwiseRecord {
    pub fn new(kind: RecordKind, segments: Segments) -> Self {
        Self { kind, segments }
    }

    pub fn new_dense_diagonals(
        kind: RecordKind,
        diagonals: impl IntoIterator<Item = DenseDiagonal>,
    ) -> Self {
        Self::new(kind, Segments::DenseDiagonals(diagonals.into_iter().collect()))
    }

    pub fn new_dense_segment(
        kind: RecordKind,
        identifiers: impl IntoIterator<Item = SequenceIdentifier>,
        entries: impl IntoIterator<Item = DenseSegmentEntry>,
    ) -> Self {
        Self::new(
            kind,
            Segments::DenseSegment(DenseSegment {
                identifiers: identifiers.into_iter().collect(),
                entries: entries.into_iter().collect(),
            }),
        )
    }

    /// Creates a partial dense-diagonal record with one diagonal per pair of ranges.
    ///
    /// If there are no ranges, a single zero-length diagonal at the sequence starts is emitted,
    /// because a record needs at least one segment.
    pub fn from_aligned_ranges(
        master: &Sequence,
        slave: &Sequence,
        ranges: impl IntoIterator<Item = (Range, Range)>,
    ) -> Self {
        let identifiers = vec![
            master.primary_identifier().clone(),
            slave.primary_identifier().clone(),
        ];
        let mut diagonals: Vec<_> = ranges
            .into_iter()
            .map(|(master_range, slave_range)| {
                debug_assert_eq!(master_range.len(), slave_range.len());
                DenseDiagonal {
                    identifiers: identifiers.clone(),
                    starts: vec![master_range.from_index(), slave_range.from_index()],
                    length: master_range.len(),
                }
            })
            .collect();

        if diagonals.is_empty() {
            diagonals.push(DenseDiagonal {
                identifiers,
                starts: vec![0, 0],
                length: 0,
            });
        }

        Self::new_dense_diagonals(RecordKind::Partial, diagonals)
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    /// The number of sequences this record references.
    pub fn dimension(&self) -> usize {
        match &self.segments {
            Segments::DenseDiagonals(diagonals) => diagonals
                .first()
                .map(|diagonal| diagonal.identifiers.len())
                .unwrap_or(0),
            Segments::DenseSegment(DenseSegment { identifiers, .. })
            | Segments::Standard { identifiers } => identifiers.len(),
        }
    }

    /// The two sequences this record aligns, in encoded order.
    pub fn endpoints(&self) -> Option<[&SequenceIdentifier; 2]> {
        let identifiers = match &self.segments {
            Segments::DenseDiagonals(diagonals) => &diagonals.first()?.identifiers,
            Segments::DenseSegment(DenseSegment { identifiers, .. })
            | Segments::Standard { identifiers } => identifiers,
        };

        match identifiers.as_slice() {
            [first, second] => Some([first, second]),
            _ => None,
        }
    }

    pub fn references(&self, identifier: &SequenceIdentifier) -> bool {
        self.endpoints().is_some_and(|endpoints| {
            endpoints
                .iter()
                .any(|endpoint| endpoint.matches(identifier))
        })
    }

    /// Iterates over the segments in encoded order, or returns `None` for unsupported encodings.
    pub fn iter_segments(&self) -> Option<Vec<RecordSegment<'_>>> {
        match &self.segments {
            Segments::DenseDiagonals(diagonals) => Some(
                diagonals
                    .iter()
                    .map(|diagonal| RecordSegment {
                        identifiers: &diagonal.identifiers,
                        starts: diagonal.starts.iter().copied().map(Some).collect(),
                        length: diagonal.length,
                    })
                    .collect(),
            ),
            Segments::DenseSegment(dense_segment) => Some(
                dense_segment
                    .entries
                    .iter()
                    .map(|entry| RecordSegment {
                        identifiers: &dense_segment.identifiers,
                        starts: entry.starts.clone(),
                        length: entry.length,
                    })
                    .collect(),
            ),
            Segments::Standard { .. } => None,
        }
    }
}

impl RecordSegment<'_> {
    /// A segment is a gap if any of its sequences has no start.
    pub fn is_gap(&self) -> bool {
        self.starts.iter().any(Option::is_none)
    }
}

impl RecordKind {
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Partial | Self::Diags)
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSet => write!(f, "not-set"),
            Self::Global => write!(f, "global"),
            Self::Diags => write!(f, "diags"),
            Self::Partial => write!(f, "partial"),
            Self::Disc => write!(f, "disc"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "not-set" => Self::NotSet,
            "global" => Self::Global,
            "diags" => Self::Diags,
            "partial" => Self::Partial,
            "disc" => Self::Disc,
            other => {
                return Err(Error::Parser {
                    input: other.to_string(),
                    kind: nom::error::ErrorKind::Tag,
                });
            }
        })
    }
}
