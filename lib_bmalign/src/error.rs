use thiserror::Error;

use crate::sequence::SequenceIdentifier;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("An IO error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("A parsing error occurred on string '{input}': {kind:?}")]
    Parser {
        input: String,
        kind: nom::error::ErrorKind,
    },

    #[error("Parsing was unsuccessful due to incomplete input: {0:?}")]
    ParserIncomplete(nom::Needed),

    #[error("Cannot construct an alignment set from zero pairwise records.")]
    NoRecords,

    #[error("Record {record} has unsupported type {kind}, expected 'partial' or 'diags'.")]
    UnsupportedRecordType { record: usize, kind: String },

    #[error("Record {record} references {dimension} sequences, expected exactly 2.")]
    WrongDimension { record: usize, dimension: usize },

    #[error("Record {record} uses an unsupported segment encoding.")]
    UnsupportedSegmentEncoding { record: usize },

    #[error("Record {record} has no segments.")]
    NoSegments { record: usize },

    #[error("No sequence matches identifier {0}.")]
    UnresolvedIdentifier(SequenceIdentifier),

    #[error("A segment of record {record} references sequences other than the record's master and slave.")]
    HeterogeneousSegment { record: usize },

    #[error("Record {record} does not reference the master sequence.")]
    MasterNotInRecord { record: usize },

    #[error(
        "Segment of record {record} reaches position {index} of a sequence of length {length}."
    )]
    IndexOutOfBounds {
        record: usize,
        index: usize,
        length: usize,
    },

    #[error("The master sequence is ambiguous, candidates are {first} and {second}.")]
    AmbiguousMaster {
        first: SequenceIdentifier,
        second: SequenceIdentifier,
    },

    #[error("No sequence is present in every pairwise record.")]
    NoCommonMaster,

    #[error("Pairwise alignment {alignment} does not share the master of the first alignment.")]
    MasterMismatch { alignment: usize },

    #[error("The pairwise alignments do not share a block structure, run IBM first.")]
    NotAMultipleAlignment,

    #[error("Row {row} is out of range for an alignment with {rows} rows.")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("The row order {0:?} is not a permutation of the slave rows.")]
    InvalidRowOrder(Vec<usize>),

    #[error("Internal inconsistency: {0}")]
    Internal(String),
}
