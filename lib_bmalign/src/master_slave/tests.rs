use std::rc::Rc;

use crate::{
    coordinates::OriginalBlockId,
    error::Error,
    record::{DenseDiagonal, DenseSegmentEntry, PairwiseRecord, RecordKind},
    sequence::{Sequence, SequenceIdentifier, SequenceSet},
};

use super::MasterSlaveAlignment;

fn sequences() -> SequenceSet {
    [
        Sequence::new_local_protein("master", "ACDEFGHIKLMN"),
        Sequence::new_local_protein("slave", "ACDEFGHIKLMN"),
        Sequence::new_local_protein("other", "WYWY"),
    ]
    .into_iter()
    .collect()
}

fn parse(input: &str) -> PairwiseRecord {
    let mut records = PairwiseRecord::parse_plain_all(input).unwrap();
    assert_eq!(records.len(), 1);
    records.remove(0)
}

fn master(sequences: &SequenceSet) -> Rc<Sequence> {
    sequences.iter().next().unwrap().clone()
}

#[test]
fn dense_diagonals() {
    let sequences = sequences();
    let master = master(&sequences);
    let record = parse("> partial dense-diag\nlcl|master lcl|slave 1 0 3\nlcl|master lcl|slave 4 5 2\n");

    let alignment = MasterSlaveAlignment::new(0, &record, &sequences, &master).unwrap();
    assert!(Rc::ptr_eq(alignment.master(), &master));
    assert_eq!(alignment.slave().to_string(), "lcl|slave");
    assert_eq!(
        &alignment.master_to_slave()[..7],
        &[None, Some(0), Some(1), Some(2), Some(5), Some(6), None]
    );
    assert_eq!(alignment.block_at(3), Some(OriginalBlockId::from(0)));
    assert_eq!(alignment.block_at(4), Some(OriginalBlockId::from(1)));
    assert_eq!(alignment.block_at(6), None);
    assert_eq!(alignment.n_aligned_residues(), 5);
    assert_eq!(alignment.n_original_blocks(), 2);
}

#[test]
fn master_may_be_second() {
    let sequences = sequences();
    let master = master(&sequences);
    let record = parse("> partial dense-diag\nlcl|slave lcl|master 2 0 2\n");

    let alignment = MasterSlaveAlignment::new(0, &record, &sequences, &master).unwrap();
    assert_eq!(alignment.slave_at(0), Some(2));
    assert_eq!(alignment.slave_at(1), Some(3));
    assert_eq!(alignment.slave_at(2), None);
}

#[test]
fn dense_segment_gaps_are_skipped() {
    let sequences = sequences();
    let master = master(&sequences);
    let record =
        parse("> diags dense-seg lcl|master lcl|slave\n0 0 2\n2 - 3\n5 2 0\n5 2 2\n");

    let alignment = MasterSlaveAlignment::new(0, &record, &sequences, &master).unwrap();
    assert_eq!(alignment.slave_at(1), Some(1));
    assert_eq!(alignment.slave_at(2), None);
    assert_eq!(alignment.slave_at(5), Some(2));
    assert_eq!(alignment.block_at(0), Some(OriginalBlockId::from(0)));
    // The zero-length segment still takes an ordinal.
    assert_eq!(alignment.block_at(5), Some(OriginalBlockId::from(2)));
    assert_eq!(alignment.n_original_blocks(), 2);
}

#[test]
fn adjacent_segments_stay_separate_blocks() {
    let sequences = sequences();
    let master = master(&sequences);
    let record = parse("> partial dense-diag\nlcl|master lcl|slave 0 0 3\nlcl|master lcl|slave 3 3 3\n");

    let alignment = MasterSlaveAlignment::new(0, &record, &sequences, &master).unwrap();
    assert_eq!(alignment.n_aligned_residues(), 6);
    assert_eq!(alignment.n_original_blocks(), 2);
}

#[test]
fn construction_errors() {
    let sequences = sequences();
    let master = master(&sequences);

    let record = parse("> partial dense-diag\nlcl|slave lcl|other 0 0 2\n");
    assert!(matches!(
        MasterSlaveAlignment::new(3, &record, &sequences, &master),
        Err(Error::MasterNotInRecord { record: 3 })
    ));

    let record = parse("> partial dense-diag\nlcl|master lcl|other 0 2 3\n");
    assert!(matches!(
        MasterSlaveAlignment::new(0, &record, &sequences, &master),
        Err(Error::IndexOutOfBounds {
            index: 4,
            length: 4,
            ..
        })
    ));

    let record = parse(
        "> partial dense-diag\nlcl|master lcl|slave 0 0 2\nlcl|master lcl|other 4 0 2\n",
    );
    assert!(matches!(
        MasterSlaveAlignment::new(0, &record, &sequences, &master),
        Err(Error::HeterogeneousSegment { record: 0 })
    ));

    let record = parse("> partial dense-diag\nlcl|master lcl|missing 0 0 2\n");
    assert!(matches!(
        MasterSlaveAlignment::new(0, &record, &sequences, &master),
        Err(Error::UnresolvedIdentifier(_))
    ));
}

#[test]
fn start_near_usize_max_is_out_of_bounds() {
    let sequences = sequences();
    let master = master(&sequences);
    let record = parse("> partial dense-diag\nlcl|master lcl|slave 18446744073709551615 0 2\n");

    assert!(matches!(
        MasterSlaveAlignment::new(0, &record, &sequences, &master),
        Err(Error::IndexOutOfBounds {
            record: 0,
            index: usize::MAX,
            length: 12,
        })
    ));
}

#[test]
fn wrong_number_of_starts() {
    let sequences = sequences();
    let master = master(&sequences);
    let identifiers = || {
        [
            SequenceIdentifier::Local("master".to_string()),
            SequenceIdentifier::Local("slave".to_string()),
        ]
    };

    let record = PairwiseRecord::new_dense_segment(
        RecordKind::Partial,
        identifiers(),
        [DenseSegmentEntry {
            starts: vec![Some(0)],
            length: 2,
        }],
    );
    assert!(matches!(
        MasterSlaveAlignment::new(1, &record, &sequences, &master),
        Err(Error::HeterogeneousSegment { record: 1 })
    ));

    let record = PairwiseRecord::new_dense_diagonals(
        RecordKind::Partial,
        [DenseDiagonal {
            identifiers: identifiers().to_vec(),
            starts: vec![0, 0, 0],
            length: 2,
        }],
    );
    assert!(matches!(
        MasterSlaveAlignment::new(1, &record, &sequences, &master),
        Err(Error::HeterogeneousSegment { record: 1 })
    ));
}
