use std::rc::Rc;

use crate::{
    block::{Range, UngappedAlignedBlock},
    block_multiple_alignment::BlockMultipleAlignment,
    config::MasterSelection,
    error::Error,
    record::PairwiseRecord,
    sequence::{Sequence, SequenceSet},
};

use super::AlignmentSet;

fn sequences() -> SequenceSet {
    [
        Sequence::new_local_protein("a", "ACDEFGHIKL"),
        Sequence::new_local_protein("b", "ACDEFGHIKL"),
        Sequence::new_local_protein("c", "ACDEFGHIKL"),
        Sequence::new_local_protein("d", "ACDEFGHIKL"),
    ]
    .into_iter()
    .collect()
}

fn sequence(sequences: &SequenceSet, index: usize) -> Rc<Sequence> {
    sequences.iter().nth(index).unwrap().clone()
}

fn records(input: &str) -> Vec<PairwiseRecord> {
    PairwiseRecord::parse_plain_all(input).unwrap()
}

#[test]
fn master_is_shared_sequence() {
    let sequences = sequences();
    let records = records(
        "> partial dense-diag\nlcl|b lcl|a 0 0 5\n> partial dense-diag\nlcl|a lcl|c 0 1 5\n",
    );

    let alignment_set = AlignmentSet::new(&records, &sequences, MasterSelection::Strict).unwrap();
    assert!(Rc::ptr_eq(alignment_set.master(), &sequence(&sequences, 0)));
    assert_eq!(alignment_set.len(), 2);
    assert!(Rc::ptr_eq(alignment_set.alignments()[0].slave(), &sequence(&sequences, 1)));
    assert!(Rc::ptr_eq(alignment_set.alignments()[1].slave(), &sequence(&sequences, 2)));
}

#[test]
fn single_record_uses_first_sequence() {
    let sequences = sequences();
    let records = records("> diags dense-diag\nlcl|d lcl|a 0 0 5\n");

    let alignment_set = AlignmentSet::new(&records, &sequences, MasterSelection::Strict).unwrap();
    assert!(Rc::ptr_eq(alignment_set.master(), &sequence(&sequences, 3)));
}

#[test]
fn ambiguous_master() {
    let sequences = sequences();
    let records = records(
        "> partial dense-diag\nlcl|a lcl|b 0 0 5\n> partial dense-diag\nlcl|b lcl|a 2 2 5\n",
    );

    assert!(matches!(
        AlignmentSet::new(&records, &sequences, MasterSelection::Strict),
        Err(Error::AmbiguousMaster { .. })
    ));

    let alignment_set =
        AlignmentSet::new(&records, &sequences, MasterSelection::Permissive).unwrap();
    assert!(Rc::ptr_eq(alignment_set.master(), &sequence(&sequences, 0)));
    assert_eq!(alignment_set.alignments()[1].slave_at(2), Some(2));
}

#[test]
fn no_common_master() {
    let sequences = sequences();
    let records = records(
        "> partial dense-diag\nlcl|a lcl|b 0 0 5\n> partial dense-diag\nlcl|c lcl|d 0 0 5\n",
    );

    assert!(matches!(
        AlignmentSet::new(&records, &sequences, MasterSelection::Strict),
        Err(Error::NoCommonMaster)
    ));
    assert!(matches!(
        AlignmentSet::new(&records, &sequences, MasterSelection::Permissive),
        Err(Error::MasterNotInRecord { record: 1 })
    ));
}

#[test]
fn reject_unsupported_records() {
    let sequences = sequences();

    assert!(matches!(
        AlignmentSet::new(&[], &sequences, MasterSelection::Strict),
        Err(Error::NoRecords)
    ));
    assert!(matches!(
        AlignmentSet::new(
            &records("> global dense-diag\nlcl|a lcl|b 0 0 5\n"),
            &sequences,
            MasterSelection::Strict
        ),
        Err(Error::UnsupportedRecordType { record: 0, .. })
    ));
    assert!(matches!(
        AlignmentSet::new(
            &records("> partial dense-diag\nlcl|a lcl|b lcl|c 0 0 0 5\n"),
            &sequences,
            MasterSelection::Strict
        ),
        Err(Error::WrongDimension {
            record: 0,
            dimension: 3
        })
    ));
    assert!(matches!(
        AlignmentSet::new(
            &records("> partial dense-diag\nlcl|a lcl|b 0 0 5\n> partial standard lcl|a lcl|c\n"),
            &sequences,
            MasterSelection::Strict
        ),
        Err(Error::UnsupportedSegmentEncoding { record: 1 })
    ));
}

#[test]
fn create_from_multiple_round_trip() {
    let sequences = sequences();
    let multiple = BlockMultipleAlignment::from_aligned_blocks(
        vec![sequence(&sequences, 0), sequence(&sequences, 1), sequence(&sequences, 2)],
        [
            UngappedAlignedBlock::new(vec![Range::new(0, 2), Range::new(1, 3), Range::new(0, 2)])
                .unwrap(),
            UngappedAlignedBlock::new(vec![Range::new(5, 8), Range::new(5, 8), Range::new(6, 9)])
                .unwrap(),
        ],
    )
    .unwrap();

    let (records, alignment_set) =
        AlignmentSet::create_from_multiple(&multiple, None, &sequences, MasterSelection::Strict)
            .unwrap();
    assert_eq!(records.len(), 2);
    assert!(Rc::ptr_eq(alignment_set.master(), multiple.master()));
    let alignment = &alignment_set.alignments()[1];
    assert!(Rc::ptr_eq(alignment.slave(), &sequence(&sequences, 2)));
    assert_eq!(alignment.slave_at(5), Some(6));
    assert_eq!(alignment.slave_at(3), None);
    assert_eq!(alignment.n_original_blocks(), 2);

    let (records, alignment_set) = AlignmentSet::create_from_multiple(
        &multiple,
        Some(&[2, 1]),
        &sequences,
        MasterSelection::Strict,
    )
    .unwrap();
    assert_eq!(records.len(), 2);
    assert!(Rc::ptr_eq(alignment_set.alignments()[0].slave(), &sequence(&sequences, 2)));

    assert!(matches!(
        AlignmentSet::create_from_multiple(
            &multiple,
            Some(&[1, 1]),
            &sequences,
            MasterSelection::Strict
        ),
        Err(Error::InvalidRowOrder(_))
    ));
}
