use std::{fs::File, path::PathBuf};

use anyhow::{Result, anyhow};
use itertools::Itertools;
use lib_bmalign::{
    alignment_utility::AlignmentUtility,
    block::{Range, UnalignedJustification},
    block_multiple_alignment::BlockMultipleAlignment,
    config::AlignmentConfiguration,
    record::PairwiseRecord,
    sequence::{Sequence, SequenceSet},
};
use log::LevelFilter;
use simplelog::TestLogger;

pub fn init_logging() {
    // Fails if another test of this binary initialised it already.
    TestLogger::init(LevelFilter::Debug, Default::default()).ok();
}

pub fn test_file(name: &str) -> Result<PathBuf> {
    // working directory is this crate, the test files are in the repo root
    Ok(PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .ok_or(anyhow!("No parent directory"))?
        .join("test_files")
        .join(name))
}

pub fn sequences() -> SequenceSet {
    [
        Sequence::new_local_protein("master", "MKTAYIAKQRQISFVKSHFSRQ"),
        Sequence::new_local_protein("first", "MKTAYIAKQRQISFVKSHFSRQ"),
        Sequence::new_local_protein("second", "MKTAYIAKWQISFVKSHFSRQ"),
        Sequence::new_local_protein("third", "GGMKTAYIAKQRQISFVKSHFSRQ"),
    ]
    .into_iter()
    .collect()
}

pub fn load_utility(records: &str, configuration: &str) -> Result<AlignmentUtility> {
    init_logging();
    let records = PairwiseRecord::read_plain(File::open(test_file(records)?)?)?;
    let configuration = AlignmentConfiguration::read_plain(File::open(test_file(configuration)?)?)?;
    Ok(AlignmentUtility::new(sequences(), records, configuration)?)
}

pub fn aligned_ranges(multiple: &BlockMultipleAlignment, row: usize) -> Vec<Range> {
    multiple
        .aligned_blocks()
        .map(|block| *block.range_of_row(row))
        .collect()
}

/// Checks the block invariants that must hold after every successful edit.
pub fn assert_consistent(multiple: &BlockMultipleAlignment) {
    let blocks = multiple.blocks();
    for (left, right) in blocks.iter().tuple_windows() {
        assert!(left.is_aligned() || right.is_aligned());
        for row in 0..multiple.n_rows() {
            assert_eq!(right.range_of_row(row).from, left.range_of_row(row).to + 1);
        }
    }

    assert_eq!(
        blocks.iter().map(|block| block.width()).sum::<usize>(),
        multiple.alignment_width()
    );

    for (row, sequence) in multiple.sequences().iter().enumerate() {
        let row_string = multiple
            .row_string(row, UnalignedJustification::Center)
            .unwrap();
        assert_eq!(row_string.chars().count(), multiple.alignment_width());
        assert_eq!(
            row_string.chars().filter(|&character| character != '-').count(),
            sequence.len()
        );
    }
}
