//! A multiple alignment made of alternating aligned and unaligned blocks.
//!
//! Row `0` is the master, all other rows are slaves.
//! The unaligned blocks are always derived from the aligned blocks:
//! they fill exactly the residues between two consecutive aligned blocks (or the sequence ends),
//! and their width is the largest number of residues any row has in that gap.
//! Every structural edit therefore only manipulates the aligned blocks,
//! and then re-derives the unaligned blocks and the block map.

use std::rc::Rc;

use itertools::Itertools;
use log::{error, trace};

use crate::{
    block::{Block, Range, UnalignedBlock, UnalignedJustification, UngappedAlignedBlock},
    error::{Error, Result},
    pssm::{Pssm, PssmEngine},
    sequence::Sequence,
};

mod edit;

#[derive(Debug, Clone)]
pub struct BlockMultipleAlignment {
    sequences: Vec<Rc<Sequence>>,
    blocks: Vec<Block>,
    block_map: Vec<BlockInfo>,
    block_starts: Vec<usize>,
    total_width: usize,
    row_doubles: Vec<Option<f64>>,
    row_strings: Vec<Option<String>>,
    pssm: Option<Pssm>,
}

/// The entry of the block map for one alignment column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// The index of the block in [`BlockMultipleAlignment::blocks`].
    pub block: usize,
    /// The column relative to the first column of the block.
    pub block_column: usize,
    /// The number of the block counting only aligned blocks, if the block is aligned.
    pub aligned_block_number: Option<usize>,
}

/// The residue shown by one row in one alignment column.
#[derive(Debug, Clone, Copy)]
pub struct ResidueAt<'alignment> {
    pub sequence: &'alignment Rc<Sequence>,
    /// The sequence index, or `None` if the row shows no residue in this column.
    pub index: Option<usize>,
    pub is_aligned: bool,
}

impl BlockMultipleAlignment {
    /// Creates an alignment without blocks over the given rows, where the first row is the master.
    pub fn new(sequences: Vec<Rc<Sequence>>) -> Self {
        debug_assert!(!sequences.is_empty());
        let rows = sequences.len();

        Self {
            sequences,
            blocks: Vec::new(),
            block_map: Vec::new(),
            block_starts: Vec::new(),
            total_width: 0,
            row_doubles: vec![None; rows],
            row_strings: vec![None; rows],
            pssm: None,
        }
    }

    /// Creates a finished alignment from its aligned blocks, which must be ordered left to right.
    pub fn from_aligned_blocks(
        sequences: Vec<Rc<Sequence>>,
        aligned_blocks: impl IntoIterator<Item = UngappedAlignedBlock>,
    ) -> Result<Self> {
        let mut result = Self::new(sequences);
        for block in aligned_blocks {
            result.add_aligned_block_at_end(block)?;
        }
        result.add_unaligned_blocks()?;
        result.update_block_map(true)?;
        Ok(result)
    }

    /// Appends an aligned block, which must lie after all existing blocks on every row.
    pub fn add_aligned_block_at_end(&mut self, block: UngappedAlignedBlock) -> Result<()> {
        if block.n_rows() != self.n_rows() {
            return Err(Error::Internal(format!(
                "block with {} rows added to alignment with {} rows",
                block.n_rows(),
                self.n_rows()
            )));
        }

        if let Some(last) = self.blocks.last() {
            for (row, (range, last_range)) in block.ranges().iter().zip(last.ranges()).enumerate() {
                if range.from <= last_range.to {
                    return Err(Error::Internal(format!(
                        "block range {range} does not follow {last_range} in row {row}"
                    )));
                }
            }
        }

        self.blocks.push(Block::Aligned(block));
        Ok(())
    }

    /// Fills the gaps around and between the aligned blocks with unaligned blocks.
    ///
    /// Gaps that contain no residue in any row do not get a block.
    /// Any unaligned blocks present before are replaced.
    pub fn add_unaligned_blocks(&mut self) -> Result<()> {
        let aligned_blocks: Vec<_> = self.aligned_blocks().cloned().collect();
        self.blocks = synthesize_blocks(&self.sequences, &aligned_blocks)?;
        Ok(())
    }

    /// Rebuilds the column lookup table after a structural change.
    ///
    /// This invalidates the cached PSSM, and also the row annotations if `clear_row_info` is set.
    pub fn update_block_map(&mut self, clear_row_info: bool) -> Result<()> {
        for (index, block) in self.blocks.iter().enumerate() {
            if block.width() == 0 {
                return Err(Error::Internal(format!("block {index} has zero width")));
            }
            if block.n_rows() != self.n_rows() {
                return Err(Error::Internal(format!(
                    "block {index} has {} rows instead of {}",
                    block.n_rows(),
                    self.n_rows()
                )));
            }
        }

        self.rebuild_block_map();
        if clear_row_info {
            self.clear_row_info();
        }
        Ok(())
    }

    fn rebuild_block_map(&mut self) {
        self.block_map.clear();
        self.block_starts.clear();
        let mut aligned_block_number = 0;

        for (index, block) in self.blocks.iter().enumerate() {
            self.block_starts.push(self.block_map.len());
            let number = block.is_aligned().then_some(aligned_block_number);
            self.block_map
                .extend((0..block.width()).map(|block_column| BlockInfo {
                    block: index,
                    block_column,
                    aligned_block_number: number,
                }));
            if block.is_aligned() {
                aligned_block_number += 1;
            }
        }

        self.total_width = self.block_map.len();
        self.pssm = None;
        trace!(
            "Block map has {} columns in {} blocks",
            self.total_width,
            self.blocks.len()
        );
    }

    fn clear_row_info(&mut self) {
        self.row_doubles.iter_mut().for_each(|value| *value = None);
        self.row_strings.iter_mut().for_each(|value| *value = None);
    }

    /// Verifies that the aligned block at `block_index` has consistent ranges
    /// that lie within their sequences and do not overlap the neighbouring blocks.
    pub fn check_aligned_block(&self, block_index: usize) -> Result<()> {
        let block = self
            .blocks
            .get(block_index)
            .and_then(Block::as_aligned)
            .ok_or_else(|| Error::Internal(format!("block {block_index} is not aligned")))?;
        check_aligned_ranges(
            &self.sequences,
            block,
            block_index
                .checked_sub(1)
                .and_then(|index| self.blocks.get(index)),
            self.blocks.get(block_index + 1),
        )
    }

    /// Replaces the rows and aligned blocks with the result of an edit.
    ///
    /// Edits are computed such that the result is always consistent,
    /// so an inconsistency here is a bug and panics.
    fn commit(
        &mut self,
        operation: &str,
        sequences: Option<Vec<Rc<Sequence>>>,
        aligned_blocks: Vec<UngappedAlignedBlock>,
        clear_row_info: bool,
    ) {
        let sequences = sequences.unwrap_or_else(|| self.sequences.clone());
        match synthesize_blocks(&sequences, &aligned_blocks) {
            Ok(blocks) => {
                self.sequences = sequences;
                self.blocks = blocks;
                self.rebuild_block_map();
                if clear_row_info {
                    self.clear_row_info();
                }
            }
            Err(error) => internal_failure(operation, error),
        }
    }
}

impl BlockMultipleAlignment {
    pub fn n_rows(&self) -> usize {
        self.sequences.len()
    }

    /// The number of alignment columns.
    pub fn alignment_width(&self) -> usize {
        self.total_width
    }

    pub fn master(&self) -> &Rc<Sequence> {
        &self.sequences[0]
    }

    pub fn sequence_of_row(&self, row: usize) -> &Rc<Sequence> {
        &self.sequences[row]
    }

    pub fn sequences(&self) -> &[Rc<Sequence>] {
        &self.sequences
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_map(&self) -> &[BlockInfo] {
        &self.block_map
    }

    pub fn aligned_blocks(&self) -> impl Iterator<Item = &UngappedAlignedBlock> {
        self.blocks.iter().filter_map(Block::as_aligned)
    }

    pub fn unaligned_blocks(&self) -> impl Iterator<Item = &UnalignedBlock> {
        self.blocks.iter().filter_map(Block::as_unaligned)
    }

    pub fn n_aligned_blocks(&self) -> usize {
        self.aligned_blocks().count()
    }

    /// Returns the block containing `column` and the column relative to the block.
    pub fn block_at(&self, column: usize) -> Option<(&Block, usize)> {
        self.block_map
            .get(column)
            .map(|info| (&self.blocks[info.block], info.block_column))
    }

    pub fn aligned_block_number(&self, column: usize) -> Option<usize> {
        self.block_map.get(column)?.aligned_block_number
    }

    /// The first alignment column of the block at `block_index`.
    pub fn block_start_column(&self, block_index: usize) -> usize {
        self.block_starts[block_index]
    }

    pub fn first_aligned_block_position(&self) -> Option<usize> {
        self.block_map
            .iter()
            .position(|info| info.aligned_block_number.is_some())
    }

    pub fn last_aligned_block_position(&self) -> Option<usize> {
        self.block_map
            .iter()
            .rposition(|info| info.aligned_block_number.is_some())
    }

    pub fn unaligned_block_before(&self, block_index: usize) -> Option<&UnalignedBlock> {
        self.blocks.get(block_index.checked_sub(1)?)?.as_unaligned()
    }

    pub fn unaligned_block_after(&self, block_index: usize) -> Option<&UnalignedBlock> {
        self.blocks.get(block_index + 1)?.as_unaligned()
    }

    /// Finds the block that contains the residue `sequence_index` of `row`.
    pub fn block_index_of(&self, row: usize, sequence_index: usize) -> Option<usize> {
        if row >= self.n_rows() {
            return None;
        }

        let target = sequence_index as isize;
        let block_index = self
            .blocks
            .partition_point(|block| block.range_of_row(row).to < target);
        let block = self.blocks.get(block_index)?;
        block
            .range_of_row(row)
            .contains(sequence_index)
            .then_some(block_index)
    }

    /// The justification that is applied to the block at `block_index`.
    ///
    /// An unaligned block before the first aligned block is always left-justified,
    /// and an unaligned block after the last aligned block is always right-justified.
    pub fn effective_justification(
        &self,
        block_index: usize,
        requested: UnalignedJustification,
    ) -> UnalignedJustification {
        if self.blocks[block_index].is_aligned() {
            requested
        } else if block_index == 0 {
            UnalignedJustification::Left
        } else if block_index + 1 == self.blocks.len() {
            UnalignedJustification::Right
        } else {
            requested
        }
    }

    pub fn sequence_and_index_at(
        &self,
        column: usize,
        row: usize,
        justification: UnalignedJustification,
    ) -> Option<ResidueAt<'_>> {
        let info = self.block_map.get(column)?;
        let sequence = self.sequences.get(row)?;
        let block = &self.blocks[info.block];
        let justification = self.effective_justification(info.block, justification);

        Some(ResidueAt {
            sequence,
            index: block.index_at(info.block_column, row, justification),
            is_aligned: block.is_aligned(),
        })
    }

    /// Returns the residue at the given position in upper case if it is aligned, in lower case otherwise,
    /// or `-` if the row has no residue in that column.
    pub fn character_at(
        &self,
        column: usize,
        row: usize,
        justification: UnalignedJustification,
    ) -> Option<char> {
        let residue = self.sequence_and_index_at(column, row, justification)?;
        Some(match residue.index {
            Some(index) => {
                let character = residue.sequence.residue_at(index)?;
                if residue.is_aligned {
                    character
                } else {
                    character.to_ascii_lowercase()
                }
            }
            None => '-',
        })
    }

    /// Renders one row as it appears in the alignment.
    pub fn row_string(&self, row: usize, justification: UnalignedJustification) -> Option<String> {
        (0..self.alignment_width())
            .map(|column| self.character_at(column, row, justification))
            .collect()
    }

    /// Returns the alignment column in which the residue `sequence_index` of `row` is shown.
    pub fn alignment_index(
        &self,
        row: usize,
        sequence_index: usize,
        justification: UnalignedJustification,
    ) -> Option<usize> {
        let block_index = self.block_index_of(row, sequence_index)?;
        let start_column = self.block_starts[block_index];

        match &self.blocks[block_index] {
            Block::Aligned(block) => {
                Some(start_column + sequence_index - block.range_of_row(row).from_index())
            }
            Block::Unaligned(block) => {
                let justification = self.effective_justification(block_index, justification);
                (0..block.width())
                    .find(|&block_column| {
                        block.index_at(block_column, row, justification) == Some(sequence_index)
                    })
                    .map(|block_column| start_column + block_column)
            }
        }
    }

    pub fn is_aligned(&self, row: usize, sequence_index: usize) -> bool {
        self.block_index_of(row, sequence_index)
            .is_some_and(|block_index| self.blocks[block_index].is_aligned())
    }
}

impl BlockMultipleAlignment {
    pub fn row_double(&self, row: usize) -> Option<f64> {
        self.row_doubles.get(row).copied().flatten()
    }

    pub fn set_row_double(&mut self, row: usize, value: f64) -> Result<()> {
        let rows = self.n_rows();
        *self
            .row_doubles
            .get_mut(row)
            .ok_or(Error::RowOutOfRange { row, rows })? = Some(value);
        Ok(())
    }

    pub fn row_string_annotation(&self, row: usize) -> Option<&str> {
        self.row_strings.get(row)?.as_deref()
    }

    pub fn set_row_string_annotation(&mut self, row: usize, value: impl Into<String>) -> Result<()> {
        let rows = self.n_rows();
        *self
            .row_strings
            .get_mut(row)
            .ok_or(Error::RowOutOfRange { row, rows })? = Some(value.into());
        Ok(())
    }

    /// Returns the PSSM of this alignment, computing it with `engine` if it is not cached.
    ///
    /// The cache is dropped on every structural change.
    pub fn pssm(&mut self, engine: &impl PssmEngine) -> Result<&Pssm> {
        if self.pssm.is_none() {
            let pssm = engine.compute(self)?;
            self.pssm = Some(pssm);
        }
        self.pssm
            .as_ref()
            .ok_or_else(|| Error::Internal("PSSM cache is empty".to_string()))
    }

    pub fn has_cached_pssm(&self) -> bool {
        self.pssm.is_some()
    }
}

/// Builds the complete block list for the given aligned blocks.
fn synthesize_blocks(
    sequences: &[Rc<Sequence>],
    aligned_blocks: &[UngappedAlignedBlock],
) -> Result<Vec<Block>> {
    let mut blocks = Vec::with_capacity(2 * aligned_blocks.len() + 1);
    let mut previous: Option<&UngappedAlignedBlock> = None;

    for block in aligned_blocks {
        if block.n_rows() != sequences.len() {
            return Err(Error::Internal(format!(
                "aligned block has {} rows instead of {}",
                block.n_rows(),
                sequences.len()
            )));
        }
        if let Some(unaligned) = unaligned_block_between(sequences, previous, Some(block))? {
            blocks.push(Block::Unaligned(unaligned));
        }
        blocks.push(Block::Aligned(block.clone()));
        previous = Some(block);
    }
    if let Some(unaligned) = unaligned_block_between(sequences, previous, None)? {
        blocks.push(Block::Unaligned(unaligned));
    }

    check_block_list(sequences, &blocks)?;
    Ok(blocks)
}

fn unaligned_block_between(
    sequences: &[Rc<Sequence>],
    left: Option<&UngappedAlignedBlock>,
    right: Option<&UngappedAlignedBlock>,
) -> Result<Option<UnalignedBlock>> {
    let ranges = sequences
        .iter()
        .enumerate()
        .map(|(row, sequence)| {
            let from = left.map(|block| block.range_of_row(row).to + 1).unwrap_or(0);
            let to = right
                .map(|block| block.range_of_row(row).from - 1)
                .unwrap_or(sequence.len() as isize - 1);
            if to < from - 1 {
                Err(Error::Internal(format!(
                    "negative gap from {from} to {to} in row {row}"
                )))
            } else {
                Ok(Range::new(from, to))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let block = UnalignedBlock::new(ranges);
    Ok((block.width() > 0).then_some(block))
}

/// Checks that the blocks cover every sequence without gaps or overlaps.
fn check_block_list(sequences: &[Rc<Sequence>], blocks: &[Block]) -> Result<()> {
    for (index, block) in blocks.iter().enumerate() {
        if block.width() == 0 {
            return Err(Error::Internal(format!("block {index} has zero width")));
        }

        match block {
            Block::Aligned(aligned) => check_aligned_ranges(
                sequences,
                aligned,
                index.checked_sub(1).and_then(|index| blocks.get(index)),
                blocks.get(index + 1),
            )?,
            Block::Unaligned(unaligned) => {
                if let Some(range) = unaligned
                    .ranges()
                    .iter()
                    .find(|range| range.len() > unaligned.width())
                {
                    return Err(Error::Internal(format!(
                        "range {range} exceeds unaligned block {index} of width {}",
                        unaligned.width()
                    )));
                }
            }
        }
    }

    if let Some(index) = blocks
        .iter()
        .tuple_windows()
        .position(|(left, right)| !left.is_aligned() && !right.is_aligned())
    {
        return Err(Error::Internal(format!(
            "unaligned blocks {index} and {} are adjacent",
            index + 1
        )));
    }

    for (row, sequence) in sequences.iter().enumerate() {
        let mut expected_from = 0;
        for (index, block) in blocks.iter().enumerate() {
            let range = block.range_of_row(row);
            if range.from != expected_from {
                return Err(Error::Internal(format!(
                    "block {index} starts at {} instead of {expected_from} in row {row}",
                    range.from
                )));
            }
            expected_from = range.to + 1;
        }
        if expected_from != sequence.len() as isize {
            return Err(Error::Internal(format!(
                "blocks end at {expected_from} instead of {} in row {row}",
                sequence.len()
            )));
        }
    }

    Ok(())
}

fn check_aligned_ranges(
    sequences: &[Rc<Sequence>],
    block: &UngappedAlignedBlock,
    previous: Option<&Block>,
    next: Option<&Block>,
) -> Result<()> {
    if block.width() == 0 {
        return Err(Error::Internal("aligned block has zero width".to_string()));
    }

    for (row, (range, sequence)) in block.ranges().iter().zip(sequences).enumerate() {
        if range.len() != block.width() {
            return Err(Error::Internal(format!(
                "range {range} in row {row} does not match block width {}",
                block.width()
            )));
        }
        if range.from < 0 || range.to >= sequence.len() as isize {
            return Err(Error::Internal(format!(
                "range {range} in row {row} is outside of sequence {sequence} of length {}",
                sequence.len()
            )));
        }
        if previous.is_some_and(|previous| previous.range_of_row(row).to >= range.from) {
            return Err(Error::Internal(format!(
                "range {range} in row {row} overlaps the previous block"
            )));
        }
        if next.is_some_and(|next| next.range_of_row(row).from <= range.to) {
            return Err(Error::Internal(format!(
                "range {range} in row {row} overlaps the next block"
            )));
        }
    }

    Ok(())
}

fn internal_failure(operation: &str, error: Error) -> ! {
    error!("Alignment is inconsistent after {operation}: {error}");
    panic!("Alignment is inconsistent after {operation}: {error}");
}
