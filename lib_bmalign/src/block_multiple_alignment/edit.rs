//! Structural edits.
//!
//! Every edit returns `false` and leaves the alignment untouched if it is not applicable.

use std::rc::Rc;

use log::{debug, warn};

use super::{BlockMultipleAlignment, internal_failure};
use crate::block::{Block, Range, UnalignedJustification, UngappedAlignedBlock};

impl BlockMultipleAlignment {
    /// Moves the edge of the aligned block at `column_from` to `column_to`.
    ///
    /// `column_from` must be the first or last column of an aligned block.
    /// Growing is limited by the residues that every row has available in the neighbouring unaligned block.
    pub fn move_block_boundary(&mut self, column_from: usize, column_to: usize) -> bool {
        if column_to >= self.alignment_width() {
            return false;
        }
        let Some(info) = self.block_map.get(column_from).copied() else {
            return false;
        };
        let Some(aligned_index) = info.aligned_block_number else {
            return false;
        };

        let delta = column_to as isize - column_from as isize;
        if delta == 0 {
            return false;
        }

        let mut aligned_blocks = self.aligned_block_list();
        let block = &mut aligned_blocks[aligned_index];
        let width = block.width() as isize;

        if info.block_column == 0 && (delta < 0 || delta < width) {
            if delta > 0 {
                block.extend_left(-delta);
            } else {
                let grow = (-delta).min(self.available_before(info.block) as isize);
                if grow == 0 {
                    return false;
                }
                block.extend_left(grow);
            }
        } else if info.block_column as isize == width - 1 && (delta > 0 || -delta < width) {
            if delta < 0 {
                block.extend_right(delta);
            } else {
                let grow = delta.min(self.available_after(info.block) as isize);
                if grow == 0 {
                    return false;
                }
                block.extend_right(grow);
            }
        } else {
            return false;
        }

        self.commit("moving a block boundary", None, aligned_blocks, true);
        true
    }

    /// Splits the aligned block at `column`, such that the second part starts at `column`.
    pub fn split_block(&mut self, column: usize) -> bool {
        let Some(info) = self.block_map.get(column).copied() else {
            return false;
        };
        let Some(aligned_index) = info.aligned_block_number else {
            return false;
        };
        if info.block_column == 0 {
            return false;
        }

        let mut aligned_blocks = self.aligned_block_list();
        let (left, right) = aligned_blocks[aligned_index].split_at(info.block_column);
        aligned_blocks[aligned_index] = left;
        aligned_blocks.insert(aligned_index + 1, right);

        self.commit("splitting a block", None, aligned_blocks, true);
        true
    }

    /// Merges all aligned blocks between `from_column` and `to_column` into one.
    ///
    /// Every column in between must be aligned, and at least two blocks must be involved.
    pub fn merge_blocks(&mut self, from_column: usize, to_column: usize) -> bool {
        if from_column > to_column || to_column >= self.alignment_width() {
            return false;
        }

        let columns = &self.block_map[from_column..=to_column];
        if columns
            .iter()
            .any(|info| info.aligned_block_number.is_none())
        {
            return false;
        }
        let (Some(first), Some(last)) = (
            columns[0].aligned_block_number,
            columns[columns.len() - 1].aligned_block_number,
        ) else {
            return false;
        };
        if first == last {
            return false;
        }

        let mut aligned_blocks = self.aligned_block_list();
        let merged = aligned_blocks[first + 1..=last]
            .iter()
            .fold(aligned_blocks[first].clone(), |merged, next| merged.join(next));
        aligned_blocks.splice(first..=last, [merged]);

        self.commit("merging blocks", None, aligned_blocks, true);
        true
    }

    /// Turns the columns from `from_column` to `to_column` of an unaligned block into an aligned block.
    ///
    /// Every row must show a residue at both ends, and the residues in between must be contiguous.
    pub fn create_block(
        &mut self,
        from_column: usize,
        to_column: usize,
        justification: UnalignedJustification,
    ) -> bool {
        if from_column > to_column || to_column >= self.alignment_width() {
            return false;
        }
        let from_info = self.block_map[from_column];
        if self.block_map[to_column].block != from_info.block
            || from_info.aligned_block_number.is_some()
        {
            return false;
        }

        let last_offset = to_column - from_column;
        let mut ranges = Vec::with_capacity(self.n_rows());
        for row in 0..self.n_rows() {
            let from = self
                .sequence_and_index_at(from_column, row, justification)
                .and_then(|residue| residue.index);
            let to = self
                .sequence_and_index_at(to_column, row, justification)
                .and_then(|residue| residue.index);
            match (from, to) {
                (Some(from), Some(to)) if to >= from && to - from == last_offset => {
                    ranges.push(Range::new(from as isize, to as isize))
                }
                _ => return false,
            }
        }
        let Ok(block) = UngappedAlignedBlock::new(ranges) else {
            return false;
        };

        let insert_at = self.blocks[..from_info.block]
            .iter()
            .filter(|block| block.is_aligned())
            .count();
        let mut aligned_blocks = self.aligned_block_list();
        aligned_blocks.insert(insert_at, block);

        self.commit("creating a block", None, aligned_blocks, true);
        true
    }

    /// Turns the aligned block at `column` into unaligned residues.
    pub fn delete_block(&mut self, column: usize) -> bool {
        let Some(aligned_index) = self.aligned_block_number(column) else {
            return false;
        };

        let mut aligned_blocks = self.aligned_block_list();
        aligned_blocks.remove(aligned_index);

        self.commit("deleting a block", None, aligned_blocks, true);
        true
    }

    /// Turns every aligned block into unaligned residues.
    pub fn delete_all_blocks(&mut self) -> bool {
        if self.n_aligned_blocks() == 0 {
            return false;
        }

        self.commit("deleting all blocks", None, Vec::new(), true);
        true
    }

    /// Shifts the residues of one row within an aligned block by dragging from `from_column` to `to_column`.
    ///
    /// One of the columns must lie in an aligned block, and the other in the same block
    /// or in an unaligned block next to it.
    /// The shift is limited by the residues the row has in the unaligned block it shifts into.
    pub fn shift_row(
        &mut self,
        row: usize,
        from_column: usize,
        to_column: usize,
        justification: UnalignedJustification,
    ) -> bool {
        if row >= self.n_rows()
            || from_column == to_column
            || from_column >= self.alignment_width()
            || to_column >= self.alignment_width()
        {
            return false;
        }

        let from_block = self.block_map[from_column].block;
        let to_block = self.block_map[to_column].block;
        let from_is_aligned = self.blocks[from_block].is_aligned();
        let (aligned_block, other_block) = if from_is_aligned {
            (from_block, to_block)
        } else {
            (to_block, from_block)
        };
        if !self.blocks[aligned_block].is_aligned()
            || (other_block != aligned_block && self.blocks[other_block].is_aligned())
            || !(other_block == aligned_block
                || other_block + 1 == aligned_block
                || other_block == aligned_block + 1)
        {
            return false;
        }

        let requested_shift = if from_is_aligned {
            to_column as isize - from_column as isize
        } else {
            let residue_index = |column| {
                self.sequence_and_index_at(column, row, justification)
                    .and_then(|residue| residue.index)
            };
            match (residue_index(from_column), residue_index(to_column)) {
                (Some(from), Some(to)) => to as isize - from as isize,
                _ => return false,
            }
        };

        let available = |block: Option<&Block>| {
            block
                .and_then(Block::as_unaligned)
                .map(|block| block.range_of_row(row).len())
                .unwrap_or(0) as isize
        };
        let shift = if requested_shift > 0 {
            requested_shift.min(available(
                aligned_block
                    .checked_sub(1)
                    .and_then(|index| self.blocks.get(index)),
            ))
        } else {
            -(-requested_shift).min(available(self.blocks.get(aligned_block + 1)))
        };
        if shift == 0 {
            return false;
        }

        let Some(aligned_index) = self.block_map[self.block_starts[aligned_block]].aligned_block_number
        else {
            return false;
        };
        let mut aligned_blocks = self.aligned_block_list();
        aligned_blocks[aligned_index].shift_row(row, -shift);

        self.commit("shifting a row", None, aligned_blocks, true);
        true
    }

    /// Removes a slave row.
    pub fn delete_row(&mut self, row: usize) -> bool {
        self.remove_rows(&[row], false).is_some()
    }

    /// Removes the given slave rows.
    pub fn extract_rows(&mut self, rows: &[usize]) -> bool {
        self.remove_rows(rows, false).is_some()
    }

    /// Removes the given slave rows and returns one pairwise alignment of the master and each removed row,
    /// in the order of `rows`.
    ///
    /// The pairwise alignments reproduce the current blocks, including all edits made since construction.
    pub fn extract_rows_as_pairwise(&mut self, rows: &[usize]) -> Option<Vec<Self>> {
        self.remove_rows(rows, true)
    }

    fn remove_rows(&mut self, rows: &[usize], create_pairwise: bool) -> Option<Vec<Self>> {
        if rows.is_empty() {
            return None;
        }
        let mut removed = vec![false; self.n_rows()];
        for &row in rows {
            if row == 0 || row >= self.n_rows() || removed[row] {
                warn!("Cannot remove row {row} from alignment with {} rows", self.n_rows());
                return None;
            }
            removed[row] = true;
        }

        let aligned_blocks = self.aligned_block_list();
        let pairwise = if create_pairwise {
            rows.iter()
                .map(|&row| {
                    Self::from_aligned_blocks(
                        vec![self.master().clone(), self.sequences[row].clone()],
                        aligned_blocks.iter().map(|block| block.select_rows([0, row])),
                    )
                    .unwrap_or_else(|error| internal_failure("extracting a pairwise alignment", error))
                })
                .collect()
        } else {
            Vec::new()
        };

        let kept: Vec<_> = (0..self.n_rows()).filter(|&row| !removed[row]).collect();
        let sequences = kept.iter().map(|&row| self.sequences[row].clone()).collect();
        let aligned_blocks = aligned_blocks
            .iter()
            .map(|block| block.select_rows(kept.iter().copied()))
            .collect();
        self.row_doubles = kept.iter().map(|&row| self.row_doubles[row]).collect();
        self.row_strings = kept
            .iter()
            .map(|&row| self.row_strings[row].clone())
            .collect();

        self.commit("removing rows", Some(sequences), aligned_blocks, false);
        debug!("Removed rows {rows:?}");
        Some(pairwise)
    }

    /// Appends the slave rows of `other`, which must have the same master.
    ///
    /// Every aligned block of this alignment must lie within an aligned block of `other` in master coordinates.
    /// The blocks of this alignment stay unchanged, and the new rows are cut from the enclosing blocks of `other`.
    pub fn merge_alignment(&mut self, other: &Self) -> bool {
        if !Rc::ptr_eq(self.master(), other.master()) {
            warn!(
                "Cannot merge alignment with master {} into alignment with master {}",
                other.master(),
                self.master()
            );
            return false;
        }

        let other_blocks: Vec<_> = other.aligned_blocks().collect();
        let mut aligned_blocks = self.aligned_block_list();
        for block in &mut aligned_blocks {
            let master_range = *block.range_of_row(0);
            let Some(enclosing) = other_blocks.iter().find(|other_block| {
                let other_range = other_block.range_of_row(0);
                other_range.from <= master_range.from && master_range.to <= other_range.to
            }) else {
                warn!("No block of the merged alignment contains master range {master_range}");
                return false;
            };

            let offset = master_range.from - enclosing.range_of_row(0).from;
            for row in 1..other.n_rows() {
                let range = enclosing.range_of_row(row);
                block.push_row(Range::new(
                    range.from + offset,
                    range.from + offset + block.width() as isize - 1,
                ));
            }
        }

        let sequences = self
            .sequences
            .iter()
            .chain(&other.sequences[1..])
            .cloned()
            .collect();
        self.row_doubles.extend(&other.row_doubles[1..]);
        self.row_strings
            .extend(other.row_strings[1..].iter().cloned());

        self.commit("merging alignments", Some(sequences), aligned_blocks, false);
        true
    }

    /// Reorders the rows such that row `i` becomes the former row `new_order[i]`.
    ///
    /// The master must stay in row `0`.
    pub fn reorder_rows(&mut self, new_order: &[usize]) -> bool {
        if new_order.len() != self.n_rows() || new_order.first() != Some(&0) {
            return false;
        }
        let mut seen = vec![false; self.n_rows()];
        for &row in new_order {
            if row >= self.n_rows() || seen[row] {
                return false;
            }
            seen[row] = true;
        }

        let sequences = new_order
            .iter()
            .map(|&row| self.sequences[row].clone())
            .collect();
        let aligned_blocks = self
            .aligned_blocks()
            .map(|block| block.select_rows(new_order.iter().copied()))
            .collect();
        self.row_doubles = new_order.iter().map(|&row| self.row_doubles[row]).collect();
        self.row_strings = new_order
            .iter()
            .map(|&row| self.row_strings[row].clone())
            .collect();

        self.commit("reordering rows", Some(sequences), aligned_blocks, false);
        true
    }

    fn aligned_block_list(&self) -> Vec<UngappedAlignedBlock> {
        self.aligned_blocks().cloned().collect()
    }

    /// The number of residues every row has in the unaligned block before the block at `block_index`.
    fn available_before(&self, block_index: usize) -> usize {
        self.unaligned_block_before(block_index)
            .map(|block| block.ranges().iter().map(Range::len).min().unwrap_or(0))
            .unwrap_or(0)
    }

    fn available_after(&self, block_index: usize) -> usize {
        self.unaligned_block_after(block_index)
            .map(|block| block.ranges().iter().map(Range::len).min().unwrap_or(0))
            .unwrap_or(0)
    }
}
