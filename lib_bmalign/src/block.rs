use std::{fmt::Display, str::FromStr};

use crate::error::{Error, Result};

#[cfg(test)]
mod tests;

/// An inclusive range of sequence indices.
///
/// An empty range is represented as `to == from - 1`, which is why the bounds are signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub from: isize,
    pub to: isize,
}

/// Where the residues of a row are placed inside an unaligned block that is wider than the row's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnalignedJustification {
    Left,
    Right,
    #[default]
    Center,
    /// The first half of the residues is left-justified, the second half right-justified.
    Split,
}

/// A block of alignment columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Aligned(UngappedAlignedBlock),
    Unaligned(UnalignedBlock),
}

/// A block where every row has exactly one residue per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UngappedAlignedBlock {
    width: usize,
    ranges: Vec<Range>,
}

/// A block of padding columns, where each row has between zero and `width` residues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnalignedBlock {
    width: usize,
    ranges: Vec<Range>,
}

impl Range {
    pub fn new(from: isize, to: isize) -> Self {
        debug_assert!(to >= from - 1);
        Self { from, to }
    }

    /// Creates the range of `length` residues starting at `from`.
    pub fn with_length(from: usize, length: usize) -> Self {
        let from = from as isize;
        Self::new(from, from + length as isize - 1)
    }

    pub fn len(&self) -> usize {
        (self.to - self.from + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.to < self.from
    }

    /// The first index of the range as a sequence index.
    pub fn from_index(&self) -> usize {
        debug_assert!(self.from >= 0);
        self.from as usize
    }

    pub fn contains(&self, index: usize) -> bool {
        let index = index as isize;
        self.from <= index && index <= self.to
    }

    pub fn shifted(&self, offset: isize) -> Self {
        Self::new(self.from + offset, self.to + offset)
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.from, self.to)
    }
}

impl Display for UnalignedJustification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Center => write!(f, "center"),
            Self::Split => write!(f, "split"),
        }
    }
}

impl FromStr for UnalignedJustification {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "left" => Self::Left,
            "right" => Self::Right,
            "center" => Self::Center,
            "split" => Self::Split,
            other => {
                return Err(Error::Parser {
                    input: other.to_string(),
                    kind: nom::error::ErrorKind::Tag,
                });
            }
        })
    }
}

impl Block {
    pub fn width(&self) -> usize {
        match self {
            Self::Aligned(block) => block.width,
            Self::Unaligned(block) => block.width,
        }
    }

    pub fn ranges(&self) -> &[Range] {
        match self {
            Self::Aligned(block) => &block.ranges,
            Self::Unaligned(block) => &block.ranges,
        }
    }

    pub fn range_of_row(&self, row: usize) -> &Range {
        &self.ranges()[row]
    }

    pub fn n_rows(&self) -> usize {
        self.ranges().len()
    }

    pub fn is_aligned(&self) -> bool {
        matches!(self, Self::Aligned(_))
    }

    pub fn as_aligned(&self) -> Option<&UngappedAlignedBlock> {
        match self {
            Self::Aligned(block) => Some(block),
            Self::Unaligned(_) => None,
        }
    }

    pub fn as_unaligned(&self) -> Option<&UnalignedBlock> {
        match self {
            Self::Aligned(_) => None,
            Self::Unaligned(block) => Some(block),
        }
    }

    /// Returns the sequence index shown by `row` at `block_column`, or `None` if the row has no residue there.
    ///
    /// The justification only matters for unaligned blocks.
    pub fn index_at(
        &self,
        block_column: usize,
        row: usize,
        justification: UnalignedJustification,
    ) -> Option<usize> {
        match self {
            Self::Aligned(block) => Some(block.index_at(block_column, row)),
            Self::Unaligned(block) => block.index_at(block_column, row, justification),
        }
    }
}

impl UngappedAlignedBlock {
    /// Creates an aligned block, failing if the ranges are empty or differ in length.
    pub fn new(ranges: Vec<Range>) -> Result<Self> {
        let width = ranges.first().map(Range::len).unwrap_or(0);
        if width == 0 {
            return Err(Error::Internal(
                "aligned block without residues".to_string(),
            ));
        }
        if let Some(range) = ranges.iter().find(|range| range.len() != width) {
            return Err(Error::Internal(format!(
                "aligned block range {range} does not have width {width}"
            )));
        }

        Ok(Self { width, ranges })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn range_of_row(&self, row: usize) -> &Range {
        &self.ranges[row]
    }

    pub fn n_rows(&self) -> usize {
        self.ranges.len()
    }

    pub fn index_at(&self, block_column: usize, row: usize) -> usize {
        debug_assert!(block_column < self.width);
        self.ranges[row].from_index() + block_column
    }

    /// Moves the range of one row by `offset` sequence positions.
    pub(crate) fn shift_row(&mut self, row: usize, offset: isize) {
        self.ranges[row] = self.ranges[row].shifted(offset);
    }

    /// Extends the left edge of every row by `amount` residues, or shrinks it for a negative amount.
    pub(crate) fn extend_left(&mut self, amount: isize) {
        for range in &mut self.ranges {
            range.from -= amount;
        }
        self.width = (self.width as isize + amount) as usize;
    }

    /// Extends the right edge of every row by `amount` residues, or shrinks it for a negative amount.
    pub(crate) fn extend_right(&mut self, amount: isize) {
        for range in &mut self.ranges {
            range.to += amount;
        }
        self.width = (self.width as isize + amount) as usize;
    }

    /// Splits the block such that the second part starts at `block_column`.
    pub(crate) fn split_at(&self, block_column: usize) -> (Self, Self) {
        debug_assert!(0 < block_column && block_column < self.width);
        let offset = block_column as isize;
        let left = Self {
            width: block_column,
            ranges: self
                .ranges
                .iter()
                .map(|range| Range::new(range.from, range.from + offset - 1))
                .collect(),
        };
        let right = Self {
            width: self.width - block_column,
            ranges: self
                .ranges
                .iter()
                .map(|range| Range::new(range.from + offset, range.to))
                .collect(),
        };
        (left, right)
    }

    /// Joins this block with a block that directly follows it on every row.
    pub(crate) fn join(&self, next: &Self) -> Self {
        debug_assert!(
            self.ranges
                .iter()
                .zip(&next.ranges)
                .all(|(range, next_range)| range.to + 1 == next_range.from)
        );
        Self {
            width: self.width + next.width,
            ranges: self
                .ranges
                .iter()
                .zip(&next.ranges)
                .map(|(range, next_range)| Range::new(range.from, next_range.to))
                .collect(),
        }
    }

    pub(crate) fn select_rows(&self, rows: impl IntoIterator<Item = usize>) -> Self {
        Self {
            width: self.width,
            ranges: rows.into_iter().map(|row| self.ranges[row]).collect(),
        }
    }

    pub(crate) fn push_row(&mut self, range: Range) {
        debug_assert_eq!(range.len(), self.width);
        self.ranges.push(range);
    }
}

impl UnalignedBlock {
    /// Creates an unaligned block whose width is the length of its longest range.
    pub fn new(ranges: Vec<Range>) -> Self {
        let width = ranges.iter().map(Range::len).max().unwrap_or(0);
        Self { width, ranges }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn range_of_row(&self, row: usize) -> &Range {
        &self.ranges[row]
    }

    pub fn index_at(
        &self,
        block_column: usize,
        row: usize,
        justification: UnalignedJustification,
    ) -> Option<usize> {
        debug_assert!(block_column < self.width);
        let range = &self.ranges[row];
        let length = range.len();
        let padding = self.width - length;

        let offset = match justification {
            UnalignedJustification::Left => (block_column < length).then_some(block_column),
            UnalignedJustification::Right => {
                (block_column >= padding).then(|| block_column - padding)
            }
            UnalignedJustification::Center => {
                let left_padding = padding / 2;
                (left_padding <= block_column && block_column < left_padding + length)
                    .then(|| block_column - left_padding)
            }
            UnalignedJustification::Split => {
                let middle = length.div_ceil(2);
                if block_column < middle {
                    Some(block_column)
                } else if block_column >= padding + middle {
                    Some(block_column - padding)
                } else {
                    None
                }
            }
        };

        offset.map(|offset| range.from_index() + offset)
    }
}
