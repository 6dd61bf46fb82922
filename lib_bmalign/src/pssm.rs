//! Position-specific scoring matrices over the columns of a multiple alignment.

use crate::{
    block::UnalignedJustification,
    block_multiple_alignment::BlockMultipleAlignment,
    error::{Error, Result},
};

#[cfg(test)]
mod tests;

const ALPHABET_SIZE: usize = 26;

/// Computes a PSSM for a multiple alignment.
pub trait PssmEngine {
    fn compute(&self, alignment: &BlockMultipleAlignment) -> Result<Pssm>;
}

/// One row of scores per alignment column, indexed by the upper case residue letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pssm {
    columns: Vec<[i32; ALPHABET_SIZE]>,
}

impl Pssm {
    /// Creates a PSSM where every score is zero.
    pub fn new(width: usize) -> Self {
        Self {
            columns: vec![[0; ALPHABET_SIZE]; width],
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns the score of `residue` in `column`, or `None` if the column does not exist
    /// or the residue is not a letter.
    pub fn score(&self, column: usize, residue: char) -> Option<i32> {
        let letter = letter_index(residue)?;
        self.columns.get(column).map(|scores| scores[letter])
    }

    pub fn set_score(&mut self, column: usize, residue: char, score: i32) -> Result<()> {
        let letter = letter_index(residue)
            .ok_or_else(|| Error::Internal(format!("residue '{residue}' is not a letter")))?;
        let width = self.width();
        let scores = self.columns.get_mut(column).ok_or_else(|| {
            Error::Internal(format!("column {column} is outside of PSSM of width {width}"))
        })?;
        scores[letter] = score;
        Ok(())
    }
}

fn letter_index(residue: char) -> Option<usize> {
    let residue = residue.to_ascii_uppercase();
    residue
        .is_ascii_uppercase()
        .then(|| (residue as u8 - b'A') as usize)
}

/// Scores each residue in an aligned column by how many rows show it there.
///
/// Unaligned columns score zero for every residue.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResidueCountEngine;

impl PssmEngine for ResidueCountEngine {
    fn compute(&self, alignment: &BlockMultipleAlignment) -> Result<Pssm> {
        let mut pssm = Pssm::new(alignment.alignment_width());

        for column in 0..alignment.alignment_width() {
            if alignment.aligned_block_number(column).is_none() {
                continue;
            }
            for row in 0..alignment.n_rows() {
                let Some(residue) =
                    alignment.character_at(column, row, UnalignedJustification::default())
                else {
                    continue;
                };
                if let Some(score) = pssm.score(column, residue) {
                    pssm.set_score(column, residue, score + 1)?;
                }
            }
        }

        Ok(pssm)
    }
}
