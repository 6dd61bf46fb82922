//! Builds multiple alignments from pairwise records and keeps both representations in sync.

use log::{debug, info};

use crate::{
    alignment_set::AlignmentSet,
    block_multiple_alignment::BlockMultipleAlignment,
    config::AlignmentConfiguration,
    error::{Error, Result},
    pssm::PssmEngine,
    record::PairwiseRecord,
    sequence::SequenceSet,
};

mod ibm;

pub use ibm::intersect_by_master;

#[derive(Debug, Clone)]
pub struct AlignmentUtility {
    configuration: AlignmentConfiguration,
    sequences: SequenceSet,
    records: Vec<PairwiseRecord>,
    alignment_set: AlignmentSet,
    multiple: Option<BlockMultipleAlignment>,
}

impl AlignmentUtility {
    /// Parses the records into pairwise alignments against a common master.
    pub fn new(
        sequences: SequenceSet,
        records: Vec<PairwiseRecord>,
        configuration: AlignmentConfiguration,
    ) -> Result<Self> {
        let alignment_set =
            AlignmentSet::new(&records, &sequences, configuration.master_selection)?;
        debug!(
            "Created alignment set of {} pairwise alignments",
            alignment_set.len()
        );

        Ok(Self {
            configuration,
            sequences,
            records,
            alignment_set,
            multiple: None,
        })
    }

    /// Merges the pairwise alignments into a multiple alignment with the intersect-by-master algorithm,
    /// and replaces the records with ones derived from the result.
    ///
    /// On failure, nothing is changed.
    pub fn do_ibm(&mut self) -> Result<()> {
        let multiple = intersect_by_master(&self.alignment_set)?;
        let (records, alignment_set) = AlignmentSet::create_from_multiple(
            &multiple,
            None,
            &self.sequences,
            self.configuration.master_selection,
        )?;
        info!(
            "Merged {} pairwise alignments into {} aligned blocks over {} columns",
            self.alignment_set.len(),
            multiple.n_aligned_blocks(),
            multiple.alignment_width()
        );

        self.records = records;
        self.alignment_set = alignment_set;
        self.multiple = Some(multiple);
        Ok(())
    }

    /// Returns the multiple alignment, building it on first access.
    ///
    /// Without a prior call to [`do_ibm`](Self::do_ibm), building only succeeds if
    /// every pairwise alignment has the same aligned blocks on the master.
    pub fn block_multiple_alignment(&mut self) -> Result<&BlockMultipleAlignment> {
        self.ensure_multiple()?;
        self.multiple
            .as_ref()
            .ok_or_else(|| Error::Internal("multiple alignment was not built".to_string()))
    }

    pub fn block_multiple_alignment_mut(&mut self) -> Result<&mut BlockMultipleAlignment> {
        self.ensure_multiple()?;
        self.multiple
            .as_mut()
            .ok_or_else(|| Error::Internal("multiple alignment was not built".to_string()))
    }

    fn ensure_multiple(&mut self) -> Result<()> {
        if self.multiple.is_none() {
            let multiple = intersect_by_master(&self.alignment_set)?;
            let aligned_residues: usize = multiple.aligned_blocks().map(|block| block.width()).sum();
            let aligned_blocks = multiple.n_aligned_blocks();

            if self.alignment_set.alignments().iter().any(|alignment| {
                alignment.n_aligned_residues() != aligned_residues
                    || alignment.n_original_blocks() != aligned_blocks
            }) {
                return Err(Error::NotAMultipleAlignment);
            }
            self.multiple = Some(multiple);
        }
        Ok(())
    }

    /// Regenerates the records and pairwise alignments from the edited multiple alignment.
    ///
    /// If `row_order` is given, it lists the slave rows in the order their records should have.
    pub fn synchronize_records(&mut self, row_order: Option<&[usize]>) -> Result<()> {
        let multiple = self
            .multiple
            .as_ref()
            .ok_or_else(|| Error::Internal("no multiple alignment to synchronize".to_string()))?;
        let (records, alignment_set) = AlignmentSet::create_from_multiple(
            multiple,
            row_order,
            &self.sequences,
            self.configuration.master_selection,
        )?;

        self.records = records;
        self.alignment_set = alignment_set;
        Ok(())
    }

    /// Sums the PSSM scores of the residues that `row` shows in aligned columns.
    pub fn score_row_by_pssm(&mut self, row: usize, engine: &impl PssmEngine) -> Result<i32> {
        let justification = self.configuration.justification;
        let multiple = self.block_multiple_alignment_mut()?;
        if row >= multiple.n_rows() {
            return Err(Error::RowOutOfRange {
                row,
                rows: multiple.n_rows(),
            });
        }

        let characters: Vec<_> = (0..multiple.alignment_width())
            .filter(|&column| multiple.aligned_block_number(column).is_some())
            .filter_map(|column| {
                multiple
                    .character_at(column, row, justification)
                    .map(|character| (column, character))
            })
            .collect();
        let pssm = multiple.pssm(engine)?;

        Ok(characters
            .into_iter()
            .filter_map(|(column, character)| pssm.score(column, character))
            .sum())
    }

    /// Renders every row of the multiple alignment with the configured justification.
    pub fn render(&mut self) -> Result<Vec<String>> {
        let justification = self.configuration.justification;
        let multiple = self.block_multiple_alignment()?;

        (0..multiple.n_rows())
            .map(|row| {
                multiple
                    .row_string(row, justification)
                    .ok_or_else(|| Error::Internal(format!("cannot render row {row}")))
            })
            .collect()
    }

    pub fn configuration(&self) -> &AlignmentConfiguration {
        &self.configuration
    }

    pub fn sequences(&self) -> &SequenceSet {
        &self.sequences
    }

    pub fn records(&self) -> &[PairwiseRecord] {
        &self.records
    }

    pub fn alignment_set(&self) -> &AlignmentSet {
        &self.alignment_set
    }
}
