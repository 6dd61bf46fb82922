use std::rc::Rc;

use log::{debug, warn};

use crate::{
    block_multiple_alignment::BlockMultipleAlignment,
    config::MasterSelection,
    error::{Error, Result},
    master_slave::MasterSlaveAlignment,
    record::PairwiseRecord,
    sequence::{Sequence, SequenceSet},
};

#[cfg(test)]
mod tests;

/// A set of pairwise alignments that all share the same master sequence.
#[derive(Debug, Clone)]
pub struct AlignmentSet {
    master: Rc<Sequence>,
    alignments: Vec<MasterSlaveAlignment>,
}

impl AlignmentSet {
    /// Builds one pairwise alignment per record.
    ///
    /// The master is the sequence that every record references.
    /// A single record always has its first sequence as master.
    /// Otherwise, if two distinct candidates remain or none does,
    /// the `master_selection` decides between failing and falling back to the first candidate.
    pub fn new(
        records: &[PairwiseRecord],
        sequences: &SequenceSet,
        master_selection: MasterSelection,
    ) -> Result<Self> {
        let first_record = records.first().ok_or(Error::NoRecords)?;
        for (index, record) in records.iter().enumerate() {
            validate_record(index, record)?;
        }

        let [first, second] = first_record.endpoints().ok_or(Error::WrongDimension {
            record: 0,
            dimension: first_record.dimension(),
        })?;
        let candidate_1 = sequences.resolve(first)?;
        let candidate_2 = sequences.resolve(second)?;

        let master = if records.len() == 1 {
            candidate_1
        } else {
            let mut candidate_1_present_in_all = true;
            let mut candidate_2_present_in_all = true;
            for record in &records[1..] {
                candidate_1_present_in_all &= references_sequence(record, &candidate_1);
                candidate_2_present_in_all &= references_sequence(record, &candidate_2);
            }

            match (candidate_1_present_in_all, candidate_2_present_in_all) {
                (true, false) => candidate_1,
                (false, true) => candidate_2,
                (true, true) if Rc::ptr_eq(&candidate_1, &candidate_2) => candidate_1,
                (candidate_1_present, _) => {
                    match master_selection {
                        MasterSelection::Strict if candidate_1_present => {
                            return Err(Error::AmbiguousMaster {
                                first: first.clone(),
                                second: second.clone(),
                            });
                        }
                        MasterSelection::Strict => return Err(Error::NoCommonMaster),
                        MasterSelection::Permissive => {}
                    }
                    warn!("Cannot determine the master sequence unambiguously, using {candidate_1}");
                    candidate_1
                }
            }
        };
        debug!("Master sequence is {master}");

        let alignments = records
            .iter()
            .enumerate()
            .map(|(index, record)| MasterSlaveAlignment::new(index, record, sequences, &master))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { master, alignments })
    }

    /// Converts the aligned blocks of a multiple alignment into one record per slave row,
    /// and parses them back into a fresh alignment set.
    ///
    /// If `row_order` is given, it must list every slave row exactly once,
    /// and the records are emitted in that order.
    pub fn create_from_multiple(
        multiple: &BlockMultipleAlignment,
        row_order: Option<&[usize]>,
        sequences: &SequenceSet,
        master_selection: MasterSelection,
    ) -> Result<(Vec<PairwiseRecord>, Self)> {
        let rows: Vec<_> = match row_order {
            Some(row_order) => {
                let mut sorted = row_order.to_vec();
                sorted.sort_unstable();
                if !sorted.iter().copied().eq(1..multiple.n_rows()) {
                    return Err(Error::InvalidRowOrder(row_order.to_vec()));
                }
                row_order.to_vec()
            }
            None => (1..multiple.n_rows()).collect(),
        };

        let records: Vec<_> = rows
            .into_iter()
            .map(|row| export_row(multiple, row))
            .collect();
        let alignment_set = Self::new(&records, sequences, master_selection)?;

        if !Rc::ptr_eq(alignment_set.master(), multiple.master()) {
            return Err(Error::Internal(format!(
                "re-parsed records have master {} instead of {}",
                alignment_set.master(),
                multiple.master()
            )));
        }

        Ok((records, alignment_set))
    }

    pub fn master(&self) -> &Rc<Sequence> {
        &self.master
    }

    pub fn alignments(&self) -> &[MasterSlaveAlignment] {
        &self.alignments
    }

    pub fn len(&self) -> usize {
        self.alignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alignments.is_empty()
    }
}

/// Creates a record of the master and one slave row, with one segment per aligned block.
pub fn export_row(multiple: &BlockMultipleAlignment, row: usize) -> PairwiseRecord {
    PairwiseRecord::from_aligned_ranges(
        multiple.master(),
        multiple.sequence_of_row(row),
        multiple
            .aligned_blocks()
            .map(|block| (*block.range_of_row(0), *block.range_of_row(row))),
    )
}

fn references_sequence(record: &PairwiseRecord, sequence: &Sequence) -> bool {
    record
        .endpoints()
        .is_some_and(|endpoints| endpoints.into_iter().any(|endpoint| sequence.matches(endpoint)))
}

fn validate_record(index: usize, record: &PairwiseRecord) -> Result<()> {
    if !record.kind().is_supported() {
        return Err(Error::UnsupportedRecordType {
            record: index,
            kind: record.kind().to_string(),
        });
    }
    if record.dimension() != 2 {
        return Err(Error::WrongDimension {
            record: index,
            dimension: record.dimension(),
        });
    }
    if record.iter_segments().is_none() {
        return Err(Error::UnsupportedSegmentEncoding { record: index });
    }
    Ok(())
}
