use std::rc::Rc;

use log::trace;

use crate::{
    coordinates::OriginalBlockId,
    error::{Error, Result},
    record::PairwiseRecord,
    sequence::{Sequence, SequenceSet},
};

#[cfg(test)]
mod tests;

/// A pairwise alignment of a slave sequence against a master sequence.
///
/// The alignment is stored densely, with one entry per master residue.
#[derive(Debug, Clone)]
pub struct MasterSlaveAlignment {
    master: Rc<Sequence>,
    slave: Rc<Sequence>,
    master_to_slave: Vec<Option<usize>>,
    block_structure: Vec<Option<OriginalBlockId>>,
}

impl MasterSlaveAlignment {
    /// Builds the alignment described by `record`, which must reference `master`.
    ///
    /// The `record_index` is only used for error reporting.
    pub fn new(
        record_index: usize,
        record: &PairwiseRecord,
        sequences: &SequenceSet,
        master: &Rc<Sequence>,
    ) -> Result<Self> {
        let dimension = record.dimension();
        let [first, second] = record.endpoints().ok_or(Error::WrongDimension {
            record: record_index,
            dimension,
        })?;

        let master_position = if master.matches(first) {
            0
        } else if master.matches(second) {
            1
        } else {
            return Err(Error::MasterNotInRecord {
                record: record_index,
            });
        };
        let slave_position = 1 - master_position;
        let slave = sequences.resolve([first, second][slave_position])?;

        let segments = record
            .iter_segments()
            .ok_or(Error::UnsupportedSegmentEncoding {
                record: record_index,
            })?;
        if segments.is_empty() {
            return Err(Error::NoSegments {
                record: record_index,
            });
        }

        let mut master_to_slave = vec![None; master.len()];
        let mut block_structure = vec![None; master.len()];
        let mut block_ordinal = 0;

        for segment in segments {
            let consistent = segment.identifiers.len() == 2
                && segment.starts.len() == 2
                && master.matches(&segment.identifiers[master_position])
                && slave.matches(&segment.identifiers[slave_position]);
            if !consistent {
                return Err(Error::HeterogeneousSegment {
                    record: record_index,
                });
            }

            if segment.is_gap() {
                continue;
            }
            let (Some(master_start), Some(slave_start)) = (
                segment.starts[master_position],
                segment.starts[slave_position],
            ) else {
                continue;
            };

            for (sequence_start, sequence) in [(master_start, master), (slave_start, &slave)] {
                if segment.length == 0 {
                    continue;
                }
                let end = sequence_start.checked_add(segment.length);
                if end.is_none_or(|end| end > sequence.len()) {
                    return Err(Error::IndexOutOfBounds {
                        record: record_index,
                        index: sequence_start.saturating_add(segment.length - 1),
                        length: sequence.len(),
                    });
                }
            }

            let block_id = OriginalBlockId::from(block_ordinal);
            for offset in 0..segment.length {
                master_to_slave[master_start + offset] = Some(slave_start + offset);
                block_structure[master_start + offset] = Some(block_id);
            }
            trace!(
                "Record {record_index}: block {block_ordinal} aligns master {master_start} to slave {slave_start} for {} residues",
                segment.length
            );
            block_ordinal += 1;
        }

        Ok(Self {
            master: master.clone(),
            slave,
            master_to_slave,
            block_structure,
        })
    }

    pub fn master(&self) -> &Rc<Sequence> {
        &self.master
    }

    pub fn slave(&self) -> &Rc<Sequence> {
        &self.slave
    }

    pub fn master_to_slave(&self) -> &[Option<usize>] {
        &self.master_to_slave
    }

    pub fn block_structure(&self) -> &[Option<OriginalBlockId>] {
        &self.block_structure
    }

    /// The slave residue aligned to the master residue at `master_index`.
    pub fn slave_at(&self, master_index: usize) -> Option<usize> {
        self.master_to_slave.get(master_index).copied().flatten()
    }

    pub fn block_at(&self, master_index: usize) -> Option<OriginalBlockId> {
        self.block_structure.get(master_index).copied().flatten()
    }

    pub fn n_aligned_residues(&self) -> usize {
        self.master_to_slave.iter().flatten().count()
    }

    /// The number of maximal runs of master residues that belong to the same original block.
    pub fn n_original_blocks(&self) -> usize {
        let mut count = 0;
        let mut previous = None;
        for block in &self.block_structure {
            if block.is_some() && *block != previous {
                count += 1;
            }
            previous = *block;
        }
        count
    }
}
