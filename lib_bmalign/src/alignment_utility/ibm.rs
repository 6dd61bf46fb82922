use std::{iter, rc::Rc};

use log::trace;

use crate::{
    alignment_set::AlignmentSet,
    block::{Range, UngappedAlignedBlock},
    block_multiple_alignment::BlockMultipleAlignment,
    error::{Error, Result},
    master_slave::MasterSlaveAlignment,
};

/// Merges pairwise alignments that share a master into a multiple alignment.
///
/// The master is row `0`, followed by the slaves in the order of the alignment set.
/// An aligned block is a maximal run of master residues that is aligned in every pairwise alignment,
/// co-linear in every slave, and part of a single original block in every pairwise alignment.
pub fn intersect_by_master(alignment_set: &AlignmentSet) -> Result<BlockMultipleAlignment> {
    let master = alignment_set.master();
    let alignments = alignment_set.alignments();
    if let Some(alignment) = alignments
        .iter()
        .position(|alignment| !Rc::ptr_eq(alignment.master(), master))
    {
        return Err(Error::MasterMismatch { alignment });
    }

    let sequences = iter::once(master.clone())
        .chain(alignments.iter().map(|alignment| alignment.slave().clone()))
        .collect();
    let mut multiple = BlockMultipleAlignment::new(sequences);

    let mut master_from = 0;
    while master_from < master.len() {
        let Some(slave_starts) = slave_indices(alignments, master_from) else {
            master_from += 1;
            continue;
        };

        let mut master_to = master_from;
        while master_to + 1 < master.len()
            && continues_block(alignments, master_from, master_to + 1)
        {
            master_to += 1;
        }

        let length = master_to - master_from + 1;
        let ranges = iter::once(master_from)
            .chain(slave_starts)
            .map(|start| Range::with_length(start, length))
            .collect();
        trace!("Found aligned block at master {master_from}..={master_to}");
        multiple.add_aligned_block_at_end(UngappedAlignedBlock::new(ranges)?)?;

        master_from = master_to + 1;
    }

    multiple.add_unaligned_blocks()?;
    multiple.update_block_map(true)?;
    Ok(multiple)
}

/// The slave residues aligned to `master_index`, if it is aligned in every pairwise alignment.
fn slave_indices(alignments: &[MasterSlaveAlignment], master_index: usize) -> Option<Vec<usize>> {
    alignments
        .iter()
        .map(|alignment| alignment.slave_at(master_index))
        .collect()
}

fn continues_block(alignments: &[MasterSlaveAlignment], master_from: usize, master_index: usize) -> bool {
    let offset = master_index - master_from;
    alignments.iter().all(|alignment| {
        match (alignment.slave_at(master_from), alignment.slave_at(master_index)) {
            (Some(slave_from), Some(slave_index)) => {
                slave_index == slave_from + offset
                    && alignment.block_at(master_index) == alignment.block_at(master_from)
            }
            _ => false,
        }
    })
}
