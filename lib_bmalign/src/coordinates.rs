use strong_type::StrongType;

/// Identifies the segment of a pairwise record that a master residue was aligned by.
///
/// Two master residues with different identifiers were never part of the same original block.
#[derive(StrongType)]
#[strong_type(conversion)]
pub struct OriginalBlockId(usize);
