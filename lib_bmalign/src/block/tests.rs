use super::{Block, Range, UnalignedBlock, UnalignedJustification, UngappedAlignedBlock};

fn unaligned_indices(
    block: &UnalignedBlock,
    row: usize,
    justification: UnalignedJustification,
) -> Vec<Option<usize>> {
    (0..block.width())
        .map(|column| block.index_at(column, row, justification))
        .collect()
}

#[test]
fn empty_range() {
    let range = Range::new(5, 4);
    assert!(range.is_empty());
    assert_eq!(range.len(), 0);
    assert!(!range.contains(4));
    assert!(!range.contains(5));

    let range = Range::with_length(3, 2);
    assert_eq!(range, Range::new(3, 4));
    assert!(range.contains(4));
    assert_eq!(range.shifted(-3), Range::new(0, 1));
}

#[test]
fn aligned_block_requires_equal_widths() {
    assert!(UngappedAlignedBlock::new(vec![Range::new(0, 3), Range::new(2, 4)]).is_err());
    assert!(UngappedAlignedBlock::new(vec![Range::new(0, -1), Range::new(2, 1)]).is_err());
    assert!(UngappedAlignedBlock::new(Vec::new()).is_err());

    let block = UngappedAlignedBlock::new(vec![Range::new(0, 3), Range::new(2, 5)]).unwrap();
    assert_eq!(block.width(), 4);
    assert_eq!(block.index_at(2, 1), 4);
}

#[test]
fn split_and_join_aligned_block() {
    let block = UngappedAlignedBlock::new(vec![Range::new(0, 5), Range::new(10, 15)]).unwrap();
    let (left, right) = block.split_at(2);
    assert_eq!(left.ranges(), &[Range::new(0, 1), Range::new(10, 11)]);
    assert_eq!(right.ranges(), &[Range::new(2, 5), Range::new(12, 15)]);
    assert_eq!(left.width() + right.width(), block.width());
    assert_eq!(left.join(&right), block);
}

#[test]
fn extend_aligned_block() {
    let mut block = UngappedAlignedBlock::new(vec![Range::new(3, 5), Range::new(4, 6)]).unwrap();
    block.extend_left(2);
    assert_eq!(block.ranges(), &[Range::new(1, 5), Range::new(2, 6)]);
    block.extend_right(-3);
    assert_eq!(block.ranges(), &[Range::new(1, 2), Range::new(2, 3)]);
    assert_eq!(block.width(), 2);
}

#[test]
fn unaligned_width_is_longest_range() {
    let block = UnalignedBlock::new(vec![Range::new(0, 1), Range::new(4, 3), Range::new(2, 6)]);
    assert_eq!(block.width(), 5);
}

#[test]
fn unaligned_justifications() {
    let block = UnalignedBlock::new(vec![Range::new(10, 14), Range::new(0, 2)]);
    assert_eq!(block.width(), 5);

    assert_eq!(
        unaligned_indices(&block, 1, UnalignedJustification::Left),
        vec![Some(0), Some(1), Some(2), None, None]
    );
    assert_eq!(
        unaligned_indices(&block, 1, UnalignedJustification::Right),
        vec![None, None, Some(0), Some(1), Some(2)]
    );
    assert_eq!(
        unaligned_indices(&block, 1, UnalignedJustification::Center),
        vec![None, Some(0), Some(1), Some(2), None]
    );
    assert_eq!(
        unaligned_indices(&block, 1, UnalignedJustification::Split),
        vec![Some(0), Some(1), None, None, Some(2)]
    );

    for justification in [
        UnalignedJustification::Left,
        UnalignedJustification::Right,
        UnalignedJustification::Center,
        UnalignedJustification::Split,
    ] {
        assert_eq!(
            unaligned_indices(&block, 0, justification),
            (10..15).map(Some).collect::<Vec<_>>()
        );
    }
}

#[test]
fn empty_row_in_unaligned_block() {
    let block = Block::Unaligned(UnalignedBlock::new(vec![Range::new(0, 1), Range::new(3, 2)]));
    assert!(!block.is_aligned());
    assert!(
        (0..block.width())
            .all(|column| block.index_at(column, 1, UnalignedJustification::Split).is_none())
    );
}

#[test]
fn parse_justification() {
    assert_eq!("split".parse::<UnalignedJustification>().unwrap(), UnalignedJustification::Split);
    assert_eq!(UnalignedJustification::Right.to_string(), "right");
    assert!("middle".parse::<UnalignedJustification>().is_err());
}
