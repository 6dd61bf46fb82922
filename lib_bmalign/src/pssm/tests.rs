use super::Pssm;

#[test]
fn scores_are_case_insensitive() {
    let mut pssm = Pssm::new(2);
    pssm.set_score(1, 'w', 11).unwrap();

    assert_eq!(pssm.score(1, 'W'), Some(11));
    assert_eq!(pssm.score(1, 'w'), Some(11));
    assert_eq!(pssm.score(0, 'W'), Some(0));
}

#[test]
fn rejects_non_letters_and_missing_columns() {
    let mut pssm = Pssm::new(1);

    assert_eq!(pssm.score(0, '-'), None);
    assert_eq!(pssm.score(1, 'A'), None);
    assert!(pssm.set_score(0, '*', 1).is_err());
    assert!(pssm.set_score(3, 'A', 1).is_err());
}
