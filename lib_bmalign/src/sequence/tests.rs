use super::{Sequence, SequenceIdentifier, SequenceSet};

#[test]
fn parse_and_display_identifiers() {
    for text in ["gi|123", "acc|NP_000001.2", "acc|XP_5", "lcl|master", "pdb|1ABC|A"] {
        let identifier: SequenceIdentifier = text.parse().unwrap();
        assert_eq!(identifier.to_string(), text);
    }

    assert!("gi|abc".parse::<SequenceIdentifier>().is_err());
    assert!("pdb|1ABC|AB".parse::<SequenceIdentifier>().is_err());
    assert!("master".parse::<SequenceIdentifier>().is_err());
    assert!("lcl|a lcl|b".parse::<SequenceIdentifier>().is_err());
}

#[test]
fn accession_version_matching() {
    let versioned: SequenceIdentifier = "acc|NP_1.2".parse().unwrap();
    let other_version: SequenceIdentifier = "acc|NP_1.3".parse().unwrap();
    let unversioned: SequenceIdentifier = "acc|NP_1".parse().unwrap();

    assert!(versioned.matches(&unversioned));
    assert!(unversioned.matches(&versioned));
    assert!(!versioned.matches(&other_version));
    assert!(!versioned.matches(&SequenceIdentifier::Local("NP_1".to_string())));
}

#[test]
fn sequence_set_lookup() {
    let mut sequences = SequenceSet::new();
    let master = sequences.push(Sequence::new(
        SequenceIdentifier::Gi(7),
        [SequenceIdentifier::Local("master".to_string())],
        "acdef",
        true,
    ));
    sequences.push(Sequence::new_local_protein("slave", "ACD"));

    let found = sequences
        .find(&SequenceIdentifier::Local("master".to_string()))
        .unwrap();
    assert!(std::rc::Rc::ptr_eq(found, &master));
    assert!(sequences.find(&SequenceIdentifier::Gi(8)).is_none());
    assert!(sequences.resolve(&SequenceIdentifier::Gi(8)).is_err());

    assert_eq!(master.len(), 5);
    assert_eq!(master.residue_at(1), Some('C'));
    assert_eq!(master.residue_at(5), None);
    assert_eq!(master.to_string(), "gi|7");
    assert_eq!(master.identifiers().count(), 2);
}

#[test]
fn sequence_without_aliases() {
    let sequence = Sequence::new(SequenceIdentifier::Gi(3), [], "ACD", true);
    assert_eq!(sequence.primary_identifier(), &SequenceIdentifier::Gi(3));
    assert_eq!(sequence.identifiers().collect::<Vec<_>>(), [&SequenceIdentifier::Gi(3)]);
    assert!(sequence.matches(&SequenceIdentifier::Gi(3)));
    assert_eq!(sequence.to_string(), "gi|3");
}
