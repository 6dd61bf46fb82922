use crate::block::UnalignedJustification;

use super::{AlignmentConfiguration, MasterSelection};

#[test]
fn read_plain_configuration() {
    let input = "# Merge\nmaster_selection = permissive\n\n# Display\njustification = split\n";
    let configuration = AlignmentConfiguration::read_plain(input.as_bytes()).unwrap();
    assert_eq!(
        configuration,
        AlignmentConfiguration {
            master_selection: MasterSelection::Permissive,
            justification: UnalignedJustification::Split,
        }
    );
}

#[test]
fn write_then_read_default_configuration() {
    let mut output = Vec::new();
    AlignmentConfiguration::default()
        .write_plain(&mut output)
        .unwrap();
    let configuration = AlignmentConfiguration::read_plain(output.as_slice()).unwrap();
    assert_eq!(configuration, AlignmentConfiguration::default());
}

#[test]
fn reject_unknown_values() {
    let input = "# Merge\nmaster_selection = sometimes\n# Display\njustification = left\n";
    assert!(AlignmentConfiguration::read_plain(input.as_bytes()).is_err());

    let input = "# Merge\njustification = left\n# Display\njustification = left\n";
    assert!(AlignmentConfiguration::read_plain(input.as_bytes()).is_err());
}
