use super::*;
use proptest::prelude::*;

#[test]
fn catalog_is_ordered_for_the_board() {
    let catalog = Stage::catalog();
    assert_eq!(catalog.len(), 10);
    assert_eq!(catalog[0], Stage::Lead);
    assert_eq!(catalog[catalog.len() - 1], Stage::Completed);

    // Enum ordering follows catalog ordering
    for pair in catalog.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn every_label_round_trips() {
    for stage in Stage::catalog() {
        assert_eq!(Stage::from_label(stage.label()), Some(*stage));
        assert_eq!(Stage::normalize(stage.label()), *stage);
    }
}

#[test]
fn legacy_decision_label_normalizes_to_more_info() {
    assert_eq!(
        Stage::normalize("Decision (Approved/Declined/More Info)"),
        Stage::MoreInfo
    );
}

#[test]
fn case_and_whitespace_variants_are_accepted() {
    assert_eq!(
        Stage::normalize("  Ready to send to banker "),
        Stage::ReadyToSendToBanker
    );
    assert_eq!(Stage::normalize("sent to banker"), Stage::SentToBanker);
}

#[test]
fn unrecognized_and_empty_fall_back_to_lead() {
    assert_eq!(Stage::normalize(""), Stage::Lead);
    assert_eq!(Stage::normalize("Numbers done"), Stage::Lead);
    assert_eq!(Stage::normalize("???"), Stage::Lead);
}

#[test]
fn closed_stages() {
    assert!(Stage::Completed.is_closed());
    assert!(Stage::Declined.is_closed());
    assert!(!Stage::SentToBanker.is_closed());
    assert!(!Stage::Approved.is_closed());
}

#[test]
fn serde_uses_labels() {
    let json = serde_json::to_string(&Stage::ReadyToSendToBanker).unwrap();
    assert_eq!(json, "\"Ready to Send to Banker\"");

    let back: Stage = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Stage::ReadyToSendToBanker);
}

proptest! {
    /// Normalizing twice equals normalizing once, for arbitrary input
    #[test]
    fn normalize_is_idempotent(raw in ".{0,64}") {
        let once = Stage::normalize(&raw);
        let twice = Stage::normalize(once.label());
        prop_assert_eq!(once, twice);
    }
}
