use super::*;
use crate::client::{Client, ClientDraft};
use crate::clock::{Clock, FakeClock};
use crate::history::StageHistoryEntry;
use crate::stage::Stage;
use chrono::Duration;
use yare::parameterized;

#[parameterized(
        same_instant = { 0, 0 },
        under_a_day = { 23, 0 },
        exactly_three_days = { 72, 3 },
        partial_day_floors = { 79, 3 },
        a_week = { 168, 7 },
    )]
fn days_floor(hours_ago: i64, expected_days: i64) {
    let clock = FakeClock::new();
    let now = clock.now();
    let entered = now - Duration::hours(hours_ago);

    assert_eq!(days_in_stage(entered, now), expected_days);
}

#[test]
fn future_entry_clamps_to_zero() {
    let clock = FakeClock::new();
    let now = clock.now();

    assert_eq!(days_in_stage(now + Duration::days(2), now), 0);
}

#[parameterized(
        zero_is_neutral = { 0, DwellTier::Neutral },
        two_is_neutral = { 2, DwellTier::Neutral },
        three_is_warning = { 3, DwellTier::Warning },
        six_is_warning = { 6, DwellTier::Warning },
        seven_is_urgent = { 7, DwellTier::Urgent },
        thirty_is_urgent = { 30, DwellTier::Urgent },
    )]
fn tier_thresholds(days: i64, expected: DwellTier) {
    assert_eq!(DwellTier::for_days(days), expected);
}

#[test]
fn three_days_in_stage_is_a_warning() {
    let clock = FakeClock::new();
    let (client, _) = Client::create(
        "c-1",
        ClientDraft {
            name: "Dana".to_string(),
            ..ClientDraft::default()
        },
        &clock,
    )
    .unwrap();

    let entered = clock.now();
    let history = vec![StageHistoryEntry {
        client_id: client.id.clone(),
        from_stage: Some(Stage::Lead),
        to_stage: Stage::ChecklistSent,
        changed_at: entered,
    }];

    clock.advance(Duration::days(3));
    let info = stage_dwell(&history, &client, clock.now());

    assert_eq!(info.entered_at, entered);
    assert_eq!(info.days, 3);
    assert_eq!(info.tier, DwellTier::Warning);
}

#[test]
fn no_history_uses_record_timestamps() {
    let clock = FakeClock::new();
    let (client, _) = Client::create(
        "c-1",
        ClientDraft {
            name: "Dana".to_string(),
            ..ClientDraft::default()
        },
        &clock,
    )
    .unwrap();

    clock.advance(Duration::days(10));
    let info = stage_dwell(&[], &client, clock.now());

    assert_eq!(info.entered_at, client.updated_at);
    assert_eq!(info.days, 10);
    assert_eq!(info.tier, DwellTier::Urgent);
}
