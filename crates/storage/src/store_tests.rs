use super::*;
use desk_core::client::{Client, ClientDraft, ClientId};
use desk_core::clock::{Clock, FakeClock};
use desk_core::stage::Stage;
use chrono::Duration;

fn create_client(store: &mut Store, id: &str, clock: &impl Clock) -> Client {
    let (client, _) = Client::create(
        id,
        ClientDraft {
            name: format!("Client {id}"),
            ..ClientDraft::default()
        },
        clock,
    )
    .unwrap();
    store
        .commit(Operation::ClientCreate {
            client: client.clone(),
        })
        .unwrap();
    client
}

#[test]
fn committed_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");
    let clock = FakeClock::new();

    {
        let mut store = Store::open(&path).unwrap();
        let client = create_client(&mut store, "c-1", &clock);

        clock.advance(Duration::days(1));
        store
            .commit(Operation::StageTransition {
                client_id: client.id.clone(),
                from_stage: Stage::Lead,
                to_stage: Stage::ChecklistSent,
                changed_at: clock.now(),
            })
            .unwrap();
    }

    let store = Store::open(&path).unwrap();
    let stored = store.state().client(&ClientId::from("c-1")).unwrap();
    assert_eq!(stored.stage, Stage::ChecklistSent);
    assert_eq!(store.state().history_for(&stored.id).len(), 2);
    assert_eq!(store.sequence(), 2);
}

#[test]
fn replayed_state_matches_live_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");
    let clock = FakeClock::new();

    let live_stage;
    {
        let mut store = Store::open(&path).unwrap();
        let client = create_client(&mut store, "c-1", &clock);
        for to in [Stage::ChecklistSent, Stage::DocsReceived, Stage::StructuringPhase] {
            clock.advance(Duration::hours(12));
            let from = store.state().client(&client.id).unwrap().stage;
            store
                .commit(Operation::StageTransition {
                    client_id: client.id.clone(),
                    from_stage: from,
                    to_stage: to,
                    changed_at: clock.now(),
                })
                .unwrap();
        }
        live_stage = store.state().client(&client.id).unwrap().stage;
    }

    let reopened = Store::open(&path).unwrap();
    let replayed = reopened.state().client(&ClientId::from("c-1")).unwrap();
    assert_eq!(replayed.stage, live_stage);
    assert_eq!(reopened.state().history_for(&replayed.id).len(), 4);
}

/// The regression test for the two-step update gap: a failed write must
/// leave the pre-transition state visible, both live and after reopen.
/// There is no partial outcome because the stage change and the history
/// entry are one log record.
#[test]
fn failed_commit_leaves_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");
    let clock = FakeClock::new();

    let mut store = Store::open(&path).unwrap();
    let client = create_client(&mut store, "c-1", &clock);

    store.fail_next_commit();
    let result = store.commit(Operation::StageTransition {
        client_id: client.id.clone(),
        from_stage: Stage::Lead,
        to_stage: Stage::ChecklistSent,
        changed_at: clock.now(),
    });
    assert!(result.is_err());

    // Live view still shows the pre-transition state: no stage change
    // without its history entry, no history entry without the stage change
    assert_eq!(store.state().client(&client.id).unwrap().stage, Stage::Lead);
    assert_eq!(store.state().history_for(&client.id).len(), 1);

    // The failed commit consumed no sequence number and a fresh replay
    // agrees with the live view
    assert_eq!(store.sequence(), 1);
    drop(store);
    let reopened = Store::open(&path).unwrap();
    assert_eq!(
        reopened.state().client(&client.id).unwrap().stage,
        Stage::Lead
    );
    assert_eq!(reopened.state().history_for(&client.id).len(), 1);
}

#[test]
fn commit_after_failed_commit_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");
    let clock = FakeClock::new();

    let mut store = Store::open(&path).unwrap();
    let client = create_client(&mut store, "c-1", &clock);

    store.fail_next_commit();
    let op = Operation::StageTransition {
        client_id: client.id.clone(),
        from_stage: Stage::Lead,
        to_stage: Stage::ChecklistSent,
        changed_at: clock.now(),
    };
    assert!(store.commit(op.clone()).is_err());

    // The retry goes through and lands on a contiguous sequence
    assert_eq!(store.commit(op).unwrap(), 2);
    assert_eq!(
        store.state().client(&client.id).unwrap().stage,
        Stage::ChecklistSent
    );
}
