use super::*;
use desk_core::client::{Client, ClientDraft, ClientId};
use desk_core::clock::{Clock, FakeClock};
use desk_core::stage::Stage;

fn client_create(id: &str, clock: &impl Clock) -> Operation {
    let (client, _) = Client::create(
        id,
        ClientDraft {
            name: format!("Client {id}"),
            ..ClientDraft::default()
        },
        clock,
    )
    .unwrap();
    Operation::ClientCreate { client }
}

fn transition(id: &str, clock: &impl Clock) -> Operation {
    Operation::StageTransition {
        client_id: ClientId::from(id),
        from_stage: Stage::Lead,
        to_stage: Stage::ChecklistSent,
        changed_at: clock.now(),
    }
}

#[test]
fn append_and_replay_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");
    let clock = FakeClock::new();

    let mut wal = Wal::open(&path).unwrap();
    assert_eq!(wal.append(&client_create("c-1", &clock)).unwrap(), 1);
    assert_eq!(wal.append(&transition("c-1", &clock)).unwrap(), 2);
    assert_eq!(wal.sequence(), 2);

    let ops = Wal::replay(&path).unwrap();
    assert_eq!(ops.len(), 2);
    assert!(matches!(ops[0], Operation::ClientCreate { .. }));
    assert!(matches!(ops[1], Operation::StageTransition { .. }));
}

#[test]
fn missing_file_replays_empty() {
    let dir = tempfile::tempdir().unwrap();
    let ops = Wal::replay(&dir.path().join("nope.jsonl")).unwrap();
    assert!(ops.is_empty());
}

#[test]
fn reopen_continues_the_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");
    let clock = FakeClock::new();

    {
        let mut wal = Wal::open(&path).unwrap();
        wal.append(&client_create("c-1", &clock)).unwrap();
        wal.append(&transition("c-1", &clock)).unwrap();
    }

    let mut wal = Wal::open(&path).unwrap();
    assert_eq!(wal.sequence(), 2);
    assert_eq!(wal.append(&transition("c-1", &clock)).unwrap(), 3);
}

#[test]
fn torn_write_truncates_the_tail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");
    let clock = FakeClock::new();

    {
        let mut wal = Wal::open(&path).unwrap();
        wal.append(&client_create("c-1", &clock)).unwrap();
        wal.append(&transition("c-1", &clock)).unwrap();
    }

    // Simulate a torn final write
    let mut raw = std::fs::read_to_string(&path).unwrap();
    raw.push_str("{\"seq\":3,\"at\":\"2025-");
    std::fs::write(&path, &raw).unwrap();

    // Replay stops at the corruption
    assert_eq!(Wal::replay(&path).unwrap().len(), 2);

    // Reopen truncates and appends cleanly after the valid prefix
    let mut wal = Wal::open(&path).unwrap();
    assert_eq!(wal.sequence(), 2);
    wal.append(&transition("c-1", &clock)).unwrap();
    assert_eq!(Wal::replay(&path).unwrap().len(), 3);
}

#[test]
fn checksum_mismatch_stops_replay() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");
    let clock = FakeClock::new();

    {
        let mut wal = Wal::open(&path).unwrap();
        wal.append(&client_create("c-1", &clock)).unwrap();
        wal.append(&transition("c-1", &clock)).unwrap();
    }

    // Flip the payload of the second entry without fixing its checksum
    let raw = std::fs::read_to_string(&path).unwrap();
    let tampered = raw.replace("Checklist Sent", "Docs Received");
    assert_ne!(raw, tampered);
    std::fs::write(&path, &tampered).unwrap();

    let ops = Wal::replay(&path).unwrap();
    assert_eq!(ops.len(), 1);
}
