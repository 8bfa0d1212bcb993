use super::*;
use crate::effect::Event;
use crate::events::EventPattern;
use crate::stage::Stage;

fn stage_event(id: &str) -> Event {
    Event::StageChanged {
        id: id.to_string(),
        from: Stage::Lead,
        to: Stage::ChecklistSent,
    }
}

#[test]
fn matching_subscriber_receives_events() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe(Subscription::new(
        "board",
        vec![EventPattern::new("client:*")],
        "board refresh",
    ));

    bus.publish(&stage_event("c-1"));

    let received = rx.try_recv().unwrap();
    assert_eq!(received.name(), "client:stage");
}

#[test]
fn non_matching_subscriber_receives_nothing() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe(Subscription::new(
        "tasks-only",
        vec![EventPattern::new("task:**")],
        "task panel",
    ));

    bus.publish(&stage_event("c-1"));

    assert!(rx.try_recv().is_err());
}

#[test]
fn unsubscribe_stops_delivery() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe(Subscription::new(
        "board",
        vec![EventPattern::new("**")],
        "everything",
    ));
    assert_eq!(bus.subscriber_count(), 1);

    bus.unsubscribe(&SubscriberId("board".to_string()));
    assert_eq!(bus.subscriber_count(), 0);

    bus.publish(&stage_event("c-1"));
    assert!(rx.try_recv().is_err());
}

#[test]
fn dropped_receivers_are_pruned_on_publish() {
    let bus = EventBus::new();
    let rx = bus.subscribe(Subscription::new(
        "gone",
        vec![EventPattern::new("**")],
        "dropped without unsubscribe",
    ));
    drop(rx);
    assert_eq!(bus.subscriber_count(), 1);

    bus.publish(&stage_event("c-1"));
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn clones_share_the_subscriber_table() {
    let bus = EventBus::new();
    let bus2 = bus.clone();

    let mut rx = bus.subscribe(Subscription::new(
        "board",
        vec![EventPattern::new("client:*")],
        "board refresh",
    ));

    bus2.publish(&stage_event("c-1"));
    assert!(rx.try_recv().is_ok());
}
