use super::*;
use crate::clock::FakeClock;
use yare::parameterized;

fn make_task(clock: &impl Clock) -> Task {
    let (task, _) = Task::create(
        "task-1",
        TaskDraft {
            title: "Chase payslips".to_string(),
            ..TaskDraft::default()
        },
        clock,
    )
    .unwrap();
    task
}

#[test]
fn create_starts_open() {
    let clock = FakeClock::new();
    let (task, effects) = Task::create(
        "task-1",
        TaskDraft {
            title: "  Chase payslips ".to_string(),
            ..TaskDraft::default()
        },
        &clock,
    )
    .unwrap();

    assert_eq!(task.status, TaskStatus::Open);
    assert_eq!(task.title, "Chase payslips");
    assert!(task.completed_at.is_none());
    assert!(matches!(
        &effects[0],
        Effect::Emit(Event::TaskCreated { .. })
    ));
}

#[test]
fn create_requires_a_title() {
    let clock = FakeClock::new();
    let result = Task::create("task-1", TaskDraft::default(), &clock);
    assert_eq!(result.unwrap_err(), InvalidTask::MissingTitle);
}

#[test]
fn complete_and_reopen() {
    let clock = FakeClock::new();
    let task = make_task(&clock);

    let (done, effects) = task.transition(TaskEvent::Complete, &clock);
    assert_eq!(done.status, TaskStatus::Completed);
    assert_eq!(done.completed_at, Some(clock.now()));
    assert!(matches!(
        &effects[0],
        Effect::Emit(Event::TaskCompleted { .. })
    ));

    let (reopened, effects) = done.transition(TaskEvent::Reopen, &clock);
    assert_eq!(reopened.status, TaskStatus::Open);
    assert!(reopened.completed_at.is_none());
    assert!(matches!(
        &effects[0],
        Effect::Emit(Event::TaskReopened { .. })
    ));
}

#[test]
fn redundant_transitions_change_nothing() {
    let clock = FakeClock::new();
    let task = make_task(&clock);

    let (same, effects) = task.transition(TaskEvent::Reopen, &clock);
    assert_eq!(same, task);
    assert!(effects.is_empty());

    let (done, _) = task.transition(TaskEvent::Complete, &clock);
    let (same, effects) = done.transition(TaskEvent::Complete, &clock);
    assert_eq!(same, done);
    assert!(effects.is_empty());
}

#[test]
fn overdue_needs_an_earlier_due_date() {
    let clock = FakeClock::new();
    let today = clock.today();
    let mut task = make_task(&clock);

    assert!(!task.is_overdue(today)); // no due date

    task.due_date = Some(today - chrono::Duration::days(1));
    assert!(task.is_overdue(today));

    task.due_date = Some(today);
    assert!(!task.is_overdue(today)); // due today is not overdue

    let (done, _) = task.transition(TaskEvent::Complete, &clock);
    assert!(!done.is_overdue(today)); // completed is never overdue
}

#[parameterized(
        open = { TaskFilter::Open, true, false, false },
        overdue = { TaskFilter::Overdue, false, true, false },
        today = { TaskFilter::Today, false, false, true },
    )]
fn filters_partition_open_tasks(
    filter: TaskFilter,
    wants_future: bool,
    wants_past: bool,
    wants_today: bool,
) {
    let clock = FakeClock::new();
    let today = clock.today();

    let mut past = make_task(&clock);
    past.due_date = Some(today - chrono::Duration::days(2));

    let mut due_today = make_task(&clock);
    due_today.due_date = Some(today);

    let mut future = make_task(&clock);
    future.due_date = Some(today + chrono::Duration::days(2));

    // Open matches all three; narrower filters pick one each
    if filter == TaskFilter::Open {
        assert!(filter.matches(&past, today));
        assert!(filter.matches(&due_today, today));
        assert!(filter.matches(&future, today));
    } else {
        assert_eq!(filter.matches(&future, today), wants_future);
        assert_eq!(filter.matches(&past, today), wants_past);
        assert_eq!(filter.matches(&due_today, today), wants_today);
    }
}

#[test]
fn upcoming_and_completed_filters() {
    let clock = FakeClock::new();
    let today = clock.today();

    let mut task = make_task(&clock);
    task.due_date = Some(today + chrono::Duration::days(3));
    assert!(TaskFilter::Upcoming.matches(&task, today));
    assert!(!TaskFilter::Completed.matches(&task, today));

    let (done, _) = task.transition(TaskEvent::Complete, &clock);
    assert!(!TaskFilter::Upcoming.matches(&done, today));
    assert!(TaskFilter::Completed.matches(&done, today));
    assert!(TaskFilter::All.matches(&done, today));
}

#[test]
fn filter_parses_from_str() {
    assert_eq!("overdue".parse::<TaskFilter>(), Ok(TaskFilter::Overdue));
    assert_eq!("ALL".parse::<TaskFilter>(), Ok(TaskFilter::All));
    assert!("someday".parse::<TaskFilter>().is_err());
}

#[test]
fn apply_draft_keeps_status() {
    let clock = FakeClock::new();
    let task = make_task(&clock);
    let (done, _) = task.transition(TaskEvent::Complete, &clock);

    let edited = done
        .apply_draft(TaskDraft {
            title: "Chase payslips again".to_string(),
            notes: Some("second request".to_string()),
            ..TaskDraft::default()
        })
        .unwrap();

    assert_eq!(edited.status, TaskStatus::Completed);
    assert_eq!(edited.title, "Chase payslips again");
    assert_eq!(edited.completed_at, done.completed_at);
}
