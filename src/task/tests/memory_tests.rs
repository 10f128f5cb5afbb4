//! Tests for the in-memory task repository.

use crate::directory::domain::ExternalUserId;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{
        Assignee, NewTask, Task, TaskDomainError, TaskOrigin, TaskStatus, TaskTitle,
        TransitionPolicy,
    },
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use crate::test_support::ManualClock;
use chrono::Duration;
use mockable::Clock;
use rstest::{fixture, rstest};

#[fixture]
fn repo() -> InMemoryTaskRepository {
    InMemoryTaskRepository::new()
}

fn task(title: &str, clock: &ManualClock) -> Task {
    let draft = NewTask {
        title: TaskTitle::new(title).expect("valid title"),
        description: None,
        assignee: None,
        due_date: None,
        origin: TaskOrigin::ManualCommand,
    };
    Task::new(draft, clock)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_rejects_duplicate_identifiers(repo: InMemoryTaskRepository) {
    let clock = ManualClock::midweek();
    let created = task("Duplicate probe", &clock);
    repo.store(&created).await.expect("first store succeeds");

    let result = repo.store(&created).await;

    assert!(matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == created.id()));
    assert_eq!(repo.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn modify_of_unknown_task_is_not_found(repo: InMemoryTaskRepository) {
    let clock = ManualClock::midweek();
    let unknown = task("Never stored", &clock);

    let result = repo.modify(unknown.id(), Box::new(|_: &mut Task| Ok(()))).await;

    assert!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == unknown.id()));
    assert!(repo.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_modification_keeps_the_stored_task(repo: InMemoryTaskRepository) {
    let clock = ManualClock::midweek();
    let created = task("Keep me", &clock);
    repo.store(&created).await.expect("store succeeds");

    let result = repo
        .modify(
            created.id(),
            Box::new(|task: &mut Task| {
                task.assign(
                    Assignee {
                        user_id: None,
                        external_id: ExternalUserId::new(9),
                        display_name: "Zoe".to_owned(),
                    },
                    &ManualClock::midweek(),
                );
                Err(TaskDomainError::EmptyTitle)
            }),
        )
        .await;

    assert!(matches!(result, Err(TaskRepositoryError::Rejected(TaskDomainError::EmptyTitle))));
    let stored = repo.find_by_id(created.id()).await.expect("lookup");
    assert_eq!(stored, Some(created));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn modify_applies_to_the_latest_stored_task(repo: InMemoryTaskRepository) {
    let clock = ManualClock::midweek();
    let created = task("Twice", &clock);
    repo.store(&created).await.expect("store succeeds");

    for target in [TaskStatus::Doing, TaskStatus::Done] {
        repo.modify(
            created.id(),
            Box::new(move |task: &mut Task| {
                let clock = ManualClock::midweek();
                task.transition_to(target, TransitionPolicy::Strict, &clock).map(drop)
            }),
        )
        .await
        .expect("strict edge permitted");
    }
    let changed = repo
        .find_by_id(created.id())
        .await
        .expect("lookup")
        .expect("task stored");

    assert_eq!(changed.status(), TaskStatus::Done);
    assert_eq!(changed.title(), "Twice");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_is_newest_first_and_filters_combine(repo: InMemoryTaskRepository) {
    let clock = ManualClock::midweek();
    let oldest = task("Oldest", &clock);
    clock.advance(Duration::hours(1));
    let mut middle = task("Middle", &clock);
    middle.assign(
        Assignee {
            user_id: None,
            external_id: ExternalUserId::new(5),
            display_name: "@owner".to_owned(),
        },
        &clock,
    );
    middle
        .transition_to(TaskStatus::Doing, TransitionPolicy::Strict, &clock)
        .expect("TODO -> DOING permitted");
    clock.advance(Duration::hours(1));
    let newest = task("Newest", &clock);
    for created in [&oldest, &middle, &newest] {
        repo.store(created).await.expect("store succeeds");
    }

    let all = repo.list(&TaskFilter::all()).await.expect("list succeeds");
    let titles: Vec<&str> = all.iter().map(Task::title).collect();
    assert_eq!(titles, ["Newest", "Middle", "Oldest"]);

    let mine_doing = repo
        .list(
            &TaskFilter::all()
                .with_status(TaskStatus::Doing)
                .with_assignee(ExternalUserId::new(5)),
        )
        .await
        .expect("list succeeds");
    assert_eq!(mine_doing, vec![middle.clone()]);

    let recent = repo
        .list(&TaskFilter::all().created_since(middle.created_at()))
        .await
        .expect("list succeeds");
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().all(|found| found.created_at() >= clock.utc() - Duration::hours(1)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_reports_whether_a_task_was_removed(repo: InMemoryTaskRepository) {
    let clock = ManualClock::midweek();
    let created = task("Delete me", &clock);
    repo.store(&created).await.expect("store succeeds");

    assert!(repo.delete(created.id()).await.expect("delete succeeds"));
    assert!(!repo.delete(created.id()).await.expect("delete succeeds"));
    assert_eq!(repo.find_by_id(created.id()).await.expect("lookup"), None);
}
