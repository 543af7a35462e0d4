use notela_core::db::open_db_in_memory;
use notela_core::model::task::DEFAULT_TASK_TITLE;
use notela_core::service::task_service::{TaskCounts, TaskFilter};
use notela_core::{
    SqliteTaskRepository, TaskInput, TaskPatch, TaskPriority, TaskService, TaskServiceError,
};
use rusqlite::params;

#[test]
fn create_applies_defaults() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = TaskService::new(SqliteTaskRepository::try_new(&mut conn).unwrap());

    let task = service.create_task(TaskInput::default()).unwrap();
    assert_eq!(task.title, DEFAULT_TASK_TITLE);
    assert_eq!(task.description, "");
    assert!(!task.completed);
    assert_eq!(task.priority, TaskPriority::Medium);
    assert!(task.due_date.is_none());
}

#[test]
fn create_stores_priority_due_date_and_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = TaskService::new(SqliteTaskRepository::try_new(&mut conn).unwrap());

    let task = service
        .create_task(TaskInput {
            title: Some("File taxes".to_string()),
            description: Some("before april".to_string()),
            priority: Some(TaskPriority::Urgent),
            due_date: Some(1_700_000_000_000),
            tags: Some(vec!["Money".to_string()]),
        })
        .unwrap();

    let stored = service.get_task(task.id).unwrap().unwrap();
    assert_eq!(stored.priority, TaskPriority::Urgent);
    assert_eq!(stored.due_date, Some(1_700_000_000_000));
    assert_eq!(stored.tags.len(), 1);
    assert_eq!(stored.tags[0].name, "money");
}

#[test]
fn toggle_flips_completion_only() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = TaskService::new(SqliteTaskRepository::try_new(&mut conn).unwrap());
    let task = service
        .create_task(TaskInput {
            title: Some("walk".to_string()),
            priority: Some(TaskPriority::High),
            ..TaskInput::default()
        })
        .unwrap();

    let done = service.toggle_task(task.id).unwrap();
    assert!(done.completed);
    assert_eq!(done.title, "walk");
    assert_eq!(done.priority, TaskPriority::High);

    let reopened = service.toggle_task(task.id).unwrap();
    assert!(!reopened.completed);
}

#[test]
fn patch_updates_selected_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = TaskService::new(SqliteTaskRepository::try_new(&mut conn).unwrap());
    let task = service
        .create_task(TaskInput {
            title: Some("draft".to_string()),
            due_date: Some(5),
            tags: Some(vec!["a".to_string()]),
            ..TaskInput::default()
        })
        .unwrap();

    let patched = service
        .update_task(
            task.id,
            TaskPatch {
                completed: Some(true),
                priority: Some(TaskPriority::Low),
                due_date: Some(None),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    assert_eq!(patched.title, "draft");
    assert!(patched.completed);
    assert_eq!(patched.priority, TaskPriority::Low);
    assert!(patched.due_date.is_none());
    assert_eq!(patched.tags.len(), 1);
}

#[test]
fn missing_task_reports_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = TaskService::new(SqliteTaskRepository::try_new(&mut conn).unwrap());
    let missing = uuid::Uuid::new_v4();

    assert!(matches!(
        service.toggle_task(missing),
        Err(TaskServiceError::TaskNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.delete_task(missing),
        Err(TaskServiceError::TaskNotFound(_))
    ));
}

#[test]
fn list_is_newest_first_and_filterable() {
    let mut conn = open_db_in_memory().unwrap();
    let (old, mid, new) = {
        let mut service = TaskService::new(SqliteTaskRepository::try_new(&mut conn).unwrap());
        let old = service
            .create_task(TaskInput {
                priority: Some(TaskPriority::High),
                tags: Some(vec!["home".to_string()]),
                ..TaskInput::default()
            })
            .unwrap();
        let mid = service.create_task(TaskInput::default()).unwrap();
        let new = service
            .create_task(TaskInput {
                priority: Some(TaskPriority::High),
                ..TaskInput::default()
            })
            .unwrap();
        service.toggle_task(mid.id).unwrap();
        (old.id, mid.id, new.id)
    };

    for (id, created_at) in [(old, 1000), (mid, 2000), (new, 3000)] {
        conn.execute(
            "UPDATE tasks SET created_at = ?1 WHERE id = ?2;",
            params![created_at, id.to_string()],
        )
        .unwrap();
    }

    let service = TaskService::new(SqliteTaskRepository::try_new(&mut conn).unwrap());
    let all: Vec<_> = service
        .list_tasks(&TaskFilter::default())
        .unwrap()
        .into_iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(all, vec![new, mid, old]);

    let high: Vec<_> = service
        .list_tasks(&TaskFilter {
            priority: Some(TaskPriority::High),
            ..TaskFilter::default()
        })
        .unwrap()
        .into_iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(high, vec![new, old]);

    let done = service
        .list_tasks(&TaskFilter {
            completed: Some(true),
            ..TaskFilter::default()
        })
        .unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].id, mid);

    let home = service
        .list_tasks(&TaskFilter {
            tag: Some(" HOME ".to_string()),
            ..TaskFilter::default()
        })
        .unwrap();
    assert_eq!(home.len(), 1);
    assert_eq!(home[0].id, old);

    assert_eq!(
        service.count_tasks().unwrap(),
        TaskCounts {
            total: 3,
            completed: 1,
            pending: 2
        }
    );
}

#[test]
fn delete_removes_task() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = TaskService::new(SqliteTaskRepository::try_new(&mut conn).unwrap());
    let task = service.create_task(TaskInput::default()).unwrap();
    service.delete_task(task.id).unwrap();
    assert!(service.get_task(task.id).unwrap().is_none());
}
