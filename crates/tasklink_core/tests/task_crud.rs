use chrono::{TimeZone, Utc};
use tasklink_core::db::open_db_in_memory;
use tasklink_core::{RepoError, SqliteTaskRepository, Task, TaskListQuery, TaskRepository};

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let mut task = Task::new("buy milk");
    task.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let id = repo.create_task(&task).unwrap();

    let loaded = repo.get_task(id).unwrap().unwrap();
    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.text, "buy milk");
    assert!(!loaded.completed);
    assert_eq!(loaded.created_at, task.created_at);
}

#[test]
fn ids_are_assigned_in_increasing_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let first = repo.create_task(&Task::new("one")).unwrap();
    let second = repo.create_task(&Task::new("two")).unwrap();
    assert!(first > 0);
    assert!(second > first);
}

#[test]
fn create_rejects_blank_text() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let err = repo.create_task(&Task::new("  ")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn update_rewrites_text_and_flag_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let id = repo.create_task(&Task::new("draft")).unwrap();

    let mut task = repo.get_task(id).unwrap().unwrap();
    let created_at = task.created_at;
    task.text = "final".to_string();
    task.completed = true;
    task.created_at = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
    repo.update_task(&task).unwrap();

    let loaded = repo.get_task(id).unwrap().unwrap();
    assert_eq!(loaded.text, "final");
    assert!(loaded.completed);
    assert_eq!(loaded.created_at, created_at);
}

#[test]
fn update_requires_persisted_existing_task() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let err = repo.update_task(&Task::new("never stored")).unwrap_err();
    assert!(matches!(err, RepoError::NotPersisted));

    let ghost = Task::from_parts(404, "ghost", false, Utc::now());
    let err = repo.update_task(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(404)));
}

#[test]
fn delete_removes_row_and_reports_missing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let id = repo.create_task(&Task::new("temporary")).unwrap();

    repo.delete_task(id).unwrap();
    assert_eq!(repo.get_task(id).unwrap(), None);

    let err = repo.delete_task(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
}

#[test]
fn list_filters_and_paginates_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let mut ids = Vec::new();
    for (text, completed) in [("a", false), ("b", true), ("c", false), ("d", true)] {
        let mut task = Task::new(text);
        task.completed = completed;
        ids.push(repo.create_task(&task).unwrap());
    }

    let all = repo.list_tasks(&TaskListQuery::default()).unwrap();
    assert_eq!(
        all.iter().filter_map(|task| task.id).collect::<Vec<_>>(),
        ids
    );

    let open = repo
        .list_tasks(&TaskListQuery {
            completed: Some(false),
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(
        open.iter().map(|task| task.text.as_str()).collect::<Vec<_>>(),
        ["a", "c"]
    );

    let page = repo
        .list_tasks(&TaskListQuery {
            limit: Some(2),
            offset: 1,
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(
        page.iter().map(|task| task.text.as_str()).collect::<Vec<_>>(),
        ["b", "c"]
    );

    let tail = repo
        .list_tasks(&TaskListQuery {
            offset: 3,
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].text, "d");
}
