use std::time::Duration;

use tokio::sync::watch;
use todolist_lib::{
    bootstrap, AppConfig, BoardSnapshot, NewCategory, NewTask, PreferencesUpdate, Priority,
    TaskBoard, ValidationError, DEFAULT_CATEGORIES,
};

mod common;

use common::setup;

/// Collect `is_loading` values as they are published, until the flag drops
/// back to false after having been set.
async fn record_loading(updates: &mut watch::Receiver<BoardSnapshot>) -> Vec<bool> {
    let mut seen = Vec::new();
    while updates.changed().await.is_ok() {
        let is_loading = updates.borrow_and_update().is_loading;
        seen.push(is_loading);
        if !is_loading && seen.contains(&true) {
            break;
        }
    }
    seen
}

#[tokio::test]
async fn mutations_republish_the_snapshot() {
    let ctx = setup().expect("Failed to setup test context");
    let board = TaskBoard::new(ctx.store.clone());
    let mut updates = board.subscribe();

    let id = board
        .insert_task(NewTask::new("Buy milk").category("Shopping").priority(Priority::Low))
        .await
        .unwrap()
        .unwrap();

    assert!(updates.has_changed().unwrap());
    let snapshot = updates.borrow_and_update().clone();
    assert_eq!(snapshot.all_tasks.len(), 1);
    assert_eq!(snapshot.active_tasks.len(), 1);
    assert!(snapshot.completed_tasks.is_empty());
    assert_eq!(snapshot.category_names, vec!["Shopping"]);
    assert!(!snapshot.is_loading);

    let task = snapshot.all_tasks[0].clone();
    board.toggle_completion(&task).await;
    let snapshot = board.snapshot();
    assert!(snapshot.active_tasks.is_empty());
    assert_eq!(snapshot.completed_tasks[0].id, id);

    board.toggle_completion(&snapshot.completed_tasks[0]).await;
    assert_eq!(board.snapshot().active_tasks.len(), 1);

    board.delete_task(id).await;
    assert!(board.snapshot().all_tasks.is_empty());
}

#[tokio::test]
async fn validation_failure_leaves_loading_cleared() {
    let ctx = setup().expect("Failed to setup test context");
    let board = TaskBoard::new(ctx.store.clone());

    let result = board.insert_task(NewTask::new("")).await;
    assert_eq!(result, Err(ValidationError::EmptyTitle));
    assert!(!board.snapshot().is_loading);
    assert!(board.snapshot().all_tasks.is_empty());
}

#[tokio::test]
async fn update_goes_through_and_refreshes() {
    let ctx = setup().expect("Failed to setup test context");
    let board = TaskBoard::new(ctx.store.clone());
    let id = board.insert_task(NewTask::new("Draft")).await.unwrap().unwrap();

    let mut task = board.snapshot().all_tasks[0].clone();
    task.title = "Final".into();
    task.priority = Priority::Urgent;
    board.update_task(&task).await.unwrap();

    let snapshot = board.snapshot();
    assert_eq!(snapshot.all_tasks[0].title, "Final");
    assert_eq!(snapshot.active_tasks[0].priority, Priority::Urgent);
    assert_eq!(board.get_task(id).await.unwrap().title, "Final");
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn loading_flag_is_raised_during_insert_and_update() {
    let ctx = setup().expect("Failed to setup test context");
    let board = TaskBoard::new(ctx.store.clone());
    let mut updates = board.subscribe();

    let (inserted, seen) = tokio::join!(
        board.insert_task(NewTask::new("Water plants")),
        record_loading(&mut updates)
    );
    let id = inserted.unwrap().unwrap();
    assert_eq!(seen.first(), Some(&true));
    assert_eq!(seen.last(), Some(&false));
    assert!(!board.snapshot().is_loading);

    let mut task = board.get_task(id).await.unwrap();
    task.title = "Water all plants".into();
    let (updated, seen) = tokio::join!(board.update_task(&task), record_loading(&mut updates));
    updated.unwrap();
    assert_eq!(seen.first(), Some(&true));
    assert_eq!(seen.last(), Some(&false));
    assert_eq!(board.snapshot().all_tasks[0].title, "Water all plants");
}

#[tokio::test]
async fn abandoned_insert_still_lands_and_clears_loading() {
    let ctx = setup().expect("Failed to setup test context");
    let board = TaskBoard::new(ctx.store.clone());
    let mut updates = board.subscribe();

    // Poll the insert once, then drop it.
    tokio::select! {
        biased;
        _ = board.insert_task(NewTask::new("Abandoned")) => panic!("insert finished on first poll"),
        _ = std::future::ready(()) => {}
    }
    assert!(board.snapshot().is_loading);

    let settled = tokio::time::timeout(
        Duration::from_secs(5),
        updates.wait_for(|snapshot| !snapshot.is_loading && snapshot.all_tasks.len() == 1),
    )
    .await
    .expect("board never settled")
    .expect("board dropped")
    .clone();
    assert_eq!(settled.all_tasks[0].title, "Abandoned");
}

#[tokio::test]
async fn selection_follows_edits() {
    let ctx = setup().expect("Failed to setup test context");
    let board = TaskBoard::new(ctx.store.clone());
    let id = board.insert_task(NewTask::new("Draft")).await.unwrap().unwrap();
    let selected = board.select_task(id).await.unwrap();

    let mut task = selected.clone();
    task.title = "Final".into();
    board.update_task(&task).await.unwrap();
    assert_eq!(board.snapshot().selected_task.unwrap().title, "Final");

    board.toggle_completion(&task).await;
    let selected = board.snapshot().selected_task.unwrap();
    assert_eq!(selected.title, "Final");
    assert!(selected.is_completed);
}

#[tokio::test]
async fn selection_is_view_state_only() {
    let ctx = setup().expect("Failed to setup test context");
    let board = TaskBoard::new(ctx.store.clone());
    let id = board.insert_task(NewTask::new("Edit me")).await.unwrap().unwrap();

    let selected = board.select_task(id).await.unwrap();
    assert_eq!(selected.id, id);
    assert_eq!(board.snapshot().selected_task.map(|t| t.id), Some(id));

    // Refreshes keep the selection.
    board.refresh().await;
    assert!(board.snapshot().selected_task.is_some());

    board.clear_selection();
    assert!(board.snapshot().selected_task.is_none());

    assert!(board.select_task(9_999).await.is_none());
    assert!(board.snapshot().selected_task.is_none());

    board.select_task(id).await;
    board.delete_task(id).await;
    assert!(board.snapshot().selected_task.is_none());
}

#[tokio::test]
async fn category_choices_union_both_sources() {
    let ctx = setup().expect("Failed to setup test context");
    let board = TaskBoard::new(ctx.store.clone());

    board
        .insert_category(NewCategory::new("Work"))
        .await
        .unwrap();
    board
        .insert_category(NewCategory::new("Health"))
        .await
        .unwrap();
    board
        .insert_task(NewTask::new("Stand-up").category("Work"))
        .await
        .unwrap();
    board
        .insert_task(NewTask::new("Read").category("Hobby"))
        .await
        .unwrap();

    assert_eq!(
        board.snapshot().category_choices(),
        vec!["Health", "Hobby", "Work"]
    );

    let hobby = board.tasks_in_category("Hobby").await;
    assert_eq!(hobby.len(), 1);
    assert_eq!(hobby[0].title, "Read");

    let work_id = board.snapshot().categories.iter().find(|c| c.name == "Work").unwrap().id;
    board.delete_category(work_id).await;
    let snapshot = board.snapshot();
    assert_eq!(snapshot.categories.len(), 1);
    // Still offered because a task uses it.
    assert!(snapshot.category_choices().contains(&"Work".to_string()));
}

#[tokio::test]
async fn preferences_and_stats_pass_through() {
    let ctx = setup().expect("Failed to setup test context");
    let board = TaskBoard::new(ctx.store.clone());

    board.save_preferences(PreferencesUpdate::theme_mode(true)).await;
    assert!(board.preferences().await.theme_mode);

    board.insert_task(NewTask::new("a")).await.unwrap();
    let id = board.insert_task(NewTask::new("b")).await.unwrap().unwrap();
    board.set_completion(id, true).await;

    let stats = board.stats().await;
    assert_eq!(stats.total, 2);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.completion_rate, 50);
}

#[tokio::test]
async fn bootstrap_seeds_once() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut config = AppConfig::for_data_dir(dir.path());
    config.profile.user_name = "Dewi".into();
    config.profile.user_id = "2024-001".into();

    let app = bootstrap(config.clone()).await.unwrap();
    let prefs = app.store.get_preferences().await;
    assert!(!prefs.first_launch);
    assert_eq!(prefs.user_name, "Dewi");
    assert_eq!(prefs.user_id, "2024-001");

    let snapshot = app.board.snapshot();
    assert_eq!(snapshot.categories.len(), DEFAULT_CATEGORIES.len());
    let general = snapshot
        .categories
        .iter()
        .find(|category| category.name == "General")
        .unwrap();
    assert_eq!(general.color, "#6200EE");

    // User renames a seeded category and changes their name; a restart must not undo it.
    let mut work = snapshot
        .categories
        .iter()
        .find(|category| category.name == "Work")
        .unwrap()
        .clone();
    work.name = "Office".into();
    app.board.update_category(&work).await.unwrap();
    app.store
        .save_preferences(PreferencesUpdate::user("Dewi A.", "2024-001"))
        .await;
    drop(app);

    let app = bootstrap(config).await.unwrap();
    let names: Vec<String> = app
        .board
        .snapshot()
        .categories
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names.len(), DEFAULT_CATEGORIES.len());
    assert!(names.contains(&"Office".to_string()));
    assert!(!names.contains(&"Work".to_string()));
    assert_eq!(app.store.get_preferences().await.user_name, "Dewi A.");
}

#[tokio::test]
async fn clear_all_data_empties_the_board() {
    let ctx = setup().expect("Failed to setup test context");
    let board = TaskBoard::new(ctx.store.clone());
    let id = board.insert_task(NewTask::new("gone soon")).await.unwrap().unwrap();
    board.select_task(id).await;

    board.clear_all_data().await;

    let snapshot = board.snapshot();
    assert!(snapshot.all_tasks.is_empty());
    assert!(snapshot.selected_task.is_none());
    assert!(board.preferences().await.first_launch);
}
