//! View-state coordinator.
//!
//! [`TaskBoard`] keeps the snapshot a presentation layer renders from and
//! publishes it on a `watch` channel. Every command goes through the
//! [`TaskStore`] and is followed by a full re-fetch; nothing is patched
//! in place.
//!
//! Task inserts and updates run on their own tokio task. A caller that stops
//! waiting does not stop the write, its refresh, or the clearing of
//! `is_loading`.

use std::{collections::BTreeSet, future::Future, sync::Arc};

use log::{debug, error};
use serde::Serialize;
use tokio::sync::watch;

use crate::{
    db::{
        Category, NewCategory, NewTask, PreferencesUpdate, Task, TaskFilter, TaskStats,
        UserPreferences,
    },
    error::ValidationError,
    store::TaskStore,
};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub all_tasks: Vec<Task>,
    pub active_tasks: Vec<Task>,
    pub completed_tasks: Vec<Task>,
    /// Distinct category strings used by tasks.
    pub category_names: Vec<String>,
    pub categories: Vec<Category>,
    /// Re-read on every refresh, so it reflects the stored task.
    pub selected_task: Option<Task>,
    /// Set while an insert or update is in flight.
    pub is_loading: bool,
}

impl BoardSnapshot {
    /// Stored category names merged with the ones tasks use, sorted and unique.
    pub fn category_choices(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|category| category.name.clone())
            .chain(self.category_names.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[derive(Clone)]
pub struct TaskBoard {
    store: TaskStore,
    state: Arc<watch::Sender<BoardSnapshot>>,
}

impl TaskBoard {
    /// Starts empty; call [`TaskBoard::refresh`] to load.
    pub fn new(store: TaskStore) -> Self {
        let (state, _) = watch::channel(BoardSnapshot::default());
        Self {
            store,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.state.borrow().clone()
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Re-fetch every collection and the selected task. The loading flag is kept.
    ///
    /// A selected task that can no longer be read is deselected.
    pub async fn refresh(&self) {
        let selected_id = self.selected_id();
        let (all_tasks, active_tasks, completed_tasks, category_names, categories, selected) =
            tokio::join!(
                self.store.list_tasks(TaskFilter::All),
                self.store.list_tasks(TaskFilter::Active),
                self.store.list_tasks(TaskFilter::Completed),
                self.store.list_category_names(),
                self.store.list_categories(),
                async {
                    match selected_id {
                        Some(task_id) => self.store.get_task(task_id).await,
                        None => None,
                    }
                },
            );

        debug!(
            "Board refreshed: {} tasks, {} categories",
            all_tasks.len(),
            categories.len()
        );

        self.state.send_modify(|snapshot| {
            snapshot.all_tasks = all_tasks;
            snapshot.active_tasks = active_tasks;
            snapshot.completed_tasks = completed_tasks;
            snapshot.category_names = category_names;
            snapshot.categories = categories;
            // Leave a selection made while the fetch was running alone.
            if snapshot.selected_task.as_ref().map(|task| task.id) == selected_id {
                snapshot.selected_task = selected;
            }
        });
    }

    fn selected_id(&self) -> Option<i64> {
        self.state.borrow().selected_task.as_ref().map(|task| task.id)
    }

    fn begin_loading(&self) -> LoadingGuard {
        self.state.send_modify(|snapshot| snapshot.is_loading = true);
        LoadingGuard(Arc::clone(&self.state))
    }

    /// Run `write` detached with `is_loading` set, refreshing on success.
    /// `fallback` is returned only if the spawned task itself died.
    async fn loading_write<T, W>(&self, write: W, fallback: T) -> Result<T, ValidationError>
    where
        T: Send + 'static,
        W: Future<Output = Result<T, ValidationError>> + Send + 'static,
    {
        let guard = self.begin_loading();
        let board = self.clone();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            let result = write.await;
            if result.is_ok() {
                board.refresh().await;
            }
            result
        });

        match handle.await {
            Ok(result) => result,
            Err(err) => {
                error!("Board write did not finish: {err}");
                Ok(fallback)
            }
        }
    }

    pub async fn insert_task(&self, task: NewTask) -> Result<Option<i64>, ValidationError> {
        let store = self.store.clone();
        self.loading_write(async move { store.insert_task(task).await }, None)
            .await
    }

    pub async fn update_task(&self, task: &Task) -> Result<(), ValidationError> {
        let store = self.store.clone();
        let task = task.clone();
        self.loading_write(async move { store.update_task(&task).await }, ())
            .await
    }

    pub async fn delete_task(&self, task_id: i64) {
        self.store.delete_task(task_id).await;
        self.refresh().await;
    }

    pub async fn set_completion(&self, task_id: i64, completed: bool) {
        self.store.set_task_completion(task_id, completed).await;
        self.refresh().await;
    }

    /// Flip the completion state `task` was rendered with.
    pub async fn toggle_completion(&self, task: &Task) {
        self.set_completion(task.id, !task.is_completed).await;
    }

    pub async fn get_task(&self, task_id: i64) -> Option<Task> {
        self.store.get_task(task_id).await
    }

    /// Load a task into `selected_task` for editing.
    pub async fn select_task(&self, task_id: i64) -> Option<Task> {
        let task = self.store.get_task(task_id).await;
        let selected = task.clone();
        self.state.send_modify(|snapshot| snapshot.selected_task = selected);
        task
    }

    pub fn clear_selection(&self) {
        self.state.send_modify(|snapshot| snapshot.selected_task = None);
    }

    pub async fn tasks_in_category(&self, name: &str) -> Vec<Task> {
        self.store
            .list_tasks(TaskFilter::ByCategory(name.to_string()))
            .await
    }

    pub async fn insert_category(
        &self,
        category: NewCategory,
    ) -> Result<Option<i64>, ValidationError> {
        let result = self.store.insert_category(category).await;
        if result.is_ok() {
            self.refresh().await;
        }
        result
    }

    pub async fn update_category(&self, category: &Category) -> Result<(), ValidationError> {
        let result = self.store.update_category(category).await;
        if result.is_ok() {
            self.refresh().await;
        }
        result
    }

    pub async fn delete_category(&self, category_id: i64) {
        self.store.delete_category(category_id).await;
        self.refresh().await;
    }

    pub async fn preferences(&self) -> UserPreferences {
        self.store.get_preferences().await
    }

    pub async fn save_preferences(&self, update: PreferencesUpdate) {
        self.store.save_preferences(update).await;
    }

    pub async fn stats(&self) -> TaskStats {
        self.store.task_stats().await
    }

    pub async fn clear_all_data(&self) {
        self.store.clear_all_data().await;
        self.clear_selection();
        self.refresh().await;
    }
}

/// Clears `is_loading` when dropped.
struct LoadingGuard(Arc<watch::Sender<BoardSnapshot>>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.send_modify(|snapshot| snapshot.is_loading = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn category_choices_are_sorted_and_unique() {
        let snapshot = BoardSnapshot {
            category_names: vec!["Work".into(), "Errands".into()],
            categories: vec![
                Category {
                    id: 1,
                    name: "Work".into(),
                    color: "#1976D2".into(),
                    created_at: Utc::now(),
                },
                Category {
                    id: 2,
                    name: "Health".into(),
                    color: "#D32F2F".into(),
                    created_at: Utc::now(),
                },
            ],
            ..BoardSnapshot::default()
        };

        assert_eq!(snapshot.category_choices(), vec!["Errands", "Health", "Work"]);
    }
}
