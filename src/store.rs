//! Storage boundary.
//!
//! [`TaskStore`] wraps [`Database`] and applies the fault policy the rest of
//! the app relies on: validation failures are returned to the caller, a
//! missing id is a silent no-op, and every storage fault is logged and turned
//! into an empty list, a default value or nothing at all. Nothing above this
//! layer ever sees an `anyhow::Error`.

use chrono::Utc;

use crate::{
    db::{
        models::{category::validation, task::validate_title},
        Category, CategoryWrite, Database, NewCategory, NewTask, PreferencesUpdate, Task,
        TaskFilter, TaskStats, UserPreferences,
    },
    error::ValidationError,
    log_debug, log_error, log_warn,
};

const ENABLE_LOGS: bool = true;

/// Returned by [`TaskStore::list_category_names`] when the task table cannot be read.
pub const FALLBACK_CATEGORY_NAMES: [&str; 5] =
    ["General", "Work", "Personal", "Shopping", "Health"];

#[derive(Clone)]
pub struct TaskStore {
    db: Database,
}

impl TaskStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Returns the new id, or `None` if storage failed.
    pub async fn insert_task(&self, task: NewTask) -> Result<Option<i64>, ValidationError> {
        validate_title(&task.title)?;

        match self.db.insert_task(task).await {
            Ok(id) => {
                log_debug!("Inserted task {id}");
                Ok(Some(id))
            }
            Err(err) => {
                log_error!("Failed to insert task: {err:#}");
                Ok(None)
            }
        }
    }

    /// Replace the mutable fields of `task`. Unknown ids are ignored.
    pub async fn update_task(&self, task: &Task) -> Result<(), ValidationError> {
        validate_title(&task.title)?;

        match self.db.update_task(task).await {
            Ok(true) => {}
            Ok(false) => log_debug!("Update skipped, task {} does not exist", task.id),
            Err(err) => log_error!("Failed to update task {}: {err:#}", task.id),
        }
        Ok(())
    }

    pub async fn delete_task(&self, task_id: i64) {
        match self.db.delete_task(task_id).await {
            Ok(true) => {}
            Ok(false) => log_debug!("Delete skipped, task {task_id} does not exist"),
            Err(err) => log_error!("Failed to delete task {task_id}: {err:#}"),
        }
    }

    pub async fn set_task_completion(&self, task_id: i64, completed: bool) {
        match self.db.set_task_completion(task_id, completed).await {
            Ok(true) => {}
            Ok(false) => log_debug!("Completion change skipped, task {task_id} does not exist"),
            Err(err) => log_error!("Failed to set completion on task {task_id}: {err:#}"),
        }
    }

    pub async fn get_task(&self, task_id: i64) -> Option<Task> {
        self.db.get_task(task_id).await.unwrap_or_else(|err| {
            log_warn!("Failed to load task {task_id}: {err:#}");
            None
        })
    }

    pub async fn list_tasks(&self, filter: TaskFilter) -> Vec<Task> {
        self.db.list_tasks(filter.clone()).await.unwrap_or_else(|err| {
            log_warn!("Failed to list tasks ({filter:?}): {err:#}");
            Vec::new()
        })
    }

    pub async fn list_category_names(&self) -> Vec<String> {
        self.db
            .list_task_category_names()
            .await
            .unwrap_or_else(|err| {
                log_warn!("Failed to list task categories, using defaults: {err:#}");
                FALLBACK_CATEGORY_NAMES.iter().map(|name| name.to_string()).collect()
            })
    }

    /// Category names are unique; a taken name is reported as
    /// [`ValidationError::DuplicateCategory`].
    pub async fn insert_category(
        &self,
        category: NewCategory,
    ) -> Result<Option<i64>, ValidationError> {
        validation::validate_name(&category.name)?;
        validation::validate_color(&category.color)?;

        let name = category.name.clone();
        match self.db.insert_category(category).await {
            Ok(CategoryWrite::Saved(id)) => Ok(Some(id)),
            Ok(CategoryWrite::NameTaken) => Err(ValidationError::DuplicateCategory(name)),
            Ok(CategoryWrite::Missing) => Ok(None),
            Err(err) => {
                log_error!("Failed to insert category '{name}': {err:#}");
                Ok(None)
            }
        }
    }

    pub async fn update_category(&self, category: &Category) -> Result<(), ValidationError> {
        validation::validate_name(&category.name)?;
        validation::validate_color(&category.color)?;

        match self.db.update_category(category).await {
            Ok(CategoryWrite::Saved(_)) => Ok(()),
            Ok(CategoryWrite::NameTaken) => {
                Err(ValidationError::DuplicateCategory(category.name.clone()))
            }
            Ok(CategoryWrite::Missing) => {
                log_debug!("Update skipped, category {} does not exist", category.id);
                Ok(())
            }
            Err(err) => {
                log_error!("Failed to update category {}: {err:#}", category.id);
                Ok(())
            }
        }
    }

    pub async fn delete_category(&self, category_id: i64) {
        match self.db.delete_category(category_id).await {
            Ok(true) => {}
            Ok(false) => log_debug!("Delete skipped, category {category_id} does not exist"),
            Err(err) => log_error!("Failed to delete category {category_id}: {err:#}"),
        }
    }

    pub async fn get_category(&self, category_id: i64) -> Option<Category> {
        self.db.get_category(category_id).await.unwrap_or_else(|err| {
            log_warn!("Failed to load category {category_id}: {err:#}");
            None
        })
    }

    pub async fn list_categories(&self) -> Vec<Category> {
        self.db.list_categories().await.unwrap_or_else(|err| {
            log_warn!("Failed to list categories: {err:#}");
            Vec::new()
        })
    }

    /// Defaults until something has been saved.
    pub async fn get_preferences(&self) -> UserPreferences {
        match self.db.get_preferences().await {
            Ok(prefs) => prefs.unwrap_or_default(),
            Err(err) => {
                log_warn!("Failed to read preferences, using defaults: {err:#}");
                UserPreferences::default()
            }
        }
    }

    pub async fn save_preferences(&self, update: PreferencesUpdate) {
        if let Err(err) = self.db.save_preferences(update).await {
            log_error!("Failed to save preferences: {err:#}");
        }
    }

    pub async fn task_stats(&self) -> TaskStats {
        let tasks = self.list_tasks(TaskFilter::All).await;
        let stored: Vec<String> = self
            .list_categories()
            .await
            .into_iter()
            .map(|category| category.name)
            .collect();
        TaskStats::compute(&tasks, &stored, Utc::now())
    }

    /// Drop and recreate every table. Preferences read as defaults afterwards.
    pub async fn clear_all_data(&self) {
        if let Err(err) = self.db.reset().await {
            log_error!("Failed to clear data: {err:#}");
        }
    }
}
