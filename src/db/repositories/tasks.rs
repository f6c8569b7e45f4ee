use anyhow::{Context, Result};
use log::warn;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{
        format_datetime, format_optional_datetime, now, parse_datetime, parse_optional_datetime,
        parse_priority, PRIORITY_RANK_SQL,
    },
    models::{NewTask, Task, TaskFilter},
};

const TASK_COLUMNS: &str =
    "id, title, description, is_completed, priority, category, due_date, created_at, updated_at";

fn row_to_task(row: &Row) -> Result<Task> {
    let id: i64 = row.get("id")?;
    let priority: String = row.get("priority")?;
    let due_date: Option<String> = row.get("due_date")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    // A broken due date should not hide the task.
    let due_date = parse_optional_datetime(due_date, "due_date").unwrap_or_else(|err| {
        warn!("Task {id} has an unreadable due date, treating as none: {err:#}");
        None
    });

    Ok(Task {
        id,
        title: row.get("title")?,
        description: row.get::<_, Option<String>>("description")?.unwrap_or_default(),
        is_completed: row.get("is_completed")?,
        priority: parse_priority(&priority)?,
        category: row.get("category")?,
        due_date,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

/// `WHERE`/`ORDER BY` tail for each listing.
fn filter_clause(filter: &TaskFilter) -> String {
    match filter {
        TaskFilter::All => "ORDER BY created_at DESC, id DESC".to_string(),
        TaskFilter::Active => format!(
            "WHERE is_completed = 0
             ORDER BY {PRIORITY_RANK_SQL} DESC,
                      due_date IS NULL,
                      due_date ASC,
                      created_at DESC,
                      id DESC"
        ),
        TaskFilter::Completed => {
            "WHERE is_completed = 1 ORDER BY updated_at DESC, id DESC".to_string()
        }
        TaskFilter::ByCategory(_) => {
            "WHERE category = ?1 ORDER BY created_at DESC, id DESC".to_string()
        }
    }
}

impl Database {
    /// Insert a task and return its new id. Title validation is the caller's job.
    pub async fn insert_task(&self, task: NewTask) -> Result<i64> {
        self.execute(move |conn| {
            let stamp = format_datetime(&now());
            conn.execute(
                "INSERT INTO tasks (title, description, is_completed, priority, category, due_date, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    task.title,
                    task.description,
                    task.is_completed,
                    task.priority.as_str(),
                    task.category,
                    format_optional_datetime(task.due_date.as_ref()),
                    stamp,
                    stamp,
                ],
            )
            .context("failed to insert task")?;

            Ok(conn.last_insert_rowid())
        })
        .await
    }

    /// Overwrite every mutable field of `task`. Returns `false` when no row has its id.
    pub async fn update_task(&self, task: &Task) -> Result<bool> {
        let record = task.clone();
        self.execute(move |conn| {
            // MAX keeps updated_at from falling behind created_at if the clock steps back.
            let rows_affected = conn
                .execute(
                    "UPDATE tasks
                     SET title = ?1,
                         description = ?2,
                         is_completed = ?3,
                         priority = ?4,
                         category = ?5,
                         due_date = ?6,
                         updated_at = MAX(?7, created_at)
                     WHERE id = ?8",
                    params![
                        record.title,
                        record.description,
                        record.is_completed,
                        record.priority.as_str(),
                        record.category,
                        format_optional_datetime(record.due_date.as_ref()),
                        format_datetime(&now()),
                        record.id,
                    ],
                )
                .context("failed to update task")?;

            Ok(rows_affected > 0)
        })
        .await
    }

    /// Returns `false` when the task did not exist.
    pub async fn delete_task(&self, task_id: i64) -> Result<bool> {
        self.execute(move |conn| {
            let rows_affected = conn
                .execute("DELETE FROM tasks WHERE id = ?1", params![task_id])
                .context("failed to delete task")?;
            Ok(rows_affected > 0)
        })
        .await
    }

    /// Touch only `is_completed` and `updated_at`.
    pub async fn set_task_completion(&self, task_id: i64, completed: bool) -> Result<bool> {
        self.execute(move |conn| {
            let rows_affected = conn
                .execute(
                    "UPDATE tasks
                     SET is_completed = ?1,
                         updated_at = MAX(?2, created_at)
                     WHERE id = ?3",
                    params![completed, format_datetime(&now()), task_id],
                )
                .context("failed to update task completion")?;
            Ok(rows_affected > 0)
        })
        .await
    }

    pub async fn get_task(&self, task_id: i64) -> Result<Option<Task>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"
            ))?;

            let mut rows = stmt.query(params![task_id])?;
            let task = match rows.next()? {
                Some(row) => Some(row_to_task(row)?),
                None => None,
            };
            Ok(task)
        })
        .await
    }

    /// List tasks in the order defined for `filter`.
    ///
    /// Rows that cannot be decoded are logged and left out; the rest are returned.
    pub async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        self.execute(move |conn| {
            let query = format!(
                "SELECT {TASK_COLUMNS} FROM tasks {}",
                filter_clause(&filter)
            );
            let mut stmt = conn.prepare(&query)?;

            let mut rows = match &filter {
                TaskFilter::ByCategory(name) => stmt.query(params![name])?,
                _ => stmt.query([])?,
            };
            let mut tasks = Vec::new();
            while let Some(row) = rows.next()? {
                match row_to_task(row) {
                    Ok(task) => tasks.push(task),
                    Err(err) => warn!("Skipping malformed task row: {err:#}"),
                }
            }

            Ok(tasks)
        })
        .await
    }

    /// Distinct category strings used by tasks, ascending.
    pub async fn list_task_category_names(&self) -> Result<Vec<String>> {
        self.execute(|conn| {
            let mut stmt =
                conn.prepare("SELECT DISTINCT category FROM tasks ORDER BY category ASC")?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(names)
        })
        .await
    }
}
