use std::time::Duration;

use tempfile::TempDir;
use todolist_lib::{Database, TaskStore};

pub struct TestContext {
    #[allow(dead_code)] // keeps the database directory alive
    pub dir: TempDir,
    pub store: TaskStore,
}

pub fn setup() -> anyhow::Result<TestContext> {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new()?;
    let db = Database::new(dir.path().join("todolist.sqlite3"))?;
    Ok(TestContext {
        dir,
        store: TaskStore::new(db),
    })
}

/// Long enough for stored microsecond timestamps to move forward.
#[allow(dead_code)]
pub async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}
