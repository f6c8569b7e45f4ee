mod board;
mod config;
mod db;
mod error;
mod onboarding;
mod store;
mod utils;

use std::path::Path;

use anyhow::Result;
use log::info;

pub use board::{BoardSnapshot, TaskBoard};
pub use config::{AppConfig, ProfileConfig, CONFIG_FILE_NAME, DATA_DIR_ENV};
pub use db::{
    models::{CategoryStat, PriorityCount, DEFAULT_CATEGORY, DEFAULT_CATEGORY_COLOR},
    Category, CategoryWrite, Database, NewCategory, NewTask, PreferencesUpdate, Priority, Task,
    TaskFilter, TaskStats, UserPreferences,
};
pub use error::ValidationError;
pub use onboarding::{run_first_launch, DEFAULT_CATEGORIES};
pub use store::{TaskStore, FALLBACK_CATEGORY_NAMES};
pub use utils::logging::{init_logging, level_from_name};

/// Everything a presentation layer needs, wired together.
#[derive(Clone)]
pub struct App {
    pub config: AppConfig,
    pub store: TaskStore,
    pub board: TaskBoard,
}

/// Open the database, run first-launch seeding and load the board.
///
/// This is the composition root: it owns the only [`Database`] handle and
/// hands clones of it down. Failing to open or migrate the database is the
/// one error that surfaces from here.
pub async fn bootstrap(config: AppConfig) -> Result<App> {
    let database = Database::new(config.database_path())?;
    let store = TaskStore::new(database);

    if run_first_launch(&store, &config.profile).await {
        info!("Default categories and profile seeded");
    }

    let board = TaskBoard::new(store.clone());
    board.refresh().await;

    Ok(App {
        config,
        store,
        board,
    })
}

/// Load `config.json` from `data_dir` (env override applied), start logging
/// and bootstrap.
pub async fn run(data_dir: &Path) -> Result<App> {
    let mut config = AppConfig::load(&data_dir.join(CONFIG_FILE_NAME))?;
    config.data_dir = data_dir.to_path_buf();
    let config = config.with_env_overrides();

    init_logging(level_from_name(&config.log_level));
    info!("Todo list starting up...");

    bootstrap(config).await
}
