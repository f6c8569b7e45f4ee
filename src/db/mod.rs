pub mod connection;
pub mod helpers;
pub mod migrations;
pub mod models;
pub mod repositories;

pub use connection::Database;
pub use models::{
    Category, NewCategory, NewTask, PreferencesUpdate, Priority, Task, TaskFilter, TaskStats,
    UserPreferences,
};
pub use repositories::CategoryWrite;
