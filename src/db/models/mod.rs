pub mod category;
pub mod preferences;
pub mod stats;
pub mod task;

pub use category::{Category, NewCategory, DEFAULT_CATEGORY_COLOR};
pub use preferences::{PreferencesUpdate, UserPreferences};
pub use stats::{CategoryStat, PriorityCount, TaskStats};
pub use task::{NewTask, Priority, Task, TaskFilter, DEFAULT_CATEGORY};
