use log::{info, warn};

use crate::{
    config::ProfileConfig,
    db::{NewCategory, PreferencesUpdate},
    error::ValidationError,
    store::TaskStore,
};

/// Categories created on first launch, with their display colors.
pub const DEFAULT_CATEGORIES: [(&str, &str); 5] = [
    ("General", "#6200EE"),
    ("Work", "#1976D2"),
    ("Personal", "#388E3C"),
    ("Shopping", "#F57C00"),
    ("Health", "#D32F2F"),
];

/// Seed default categories and the user profile, once.
///
/// Guarded by `first_launch`; the flag is cleared at the end so later calls
/// do nothing. Returns whether seeding ran.
pub async fn run_first_launch(store: &TaskStore, profile: &ProfileConfig) -> bool {
    if !store.get_preferences().await.first_launch {
        return false;
    }

    info!("First launch, seeding default data");

    for (name, color) in DEFAULT_CATEGORIES {
        match store
            .insert_category(NewCategory::with_color(name, color))
            .await
        {
            Ok(_) | Err(ValidationError::DuplicateCategory(_)) => {}
            Err(err) => warn!("Could not seed category {name}: {err}"),
        }
    }

    store
        .save_preferences(PreferencesUpdate {
            user_name: Some(profile.user_name.clone()),
            user_id: Some(profile.user_id.clone()),
            first_launch: Some(false),
            ..PreferencesUpdate::default()
        })
        .await;

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> TaskStore {
        TaskStore::new(Database::new(dir.path().join("todolist.sqlite3")).unwrap())
    }

    #[tokio::test]
    async fn seeds_once_and_tolerates_existing_categories() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store
            .insert_category(NewCategory::with_color("Work", "#000000"))
            .await
            .unwrap();

        assert!(run_first_launch(&store, &ProfileConfig::default()).await);
        assert!(!run_first_launch(&store, &ProfileConfig::default()).await);

        let categories = store.list_categories().await;
        assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
        let work = categories.iter().find(|c| c.name == "Work").unwrap();
        assert_eq!(work.color, "#000000");
        assert!(!store.get_preferences().await.first_launch);
    }

    #[tokio::test]
    async fn skipped_when_first_launch_already_cleared() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store
            .save_preferences(PreferencesUpdate::first_launch(false))
            .await;

        assert!(!run_first_launch(&store, &ProfileConfig::default()).await);
        assert!(store.list_categories().await.is_empty());
    }
}
