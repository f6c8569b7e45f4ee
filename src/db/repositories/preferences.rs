use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::{
    connection::Database,
    models::{PreferencesUpdate, UserPreferences},
};

const PREFERENCES_ROW_ID: i64 = 1;

fn read_preferences(conn: &Connection) -> Result<Option<UserPreferences>> {
    let prefs = conn
        .query_row(
            "SELECT user_name, user_id, theme_mode, first_launch
             FROM preferences
             WHERE id = ?1",
            params![PREFERENCES_ROW_ID],
            |row| {
                Ok(UserPreferences {
                    user_name: row.get("user_name")?,
                    user_id: row.get("user_id")?,
                    theme_mode: row.get("theme_mode")?,
                    first_launch: row.get("first_launch")?,
                })
            },
        )
        .optional()
        .context("failed to read preferences")?;

    Ok(prefs)
}

impl Database {
    /// The stored preferences row, or `None` before the first write.
    pub async fn get_preferences(&self) -> Result<Option<UserPreferences>> {
        self.execute(|conn| read_preferences(conn)).await
    }

    /// Merge `update` into the stored row, creating it from defaults if needed.
    pub async fn save_preferences(&self, update: PreferencesUpdate) -> Result<UserPreferences> {
        self.execute(move |conn| {
            let current = read_preferences(conn)?.unwrap_or_default();
            let merged = update.apply(current);

            conn.execute(
                "INSERT INTO preferences (id, user_name, user_id, theme_mode, first_launch)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                     user_name = excluded.user_name,
                     user_id = excluded.user_id,
                     theme_mode = excluded.theme_mode,
                     first_launch = excluded.first_launch",
                params![
                    PREFERENCES_ROW_ID,
                    merged.user_name,
                    merged.user_id,
                    merged.theme_mode,
                    merged.first_launch,
                ],
            )
            .context("failed to save preferences")?;

            Ok(merged)
        })
        .await
    }
}
