use serde::{Deserialize, Serialize};

/// Process-wide user preferences, stored as a single row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub user_name: String,
    pub user_id: String,
    /// `true` selects the dark theme.
    pub theme_mode: bool,
    pub first_launch: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            user_name: "User".into(),
            user_id: "NIM".into(),
            theme_mode: false,
            first_launch: true,
        }
    }
}

/// Partial update for [`UserPreferences`]; `None` fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesUpdate {
    pub user_name: Option<String>,
    pub user_id: Option<String>,
    pub theme_mode: Option<bool>,
    pub first_launch: Option<bool>,
}

impl PreferencesUpdate {
    pub fn user(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            user_name: Some(name.into()),
            user_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn theme_mode(dark: bool) -> Self {
        Self {
            theme_mode: Some(dark),
            ..Self::default()
        }
    }

    pub fn first_launch(first_launch: bool) -> Self {
        Self {
            first_launch: Some(first_launch),
            ..Self::default()
        }
    }

    pub fn apply(self, mut prefs: UserPreferences) -> UserPreferences {
        if let Some(name) = self.user_name {
            prefs.user_name = name;
        }
        if let Some(id) = self.user_id {
            prefs.user_id = id;
        }
        if let Some(theme_mode) = self.theme_mode {
            prefs.theme_mode = theme_mode;
        }
        if let Some(first_launch) = self.first_launch {
            prefs.first_launch = first_launch;
        }
        prefs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_update_keeps_untouched_fields() {
        let prefs = UserPreferences::default();
        let updated = PreferencesUpdate::theme_mode(true).apply(prefs.clone());

        assert!(updated.theme_mode);
        assert_eq!(updated.user_name, prefs.user_name);
        assert_eq!(updated.user_id, prefs.user_id);
        assert!(updated.first_launch);
    }

    #[test]
    fn deserializes_sparse_json() {
        let update: PreferencesUpdate = serde_json::from_str(r#"{"firstLaunch":false}"#).unwrap();
        assert_eq!(update, PreferencesUpdate::first_launch(false));
    }
}
