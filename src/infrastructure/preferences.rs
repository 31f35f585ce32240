use crate::infrastructure::error::JournalError;
use crate::infrastructure::storage::KeyValueStore;
use std::sync::Arc;

// Preference keys carried over from the legacy storage layout.
const LANGUAGE_KEY: &str = "app_language";
const DARK_MODE_KEY: &str = "@darkMode";
const THEME_COLOR_KEY: &str = "@themeColor";

const DEFAULT_THEME_COLOR: &str = "blue";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Ja,
    En,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ja => "ja",
            Self::En => "en",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "ja" => Some(Self::Ja),
            "en" => Some(Self::En),
            _ => None,
        }
    }
}

/// Language and theme settings stored next to the journal data. Unknown or
/// absent stored values fall back to the defaults.
#[derive(Debug, Clone)]
pub struct Preferences<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn language(&self) -> Result<Language, JournalError> {
        let stored = self.store.read(LANGUAGE_KEY).await?;
        Ok(stored
            .as_deref()
            .and_then(Language::parse)
            .unwrap_or_default())
    }

    pub async fn set_language(&self, language: Language) -> Result<(), JournalError> {
        self.store.write(LANGUAGE_KEY, language.as_str()).await
    }

    pub async fn dark_mode(&self) -> Result<bool, JournalError> {
        let stored = self.store.read(DARK_MODE_KEY).await?;
        Ok(stored.as_deref() == Some("true"))
    }

    pub async fn set_dark_mode(&self, enabled: bool) -> Result<(), JournalError> {
        let value = if enabled { "true" } else { "false" };
        self.store.write(DARK_MODE_KEY, value).await
    }

    pub async fn theme_color(&self) -> Result<String, JournalError> {
        let stored = self.store.read(THEME_COLOR_KEY).await?;
        Ok(stored
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_THEME_COLOR.to_string()))
    }

    pub async fn set_theme_color(&self, name: &str) -> Result<(), JournalError> {
        self.store.write(THEME_COLOR_KEY, name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryKeyValueStore;

    fn preferences() -> Preferences<InMemoryKeyValueStore> {
        Preferences::new(Arc::new(InMemoryKeyValueStore::default()))
    }

    #[tokio::test]
    async fn defaults_apply_when_nothing_stored() {
        let preferences = preferences();
        assert_eq!(preferences.language().await.expect("language"), Language::Ja);
        assert!(!preferences.dark_mode().await.expect("dark mode"));
        assert_eq!(
            preferences.theme_color().await.expect("theme color"),
            "blue"
        );
    }

    #[tokio::test]
    async fn stored_values_roundtrip() {
        let preferences = preferences();
        preferences
            .set_language(Language::En)
            .await
            .expect("set language");
        preferences.set_dark_mode(true).await.expect("set dark mode");
        preferences
            .set_theme_color("green")
            .await
            .expect("set theme color");

        assert_eq!(preferences.language().await.expect("language"), Language::En);
        assert!(preferences.dark_mode().await.expect("dark mode"));
        assert_eq!(
            preferences.theme_color().await.expect("theme color"),
            "green"
        );
    }

    #[tokio::test]
    async fn unrecognized_language_falls_back_to_default() {
        let store = Arc::new(InMemoryKeyValueStore::default());
        store.write("app_language", "fr").await.expect("seed");
        let preferences = Preferences::new(store);
        assert_eq!(preferences.language().await.expect("language"), Language::Ja);
    }
}
