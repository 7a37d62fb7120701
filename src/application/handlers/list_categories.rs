//! Category listing and selection.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{Category, CategorySource, SettingsStore};

/// Categories available on the POS, plus which ones this display filters to.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CategoryListing {
    pub categories: Vec<Category>,
    /// Empty means the display shows every category.
    pub selected: Vec<i64>,
}

pub struct ListCategoriesHandler {
    source: Arc<dyn CategorySource>,
    settings: Arc<dyn SettingsStore>,
}

impl ListCategoriesHandler {
    pub fn new(source: Arc<dyn CategorySource>, settings: Arc<dyn SettingsStore>) -> Self {
        Self { source, settings }
    }

    pub async fn execute(&self) -> Result<CategoryListing, DomainError> {
        let categories = self
            .source
            .list_categories()
            .await
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?;
        let selected = self
            .settings
            .load_selected_categories()
            .await
            .map_err(|e| DomainError::new(ErrorCode::StorageError, e.to_string()))?;
        Ok(CategoryListing {
            categories,
            selected,
        })
    }

    /// Persists the display's category filter. Codes not present on the POS
    /// are rejected rather than silently stored.
    pub async fn select(&self, selected: &[i64]) -> Result<(), DomainError> {
        let known = self
            .source
            .list_categories()
            .await
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?;
        for code in selected {
            if !known.iter().any(|c| c.code == *code) {
                return Err(DomainError::validation(
                    "categories",
                    format!("Unknown category code: {code}"),
                ));
            }
        }
        self.settings
            .save_selected_categories(selected)
            .await
            .map_err(|e| DomainError::new(ErrorCode::StorageError, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    use crate::domain::alert::SoundSettings;
    use crate::ports::{CategorySourceError, SettingsStoreError};

    use super::*;

    struct FixedCategories;

    #[async_trait]
    impl CategorySource for FixedCategories {
        async fn list_categories(&self) -> Result<Vec<Category>, CategorySourceError> {
            Ok(vec![
                Category {
                    code: 1,
                    name: "Grill".to_string(),
                },
                Category {
                    code: 2,
                    name: "Salads".to_string(),
                },
            ])
        }
    }

    #[derive(Default)]
    struct MemorySettings {
        selected: StdMutex<Vec<i64>>,
    }

    #[async_trait]
    impl SettingsStore for MemorySettings {
        async fn load_sound_settings(&self) -> Result<Option<SoundSettings>, SettingsStoreError> {
            Ok(None)
        }
        async fn save_sound_settings(&self, _: &SoundSettings) -> Result<(), SettingsStoreError> {
            Ok(())
        }
        async fn load_selected_categories(&self) -> Result<Vec<i64>, SettingsStoreError> {
            Ok(self.selected.lock().unwrap().clone())
        }
        async fn save_selected_categories(
            &self,
            categories: &[i64],
        ) -> Result<(), SettingsStoreError> {
            *self.selected.lock().unwrap() = categories.to_vec();
            Ok(())
        }
    }

    #[tokio::test]
    async fn lists_categories_with_current_selection() {
        let handler =
            ListCategoriesHandler::new(Arc::new(FixedCategories), Arc::new(MemorySettings::default()));

        handler.select(&[2]).await.unwrap();
        let listing = handler.execute().await.unwrap();

        assert_eq!(listing.categories.len(), 2);
        assert_eq!(listing.selected, vec![2]);
    }

    #[tokio::test]
    async fn rejects_unknown_category_codes() {
        let settings = Arc::new(MemorySettings::default());
        let handler = ListCategoriesHandler::new(Arc::new(FixedCategories), settings.clone());

        let error = handler.select(&[1, 42]).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::ValidationFailed);
        assert!(settings.selected.lock().unwrap().is_empty());
    }
}
