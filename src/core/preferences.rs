use crate::domain::ports::Storage;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::normalize_region_code;
use std::collections::BTreeMap;

pub const SETTINGS_FILE: &str = "settings.json";
pub const SELECTED_COUNTRY_KEY: &str = "selected_country";

/// String key-value preferences kept in one JSON document.
pub struct PreferenceStore<S: Storage> {
    storage: S,
}

impl<S: Storage> PreferenceStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        match self.storage.read_file(SETTINGS_FILE).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(AppError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load().await?.remove(key))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut preferences = self.load().await?;
        preferences.insert(key.to_string(), value.to_string());
        let data = serde_json::to_vec_pretty(&preferences)?;
        self.storage.write_file(SETTINGS_FILE, &data).await
    }

    pub async fn selected_country(&self) -> Result<Option<String>> {
        self.get(SELECTED_COUNTRY_KEY).await
    }

    /// Validates and upper-cases the code before saving it; returns the
    /// stored form.
    pub async fn save_country(&self, code: &str) -> Result<String> {
        let code = normalize_region_code("region", code)?;
        self.set(SELECTED_COUNTRY_KEY, &code).await?;
        tracing::info!("Selected region saved: {}", code);
        Ok(code)
    }
}
