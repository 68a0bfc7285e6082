use crate::core::preferences::PreferenceStore;
use crate::domain::model::Country;
use crate::domain::ports::{MovieCatalog, Storage};
use crate::utils::error::Result;
use crate::utils::validation::normalize_region_code;

/// Region used by a screen: explicit override, else the saved preference,
/// else the configured default.
pub fn resolve_region(
    override_code: Option<&str>,
    saved: Option<&str>,
    default_code: &str,
) -> Result<String> {
    match (override_code, saved) {
        (Some(code), _) => normalize_region_code("--region", code),
        (None, Some(code)) => normalize_region_code("selected_country", code),
        (None, None) => normalize_region_code("region.default", default_code),
    }
}

pub struct SettingsViewModel<C: MovieCatalog, S: Storage> {
    repository: C,
    preferences: PreferenceStore<S>,
    pub countries: Vec<Country>,
    pub selected_country: Option<String>,
}

impl<C: MovieCatalog, S: Storage> SettingsViewModel<C, S> {
    pub fn new(repository: C, storage: S) -> Self {
        Self {
            repository,
            preferences: PreferenceStore::new(storage),
            countries: Vec::new(),
            selected_country: None,
        }
    }

    /// 失敗時清單為空，不顯示錯誤
    pub async fn get_countries(&mut self) {
        self.countries = match self.repository.countries().await {
            Ok(mut countries) => {
                countries.sort_by(|a, b| a.english_name.cmp(&b.english_name));
                countries
            }
            Err(e) => {
                tracing::warn!("Failed to fetch countries: {}", e);
                Vec::new()
            }
        };
    }

    pub async fn observe_saved_country(&mut self) -> Result<()> {
        if let Some(saved) = self.preferences.selected_country().await? {
            self.selected_country = Some(saved);
        }
        Ok(())
    }

    pub async fn set_selected_country(&mut self, code: &str) -> Result<String> {
        let code = self.preferences.save_country(code).await?;
        self.selected_country = Some(code.clone());
        Ok(code)
    }

    /// English name for the selected code, when the country list is loaded.
    pub fn selected_country_name(&self) -> Option<&str> {
        let code = self.selected_country.as_deref()?;
        self.countries
            .iter()
            .find(|c| c.iso_3166_1.eq_ignore_ascii_case(code))
            .map(|c| c.english_name.as_str())
    }
}
