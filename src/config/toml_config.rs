use crate::adapters::{places, tmdb};
use crate::core::leaving_soon::{LeavingSoonPolicy, DEFAULT_WINDOW_DAYS};
use crate::domain::model::{GeoPoint, MovieId};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";
pub const PLACES_API_KEY_ENV: &str = "PLACES_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tmdb: TmdbConfig,
    pub places: PlacesConfig,
    pub location: LocationConfig,
    pub region: RegionConfig,
    pub storage: StorageConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
    pub timeout_seconds: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: tmdb::DEFAULT_BASE_URL.to_string(),
            image_base_url: tmdb::DEFAULT_IMAGE_BASE_URL.to_string(),
            language: tmdb::DEFAULT_LANGUAGE.to_string(),
            timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    pub api_key: String,
    pub base_url: String,
    pub radius_meters: u32,
    pub timeout_seconds: u64,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: places::DEFAULT_BASE_URL.to_string(),
            radius_meters: 20_000,
            timeout_seconds: 15,
        }
    }
}

/// Reference point for nearby-cinema search and distance ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        // Oosthuizen, NL
        Self {
            latitude: 52.5692214,
            longitude: 4.9934757,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    pub default: String,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            default: "US".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub window_days: i64,
    /// movie id -> date the title leaves the catalog
    pub leaving: HashMap<String, NaiveDate>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_days: DEFAULT_WINDOW_DAYS,
            leaving: HashMap::new(),
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

fn is_unset(value: &str) -> bool {
    value.trim().is_empty() || env_var_pattern().is_match(value)
}

impl AppConfig {
    /// `~/.config/cinefind/config.toml`，取不到 config_dir 時退回目前目錄
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("cinefind").join("config.toml")
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TMDB_API_KEY})；未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// Empty or unresolved API keys are filled from `TMDB_API_KEY` /
    /// `PLACES_API_KEY`.
    pub fn apply_env_overrides(&mut self) {
        if is_unset(&self.tmdb.api_key) {
            if let Ok(key) = std::env::var(TMDB_API_KEY_ENV) {
                self.tmdb.api_key = key;
            }
        }
        if is_unset(&self.places.api_key) {
            if let Ok(key) = std::env::var(PLACES_API_KEY_ENV) {
                self.places.api_key = key;
            }
        }
    }

    pub fn require_tmdb_key(&self) -> Result<()> {
        if is_unset(&self.tmdb.api_key) {
            return Err(AppError::MissingConfigError {
                field: format!("tmdb.api_key (or {})", TMDB_API_KEY_ENV),
            });
        }
        validation::validate_api_key("tmdb.api_key", &self.tmdb.api_key)
    }

    pub fn require_places_key(&self) -> Result<()> {
        if is_unset(&self.places.api_key) {
            return Err(AppError::MissingConfigError {
                field: format!("places.api_key (or {})", PLACES_API_KEY_ENV),
            });
        }
        validation::validate_api_key("places.api_key", &self.places.api_key)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("tmdb.base_url", &self.tmdb.base_url)?;
        validation::validate_url("tmdb.image_base_url", &self.tmdb.image_base_url)?;
        validation::validate_url("places.base_url", &self.places.base_url)?;
        validation::validate_range("tmdb.timeout_seconds", self.tmdb.timeout_seconds, 1, 300)?;
        validation::validate_range("places.timeout_seconds", self.places.timeout_seconds, 1, 300)?;
        // Places nearby search 半徑上限 50 km
        validation::validate_range("places.radius_meters", self.places.radius_meters, 1, 50_000)?;
        validation::validate_range("location.latitude", self.location.latitude, -90.0, 90.0)?;
        validation::validate_range("location.longitude", self.location.longitude, -180.0, 180.0)?;
        validation::validate_range("notifications.window_days", self.notifications.window_days, 1, 365)?;
        validation::normalize_region_code("region.default", &self.region.default)?;

        if let Some(dir) = &self.storage.data_dir {
            validation::validate_path("storage.data_dir", &dir.to_string_lossy())?;
        }

        self.leaving_soon_policy().map(|_| ())
    }

    pub fn tmdb_timeout(&self) -> Duration {
        Duration::from_secs(self.tmdb.timeout_seconds)
    }

    pub fn places_timeout(&self) -> Duration {
        Duration::from_secs(self.places.timeout_seconds)
    }

    pub fn reference_point(&self) -> GeoPoint {
        GeoPoint::new(self.location.latitude, self.location.longitude)
    }

    /// `~/.local/share/cinefind` unless `storage.data_dir` is set.
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("cinefind"))
                .unwrap_or_else(|| PathBuf::from(".cinefind"))
        })
    }

    pub fn leaving_soon_policy(&self) -> Result<LeavingSoonPolicy> {
        let mut removal_dates = HashMap::new();
        for (id, date) in &self.notifications.leaving {
            let movie_id: MovieId =
                id.trim()
                    .parse()
                    .map_err(|_| AppError::InvalidConfigValueError {
                        field: "notifications.leaving".to_string(),
                        value: id.clone(),
                        reason: "Keys must be TMDB movie ids".to_string(),
                    })?;
            removal_dates.insert(movie_id, *date);
        }

        Ok(LeavingSoonPolicy {
            enabled: self.notifications.enabled,
            window_days: self.notifications.window_days,
            removal_dates,
        })
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
