pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ConsoleNotifier, LocalStorage, PlacesClient, TmdbClient};
pub use app::{App, AppOptions, Screen, ScreenOutput};
pub use config::AppConfig;
pub use utils::error::{AppError, Result};
