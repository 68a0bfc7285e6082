// Adapters layer: concrete implementations of the domain ports.

pub mod notifier;
pub mod places;
pub mod storage;
pub mod tmdb;

pub use notifier::ConsoleNotifier;
pub use places::PlacesClient;
pub use storage::LocalStorage;
pub use tmdb::TmdbClient;
