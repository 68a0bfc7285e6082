use crate::domain::model::{
    Country, GeoPoint, Movie, MovieId, MovieList, Notification, PlaceResult,
    WatchProviderResponse,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Raw byte storage under a base location. Missing files surface as
/// `std::io::ErrorKind::NotFound`.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Movie metadata, search and streaming-provider lookups.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>>;
    async fn movie_list(&self, list: MovieList, region: Option<&str>) -> Result<Vec<Movie>>;
    async fn countries(&self) -> Result<Vec<Country>>;
    async fn movie_by_id(&self, movie_id: MovieId) -> Result<Movie>;
    async fn watch_providers(&self, movie_id: MovieId) -> Result<WatchProviderResponse>;
}

#[async_trait]
pub trait PlacesCatalog: Send + Sync {
    async fn nearby_cinemas(&self, location: GeoPoint, radius_meters: u32)
        -> Result<Vec<PlaceResult>>;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<()>;
}
