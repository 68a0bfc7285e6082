//! HTTP client for The Movie Database (TMDB) v3 API.
//!
//! Every request carries the `api_key` query parameter; list and detail
//! requests also carry `language`. Non-2xx responses are turned into errors
//! with `error_for_status` and propagated unchanged.

use crate::domain::model::{
    Country, Movie, MovieId, MovieList, MovieResponse, WatchProviderResponse,
};
use crate::domain::ports::MovieCatalog;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";
pub const DEFAULT_LANGUAGE: &str = "en-US";

pub const POSTER_SIZE: &str = "w500";
pub const LOGO_SIZE: &str = "w92";

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: Url,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(base_url: &str, api_key: &str, language: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: parse_base_url("tmdb.base_url", base_url)?,
            api_key: api_key.to_string(),
            language: language.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::ConfigError {
                message: format!("cannot build TMDB URL for '{}': {}", path, e),
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        tracing::debug!("TMDB response status: {}", response.status());
        let body = response.error_for_status()?.json::<T>().await?;
        Ok(body)
    }
}

/// `Url::join` 會吃掉最後一段沒有 `/` 結尾的路徑，所以先補上
pub(crate) fn parse_base_url(field: &str, raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).map_err(|e| AppError::InvalidConfigValueError {
        field: field.to_string(),
        value: raw.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })
}

/// `{image_base}{size}{path}`, e.g. `https://image.tmdb.org/t/p/w500/abc.jpg`.
pub fn image_url(image_base: &str, size: &str, path: &str) -> String {
    format!("{}/{}{}", image_base.trim_end_matches('/'), size, path)
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>> {
        let response: MovieResponse = self.get_json("search/movie", &[("query", query)]).await?;
        tracing::debug!(
            "Search '{}' returned {} of {} results",
            query,
            response.results.len(),
            response.total_results
        );
        Ok(response.results)
    }

    async fn movie_list(&self, list: MovieList, region: Option<&str>) -> Result<Vec<Movie>> {
        let mut query = vec![("language", self.language.as_str())];
        if let Some(region) = region {
            query.push(("region", region));
        }
        let response: MovieResponse = self.get_json(list.path(), &query).await?;
        Ok(response.results)
    }

    async fn countries(&self) -> Result<Vec<Country>> {
        self.get_json("configuration/countries", &[]).await
    }

    async fn movie_by_id(&self, movie_id: MovieId) -> Result<Movie> {
        let path = format!("movie/{}", movie_id);
        self.get_json(&path, &[("language", self.language.as_str())])
            .await
    }

    async fn watch_providers(&self, movie_id: MovieId) -> Result<WatchProviderResponse> {
        let path = format!("movie/{}/watch/providers", movie_id);
        self.get_json(&path, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> TmdbClient {
        TmdbClient::new(&server.base_url(), "test-key", "en-US", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_movie_list_sends_region_and_language() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/movie/now_playing")
                .query_param("api_key", "test-key")
                .query_param("language", "en-US")
                .query_param("region", "NL");
            then.status(200).json_body(serde_json::json!({
                "page": 1,
                "results": [
                    {"id": 1, "title": "Dune: Part Two", "vote_average": 8.2},
                    {"id": 2, "title": "Civil War", "vote_average": 7.0}
                ],
                "total_pages": 1,
                "total_results": 2
            }));
        });

        let movies = client_for(&server)
            .movie_list(MovieList::NowPlaying, Some("NL"))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "Dune: Part Two");
    }

    #[tokio::test]
    async fn test_search_sends_query() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search/movie")
                .query_param("api_key", "test-key")
                .query_param("query", "the matrix");
            then.status(200)
                .json_body(serde_json::json!({"results": [{"id": 603, "title": "The Matrix"}]}));
        });

        let movies = client_for(&server).search_movies("the matrix").await.unwrap();

        api_mock.assert();
        assert_eq!(movies[0].id, 603);
    }

    #[tokio::test]
    async fn test_movie_by_id_and_providers_paths() {
        let server = MockServer::start();
        let detail_mock = server.mock(|when, then| {
            when.method(GET).path("/movie/550");
            then.status(200)
                .json_body(serde_json::json!({"id": 550, "title": "Fight Club"}));
        });
        let providers_mock = server.mock(|when, then| {
            when.method(GET).path("/movie/550/watch/providers");
            then.status(200).json_body(serde_json::json!({
                "id": 550,
                "results": {"US": {"flatrate": [{"provider_name": "Hulu", "logo_path": "/h.jpg"}]}}
            }));
        });

        let client = client_for(&server);
        let movie = client.movie_by_id(550).await.unwrap();
        let providers = client.watch_providers(550).await.unwrap();

        detail_mock.assert();
        providers_mock.assert();
        assert_eq!(movie.title, "Fight Club");
        assert_eq!(providers.flatrate_for("US")[0].provider_name, "Hulu");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/configuration/countries");
            then.status(401)
                .json_body(serde_json::json!({"status_message": "Invalid API key"}));
        });

        let err = client_for(&server).countries().await.unwrap_err();
        assert!(matches!(err, AppError::ApiError(ref e) if e.is_status()));
        assert!(err.user_friendly_message().starts_with("Something went wrong:"));
    }

    #[test]
    fn test_base_url_without_trailing_slash_keeps_last_segment() {
        let url = parse_base_url("tmdb.base_url", "https://api.themoviedb.org/3").unwrap();
        assert_eq!(
            url.join("movie/popular").unwrap().as_str(),
            "https://api.themoviedb.org/3/movie/popular"
        );
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url(DEFAULT_IMAGE_BASE_URL, POSTER_SIZE, "/abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            image_url("https://img.example", LOGO_SIZE, "/n.png"),
            "https://img.example/w92/n.png"
        );
    }
}
