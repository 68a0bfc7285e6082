use crate::adapters::tmdb::parse_base_url;
use crate::domain::model::{GeoPoint, PlaceResult, PlacesResponse};
use crate::domain::ports::PlacesCatalog;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";
pub const MOVIE_THEATER_TYPE: &str = "movie_theater";

#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl PlacesClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: parse_base_url("places.base_url", base_url)?,
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl PlacesCatalog for PlacesClient {
    async fn nearby_cinemas(
        &self,
        location: GeoPoint,
        radius_meters: u32,
    ) -> Result<Vec<PlaceResult>> {
        let url = self
            .base_url
            .join("nearbysearch/json")
            .map_err(|e| AppError::ConfigError {
                message: format!("cannot build Places URL: {}", e),
            })?;

        tracing::debug!("Searching cinemas within {}m of {}", radius_meters, location);
        let response: PlacesResponse = self
            .client
            .get(url)
            .query(&[
                ("key", self.api_key.clone()),
                ("location", location.to_string()),
                ("radius", radius_meters.to_string()),
                ("type", MOVIE_THEATER_TYPE.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Places 的錯誤是 200 + status 欄位
        match response.status.as_str() {
            "OK" | "ZERO_RESULTS" => {
                tracing::debug!("Cinemas fetched: {} results", response.results.len());
                Ok(response.results)
            }
            status => Err(AppError::UpstreamError {
                service: "places".to_string(),
                status: status.to_string(),
                message: response
                    .error_message
                    .unwrap_or_else(|| "no error message".to_string()),
            }),
        }
    }
}
