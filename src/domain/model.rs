use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub type MovieId = u64;

/// TMDB 的電影欄位常常缺漏或為 null，一律用預設值接住
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub release_date: String,
    pub vote_average: f32,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// Paginated envelope returned by the list and search endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MovieResponse {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieList {
    Popular,
    NowPlaying,
    Upcoming,
}

impl MovieList {
    pub fn path(&self) -> &'static str {
        match self {
            MovieList::Popular => "movie/popular",
            MovieList::NowPlaying => "movie/now_playing",
            MovieList::Upcoming => "movie/upcoming",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MovieList::Popular => "Popular",
            MovieList::NowPlaying => "Now Playing",
            MovieList::Upcoming => "Upcoming",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub iso_3166_1: String,
    pub english_name: String,
    #[serde(default)]
    pub native_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProviderResponse {
    #[serde(default)]
    pub id: Option<MovieId>,
    #[serde(default)]
    pub results: HashMap<String, WatchProviderRegion>,
}

impl WatchProviderResponse {
    /// Subscription (`flatrate`) providers for one region; empty when the
    /// region has no entry.
    pub fn flatrate_for(&self, region: &str) -> Vec<WatchProvider> {
        self.results
            .get(region)
            .and_then(|r| r.flatrate.clone())
            .unwrap_or_default()
    }

    pub fn link_for(&self, region: &str) -> Option<&str> {
        self.results.get(region).and_then(|r| r.link.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProviderRegion {
    pub link: Option<String>,
    pub flatrate: Option<Vec<WatchProvider>>,
    pub rent: Option<Vec<WatchProvider>>,
    pub buy: Option<Vec<WatchProvider>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WatchProvider {
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

/// One row of the `favourite_movies` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favourite {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: f32,
    pub overview: String,
}

impl From<&Movie> for Favourite {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            vote_average: movie.vote_average,
            overview: movie.overview.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Places API 的 `location` 參數格式: `lat,lng`
impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for GeoPoint {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected 'lat,lng', got '{}'", s))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|e| format!("invalid latitude '{}': {}", lat.trim(), e))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|e| format!("invalid longitude '{}': {}", lng.trim(), e))?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(format!("coordinates out of range: {},{}", lat, lng));
        }
        Ok(Self { lat, lng })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacesResponse {
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaceResult {
    pub name: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub vicinity: String,
    pub place_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Geometry {
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl From<Location> for GeoPoint {
    fn from(location: Location) -> Self {
        GeoPoint::new(location.lat, location.lng)
    }
}

/// A place paired with its distance from the reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyCinema {
    pub place: PlaceResult,
    pub distance_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: i32,
    pub channel_id: String,
    pub title: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_decodes_with_missing_and_null_fields() {
        let movie: Movie = serde_json::from_value(serde_json::json!({
            "id": 550,
            "title": "Fight Club",
            "poster_path": null,
            "adult": false
        }))
        .unwrap();

        assert_eq!(movie.id, 550);
        assert_eq!(movie.title, "Fight Club");
        assert_eq!(movie.poster_path, None);
        assert_eq!(movie.release_date, "");
        assert_eq!(movie.vote_average, 0.0);
    }

    #[test]
    fn test_flatrate_for_missing_region_is_empty() {
        let response: WatchProviderResponse = serde_json::from_value(serde_json::json!({
            "id": 550,
            "results": {
                "NL": {
                    "link": "https://www.themoviedb.org/movie/550/watch?locale=NL",
                    "flatrate": [{"provider_name": "Netflix", "logo_path": "/n.jpg"}]
                },
                "US": { "rent": [{"provider_name": "Apple TV", "logo_path": "/a.jpg"}] }
            }
        }))
        .unwrap();

        assert_eq!(response.flatrate_for("NL").len(), 1);
        assert!(response.flatrate_for("US").is_empty());
        assert!(response.flatrate_for("DE").is_empty());
        assert!(response.link_for("NL").is_some());
    }

    #[test]
    fn test_geo_point_parse_and_display() {
        let point: GeoPoint = "52.5692214, 4.9934757".parse().unwrap();
        assert_eq!(point, GeoPoint::new(52.5692214, 4.9934757));
        assert_eq!(point.to_string(), "52.5692214,4.9934757");

        assert!("52.5".parse::<GeoPoint>().is_err());
        assert!("abc,4.9".parse::<GeoPoint>().is_err());
        assert!("95.0,4.9".parse::<GeoPoint>().is_err());
    }

    #[test]
    fn test_favourite_from_movie() {
        let movie = Movie {
            id: 27205,
            title: "Inception".to_string(),
            vote_average: 8.4,
            overview: "Dreams within dreams.".to_string(),
            poster_path: Some("/inception.jpg".to_string()),
            ..Default::default()
        };

        let favourite = Favourite::from(&movie);
        assert_eq!(favourite.id, 27205);
        assert_eq!(favourite.poster_path.as_deref(), Some("/inception.jpg"));
        assert_eq!(favourite.vote_average, 8.4);
    }
}
