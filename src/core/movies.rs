use crate::core::state::ScreenState;
use crate::domain::model::{Movie, MovieId, MovieList, WatchProvider};
use crate::domain::ports::MovieCatalog;

/// Everything the detail screen shows about one title.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
    pub movie: Movie,
    pub region: String,
    pub providers: Vec<WatchProvider>,
    pub watch_link: Option<String>,
}

pub struct MoviesViewModel<C: MovieCatalog> {
    repository: C,
    pub search_results: ScreenState<Vec<Movie>>,
    pub popular: ScreenState<Vec<Movie>>,
    pub now_playing: ScreenState<Vec<Movie>>,
    pub upcoming: ScreenState<Vec<Movie>>,
    pub detail: ScreenState<Option<MovieDetail>>,
}

impl<C: MovieCatalog> MoviesViewModel<C> {
    pub fn new(repository: C) -> Self {
        Self {
            repository,
            search_results: ScreenState::default(),
            popular: ScreenState::default(),
            now_playing: ScreenState::default(),
            upcoming: ScreenState::default(),
            detail: ScreenState::default(),
        }
    }

    pub fn list(&self, list: MovieList) -> &ScreenState<Vec<Movie>> {
        match list {
            MovieList::Popular => &self.popular,
            MovieList::NowPlaying => &self.now_playing,
            MovieList::Upcoming => &self.upcoming,
        }
    }

    fn list_mut(&mut self, list: MovieList) -> &mut ScreenState<Vec<Movie>> {
        match list {
            MovieList::Popular => &mut self.popular,
            MovieList::NowPlaying => &mut self.now_playing,
            MovieList::Upcoming => &mut self.upcoming,
        }
    }

    /// A blank query clears the results without calling the catalog.
    pub async fn search_movies(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.search_results = ScreenState::default();
            return;
        }
        self.search_results.begin();
        let result = self.repository.search_movies(query).await;
        self.search_results.finish(result);
    }

    pub async fn fetch_list(&mut self, list: MovieList, region: &str) {
        self.list_mut(list).begin();
        let result = self.repository.movie_list(list, Some(region)).await;
        if let Ok(movies) = &result {
            tracing::debug!("{}: {} movies for {}", list.title(), movies.len(), region);
        }
        self.list_mut(list).finish(result);
    }

    pub async fn get_popular_movies(&mut self, region: &str) {
        self.fetch_list(MovieList::Popular, region).await;
    }

    pub async fn get_now_playing_movies(&mut self, region: &str) {
        self.fetch_list(MovieList::NowPlaying, region).await;
    }

    pub async fn get_upcoming_movies(&mut self, region: &str) {
        self.fetch_list(MovieList::Upcoming, region).await;
    }

    /// The three home-screen lists, requested concurrently; each list
    /// succeeds or fails on its own.
    pub async fn load_home(&mut self, region: &str) {
        self.popular.begin();
        self.now_playing.begin();
        self.upcoming.begin();

        let (popular, now_playing, upcoming) = tokio::join!(
            self.repository.movie_list(MovieList::Popular, Some(region)),
            self.repository.movie_list(MovieList::NowPlaying, Some(region)),
            self.repository.movie_list(MovieList::Upcoming, Some(region)),
        );

        self.popular.finish(popular);
        self.now_playing.finish(now_playing);
        self.upcoming.finish(upcoming);
    }

    /// Loads the movie, then its subscription providers for `region`.
    /// When only the provider lookup fails the movie is still shown.
    pub async fn fetch_movie_detail(&mut self, movie_id: MovieId, region: &str) {
        self.detail.begin();

        let movie = match self.repository.movie_by_id(movie_id).await {
            Ok(movie) => movie,
            Err(e) => {
                self.detail.finish(Err(e));
                return;
            }
        };

        let mut detail = MovieDetail {
            movie,
            region: region.to_string(),
            providers: Vec::new(),
            watch_link: None,
        };

        match self.repository.watch_providers(movie_id).await {
            Ok(response) => {
                detail.providers = response.flatrate_for(region);
                detail.watch_link = response.link_for(region).map(str::to_string);
                self.detail.finish(Ok(Some(detail)));
            }
            Err(e) => {
                self.detail.data = Some(detail);
                self.detail.finish(Err(e));
            }
        }
    }

    /// 收藏需要完整的電影資料；失敗時錯誤留在 `detail.error`
    pub async fn fetch_movie(&mut self, movie_id: MovieId) -> Option<Movie> {
        self.detail.begin();
        match self.repository.movie_by_id(movie_id).await {
            Ok(movie) => {
                self.detail.loading = false;
                Some(movie)
            }
            Err(e) => {
                self.detail.finish(Err(e));
                None
            }
        }
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.detail.data.as_ref().map(|d| &d.movie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Country, WatchProviderResponse};
    use crate::utils::error::{AppError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubCatalog {
        fail_lists: Vec<MovieList>,
        fail_providers: bool,
        requested_regions: Mutex<Vec<Option<String>>>,
    }

    fn offline() -> AppError {
        AppError::UpstreamError {
            service: "tmdb".to_string(),
            status: "503".to_string(),
            message: "maintenance".to_string(),
        }
    }

    #[async_trait]
    impl MovieCatalog for StubCatalog {
        async fn search_movies(&self, query: &str) -> Result<Vec<Movie>> {
            Ok(vec![Movie {
                id: 1,
                title: format!("Result for {}", query),
                ..Default::default()
            }])
        }

        async fn movie_list(&self, list: MovieList, region: Option<&str>) -> Result<Vec<Movie>> {
            self.requested_regions
                .lock()
                .unwrap()
                .push(region.map(str::to_string));
            if self.fail_lists.contains(&list) {
                return Err(offline());
            }
            Ok(vec![Movie {
                id: 10,
                title: list.title().to_string(),
                ..Default::default()
            }])
        }

        async fn countries(&self) -> Result<Vec<Country>> {
            Ok(Vec::new())
        }

        async fn movie_by_id(&self, movie_id: MovieId) -> Result<Movie> {
            if movie_id == 0 {
                return Err(offline());
            }
            Ok(Movie {
                id: movie_id,
                title: "Fight Club".to_string(),
                ..Default::default()
            })
        }

        async fn watch_providers(&self, _movie_id: MovieId) -> Result<WatchProviderResponse> {
            if self.fail_providers {
                return Err(offline());
            }
            Ok(serde_json::from_value(serde_json::json!({
                "results": {
                    "NL": {
                        "link": "https://tmdb.example/watch",
                        "flatrate": [{"provider_name": "Netflix", "logo_path": "/n.png"}]
                    }
                }
            }))
            .unwrap())
        }
    }

    #[tokio::test]
    async fn test_load_home_fails_lists_independently() {
        let mut view_model = MoviesViewModel::new(StubCatalog {
            fail_lists: vec![MovieList::Upcoming],
            ..Default::default()
        });

        view_model.load_home("NL").await;

        assert_eq!(view_model.popular.data[0].title, "Popular");
        assert_eq!(view_model.now_playing.data[0].title, "Now Playing");
        assert!(view_model.upcoming.data.is_empty());
        assert!(view_model.upcoming.is_failed());
        assert!(!view_model.popular.loading);
        let regions = view_model.repository.requested_regions.lock().unwrap().clone();
        assert_eq!(regions.len(), 3);
        assert!(regions.iter().all(|r| r.as_deref() == Some("NL")));
    }

    #[tokio::test]
    async fn test_blank_search_clears_results_without_lookup() {
        let mut view_model = MoviesViewModel::new(StubCatalog::default());

        view_model.search_movies("  heat ").await;
        assert_eq!(view_model.search_results.data[0].title, "Result for heat");

        view_model.search_movies(" \t ").await;
        assert!(view_model.search_results.data.is_empty());
        assert!(!view_model.search_results.is_failed());
    }

    #[tokio::test]
    async fn test_detail_picks_region_providers() {
        let mut view_model = MoviesViewModel::new(StubCatalog::default());

        view_model.fetch_movie_detail(550, "NL").await;
        let detail = view_model.detail.data.clone().unwrap();
        assert_eq!(detail.providers[0].provider_name, "Netflix");
        assert_eq!(detail.watch_link.as_deref(), Some("https://tmdb.example/watch"));

        view_model.fetch_movie_detail(550, "US").await;
        let detail = view_model.detail.data.clone().unwrap();
        assert!(detail.providers.is_empty());
        assert_eq!(detail.region, "US");
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_movie() {
        let mut view_model = MoviesViewModel::new(StubCatalog {
            fail_providers: true,
            ..Default::default()
        });

        view_model.fetch_movie_detail(550, "NL").await;

        assert_eq!(view_model.selected_movie().unwrap().title, "Fight Club");
        assert!(view_model.detail.is_failed());
    }

    #[tokio::test]
    async fn test_movie_failure_sets_error() {
        let mut view_model = MoviesViewModel::new(StubCatalog::default());

        view_model.fetch_movie_detail(0, "NL").await;

        assert!(view_model.selected_movie().is_none());
        assert_eq!(
            view_model.detail.error.as_deref(),
            Some("Something went wrong: tmdb returned status 503: maintenance")
        );
    }

    #[tokio::test]
    async fn test_search_maps_results() {
        let mut view_model = MoviesViewModel::new(StubCatalog::default());
        view_model.search_movies("heat").await;
        assert_eq!(view_model.search_results.data[0].title, "Result for heat");
    }
}
