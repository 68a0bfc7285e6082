use crate::app::render;
use crate::core::favourites::FavouriteViewModel;
use crate::core::leaving_soon::LeavingSoonPolicy;
use crate::core::movies::MoviesViewModel;
use crate::core::places::PlacesViewModel;
use crate::core::settings::{resolve_region, SettingsViewModel};
use crate::domain::model::{Favourite, GeoPoint, MovieId, MovieList};
use crate::domain::ports::{MovieCatalog, Notifier, PlacesCatalog, Storage};
use crate::utils::error::Result;
use crate::utils::validation::normalize_region_code;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Home,
    List(MovieList),
    Search { query: String },
    Info { movie_id: MovieId, show_cinemas: bool },
    Cinemas {
        location: Option<GeoPoint>,
        radius_meters: Option<u32>,
    },
    Favourites(FavouriteAction),
    Region(RegionAction),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FavouriteAction {
    List,
    Toggle(MovieId),
    Add(MovieId),
    Remove(MovieId),
    Check(MovieId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegionAction {
    Show,
    Set(String),
    List,
}

impl Screen {
    pub fn needs_movie_catalog(&self) -> bool {
        match self {
            // toggle 只有在新增時才查 TMDB，移除完全在本機
            Screen::Favourites(action) => matches!(action, FavouriteAction::Add(_)),
            Screen::Region(action) => matches!(action, RegionAction::List),
            Screen::Cinemas { .. } => false,
            _ => true,
        }
    }

    pub fn needs_places_catalog(&self) -> bool {
        matches!(
            self,
            Screen::Cinemas { .. } | Screen::Info { show_cinemas: true, .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub region_override: Option<String>,
    pub default_region: String,
    pub reference_point: GeoPoint,
    pub radius_meters: u32,
    pub image_base_url: String,
    pub leaving_soon: LeavingSoonPolicy,
    pub today: NaiveDate,
}

/// Rendered screen text plus whether any section ended in an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenOutput {
    pub text: String,
    pub failed: bool,
}

impl ScreenOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            failed: false,
        }
    }
}

pub struct App<C, P, S, N>
where
    C: MovieCatalog + Clone,
    P: PlacesCatalog,
    S: Storage + Clone,
    N: Notifier,
{
    movies: MoviesViewModel<C>,
    places: PlacesViewModel<P>,
    favourites: FavouriteViewModel<S>,
    settings: SettingsViewModel<C, S>,
    notifier: N,
    options: AppOptions,
}

impl<C, P, S, N> App<C, P, S, N>
where
    C: MovieCatalog + Clone,
    P: PlacesCatalog,
    S: Storage + Clone,
    N: Notifier,
{
    pub fn new(catalog: C, places: P, storage: S, notifier: N, options: AppOptions) -> Self {
        Self {
            movies: MoviesViewModel::new(catalog.clone()),
            places: PlacesViewModel::new(places),
            favourites: FavouriteViewModel::new(storage.clone()),
            settings: SettingsViewModel::new(catalog, storage),
            notifier,
            options,
        }
    }

    async fn region(&mut self) -> Result<String> {
        self.settings.observe_saved_country().await?;
        resolve_region(
            self.options.region_override.as_deref(),
            self.settings.selected_country.as_deref(),
            &self.options.default_region,
        )
    }

    pub async fn show(&mut self, screen: Screen) -> Result<ScreenOutput> {
        tracing::debug!("Showing screen {:?}", screen);
        if let Some(code) = &self.options.region_override {
            normalize_region_code("--region", code)?;
        }
        match screen {
            Screen::Home => self.home().await,
            Screen::List(list) => self.list(list).await,
            Screen::Search { query } => self.search(&query).await,
            Screen::Info {
                movie_id,
                show_cinemas,
            } => self.info(movie_id, show_cinemas).await,
            Screen::Cinemas {
                location,
                radius_meters,
            } => Ok(self.cinemas(location, radius_meters).await),
            Screen::Favourites(action) => self.favourites(action).await,
            Screen::Region(action) => self.region_screen(action).await,
        }
    }

    async fn home(&mut self) -> Result<ScreenOutput> {
        let region = self.region().await?;
        self.movies.load_home(&region).await;

        let mut text = String::new();
        let mut failed = false;
        for list in [MovieList::Popular, MovieList::NowPlaying, MovieList::Upcoming] {
            let state = self.movies.list(list);
            failed |= state.is_failed();
            text.push_str(&render::render_movie_list(
                &format!("{} ({})", list.title(), region),
                state,
            ));
            text.push('\n');
        }
        Ok(ScreenOutput { text, failed })
    }

    async fn list(&mut self, list: MovieList) -> Result<ScreenOutput> {
        let region = self.region().await?;
        self.movies.fetch_list(list, &region).await;
        let state = self.movies.list(list);
        Ok(ScreenOutput {
            text: render::render_movie_list(&format!("{} ({})", list.title(), region), state),
            failed: state.is_failed(),
        })
    }

    async fn search(&mut self, query: &str) -> Result<ScreenOutput> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(ScreenOutput::ok(
                "== Search ==\n  (enter a title to search)\n".to_string(),
            ));
        }
        self.movies.search_movies(query).await;
        let state = &self.movies.search_results;
        Ok(ScreenOutput {
            text: render::render_movie_list(&format!("Search: {}", query), state),
            failed: state.is_failed(),
        })
    }

    async fn info(&mut self, movie_id: MovieId, show_cinemas: bool) -> Result<ScreenOutput> {
        let region = self.region().await?;
        self.movies.fetch_movie_detail(movie_id, &region).await;

        let mut text = String::new();
        let mut failed = self.movies.detail.is_failed();

        if let Some(detail) = &self.movies.detail.data {
            let is_favourite = self.favourites.is_movie_favourite(movie_id).await;
            text.push_str(&render::render_detail(
                detail,
                is_favourite,
                &self.options.image_base_url,
            ));

            if let Some(notification) = self
                .options
                .leaving_soon
                .check(&detail.movie, self.options.today)
            {
                if let Err(e) = self.notifier.notify(&notification) {
                    tracing::warn!("Failed to post notification: {}", e);
                }
            }
        }
        if let Some(error) = &self.movies.detail.error {
            text.push_str(&format!("❌ {}\n", error));
        }

        if show_cinemas {
            let cinemas = self.cinemas(None, None).await;
            failed |= cinemas.failed;
            text.push('\n');
            text.push_str(&cinemas.text);
        }
        Ok(ScreenOutput { text, failed })
    }

    async fn cinemas(&mut self, location: Option<GeoPoint>, radius: Option<u32>) -> ScreenOutput {
        let location = location.unwrap_or(self.options.reference_point);
        let radius = radius.unwrap_or(self.options.radius_meters);
        self.places.fetch_nearby_cinemas(location, radius).await;
        ScreenOutput {
            text: render::render_cinemas(&self.places.cinemas),
            failed: self.places.cinemas.is_failed(),
        }
    }

    async fn favourites(&mut self, action: FavouriteAction) -> Result<ScreenOutput> {
        match action {
            FavouriteAction::List => {
                self.favourites.load_favourites().await;
                let state = &self.favourites.favourites;
                Ok(ScreenOutput {
                    text: render::render_favourites(state),
                    failed: state.is_failed(),
                })
            }
            FavouriteAction::Toggle(movie_id) => {
                if let Some(removed) = self.remove_stored(movie_id).await? {
                    return Ok(ScreenOutput::ok(format!(
                        "♡ Removed {} from favourites\n",
                        removed.title
                    )));
                }
                let Some(movie) = self.movies.fetch_movie(movie_id).await else {
                    return Ok(self.detail_failure());
                };
                match self.favourites.toggle_favourite(&movie).await {
                    Some(true) => Ok(ScreenOutput::ok(format!("♥ Added {} to favourites\n", movie.title))),
                    Some(false) => Ok(ScreenOutput::ok(format!(
                        "♡ Removed {} from favourites\n",
                        movie.title
                    ))),
                    None => Ok(ScreenOutput {
                        text: render::render_favourites(&self.favourites.favourites),
                        failed: true,
                    }),
                }
            }
            FavouriteAction::Add(movie_id) => {
                let Some(movie) = self.movies.fetch_movie(movie_id).await else {
                    return Ok(self.detail_failure());
                };
                self.favourites
                    .repository()
                    .insert(Favourite::from(&movie))
                    .await?;
                Ok(ScreenOutput::ok(format!("♥ Added {} to favourites\n", movie.title)))
            }
            FavouriteAction::Remove(movie_id) => match self.remove_stored(movie_id).await? {
                Some(favourite) => Ok(ScreenOutput::ok(format!(
                    "♡ Removed {} from favourites\n",
                    favourite.title
                ))),
                None => Ok(ScreenOutput::ok(format!(
                    "Movie {} is not a favourite\n",
                    movie_id
                ))),
            },
            FavouriteAction::Check(movie_id) => {
                let found = self.favourites.repository().is_favourite(movie_id).await?;
                Ok(ScreenOutput::ok(format!(
                    "Movie {} is {}a favourite\n",
                    movie_id,
                    if found { "" } else { "not " }
                )))
            }
        }
    }

    /// Deletes the stored record for `movie_id`, if any, without touching TMDB.
    async fn remove_stored(&self, movie_id: MovieId) -> Result<Option<Favourite>> {
        let stored = self.favourites.repository().favourites().await?;
        match stored.into_iter().find(|f| f.id == movie_id) {
            Some(favourite) => {
                self.favourites.repository().delete(&favourite).await?;
                Ok(Some(favourite))
            }
            None => Ok(None),
        }
    }

    fn detail_failure(&self) -> ScreenOutput {
        ScreenOutput {
            text: format!(
                "❌ {}\n",
                self.movies.detail.error.as_deref().unwrap_or("Unknown error")
            ),
            failed: true,
        }
    }

    async fn region_screen(&mut self, action: RegionAction) -> Result<ScreenOutput> {
        match action {
            RegionAction::Show => {
                let region = self.region().await?;
                let source = if self.options.region_override.is_some() {
                    "command line"
                } else if self.settings.selected_country.is_some() {
                    "saved preference"
                } else {
                    "default"
                };
                Ok(ScreenOutput::ok(format!("Region: {} ({})\n", region, source)))
            }
            RegionAction::Set(code) => {
                let code = self.settings.set_selected_country(&code).await?;
                Ok(ScreenOutput::ok(format!("Region set to {}\n", code)))
            }
            RegionAction::List => {
                self.settings.observe_saved_country().await?;
                self.settings.get_countries().await;
                Ok(ScreenOutput {
                    text: render::render_countries(
                        &self.settings.countries,
                        self.settings.selected_country.as_deref(),
                    ),
                    failed: self.settings.countries.is_empty(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_keys_needed_per_screen() {
        assert!(Screen::Home.needs_movie_catalog());
        assert!(Screen::Favourites(FavouriteAction::Add(550)).needs_movie_catalog());
        assert!(!Screen::Favourites(FavouriteAction::Toggle(550)).needs_movie_catalog());
        assert!(!Screen::Favourites(FavouriteAction::Remove(550)).needs_movie_catalog());
        assert!(!Screen::Region(RegionAction::Set("NL".to_string())).needs_movie_catalog());

        let cinemas = Screen::Cinemas {
            location: None,
            radius_meters: None,
        };
        assert!(!cinemas.needs_movie_catalog());
        assert!(cinemas.needs_places_catalog());
        assert!(!Screen::Info {
            movie_id: 550,
            show_cinemas: false
        }
        .needs_places_catalog());
    }
}
