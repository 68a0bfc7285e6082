//! The local `favourite_movies` table and its view-state holder.
//!
//! The table is a JSON document kept through the [`Storage`] port. Rows are
//! kept ordered by id and ids are unique; every read-modify-write cycle runs
//! under one async mutex so concurrent toggles inside the process cannot
//! lose updates.

use crate::core::state::ScreenState;
use crate::domain::model::{Favourite, Movie, MovieId};
use crate::domain::ports::Storage;
use crate::utils::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub const FAVOURITES_FILE: &str = "favourites.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FavouriteTable {
    favourite_movies: Vec<Favourite>,
}

impl FavouriteTable {
    fn position(&self, id: MovieId) -> std::result::Result<usize, usize> {
        self.favourite_movies.binary_search_by_key(&id, |f| f.id)
    }

    fn contains(&self, id: MovieId) -> bool {
        self.position(id).is_ok()
    }

    fn insert(&mut self, favourite: Favourite) -> Result<()> {
        match self.position(favourite.id) {
            Ok(_) => Err(AppError::DuplicateFavourite { id: favourite.id }),
            Err(pos) => {
                self.favourite_movies.insert(pos, favourite);
                Ok(())
            }
        }
    }

    fn remove(&mut self, id: MovieId) -> bool {
        match self.position(id) {
            Ok(pos) => {
                self.favourite_movies.remove(pos);
                true
            }
            Err(_) => false,
        }
    }
}

pub struct FavouriteRepository<S: Storage> {
    storage: S,
    write_lock: Mutex<()>,
}

impl<S: Storage> FavouriteRepository<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<FavouriteTable> {
        match self.storage.read_file(FAVOURITES_FILE).await {
            Ok(bytes) => {
                let mut table: FavouriteTable = serde_json::from_slice(&bytes)?;
                // 手動編輯過的檔案可能沒排序
                table.favourite_movies.sort_by_key(|f| f.id);
                table.favourite_movies.dedup_by_key(|f| f.id);
                Ok(table)
            }
            Err(AppError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(FavouriteTable::default())
            }
            Err(e) => Err(e),
        }
    }

    async fn save(&self, table: &FavouriteTable) -> Result<()> {
        let data = serde_json::to_vec_pretty(table)?;
        self.storage.write_file(FAVOURITES_FILE, &data).await
    }

    pub async fn favourites(&self) -> Result<Vec<Favourite>> {
        Ok(self.load().await?.favourite_movies)
    }

    pub async fn insert(&self, favourite: Favourite) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.load().await?;
        let id = favourite.id;
        table.insert(favourite)?;
        self.save(&table).await?;
        tracing::info!("Added movie {} to favourites", id);
        Ok(())
    }

    /// Removes the row with the same id. Returns `false` when there was none.
    pub async fn delete(&self, favourite: &Favourite) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.load().await?;
        if !table.remove(favourite.id) {
            return Ok(false);
        }
        self.save(&table).await?;
        tracing::info!("Removed movie {} from favourites", favourite.id);
        Ok(true)
    }

    pub async fn is_favourite(&self, movie_id: MovieId) -> Result<bool> {
        Ok(self.load().await?.contains(movie_id))
    }

    /// Deletes the movie when it is a favourite, inserts it otherwise.
    /// Returns the new favourite status.
    pub async fn toggle(&self, movie: &Movie) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.load().await?;
        let now_favourite = if table.remove(movie.id) {
            false
        } else {
            table.insert(Favourite::from(movie))?;
            true
        };
        self.save(&table).await?;
        tracing::info!("Movie {} favourite: {}", movie.id, now_favourite);
        Ok(now_favourite)
    }
}

pub struct FavouriteViewModel<S: Storage> {
    repository: FavouriteRepository<S>,
    pub favourites: ScreenState<Vec<Favourite>>,
}

impl<S: Storage> FavouriteViewModel<S> {
    pub fn new(storage: S) -> Self {
        Self {
            repository: FavouriteRepository::new(storage),
            favourites: ScreenState::default(),
        }
    }

    pub fn repository(&self) -> &FavouriteRepository<S> {
        &self.repository
    }

    pub async fn load_favourites(&mut self) {
        self.favourites.begin();
        let result = self.repository.favourites().await;
        self.favourites.finish(result);
    }

    /// Flips the favourite flag and refreshes the list. `None` on failure,
    /// with the message left in `favourites.error`.
    pub async fn toggle_favourite(&mut self, movie: &Movie) -> Option<bool> {
        self.favourites.begin();
        match self.repository.toggle(movie).await {
            Ok(status) => {
                let result = self.repository.favourites().await;
                self.favourites.finish(result);
                Some(status)
            }
            Err(e) => {
                self.favourites.finish(Err(e));
                None
            }
        }
    }

    pub async fn is_movie_favourite(&self, movie_id: MovieId) -> bool {
        match self.repository.is_favourite(movie_id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Favourite lookup for {} failed: {}", movie_id, e);
                false
            }
        }
    }
}
