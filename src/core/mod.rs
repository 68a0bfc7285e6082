pub mod favourites;
pub mod leaving_soon;
pub mod movies;
pub mod places;
pub mod preferences;
pub mod providers;
pub mod settings;
pub mod state;

pub use crate::domain::model::{Favourite, Movie, MovieList, NearbyCinema};
pub use crate::domain::ports::{MovieCatalog, Notifier, PlacesCatalog, Storage};
pub use crate::utils::error::Result;
pub use state::ScreenState;
