use crate::app::{FavouriteAction, RegionAction, Screen};
use crate::domain::model::{GeoPoint, MovieId, MovieList};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cinefind")]
#[command(about = "Browse movies, streaming providers and nearby cinemas")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Region code (ISO 3166-1 alpha-2) overriding the saved preference
    #[arg(short, long, global = true)]
    pub region: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Popular, now playing and upcoming movies
    Home,
    Popular,
    NowPlaying,
    Upcoming,
    /// Search movies by title
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Movie detail with streaming providers and nearby cinemas
    Info {
        movie_id: MovieId,
        #[arg(long)]
        no_cinemas: bool,
    },
    /// Cinemas near a location, nearest first
    Cinemas {
        /// `lat,lng`; defaults to the configured reference point
        #[arg(long)]
        location: Option<GeoPoint>,
        /// Search radius in meters
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=50_000))]
        radius: Option<u32>,
    },
    /// Manage locally saved favourites
    #[command(visible_alias = "favorites")]
    Favourites {
        #[command(subcommand)]
        action: FavouritesCommand,
    },
    /// Show, set or list regions
    Region {
        #[command(subcommand)]
        action: RegionCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum FavouritesCommand {
    List,
    Toggle { movie_id: MovieId },
    Add { movie_id: MovieId },
    Remove { movie_id: MovieId },
    Check { movie_id: MovieId },
}

#[derive(Debug, Clone, Subcommand)]
pub enum RegionCommand {
    Show,
    Set { code: String },
    List,
}

impl Command {
    pub fn into_screen(self) -> Screen {
        match self {
            Command::Home => Screen::Home,
            Command::Popular => Screen::List(MovieList::Popular),
            Command::NowPlaying => Screen::List(MovieList::NowPlaying),
            Command::Upcoming => Screen::List(MovieList::Upcoming),
            Command::Search { query } => Screen::Search {
                query: query.join(" "),
            },
            Command::Info {
                movie_id,
                no_cinemas,
            } => Screen::Info {
                movie_id,
                show_cinemas: !no_cinemas,
            },
            Command::Cinemas { location, radius } => Screen::Cinemas {
                location,
                radius_meters: radius,
            },
            Command::Favourites { action } => Screen::Favourites(match action {
                FavouritesCommand::List => FavouriteAction::List,
                FavouritesCommand::Toggle { movie_id } => FavouriteAction::Toggle(movie_id),
                FavouritesCommand::Add { movie_id } => FavouriteAction::Add(movie_id),
                FavouritesCommand::Remove { movie_id } => FavouriteAction::Remove(movie_id),
                FavouritesCommand::Check { movie_id } => FavouriteAction::Check(movie_id),
            }),
            Command::Region { action } => Screen::Region(match action {
                RegionCommand::Show => RegionAction::Show,
                RegionCommand::Set { code } => RegionAction::Set(code),
                RegionCommand::List => RegionAction::List,
            }),
        }
    }
}
