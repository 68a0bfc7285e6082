// Screens: each CLI subcommand drives one or more view-state holders and
// renders their state as text.

pub mod render;
pub mod screens;

pub use screens::{App, AppOptions, FavouriteAction, RegionAction, Screen, ScreenOutput};
