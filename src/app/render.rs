use crate::adapters::tmdb::{image_url, LOGO_SIZE, POSTER_SIZE};
use crate::core::movies::MovieDetail;
use crate::core::providers::subscription_price;
use crate::core::ScreenState;
use crate::domain::model::{Country, Favourite, Movie, NearbyCinema};
use std::fmt::Write;

fn year(release_date: &str) -> Option<&str> {
    release_date.get(..4).filter(|y| y.chars().all(|c| c.is_ascii_digit()))
}

pub fn format_distance(meters: f64) -> String {
    if meters < 1_000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.1} km", meters / 1_000.0)
    }
}

pub fn movie_line(movie: &Movie) -> String {
    match year(&movie.release_date) {
        Some(y) => format!(
            "[{}] {} ({}) ★ {:.1}",
            movie.id, movie.title, y, movie.vote_average
        ),
        None => format!("[{}] {} ★ {:.1}", movie.id, movie.title, movie.vote_average),
    }
}

fn push_error(out: &mut String, error: &Option<String>) {
    if let Some(message) = error {
        let _ = writeln!(out, "  ❌ {}", message);
    }
}

pub fn render_movie_list(heading: &str, state: &ScreenState<Vec<Movie>>) -> String {
    let mut out = format!("== {} ==\n", heading);
    for movie in &state.data {
        let _ = writeln!(out, "  {}", movie_line(movie));
    }
    if state.data.is_empty() && state.error.is_none() {
        out.push_str("  (no movies)\n");
    }
    push_error(&mut out, &state.error);
    out
}

pub fn render_detail(
    detail: &MovieDetail,
    is_favourite: bool,
    image_base_url: &str,
) -> String {
    let movie = &detail.movie;
    let mut out = String::new();
    let marker = if is_favourite { "♥" } else { "♡" };

    let _ = writeln!(out, "{} {}", marker, movie.title);
    if !movie.release_date.is_empty() {
        let _ = writeln!(out, "Release date: {}", movie.release_date);
    }
    let _ = writeln!(out, "Rating: {:.1}", movie.vote_average);
    if let Some(poster) = &movie.poster_path {
        let _ = writeln!(out, "Poster: {}", image_url(image_base_url, POSTER_SIZE, poster));
    }
    if !movie.overview.is_empty() {
        let _ = writeln!(out, "\n{}\n", movie.overview);
    }

    let _ = writeln!(out, "Streaming in {}:", detail.region);
    if detail.providers.is_empty() {
        out.push_str("  (no subscription providers)\n");
    }
    for provider in &detail.providers {
        let price = subscription_price(&provider.provider_name)
            .map(|p| format!(" ({})", p))
            .unwrap_or_default();
        let _ = write!(out, "  - {}{}", provider.provider_name, price);
        if let Some(logo) = &provider.logo_path {
            let _ = write!(out, "  {}", image_url(image_base_url, LOGO_SIZE, logo));
        }
        out.push('\n');
    }
    if let Some(link) = &detail.watch_link {
        let _ = writeln!(out, "Where to watch: {}", link);
    }
    out
}

pub fn render_cinemas(state: &ScreenState<Vec<NearbyCinema>>) -> String {
    let mut out = String::from("== Nearby cinemas ==\n");
    for (i, cinema) in state.data.iter().enumerate() {
        let _ = write!(
            out,
            "  {}. {} ({})",
            i + 1,
            cinema.place.name,
            format_distance(cinema.distance_meters)
        );
        if !cinema.place.vicinity.is_empty() {
            let _ = write!(out, ", {}", cinema.place.vicinity);
        }
        out.push('\n');
    }
    if state.data.is_empty() && state.error.is_none() {
        out.push_str("  (no cinemas found)\n");
    }
    push_error(&mut out, &state.error);
    out
}

pub fn render_favourites(state: &ScreenState<Vec<Favourite>>) -> String {
    let mut out = String::from("== Favourites ==\n");
    for favourite in &state.data {
        let _ = writeln!(
            out,
            "  ♥ [{}] {} ★ {:.1}",
            favourite.id, favourite.title, favourite.vote_average
        );
    }
    if state.data.is_empty() && state.error.is_none() {
        out.push_str("  (no favourites yet)\n");
    }
    push_error(&mut out, &state.error);
    out
}

pub fn render_countries(countries: &[Country], selected: Option<&str>) -> String {
    let mut out = String::from("== Regions ==\n");
    if countries.is_empty() {
        out.push_str("  (country list unavailable)\n");
    }
    for country in countries {
        let marker = if Some(country.iso_3166_1.as_str()) == selected {
            "*"
        } else {
            " "
        };
        let _ = writeln!(out, " {} {}  {}", marker, country.iso_3166_1, country.english_name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Geometry, Location, PlaceResult, WatchProvider};

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(850.4), "850 m");
        assert_eq!(format_distance(2_345.0), "2.3 km");
    }

    #[test]
    fn test_movie_line_with_and_without_year() {
        let mut movie = Movie {
            id: 603,
            title: "The Matrix".to_string(),
            release_date: "1999-03-30".to_string(),
            vote_average: 8.2,
            ..Default::default()
        };
        assert_eq!(movie_line(&movie), "[603] The Matrix (1999) ★ 8.2");

        movie.release_date.clear();
        assert_eq!(movie_line(&movie), "[603] The Matrix ★ 8.2");
    }

    #[test]
    fn test_list_shows_error_and_empty_marker() {
        let empty: ScreenState<Vec<Movie>> = ScreenState::default();
        assert!(render_movie_list("Popular", &empty).contains("(no movies)"));

        let failed: ScreenState<Vec<Movie>> = ScreenState {
            error: Some("Request timed out. Please try again later.".to_string()),
            ..Default::default()
        };
        let text = render_movie_list("Popular", &failed);
        assert!(text.contains("❌ Request timed out"));
        assert!(!text.contains("(no movies)"));
    }

    #[test]
    fn test_detail_lists_prices_and_images() {
        let detail = MovieDetail {
            movie: Movie {
                id: 550,
                title: "Fight Club".to_string(),
                poster_path: Some("/fc.jpg".to_string()),
                ..Default::default()
            },
            region: "US".to_string(),
            providers: vec![WatchProvider {
                provider_name: "Hulu".to_string(),
                logo_path: Some("/hulu.png".to_string()),
            }],
            watch_link: None,
        };

        let text = render_detail(&detail, true, "https://image.tmdb.org/t/p/");

        assert!(text.starts_with("♥ Fight Club"));
        assert!(text.contains("https://image.tmdb.org/t/p/w500/fc.jpg"));
        assert!(text.contains("- Hulu ($7.99/mo)  https://image.tmdb.org/t/p/w92/hulu.png"));
    }

    #[test]
    fn test_cinemas_numbered_in_order() {
        let state = ScreenState {
            data: vec![NearbyCinema {
                place: PlaceResult {
                    name: "Pathé Zaandam".to_string(),
                    geometry: Geometry {
                        location: Location { lat: 0.0, lng: 0.0 },
                    },
                    vicinity: "Zaandam".to_string(),
                    place_id: "p1".to_string(),
                },
                distance_meters: 15_200.0,
            }],
            ..Default::default()
        };

        assert_eq!(
            render_cinemas(&state),
            "== Nearby cinemas ==\n  1. Pathé Zaandam (15.2 km), Zaandam\n"
        );
    }
}
