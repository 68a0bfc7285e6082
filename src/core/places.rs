use crate::core::state::ScreenState;
use crate::domain::model::{GeoPoint, NearbyCinema, PlaceResult};
use crate::domain::ports::PlacesCatalog;

/// Mean Earth radius in meters (IUGG).
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Great-circle distance in meters (haversine).
pub fn distance_meters(from: GeoPoint, to: GeoPoint) -> f64 {
    let (lat1, lat2) = (from.lat.to_radians(), to.lat.to_radians());
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
}

/// Pairs each place with its distance from `origin` and orders them nearest
/// first. The sort is stable, so equidistant places keep the API order.
pub fn sort_by_distance(places: Vec<PlaceResult>, origin: GeoPoint) -> Vec<NearbyCinema> {
    let mut cinemas: Vec<NearbyCinema> = places
        .into_iter()
        .map(|place| {
            let distance_meters = distance_meters(origin, place.geometry.location.into());
            NearbyCinema {
                place,
                distance_meters,
            }
        })
        .collect();
    cinemas.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    cinemas
}

pub struct PlacesViewModel<P: PlacesCatalog> {
    repository: P,
    pub cinemas: ScreenState<Vec<NearbyCinema>>,
}

impl<P: PlacesCatalog> PlacesViewModel<P> {
    pub fn new(repository: P) -> Self {
        Self {
            repository,
            cinemas: ScreenState::default(),
        }
    }

    pub async fn fetch_nearby_cinemas(&mut self, location: GeoPoint, radius_meters: u32) {
        self.cinemas.begin();
        let result = self
            .repository
            .nearby_cinemas(location, radius_meters)
            .await
            .map(|places| sort_by_distance(places, location));
        self.cinemas
            .finish_with(result, |e| format!("Failed to load cinemas: {}", e));
    }
}
