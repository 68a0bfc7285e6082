use crate::domain::model::{Movie, MovieId, Notification};
use chrono::NaiveDate;
use std::collections::HashMap;

pub const CHANNEL_ID: &str = "movie_channel_id";
pub const DEFAULT_WINDOW_DAYS: i64 = 6;

#[derive(Debug, Clone)]
pub struct LeavingSoonPolicy {
    pub enabled: bool,
    pub window_days: i64,
    pub removal_dates: HashMap<MovieId, NaiveDate>,
}

impl Default for LeavingSoonPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            window_days: DEFAULT_WINDOW_DAYS,
            removal_dates: HashMap::new(),
        }
    }
}

impl LeavingSoonPolicy {
    pub fn days_left(&self, movie_id: MovieId, today: NaiveDate) -> Option<i64> {
        self.removal_dates
            .get(&movie_id)
            .map(|removal| (*removal - today).num_days())
    }

    /// A notification when the movie leaves within `1..=window_days` days.
    pub fn check(&self, movie: &Movie, today: NaiveDate) -> Option<Notification> {
        if !self.enabled {
            return None;
        }
        let days_left = self.days_left(movie.id, today)?;
        if !(1..=self.window_days).contains(&days_left) {
            return None;
        }
        Some(Notification {
            id: notification_id(&movie.title),
            channel_id: CHANNEL_ID.to_string(),
            title: "Leaving Soon!".to_string(),
            body: format!("{} is leaving in {} day(s)!", movie.title, days_left),
        })
    }
}

/// 同一部片重複通知時沿用同一個 id，讓通知被覆蓋而不是堆疊
fn notification_id(title: &str) -> i32 {
    title
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
