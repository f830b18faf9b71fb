use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::calendar::{CalendarEvent, MAX_UPCOMING_EVENTS};

#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Single-occurrence events from the primary calendar starting at or after
    /// `time_min`, ordered by start time.
    async fn upcoming_events(
        &self,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<CalendarEvent>, AppError>;
}

pub struct CalendarService;

impl CalendarService {
    pub async fn upcoming<C: CalendarApi + ?Sized>(
        api: &C,
        now: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        let mut events = api.upcoming_events(now, MAX_UPCOMING_EVENTS).await?;
        events.truncate(MAX_UPCOMING_EVENTS as usize);
        Ok(events)
    }
}
