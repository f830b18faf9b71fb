use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;

use crate::error::AppError;
use crate::models::calendar::{CalendarEvent, EventsResponse};
use crate::oauth::Token;
use crate::service::calendar_service::CalendarApi;

const CONTEXT: &str = "Unable to retrieve the user's upcoming events";

pub struct GoogleCalendarClient {
    http: reqwest::Client,
    base_url: String,
    token: Token,
}

impl GoogleCalendarClient {
    pub fn new(base_url: &str, token: Token) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn upcoming_events(
        &self,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        let response = self
            .http
            .get(format!("{}/calendars/primary/events", self.base_url))
            .bearer_auth(&self.token.access_token)
            .query(&[
                ("showDeleted", "false".to_string()),
                ("singleEvents", "true".to_string()),
                ("timeMin", time_min.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("maxResults", max_results.to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::service(CONTEXT, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::service(CONTEXT, e))?;
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::service(
                CONTEXT,
                "the saved token was rejected; delete token.json and run the command again",
            ));
        }
        if !status.is_success() {
            return Err(AppError::service(
                CONTEXT,
                format!("request failed with status {}: {}", status, text),
            ));
        }
        let parsed: EventsResponse = serde_json::from_str(&text)
            .map_err(|e| AppError::service(CONTEXT, format!("failed to decode response: {}", e)))?;
        Ok(parsed.items)
    }
}
