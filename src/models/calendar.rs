use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MAX_UPCOMING_EVENTS: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: EventTime,
}

/// All-day events carry `date`, timed events carry `dateTime`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, rename = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
}

impl CalendarEvent {
    pub fn title(&self) -> &str {
        match self.summary.as_deref() {
            Some(summary) if !summary.trim().is_empty() => summary,
            _ => "(no title)",
        }
    }

    pub fn start_value(&self) -> &str {
        self.start
            .date_time
            .as_deref()
            .filter(|v| !v.is_empty())
            .or(self.start.date.as_deref())
            .unwrap_or_default()
    }
}

// "2024-03-05" -> "March 5", RFC 3339 -> "March 5 - 3:04PM". Unparseable input is returned as is.
pub fn format_event_date(value: &str) -> String {
    if value.len() == 10 {
        return match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => date.format("%B %-d").to_string(),
            Err(_) => value.to_string(),
        };
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(when) => when.format("%B %-d - %-I:%M%p").to_string(),
        Err(_) => value.to_string(),
    }
}

pub fn render_events(events: &[CalendarEvent]) -> String {
    let mut body = String::from("Upcoming events:");
    if events.is_empty() {
        body.push_str("\nNo upcoming events found.");
        return body;
    }
    for event in events {
        body.push_str(&format!(
            "\n- {} ({})",
            event.title(),
            format_event_date(event.start_value())
        ));
    }
    body
}
