pub mod google_calendar_client;
pub mod openweather_client;
