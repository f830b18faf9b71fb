pub mod calendar_service;
pub mod note_service;
pub mod todo_service;
pub mod weather_service;
