pub mod calendar;
pub mod note;
pub mod todo;
pub mod weather;
