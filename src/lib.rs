/// Talking to the Comcigan server
pub mod comcigan;

/// Reading the config file
pub mod config;

/// Error kinds of every stage
pub mod error;

/// Terminal log format
pub mod log_format;

/// Decoded timetables
pub mod timetable;

#[cfg(test)]
mod fixtures;

pub use comcigan::search::{search, SchoolEntry, SchoolInfo};
pub use error::ComciganError;
pub use timetable::{load_timetable, TimeTable, TimetableRequest, Week};
