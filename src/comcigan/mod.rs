//! comcigan: the part that talks to the Comcigan server

/// HTTP transport, and a mock of it for tests
pub mod client;

/// Scrape the obfuscated codes from the bootstrap page
pub mod code;

/// Turn a school name into the codes Comcigan knows it by
pub mod search;

/// Request the raw timetable envelope of a school
pub mod payload;
