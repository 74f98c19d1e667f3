use crate::comcigan::search::SchoolEntry;
use thiserror::Error;

/// Everything that can go wrong between asking for a school and holding its
/// timetable.
///
/// Transport failures are flattened into messages: the caller only needs to
/// know which stage broke, the chain is logged where it happened.
#[derive(Debug, Error)]
pub enum ComciganError {
    /// The bootstrap page couldn't be fetched, or it no longer looks like
    /// what we know how to read.
    #[error("Failed to discover Comcigan codes: {0}")]
    Discovery(String),

    #[error("No school found for {0:?}")]
    SchoolNotFound(String),

    /// More than one school matched and no hint picked one of them.
    #[error(
        "{} schools match {name:?}, pass a local code or school code to pick one",
        .candidates.len()
    )]
    AmbiguousSchool {
        name: String,
        candidates: Vec<SchoolEntry>,
    },

    #[error("Failed to fetch from Comcigan: {0}")]
    Fetch(String),

    /// The payload isn't shaped the way we expect, probably upstream changed.
    #[error("Unexpected response from Comcigan: {0}")]
    Decode(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{what} {index} is out of range")]
    OutOfRange { what: &'static str, index: usize },
}

impl From<serde_json::Error> for ComciganError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
