use super::client::Fetch;
use super::code::ComciganCodeSet;
use super::search::SchoolInfo;
use crate::config::Config;
use crate::error::ComciganError;
use base64::{engine::general_purpose, Engine as _};
use log::debug;
use serde_json::{Map, Value};
use std::str::FromStr;

const PAYLOAD_CHARSET: &str = "utf-8";

/// The top level object of a timetable response.
pub type Envelope = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Week {
    #[default]
    ThisWeek,
    NextWeek,
}

impl Week {
    pub fn index(self) -> u8 {
        match self {
            Week::ThisWeek => 0,
            Week::NextWeek => 1,
        }
    }
}

impl FromStr for Week {
    type Err = ComciganError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "this" | "this_week" | "0" => Ok(Week::ThisWeek),
            "next" | "next_week" | "1" => Ok(Week::NextWeek),
            _ => Err(ComciganError::InvalidArgument(format!(
                "week must be `this` or `next`, got {:?}",
                s
            ))),
        }
    }
}

/// `{code0}_{school code}_0_{week + 1}`, which the request carries base64'd.
pub fn selector(codes: &ComciganCodeSet, school: &SchoolInfo, week: Week) -> String {
    format!("{}_{}_0_{}", codes.code0, school.code, week.index() + 1)
}

pub fn timetable_url(
    config: &Config,
    codes: &ComciganCodeSet,
    school: &SchoolInfo,
    week: Week,
) -> String {
    let selector = general_purpose::STANDARD.encode(selector(codes, school, week));
    format!("{}{}{}", config.base_url, codes.timetable_path(), selector)
}

/// The body is one JSON object per line, only the first one matters.
pub fn parse_envelope(text: &str) -> Result<Envelope, ComciganError> {
    let first_line = text
        .lines()
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or(ComciganError::Decode("empty timetable response".to_string()))?;

    match serde_json::from_str::<Value>(first_line)? {
        Value::Object(envelope) => Ok(envelope),
        _ => Err(ComciganError::Decode(
            "timetable response is not an object".to_string(),
        )),
    }
}

pub async fn fetch_envelope(
    fetcher: &dyn Fetch,
    config: &Config,
    codes: &ComciganCodeSet,
    school: &SchoolInfo,
    week: Week,
) -> Result<Envelope, ComciganError> {
    let url = timetable_url(config, codes, school, week);
    let text = fetcher
        .get_text(&url, PAYLOAD_CHARSET)
        .await
        .map_err(|e| ComciganError::Fetch(format!("timetable of {}: {:#}", school.name, e)))?;

    let envelope = parse_envelope(&text)?;
    debug!("Timetable envelope has {} keys", envelope.len());
    Ok(envelope)
}
