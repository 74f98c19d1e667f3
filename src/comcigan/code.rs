use super::client::Fetch;
use crate::config::Config;
use crate::error::ComciganError;
use log::{debug, info};
use regex::Regex;
use std::sync::LazyLock;

/// `/st` is served in EUC-KR.
pub const BOOTSTRAP_CHARSET: &str = "euc-kr";

/// Envelope keys are this followed by one of the discovered codes.
const DATA_KEY_PREFIX: &str = "자료";

/// Length of the part of [`ComciganCodeSet::path`] that prefixes
/// timetable requests, e.g. `/36179?`.
const TIMETABLE_PATH_LEN: usize = 7;

/// Identifiers scraped from the bootstrap page.
///
/// Upstream regenerates them whenever it likes, so a set is only good for
/// the fetch it was discovered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComciganCodeSet {
    /// Path fragment for search and timetable requests, e.g. `/36179?17384l`
    pub path: String,
    /// Prefix of the timetable request selector
    pub code0: String,
    /// Teacher name list
    pub code1: String,
    /// Subject name list
    pub code2: String,
    /// Last update time
    pub code3: String,
    /// Schedule as it is actually held, substitutions included
    pub code4: String,
    /// Schedule as originally planned
    pub code5: String,
}

impl ComciganCodeSet {
    pub fn teacher_key(&self) -> String {
        data_key(&self.code1)
    }

    pub fn subject_key(&self) -> String {
        data_key(&self.code2)
    }

    pub fn update_date_key(&self) -> String {
        data_key(&self.code3)
    }

    pub fn daily_key(&self) -> String {
        data_key(&self.code4)
    }

    pub fn original_key(&self) -> String {
        data_key(&self.code5)
    }

    pub fn timetable_path(&self) -> &str {
        match self.path.char_indices().nth(TIMETABLE_PATH_LEN) {
            Some((end, _)) => &self.path[..end],
            None => &self.path,
        }
    }
}

fn data_key(code: &str) -> String {
    format!("{}{}", DATA_KEY_PREFIX, code)
}

/// `(token name, pattern)`. Each pattern captures the token in group 1.
static PATTERNS: LazyLock<[(&str, Regex); 7]> = LazyLock::new(|| {
    [
        ("path", r"\.(/[0-9]+\?[0-9]+l)"),
        ("selector prefix", r"sc_data\('([0-9]+)_"),
        ("teacher list", r"성명=자료.자료([0-9]+)"),
        ("subject list", r"자료.자료([0-9]+)\[sb\]"),
        ("update date", r"=H시간표.자료([0-9]+)"),
        ("daily schedule", r"일일자료=Q자료\(자료\.자료([0-9]+)"),
        ("original schedule", r"원자료=Q자료\(자료\.자료([0-9]+)"),
    ]
    .map(|(name, pattern)| (name, Regex::new(pattern).unwrap()))
});

fn find_token(text: &str, name: &str, pattern: &Regex) -> Result<String, ComciganError> {
    let token = pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .ok_or(ComciganError::Discovery(format!(
            "{} not found in bootstrap page",
            name
        )))?
        .as_str()
        .to_string();
    debug!("Discovered {}: {}", name, token);
    Ok(token)
}

/// Pull every code out of the bootstrap page text.
pub fn extract_codes(text: &str) -> Result<ComciganCodeSet, ComciganError> {
    let token = |index: usize| {
        let (name, pattern) = &PATTERNS[index];
        find_token(text, name, pattern)
    };

    Ok(ComciganCodeSet {
        path: token(0)?,
        code0: token(1)?,
        code1: token(2)?,
        code2: token(3)?,
        code3: token(4)?,
        code4: token(5)?,
        code5: token(6)?,
    })
}

/// Fetch `/st` and discover the codes in use right now.
pub async fn discover(fetcher: &dyn Fetch, config: &Config) -> Result<ComciganCodeSet, ComciganError> {
    let url = format!("{}/st", config.base_url);
    let text = fetcher
        .get_text(&url, BOOTSTRAP_CHARSET)
        .await
        .map_err(|e| ComciganError::Discovery(format!("fetching {}: {:#}", url, e)))?;

    let codes = extract_codes(&text)?;
    info!("Comcigan path is {}", codes.path);
    Ok(codes)
}
