use super::client::Fetch;
use super::code::{discover, ComciganCodeSet};
use crate::config::Config;
use crate::error::ComciganError;
use encoding_rs::EUC_KR;
use log::{debug, info};
use serde::Deserialize;
use std::fmt;

/// Search results come back as plain UTF-8 (with a NUL stuck on the end).
const SEARCH_CHARSET: &str = "utf-8";

/// A code as Comcigan sends it. Usually a number, sometimes a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Code {
    Number(i64),
    Text(String),
}

impl Code {
    pub fn matches(&self, hint: i64) -> bool {
        match self {
            Code::Number(n) => *n == hint,
            Code::Text(s) => s.trim().parse::<i64>() == Ok(hint),
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Number(n) => write!(f, "{}", n),
            Code::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One row of `학교검색`: `[region code, local code, name, school code]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchoolEntry {
    pub region_code: Code,
    pub local_code: Code,
    pub name: String,
    pub school_code: Code,
}

impl fmt::Display for SchoolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.region_code, self.local_code, self.name, self.school_code
        )
    }
}

/// A school, resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolInfo {
    pub name: String,
    pub code: String,
    pub region_code: String,
}

impl From<SchoolEntry> for SchoolInfo {
    fn from(entry: SchoolEntry) -> Self {
        Self {
            name: entry.name,
            code: entry.school_code.to_string(),
            region_code: entry.region_code.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(rename = "학교검색")]
    schools: Vec<SchoolEntry>,
}

/// Comcigan wants the name percent-encoded as EUC-KR bytes.
pub fn search_url(config: &Config, codes: &ComciganCodeSet, school_name: &str) -> String {
    let (name, _, _) = EUC_KR.encode(school_name);
    format!(
        "{}{}{}",
        config.base_url,
        codes.path,
        urlencoding::encode_binary(&name)
    )
}

pub fn parse_search_response(text: &str) -> Result<Vec<SchoolEntry>, ComciganError> {
    let response: SearchResponse = serde_json::from_str(text.trim_end_matches('\0'))?;
    Ok(response.schools)
}

/// Every school whose name matches `school_name`.
pub async fn search_schools(
    fetcher: &dyn Fetch,
    config: &Config,
    codes: &ComciganCodeSet,
    school_name: &str,
) -> Result<Vec<SchoolEntry>, ComciganError> {
    let url = search_url(config, codes, school_name);
    let text = fetcher
        .get_text(&url, SEARCH_CHARSET)
        .await
        .map_err(|e| ComciganError::Fetch(format!("searching {:?}: {:#}", school_name, e)))?;

    let schools = parse_search_response(&text)?;
    debug!("{} schools match {:?}", schools.len(), school_name);
    Ok(schools)
}

/// Discover fresh codes, then search. For picking a hint before loading.
pub async fn search(
    fetcher: &dyn Fetch,
    config: &Config,
    school_name: &str,
) -> Result<Vec<SchoolEntry>, ComciganError> {
    let codes = discover(fetcher, config).await?;
    search_schools(fetcher, config, &codes, school_name).await
}

/// Pick one school out of the search results.
///
/// A single result is taken as is. With several, the school code hint is
/// tried first, then the local code hint; a hint that matches nothing is as
/// good as no hint.
pub fn select_school(
    school_name: &str,
    schools: Vec<SchoolEntry>,
    local_code: Option<i64>,
    school_code: Option<i64>,
) -> Result<SchoolInfo, ComciganError> {
    let ambiguous = |candidates: Vec<SchoolEntry>| ComciganError::AmbiguousSchool {
        name: school_name.to_string(),
        candidates,
    };

    let selected = match schools.len() {
        0 => return Err(ComciganError::SchoolNotFound(school_name.to_string())),
        1 => schools.into_iter().next(),
        _ => {
            let position = if let Some(hint) = school_code {
                schools.iter().position(|s| s.school_code.matches(hint))
            } else if let Some(hint) = local_code {
                schools.iter().position(|s| s.local_code.matches(hint))
            } else {
                None
            };
            let Some(position) = position else {
                return Err(ambiguous(schools));
            };
            schools.into_iter().nth(position)
        }
    };

    selected
        .map(SchoolInfo::from)
        .ok_or(ComciganError::SchoolNotFound(school_name.to_string()))
}

/// Resolve a school name (plus optional hints) to the school Comcigan means.
pub async fn resolve(
    fetcher: &dyn Fetch,
    config: &Config,
    codes: &ComciganCodeSet,
    school_name: &str,
    local_code: Option<i64>,
    school_code: Option<i64>,
) -> Result<SchoolInfo, ComciganError> {
    let schools = search_schools(fetcher, config, codes, school_name).await?;
    let school = select_school(school_name, schools, local_code, school_code)?;
    info!("Resolved {:?} to {} ({})", school_name, school.name, school.code);
    Ok(school)
}
