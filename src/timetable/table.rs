use super::decode::{decode, Class, Day, Decoded, Grade};
use super::lecture::TimeTableCell;
use crate::comcigan::client::{Fetch, HttpFetcher};
use crate::comcigan::code::discover;
use crate::comcigan::payload::{fetch_envelope, Week};
use crate::comcigan::search::{resolve, SchoolInfo};
use crate::config::Config;
use crate::error::ComciganError;
use log::info;
use std::fmt;

const WEEKDAYS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

/// Korean name of a 1-based weekday, `"?"` past Sunday.
pub fn weekday_name(day: usize) -> &'static str {
    day.checked_sub(1)
        .and_then(|i| WEEKDAYS.get(i))
        .copied()
        .unwrap_or("?")
}

/// What to load. Hints only matter when the name matches several schools.
#[derive(Debug, Clone, Default)]
pub struct TimetableRequest {
    pub school_name: String,
    pub local_code: Option<i64>,
    pub school_code: Option<i64>,
    pub week: Week,
}

impl TimetableRequest {
    pub fn new(school_name: &str) -> Self {
        Self {
            school_name: school_name.to_string(),
            ..Default::default()
        }
    }
}

/// A school's timetable for one week.
///
/// Every accessor takes 1-based grade, class, day and period numbers, the
/// way a school counts them.
#[derive(Debug, Clone)]
pub struct TimeTable {
    pub school_info: SchoolInfo,
    pub local_name: String,
    pub school_year: i64,
    pub start_date: String,
    pub day_periods: Vec<String>,
    pub update_date: String,
    timetable: Vec<Grade>,
    homeroom_teachers: Vec<Vec<String>>,
}

fn one_based<'a, T>(items: &'a [T], index: usize, what: &'static str) -> Result<&'a T, ComciganError> {
    index
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .ok_or(ComciganError::OutOfRange { what, index })
}

impl TimeTable {
    /// Discover codes, resolve the school, fetch and decode. Every call
    /// starts from scratch.
    pub async fn load(
        fetcher: &dyn Fetch,
        config: &Config,
        request: &TimetableRequest,
    ) -> Result<Self, ComciganError> {
        config.validate()?;

        let codes = discover(fetcher, config).await?;
        let school = resolve(
            fetcher,
            config,
            &codes,
            &request.school_name,
            request.local_code,
            request.school_code,
        )
        .await?;
        let envelope = fetch_envelope(fetcher, config, &codes, &school, request.week).await?;
        let decoded = decode(&envelope, &codes, config.max_periods)?;

        info!(
            "Loaded timetable of {}, updated {}",
            school.name, decoded.metadata.update_date
        );
        Ok(Self::from_decoded(school, decoded))
    }

    pub(crate) fn from_decoded(school_info: SchoolInfo, decoded: Decoded) -> Self {
        let Decoded {
            timetable,
            homeroom,
            metadata,
        } = decoded;

        Self {
            school_info,
            local_name: metadata.local_name,
            school_year: metadata.school_year,
            start_date: metadata.start_date,
            day_periods: metadata.day_periods,
            update_date: metadata.update_date,
            timetable,
            homeroom_teachers: homeroom,
        }
    }

    /// The whole thing, indexed `[grade - 1][class - 1][day - 1][period - 1]`.
    pub fn timetable(&self) -> &[Grade] {
        &self.timetable
    }

    pub fn grades(&self) -> usize {
        self.timetable.len()
    }

    /// Number of classes in `grade`, 0 for a grade that doesn't exist.
    pub fn classes(&self, grade: usize) -> usize {
        one_based(&self.timetable, grade, "grade").map_or(0, Vec::len)
    }

    /// Number of school days of a class, 0 for a class that doesn't exist.
    pub fn days(&self, grade: usize, class_num: usize) -> usize {
        self.class(grade, class_num).map_or(0, Vec::len)
    }

    fn class(&self, grade: usize, class_num: usize) -> Result<&Class, ComciganError> {
        one_based(one_based(&self.timetable, grade, "grade")?, class_num, "class")
    }

    pub fn day(&self, grade: usize, class_num: usize, day: usize) -> Result<&[TimeTableCell], ComciganError> {
        let day: &Day = one_based(self.class(grade, class_num)?, day, "day")?;
        Ok(day)
    }

    pub fn cell(
        &self,
        grade: usize,
        class_num: usize,
        day: usize,
        period: usize,
    ) -> Result<&TimeTableCell, ComciganError> {
        one_based(self.day(grade, class_num, day)?, period, "period")
    }

    /// Homeroom teacher of a class. Classes at or after the end-of-row
    /// sentinel don't have one.
    pub fn homeroom(&self, grade: usize, class_num: usize) -> Result<&str, ComciganError> {
        let row = one_based(&self.homeroom_teachers, grade, "grade")?;
        Ok(one_based(row, class_num, "class")?.as_str())
    }
}

/// [`TimeTable::load`] over a real HTTP client.
pub async fn load_timetable(
    config: &Config,
    request: &TimetableRequest,
) -> Result<TimeTable, ComciganError> {
    let fetcher = HttpFetcher::new(config)?;
    TimeTable::load(&fetcher, config, request).await
}

impl fmt::Display for TimeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "학교 코드: {}", self.school_info.code)?;
        writeln!(f, "학교명: {}", self.school_info.name)?;
        writeln!(f, "지역 코드: {}", self.school_info.region_code)?;
        writeln!(f, "지역명: {}", self.local_name)?;
        writeln!(f, "학년도: {}", self.school_year)?;
        writeln!(f, "시작일: {}", self.start_date)?;
        writeln!(f, "일과시간: {:?}", self.day_periods)?;
        writeln!(f, "갱신일시: {}", self.update_date)
    }
}
