//! Rebuild a timetable out of the envelope's nested arrays.
//!
//! Both schedules are shaped `[grade][class][day][period]`. Grade 0 and
//! class 0 are placeholders. Index 0 of a class holds its day count, index 0
//! of a day its period count, and the rest are lesson codes.

use super::lecture::{Names, TimeTableCell, NO_CLASS};
use crate::comcigan::code::ComciganCodeSet;
use crate::comcigan::payload::Envelope;
use crate::error::ComciganError;
use log::debug;
use serde_json::Value;

/// Days are padded with empty periods up to here, unless configured
/// otherwise.
pub const DEFAULT_MAX_PERIODS: usize = 8;

/// First real grade and class in the schedule arrays.
const FIRST_INDEX: usize = 1;

/// Slot 0 of a class or a day is its length.
const COUNT_INDEX: usize = 0;

/// A homeroom row ends at the first of these.
pub const HOMEROOM_SENTINELS: [u64; 2] = [0, 255];

const HOMEROOM_KEY: &str = "담임";
const LOCAL_NAME_KEY: &str = "지역명";
const SCHOOL_YEAR_KEY: &str = "학년도";
const START_DATE_KEY: &str = "시작일";
const DAY_PERIODS_KEY: &str = "일과시간";

/// Cells of one day, period 1 first.
pub type Day = Vec<TimeTableCell>;
/// Days of one class, day 1 (Monday) first.
pub type Class = Vec<Day>;
/// Classes of one grade, class 1 first.
pub type Grade = Vec<Class>;

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub local_name: String,
    pub school_year: i64,
    pub start_date: String,
    pub day_periods: Vec<String>,
    pub update_date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Grade 1 first
    pub timetable: Vec<Grade>,
    /// Homeroom teachers by grade then class, grade 1 class 1 first
    pub homeroom: Vec<Vec<String>>,
    pub metadata: Metadata,
}

fn field<'a>(envelope: &'a Envelope, key: &str) -> Result<&'a Value, ComciganError> {
    envelope
        .get(key)
        .ok_or(ComciganError::Decode(format!("{} missing from envelope", key)))
}

fn array<'a>(value: &'a Value, what: &str) -> Result<&'a [Value], ComciganError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ComciganError::Decode(format!("{} is not an array", what)))
}

fn at<'a>(items: &'a [Value], index: usize, what: &str) -> Result<&'a Value, ComciganError> {
    items
        .get(index)
        .ok_or(ComciganError::Decode(format!("{} has no index {}", what, index)))
}

fn int(value: &Value, what: &str) -> Result<u64, ComciganError> {
    value
        .as_u64()
        .ok_or(ComciganError::Decode(format!("{} is not a count or code: {}", what, value)))
}

/// Names and dates are strings, but don't choke on a stray number.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text_list(value: &Value, what: &str) -> Result<Vec<String>, ComciganError> {
    Ok(array(value, what)?.iter().map(text).collect())
}

fn decode_day(
    daily: &[Value],
    original: &[Value],
    names: &Names,
    max_periods: usize,
) -> Result<Day, ComciganError> {
    let period_count = int(at(original, COUNT_INDEX, "original day")?, "period count")?;
    // The daily schedule is shorter when trailing periods were dropped
    let daily_count = int(at(daily, COUNT_INDEX, "daily day")?, "period count")?;

    let mut cells = (1..=period_count)
        .map(|period| {
            let original_code = int(at(original, period as usize, "original day")?, "lesson")?;
            let current_code = if daily_count >= period {
                int(at(daily, period as usize, "daily day")?, "lesson")?
            } else {
                NO_CLASS
            };
            names.cell(period as u32, current_code, original_code)
        })
        .collect::<Result<Day, _>>()?;

    cells.extend((period_count as usize + 1..=max_periods).map(|p| TimeTableCell::empty(p as u32)));
    Ok(cells)
}

fn decode_class(
    daily: &[Value],
    original: &[Value],
    names: &Names,
    max_periods: usize,
) -> Result<Class, ComciganError> {
    let day_count = int(at(original, COUNT_INDEX, "original class")?, "day count")? as usize;

    (1..=day_count)
        .map(|day| {
            decode_day(
                array(at(daily, day, "daily class")?, "daily day")?,
                array(at(original, day, "original class")?, "original day")?,
                names,
                max_periods,
            )
        })
        .collect()
}

fn decode_grades(
    daily: &[Value],
    original: &[Value],
    names: &Names,
    max_periods: usize,
) -> Result<Vec<Grade>, ComciganError> {
    daily
        .iter()
        .enumerate()
        .skip(FIRST_INDEX)
        .map(|(grade, daily_grade)| {
            let daily_classes = array(daily_grade, "daily grade")?;
            let original_classes = array(at(original, grade, "original schedule")?, "original grade")?;

            daily_classes
                .iter()
                .enumerate()
                .skip(FIRST_INDEX)
                .map(|(class, daily_class)| {
                    decode_class(
                        array(daily_class, "daily class")?,
                        array(at(original_classes, class, "original grade")?, "original class")?,
                        names,
                        max_periods,
                    )
                })
                .collect::<Result<Grade, _>>()
        })
        .collect()
}

/// Teacher names by grade then class. Each row stops at the first sentinel.
fn decode_homeroom(rows: &[Value], names: &Names) -> Result<Vec<Vec<String>>, ComciganError> {
    rows.iter()
        .map(|row| -> Result<Vec<String>, ComciganError> {
            let mut teachers = vec![];
            for value in array(row, "homeroom row")? {
                let index = int(value, "homeroom teacher")?;
                if HOMEROOM_SENTINELS.contains(&index) {
                    break;
                }
                teachers.push(names.teacher(index as usize)?.to_string());
            }
            Ok(teachers)
        })
        .collect()
}

fn decode_metadata(envelope: &Envelope, codes: &ComciganCodeSet) -> Result<Metadata, ComciganError> {
    let school_year = field(envelope, SCHOOL_YEAR_KEY)?;
    Ok(Metadata {
        local_name: text(field(envelope, LOCAL_NAME_KEY)?),
        school_year: school_year
            .as_i64()
            .or_else(|| school_year.as_str().and_then(|s| s.parse().ok()))
            .ok_or(ComciganError::Decode(format!("school year {} is not a year", school_year)))?,
        start_date: text(field(envelope, START_DATE_KEY)?),
        day_periods: text_list(field(envelope, DAY_PERIODS_KEY)?, DAY_PERIODS_KEY)?,
        update_date: text(field(envelope, &codes.update_date_key())?),
    })
}

/// Decode the whole envelope. Nothing is returned unless everything decodes.
pub fn decode(
    envelope: &Envelope,
    codes: &ComciganCodeSet,
    max_periods: usize,
) -> Result<Decoded, ComciganError> {
    let teacher_key = codes.teacher_key();
    let subject_key = codes.subject_key();
    let names = Names::new(
        text_list(field(envelope, &teacher_key)?, &teacher_key)?,
        text_list(field(envelope, &subject_key)?, &subject_key)?,
    );

    let daily_key = codes.daily_key();
    let original_key = codes.original_key();
    let timetable = decode_grades(
        array(field(envelope, &daily_key)?, &daily_key)?,
        array(field(envelope, &original_key)?, &original_key)?,
        &names,
        max_periods,
    )?;
    debug!(
        "Decoded {} grades with {} teachers and {} subjects",
        timetable.len(),
        names.teachers.len(),
        names.subjects.len()
    );

    let homeroom = decode_homeroom(
        array(field(envelope, HOMEROOM_KEY)?, HOMEROOM_KEY)?,
        &names,
    )?;

    Ok(Decoded {
        timetable,
        homeroom,
        metadata: decode_metadata(envelope, codes)?,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures;
    use crate::timetable::lecture::Lecture;

    fn envelope() -> Envelope {
        match fixtures::envelope() {
            Value::Object(envelope) => envelope,
            _ => unreachable!("fixture envelope is an object"),
        }
    }

    fn cell(period: u32, subject: &str, teacher: &str) -> TimeTableCell {
        TimeTableCell {
            period,
            subject: subject.to_string(),
            teacher: teacher.to_string(),
            is_substituted: false,
            original: None,
        }
    }

    fn substituted(
        period: u32,
        (subject, teacher): (&str, &str),
        (original_subject, original_teacher): (&str, &str),
    ) -> TimeTableCell {
        TimeTableCell {
            period,
            subject: subject.to_string(),
            teacher: teacher.to_string(),
            is_substituted: true,
            original: Some(Lecture {
                period,
                subject: original_subject.to_string(),
                teacher: original_teacher.to_string(),
            }),
        }
    }

    fn padded(mut cells: Day, max_periods: u32) -> Day {
        let next = cells.len() as u32 + 1;
        cells.extend((next..=max_periods).map(TimeTableCell::empty));
        cells
    }

    #[test]
    fn decodes_fixture_exactly() {
        let decoded = decode(&envelope(), &fixtures::codes(), DEFAULT_MAX_PERIODS).unwrap();

        let class1 = vec![
            padded(
                vec![
                    cell(1, "국어", "김철수"),
                    cell(2, "수학", "이영희"),
                    cell(3, "영어", "박민수"),
                ],
                8,
            ),
            padded(
                vec![
                    substituted(1, ("수학", "김철수"), ("수학", "이영희")),
                    cell(2, "국어", "김철수"),
                    substituted(3, ("", ""), ("영어", "박민수")),
                ],
                8,
            ),
        ];
        let class2 = vec![padded(vec![cell(1, "", "")], 8)];

        assert_eq!(decoded.timetable, vec![vec![class1, class2]]);
        assert_eq!(
            decoded.homeroom,
            vec![
                vec!["김철수".to_string(), "이영희".to_string()],
                vec!["박민수".to_string()],
            ]
        );
        assert_eq!(
            decoded.metadata,
            Metadata {
                local_name: "서울".to_string(),
                school_year: 2024,
                start_date: "2024-03-04".to_string(),
                day_periods: vec![
                    "1(09:00)".to_string(),
                    "2(09:50)".to_string(),
                    "3(10:40)".to_string(),
                ],
                update_date: "2024-03-08 12:34:56".to_string(),
            }
        );
    }

    #[test]
    fn every_day_is_padded_to_the_cap() {
        for max_periods in [3, 8, 10] {
            let decoded = decode(&envelope(), &fixtures::codes(), max_periods).unwrap();
            for day in decoded.timetable.iter().flatten().flatten() {
                assert_eq!(day.len(), max_periods);
                for (i, cell) in day.iter().enumerate() {
                    assert_eq!(cell.period as usize, i + 1);
                }
            }
        }
    }

    #[test]
    fn no_padding_past_long_days() {
        let decoded = decode(&envelope(), &fixtures::codes(), 2).unwrap();
        // Period 3 is real, so it stays even though the cap is 2
        assert_eq!(decoded.timetable[0][0][0].len(), 3);
    }

    #[test]
    fn padding_is_empty() {
        let decoded = decode(&envelope(), &fixtures::codes(), DEFAULT_MAX_PERIODS).unwrap();
        for cell in &decoded.timetable[0][0][0][3..] {
            assert!(cell.is_empty());
            assert!(!cell.is_substituted);
            assert_eq!(cell.original, None);
        }
    }

    #[test]
    fn substitution_matches_original_presence() {
        let decoded = decode(&envelope(), &fixtures::codes(), DEFAULT_MAX_PERIODS).unwrap();
        for cell in decoded.timetable.iter().flatten().flatten().flatten() {
            assert_eq!(cell.is_substituted, cell.original.is_some());
        }
    }

    #[test]
    fn missing_key_is_decode_error() {
        let mut envelope = envelope();
        envelope.remove("자료354");

        let Err(ComciganError::Decode(msg)) = decode(&envelope, &fixtures::codes(), 8) else {
            panic!("Decoding without the original schedule should fail");
        };
        assert!(msg.contains("자료354"), "{}", msg);
    }

    #[test]
    fn malformed_shape_is_decode_error() {
        let mut envelope = envelope();
        // Original says 3 periods on day 1 but only has codes for 2
        envelope["자료354"][1][1][1] = serde_json::json!([3, 1001, 2002]);

        assert!(matches!(
            decode(&envelope, &fixtures::codes(), 8),
            Err(ComciganError::Decode(_))
        ));
    }

    #[test]
    fn unknown_teacher_is_decode_error() {
        let mut envelope = envelope();
        envelope["담임"] = serde_json::json!([[42]]);

        assert!(matches!(
            decode(&envelope, &fixtures::codes(), 8),
            Err(ComciganError::Decode(_))
        ));
    }

    #[test]
    fn homeroom_stops_at_sentinels() {
        let names = Names::new(
            vec!["*".into(), "a".into(), "b".into()],
            vec![],
        );
        let rows = serde_json::json!([[1, 255, 2], [0, 1], [2, 1]]);

        let homeroom = decode_homeroom(rows.as_array().unwrap(), &names).unwrap();

        assert_eq!(
            homeroom,
            vec![vec!["a".to_string()], vec![], vec!["b".to_string(), "a".to_string()]]
        );
    }
}
