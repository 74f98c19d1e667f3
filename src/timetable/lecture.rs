/* Lessons and timetable cells
 * plus the arithmetic that unpacks Comcigan's lesson codes
 */
use crate::error::ComciganError;
use std::fmt;

/// Index 0 of the teacher and subject lists means "nobody" / "nothing".
pub const NONE_INDEX: usize = 0;

/// Code 0 is an empty period.
pub const NO_CLASS: u64 = 0;

/// A lesson code is `subject * SUBJECT_FACTOR + teacher`, the teacher
/// taking the last two digits.
pub const SUBJECT_FACTOR: u64 = 1000;
pub const TEACHER_MODULUS: u64 = 100;

/// Split a lesson code into `(subject index, teacher index)`.
pub fn split_code(code: u64) -> (usize, usize) {
    (
        (code / SUBJECT_FACTOR) as usize,
        (code % TEACHER_MODULUS) as usize,
    )
}

/// Teacher and subject names, with [`NONE_INDEX`] blanked.
#[derive(Debug, Clone, Default)]
pub struct Names {
    pub teachers: Vec<String>,
    pub subjects: Vec<String>,
}

impl Names {
    pub fn new(mut teachers: Vec<String>, mut subjects: Vec<String>) -> Self {
        blank_none(&mut teachers);
        blank_none(&mut subjects);
        Self { teachers, subjects }
    }

    pub fn teacher(&self, index: usize) -> Result<&str, ComciganError> {
        self.teachers
            .get(index)
            .map(String::as_str)
            .ok_or(ComciganError::Decode(format!(
                "teacher {} not in teacher list of {}",
                index,
                self.teachers.len()
            )))
    }

    pub fn subject(&self, index: usize) -> Result<&str, ComciganError> {
        self.subjects
            .get(index)
            .map(String::as_str)
            .ok_or(ComciganError::Decode(format!(
                "subject {} not in subject list of {}",
                index,
                self.subjects.len()
            )))
    }

    /// `(subject, teacher)` of a lesson code. [`NO_CLASS`] is `("", "")`.
    pub fn decode_lecture(&self, code: u64) -> Result<(String, String), ComciganError> {
        if code == NO_CLASS {
            return Ok((String::new(), String::new()));
        }
        let (subject, teacher) = split_code(code);
        Ok((
            self.subject(subject)?.to_string(),
            self.teacher(teacher)?.to_string(),
        ))
    }

    /// The cell at `period`, given what is held and what was planned.
    pub fn cell(
        &self,
        period: u32,
        current_code: u64,
        original_code: u64,
    ) -> Result<TimeTableCell, ComciganError> {
        let (subject, teacher) = self.decode_lecture(current_code)?;
        let original = if current_code == original_code {
            None
        } else {
            let (subject, teacher) = self.decode_lecture(original_code)?;
            Some(Lecture {
                period,
                subject,
                teacher,
            })
        };

        Ok(TimeTableCell {
            period,
            subject,
            teacher,
            is_substituted: original.is_some(),
            original,
        })
    }
}

fn blank_none(names: &mut Vec<String>) {
    match names.get_mut(NONE_INDEX) {
        Some(name) => name.clear(),
        None => names.push(String::new()),
    }
}

/// A lesson: which period, what, and who.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lecture {
    pub period: u32,
    pub subject: String,
    pub teacher: String,
}

impl fmt::Display for Lecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}교시: {}({})", self.period, self.subject, self.teacher)
    }
}

/// One slot of the timetable.
///
/// `original` is set exactly when the lesson held differs from the one
/// planned, and then holds the planned one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTableCell {
    pub period: u32,
    pub subject: String,
    pub teacher: String,
    pub is_substituted: bool,
    pub original: Option<Lecture>,
}

impl TimeTableCell {
    /// Filler for periods past the end of a day.
    pub fn empty(period: u32) -> Self {
        Self {
            period,
            subject: String::new(),
            teacher: String::new(),
            is_substituted: false,
            original: None,
        }
    }

    pub fn lecture(&self) -> Lecture {
        Lecture {
            period: self.period,
            subject: self.subject.clone(),
            teacher: self.teacher.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subject.is_empty() && self.teacher.is_empty()
    }
}

impl fmt::Display for TimeTableCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lecture())?;
        if self.is_substituted {
            write!(f, " (대체)")?;
        }
        Ok(())
    }
}
