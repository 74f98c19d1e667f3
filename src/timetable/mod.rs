/* Timetable data structures
 * lessons and cells, decoding them out of the envelope,
 * and the TimeTable that owns the result
 */
pub mod lecture;

/* Envelope -> nested cells, homeroom teachers and metadata */
pub mod decode;

/* The façade: load, query, render */
pub mod table;

pub use crate::comcigan::payload::Week;
pub use lecture::{Lecture, TimeTableCell};
pub use table::{load_timetable, weekday_name, TimeTable, TimetableRequest};
