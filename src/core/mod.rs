pub mod schedule;
pub mod storage;
pub mod student;
pub mod timetable;

pub use schedule::{semester_for_position, Schedule};
pub use storage::Storage;
pub use student::Student;
pub use timetable::{Event, EventKind, ModuleWeekly, Timetable, TimetableCommand};

pub use crate::domain::ports::Catalogue;
pub use crate::utils::error::Result;
