use crate::core::schedule::{semester_for_position, Schedule};
use crate::core::student::Student;
use crate::core::timetable::TimetableCommand;
use crate::domain::model::{Major, Module, StudentProfile};
use crate::domain::ports::Catalogue;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{self, SEMESTER_COUNT};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

pub const SCHEDULE_FILE: &str = "schedule.txt";
pub const STUDENT_DETAILS_FILE: &str = "studentDetails.txt";
pub const TIMETABLE_FILE: &str = "timetable.txt";

const FIELD_SEPARATOR: &str = " | ";
const SCHEDULE_HEADER_TAG: &str = "ModulesPerSem";
const MODULE_TAG: &str = "Module";
const NAME_TAG: &str = "Name";
const MAJOR_TAG: &str = "Major";
const YEAR_TAG: &str = "Year";
const TIMETABLE_SENTINEL: &str = "TimetableForCurrentSem";
const COMPLETED_MARKER: &str = "O";
const NOT_COMPLETED_MARKER: &str = "X";

fn corrupted(file: &str, reason: impl Into<String>) -> PlannerError {
    PlannerError::CorruptedFile {
        file: file.to_string(),
        reason: reason.into(),
    }
}

/// Line-oriented codec for the three persisted files.
///
/// Loads validate structure line by line and reject the whole file on any
/// violation; saves rewrite the whole file from live state. The data
/// directory is an explicit constructor argument, never read from process
/// globals.
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Creates the data directory and the three files when absent.
    /// Idempotent; pre-existing files are never touched. Failures are logged
    /// and swallowed, a later save will surface them.
    pub fn create_user_storage_files(&self) {
        if let Err(e) = fs::create_dir_all(&self.data_dir) {
            tracing::warn!(
                "Could not create data directory {}: {}",
                self.data_dir.display(),
                e
            );
            return;
        }

        for file_name in [SCHEDULE_FILE, STUDENT_DETAILS_FILE, TIMETABLE_FILE] {
            let path = self.data_dir.join(file_name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => tracing::debug!("Created {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
                Err(e) => tracing::warn!("Could not create {}: {}", path.display(), e),
            }
        }
    }

    fn read_file(&self, file_name: &str) -> Result<String> {
        let path = self.data_dir.join(file_name);
        if !path.exists() {
            return Err(PlannerError::MissingFile(path));
        }
        Ok(fs::read_to_string(path)?)
    }

    /// Reconstructs the schedule from `schedule.txt`.
    ///
    /// Each module's semester is derived from its position and the declared
    /// capacity line, exactly as the schedule derives it in memory. Modules
    /// are restored without prerequisite gating: the file's history is
    /// trusted, only the grammar is checked. Metadata is re-fetched by code.
    pub async fn load_schedule(&self, catalogue: &dyn Catalogue) -> Result<Schedule> {
        let content = self.read_file(SCHEDULE_FILE)?;

        let mut declared: Option<[u32; SEMESTER_COUNT]> = None;
        let mut schedule = Schedule::new();
        let mut position = 0usize;

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
            match parts[0] {
                SCHEDULE_HEADER_TAG => {
                    if declared.is_some() {
                        return Err(corrupted(SCHEDULE_FILE, "repeated ModulesPerSem line"));
                    }
                    if parts.len() != 2 {
                        return Err(corrupted(SCHEDULE_FILE, "malformed ModulesPerSem line"));
                    }
                    let counts: Vec<u32> = parts[1]
                        .split(',')
                        .map(|t| t.parse::<u32>())
                        .collect::<std::result::Result<_, _>>()
                        .map_err(|_| {
                            corrupted(SCHEDULE_FILE, "ModulesPerSem holds a non-numeric count")
                        })?;
                    let counts: [u32; SEMESTER_COUNT] = counts.try_into().map_err(|_| {
                        corrupted(
                            SCHEDULE_FILE,
                            format!("ModulesPerSem must list exactly {} counts", SEMESTER_COUNT),
                        )
                    })?;
                    declared = Some(counts);
                }
                MODULE_TAG => {
                    let counts = declared.ok_or_else(|| {
                        corrupted(SCHEDULE_FILE, "Module line before ModulesPerSem")
                    })?;
                    if parts.len() != 3 {
                        return Err(corrupted(SCHEDULE_FILE, "malformed Module line"));
                    }
                    let code = parts[1];
                    validation::validate_module_code("module code", code).map_err(|_| {
                        corrupted(SCHEDULE_FILE, format!("invalid module code '{}'", code))
                    })?;
                    let target_semester =
                        semester_for_position(&counts, position).ok_or_else(|| {
                            corrupted(
                                SCHEDULE_FILE,
                                "more Module lines than ModulesPerSem declares",
                            )
                        })?;

                    let info = match catalogue.module_info(code).await {
                        Ok(info) => info,
                        Err(PlannerError::UnknownModule(code)) => {
                            return Err(corrupted(
                                SCHEDULE_FILE,
                                format!("module {} not in catalogue", code),
                            ))
                        }
                        Err(e) => return Err(e),
                    };

                    let mut module = Module::new(code, info);
                    match parts[2] {
                        COMPLETED_MARKER => module.mark_completed(),
                        NOT_COMPLETED_MARKER => {}
                        marker => {
                            return Err(corrupted(
                                SCHEDULE_FILE,
                                format!("unknown completion marker '{}'", marker),
                            ))
                        }
                    }

                    schedule
                        .restore_module(module, target_semester)
                        .map_err(|_| {
                            corrupted(SCHEDULE_FILE, format!("duplicate module {}", code))
                        })?;
                    position += 1;
                }
                tag => {
                    return Err(corrupted(
                        SCHEDULE_FILE,
                        format!("unrecognized tag '{}'", tag),
                    ))
                }
            }
        }

        // a freshly bootstrapped (empty) file yields an empty schedule; once
        // a capacity line is present the restored counts must reproduce it
        if let Some(counts) = declared {
            if schedule.modules_per_sem() != &counts {
                return Err(corrupted(
                    SCHEDULE_FILE,
                    "fewer Module lines than ModulesPerSem declares",
                ));
            }
        }
        Ok(schedule)
    }

    /// Loads the student profile from `studentDetails.txt`.
    ///
    /// Returns `Ok(None)` for a freshly bootstrapped (empty) file. A non-empty
    /// file must carry exactly the Name, Major and Year lines in that order.
    pub fn load_student_details(&self) -> Result<Option<StudentProfile>> {
        let content = self.read_file(STUDENT_DETAILS_FILE)?;

        const EXPECTED_TAGS: [&str; 3] = [NAME_TAG, MAJOR_TAG, YEAR_TAG];
        let mut values: Vec<String> = Vec::new();

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
            if parts.len() != 2 {
                return Err(corrupted(STUDENT_DETAILS_FILE, "malformed detail line"));
            }
            let expected = EXPECTED_TAGS.get(values.len()).copied().ok_or_else(|| {
                corrupted(STUDENT_DETAILS_FILE, "more than three detail lines")
            })?;
            if parts[0] != expected {
                return Err(corrupted(
                    STUDENT_DETAILS_FILE,
                    format!("expected tag '{}', found '{}'", expected, parts[0]),
                ));
            }
            values.push(parts[1].to_string());
        }

        if values.is_empty() {
            return Ok(None);
        }
        if values.len() != EXPECTED_TAGS.len() {
            return Err(corrupted(
                STUDENT_DETAILS_FILE,
                "expected exactly three detail lines",
            ));
        }

        let major: Major = values[1]
            .parse()
            .map_err(|_| corrupted(STUDENT_DETAILS_FILE, format!("unknown major '{}'", values[1])))?;
        let profile = StudentProfile::new(&values[0], major, &values[2])
            .map_err(|_| corrupted(STUDENT_DETAILS_FILE, "invalid name or academic year"))?;
        Ok(Some(profile))
    }

    /// Parses `timetable.txt` into replayable commands, validated against the
    /// student's live current-semester timetable. Any parse or semantic
    /// failure is reported as file corruption, not as a command error.
    pub fn load_timetable(&self, student: &Student) -> Result<Vec<TimetableCommand>> {
        let content = self.read_file(TIMETABLE_FILE)?;
        let mut lines = content.lines();

        match lines.next() {
            // freshly bootstrapped file
            None => return Ok(Vec::new()),
            Some(first) if first == TIMETABLE_SENTINEL => {}
            Some(first) => {
                return Err(corrupted(
                    TIMETABLE_FILE,
                    format!("expected '{}' header, found '{}'", TIMETABLE_SENTINEL, first),
                ))
            }
        }

        let mut commands = Vec::new();
        for line in lines {
            let command = TimetableCommand::parse(line, student.timetable())
                .map_err(|e| corrupted(TIMETABLE_FILE, e.to_string()))?;
            commands.push(command);
        }
        Ok(commands)
    }

    /// Replays loaded timetable commands onto the student's timetable.
    pub fn apply_timetable_commands(
        &self,
        commands: &[TimetableCommand],
        student: &mut Student,
    ) -> Result<()> {
        for command in commands {
            command
                .apply(student.timetable_mut())
                .map_err(|e| corrupted(TIMETABLE_FILE, e.to_string()))?;
        }
        Ok(())
    }

    /// Rewrites `schedule.txt` from the live schedule: capacity line first,
    /// then one module line per entry in list order.
    pub fn save_schedule(&self, schedule: &Schedule) -> Result<()> {
        let counts = schedule
            .modules_per_sem()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let mut out = format!("{}{}{}\n", SCHEDULE_HEADER_TAG, FIELD_SEPARATOR, counts);
        for module in schedule.modules().iter() {
            let marker = if module.is_completed() {
                COMPLETED_MARKER
            } else {
                NOT_COMPLETED_MARKER
            };
            out.push_str(&format!(
                "{}{}{}{}{}\n",
                MODULE_TAG,
                FIELD_SEPARATOR,
                module.code(),
                FIELD_SEPARATOR,
                marker
            ));
        }

        fs::write(self.data_dir.join(SCHEDULE_FILE), out)?;
        Ok(())
    }

    /// Rewrites `studentDetails.txt` from the live profile.
    pub fn save_student_details(&self, student: &Student) -> Result<()> {
        let profile = student.profile();
        let out = format!(
            "{}{}{}\n{}{}{}\n{}{}{}\n",
            NAME_TAG,
            FIELD_SEPARATOR,
            profile.name,
            MAJOR_TAG,
            FIELD_SEPARATOR,
            profile.major,
            YEAR_TAG,
            FIELD_SEPARATOR,
            profile.year
        );

        fs::write(self.data_dir.join(STUDENT_DETAILS_FILE), out)?;
        Ok(())
    }

    /// Rewrites `timetable.txt`: refreshes the timetable from current
    /// schedule state, then emits one line per event. With no events the file
    /// holds the header alone.
    pub fn save_timetable(&self, student: &mut Student) -> Result<()> {
        student.update_timetable();

        let mut out = String::from(TIMETABLE_SENTINEL);
        out.push('\n');
        for weekly in student.timetable().modules_weekly() {
            for event in weekly.events() {
                out.push_str(&event.to_save_line(weekly.code()));
                out.push('\n');
            }
        }

        fs::write(self.data_dir.join(TIMETABLE_FILE), out)?;
        Ok(())
    }
}
