use crate::core::schedule::Schedule;
use crate::core::storage::Storage;
use crate::core::student::Student;
use crate::core::timetable::TimetableCommand;
use crate::domain::model::{Major, StudentProfile};
use crate::domain::ports::Catalogue;
use crate::utils::error::{PlannerError, Result};

/// One planning session: loads persisted state on open, applies mutations,
/// and rewrites all three files on save.
#[derive(Debug)]
pub struct PlannerSession<C: Catalogue> {
    storage: Storage,
    catalogue: C,
    student: Option<Student>,
}

impl<C: Catalogue> PlannerSession<C> {
    /// Bootstraps the data directory and loads whatever state exists.
    /// Missing files fall back to defaults; corrupted files abort the open.
    pub async fn open(storage: Storage, catalogue: C) -> Result<Self> {
        storage.create_user_storage_files();

        let profile = match storage.load_student_details() {
            Ok(profile) => profile,
            Err(PlannerError::MissingFile(path)) => {
                tracing::info!("No student details at {}, starting fresh", path.display());
                None
            }
            Err(e) => return Err(e),
        };

        let student = match profile {
            None => None,
            Some(profile) => {
                let schedule = match storage.load_schedule(&catalogue).await {
                    Ok(schedule) => schedule,
                    Err(PlannerError::MissingFile(_)) => Schedule::new(),
                    Err(e) => return Err(e),
                };
                let mut student = Student::with_schedule(profile, schedule);
                student.update_timetable();

                match storage.load_timetable(&student) {
                    Ok(commands) => {
                        storage.apply_timetable_commands(&commands, &mut student)?;
                    }
                    Err(PlannerError::MissingFile(_)) => {}
                    Err(e) => return Err(e),
                }
                Some(student)
            }
        };

        Ok(Self {
            storage,
            catalogue,
            student,
        })
    }

    pub fn student(&self) -> Option<&Student> {
        self.student.as_ref()
    }

    fn student_mut(&mut self) -> Result<&mut Student> {
        self.student.as_mut().ok_or(PlannerError::MissingProfile)
    }

    /// Sets or replaces the student profile; the schedule is kept.
    pub fn set_profile(&mut self, name: &str, major: &str, year: &str) -> Result<()> {
        let major: Major = major.parse()?;
        let profile = StudentProfile::new(name, major, year)?;
        match &mut self.student {
            Some(student) => student.set_profile(profile),
            None => self.student = Some(Student::new(profile)),
        }
        Ok(())
    }

    pub async fn add_module(&mut self, code: &str, semester: u8) -> Result<()> {
        let code = code.to_uppercase();
        let catalogue = &self.catalogue;
        let student = self.student.as_mut().ok_or(PlannerError::MissingProfile)?;
        student
            .schedule_mut()
            .add_module(&code, semester, catalogue)
            .await
    }

    pub async fn remove_module(&mut self, code: &str) -> Result<()> {
        let code = code.to_uppercase();
        let catalogue = &self.catalogue;
        let student = self.student.as_mut().ok_or(PlannerError::MissingProfile)?;
        student.schedule_mut().remove_module(&code, catalogue).await?;
        Ok(())
    }

    pub fn complete_module(&mut self, code: &str) -> Result<()> {
        let code = code.to_uppercase();
        self.student_mut()?
            .schedule_mut()
            .mark_module_as_completed(&code)
    }

    /// Parses and applies one timetable command against the live
    /// current-semester timetable.
    pub fn apply_event(&mut self, line: &str) -> Result<()> {
        let student = self.student_mut()?;
        student.update_timetable();
        let command = TimetableCommand::parse(line, student.timetable())?;
        command.apply(student.timetable_mut())
    }

    /// Rewrites all three persisted files from live state. No-op until a
    /// profile exists.
    pub fn save(&mut self) -> Result<()> {
        if let Some(student) = &mut self.student {
            self.storage.save_student_details(student)?;
            self.storage.save_schedule(student.schedule())?;
            self.storage.save_timetable(student)?;
            tracing::debug!("Planner state saved to {}", self.storage.data_dir().display());
        }
        Ok(())
    }
}
