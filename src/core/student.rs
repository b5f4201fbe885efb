use crate::core::schedule::Schedule;
use crate::core::timetable::Timetable;
use crate::domain::model::{Major, StudentProfile};
use crate::domain::requirements;
use crate::utils::validation;

/// One planning session's state: the student's identity plus the schedule and
/// timetable they exclusively own.
#[derive(Debug, Clone)]
pub struct Student {
    profile: StudentProfile,
    schedule: Schedule,
    timetable: Timetable,
}

impl Student {
    pub fn new(profile: StudentProfile) -> Self {
        Self {
            profile,
            schedule: Schedule::new(),
            timetable: Timetable::new(),
        }
    }

    pub fn with_schedule(profile: StudentProfile, schedule: Schedule) -> Self {
        Self {
            profile,
            schedule,
            timetable: Timetable::new(),
        }
    }

    pub fn profile(&self) -> &StudentProfile {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: StudentProfile) {
        self.profile = profile;
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn major(&self) -> Major {
        self.profile.major
    }

    pub fn year(&self) -> &str {
        &self.profile.year
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }

    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    pub fn timetable_mut(&mut self) -> &mut Timetable {
        &mut self.timetable
    }

    /// Overall semester number the student is currently in, derived from the
    /// academic year token.
    pub fn current_semester(&self) -> u8 {
        // the year token is validated when the profile is constructed
        validation::semester_of_academic_year(&self.profile.year).unwrap_or(1)
    }

    pub fn current_semester_module_codes(&self) -> Vec<String> {
        self.schedule
            .modules_in_semester(self.current_semester())
            .iter()
            .map(|m| m.code().to_string())
            .collect()
    }

    /// Rebuilds the weekly timetable against the current-semester module set,
    /// keeping events of modules that remain current.
    pub fn update_timetable(&mut self) {
        let codes = self.current_semester_module_codes();
        self.timetable.reconcile(&codes);
    }

    /// Required modules for the student's major that are not yet completed.
    pub fn incomplete_required(&self) -> Vec<&'static str> {
        requirements::required_modules(self.profile.major)
            .iter()
            .filter(|code| {
                !self
                    .schedule
                    .modules()
                    .by_code(code)
                    .map(|m| m.is_completed())
                    .unwrap_or(false)
            })
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(year: &str) -> StudentProfile {
        StudentProfile::new("Alex", Major::Ceg, year).unwrap()
    }

    #[test]
    fn test_current_semester_from_year_token() {
        assert_eq!(Student::new(profile("Y1/S1")).current_semester(), 1);
        assert_eq!(Student::new(profile("Y2/S1")).current_semester(), 3);
        assert_eq!(Student::new(profile("Y4/S2")).current_semester(), 8);
    }

    #[test]
    fn test_update_timetable_follows_current_semester() {
        let schedule = Schedule::seeded("CS1010 MA1511", [2, 0, 0, 0, 0, 0, 0, 0]);
        let mut student = Student::with_schedule(profile("Y1/S1"), schedule);

        student.update_timetable();
        let codes: Vec<&str> = student
            .timetable()
            .modules_weekly()
            .iter()
            .map(|w| w.code())
            .collect();
        assert_eq!(codes, vec!["CS1010", "MA1511"]);

        // a later semester has no modules planned
        student.set_profile(profile("Y2/S2"));
        student.update_timetable();
        assert!(student.timetable().modules_weekly().is_empty());
    }

    #[test]
    fn test_incomplete_required_tracks_completion() {
        let schedule = Schedule::seeded("CS1010", [1, 0, 0, 0, 0, 0, 0, 0]);
        let student = Student::with_schedule(profile("Y1/S1"), schedule);

        let remaining = student.incomplete_required();
        assert!(!remaining.contains(&"CS1010"));
        assert!(remaining.contains(&"CS2113"));
    }
}
