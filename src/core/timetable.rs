use crate::utils::error::{PlannerError, Result};
use chrono::{NaiveTime, Weekday};
use std::fmt;
use std::str::FromStr;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Lecture,
    Tutorial,
    Lab,
}

impl FromStr for EventKind {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lecture" => Ok(EventKind::Lecture),
            "tutorial" => Ok(EventKind::Tutorial),
            "lab" => Ok(EventKind::Lab),
            _ => Err(PlannerError::InvalidArgument {
                field: "event kind".to_string(),
                value: s.to_string(),
                reason: "expected lecture, tutorial or lab".to_string(),
            }),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Lecture => write!(f, "lecture"),
            EventKind::Tutorial => write!(f, "tutorial"),
            EventKind::Lab => write!(f, "lab"),
        }
    }
}

/// A weekly recurring timetable slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Event {
    /// Serialized event line. The output is itself a valid timetable command,
    /// so saved lines replay through [`TimetableCommand::parse`] on reload.
    pub fn to_save_line(&self, code: &str) -> String {
        format!(
            "{} {} {} {} {}",
            code,
            self.kind,
            self.day,
            self.start.format(TIME_FORMAT),
            self.end.format(TIME_FORMAT)
        )
    }
}

/// The weekly calendar of one current-semester module.
#[derive(Debug, Clone, Default)]
pub struct ModuleWeekly {
    code: String,
    events: Vec<Event>,
}

impl ModuleWeekly {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            events: Vec::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

/// Weekly calendars for every module active in the current semester.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    modules_weekly: Vec<ModuleWeekly>,
}

impl Timetable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modules_weekly(&self) -> &[ModuleWeekly] {
        &self.modules_weekly
    }

    pub fn weekly_for(&self, code: &str) -> Option<&ModuleWeekly> {
        self.modules_weekly.iter().find(|w| w.code() == code)
    }

    pub fn weekly_for_mut(&mut self, code: &str) -> Option<&mut ModuleWeekly> {
        self.modules_weekly.iter_mut().find(|w| w.code() == code)
    }

    pub fn has_events(&self) -> bool {
        self.modules_weekly.iter().any(|w| !w.events().is_empty())
    }

    /// Reconciles the calendars with the current-semester module set: keeps
    /// events of surviving modules, adds empty calendars for new ones, drops
    /// calendars of modules no longer current.
    pub fn reconcile(&mut self, current_codes: &[String]) {
        let mut next: Vec<ModuleWeekly> = Vec::with_capacity(current_codes.len());
        for code in current_codes {
            match self.modules_weekly.iter().position(|w| w.code() == code) {
                Some(i) => next.push(self.modules_weekly.remove(i)),
                None => next.push(ModuleWeekly::new(code.clone())),
            }
        }
        self.modules_weekly = next;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimetableAction {
    Add(Event),
    Clear,
}

/// One user-issued (or replayed) timetable mutation.
///
/// Grammar, whitespace-separated:
///   `CODE KIND DAY START END`  add an event (times as HH:MM, start < end)
///   `CODE clear`               drop all events of the module
///
/// Commands only target modules present in the current-semester timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableCommand {
    code: String,
    action: TimetableAction,
}

fn invalid(line: &str, reason: impl Into<String>) -> PlannerError {
    PlannerError::InvalidTimetableCommand {
        line: line.to_string(),
        reason: reason.into(),
    }
}

impl TimetableCommand {
    pub fn parse(line: &str, timetable: &Timetable) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let (code_token, action) = match tokens.as_slice() {
            [code, keyword] if keyword.eq_ignore_ascii_case("clear") => {
                (*code, TimetableAction::Clear)
            }
            [code, kind, day, start, end] => {
                let kind: EventKind = kind.parse().map_err(|_| {
                    invalid(line, format!("unknown event kind '{}'", kind))
                })?;
                let day: Weekday = day
                    .parse()
                    .map_err(|_| invalid(line, format!("unknown day '{}'", day)))?;
                let start = NaiveTime::parse_from_str(start, TIME_FORMAT)
                    .map_err(|_| invalid(line, format!("bad start time '{}'", start)))?;
                let end = NaiveTime::parse_from_str(end, TIME_FORMAT)
                    .map_err(|_| invalid(line, format!("bad end time '{}'", end)))?;
                if start >= end {
                    return Err(invalid(line, "start time must be before end time"));
                }
                (
                    *code,
                    TimetableAction::Add(Event {
                        kind,
                        day,
                        start,
                        end,
                    }),
                )
            }
            _ => {
                return Err(invalid(
                    line,
                    "expected 'CODE KIND DAY START END' or 'CODE clear'",
                ))
            }
        };

        let code = code_token.to_uppercase();
        if timetable.weekly_for(&code).is_none() {
            return Err(invalid(
                line,
                format!("module {} is not in the current semester", code),
            ));
        }

        Ok(Self { code, action })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn apply(&self, timetable: &mut Timetable) -> Result<()> {
        let weekly = timetable.weekly_for_mut(&self.code).ok_or_else(|| {
            invalid(
                &self.code,
                "module is no longer in the current semester",
            )
        })?;
        match &self.action {
            TimetableAction::Add(event) => weekly.add_event(event.clone()),
            TimetableAction::Clear => weekly.clear_events(),
        }
        Ok(())
    }
}
