use crate::utils::error::{PlannerError, Result};
use crate::utils::validation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalogue metadata for a module, as returned by the catalogue port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub title: String,
    pub description: String,
    pub credits: u32,
}

/// A single planned module. Identity is the catalogue code; the completion
/// flag is the only mutable field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    code: String,
    name: String,
    description: String,
    credits: u32,
    completed: bool,
}

impl Module {
    pub fn new(code: impl Into<String>, info: ModuleInfo) -> Self {
        Self {
            code: code.into(),
            name: info.title,
            description: info.description,
            credits: info.credits,
            completed: false,
        }
    }

    /// Builds a module from a code alone, without catalogue metadata.
    /// Used by the seeded-schedule bootstrap path.
    pub fn bare(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            description: String::new(),
            credits: 4,
            completed: false,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

/// Ordered, code-unique collection of modules. Insertion order is
/// semantically meaningful: together with the schedule's per-semester counts
/// it encodes semester assignment.
#[derive(Debug, Clone, Default)]
pub struct ModuleList {
    modules: Vec<Module>,
}

impl ModuleList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, module: Module) -> Result<()> {
        if self.contains(module.code()) {
            return Err(PlannerError::DuplicateModule(module.code().to_string()));
        }
        self.modules.push(module);
        Ok(())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.by_code(code).is_some()
    }

    pub fn by_code(&self, code: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.code() == code)
    }

    pub fn by_code_mut(&mut self, code: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.code() == code)
    }

    pub fn by_index(&self, index: usize) -> Option<&Module> {
        self.modules.get(index)
    }

    pub fn position(&self, code: &str) -> Option<usize> {
        self.modules.iter().position(|m| m.code() == code)
    }

    pub fn remove(&mut self, code: &str) -> Option<Module> {
        let index = self.position(code)?;
        Some(self.modules.remove(index))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn codes(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.code().to_string()).collect()
    }
}

/// Supported majors. Read case-insensitively, stored uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Major {
    Cs,
    Ceg,
}

impl FromStr for Major {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "CS" => Ok(Major::Cs),
            "CEG" => Ok(Major::Ceg),
            _ => Err(PlannerError::InvalidArgument {
                field: "major".to_string(),
                value: s.to_string(),
                reason: "supported majors are CS and CEG".to_string(),
            }),
        }
    }
}

impl fmt::Display for Major {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Major::Cs => write!(f, "CS"),
            Major::Ceg => write!(f, "CEG"),
        }
    }
}

/// Identifying details of the planning student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub name: String,
    pub major: Major,
    pub year: String,
}

impl StudentProfile {
    pub fn new(name: &str, major: Major, year: &str) -> Result<Self> {
        validation::validate_plain_text("name", name)?;
        validation::validate_academic_year("year", year)?;
        Ok(Self {
            name: name.to_string(),
            major,
            year: year.to_string(),
        })
    }
}
