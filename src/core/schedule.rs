use crate::domain::model::{Module, ModuleList};
use crate::domain::ports::Catalogue;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{self, SEMESTER_COUNT};
use std::collections::HashSet;

/// Resolves a list position to its semester number via the cumulative
/// capacity ranges. Returns None when the position lies past the planned
/// capacity.
pub fn semester_for_position(
    modules_per_sem: &[u32; SEMESTER_COUNT],
    position: usize,
) -> Option<u8> {
    let mut cumulative = 0usize;
    for (i, count) in modules_per_sem.iter().enumerate() {
        cumulative += *count as usize;
        if position < cumulative {
            return Some(i as u8 + 1);
        }
    }
    None
}

/// The ordered, capacity-partitioned plan of modules across semesters.
///
/// Semester membership is never stored per module. The module list is kept in
/// semester-assignment order and `modules_per_sem[i]` counts the modules
/// planned for semester `i + 1`; a module's semester is derived from its list
/// position with [`semester_for_position`]. The counts sum to the list length
/// except transiently inside an insertion.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    planned: ModuleList,
    modules_per_sem: [u32; SEMESTER_COUNT],
}

fn not_planned(code: &str) -> PlannerError {
    PlannerError::InvalidArgument {
        field: "module code".to_string(),
        value: code.to_string(),
        reason: "module is not in the schedule".to_string(),
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schedule pre-seeded with completed modules from a
    /// whitespace-separated code string and a per-semester capacity vector.
    /// Bootstrap path: no catalogue access, duplicate codes are skipped.
    pub fn seeded(completed: &str, modules_per_sem: [u32; SEMESTER_COUNT]) -> Self {
        let mut planned = ModuleList::new();
        for code in completed.split_whitespace() {
            let mut module = Module::bare(code);
            module.mark_completed();
            let _ = planned.add(module);
        }
        Self {
            planned,
            modules_per_sem,
        }
    }

    /// Plans a module into `target_semester`.
    ///
    /// Fails with `InvalidArgument` for a semester outside 1..=8 or an
    /// unrecognized module code, with `DuplicateModule` when already planned,
    /// and with `FailPrereq` when the prerequisite list is not covered by the
    /// modules taken before `target_semester`. On any failure the schedule is
    /// left untouched.
    pub async fn add_module(
        &mut self,
        code: &str,
        target_semester: u8,
        catalogue: &dyn Catalogue,
    ) -> Result<()> {
        validation::validate_semester("target semester", target_semester)?;
        validation::validate_module_code("module code", code)?;
        if self.planned.contains(code) {
            return Err(PlannerError::DuplicateModule(code.to_string()));
        }

        let info = match catalogue.module_info(code).await {
            Ok(info) => info,
            Err(PlannerError::UnknownModule(value)) => {
                return Err(PlannerError::InvalidArgument {
                    field: "module code".to_string(),
                    value,
                    reason: "not a recognized catalogue module".to_string(),
                })
            }
            Err(e) => return Err(e),
        };

        let prerequisites = catalogue.prerequisites(code).await?;
        let taken = self.taken_before(target_semester);
        let missing: Vec<String> = prerequisites
            .iter()
            .filter(|p| !taken.contains(p.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PlannerError::FailPrereq {
                module: code.to_string(),
                missing,
            });
        }

        self.planned.add(Module::new(code, info))?;
        self.modules_per_sem[(target_semester - 1) as usize] += 1;
        Ok(())
    }

    /// Removes a planned module and releases its semester slot.
    ///
    /// Fails with `FailPrereq` when another planned module counted the
    /// removed one among its satisfied prerequisites.
    pub async fn remove_module(&mut self, code: &str, catalogue: &dyn Catalogue) -> Result<Module> {
        let position = self.planned.position(code).ok_or_else(|| not_planned(code))?;
        let semester = semester_for_position(&self.modules_per_sem, position)
            .ok_or_else(|| not_planned(code))?;
        let completed = self
            .planned
            .by_index(position)
            .map(|m| m.is_completed())
            .unwrap_or(false);

        for (i, module) in self.planned.iter().enumerate() {
            if module.code() == code {
                continue;
            }
            let dependant_semester = match semester_for_position(&self.modules_per_sem, i) {
                Some(s) => s,
                None => continue,
            };
            // the removed module only covered prerequisites of modules in
            // later semesters, or of any module when it was completed
            if !(semester < dependant_semester || completed) {
                continue;
            }
            let prerequisites = catalogue.prerequisites(module.code()).await?;
            if prerequisites.iter().any(|p| p == code) {
                return Err(PlannerError::FailPrereq {
                    module: module.code().to_string(),
                    missing: vec![code.to_string()],
                });
            }
        }

        let removed = self.planned.remove(code).ok_or_else(|| not_planned(code))?;
        self.modules_per_sem[(semester - 1) as usize] -= 1;
        Ok(removed)
    }

    /// Re-inserts a module without prerequisite gating. Reload path: the
    /// persisted file already passed structural validation and its history is
    /// trusted.
    pub(crate) fn restore_module(&mut self, module: Module, target_semester: u8) -> Result<()> {
        validation::validate_semester("target semester", target_semester)?;
        self.planned.add(module)?;
        self.modules_per_sem[(target_semester - 1) as usize] += 1;
        Ok(())
    }

    pub fn mark_module_as_completed(&mut self, code: &str) -> Result<()> {
        match self.planned.by_code_mut(code) {
            Some(module) => {
                module.mark_completed();
                Ok(())
            }
            None => Err(not_planned(code)),
        }
    }

    pub fn completion_status(&self, code: &str) -> Result<bool> {
        self.planned
            .by_code(code)
            .map(|m| m.is_completed())
            .ok_or_else(|| not_planned(code))
    }

    pub fn modules(&self) -> &ModuleList {
        &self.planned
    }

    pub fn module_codes(&self) -> Vec<String> {
        self.planned.codes()
    }

    pub fn modules_per_sem(&self) -> &[u32; SEMESTER_COUNT] {
        &self.modules_per_sem
    }

    /// Derived semester of a planned module.
    pub fn semester_of(&self, code: &str) -> Option<u8> {
        let position = self.planned.position(code)?;
        semester_for_position(&self.modules_per_sem, position)
    }

    pub fn modules_in_semester(&self, semester: u8) -> Vec<&Module> {
        self.planned
            .iter()
            .enumerate()
            .filter(|(i, _)| semester_for_position(&self.modules_per_sem, *i) == Some(semester))
            .map(|(_, m)| m)
            .collect()
    }

    /// Codes counted as taken by the start of `target_semester`: everything
    /// derived to an earlier semester, plus anything marked completed.
    fn taken_before(&self, target_semester: u8) -> HashSet<&str> {
        self.planned
            .iter()
            .enumerate()
            .filter_map(|(i, module)| {
                match semester_for_position(&self.modules_per_sem, i) {
                    Some(s) if s < target_semester => Some(module.code()),
                    _ if module.is_completed() => Some(module.code()),
                    _ => None,
                }
            })
            .collect()
    }
}
