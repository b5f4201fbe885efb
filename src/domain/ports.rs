use crate::domain::model::ModuleInfo;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of module metadata and prerequisite lists.
///
/// Prerequisite lists use AND semantics: every returned code must be taken
/// before the module can be scheduled.
#[async_trait]
pub trait Catalogue: Send + Sync {
    /// Fetch title, description and credits for a module code.
    /// Unrecognized codes fail with `PlannerError::UnknownModule`.
    async fn module_info(&self, code: &str) -> Result<ModuleInfo>;

    /// Fetch the list of prerequisite module codes for a module code.
    async fn prerequisites(&self, code: &str) -> Result<Vec<String>>;
}
