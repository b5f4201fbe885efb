pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::nusmods::RemoteCatalogue;
pub use crate::app::PlannerSession;
pub use crate::config::{CliConfig, Command, Settings};
pub use crate::core::{Schedule, Storage, Student};
pub use crate::domain::{Catalogue, Major, Module, ModuleInfo, ModuleList, StudentProfile};
pub use crate::utils::error::{PlannerError, Result};
