pub mod model;
pub mod ports;
pub mod requirements;

pub use model::{Major, Module, ModuleInfo, ModuleList, StudentProfile};
pub use ports::Catalogue;
