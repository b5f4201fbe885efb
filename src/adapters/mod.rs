pub mod nusmods;

pub use nusmods::RemoteCatalogue;
