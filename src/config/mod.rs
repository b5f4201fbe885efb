pub mod file;

use crate::adapters::nusmods::DEFAULT_CATALOGUE_URL;
use crate::utils::error::Result;
use crate::utils::validation;
use clap::{Parser, Subcommand};
use file::FileConfig;

const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Parser)]
#[command(name = "modplan")]
#[command(about = "Plan university modules across semesters")]
pub struct CliConfig {
    #[arg(long, help = "Data directory for persisted planner state")]
    pub data_dir: Option<String>,

    #[arg(long, help = "Base URL of the module catalogue API")]
    pub catalogue_url: Option<String>,

    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the student profile
    Profile {
        name: String,
        major: String,
        year: String,
    },
    /// Plan a module into a semester
    Add { code: String, semester: u8 },
    /// Remove a planned module
    Remove { code: String },
    /// Mark a planned module as completed
    Complete { code: String },
    /// Show the full schedule
    Show,
    /// List required modules not yet completed
    Required,
    /// Apply a timetable command, e.g. "CS2113 lecture Mon 16:00 18:00"
    Event { line: String },
    /// Show the current-semester timetable
    Timetable,
}

/// Effective settings after merging CLI flags, the optional config file and
/// built-in defaults (in that priority order).
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: String,
    pub catalogue_url: String,
}

impl Settings {
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                let config = FileConfig::from_file(path)?;
                config.validate_config()?;
                config
            }
            None => FileConfig::default(),
        };

        let data_dir = cli
            .data_dir
            .clone()
            .or(file.data_dir)
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let catalogue_url = cli
            .catalogue_url
            .clone()
            .or(file.catalogue_url)
            .unwrap_or_else(|| DEFAULT_CATALOGUE_URL.to_string());

        validation::validate_non_empty_string("data_dir", &data_dir)?;
        validation::validate_url("catalogue_url", &catalogue_url)?;

        Ok(Self {
            data_dir,
            catalogue_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli(args: &[&str]) -> CliConfig {
        CliConfig::parse_from(std::iter::once("modplan").chain(args.iter().copied()))
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::resolve(&cli(&["show"])).unwrap();
        assert_eq!(settings.data_dir, DEFAULT_DATA_DIR);
        assert_eq!(settings.catalogue_url, DEFAULT_CATALOGUE_URL);
    }

    #[test]
    fn test_cli_flags_override_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"data_dir = \"/from-file\"\ncatalogue_url = \"https://file.example.com\"\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let settings = Settings::resolve(&cli(&[
            "--config",
            &path,
            "--data-dir",
            "/from-cli",
            "show",
        ]))
        .unwrap();

        assert_eq!(settings.data_dir, "/from-cli");
        assert_eq!(settings.catalogue_url, "https://file.example.com");
    }

    #[test]
    fn test_bad_catalogue_url_is_rejected() {
        assert!(Settings::resolve(&cli(&["--catalogue-url", "nonsense", "show"])).is_err());
    }
}
