use crate::utils::error::{PlannerError, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Number of semesters a plan can span.
pub const SEMESTER_COUNT: usize = 8;

fn module_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{2,4}[0-9]{4}[A-Z]{0,2}$").unwrap())
}

fn academic_year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Y([1-4])/S([12])$").unwrap())
}

/// Whether a token has the shape of a catalogue module code (e.g. CS2113, MA1511).
pub fn is_module_code(token: &str) -> bool {
    module_code_regex().is_match(token)
}

pub fn validate_module_code(field_name: &str, code: &str) -> Result<()> {
    if !is_module_code(code) {
        return Err(PlannerError::InvalidArgument {
            field: field_name.to_string(),
            value: code.to_string(),
            reason: "not a valid module code".to_string(),
        });
    }
    Ok(())
}

/// Academic year tokens look like Y2/S1: year of study 1-4, semester 1-2.
pub fn validate_academic_year(field_name: &str, year: &str) -> Result<()> {
    if !academic_year_regex().is_match(year) {
        return Err(PlannerError::InvalidArgument {
            field: field_name.to_string(),
            value: year.to_string(),
            reason: "expected format Y<1-4>/S<1-2>".to_string(),
        });
    }
    Ok(())
}

/// Maps an academic year token to its overall semester number (Y1/S1 -> 1, Y4/S2 -> 8).
pub fn semester_of_academic_year(year: &str) -> Option<u8> {
    let caps = academic_year_regex().captures(year)?;
    let y: u8 = caps[1].parse().ok()?;
    let s: u8 = caps[2].parse().ok()?;
    Some((y - 1) * 2 + s)
}

pub fn validate_semester(field_name: &str, semester: u8) -> Result<()> {
    if semester < 1 || semester as usize > SEMESTER_COUNT {
        return Err(PlannerError::InvalidArgument {
            field: field_name.to_string(),
            value: semester.to_string(),
            reason: format!("semester must be between 1 and {}", SEMESTER_COUNT),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlannerError::InvalidArgument {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Persisted fields share a line grammar with a literal ` | ` separator, so
/// values must not contain the pipe character.
pub fn validate_plain_text(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if value.contains('|') || value.contains('\n') {
        return Err(PlannerError::InvalidArgument {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "value cannot contain '|' or line breaks".to_string(),
        });
    }
    Ok(())
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PlannerError::InvalidArgument {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PlannerError::InvalidArgument {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PlannerError::InvalidArgument {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("invalid URL format: {}", e),
        }),
    }
}
