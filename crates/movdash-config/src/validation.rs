//! Validation utilities and regex patterns

use chrono::format::{Item, StrftimeItems};
use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #FF0000)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Validate a log level name
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("invalid_log_level")),
    }
}

/// Validate a chrono `strftime` layout used to parse timestamp cells
pub fn validate_timestamp_format(format: &str) -> Result<(), ValidationError> {
    if format.trim().is_empty() {
        return Err(ValidationError::new("empty_timestamp_format"));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ValidationError::new("invalid_timestamp_format"));
    }
    Ok(())
}

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    // Colon stays allowed for Windows drive letters (C:\)
    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_regex() {
        assert!(HEX_COLOR_REGEX.is_match("#FFFFFF"));
        assert!(HEX_COLOR_REGEX.is_match("#1f77b4"));
        assert!(!HEX_COLOR_REGEX.is_match("FFFFFF"));
        assert!(!HEX_COLOR_REGEX.is_match("#FFF"));
        assert!(!HEX_COLOR_REGEX.is_match("#GGGGGG"));
    }

    #[test]
    fn test_validate_log_level() {
        assert!(validate_log_level("debug").is_ok());
        assert!(validate_log_level("verbose").is_err());
    }

    #[test]
    fn test_validate_timestamp_format() {
        assert!(validate_timestamp_format("%Y-%m-%d %H:%M:%S").is_ok());
        assert!(validate_timestamp_format("%d/%m/%Y").is_ok());
        assert!(validate_timestamp_format("%Y-%m-%d %Q").is_err());
        assert!(validate_timestamp_format("  ").is_err());
    }

    #[test]
    fn test_validate_file_path() {
        assert!(validate_file_path("BASE_MOVIMENTACOES.xlsx").is_ok());
        assert!(validate_file_path("C:\\dados\\base.xlsx").is_ok());
        assert!(validate_file_path("").is_err());
        assert!(validate_file_path("base?.xlsx").is_err());
    }
}
