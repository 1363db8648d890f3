use thiserror::Error;

pub const DEFAULT_DELIMITER: char = ',';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("text input is required")]
    InvalidInput,
}

// Splits raw input into ordered clauses, one candidate event each. Clause
// order is significant; empty segments are dropped.
pub fn segment(raw_text: &str, delimiter: char) -> Result<Vec<String>, ExtractError> {
    if raw_text.trim().is_empty() {
        return Err(ExtractError::InvalidInput);
    }
    Ok(raw_text
        .split(delimiter)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect())
}
