//! String formats used by the dashboard backend
//!
//! The backend stores keyword and city lists as JSON arrays embedded in JSON
//! string fields (`"[\"rust\",\"backend\"]"`) and salary filters as compact
//! range strings (`"15k-25k"`). Both directions live here.

use super::types::SalaryRange;
use thiserror::Error;

/// Salary range parse errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SalaryParseError {
    /// Input was empty or whitespace
    #[error("empty salary range")]
    Empty,
    /// Input did not match the `15k-25k` shape
    #[error("invalid salary range: {0}")]
    Invalid(String),
    /// Lower bound above upper bound
    #[error("inverted salary range: {min}k > {max}k")]
    Inverted { min: u32, max: u32 },
}

/// Parse a salary range string.
///
/// Accepts `15k-25k`, `15K-25K`, `15-25k`, bare `15-25`, and a single value
/// (`20k`, min == max). Values are in thousands. Surrounding whitespace is
/// tolerated on either part.
pub fn parse_salary_range(input: &str) -> Result<SalaryRange, SalaryParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SalaryParseError::Empty);
    }

    let mut parts = trimmed.splitn(2, '-');
    let min = parse_part(parts.next().unwrap_or(""), input)?;
    let max = match parts.next() {
        Some(part) => parse_part(part, input)?,
        None => min,
    };

    if min > max {
        return Err(SalaryParseError::Inverted { min, max });
    }

    Ok(SalaryRange {
        min_thousands: min,
        max_thousands: max,
    })
}

fn parse_part(part: &str, original: &str) -> Result<u32, SalaryParseError> {
    let trimmed = part.trim();
    let digits = trimmed.strip_suffix(['k', 'K']).unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(SalaryParseError::Invalid(original.to_string()));
    }

    digits
        .parse()
        .map_err(|_| SalaryParseError::Invalid(original.to_string()))
}

/// Decode a JSON array embedded in a string field.
///
/// Format: `"[\"rust\", \"backend\"]"`.
pub fn decode_string_list(raw: &str) -> anyhow::Result<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|e| anyhow::anyhow!("Failed to parse string list: {} - {}", raw, e))
}

/// Encode a string list back into the embedded-JSON wire form.
pub fn encode_string_list(items: &[String]) -> String {
    serde_json::to_string(items).expect("string list serialization cannot fail")
}
