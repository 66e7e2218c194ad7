//! US state code normalization.
//!
//! Credential and requisition states arrive in many spellings ("TX", "texas",
//! "Houston, TX 77030"). Location matching compares the normalized 2-letter
//! code so all of these count as the same state.

use regex::Regex;
use std::sync::LazyLock;

/// 2-letter code and full name for every state, DC and the inhabited territories
const STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
    ("DC", "District of Columbia"),
    ("PR", "Puerto Rico"),
    ("GU", "Guam"),
    ("VI", "Virgin Islands"),
    ("AS", "American Samoa"),
    ("MP", "Northern Mariana Islands"),
];

/// Extra spellings that are not a full name from `STATES`
const NAME_ALIASES: &[(&str, &str)] = &[("washington dc", "DC"), ("washington d.c.", "DC")];

/// ", ST" at the end, optionally followed by a ZIP or ZIP+4
static TRAILING_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i),\s*([a-z]{2})\s*(?:\d{5}(?:-\d{4})?)?\s*$")
        .expect("Invalid state code regex")
});

/// ", State Name" at the end, optionally followed by a ZIP or ZIP+4
static TRAILING_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r",\s*([A-Za-z][A-Za-z\s]+?)\s*(?:\d{5}(?:-\d{4})?)?\s*$")
        .expect("Invalid state name regex")
});

fn code_for_code(input: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(input))
        .map(|(code, _)| *code)
}

fn code_for_name(input: &str) -> Option<&'static str> {
    let lower = input.to_lowercase();
    STATES
        .iter()
        .find(|(_, name)| name.to_lowercase() == lower)
        .map(|(code, _)| *code)
        .or_else(|| {
            NAME_ALIASES
                .iter()
                .find(|(alias, _)| *alias == lower)
                .map(|(_, code)| *code)
        })
}

/// Normalize a state name, code or "City, ST" location to a 2-letter code.
///
/// # Examples
///
/// ```
/// use credmatch::utils::states::normalize_state;
///
/// assert_eq!(normalize_state("tx"), Some("TX"));
/// assert_eq!(normalize_state("New York"), Some("NY"));
/// assert_eq!(normalize_state("Houston, TX 77030"), Some("TX"));
/// assert_eq!(normalize_state("Narnia"), None);
/// ```
#[must_use]
pub fn normalize_state(input: &str) -> Option<&'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.len() == 2 {
        if let Some(code) = code_for_code(trimmed) {
            return Some(code);
        }
    }

    if let Some(code) = code_for_name(trimmed) {
        return Some(code);
    }

    if let Some(caps) = TRAILING_CODE.captures(trimmed) {
        return code_for_code(&caps[1]);
    }

    TRAILING_NAME
        .captures(trimmed)
        .and_then(|caps| code_for_name(caps[1].trim()))
}

/// True if `code` is a known 2-letter code (case-insensitive)
#[must_use]
pub fn is_valid_state_code(code: &str) -> bool {
    code_for_code(code).is_some()
}

/// Full name for a 2-letter code
#[must_use]
pub fn state_name(code: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// True if both inputs normalize to the same state
#[must_use]
pub fn same_state(a: &str, b: &str) -> bool {
    match (normalize_state(a), normalize_state(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_codes() {
        assert_eq!(normalize_state("TX"), Some("TX"));
        assert_eq!(normalize_state(" ca "), Some("CA"));
        assert_eq!(normalize_state("pr"), Some("PR"));
        assert_eq!(normalize_state("ZZ"), None);
    }

    #[test]
    fn test_normalize_names() {
        assert_eq!(normalize_state("Texas"), Some("TX"));
        assert_eq!(normalize_state("north carolina"), Some("NC"));
        assert_eq!(normalize_state("District of Columbia"), Some("DC"));
        assert_eq!(normalize_state("Washington D.C."), Some("DC"));
        assert_eq!(normalize_state("Washington"), Some("WA"));
    }

    #[test]
    fn test_normalize_locations() {
        assert_eq!(normalize_state("Sacramento, CA"), Some("CA"));
        assert_eq!(normalize_state("Houston, tx 77030"), Some("TX"));
        assert_eq!(normalize_state("Houston, TX 77030-1234"), Some("TX"));
        assert_eq!(normalize_state("Albany, New York"), Some("NY"));
        assert_eq!(normalize_state("Santa Fe, New Mexico 87501"), Some("NM"));
    }

    #[test]
    fn test_normalize_rejects_unknown() {
        assert_eq!(normalize_state(""), None);
        assert_eq!(normalize_state("   "), None);
        assert_eq!(normalize_state("Ontario"), None);
        assert_eq!(normalize_state("Toronto, ON"), None);
        assert_eq!(normalize_state("Springfield, Freedonia"), None);
    }

    #[test]
    fn test_state_name_and_validation() {
        assert_eq!(state_name("tx"), Some("Texas"));
        assert_eq!(state_name("MP"), Some("Northern Mariana Islands"));
        assert_eq!(state_name("XX"), None);
        assert!(is_valid_state_code("dc"));
        assert!(!is_valid_state_code("Texas"));
    }

    #[test]
    fn test_same_state() {
        assert!(same_state("TX", "texas"));
        assert!(same_state("Dallas, TX", "tx"));
        assert!(!same_state("TX", "CA"));
        assert!(!same_state("Narnia", "Narnia"));
    }
}
