//! Request field validation.

use crate::error::{Result, ServiceError};

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Identifiers become file names and certificate CNs: non-empty and limited
/// to `[A-Za-z0-9._-]`, excluding `.` and `..`.
pub fn identifier(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ServiceError::Invalid(format!("{field} is required")));
    }
    if value == "." || value == ".." {
        return Err(ServiceError::Invalid(format!("{field} {value:?} is reserved")));
    }
    if let Some(c) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(ServiceError::Invalid(format!(
            "{field} {value:?} contains invalid character {c:?}"
        )));
    }
    Ok(())
}

/// Non-empty after trimming.
pub fn required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::Invalid(format!("{field} is required")));
    }
    Ok(())
}

/// A fully qualified domain name: at least two dot-separated labels of
/// letters, digits and inner hyphens, and an alphabetic top-level label.
/// A single trailing dot is accepted.
pub fn domain(value: &str) -> Result<()> {
    let invalid = |reason: &str| ServiceError::Invalid(format!("domain {value:?} {reason}"));

    let name = value.strip_suffix('.').unwrap_or(value);
    if name.is_empty() {
        return Err(invalid("is empty"));
    }
    if name.len() > MAX_DOMAIN_LEN {
        return Err(invalid("is too long"));
    }

    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return Err(invalid("is not fully qualified"));
    }
    for label in &labels {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return Err(invalid("has an empty or oversized label"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("has a label starting or ending with '-'"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid("contains invalid characters"));
        }
    }
    if let Some(tld) = labels.last() {
        if !tld.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid("has a non-alphabetic top-level label"));
        }
    }
    Ok(())
}

/// Subject alternative names must be non-empty ASCII strings.
pub fn sans(values: &[String]) -> Result<()> {
    for (index, san) in values.iter().enumerate() {
        if san.trim().is_empty() {
            return Err(ServiceError::Invalid(format!("sans[{index}] is empty")));
        }
        if !san.is_ascii() {
            return Err(ServiceError::Invalid(format!(
                "sans[{index}] {san:?} is not ASCII"
            )));
        }
    }
    Ok(())
}
