use crate::utils::error::{QaError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(QaError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(QaError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_unique_ids<'a, I>(field_name: &str, ids: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(QaError::InvalidConfigValue {
                field: field_name.to_string(),
                value: id.to_string(),
                reason: "Duplicate id".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| QaError::MissingConfig {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("container_id", "QA").is_ok());
        assert!(validate_non_empty_string("container_id", "").is_err());
        assert!(validate_non_empty_string("container_id", "   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("fixed_couch_angle", 90.0, 0.0, 360.0).is_ok());
        assert!(validate_range("fixed_couch_angle", 400.0, 0.0, 360.0).is_err());
    }

    #[test]
    fn test_validate_unique_ids() {
        assert!(validate_unique_ids("devices", ["ArcCheck", "MapCheck2"]).is_ok());
        assert!(validate_unique_ids("devices", ["ArcCheck", "ArcCheck"]).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("QA".to_string());
        let absent: Option<String> = None;
        assert!(validate_required_field("container_id", &present).is_ok());
        assert!(validate_required_field("container_id", &absent).is_err());
    }
}
