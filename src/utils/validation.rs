use crate::utils::error::{OrchestratorError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(OrchestratorError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Android package 名稱：以點分隔、每段以字母開頭
pub fn validate_package_name(field_name: &str, package: &str) -> Result<()> {
    validate_non_empty_string(field_name, package)?;

    let valid_segments = package.split('.').all(|segment| {
        let mut chars = segment.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    });

    if !valid_segments || !package.contains('.') {
        return Err(OrchestratorError::InvalidConfigValue {
            field: field_name.to_string(),
            value: package.to_string(),
            reason: "Expected a dotted package identifier such as com.example.app".to_string(),
        });
    }
    Ok(())
}

/// 開區間檢查，例如分割比例必須在 (0, 1)
pub fn validate_open_range(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !(value > min && value < max) {
        return Err(OrchestratorError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be strictly between {} and {}", min, max),
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
        return Err(OrchestratorError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
