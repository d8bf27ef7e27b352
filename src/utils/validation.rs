use crate::utils::error::{Result, SlaError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_negative_hours(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SlaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number of hours".to_string(),
        });
    }

    if value < 0.0 {
        return Err(SlaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Hours cannot be negative".to_string(),
        });
    }
    Ok(())
}

pub fn validate_strictly_less(field_name: &str, lower: f64, upper: f64) -> Result<()> {
    if lower >= upper {
        return Err(SlaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{} >= {}", lower, upper),
            reason: "Lower boundary must be strictly less than the upper boundary".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SlaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_negative_hours() {
        assert!(validate_non_negative_hours("thresholds.media.on_time_hours", 18.0).is_ok());
        assert!(validate_non_negative_hours("thresholds.media.on_time_hours", 0.0).is_ok());
        assert!(validate_non_negative_hours("thresholds.media.on_time_hours", -1.0).is_err());
        assert!(validate_non_negative_hours("thresholds.media.on_time_hours", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_strictly_less() {
        assert!(validate_strictly_less("thresholds.alta", 9.0, 18.0).is_ok());
        assert!(validate_strictly_less("thresholds.alta", 18.0, 18.0).is_err());
    }
}
