use crate::utils::delay::MAX_DELAY_SECS;
use crate::utils::error::{HarvestError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(HarvestError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// A template must contain `placeholder` and be a valid URL once it is filled in.
pub fn validate_url_template(field_name: &str, template: &str, placeholder: &str) -> Result<()> {
    if !template.contains(placeholder) {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: template.to_string(),
            reason: format!("Template must contain the {} placeholder", placeholder),
        });
    }
    validate_url(field_name, &template.replace(placeholder, "1"))
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u32, min_value: u32) -> Result<()> {
    if value < min_value {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| HarvestError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_delay_range(field_name: &str, min_secs: f64, max_secs: f64) -> Result<()> {
    if !min_secs.is_finite() || !max_secs.is_finite() || min_secs < 0.0 {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}..{}", min_secs, max_secs),
            reason: "Delays must be finite and non-negative".to_string(),
        });
    }
    if min_secs > max_secs {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}..{}", min_secs, max_secs),
            reason: "min_secs must not exceed max_secs".to_string(),
        });
    }
    if max_secs > MAX_DELAY_SECS {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}..{}", min_secs, max_secs),
            reason: format!("max_secs must not exceed {} seconds", MAX_DELAY_SECS),
        });
    }
    Ok(())
}

pub fn validate_page_range(field_name: &str, start: u32, end: u32) -> Result<()> {
    if start > end {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}..{}", start, end),
            reason: "start must not exceed end".to_string(),
        });
    }
    Ok(())
}
