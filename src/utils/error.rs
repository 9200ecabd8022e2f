use thiserror::Error;

/// Failure to retrieve one page. The driver logs it and moves on to the
/// next page, so it never becomes a [`HarvestError`].
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed with status code {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Browser navigation to {url} failed: {message}")]
    Browser { url: String, message: String },

    #[error("Max retries reached for {url} ({attempts} attempts)")]
    MaxRetriesExceeded { url: String, attempts: u32 },
}

/// Errors that abort a run before or after the page loop.
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("Setup failed: {message}")]
    SetupError { message: String },
}

impl HarvestError {
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HarvestError::CsvError(_) | HarvestError::IoError(_) => {
                "Check that the output directory is writable and the disk is not full"
            }
            HarvestError::ConfigValidationError { .. }
            | HarvestError::InvalidConfigValueError { .. }
            | HarvestError::MissingConfigError { .. } => {
                "Fix the configuration file or the environment variables it references"
            }
            HarvestError::SelectorError { .. } => "Correct the CSS selector syntax",
            HarvestError::SetupError { .. } => {
                "Make sure a Chrome/Chromium binary is installed and reachable"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HarvestError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            HarvestError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            HarvestError::MissingConfigError { field } => {
                format!("Setting '{}' is required", field)
            }
            HarvestError::SetupError { message } => {
                format!("Could not start the scraper: {}", message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
