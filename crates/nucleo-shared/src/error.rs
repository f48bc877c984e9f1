//! Error types for Nucleo.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NucleoError>;

#[derive(Error, Debug)]
pub enum NucleoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Unknown training scenario: {0}")]
    UnknownScenario(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

impl NucleoError {
    /// Short machine-readable code, used by the CLI's JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            NucleoError::Io(_) => "io",
            NucleoError::Json(_) => "json",
            NucleoError::Backend(_) => "backend",
            NucleoError::UnknownScenario(_) => "unknown_scenario",
            NucleoError::InvalidValue { .. } => "invalid_value",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let io = NucleoError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.code(), "io");
        assert_eq!(NucleoError::Backend("x".into()).code(), "backend");
        assert_eq!(NucleoError::UnknownScenario("x".into()).code(), "unknown_scenario");
        let invalid = NucleoError::InvalidValue {
            field: "impact",
            value: "maybe".into(),
        };
        assert_eq!(invalid.code(), "invalid_value");
        assert_eq!(invalid.to_string(), "Invalid value for impact: maybe");
    }
}
