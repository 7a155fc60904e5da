//! Error types for centerline-tools

use std::fmt;
use std::io;

/// Result type for centerline-tools operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading, processing or writing centerlines
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(io::Error),

    /// Invalid pipeline or writer configuration
    Config(String),

    /// Input that cannot be interpreted as centerline geometry
    InvalidFormat(String),

    /// CSV reading or writing failed
    Csv(csv::Error),

    /// XML (KML) parsing failed
    Xml(String),

    /// Zip/KMZ archive failure
    Archive(String),

    /// JSON configuration failure
    Json(serde_json::Error),
}

impl Error {
    /// Shorthand for a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            Error::Csv(e) => write!(f, "CSV error: {}", e),
            Error::Xml(msg) => write!(f, "XML error: {}", msg),
            Error::Archive(msg) => write!(f, "Archive error: {}", msg),
            Error::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Error::Csv(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json(error)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(error: zip::result::ZipError) -> Self {
        Error::Archive(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_error_display() {
        let err = Error::Archive("no KML document in archive".to_string());
        assert_eq!(err.to_string(), "Archive error: no KML document in archive");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_csv_error_conversion() {
        let csv_err = csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, "bad row"));
        let err: Error = csv_err.into();
        assert!(matches!(err, Error::Csv(_)));
        assert!(err.to_string().starts_with("CSV error: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_zip_error_becomes_archive() {
        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, Error::Archive(_)));
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("outputSpacing must be positive, got -1");
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("outputSpacing"));
    }

    #[test]
    fn test_json_error_has_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
