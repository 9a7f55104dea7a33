use std::fmt;

/// Result type for certrace-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// A report record could not be decoded into a Datum
    Malformed(serde_json::Error),
    /// A report record decoded, but is not an object
    NotAnObject,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Malformed(err) => write!(f, "malformed record: {}", err),
            Error::NotAnObject => write!(f, "record is not a JSON object"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Malformed(err) => Some(err),
            Error::NotAnObject => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Malformed(err)
    }
}
