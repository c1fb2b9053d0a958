use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    NotFound,
    InvalidRange,
    InvalidQuery,
    InvalidArgument,
    EmptyResult,
    Internal,
}

/// Coarse outcome class an outer transport can map to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    BadRequest,
    Internal,
}

#[derive(Debug, ThisError)]
#[error("{kind:?}: {context}")]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error { kind, context: context.into() }
    }

    pub fn not_found(context: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, context)
    }

    pub fn invalid_argument(context: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, context)
    }

    pub fn class(&self) -> ErrorClass {
        match self.kind {
            ErrorKind::NotFound | ErrorKind::EmptyResult => ErrorClass::NotFound,
            ErrorKind::InvalidRange | ErrorKind::InvalidQuery | ErrorKind::InvalidArgument => {
                ErrorClass::BadRequest
            }
            ErrorKind::Io | ErrorKind::Parse | ErrorKind::Internal => ErrorClass::Internal,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::Io,
        };
        Error {
            kind,
            context: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Parse,
            context: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_transport_classes() {
        assert_eq!(Error::not_found("x").class(), ErrorClass::NotFound);
        assert_eq!(Error::new(ErrorKind::EmptyResult, "x").class(), ErrorClass::NotFound);
        assert_eq!(Error::new(ErrorKind::InvalidRange, "x").class(), ErrorClass::BadRequest);
        assert_eq!(Error::new(ErrorKind::InvalidQuery, "x").class(), ErrorClass::BadRequest);
        assert_eq!(Error::new(ErrorKind::Parse, "x").class(), ErrorClass::Internal);
    }

    #[test]
    fn missing_file_becomes_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(Error::from(io).kind, ErrorKind::NotFound);
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(Error::from(io).kind, ErrorKind::Io);
    }

    #[test]
    fn display_carries_kind_and_context() {
        let err = Error::new(ErrorKind::InvalidQuery, "empty search term");
        assert_eq!(err.to_string(), "InvalidQuery: empty search term");
    }
}
