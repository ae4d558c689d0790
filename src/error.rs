use std::fmt;

/// Fatal errors that abort the run. Everything else (malformed records,
/// missing newlines, flush failures) is logged in place and the caller
/// continues, per the error handling table in the design notes.
#[derive(Debug)]
pub enum SolverError {
    Io(std::io::Error),
    Other(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::Io(e) => write!(f, "I/O error: {}", e),
            SolverError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SolverError {}

impl From<std::io::Error> for SolverError {
    fn from(e: std::io::Error) -> Self {
        SolverError::Io(e)
    }
}
