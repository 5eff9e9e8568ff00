use std::io;

use thiserror::Error;

/// Everything that can abort a render. There is no recovery path: any
/// variant kills the whole run before output is written.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed CLI option value (wrong count of numbers, non-numeric token).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Structurally or semantically invalid graph JSON.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The layout engine could not place the graph.
    #[error("layout error: {0}")]
    Layout(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Process exit code for this error kind, following sysexits conventions.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => 64,
            Error::InvalidInput(_) => 65,
            Error::Io(_) => 66,
            Error::Layout(_) => 70,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let errors = [
            Error::InvalidArgument("x".into()),
            Error::InvalidInput("x".into()),
            Error::Layout("x".into()),
            Error::Io(io::Error::new(io::ErrorKind::NotFound, "x")),
        ];
        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 4);
    }
}
