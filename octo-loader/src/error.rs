//! Loader errors
//!
//! These are reported to the user and terminate the process before the
//! engine ever runs; the core never sees them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Program file \"{path}\" not found")]
    ProgramNotFound { path: String },

    #[error("No program file was named")]
    MissingArgument,

    #[error("Program image is {len} bytes and does not fit in the 256-byte memory")]
    ImageTooLarge { len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LoaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoaderError::ProgramNotFound {
            path: "counter.oct".to_string(),
        };
        assert_eq!(err.to_string(), "Program file \"counter.oct\" not found");

        let err = LoaderError::MissingArgument;
        assert_eq!(err.to_string(), "No program file was named");

        let err = LoaderError::ImageTooLarge { len: 300 };
        assert!(err.to_string().contains("300 bytes"));
    }
}
