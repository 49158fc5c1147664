use std::io;
use thiserror::Error;

/// Failures surfaced by [`SparseHasher`](crate::SparseHasher).
#[derive(Debug, Error)]
pub enum HashError {
    /// The digest primitive was rejected at construction time.
    #[error("invalid hasher configuration: {0}")]
    Configuration(String),

    /// Open, stat, seek or read failed on a file-backed source.
    #[error("i/o error while fingerprinting")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io::ErrorKind;

    #[test]
    fn io_error_keeps_its_source() {
        let err = HashError::from(io::Error::new(ErrorKind::NotFound, "gone"));
        let source = err.source().expect("source attached");
        assert_eq!(source.to_string(), "gone");
    }

    #[test]
    fn configuration_error_carries_the_reason() {
        let err = HashError::Configuration("digest too short".into());
        assert!(err.to_string().contains("digest too short"));
    }
}
