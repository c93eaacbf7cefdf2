//! Errors raised by the core crate.

use std::fmt;

/// Failure of a signal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    /// The id never belonged to this signal, or its slot was already removed.
    InvalidConnection,
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConnection => f.write_str("no slot is connected under this id"),
        }
    }
}

impl std::error::Error for SignalError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            SignalError::InvalidConnection.to_string(),
            "no slot is connected under this id"
        );
    }
}
