//! Error types for hashing and comparing signatures.

use std::fmt;
use thiserror::Error;

/// Which side of a comparison an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    First,
    Second,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::First => f.write_str("first"),
            Operand::Second => f.write_str("second"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CtphError {
    /// The declared input length was zero.
    #[error("Invalid input: declared length must be at least 1")]
    InvalidInput,

    /// A comparison operand does not follow `blocksize:sig1:sig2`.
    #[error("Malformed signature in {operand} operand")]
    Format { operand: Operand },

    /// Signatures built with different block sizes cannot be compared.
    #[error("Block size mismatch: {first} != {second}")]
    BlockSizeMismatch { first: String, second: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Returned when text cannot be parsed as a signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid signature {input:?}: expected <blocksize>:<sig1>:<sig2>")]
pub struct ParseSignatureError {
    pub(crate) input: String,
}

pub type Result<T> = std::result::Result<T, CtphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = CtphError::Format {
            operand: Operand::Second,
        };
        assert_eq!(err.to_string(), "Malformed signature in second operand");

        let err = CtphError::BlockSizeMismatch {
            first: "24".to_owned(),
            second: "12".to_owned(),
        };
        assert_eq!(err.to_string(), "Block size mismatch: 24 != 12");
    }
}
