//! Error types for the API value types.

use std::io;

/// Errors produced while constructing or computing fingerprint ids.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The id is not 32 lowercase hexadecimal characters.
    #[error("{id} does not look like a valid id")]
    Malformed { id: String },

    /// The content to hash could not be read.
    #[error("Failed to read content for hashing: {0}")]
    Io(#[from] io::Error),
}

impl IdError {
    /// Create a MALFORMED error for the rejected input.
    pub fn malformed(id: impl Into<String>) -> Self {
        Self::Malformed { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_input() {
        let err = IdError::malformed("xyz");
        assert_eq!(err.to_string(), "xyz does not look like a valid id");
    }
}
