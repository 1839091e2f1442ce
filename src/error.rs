//! Error types shared by every layer of the bridge

use thiserror::Error;

/// Errors raised while building, querying or producing translation responses
///
/// Every variant is a plain value so it can be relayed unchanged across the
/// service layer and converted at each boundary (JS exception, HTTP body, exit
/// status).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// A sentence index outside `0..count`
    #[error("sentence index {index} out of range (response has {count} sentences)")]
    SentenceOutOfRange { index: usize, count: usize },

    /// A word index outside `0..count` for the given sentence
    #[error("word index {index} out of range (sentence {sentence} has {count} words)")]
    WordOutOfRange {
        sentence: usize,
        index: usize,
        count: usize,
    },

    /// A byte range with `begin > end`
    #[error("invalid byte range [{begin}, {end})")]
    InvalidRange { begin: usize, end: usize },

    /// Segmentation that does not fit its text buffer
    #[error("invalid annotation: {0}")]
    InvalidAnnotation(String),

    /// Alignment data whose shape disagrees with the segmentation
    #[error("invalid alignment: {0}")]
    InvalidAlignment(String),

    /// A language tag that could not be parsed
    #[error("invalid language tag: {0}")]
    InvalidLanguage(String),

    /// Number of request options differs from the number of source texts
    #[error("batch size mismatch: {texts} texts but {options} response options")]
    BatchSizeMismatch { texts: usize, options: usize },

    /// Failure reported by the translation engine
    #[error("translation engine error: {0}")]
    Engine(String),

    /// Unreadable or inconsistent configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_out_of_range_message() {
        let err = BridgeError::SentenceOutOfRange { index: 3, count: 2 };
        assert_eq!(
            err.to_string(),
            "sentence index 3 out of range (response has 2 sentences)"
        );
    }

    #[test]
    fn test_batch_size_mismatch_message() {
        let err = BridgeError::BatchSizeMismatch {
            texts: 2,
            options: 1,
        };
        assert!(err.to_string().contains("2 texts but 1 response options"));
    }

    #[test]
    fn test_engine_error_is_comparable() {
        assert_eq!(
            BridgeError::Engine("boom".to_string()),
            BridgeError::Engine("boom".to_string())
        );
    }
}
