//! Translation responses as produced by an engine
//!
//! A [`Response`] is the unit an engine hands back for one input text: the
//! annotated source, the annotated translation and, optionally, one alignment
//! matrix per sentence.

use serde::{Deserialize, Serialize};

use crate::annotation::AnnotatedText;
use crate::error::{BridgeError, BridgeResult};

/// Soft alignment for one sentence
///
/// The outer index is the target token, the inner index is the source token;
/// `alignment[t][s]` is how strongly target token `t` maps to source token `s`.
pub type Alignment = Vec<Vec<f32>>;

/// Per-request options passed to the engine alongside each source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseOptions {
    /// Ask the engine for per-sentence alignment matrices
    pub alignment: bool,
}

impl ResponseOptions {
    pub fn with_alignment() -> Self {
        Self { alignment: true }
    }
}

/// One translated text with its segmentation and alignments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    source: AnnotatedText,
    target: AnnotatedText,
    alignments: Vec<Alignment>,
}

impl Response {
    /// Assemble a response, checking that its parts agree
    ///
    /// Source and target must have the same number of sentences. `alignments`
    /// may be shorter than the sentence count (missing entries mean "no
    /// alignment data"), and each non-empty matrix must be
    /// `target words x source words` for its sentence.
    pub fn new(
        source: AnnotatedText,
        target: AnnotatedText,
        alignments: Vec<Alignment>,
    ) -> BridgeResult<Self> {
        let sentences = source.num_sentences();
        if target.num_sentences() != sentences {
            return Err(BridgeError::InvalidAlignment(format!(
                "source has {} sentences but target has {}",
                sentences,
                target.num_sentences()
            )));
        }
        if alignments.len() > sentences {
            return Err(BridgeError::InvalidAlignment(format!(
                "{} alignment matrices for {} sentences",
                alignments.len(),
                sentences
            )));
        }

        for (sentence_idx, matrix) in alignments.iter().enumerate() {
            if matrix.is_empty() {
                continue;
            }
            let target_words = target.num_words(sentence_idx)?;
            let source_words = source.num_words(sentence_idx)?;
            if matrix.len() != target_words {
                return Err(BridgeError::InvalidAlignment(format!(
                    "sentence {}: {} rows for {} target tokens",
                    sentence_idx,
                    matrix.len(),
                    target_words
                )));
            }
            if let Some(row) = matrix.iter().position(|row| row.len() != source_words) {
                return Err(BridgeError::InvalidAlignment(format!(
                    "sentence {}: row {} has {} columns for {} source tokens",
                    sentence_idx,
                    row,
                    matrix[row].len(),
                    source_words
                )));
            }
        }

        Ok(Self {
            source,
            target,
            alignments,
        })
    }

    pub fn source(&self) -> &AnnotatedText {
        &self.source
    }

    pub fn target(&self) -> &AnnotatedText {
        &self.target
    }

    /// Number of sentences, counted on the source side
    pub fn size(&self) -> usize {
        self.source.num_sentences()
    }

    /// Alignment matrix for one sentence, empty when the engine produced none
    pub fn alignment(&self, sentence_idx: usize) -> &[Vec<f32>] {
        self.alignments
            .get(sentence_idx)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn alignments(&self) -> &[Alignment] {
        &self.alignments
    }

    /// Give up the response's parts
    pub fn into_parts(self) -> (AnnotatedText, AnnotatedText, Vec<Alignment>) {
        (self.source, self.target, self.alignments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_range::ByteRange;

    fn annotated(text: &str, words: &[(usize, usize)]) -> AnnotatedText {
        let mut annotated = AnnotatedText::new(text);
        annotated
            .push_sentence(
                ByteRange::new(0, text.len()),
                words.iter().map(|&(b, e)| ByteRange::new(b, e)).collect(),
            )
            .unwrap();
        annotated
    }

    #[test]
    fn test_accepts_well_shaped_alignment() {
        let source = annotated("a b", &[(0, 1), (2, 3)]);
        let target = annotated("x", &[(0, 1)]);
        let response = Response::new(source, target, vec![vec![vec![0.5, 0.5]]]).unwrap();
        assert_eq!(response.size(), 1);
        assert_eq!(response.alignment(0), &[vec![0.5, 0.5]]);
    }

    #[test]
    fn test_missing_alignment_is_empty() {
        let source = annotated("a", &[(0, 1)]);
        let target = annotated("x", &[(0, 1)]);
        let response = Response::new(source, target, vec![]).unwrap();
        assert!(response.alignment(0).is_empty());
    }

    #[test]
    fn test_rejects_sentence_count_mismatch() {
        let source = annotated("a", &[(0, 1)]);
        let target = AnnotatedText::new("x");
        assert!(matches!(
            Response::new(source, target, vec![]),
            Err(BridgeError::InvalidAlignment(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_row_count() {
        let source = annotated("a", &[(0, 1)]);
        let target = annotated("x y", &[(0, 1), (2, 3)]);
        let result = Response::new(source, target, vec![vec![vec![1.0]]]);
        assert!(matches!(result, Err(BridgeError::InvalidAlignment(_))));
    }

    #[test]
    fn test_rejects_wrong_column_count() {
        let source = annotated("a b", &[(0, 1), (2, 3)]);
        let target = annotated("x", &[(0, 1)]);
        let result = Response::new(source, target, vec![vec![vec![1.0]]]);
        assert!(matches!(result, Err(BridgeError::InvalidAlignment(_))));
    }

    #[test]
    fn test_rejects_extra_matrices() {
        let source = annotated("a", &[(0, 1)]);
        let target = annotated("x", &[(0, 1)]);
        let result = Response::new(source, target, vec![vec![], vec![]]);
        assert!(matches!(result, Err(BridgeError::InvalidAlignment(_))));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ResponseOptions = serde_json::from_str("{}").unwrap();
        assert!(!options.alignment);
        let options: ResponseOptions = serde_json::from_str(r#"{"alignment":true}"#).unwrap();
        assert_eq!(options, ResponseOptions::with_alignment());
    }
}
