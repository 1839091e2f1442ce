//! Read-only projection of a single translation response
//!
//! [`ResponseView`] owns exactly one [`Response`] and answers every query by
//! borrowing from it. Text buffers are kept once per view and addressed by
//! [`ByteRange`]; only token strings returned from [`ResponseView::alignments`]
//! are copied, since those are what a caller carries away across a boundary.
//!
//! A view never mutates its response, so an `Arc<ResponseView>` can be read
//! from any number of threads without synchronization.

use serde::{Deserialize, Serialize};

use crate::byte_range::ByteRange;
use crate::error::BridgeResult;
use crate::response::Response;

/// Tokens and alignment weights for one sentence
///
/// `alignments.len() == target.len()` and every row has `source.len()`
/// weights, unless the engine produced no alignment for the sentence, in which
/// case `alignments` is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceAlignment {
    pub source: Vec<String>,
    pub target: Vec<String>,
    pub alignments: Vec<Vec<f32>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseView {
    response: Response,
}

impl ResponseView {
    /// Take ownership of an engine response
    pub fn new(response: Response) -> Self {
        Self { response }
    }

    /// Number of sentences in the source text
    pub fn size(&self) -> usize {
        self.response.size()
    }

    pub fn original_text(&self) -> &str {
        self.response.source().text()
    }

    pub fn translated_text(&self) -> &str {
        self.response.target().text()
    }

    /// Byte range of a source sentence inside [`original_text`](Self::original_text)
    ///
    /// Fails with `SentenceOutOfRange` unless `sentence_idx < size()`.
    pub fn source_sentence_range(&self, sentence_idx: usize) -> BridgeResult<ByteRange> {
        self.response.source().sentence_as_byte_range(sentence_idx)
    }

    /// Byte range of a translated sentence inside [`translated_text`](Self::translated_text)
    ///
    /// Fails with `SentenceOutOfRange` unless `sentence_idx < size()`.
    pub fn target_sentence_range(&self, sentence_idx: usize) -> BridgeResult<ByteRange> {
        self.response.target().sentence_as_byte_range(sentence_idx)
    }

    /// Tokens and alignment weights for every sentence, in sentence order
    pub fn alignments(&self) -> Vec<SentenceAlignment> {
        (0..self.size())
            .map(|sentence_idx| self.build_sentence_alignment(sentence_idx))
            .collect()
    }

    /// Tokens and alignment weights for a single sentence
    pub fn sentence_alignment(&self, sentence_idx: usize) -> BridgeResult<SentenceAlignment> {
        self.source_sentence_range(sentence_idx)?;
        Ok(self.build_sentence_alignment(sentence_idx))
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Hand the wrapped response on to the caller
    pub fn into_response(self) -> Response {
        self.response
    }

    // Source and target sentence counts are equal (checked by `Response::new`),
    // so any index below `size()` is valid on both sides.
    fn build_sentence_alignment(&self, sentence_idx: usize) -> SentenceAlignment {
        SentenceAlignment {
            source: self
                .response
                .source()
                .tokens(sentence_idx)
                .unwrap_or_default(),
            target: self
                .response
                .target()
                .tokens(sentence_idx)
                .unwrap_or_default(),
            alignments: self.response.alignment(sentence_idx).to_vec(),
        }
    }
}

impl From<Response> for ResponseView {
    fn from(response: Response) -> Self {
        Self::new(response)
    }
}
