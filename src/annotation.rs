//! Text buffers annotated with sentence and word segmentation
//!
//! An [`AnnotatedText`] owns its text and records, for every sentence, the
//! sentence's byte range and the byte range of every word inside it. Ranges are
//! validated when a sentence is pushed, so every query afterwards can slice the
//! buffer without further checks.

use crate::byte_range::ByteRange;
use crate::error::{BridgeError, BridgeResult};

#[derive(Debug, Clone, Default, PartialEq)]
struct SentenceSpan {
    range: ByteRange,
    words: Vec<ByteRange>,
}

/// A text buffer plus its sentence/word segmentation
///
/// Sentence indices run `0..num_sentences()` and word indices run
/// `0..num_words(sentence)`; both are dense and zero-based.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotatedText {
    text: String,
    sentences: Vec<SentenceSpan>,
}

impl AnnotatedText {
    /// Wrap a text buffer with no segmentation yet
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sentences: Vec::new(),
        }
    }

    /// Append the next sentence
    ///
    /// `range` must lie inside the buffer and after the previous sentence;
    /// each word must lie inside `range`, after the previous word, on UTF-8
    /// character boundaries.
    pub fn push_sentence(&mut self, range: ByteRange, words: Vec<ByteRange>) -> BridgeResult<()> {
        let index = self.sentences.len();
        ByteRange::try_new(range.begin, range.end)?;

        if range.slice(&self.text).is_none() {
            return Err(BridgeError::InvalidAnnotation(format!(
                "sentence {} range [{}, {}) does not fit a text of {} bytes",
                index,
                range.begin,
                range.end,
                self.text.len()
            )));
        }

        if let Some(previous) = self.sentences.last() {
            if range.begin < previous.range.end {
                return Err(BridgeError::InvalidAnnotation(format!(
                    "sentence {} starts at {} before the previous sentence ends at {}",
                    index, range.begin, previous.range.end
                )));
            }
        }

        let mut cursor = range.begin;
        for (word_idx, word) in words.iter().enumerate() {
            ByteRange::try_new(word.begin, word.end)?;
            if !range.contains(word) || word.slice(&self.text).is_none() {
                return Err(BridgeError::InvalidAnnotation(format!(
                    "word {} of sentence {} at [{}, {}) is outside the sentence or splits a character",
                    word_idx, index, word.begin, word.end
                )));
            }
            if word.begin < cursor {
                return Err(BridgeError::InvalidAnnotation(format!(
                    "word {} of sentence {} overlaps the previous word",
                    word_idx, index
                )));
            }
            cursor = word.end;
        }

        self.sentences.push(SentenceSpan { range, words });
        Ok(())
    }

    /// The full text buffer
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn num_sentences(&self) -> usize {
        self.sentences.len()
    }

    pub fn num_words(&self, sentence_idx: usize) -> BridgeResult<usize> {
        Ok(self.sentence(sentence_idx)?.words.len())
    }

    /// Byte range of one word
    pub fn word(&self, sentence_idx: usize, word_idx: usize) -> BridgeResult<ByteRange> {
        let sentence = self.sentence(sentence_idx)?;
        sentence
            .words
            .get(word_idx)
            .copied()
            .ok_or(BridgeError::WordOutOfRange {
                sentence: sentence_idx,
                index: word_idx,
                count: sentence.words.len(),
            })
    }

    /// Text of one word, borrowed from the buffer
    pub fn word_text(&self, sentence_idx: usize, word_idx: usize) -> BridgeResult<&str> {
        let word = self.word(sentence_idx, word_idx)?;
        Ok(&self.text[word.begin..word.end])
    }

    /// All word ranges of a sentence, in order
    pub fn words(&self, sentence_idx: usize) -> BridgeResult<&[ByteRange]> {
        Ok(&self.sentence(sentence_idx)?.words)
    }

    pub fn sentence_as_byte_range(&self, sentence_idx: usize) -> BridgeResult<ByteRange> {
        Ok(self.sentence(sentence_idx)?.range)
    }

    pub fn sentence_text(&self, sentence_idx: usize) -> BridgeResult<&str> {
        let range = self.sentence_as_byte_range(sentence_idx)?;
        Ok(&self.text[range.begin..range.end])
    }

    /// Owned copies of every word in a sentence
    ///
    /// The strings are independent of the buffer, so they can outlive this
    /// annotation and cross a language boundary.
    pub fn tokens(&self, sentence_idx: usize) -> BridgeResult<Vec<String>> {
        let sentence = self.sentence(sentence_idx)?;
        Ok(sentence
            .words
            .iter()
            .map(|word| self.text[word.begin..word.end].to_string())
            .collect())
    }

    fn sentence(&self, sentence_idx: usize) -> BridgeResult<&SentenceSpan> {
        self.sentences
            .get(sentence_idx)
            .ok_or(BridgeError::SentenceOutOfRange {
                index: sentence_idx,
                count: self.sentences.len(),
            })
    }
}
