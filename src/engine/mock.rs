//! Mock translation engine for testing
//!
//! This module provides a deterministic, model-free engine for exercising the
//! bridge without a real translation backend. It segments text with
//! [`segment`](crate::engine::segment), rewrites each word token according to
//! its [`MockMode`], and keeps every gap between tokens exactly as it was in
//! the source. Alignments are one-hot: each target token points at the source
//! token it was produced from.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mt_bridge::{MockEngine, MockMode, ResponseOptions, TranslationEngine, TranslationModel};
//!
//! let engine = MockEngine::new(MockMode::Suffix);
//! let model = Arc::new(TranslationModel::new("enfr", "en", "fr").unwrap());
//! let responses = engine
//!     .translate_multiple(&model, vec!["hello".to_string()], &[ResponseOptions::default()])
//!     .unwrap();
//! assert_eq!(responses[0].target().text(), "hello_fr");
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::annotation::AnnotatedText;
use crate::byte_range::ByteRange;
use crate::engine::model::TranslationModel;
use crate::engine::segment::{is_word, segment};
use crate::engine::translator::{TranslationEngine, compose_alignments};
use crate::error::{BridgeError, BridgeResult};
use crate::response::{Alignment, Response, ResponseOptions};

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum MockMode {
    /// Append the target language to each word: "hello" → "hello_fr"
    #[default]
    Suffix,

    /// Word lexicons keyed by target language, falling back to `Suffix`
    /// for unknown words
    Mappings(HashMap<String, HashMap<String, String>>),

    /// Reverse the order of word tokens in each sentence; punctuation keeps
    /// its position (simulates word-order-changing languages)
    Reorder,

    /// Fail every call with this message
    Error(String),

    /// Return input unchanged
    NoOp,
}

/// Deterministic engine that simulates translation without a model
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    mode: MockMode,
    /// Simulated inference time per call
    delay_ms: u64,
}

/// One produced target token and the source token it came from
struct TargetToken {
    text: String,
    source_idx: usize,
}

impl MockEngine {
    pub fn new(mode: MockMode) -> Self {
        Self { mode, delay_ms: 0 }
    }

    /// Create an engine whose every call blocks for `delay_ms` milliseconds
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self { mode, delay_ms }
    }

    pub fn mode(&self) -> &MockMode {
        &self.mode
    }

    fn apply_delay(&self) {
        if self.delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.delay_ms));
        }
    }

    fn check_batch(&self, sources: &[String], options: &[ResponseOptions]) -> BridgeResult<()> {
        if let MockMode::Error(msg) = &self.mode {
            return Err(BridgeError::Engine(msg.clone()));
        }
        if sources.len() != options.len() {
            return Err(BridgeError::BatchSizeMismatch {
                texts: sources.len(),
                options: options.len(),
            });
        }
        Ok(())
    }

    fn translate_word(&self, word: &str, target_language: &str) -> String {
        match &self.mode {
            MockMode::Suffix => format!("{}_{}", word, target_language),
            MockMode::Mappings(lexicons) => lexicons
                .get(target_language)
                .and_then(|lexicon| lexicon.get(word))
                .cloned()
                .unwrap_or_else(|| format!("{}_{}", word, target_language)),
            MockMode::Reorder | MockMode::NoOp | MockMode::Error(_) => word.to_string(),
        }
    }

    /// Produce the target tokens of one sentence, in target order
    fn translate_sentence(&self, tokens: &[&str], target_language: &str) -> Vec<TargetToken> {
        let mut order: Vec<usize> = (0..tokens.len()).collect();

        if matches!(self.mode, MockMode::Reorder) {
            let word_slots: Vec<usize> = order
                .iter()
                .copied()
                .filter(|&i| is_word(tokens[i]))
                .collect();
            for (slot, source_idx) in word_slots.iter().zip(word_slots.iter().rev()) {
                order[*slot] = *source_idx;
            }
        }

        order
            .into_iter()
            .map(|source_idx| {
                let token = tokens[source_idx];
                let text = if is_word(token) {
                    self.translate_word(token, target_language)
                } else {
                    token.to_string()
                };
                TargetToken { text, source_idx }
            })
            .collect()
    }

    /// Translate an already segmented text
    ///
    /// Whitespace between sentences and between tokens is copied from the
    /// source at the same positions, so sentence and token counts are
    /// preserved.
    fn translate_annotated(
        &self,
        model: &TranslationModel,
        source: AnnotatedText,
        options: &ResponseOptions,
    ) -> BridgeResult<Response> {
        let text = source.text();
        let mut target_text = String::with_capacity(text.len() * 2);
        let mut sentences: Vec<(ByteRange, Vec<ByteRange>)> = Vec::new();
        let mut alignments: Vec<Alignment> = Vec::new();
        let mut cursor = 0;

        for sentence_idx in 0..source.num_sentences() {
            let sentence_range = source.sentence_as_byte_range(sentence_idx)?;
            let words = source.words(sentence_idx)?;
            let tokens: Vec<&str> = words.iter().map(|w| &text[w.begin..w.end]).collect();

            target_text.push_str(&text[cursor..sentence_range.begin]);
            let sentence_begin = target_text.len();
            let mut source_cursor = sentence_range.begin;
            let mut target_words = Vec::with_capacity(tokens.len());

            let produced = self.translate_sentence(&tokens, model.target_language());
            for (slot, token) in produced.iter().enumerate() {
                // gaps are positional: the gap before slot i in the target is the
                // gap before token i in the source
                let gap_end = words[slot].begin;
                target_text.push_str(&text[source_cursor..gap_end]);
                source_cursor = words[slot].end;

                let begin = target_text.len();
                target_text.push_str(&token.text);
                target_words.push(ByteRange::new(begin, target_text.len()));
            }
            target_text.push_str(&text[source_cursor..sentence_range.end]);
            cursor = sentence_range.end;

            sentences.push((ByteRange::new(sentence_begin, target_text.len()), target_words));

            if options.alignment {
                alignments.push(
                    produced
                        .iter()
                        .map(|token| {
                            let mut row = vec![0.0; tokens.len()];
                            row[token.source_idx] = 1.0;
                            row
                        })
                        .collect(),
                );
            }
        }
        target_text.push_str(&text[cursor..]);

        let mut target = AnnotatedText::new(target_text);
        for (range, words) in sentences {
            target.push_sentence(range, words)?;
        }

        Response::new(source, target, alignments)
    }
}

impl TranslationEngine for MockEngine {
    fn translate_multiple(
        &self,
        model: &Arc<TranslationModel>,
        sources: Vec<String>,
        options: &[ResponseOptions],
    ) -> BridgeResult<Vec<Response>> {
        self.apply_delay();
        self.check_batch(&sources, options)?;

        sources
            .into_iter()
            .zip(options)
            .map(|(text, opts)| self.translate_annotated(model, segment(text)?, opts))
            .collect()
    }

    fn pivot_multiple(
        &self,
        first: &Arc<TranslationModel>,
        second: &Arc<TranslationModel>,
        sources: Vec<String>,
        options: &[ResponseOptions],
    ) -> BridgeResult<Vec<Response>> {
        self.apply_delay();
        self.check_batch(&sources, options)?;

        if first.target_language() != second.source_language() {
            return Err(BridgeError::Engine(format!(
                "cannot pivot through '{}' into a model translating from '{}'",
                first.target_language(),
                second.source_language()
            )));
        }

        sources
            .into_iter()
            .zip(options)
            .map(|(text, opts)| {
                let (source, pivot, first_hop) = self
                    .translate_annotated(first, segment(text)?, opts)?
                    .into_parts();
                let (_, target, second_hop) =
                    self.translate_annotated(second, pivot, opts)?.into_parts();

                let alignments = second_hop
                    .iter()
                    .zip(&first_hop)
                    .map(|(target_to_pivot, pivot_to_source)| {
                        compose_alignments(target_to_pivot, pivot_to_source)
                    })
                    .collect::<BridgeResult<Vec<_>>>()?;

                Response::new(source, target, alignments)
            })
            .collect()
    }

    fn engine_name(&self) -> &str {
        "Mock Engine"
    }
}
