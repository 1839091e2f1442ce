//! Rule-based sentence and token segmentation
//!
//! Sentences end at a run of `.`, `!` or `?` (or at the end of the text) and
//! are trimmed of surrounding whitespace. Tokens are runs of word characters or
//! runs of other non-space characters, so `"world."` yields `"world"` and `"."`.

use std::sync::LazyLock;

use regex::Regex;

use crate::annotation::AnnotatedText;
use crate::byte_range::ByteRange;
use crate::error::BridgeResult;

static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\s.!?][^.!?]*(?:[.!?]+|$)").expect("sentence pattern"));

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+|[^\w\s]+").expect("token pattern"));

/// Split a sentence into token ranges, relative to `offset`
pub fn tokenize(sentence: &str, offset: usize) -> Vec<ByteRange> {
    TOKEN
        .find_iter(sentence)
        .map(|m| ByteRange::new(offset + m.start(), offset + m.end()))
        .collect()
}

/// Whether a token is a word (as opposed to punctuation)
pub fn is_word(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Segment `text` into sentences and tokens
pub fn segment(text: String) -> BridgeResult<AnnotatedText> {
    let ranges: Vec<(ByteRange, Vec<ByteRange>)> = SENTENCE
        .find_iter(&text)
        .map(|m| {
            let trimmed = m.as_str().trim_end();
            let range = ByteRange::new(m.start(), m.start() + trimmed.len());
            (range, tokenize(trimmed, m.start()))
        })
        .collect();

    let mut annotated = AnnotatedText::new(text);
    for (range, words) in ranges {
        annotated.push_sentence(range, words)?;
    }
    Ok(annotated)
}
