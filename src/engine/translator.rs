//! The translation engine seam
//!
//! The bridge never translates anything itself. Everything it knows about an
//! engine is the [`TranslationEngine`] trait: a synchronous batch call for one
//! model, and a synchronous batch call that pivots through an intermediate
//! language using two models.

use std::sync::Arc;

use crate::engine::model::TranslationModel;
use crate::error::{BridgeError, BridgeResult};
use crate::response::{Alignment, Response, ResponseOptions};

/// A machine translation engine
///
/// Both calls block until every response in the batch is ready. The engine is
/// free to parallelize internally.
///
/// # Guarantees
///
/// - Output order matches input order
/// - Output length equals input length
/// - Either the whole batch succeeds or the call fails
///
/// Checking that `options` pairs up with `sources` is the engine's job.
pub trait TranslationEngine: Send + Sync {
    /// Translate every source text with `model`
    fn translate_multiple(
        &self,
        model: &Arc<TranslationModel>,
        sources: Vec<String>,
        options: &[ResponseOptions],
    ) -> BridgeResult<Vec<Response>>;

    /// Translate every source text with `first`, then the result with `second`
    ///
    /// Returned responses pair the original source text with the final
    /// translation.
    fn pivot_multiple(
        &self,
        first: &Arc<TranslationModel>,
        second: &Arc<TranslationModel>,
        sources: Vec<String>,
        options: &[ResponseOptions],
    ) -> BridgeResult<Vec<Response>>;

    /// Name used in logs
    fn engine_name(&self) -> &str;
}

/// Fold two hops of alignment into one
///
/// `target_to_pivot` is `target tokens x pivot tokens` and `pivot_to_source` is
/// `pivot tokens x source tokens`; the result is their product,
/// `target tokens x source tokens`. If either hop has no alignment data the
/// result has none either.
pub fn compose_alignments(
    target_to_pivot: &[Vec<f32>],
    pivot_to_source: &[Vec<f32>],
) -> BridgeResult<Alignment> {
    if target_to_pivot.is_empty() || pivot_to_source.is_empty() {
        return Ok(Vec::new());
    }

    let pivot_tokens = pivot_to_source.len();
    let source_tokens = pivot_to_source[0].len();

    if let Some(row) = target_to_pivot.iter().find(|row| row.len() != pivot_tokens) {
        return Err(BridgeError::InvalidAlignment(format!(
            "second hop row has {} pivot columns but first hop has {} pivot rows",
            row.len(),
            pivot_tokens
        )));
    }
    if pivot_to_source.iter().any(|row| row.len() != source_tokens) {
        return Err(BridgeError::InvalidAlignment(
            "first hop rows have differing source widths".to_string(),
        ));
    }

    Ok(target_to_pivot
        .iter()
        .map(|pivot_weights| {
            (0..source_tokens)
                .map(|s| {
                    pivot_weights
                        .iter()
                        .zip(pivot_to_source)
                        .map(|(weight, row)| weight * row[s])
                        .sum::<f32>()
                })
                .collect()
        })
        .collect())
}
