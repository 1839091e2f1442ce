/// Translation engine module
///
/// The bridge treats the engine as an opaque collaborator reached through the
/// [`TranslationEngine`] trait. This module holds that trait, the shared
/// [`TranslationModel`] handle, and a deterministic [`MockEngine`] used by the
/// tests and the boundary crates when no real backend is wired in.
///
/// # Components
///
/// 1. **Translator trait** - Synchronous batch and pivot entry points
/// 2. **Models** - Language-direction handles, shared across requests
/// 3. **Segmenter** - Rule-based sentence/token splitting for the mock
/// 4. **Mock engine** - Suffix, mapping, reordering, error and no-op modes
pub mod mock;
pub mod model;
pub mod segment;
pub mod translator;

pub use mock::{MockEngine, MockMode};
pub use model::{TranslationModel, normalize_language};
pub use segment::segment;
pub use translator::{TranslationEngine, compose_alignments};
