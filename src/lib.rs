//! Boundary-safe access to machine translation responses
//!
//! This crate sits between a translation engine and a caller on the other side
//! of a language or process boundary. It runs translations synchronously
//! through [`BlockingService`] and hands back one [`ResponseView`] per input
//! text. A view owns its [`Response`] and answers queries about it (texts,
//! sentence byte ranges, token alignments) without copying the underlying
//! buffers.
//!
//! # Workflow Example
//!
//! ```
//! use std::sync::Arc;
//! use mt_bridge::{BlockingService, ResponseOptions, ServiceConfig, TranslationModel};
//!
//! let service = BlockingService::new(ServiceConfig::default());
//! let first = Arc::new(TranslationModel::new("csen", "cs", "en").unwrap());
//! let second = Arc::new(TranslationModel::new("ende", "en", "de").unwrap());
//!
//! let views = service
//!     .translate_via_pivoting(
//!         &first,
//!         &second,
//!         vec!["Ahoj světe.".to_string()],
//!         &[ResponseOptions::with_alignment()],
//!     )
//!     .unwrap();
//!
//! let view = &views[0];
//! let sentence = view.source_sentence_range(0).unwrap();
//! assert_eq!(&view.original_text()[sentence.begin..sentence.end], "Ahoj světe.");
//! for entry in view.alignments() {
//!     assert_eq!(entry.alignments.len(), entry.target.len());
//! }
//! ```

pub mod annotation;
pub mod byte_range;
pub mod config;
pub mod engine;
pub mod error;
pub mod response;
pub mod service;
pub mod view;


// Re-export main types for convenient access
pub use annotation::AnnotatedText;
pub use byte_range::ByteRange;
pub use config::{CONFIG_ENV_VAR, ModelConfig, ServiceConfig};
pub use engine::{
    MockEngine, MockMode, TranslationEngine, TranslationModel, compose_alignments,
    normalize_language, segment,
};
pub use error::{BridgeError, BridgeResult};
pub use response::{Alignment, Response, ResponseOptions};
pub use service::BlockingService;
pub use view::{ResponseView, SentenceAlignment};
