//! Blocking translation service
//!
//! [`BlockingService`] drives a [`TranslationEngine`] for a batch of texts and
//! wraps every returned [`Response`](crate::Response) in a [`ResponseView`],
//! keeping input order. It adds no validation, retries or recovery of its own:
//! whatever the engine reports is returned unchanged.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mt_bridge::{BlockingService, ResponseOptions, ServiceConfig, TranslationModel};
//!
//! let service = BlockingService::new(ServiceConfig::default());
//! let model = Arc::new(TranslationModel::new("enfr", "en", "fr").unwrap());
//! let views = service
//!     .translate(&model, vec!["Hello world.".to_string()], &[ResponseOptions::default()])
//!     .unwrap();
//! assert_eq!(views[0].original_text(), "Hello world.");
//! assert_eq!(views[0].size(), 1);
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::config::ServiceConfig;
use crate::engine::{MockEngine, TranslationEngine, TranslationModel};
use crate::error::BridgeResult;
use crate::response::{Response, ResponseOptions};
use crate::view::ResponseView;

/// Synchronous entry point for direct and pivot translation
///
/// Every call blocks the calling thread until the engine has produced the
/// whole batch. The service holds no locks; a shared model may be used by
/// several calls at once as far as the engine allows.
#[derive(Clone)]
pub struct BlockingService {
    config: ServiceConfig,
    engine: Arc<dyn TranslationEngine>,
}

impl BlockingService {
    /// Build a service backed by the mock engine described in `config`
    pub fn new(config: ServiceConfig) -> Self {
        let engine = Arc::new(MockEngine::new(config.engine.clone()));
        Self { config, engine }
    }

    /// Build a service backed by any engine
    pub fn with_engine(config: ServiceConfig, engine: Arc<dyn TranslationEngine>) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn engine_name(&self) -> &str {
        self.engine.engine_name()
    }

    /// Translate `sources` with `model`, one view per source in input order
    ///
    /// `options` must pair up with `sources`; the engine decides how a
    /// mismatch is reported.
    pub fn translate(
        &self,
        model: &Arc<TranslationModel>,
        sources: Vec<String>,
        options: &[ResponseOptions],
    ) -> BridgeResult<Vec<ResponseView>> {
        debug!(
            engine = self.engine.engine_name(),
            model = model.name(),
            batch = sources.len(),
            "translate"
        );
        let responses = self.engine.translate_multiple(model, sources, options)?;
        Ok(wrap(responses))
    }

    /// Translate `sources` through `first`'s target language into `second`'s
    ///
    /// The returned views pair each original text with its final translation;
    /// how the two hops are chained is up to the engine.
    pub fn translate_via_pivoting(
        &self,
        first: &Arc<TranslationModel>,
        second: &Arc<TranslationModel>,
        sources: Vec<String>,
        options: &[ResponseOptions],
    ) -> BridgeResult<Vec<ResponseView>> {
        debug!(
            engine = self.engine.engine_name(),
            first = first.name(),
            second = second.name(),
            batch = sources.len(),
            "translate via pivot"
        );
        let responses = self.engine.pivot_multiple(first, second, sources, options)?;
        Ok(wrap(responses))
    }
}

impl std::fmt::Debug for BlockingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingService")
            .field("engine", &self.engine.engine_name())
            .field("config", &self.config)
            .finish()
    }
}

fn wrap(responses: Vec<Response>) -> Vec<ResponseView> {
    let views: Vec<ResponseView> = responses.into_iter().map(ResponseView::from).collect();
    debug!(
        responses = views.len(),
        sentences = views.iter().map(ResponseView::size).sum::<usize>(),
        "batch complete"
    );
    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotatedText;
    use crate::byte_range::ByteRange;
    use crate::engine::MockMode;
    use crate::error::BridgeError;
    use std::sync::Mutex;

    /// Engine that hands back prepared responses and records what it was given
    struct CannedEngine {
        responses: Mutex<Option<Vec<Response>>>,
        seen: Mutex<Vec<String>>,
    }

    impl CannedEngine {
        fn new(responses: Vec<Response>) -> Self {
            Self {
                responses: Mutex::new(Some(responses)),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn take(&self, sources: Vec<String>) -> BridgeResult<Vec<Response>> {
            self.seen.lock().unwrap().extend(sources);
            self.responses
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| BridgeError::Engine("no canned responses left".to_string()))
        }
    }

    impl TranslationEngine for CannedEngine {
        fn translate_multiple(
            &self,
            _model: &Arc<TranslationModel>,
            sources: Vec<String>,
            _options: &[ResponseOptions],
        ) -> BridgeResult<Vec<Response>> {
            self.take(sources)
        }

        fn pivot_multiple(
            &self,
            _first: &Arc<TranslationModel>,
            _second: &Arc<TranslationModel>,
            sources: Vec<String>,
            _options: &[ResponseOptions],
        ) -> BridgeResult<Vec<Response>> {
            self.take(sources)
        }

        fn engine_name(&self) -> &str {
            "Canned Engine"
        }
    }

    fn canned(source: &str, target: &str) -> Response {
        let mut src = AnnotatedText::new(source);
        src.push_sentence(ByteRange::new(0, source.len()), vec![ByteRange::new(0, source.len())])
            .unwrap();
        let mut tgt = AnnotatedText::new(target);
        tgt.push_sentence(ByteRange::new(0, target.len()), vec![ByteRange::new(0, target.len())])
            .unwrap();
        Response::new(src, tgt, vec![]).unwrap()
    }

    fn model(source: &str, target: &str) -> Arc<TranslationModel> {
        Arc::new(TranslationModel::new(format!("{}{}", source, target), source, target).unwrap())
    }

    #[test]
    fn test_wraps_engine_responses_in_order() {
        let engine = Arc::new(CannedEngine::new(vec![canned("one", "un"), canned("two", "deux")]));
        let service = BlockingService::with_engine(ServiceConfig::default(), engine.clone());

        let views = service
            .translate(
                &model("en", "fr"),
                vec!["one".to_string(), "two".to_string()],
                &[ResponseOptions::default(); 2],
            )
            .unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].translated_text(), "un");
        assert_eq!(views[1].translated_text(), "deux");
        assert_eq!(*engine.seen.lock().unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_relays_engine_error_unchanged() {
        let service = BlockingService::new(ServiceConfig {
            engine: MockMode::Error("model failed to load".to_string()),
            ..ServiceConfig::default()
        });
        let result = service.translate(
            &model("en", "fr"),
            vec!["hello".to_string()],
            &[ResponseOptions::default()],
        );
        assert_eq!(
            result,
            Err(BridgeError::Engine("model failed to load".to_string()))
        );
    }

    #[test]
    fn test_does_not_validate_batch_sizes_itself() {
        // the canned engine ignores options, so a mismatch passes through
        let engine = Arc::new(CannedEngine::new(vec![canned("a", "b")]));
        let service = BlockingService::with_engine(ServiceConfig::default(), engine);
        let views = service
            .translate(&model("en", "fr"), vec!["a".to_string()], &[])
            .unwrap();
        assert_eq!(views.len(), 1);
    }

    #[test]
    fn test_reports_engine_batch_mismatch() {
        let service = BlockingService::new(ServiceConfig::default());
        let result = service.translate(
            &model("en", "fr"),
            vec!["a".to_string(), "b".to_string()],
            &[ResponseOptions::default()],
        );
        assert!(matches!(result, Err(BridgeError::BatchSizeMismatch { .. })));
    }

    #[test]
    fn test_hello_goodbye_scenario() {
        let service = BlockingService::new(ServiceConfig::default());
        let views = service
            .translate(
                &model("en", "fr"),
                vec!["Hello world.".to_string(), "Goodbye.".to_string()],
                &[ResponseOptions::default(); 2],
            )
            .unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].original_text(), "Hello world.");
        assert_eq!(views[0].size(), 1);
        assert_eq!(views[1].original_text(), "Goodbye.");
    }

    #[test]
    fn test_pivot_reaches_final_language() {
        let service = BlockingService::new(ServiceConfig::default());
        let views = service
            .translate_via_pivoting(
                &model("cs", "en"),
                &model("en", "de"),
                vec!["Ahoj.".to_string(), "Nazdar.".to_string()],
                &[ResponseOptions::default(); 2],
            )
            .unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].original_text(), "Ahoj.");
        assert_eq!(views[0].translated_text(), "Ahoj_en_de.");
        assert_eq!(views[1].translated_text(), "Nazdar_en_de.");
    }

    #[test]
    fn test_shared_service_across_threads() {
        let service = Arc::new(BlockingService::new(ServiceConfig::default()));
        let model = model("en", "fr");
        std::thread::scope(|scope| {
            for i in 0..4 {
                let service = Arc::clone(&service);
                let model = Arc::clone(&model);
                scope.spawn(move || {
                    let text = format!("text{}", i);
                    let views = service
                        .translate(&model, vec![text.clone()], &[ResponseOptions::default()])
                        .unwrap();
                    assert_eq!(views[0].original_text(), text);
                    assert_eq!(views[0].translated_text(), format!("{}_fr", text));
                });
            }
        });
    }

    #[test]
    fn test_engine_name_and_debug() {
        let service = BlockingService::new(ServiceConfig::default());
        assert_eq!(service.engine_name(), "Mock Engine");
        assert!(format!("{:?}", service).contains("Mock Engine"));
    }
}
