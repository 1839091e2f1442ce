//! JavaScript bindings for the translation bridge
//!
//! Exposes, under the names JavaScript code sees:
//!
//! - `ByteRange` - `{ begin, end }` value object
//! - `ResponseWrapper` - shared handle over one translated response
//! - `VectorResponseWrapper` - ordered batch of `ResponseWrapper`s
//! - `TranslationModel` - a language-direction handle
//! - `BlockingService` - `translate` and `translateViaPivoting`
//!
//! Every fallible call throws a JS `Error` carrying the bridge error message.

use std::sync::Arc;

use mt_bridge::{
    BlockingService, BridgeError, BridgeResult, ResponseOptions, ResponseView, SentenceAlignment,
    ServiceConfig, TranslationModel,
};
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js_error(error: BridgeError) -> JsError {
    JsError::new(&error.to_string())
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("invalid {}: {}", what, e)))
}

// ============================================================================
// BYTE RANGE
// ============================================================================

#[wasm_bindgen(js_name = ByteRange)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsByteRange {
    pub begin: usize,
    pub end: usize,
}

impl From<mt_bridge::ByteRange> for JsByteRange {
    fn from(range: mt_bridge::ByteRange) -> Self {
        Self {
            begin: range.begin,
            end: range.end,
        }
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

/// Shared, read-only handle over one translated response
#[wasm_bindgen(js_name = ResponseWrapper)]
#[derive(Debug, Clone, Default)]
pub struct JsResponse {
    inner: Arc<ResponseView>,
}

impl JsResponse {
    fn source_sentence(&self, sentence_idx: usize) -> BridgeResult<JsByteRange> {
        self.inner.source_sentence_range(sentence_idx).map(Into::into)
    }

    fn translated_sentence(&self, sentence_idx: usize) -> BridgeResult<JsByteRange> {
        self.inner.target_sentence_range(sentence_idx).map(Into::into)
    }

    fn alignment_records(&self) -> Vec<SentenceAlignment> {
        self.inner.alignments()
    }
}

#[wasm_bindgen(js_class = ResponseWrapper)]
impl JsResponse {
    /// An empty response (zero sentences)
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsResponse {
        JsResponse::default()
    }

    pub fn size(&self) -> usize {
        self.inner.size()
    }

    #[wasm_bindgen(js_name = getOriginalText)]
    pub fn get_original_text(&self) -> String {
        self.inner.original_text().to_string()
    }

    #[wasm_bindgen(js_name = getTranslatedText)]
    pub fn get_translated_text(&self) -> String {
        self.inner.translated_text().to_string()
    }

    /// Byte range of a source sentence; throws unless `0 <= idx < size()`
    #[wasm_bindgen(js_name = getSourceSentence)]
    pub fn get_source_sentence(&self, sentence_idx: usize) -> Result<JsByteRange, JsError> {
        self.source_sentence(sentence_idx).map_err(to_js_error)
    }

    /// Byte range of a translated sentence; throws unless `0 <= idx < size()`
    #[wasm_bindgen(js_name = getTranslatedSentence)]
    pub fn get_translated_sentence(&self, sentence_idx: usize) -> Result<JsByteRange, JsError> {
        self.translated_sentence(sentence_idx).map_err(to_js_error)
    }

    /// `Array<{ source: string[], target: string[], alignments: number[][] }>`
    ///
    /// The outer `alignments` array has one entry per target token and each
    /// inner array one weight per source token.
    #[wasm_bindgen(js_name = getAlignments)]
    pub fn get_alignments(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.alignment_records())
            .map_err(|e| JsError::new(&format!("failed to convert alignments: {}", e)))
    }

    /// Another handle to the same response
    #[wasm_bindgen(js_name = clone)]
    pub fn share(&self) -> JsResponse {
        self.clone()
    }
}

/// Ordered batch of responses, one per input text
#[wasm_bindgen(js_name = VectorResponseWrapper)]
#[derive(Debug, Default)]
pub struct ResponseList {
    items: Vec<Arc<ResponseView>>,
}

impl From<Vec<ResponseView>> for ResponseList {
    fn from(views: Vec<ResponseView>) -> Self {
        Self {
            items: views.into_iter().map(Arc::new).collect(),
        }
    }
}

#[wasm_bindgen(js_class = VectorResponseWrapper)]
impl ResponseList {
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// The response at `index`, or `undefined` past the end
    pub fn get(&self, index: usize) -> Option<JsResponse> {
        self.items.get(index).map(|view| JsResponse {
            inner: Arc::clone(view),
        })
    }
}

// ============================================================================
// MODELS AND SERVICE
// ============================================================================

#[wasm_bindgen(js_name = TranslationModel)]
#[derive(Debug, Clone)]
pub struct JsTranslationModel {
    inner: Arc<TranslationModel>,
}

#[wasm_bindgen(js_class = TranslationModel)]
impl JsTranslationModel {
    #[wasm_bindgen(constructor)]
    pub fn new(name: &str, source: &str, target: &str) -> Result<JsTranslationModel, JsError> {
        TranslationModel::new(name, source, target)
            .map(|model| JsTranslationModel {
                inner: Arc::new(model),
            })
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.inner.name().to_string()
    }

    #[wasm_bindgen(getter, js_name = sourceLanguage)]
    pub fn source_language(&self) -> String {
        self.inner.source_language().to_string()
    }

    #[wasm_bindgen(getter, js_name = targetLanguage)]
    pub fn target_language(&self) -> String {
        self.inner.target_language().to_string()
    }
}

#[wasm_bindgen(js_name = BlockingService)]
#[derive(Debug)]
pub struct JsBlockingService {
    inner: BlockingService,
}

/// Options for a batch: one entry per text, all defaults when omitted
fn resolve_options(options: Option<Vec<ResponseOptions>>, texts: usize) -> Vec<ResponseOptions> {
    options.unwrap_or_else(|| vec![ResponseOptions::default(); texts])
}

fn translate_internal(
    service: &BlockingService,
    model: &Arc<TranslationModel>,
    texts: Vec<String>,
    options: Option<Vec<ResponseOptions>>,
) -> BridgeResult<ResponseList> {
    let options = resolve_options(options, texts.len());
    service
        .translate(model, texts, &options)
        .map(ResponseList::from)
}

fn pivot_internal(
    service: &BlockingService,
    first: &Arc<TranslationModel>,
    second: &Arc<TranslationModel>,
    texts: Vec<String>,
    options: Option<Vec<ResponseOptions>>,
) -> BridgeResult<ResponseList> {
    let options = resolve_options(options, texts.len());
    service
        .translate_via_pivoting(first, second, texts, &options)
        .map(ResponseList::from)
}

#[wasm_bindgen(js_class = BlockingService)]
impl JsBlockingService {
    /// Build a service from a configuration object (`undefined` for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsBlockingService, JsError> {
        let config: ServiceConfig = if config.is_undefined() || config.is_null() {
            ServiceConfig::default()
        } else {
            from_js(config, "service configuration")?
        };
        Ok(JsBlockingService {
            inner: BlockingService::new(config),
        })
    }

    /// Translate `texts` (a `string[]`) with `model`
    ///
    /// `options` is an optional `Array<{ alignment?: boolean }>` with one entry
    /// per text.
    pub fn translate(
        &self,
        model: &JsTranslationModel,
        texts: JsValue,
        options: JsValue,
    ) -> Result<ResponseList, JsError> {
        let texts: Vec<String> = from_js(texts, "texts")?;
        let options: Option<Vec<ResponseOptions>> = from_js(options, "response options")?;
        translate_internal(&self.inner, &model.inner, texts, options).map_err(to_js_error)
    }

    /// Translate `texts` through `first`'s target language into `second`'s
    #[wasm_bindgen(js_name = translateViaPivoting)]
    pub fn translate_via_pivoting(
        &self,
        first: &JsTranslationModel,
        second: &JsTranslationModel,
        texts: JsValue,
        options: JsValue,
    ) -> Result<ResponseList, JsError> {
        let texts: Vec<String> = from_js(texts, "texts")?;
        let options: Option<Vec<ResponseOptions>> = from_js(options, "response options")?;
        pivot_internal(&self.inner, &first.inner, &second.inner, texts, options)
            .map_err(to_js_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(source: &str, target: &str) -> Arc<TranslationModel> {
        Arc::new(TranslationModel::new(format!("{}{}", source, target), source, target).unwrap())
    }

    fn service() -> BlockingService {
        BlockingService::new(ServiceConfig::default())
    }

    #[test]
    fn test_translate_returns_one_handle_per_text() {
        let list = translate_internal(
            &service(),
            &model("en", "fr"),
            vec!["Hello world.".to_string(), "Goodbye.".to_string()],
            None,
        )
        .unwrap();

        assert_eq!(list.size(), 2);
        let first = list.get(0).unwrap();
        assert_eq!(first.get_original_text(), "Hello world.");
        assert_eq!(first.size(), 1);
        assert_eq!(list.get(1).unwrap().get_translated_text(), "Goodbye_fr.");
        assert!(list.get(2).is_none());
    }

    #[test]
    fn test_handles_share_the_same_response() {
        let list = translate_internal(&service(), &model("en", "fr"), vec!["a".to_string()], None)
            .unwrap();
        let handle = list.get(0).unwrap();
        let other = handle.share();
        assert!(Arc::ptr_eq(&handle.inner, &other.inner));
        assert_eq!(Arc::strong_count(&handle.inner), 3);
    }

    #[test]
    fn test_sentence_ranges() {
        let list = translate_internal(
            &service(),
            &model("en", "fr"),
            vec!["One. Two.".to_string()],
            None,
        )
        .unwrap();
        let handle = list.get(0).unwrap();
        assert_eq!(handle.source_sentence(1).unwrap(), JsByteRange { begin: 5, end: 9 });
        assert_eq!(
            handle.translated_sentence(1).unwrap(),
            JsByteRange { begin: 8, end: 15 }
        );
        assert_eq!(
            handle.source_sentence(2),
            Err(BridgeError::SentenceOutOfRange { index: 2, count: 2 })
        );
    }

    #[test]
    fn test_alignment_records_follow_options() {
        let list = translate_internal(
            &service(),
            &model("en", "fr"),
            vec!["Hi there.".to_string(), "Bye.".to_string()],
            Some(vec![ResponseOptions::with_alignment(), ResponseOptions::default()]),
        )
        .unwrap();

        let aligned = list.get(0).unwrap().alignment_records();
        assert_eq!(aligned[0].source, vec!["Hi", "there", "."]);
        assert_eq!(aligned[0].alignments.len(), 3);

        let unaligned = list.get(1).unwrap().alignment_records();
        assert_eq!(unaligned[0].target, vec!["Bye_fr", "."]);
        assert!(unaligned[0].alignments.is_empty());
    }

    #[test]
    fn test_pivot() {
        let list = pivot_internal(
            &service(),
            &model("es", "en"),
            &model("en", "it"),
            vec!["Hola.".to_string()],
            None,
        )
        .unwrap();
        assert_eq!(list.get(0).unwrap().get_translated_text(), "Hola_en_it.");
    }

    #[test]
    fn test_engine_errors_pass_through() {
        let result = translate_internal(
            &service(),
            &model("en", "fr"),
            vec!["a".to_string()],
            Some(vec![]),
        );
        assert!(matches!(result, Err(BridgeError::BatchSizeMismatch { .. })));
    }

    #[test]
    fn test_empty_response_handle() {
        let handle = JsResponse::new();
        assert_eq!(handle.size(), 0);
        assert_eq!(handle.get_original_text(), "");
        assert!(handle.alignment_records().is_empty());
    }

    #[test]
    fn test_byte_range_conversion() {
        let range: JsByteRange = mt_bridge::ByteRange::new(3, 8).into();
        assert_eq!(range, JsByteRange { begin: 3, end: 8 });
    }
}
