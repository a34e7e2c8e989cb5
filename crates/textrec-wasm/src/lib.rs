//! WASM bindings for on-device text recognition.
//!
//! The host supplies the vision engine as a JS function `detectText(uri)`
//! returning a page (or a Promise of one) shaped like
//! `{ text, blocks: [{ text, lines: [{ text, elements: [{ text }] }] }] }`.
//! Rejections are `Error` objects carrying a `code` property.

use std::rc::Rc;

use js_sys::{Error, Function, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};

use textrec_core::{
    BridgeConfig, EngineError, RecognitionBridge, RecognitionFailure, Text, UriPassthrough,
    VisionEngine,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Vision engine implemented by the host.
struct JsEngine {
    detect: Function,
}

impl VisionEngine<String> for JsEngine {
    async fn detect_text(&self, uri: String) -> Result<Text, EngineError> {
        let returned = self
            .detect
            .call1(&JsValue::NULL, &JsValue::from_str(&uri))
            .map_err(engine_error)?;

        let page = JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(engine_error)?;

        serde_wasm_bindgen::from_value(page).map_err(|e| EngineError::new(e.to_string()))
    }
}

fn engine_error(value: JsValue) -> EngineError {
    let message = value
        .dyn_ref::<Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| "vision engine failed".to_string());
    EngineError::new(message)
}

fn rejection(failure: RecognitionFailure) -> JsValue {
    let error = Error::new(&failure.message);
    let _ = Reflect::set(
        &error,
        &JsValue::from_str("code"),
        &JsValue::from_str(&failure.code),
    );
    error.into()
}

fn serialization_rejection(err: serde_wasm_bindgen::Error) -> JsValue {
    rejection(RecognitionFailure::new(err.to_string()))
}

/// Text recognition module for host runtimes.
#[wasm_bindgen]
pub struct TextRecognition {
    bridge: Rc<RecognitionBridge<UriPassthrough, JsEngine>>,
}

#[wasm_bindgen]
impl TextRecognition {
    /// Create a module around the host's `detectText` function.
    #[wasm_bindgen(constructor)]
    pub fn new(detect_text: Function) -> Self {
        Self::with_trace_text(detect_text, true)
    }

    /// Create a module, choosing whether recognized text is traced.
    #[wasm_bindgen(js_name = withTraceText)]
    pub fn with_trace_text(detect_text: Function, trace_text: bool) -> Self {
        let config = BridgeConfig { trace_text };
        let engine = JsEngine {
            detect: detect_text,
        };
        Self {
            bridge: Rc::new(RecognitionBridge::new(UriPassthrough, engine).with_config(config)),
        }
    }

    /// Recognize text, resolving with blocks, lines and elements.
    #[wasm_bindgen]
    pub fn recognize(&self, path: Option<String>) -> Promise {
        let bridge = Rc::clone(&self.bridge);
        future_to_promise(async move {
            let blocks = bridge
                .recognize(path.as_deref().unwrap_or_default())
                .await
                .map_err(rejection)?;

            serde_wasm_bindgen::to_value(&blocks).map_err(serialization_rejection)
        })
    }

    /// Recognize text, resolving with one string per block.
    #[wasm_bindgen(js_name = recognizeFlat)]
    pub fn recognize_flat(&self, path: Option<String>) -> Promise {
        let bridge = Rc::clone(&self.bridge);
        future_to_promise(async move {
            let blocks = bridge
                .recognize_flat(path.as_deref().unwrap_or_default())
                .await
                .map_err(rejection)?;

            serde_wasm_bindgen::to_value(&blocks).map_err(serialization_rejection)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textrec_core::BlockInfo;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const PAGE: &str = r#"
        if (uri !== "file:///receipt.png") {
            return Promise.reject(new Error("cannot open " + uri));
        }
        return Promise.resolve({
            text: "ACME Store\nTotal 9.99",
            blocks: [
                {
                    text: "ACME Store",
                    lines: [{ text: "ACME Store", elements: [{ text: "ACME" }, { text: "Store" }] }]
                },
                {
                    text: "Total 9.99",
                    lines: [{ text: "Total 9.99", elements: [{ text: "Total" }, { text: "9.99" }] }]
                }
            ]
        });
    "#;

    fn module(body: &str) -> TextRecognition {
        TextRecognition::new(Function::new_with_args("uri", body))
    }

    async fn rejected(promise: Promise) -> (String, String) {
        failure_parts(JsFuture::from(promise).await.unwrap_err())
    }

    fn failure_parts(err: JsValue) -> (String, String) {
        let code = Reflect::get(&err, &JsValue::from_str("code"))
            .unwrap()
            .as_string()
            .unwrap();
        let message = String::from(err.dyn_into::<Error>().unwrap().message());
        (code, message)
    }

    #[wasm_bindgen_test]
    async fn test_recognize_hierarchy() {
        let value = JsFuture::from(module(PAGE).recognize(Some("file:///receipt.png".into())))
            .await
            .unwrap();
        let blocks: Vec<BlockInfo> = serde_wasm_bindgen::from_value(value).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text_block, "ACME Store");
        assert_eq!(blocks[1].lines[0].elements[1].text_element, "9.99");
    }

    #[wasm_bindgen_test]
    async fn test_recognize_flat() {
        let value = JsFuture::from(module(PAGE).recognize_flat(Some("file:///receipt.png".into())))
            .await
            .unwrap();
        let flat: Vec<String> = serde_wasm_bindgen::from_value(value).unwrap();

        assert_eq!(flat, vec!["ACME Store", "Total 9.99"]);
    }

    #[wasm_bindgen_test]
    async fn test_synchronous_engine_result() {
        let empty = module("return { text: '', blocks: [] };");
        let value = JsFuture::from(empty.recognize_flat(Some("a.png".into())))
            .await
            .unwrap();
        let flat: Vec<String> = serde_wasm_bindgen::from_value(value).unwrap();

        assert!(flat.is_empty());
    }

    #[wasm_bindgen_test]
    async fn test_engine_rejection() {
        let (code, message) = rejected(module(PAGE).recognize(Some("other.png".into()))).await;
        assert_eq!(code, "something went wrong");
        assert_eq!(message, "cannot open other.png");
    }

    #[wasm_bindgen_test]
    async fn test_engine_throws() {
        let (code, message) =
            rejected(module("throw new Error('X');").recognize_flat(Some("a.png".into()))).await;
        assert_eq!(code, "something went wrong");
        assert_eq!(message, "X");
    }

    #[wasm_bindgen_test]
    fn test_serialization_failure_carries_code() {
        let err = serde_wasm_bindgen::Error::new("invalid payload");
        let (code, message) = failure_parts(serialization_rejection(err));
        assert_eq!(code, "something went wrong");
        assert!(message.contains("invalid payload"));
    }

    #[wasm_bindgen_test]
    async fn test_missing_path() {
        let (code, message) = rejected(module(PAGE).recognize(None)).await;
        assert_eq!(code, "something went wrong");
        assert_eq!(message, "Could not decode a file path into a bitmap.");
    }
}
