//! Core library for on-device text recognition.
//!
//! This crate provides:
//! - A recognition bridge with hierarchical and flat entry points
//! - Single-resolution envelopes for host runtimes
//! - Image loading from local paths and `file://` URIs
//! - An on-device OCR engine using `pure-onnx-ocr` (feature `native`)

pub mod bridge;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod models;
pub mod source;

pub use bridge::RecognitionBridge;
#[cfg(feature = "native")]
pub use bridge::create_native_bridge;
pub use engine::VisionEngine;
#[cfg(feature = "native")]
pub use engine::PureOcrEngine;
pub use envelope::{Outcome, Pending, Resolver};
pub use error::{
    EngineError, RecognitionError, RecognitionFailure, ResourceError, Result, GENERIC_ERROR_CODE,
};
pub use models::config::{BridgeConfig, EngineConfig, LoaderConfig, TextrecConfig};
pub use models::output::{BlockInfo, ElementInfo, FlatText, Hierarchy, LineInfo};
pub use models::text::{Text, TextBlock, TextElement, TextLine};
pub use source::{FileImageLoader, ImageLoader, ImageReference, UriPassthrough};
