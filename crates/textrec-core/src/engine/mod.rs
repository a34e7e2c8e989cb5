//! Vision engine collaborator.
//!
//! The bridge never looks inside an engine: it submits one image and
//! awaits one [`Text`] or one [`EngineError`].

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use std::future::Future;

use crate::error::EngineError;
use crate::models::text::Text;

/// Trait for on-device text detection engines.
///
/// `I` is the image representation the engine consumes, produced by the
/// paired [`ImageLoader`](crate::source::ImageLoader).
pub trait VisionEngine<I> {
    /// Run one detection pass over `image`.
    fn detect_text(&self, image: I) -> impl Future<Output = Result<Text, EngineError>>;
}
