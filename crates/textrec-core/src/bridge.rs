//! Recognition bridge: one image in, one envelope out.

use tracing::{debug, warn};

use crate::engine::VisionEngine;
use crate::envelope::{self, Outcome, Resolver};
use crate::error::{RecognitionError, Result};
use crate::models::config::BridgeConfig;
use crate::models::output::{self, FlatText, Hierarchy};
use crate::models::text::Text;
use crate::source::{ImageLoader, ImageReference};

/// Exposes a vision engine to a host runtime.
///
/// Holds no per-call state; concurrent calls share only the loader and
/// engine handles.
pub struct RecognitionBridge<L, E> {
    loader: L,
    engine: E,
    config: BridgeConfig,
}

impl<L, E> RecognitionBridge<L, E>
where
    L: ImageLoader,
    E: VisionEngine<L::Image>,
{
    /// Create a bridge with default configuration.
    pub fn new(loader: L, engine: E) -> Self {
        Self {
            loader,
            engine,
            config: BridgeConfig::default(),
        }
    }

    /// Set configuration.
    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Recognize text and return the block/line/element hierarchy.
    pub async fn recognize(&self, path: &str) -> Outcome<Hierarchy> {
        let (resolver, pending) = envelope::channel();
        self.recognize_into(path, resolver).await;
        pending.await
    }

    /// Recognize text and return one string per block.
    pub async fn recognize_flat(&self, path: &str) -> Outcome<FlatText> {
        let (resolver, pending) = envelope::channel();
        self.recognize_flat_into(path, resolver).await;
        pending.await
    }

    /// Settle `resolver` with the hierarchical result.
    ///
    /// Returns `false` if the resolver was already settled elsewhere.
    pub async fn recognize_into(&self, path: &str, resolver: Resolver<Hierarchy>) -> bool {
        self.settle(path, resolver, output::to_hierarchy).await
    }

    /// Settle `resolver` with the flat result.
    pub async fn recognize_flat_into(&self, path: &str, resolver: Resolver<FlatText>) -> bool {
        self.settle(path, resolver, output::to_flat).await
    }

    async fn settle<T>(&self, path: &str, resolver: Resolver<T>, shape: fn(&Text) -> T) -> bool {
        let on_success = resolver.clone();
        let on_failure = resolver;

        match self.detect(path).await {
            Ok(text) => on_success.resolve(shape(&text)),
            Err(e) => {
                warn!("Recognition failed for {:?}: {}", path, e);
                on_failure.reject(e.into_failure())
            }
        }
    }

    async fn detect(&self, path: &str) -> Result<Text> {
        debug!("image path: {}", path);

        let reference = ImageReference::new(path).ok_or(RecognitionError::UndecodablePath)?;
        let image = self.loader.load(&reference)?;
        let text = self.engine.detect_text(image).await?;

        if text.is_empty() {
            debug!("No text detected in {}", reference);
        } else if self.config.trace_text {
            debug!("{}", text.text);
        }

        Ok(text)
    }
}

/// Convenience function to create a bridge over the on-device engine.
#[cfg(feature = "native")]
pub fn create_native_bridge(
    config: &crate::models::config::TextrecConfig,
) -> std::result::Result<
    RecognitionBridge<crate::source::FileImageLoader, crate::engine::PureOcrEngine>,
    crate::error::EngineError,
> {
    let engine = crate::engine::PureOcrEngine::new(config.engine.clone())?;
    let loader = crate::source::FileImageLoader::from_config(&config.loader);
    Ok(RecognitionBridge::new(loader, engine).with_config(config.bridge.clone()))
}
