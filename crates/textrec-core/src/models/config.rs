//! Configuration structures for the recognition bridge.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for textrec.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextrecConfig {
    /// Bridge configuration.
    pub bridge: BridgeConfig,

    /// Image loader configuration.
    pub loader: LoaderConfig,

    /// On-device engine configuration.
    pub engine: EngineConfig,
}

/// Recognition bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Emit the full recognized text in debug traces.
    pub trace_text: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self { trace_text: true }
    }
}

/// Local image loader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Remove a leading `file://` before opening local files.
    pub strip_file_scheme: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            strip_file_scheme: true,
        }
    }
}

/// On-device OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text.
    pub keep_unk: bool,

    /// Maximum image dimension (longer side) for processing.
    pub max_image_size: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
            max_image_size: 2048,
        }
    }
}

impl EngineConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }
}

impl TextrecConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
