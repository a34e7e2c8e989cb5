//! On-device engine backed by `pure-onnx-ocr`.

use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::EngineError;
use crate::models::config::EngineConfig;
use crate::models::text::{Text, TextBlock, TextLine};

use super::VisionEngine;

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
///
/// Each detected region becomes one block holding one line; elements are the
/// line's whitespace-separated words.
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    config: EngineConfig,
}

/// A recognized region with the top-left corner of its bounds.
struct Region {
    left: f32,
    top: f32,
    text: String,
}

impl PureOcrEngine {
    /// Create an engine from the model files named in `config`.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let det_path = config.model_path(&config.detection_model);
        let rec_path = config.model_path(&config.recognition_model);
        let dict_path = config.model_path(&config.dictionary);

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| EngineError::new(format!("failed to load OCR models: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self { engine, config })
    }

    /// Process a decoded image into a page hierarchy.
    pub fn process(&self, image: &DynamicImage) -> Result<Text, EngineError> {
        let start = Instant::now();
        let image = self.limit_size(image);
        let (width, height) = image.dimensions();

        info!("Processing image: {}x{}", width, height);

        let results = self
            .engine
            .run_from_image(&image)
            .map_err(|e| EngineError::new(format!("text detection failed: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut regions: Vec<Region> = results
            .iter()
            .map(|r| {
                let (left, top) = top_left(&r.bounding_box);
                Region {
                    left,
                    top,
                    text: clean_text(&r.text, self.config.keep_unk),
                }
            })
            .filter(|r| !r.text.trim().is_empty())
            .collect();

        sort_by_reading_order(&mut regions);

        let blocks = regions
            .iter()
            .map(|r| TextBlock::from_lines(vec![TextLine::from_words(&r.text)]))
            .collect();
        let text = Text::from_blocks(blocks);

        info!(
            "OCR complete: {} blocks in {}ms",
            text.blocks.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }

    fn limit_size(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let max_side = width.max(height);
        let limit = self.config.max_image_size;

        if limit == 0 || max_side <= limit {
            return image.clone();
        }

        let scale = limit as f32 / max_side as f32;
        let new_width = ((width as f32 * scale).round() as u32).max(1);
        let new_height = ((height as f32 * scale).round() as u32).max(1);

        debug!("Downscaling {}x{} to {}x{}", width, height, new_width, new_height);

        image.resize_exact(new_width, new_height, image::imageops::FilterType::Lanczos3)
    }
}

impl VisionEngine<DynamicImage> for PureOcrEngine {
    async fn detect_text(&self, image: DynamicImage) -> Result<Text, EngineError> {
        self.process(&image)
    }
}

fn clean_text(text: &str, keep_unk: bool) -> String {
    if keep_unk {
        text.to_string()
    } else {
        text.replace("[UNK]", " ")
    }
}

/// Top-left corner of a polygon's axis-aligned bounds.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .fold((f32::INFINITY, f32::INFINITY), |(x, y), c| {
            (x.min(c.x as f32), y.min(c.y as f32))
        })
}

/// Top-to-bottom in 20px rows, then left-to-right.
fn sort_by_reading_order(regions: &mut [Region]) {
    regions.sort_by(|a, b| {
        let row_a = (a.top / 20.0) as i32;
        let row_b = (b.top / 20.0) as i32;
        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            a.left.partial_cmp(&b.left).unwrap_or(std::cmp::Ordering::Equal)
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(left: f32, top: f32, text: &str) -> Region {
        Region {
            left,
            top,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_reading_order() {
        let mut regions = vec![
            region(300.0, 105.0, "right"),
            region(10.0, 300.0, "bottom"),
            region(10.0, 101.0, "left"),
            region(50.0, 5.0, "top"),
        ];
        sort_by_reading_order(&mut regions);

        let order: Vec<&str> = regions.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(order, vec!["top", "left", "right", "bottom"]);
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("Na[UNK]e", false), "Na e");
        assert_eq!(clean_text("Na[UNK]e", true), "Na[UNK]e");
    }

    #[test]
    fn test_missing_models_is_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            model_dir: dir.path().to_path_buf(),
            ..EngineConfig::default()
        };

        match PureOcrEngine::new(config) {
            Ok(_) => panic!("engine built without model files"),
            Err(err) => assert!(err.message().starts_with("failed to load OCR models")),
        }
    }
}
