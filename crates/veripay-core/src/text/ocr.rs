//! OCR extraction for uploaded receipt images, backed by `pure-onnx-ocr`.

use std::path::Path;

use image::DynamicImage;
use tracing::{debug, info};

use super::{OcrLanguages, RawText};
use crate::config::OcrConfig;
use crate::error::{Result, VerifyError};

/// OCR engine wrapper selecting models per language set.
pub struct OcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
}

impl OcrEngine {
    /// Load an engine for the given language set from configured model files.
    pub fn from_config(config: &OcrConfig, languages: OcrLanguages) -> Result<Self> {
        let (rec, dict) = match languages {
            OcrLanguages::Latin => (&config.latin_recognition_model, &config.latin_dictionary),
            OcrLanguages::AmharicLatin => {
                (&config.amharic_recognition_model, &config.amharic_dictionary)
            }
        };

        let det_path = config.model_dir.join(&config.detection_model);
        let rec_path = config.model_dir.join(rec);
        let dict_path = config.model_dir.join(dict);

        Self::from_paths(&det_path, &rec_path, &dict_path, languages)
    }

    fn from_paths(
        det: &Path,
        rec: &Path,
        dict: &Path,
        languages: OcrLanguages,
    ) -> Result<Self> {
        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(det)
            .rec_model_path(rec)
            .dictionary_path(dict)
            .build()
            .map_err(|e| VerifyError::ExtractionFailed(format!("loading OCR models: {e}")))?;

        info!("Loaded {:?} OCR models", languages);
        Ok(Self { engine })
    }

    /// Run OCR on raw image bytes and return flattened text.
    pub fn extract_text(&self, image_bytes: &[u8]) -> Result<RawText> {
        let image = image::load_from_memory(image_bytes)
            .map_err(|e| VerifyError::ExtractionFailed(format!("decoding image: {e}")))?;
        self.extract_from_image(&image)
    }

    /// Run OCR on a decoded image.
    pub fn extract_from_image(&self, image: &DynamicImage) -> Result<RawText> {
        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| VerifyError::ExtractionFailed(format!("OCR: {e}")))?;

        debug!("OCR returned {} text regions", results.len());

        // Sort into reading order (rows top to bottom, then left to right)
        // before flattening, so label/value adjacency survives.
        let mut boxes: Vec<(f32, f32, String)> = results
            .iter()
            .map(|r| {
                let (x, y) = first_corner(&r.bounding_box);
                (y, x, r.text.replace("[UNK]", " "))
            })
            .collect();
        boxes.sort_by(|a, b| {
            let row_a = (a.0 / 20.0) as i32;
            let row_b = (b.0 / 20.0) as i32;
            row_a
                .cmp(&row_b)
                .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        });

        let joined = boxes
            .iter()
            .map(|(_, _, t)| t.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(RawText::from_text(&joined))
    }
}

fn first_corner(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .next()
        .map(|c| (c.x as f32, c.y as f32))
        .unwrap_or((0.0, 0.0))
}
