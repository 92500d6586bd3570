//! Configuration structures for the verification pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the veripay pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VeripayConfig {
    /// Direct HTTP acquisition configuration.
    pub http: HttpConfig,

    /// Browser-mediated acquisition configuration.
    pub browser: BrowserConfig,

    /// OCR model configuration.
    pub ocr: OcrConfig,

    /// Provider endpoint base URLs.
    pub endpoints: EndpointConfig,
}

/// Direct HTTP acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Number of re-attempts after a network-level failure.
    pub retries: u32,

    /// User-Agent header sent with receipt requests.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            retries: 2,
            user_agent: "veripay/0.1".to_string(),
        }
    }
}

/// Browser-mediated acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Bound on waiting for a captured document response, in seconds.
    pub capture_timeout_secs: u64,

    /// Number of full re-navigations after a navigation network failure.
    pub navigation_retries: u32,

    /// Path to a Chromium/Chrome executable. `None` lets the launcher
    /// auto-detect an installed browser.
    pub executable: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            capture_timeout_secs: 40,
            navigation_retries: 2,
            executable: None,
        }
    }
}

/// OCR model file locations.
///
/// Receipts from a bilingual locale need the Amharic recognition model;
/// Latin-only providers use the smaller Latin set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Latin recognition model and dictionary.
    pub latin_recognition_model: String,
    pub latin_dictionary: String,

    /// Amharic+Latin recognition model and dictionary.
    pub amharic_recognition_model: String,
    pub amharic_dictionary: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            latin_recognition_model: "latin_rec.onnx".to_string(),
            latin_dictionary: "latin_dict.txt".to_string(),
            amharic_recognition_model: "amharic_rec.onnx".to_string(),
            amharic_dictionary: "amharic_dict.txt".to_string(),
        }
    }
}

/// Base URLs for provider receipt endpoints.
///
/// The path shape per provider is data in the provider registry; only the
/// host part is configurable here (staging hosts, test doubles).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub telebirr: String,
    pub cbe: String,
    pub dashen: String,
    pub abyssinia: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            telebirr: "https://transactioninfo.ethiotelecom.et".to_string(),
            cbe: "https://apps.cbe.com.et:100".to_string(),
            dashen: "https://receipt.dashensuperapp.com".to_string(),
            abyssinia: "https://cs.bankofabyssinia.com".to_string(),
        }
    }
}

impl VeripayConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip() {
        let config = VeripayConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: VeripayConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.http.timeout_secs, 30);
        assert_eq!(back.browser.capture_timeout_secs, 40);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: VeripayConfig =
            serde_json::from_str(r#"{"http": {"timeout_secs": 5}}"#).unwrap();
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.retries, 2);
        assert!(config.endpoints.cbe.contains("cbe.com.et"));
    }
}
