use crate::decoding::OutputLayout;
use std::env;

pub use common::Environment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Deterministic synthetic detections, no model file required.
    Mock,
    /// ONNX Runtime session over a model file (feature `ort-backend`).
    Onnx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    ChannelMajor,
    DenseGrid,
}

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub environment: Environment,
    pub model_path: String,
    pub input_size: u32,
    pub num_classes: usize,
    pub layout: LayoutKind,
    pub num_candidates: usize,
    pub num_anchors: usize,
    pub grid_height: usize,
    pub grid_width: usize,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub backend: BackendKind,
    /// When true, a backend that fails to load falls back to the mock
    /// backend with a warning instead of aborting. Off by default so a
    /// misconfigured model path is loud.
    pub fallback_to_mock: bool,
    pub labels_path: Option<String>,
}

impl DetectorConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = Environment::from_env();

        let model_path =
            env::var("MODEL_PATH").unwrap_or_else(|_| "models/landmarks.onnx".to_string());

        let input_size = env::var("INPUT_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(512);

        let num_classes = env::var("NUM_CLASSES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let layout = match env::var("OUTPUT_LAYOUT")
            .unwrap_or_else(|_| "channel-major".to_string())
            .to_lowercase()
            .as_str()
        {
            "channel-major" => LayoutKind::ChannelMajor,
            "dense-grid" => LayoutKind::DenseGrid,
            other => anyhow::bail!("unknown OUTPUT_LAYOUT '{other}'"),
        };

        let num_candidates = env::var("NUM_CANDIDATES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5376);

        let num_anchors = env::var("NUM_ANCHORS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3);

        let grid_height = env::var("GRID_HEIGHT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(512);

        let grid_width = env::var("GRID_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(512);

        let confidence_threshold = env::var("CONFIDENCE_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.5);

        let iou_threshold = env::var("IOU_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.5);

        let backend = match env::var("DETECTOR_BACKEND")
            .unwrap_or_else(|_| "onnx".to_string())
            .to_lowercase()
            .as_str()
        {
            "onnx" => BackendKind::Onnx,
            "mock" => BackendKind::Mock,
            other => anyhow::bail!("unknown DETECTOR_BACKEND '{other}'"),
        };

        let fallback_to_mock = env::var("BACKEND_FALLBACK")
            .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let labels_path = env::var("LABELS_PATH").ok();

        Ok(Self {
            environment,
            model_path,
            input_size,
            num_classes,
            layout,
            num_candidates,
            num_anchors,
            grid_height,
            grid_width,
            confidence_threshold,
            iou_threshold,
            backend,
            fallback_to_mock,
            labels_path,
        })
    }

    /// The decoder layout this configuration selects.
    pub fn output_layout(&self) -> OutputLayout {
        match self.layout {
            LayoutKind::ChannelMajor => OutputLayout::ChannelMajor {
                num_candidates: self.num_candidates,
            },
            LayoutKind::DenseGrid => OutputLayout::DenseGrid {
                num_anchors: self.num_anchors,
                grid_height: self.grid_height,
                grid_width: self.grid_width,
            },
        }
    }

    /// Create default configuration for testing
    #[cfg(test)]
    pub fn test_default() -> Self {
        Self {
            environment: Environment::Development,
            model_path: "models/landmarks.onnx".to_string(),
            input_size: 512,
            num_classes: 10,
            layout: LayoutKind::ChannelMajor,
            num_candidates: 5376,
            num_anchors: 3,
            grid_height: 512,
            grid_width: 512,
            confidence_threshold: 0.5,
            iou_threshold: 0.5,
            backend: BackendKind::Mock,
            fallback_to_mock: false,
            labels_path: None,
        }
    }
}
