use crate::{
    backend::InferenceBackend,
    config::DetectorConfig,
    decoding::{BoundingBox, decode},
    error::DetectorError,
    labels::ClassLabels,
    preprocessing::{letterbox, to_input_tensor},
    suppression::suppress,
};
use image::RgbImage;

/// A surviving detection, ready for the overlay renderer: normalized [0,1]
/// corners with `left < right` and `top < bottom`.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub class_index: usize,
    pub class_name: String,
}

/// Result of one `detect` call. A backend failure yields an empty detection
/// list with `inference_error` set, so a degraded frame is observable and
/// never mistaken for "no detections".
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionOutcome {
    pub detections: Vec<Detection>,
    pub inference_error: Option<String>,
}

impl DetectionOutcome {
    pub fn is_degraded(&self) -> bool {
        self.inference_error.is_some()
    }
}

/// The detection pipeline: letterbox -> input tensor -> inference -> decode
/// -> suppress -> label. Holds no state between calls beyond the backend's
/// model handle, which it owns.
pub struct DetectionEngine<B: InferenceBackend> {
    backend: B,
    config: DetectorConfig,
    labels: ClassLabels,
}

impl<B: InferenceBackend> DetectionEngine<B> {
    /// Build the engine, failing fast when the backend declares an output
    /// shape that cannot match the configured layout. Such a mismatch is a
    /// model/decoder version problem that will not self-correct per frame.
    pub fn new(
        backend: B,
        config: DetectorConfig,
        labels: ClassLabels,
    ) -> Result<Self, DetectorError> {
        if let Some(shape) = backend.output_shape() {
            config
                .output_layout()
                .validate(&shape, config.num_classes)?;
        }

        tracing::info!(
            input_size = config.input_size,
            num_classes = config.num_classes,
            confidence_threshold = config.confidence_threshold,
            iou_threshold = config.iou_threshold,
            "Detection engine ready"
        );

        Ok(Self {
            backend,
            config,
            labels,
        })
    }

    /// Run detection over one image.
    ///
    /// Preprocessing and layout errors abort the call; a backend runtime
    /// failure degrades to an empty outcome so a live stream keeps going.
    #[tracing::instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn detect(&mut self, image: &RgbImage) -> Result<DetectionOutcome, DetectorError> {
        let letterboxed = letterbox(image, self.config.input_size)?;
        let input = to_input_tensor(&letterboxed)?;

        let raw = match self.backend.infer(&input) {
            Ok(tensor) => tensor,
            Err(e) => {
                tracing::error!(error = %e, "Inference backend failed, returning empty frame");
                return Ok(DetectionOutcome {
                    detections: Vec::new(),
                    inference_error: Some(e.to_string()),
                });
            }
        };

        let candidates = decode(
            &raw.view(),
            self.config.output_layout(),
            self.config.num_classes,
            self.config.confidence_threshold,
            image.width(),
            image.height(),
        )?;
        tracing::trace!(candidates = candidates.len(), "Decoded raw output");

        let kept = suppress(candidates, self.config.iou_threshold);
        tracing::debug!(detections = kept.len(), "Frame processed");

        let detections = kept
            .into_iter()
            .map(|c| Detection {
                class_name: self.labels.name(c.class_index).to_string(),
                bbox: c.bbox,
                confidence: c.confidence,
                class_index: c.class_index,
            })
            .collect();

        Ok(DetectionOutcome {
            detections,
            inference_error: None,
        })
    }

    /// Release the backend. Consuming `self` makes "no detect after close"
    /// a compile-time guarantee.
    pub fn close(self) {
        tracing::info!("Detection engine closed");
        drop(self.backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::config::DetectorConfig;

    fn small_config() -> DetectorConfig {
        let mut config = DetectorConfig::test_default();
        config.input_size = 64;
        config.num_candidates = 64;
        config
    }

    /// The mock backend flows end to end into labeled detections.
    #[test]
    fn test_detect_end_to_end_with_mock() {
        let config = small_config();
        let backend = MockBackend::new(config.num_classes, config.num_candidates);
        let mut engine =
            DetectionEngine::new(backend, config, ClassLabels::default()).unwrap();

        let image = RgbImage::from_pixel(640, 480, image::Rgb([30, 60, 90]));
        let outcome = engine.detect(&image).unwrap();

        assert!(!outcome.is_degraded());
        assert_eq!(outcome.detections.len(), 3, "Mock emits three detections");
        assert_eq!(outcome.detections[0].class_name, "Bujang_Senang_Statue");
        for pair in outcome.detections.windows(2) {
            assert!(
                pair[0].confidence >= pair[1].confidence,
                "Detections come back sorted by confidence"
            );
        }
        for det in &outcome.detections {
            assert!(det.bbox.left < det.bbox.right);
            assert!(det.bbox.top < det.bbox.bottom);
            assert!(det.bbox.left >= 0.0 && det.bbox.right <= 1.0);
        }
        engine.close();
    }

    /// A backend whose declared shape contradicts the layout is rejected at
    /// construction.
    #[test]
    fn test_new_rejects_mismatched_backend() {
        let config = small_config();
        // Mock sized for a different candidate count than the config expects
        let backend = MockBackend::new(config.num_classes, 128);

        let result = DetectionEngine::new(backend, config, ClassLabels::default());
        assert!(matches!(result, Err(DetectorError::LayoutMismatch { .. })));
    }

    /// An empty input image aborts the call with InvalidImage.
    #[test]
    fn test_detect_rejects_empty_image() {
        let config = small_config();
        let backend = MockBackend::new(config.num_classes, config.num_candidates);
        let mut engine =
            DetectionEngine::new(backend, config, ClassLabels::default()).unwrap();

        let image = RgbImage::new(0, 0);
        let result = engine.detect(&image);
        assert!(matches!(result, Err(DetectorError::InvalidImage { .. })));
    }
}
