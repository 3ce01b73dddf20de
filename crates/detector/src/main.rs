use detector::{
    ClassLabels, DetectionEngine, DetectorConfig,
    backend::{self, InferenceBackend},
    logging::setup_logging,
};

fn main() -> anyhow::Result<()> {
    let config = DetectorConfig::from_env()?;

    setup_logging(&config);

    tracing::info!(
        config = ?config,
        "Loaded configuration"
    );

    let image_path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: detector <image-file>"))?;

    let labels = match &config.labels_path {
        Some(path) => ClassLabels::from_file(path)?,
        None => ClassLabels::default(),
    };

    let backend: Box<dyn InferenceBackend> = backend::create_backend(&config)?;
    let mut engine = DetectionEngine::new(backend, config, labels)?;

    tracing::info!(path = %image_path, "Loading image");
    let image = image::open(&image_path)?.to_rgb8();

    let outcome = engine.detect(&image)?;

    if let Some(error) = &outcome.inference_error {
        tracing::warn!(error = %error, "Frame degraded: inference failed");
    }
    for detection in &outcome.detections {
        tracing::info!(
            class = %detection.class_name,
            confidence = detection.confidence,
            left = detection.bbox.left,
            top = detection.bbox.top,
            right = detection.bbox.right,
            bottom = detection.bbox.bottom,
            "Detection"
        );
    }
    tracing::info!(count = outcome.detections.len(), "Done");

    engine.close();
    Ok(())
}
