use crate::config::{BackendKind, DetectorConfig};
use ndarray::{Array, ArrayD, IxDyn};

pub mod mock;

#[cfg(feature = "ort-backend")]
pub mod ort;

/// A loaded model behind a synchronous inference call.
///
/// Object-safe so backends can be selected at runtime; loading stays on the
/// concrete types. Releasing the model handle is tied to ownership: dropping
/// the backend closes it, and nothing can call `infer` afterwards.
pub trait InferenceBackend {
    /// Run inference on one preprocessed input tensor and return the raw
    /// output tensor.
    fn infer(&mut self, input: &Array<f32, IxDyn>) -> anyhow::Result<ArrayD<f32>>;

    /// The output tensor shape this backend will produce, when it is known
    /// before the first call. Used to fail fast on a model/decoder mismatch.
    fn output_shape(&self) -> Option<Vec<usize>> {
        None
    }
}

impl<B: InferenceBackend + ?Sized> InferenceBackend for Box<B> {
    fn infer(&mut self, input: &Array<f32, IxDyn>) -> anyhow::Result<ArrayD<f32>> {
        (**self).infer(input)
    }

    fn output_shape(&self) -> Option<Vec<usize>> {
        (**self).output_shape()
    }
}

/// Build the backend the configuration asks for.
///
/// Falling back to the mock backend on a load failure is an explicit,
/// logged policy (`fallback_to_mock`), never a silent default.
pub fn create_backend(config: &DetectorConfig) -> anyhow::Result<Box<dyn InferenceBackend>> {
    match config.backend {
        BackendKind::Mock => {
            tracing::info!("Using mock inference backend");
            Ok(Box::new(mock::MockBackend::new(
                config.num_classes,
                config.num_candidates,
            )))
        }
        BackendKind::Onnx => create_onnx_backend(config),
    }
}

#[cfg(feature = "ort-backend")]
fn create_onnx_backend(config: &DetectorConfig) -> anyhow::Result<Box<dyn InferenceBackend>> {
    match ort::OrtBackend::load_model(&config.model_path) {
        Ok(backend) => Ok(Box::new(backend)),
        Err(e) if config.fallback_to_mock => {
            tracing::warn!(
                error = %e,
                model_path = %config.model_path,
                "ONNX backend failed to load, falling back to mock backend"
            );
            Ok(Box::new(mock::MockBackend::new(
                config.num_classes,
                config.num_candidates,
            )))
        }
        Err(e) => Err(e),
    }
}

#[cfg(not(feature = "ort-backend"))]
fn create_onnx_backend(config: &DetectorConfig) -> anyhow::Result<Box<dyn InferenceBackend>> {
    if config.fallback_to_mock {
        tracing::warn!(
            "Built without the ort-backend feature, falling back to mock backend"
        );
        Ok(Box::new(mock::MockBackend::new(
            config.num_classes,
            config.num_candidates,
        )))
    } else {
        anyhow::bail!("ONNX backend requested but built without the ort-backend feature")
    }
}
