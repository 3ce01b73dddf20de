use super::InferenceBackend;
use ndarray::{Array, ArrayD, IxDyn};
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};

const INPUT_NAME: &str = "images";
const OUTPUT_NAME: &str = "output0";

/// ONNX Runtime backend, CPU execution.
pub struct OrtBackend {
    session: Session,
}

impl OrtBackend {
    pub fn load_model(path: &str) -> anyhow::Result<Self> {
        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(path)?;

        tracing::info!("Model loaded from {}", path);
        Ok(Self { session })
    }
}

impl InferenceBackend for OrtBackend {
    fn infer(&mut self, input: &Array<f32, IxDyn>) -> anyhow::Result<ArrayD<f32>> {
        let outputs = self.session.run(ort::inputs![
            INPUT_NAME => TensorRef::from_array_view(input.view())?
        ])?;

        let value = outputs
            .get(OUTPUT_NAME)
            .ok_or_else(|| anyhow::anyhow!("model output '{OUTPUT_NAME}' not found"))?;
        let tensor: ndarray::ArrayViewD<f32> = value.try_extract_array()?;

        Ok(tensor.into_owned())
    }
}
