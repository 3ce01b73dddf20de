use super::InferenceBackend;
use ndarray::{Array, ArrayD, IxDyn};

/// Backend that ignores its input and emits a fixed channel-major tensor
/// holding three synthetic detections in a diagonal band. Used for UI and
/// pipeline work without a model file, and selected only by explicit
/// configuration.
pub struct MockBackend {
    num_classes: usize,
    num_candidates: usize,
}

impl MockBackend {
    pub fn new(num_classes: usize, num_candidates: usize) -> Self {
        Self {
            num_classes,
            num_candidates,
        }
    }
}

impl InferenceBackend for MockBackend {
    fn infer(&mut self, _input: &Array<f32, IxDyn>) -> anyhow::Result<ArrayD<f32>> {
        let attrs = 4 + self.num_classes;
        let mut data = vec![0.0f32; attrs * self.num_candidates];

        for i in 0..3usize.min(self.num_candidates) {
            let left = 0.2 + i as f32 * 0.2;
            let top = 0.2 + i as f32 * 0.15;
            let size = 0.2;

            data[i] = left + size / 2.0; // cx
            data[self.num_candidates + i] = top + size / 2.0; // cy
            data[2 * self.num_candidates + i] = size; // w
            data[3 * self.num_candidates + i] = size; // h
            let class = i % self.num_classes;
            data[(4 + class) * self.num_candidates + i] = 0.9 - i as f32 * 0.1;
        }

        Ok(Array::from_shape_vec(
            IxDyn(&[1, attrs, self.num_candidates]),
            data,
        )?)
    }

    fn output_shape(&self) -> Option<Vec<usize>> {
        Some(vec![1, 4 + self.num_classes, self.num_candidates])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_output_matches_declared_shape() {
        let mut backend = MockBackend::new(10, 64);
        let input = Array::from_shape_vec(IxDyn(&[1, 8, 8, 3]), vec![0.0; 192]).unwrap();

        let output = backend.infer(&input).unwrap();
        assert_eq!(
            Some(output.shape().to_vec()),
            backend.output_shape(),
            "Declared and produced shapes must agree"
        );
    }

    #[test]
    fn test_mock_emits_three_decodable_candidates() {
        use crate::decoding::{OutputLayout, decode};

        let mut backend = MockBackend::new(10, 64);
        let input = Array::from_shape_vec(IxDyn(&[1, 8, 8, 3]), vec![0.0; 192]).unwrap();

        let output = backend.infer(&input).unwrap();
        let layout = OutputLayout::ChannelMajor { num_candidates: 64 };
        let candidates = decode(&output.view(), layout, 10, 0.5, 512, 512).unwrap();

        assert_eq!(candidates.len(), 3, "Three synthetic detections");
        assert!((candidates[0].confidence - 0.9).abs() < 1e-6);
        assert_eq!(candidates[0].class_index, 0);
        assert_eq!(candidates[2].class_index, 2);
    }
}
