pub mod backend;
pub mod config;
pub mod decoding;
pub mod engine;
pub mod error;
pub mod labels;
pub mod logging;
pub mod preprocessing;
pub mod suppression;

// Re-export commonly used types for convenience
pub use backend::InferenceBackend;
pub use config::DetectorConfig;
pub use decoding::{BoundingBox, Candidate, OutputLayout};
pub use engine::{Detection, DetectionEngine, DetectionOutcome};
pub use error::DetectorError;
pub use labels::ClassLabels;
pub use preprocessing::{LetterboxResult, letterbox, to_input_tensor};
pub use suppression::suppress;
