use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("invalid input image: {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    #[error("output tensor shape {actual:?} does not match configured layout (expected {expected:?})")]
    LayoutMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("output tensor is not in standard memory layout")]
    NonStandardLayout,

    #[error("preprocessing failed: {0}")]
    Preprocess(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formatting() {
        let err = DetectorError::InvalidImage {
            width: 0,
            height: 480,
        };
        assert_eq!(
            err.to_string(),
            "invalid input image: 0x480",
            "InvalidImage should include both dimensions"
        );

        let err = DetectorError::LayoutMismatch {
            expected: vec![1, 14, 5376],
            actual: vec![1, 3, 512, 512],
        };
        assert!(
            err.to_string().contains("[1, 14, 5376]"),
            "LayoutMismatch should report the expected shape"
        );
        assert!(
            err.to_string().contains("[1, 3, 512, 512]"),
            "LayoutMismatch should report the actual shape"
        );

        let err = DetectorError::Preprocess("resize failed".to_string());
        assert_eq!(err.to_string(), "preprocessing failed: resize failed");
    }
}
