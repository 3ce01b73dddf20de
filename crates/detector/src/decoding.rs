use crate::error::DetectorError;
use ndarray::{ArrayViewD, Axis};

/// Box corners in normalized [0,1] image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        (self.right - self.left) * (self.bottom - self.top)
    }
}

/// A raw detection proposal, before non-maximum suppression.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub class_index: usize,
}

/// How the raw output tensor is laid out. Chosen by configuration and
/// validated against the actual tensor shape before decoding; a mismatch is
/// a fatal configuration error, never guessed around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLayout {
    /// `[4 + num_classes][num_candidates]`: cx, cy, w, h rows followed by one
    /// score row per class. Optionally carries a leading batch dimension of 1.
    ChannelMajor { num_candidates: usize },
    /// `[num_anchors][grid_height][grid_width]`, one scalar per cell. Each
    /// candidate record is read at a computed element offset into the flat
    /// buffer: confidence, cx, cy, w, h, then class scores.
    DenseGrid {
        num_anchors: usize,
        grid_height: usize,
        grid_width: usize,
    },
}

impl OutputLayout {
    /// The tensor shape this layout expects, including the batch dimension.
    pub fn expected_shape(&self, num_classes: usize) -> Vec<usize> {
        match *self {
            OutputLayout::ChannelMajor { num_candidates } => {
                vec![1, 4 + num_classes, num_candidates]
            }
            OutputLayout::DenseGrid {
                num_anchors,
                grid_height,
                grid_width,
            } => vec![1, num_anchors, grid_height, grid_width],
        }
    }

    /// Check a tensor shape against this layout. The leading batch dimension
    /// is optional.
    pub fn validate(&self, shape: &[usize], num_classes: usize) -> Result<(), DetectorError> {
        let expected = self.expected_shape(num_classes);
        let matches = shape == expected.as_slice() || shape == &expected[1..];
        if matches {
            Ok(())
        } else {
            Err(DetectorError::LayoutMismatch {
                expected,
                actual: shape.to_vec(),
            })
        }
    }
}

/// Decode a raw output tensor into unsuppressed candidates.
///
/// The confidence comparison is strict: a candidate exactly at the threshold
/// is rejected. `image_width`/`image_height` are only consulted by the
/// dense-grid layout, which computes pixel-space corners before normalizing.
pub fn decode(
    output: &ArrayViewD<f32>,
    layout: OutputLayout,
    num_classes: usize,
    confidence_threshold: f32,
    image_width: u32,
    image_height: u32,
) -> Result<Vec<Candidate>, DetectorError> {
    layout.validate(output.shape(), num_classes)?;

    match layout {
        OutputLayout::ChannelMajor { num_candidates } => {
            decode_channel_major(output, num_candidates, num_classes, confidence_threshold)
        }
        OutputLayout::DenseGrid {
            num_anchors,
            grid_height,
            grid_width,
        } => decode_dense_grid(
            output,
            num_anchors,
            grid_height,
            grid_width,
            num_classes,
            confidence_threshold,
            image_width,
            image_height,
        ),
    }
}

fn decode_channel_major(
    output: &ArrayViewD<f32>,
    num_candidates: usize,
    num_classes: usize,
    confidence_threshold: f32,
) -> Result<Vec<Candidate>, DetectorError> {
    let view = if output.ndim() == 3 {
        output.index_axis(Axis(0), 0)
    } else {
        output.view()
    };

    let mut candidates = Vec::new();

    for i in 0..num_candidates {
        let cx = view[[0, i]];
        let cy = view[[1, i]];
        let w = view[[2, i]];
        let h = view[[3, i]];

        // Degenerate geometry, skip before touching the score rows
        if w <= 0.0 || h <= 0.0 {
            continue;
        }

        // Argmax over class scores; strict > keeps the lowest index on ties
        let mut max_score = f32::NEG_INFINITY;
        let mut class_index = 0usize;
        for class in 0..num_classes {
            let score = view[[4 + class, i]];
            if score > max_score {
                max_score = score;
                class_index = class;
            }
        }

        if max_score <= confidence_threshold {
            continue;
        }

        let bbox = BoundingBox {
            left: (cx - w / 2.0).clamp(0.0, 1.0),
            top: (cy - h / 2.0).clamp(0.0, 1.0),
            right: (cx + w / 2.0).clamp(0.0, 1.0),
            bottom: (cy + h / 2.0).clamp(0.0, 1.0),
        };
        // Clamping against the unit square can collapse a box at the edge
        if bbox.right <= bbox.left || bbox.bottom <= bbox.top {
            continue;
        }

        candidates.push(Candidate {
            bbox,
            confidence: max_score,
            class_index,
        });
    }

    Ok(candidates)
}

#[allow(clippy::too_many_arguments)]
fn decode_dense_grid(
    output: &ArrayViewD<f32>,
    num_anchors: usize,
    grid_height: usize,
    grid_width: usize,
    num_classes: usize,
    confidence_threshold: f32,
    image_width: u32,
    image_height: u32,
) -> Result<Vec<Candidate>, DetectorError> {
    let buf = output
        .as_slice()
        .ok_or(DetectorError::NonStandardLayout)?;

    let width = image_width as f32;
    let height = image_height as f32;
    let mut candidates = Vec::new();

    for anchor in 0..num_anchors {
        for y in 0..grid_height {
            for x in 0..grid_width {
                let offset = anchor * grid_height * grid_width + y * grid_width + x;

                // Confidence comes first; most cells are background, so skip
                // before reading the box and class fields.
                let confidence = buf[offset];
                if confidence <= confidence_threshold {
                    continue;
                }

                // Records that would run past the buffer end are skipped.
                let Some(record) = buf.get(offset + 1..offset + 5 + num_classes) else {
                    continue;
                };
                let (cx, cy, w, h) = (record[0], record[1], record[2], record[3]);

                let left = ((cx - w / 2.0) * width).max(0.0);
                let top = ((cy - h / 2.0) * height).max(0.0);
                let right = ((cx + w / 2.0) * width).min(width);
                let bottom = ((cy + h / 2.0) * height).min(height);
                if right <= left || bottom <= top {
                    continue;
                }

                let mut max_score = f32::NEG_INFINITY;
                let mut class_index = 0usize;
                for (class, &score) in record[4..4 + num_classes].iter().enumerate() {
                    if score > max_score {
                        max_score = score;
                        class_index = class;
                    }
                }

                candidates.push(Candidate {
                    bbox: BoundingBox {
                        left: left / width,
                        top: top / height,
                        right: right / width,
                        bottom: bottom / height,
                    },
                    confidence,
                    class_index,
                });
            }
        }
    }

    Ok(candidates)
}
