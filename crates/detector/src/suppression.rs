use crate::decoding::{BoundingBox, Candidate};

/// Intersection-over-union of two boxes.
///
/// A zero total area cannot occur for boxes that passed decoding, which
/// rejects degenerate geometry; the guard below is an invariant check.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let left = a.left.max(b.left);
    let top = a.top.max(b.top);
    let right = a.right.min(b.right);
    let bottom = a.bottom.min(b.bottom);

    let intersection = (right - left).max(0.0) * (bottom - top).max(0.0);
    let union = a.area() + b.area() - intersection;

    debug_assert!(union > 0.0, "IoU over two zero-area boxes");
    if union <= 0.0 {
        return 0.0;
    }
    intersection / union
}

/// Greedy non-maximum suppression.
///
/// Candidates are stable-sorted by descending confidence (ties keep their
/// original relative order); a candidate is dropped when it overlaps any
/// already accepted candidate beyond `iou_threshold`, regardless of class.
/// The returned list stays in descending-confidence order.
pub fn suppress(mut candidates: Vec<Candidate>, iou_threshold: f32) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut accepted: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        let overlaps = accepted
            .iter()
            .any(|kept| iou(&kept.bbox, &candidate.bbox) > iou_threshold);
        if !overlaps {
            accepted.push(candidate);
        }
    }

    accepted
}
