use crate::error::DetectorError;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::RgbImage;
use ndarray::{Array, IxDyn};

/// Result of the letterbox transform: a square RGB canvas holding the
/// aspect-preserving resize of the source image, plus the geometry needed
/// to map detector-space coordinates back to the source image.
#[derive(Debug, Clone)]
pub struct LetterboxResult {
    /// `target_size * target_size * 3` interleaved RGB bytes.
    pub image: Vec<u8>,
    pub target_size: u32,
    /// `min(target_size / src_width, target_size / src_height)`.
    pub scale: f32,
    /// Horizontal padding on each side of the pasted image, in pixels.
    pub pad_x: f32,
    /// Vertical padding on each side of the pasted image, in pixels.
    pub pad_y: f32,
}

/// Resize `image` into a `target_size` x `target_size` black canvas,
/// preserving aspect ratio and centering the resized content.
pub fn letterbox(image: &RgbImage, target_size: u32) -> Result<LetterboxResult, DetectorError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || target_size == 0 {
        return Err(DetectorError::InvalidImage { width, height });
    }

    let scale = (target_size as f32 / width as f32).min(target_size as f32 / height as f32);
    let new_width = ((width as f32 * scale).round() as u32).max(1);
    let new_height = ((height as f32 * scale).round() as u32).max(1);

    // fast_image_resize wants a mutable source buffer
    let mut src_pixels = image.as_raw().clone();
    let src = Image::from_slice_u8(width, height, &mut src_pixels, PixelType::U8x3)
        .map_err(|e| DetectorError::Preprocess(e.to_string()))?;

    let mut resized = Image::new(new_width, new_height, PixelType::U8x3);
    Resizer::new()
        .resize(
            &src,
            &mut resized,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        )
        .map_err(|e| DetectorError::Preprocess(e.to_string()))?;

    // Black canvas; the pasted region is centered with integer pixel offsets.
    let mut canvas = vec![0u8; (target_size * target_size * 3) as usize];
    let offset_x = (target_size - new_width) / 2;
    let offset_y = (target_size - new_height) / 2;

    let resized_data = resized.buffer();
    let stride = target_size * 3;
    for y in 0..new_height {
        let src_row = (y * new_width * 3) as usize;
        let dst_row = ((y + offset_y) * stride + offset_x * 3) as usize;
        canvas[dst_row..dst_row + (new_width * 3) as usize]
            .copy_from_slice(&resized_data[src_row..src_row + (new_width * 3) as usize]);
    }

    Ok(LetterboxResult {
        image: canvas,
        target_size,
        scale,
        pad_x: (target_size - new_width) as f32 / 2.0,
        pad_y: (target_size - new_height) as f32 / 2.0,
    })
}

/// Convert a letterboxed canvas into the `[1, S, S, 3]` f32 input tensor the
/// inference backend expects: channel order R,G,B, values scaled to [0, 1].
pub fn to_input_tensor(letterboxed: &LetterboxResult) -> Result<Array<f32, IxDyn>, DetectorError> {
    let size = letterboxed.target_size as usize;
    let data: Vec<f32> = letterboxed.image.iter().map(|&v| v as f32 / 255.0).collect();

    Array::from_shape_vec(IxDyn(&[1, size, size, 3]), data)
        .map_err(|e| DetectorError::Preprocess(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, image::Rgb(rgb))
    }

    /// Letterboxing a wide image pads vertically only.
    #[test]
    fn test_letterbox_wide_image_geometry() {
        let img = solid_image(1000, 500, [200, 100, 50]);
        let result = letterbox(&img, 512).unwrap();

        assert_eq!(result.scale, 0.512, "Scale should be min(512/1000, 512/500)");
        assert_eq!(result.pad_x, 0.0, "Wide image needs no horizontal padding");
        assert_eq!(result.pad_y, 128.0, "512x256 content leaves 128px top and bottom");
        assert_eq!(
            result.image.len(),
            512 * 512 * 3,
            "Canvas should always be target_size squared"
        );
    }

    /// The non-padded region keeps the source aspect ratio within rounding tolerance.
    #[test]
    fn test_letterbox_preserves_aspect_ratio() {
        let img = solid_image(800, 600, [10, 20, 30]);
        let result = letterbox(&img, 512).unwrap();

        assert_eq!(result.scale, 0.64);
        assert_eq!(result.pad_x, 0.0);
        assert_eq!(result.pad_y, 64.0);

        let new_width = 512.0 - 2.0 * result.pad_x;
        let new_height = 512.0 - 2.0 * result.pad_y;
        let src_ratio = 800.0 / 600.0;
        let content_ratio = new_width / new_height;
        assert!(
            (src_ratio - content_ratio).abs() < 0.01,
            "Content aspect ratio {} should match source {}",
            content_ratio,
            src_ratio
        );
    }

    /// A square image fills the whole canvas with no padding.
    #[test]
    fn test_letterbox_square_image_no_padding() {
        let img = solid_image(640, 640, [255, 255, 255]);
        let result = letterbox(&img, 512).unwrap();

        assert_eq!(result.pad_x, 0.0);
        assert_eq!(result.pad_y, 0.0);
        // No black padding pixels should remain
        assert!(
            result.image.iter().all(|&v| v == 255),
            "Square input should cover the entire canvas"
        );
    }

    /// Padding rows are black (0,0,0).
    #[test]
    fn test_letterbox_padding_is_black() {
        let img = solid_image(1000, 500, [255, 255, 255]);
        let result = letterbox(&img, 512).unwrap();

        // First row lies entirely in the vertical padding band
        assert!(
            result.image[..512 * 3].iter().all(|&v| v == 0),
            "Top padding should be black"
        );
        // Center row lies entirely in the pasted content
        let center = 256 * 512 * 3;
        assert!(
            result.image[center..center + 512 * 3].iter().all(|&v| v == 255),
            "Center row should be source content"
        );
    }

    /// Zero-dimension input fails with InvalidImage.
    #[test]
    fn test_letterbox_rejects_empty_image() {
        let img = RgbImage::new(0, 0);
        let result = letterbox(&img, 512);
        assert!(matches!(
            result,
            Err(DetectorError::InvalidImage {
                width: 0,
                height: 0
            })
        ));
    }

    /// Input tensor has NHWC shape and values divided by 255.
    #[test]
    fn test_input_tensor_shape_and_scaling() {
        let img = solid_image(512, 512, [255, 0, 51]);
        let result = letterbox(&img, 512).unwrap();
        let tensor = to_input_tensor(&result).unwrap();

        assert_eq!(tensor.shape(), &[1, 512, 512, 3]);
        assert_eq!(tensor[[0, 0, 0, 0]], 1.0, "R channel of 255 maps to 1.0");
        assert_eq!(tensor[[0, 0, 0, 1]], 0.0, "G channel of 0 maps to 0.0");
        assert!(
            (tensor[[0, 0, 0, 2]] - 0.2).abs() < 1e-6,
            "B channel of 51 maps to 0.2"
        );
    }
}
