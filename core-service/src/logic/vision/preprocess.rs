//! Image Preprocessing
//!
//! Bytes to the fixed input contract of the generic visual classifier:
//! RGB, shorter side resized to 256, center crop 224x224, ImageNet
//! mean/std normalization, NCHW layout.
//!
//! The crop is taken in source coordinates first and only that square is
//! resized, so work and memory stay bounded by the decoded image whatever
//! its aspect ratio.

use std::io::Cursor;

use image::{imageops, imageops::FilterType, ImageReader, Limits, RgbImage};
use ndarray::Array4;

use crate::logic::model::InferenceError;

/// Shorter side after the first resize
pub const RESIZE_SHORTER_SIDE: u32 = 256;

/// Side of the square center crop fed to the model
pub const CROP_SIZE: u32 = 224;

/// Largest accepted width or height of an upload
pub const MAX_IMAGE_SIDE: u32 = 16_384;

/// Decoder allocation cap
pub const MAX_DECODE_BYTES: u64 = 256 * 1024 * 1024;

/// ImageNet normalization mean values (RGB)
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet normalization std values (RGB)
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

fn decode_limits() -> Limits {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_IMAGE_SIDE);
    limits.max_image_height = Some(MAX_IMAGE_SIDE);
    limits.max_alloc = Some(MAX_DECODE_BYTES);
    limits
}

/// Decode any supported format and normalize to RGB
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, InferenceError> {
    if bytes.is_empty() {
        return Err(InferenceError::Decode("empty image".to_string()));
    }

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| InferenceError::Decode(e.to_string()))?;
    reader.limits(decode_limits());

    let rgb = reader.decode()?.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(InferenceError::Decode("image has zero size".to_string()));
    }
    Ok(rgb)
}

/// Centered square `(left, top, side)` in source pixels that ends up as the
/// `crop`-sized window after resizing the shorter side to `resize`
pub fn center_crop_region(
    width: u32,
    height: u32,
    resize: u32,
    crop: u32,
) -> Result<(u32, u32, u32), InferenceError> {
    let short = width.min(height);
    if short == 0 || resize == 0 {
        return Err(InferenceError::Decode("image has zero size".to_string()));
    }

    let side = (u64::from(short) * u64::from(crop.min(resize)) / u64::from(resize)).max(1);
    let side = u32::try_from(side)
        .map_err(|_| InferenceError::Decode(format!("crop side {} out of range", side)))?;

    Ok(((width - side) / 2, (height - side) / 2, side))
}

/// Crop the centered square and resize it to `CROP_SIZE`
pub fn crop_and_resize(image: &RgbImage) -> Result<RgbImage, InferenceError> {
    let (width, height) = image.dimensions();
    let (left, top, side) = center_crop_region(width, height, RESIZE_SHORTER_SIDE, CROP_SIZE)?;
    let square = imageops::crop_imm(image, left, top, side, side).to_image();
    Ok(imageops::resize(&square, CROP_SIZE, CROP_SIZE, FilterType::Triangle))
}

/// Normalized `[1, 3, H, W]` tensor
pub fn to_tensor(image: &RgbImage) -> Result<Array4<f32>, InferenceError> {
    let (width, height) = image.dimensions();
    let num_pixels = (width as usize) * (height as usize);

    let mut normalized = vec![0.0f32; 3 * num_pixels];
    for (i, pixel) in image.pixels().enumerate() {
        for c in 0..3 {
            normalized[c * num_pixels + i] =
                (pixel[c] as f32 / 255.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
        }
    }

    Ok(Array4::from_shape_vec(
        (1, 3, height as usize, width as usize),
        normalized,
    )?)
}

/// Full pipeline from raw upload bytes
pub fn preprocess(bytes: &[u8]) -> Result<Array4<f32>, InferenceError> {
    let rgb = decode_rgb(bytes)?;
    let cropped = crop_and_resize(&rgb)?;
    to_tensor(&cropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb};

    fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb(color));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_center_crop_region() {
        // 512x256 -> 512x256 after resize; 224 window = 224 source px
        assert_eq!(center_crop_region(512, 256, 256, 224).unwrap(), (144, 16, 224));
        // 640x480 -> shorter side scales by 256/480; window = 420 source px
        assert_eq!(center_crop_region(640, 480, 256, 224).unwrap(), (110, 30, 420));
        // Tiny images keep at least one pixel
        assert_eq!(center_crop_region(1, 1, 256, 224).unwrap(), (0, 0, 1));
        assert!(center_crop_region(0, 10, 256, 224).is_err());
    }

    #[test]
    fn test_preprocess_output_shape() {
        let bytes = png_bytes(640, 480, [120, 200, 40]);
        let tensor = preprocess(&bytes).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);

        let small = png_bytes(10, 6, [1, 2, 3]);
        assert_eq!(preprocess(&small).unwrap().shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_elongated_image_stays_bounded() {
        // Within the side limit: cropped in source coordinates, no huge resize
        let strip = png_bytes(2, 16_000, [10, 120, 10]);
        let tensor = preprocess(&strip).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_oversized_side_rejected() {
        let strip = png_bytes(1, MAX_IMAGE_SIDE + 1, [10, 120, 10]);
        assert!(matches!(preprocess(&strip), Err(InferenceError::Decode(_))));
    }

    #[test]
    fn test_normalization_values() {
        let image = RgbImage::from_pixel(2, 2, Rgb([255, 0, 128]));
        let tensor = to_tensor(&image).unwrap();
        let r = (1.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0];
        let g = (0.0 - IMAGENET_MEAN[1]) / IMAGENET_STD[1];
        assert!((tensor[[0, 0, 1, 1]] - r).abs() < 1e-5);
        assert!((tensor[[0, 1, 0, 0]] - g).abs() < 1e-5);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_rgb(b"not an image"), Err(InferenceError::Decode(_))));
        assert!(matches!(decode_rgb(&[]), Err(InferenceError::Decode(_))));
    }
}
