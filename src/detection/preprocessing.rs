use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::filter::separable_filter_equal;

use super::canny::canny;
use crate::error::{DetectionError, Result};

const BINOMIAL_3: [f32; 3] = [0.25, 0.5, 0.25];
const BINOMIAL_5: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];
const BINOMIAL_7: [f32; 7] = [
    0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
];

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// 1D Gaussian kernel of odd length `size`.
///
/// With a non-positive `sigma`, sizes 1, 3, 5 and 7 use the fixed binomial
/// taps (5 gives `[1, 4, 6, 4, 1] / 16`) and larger sizes derive sigma as
/// `0.3 * ((size - 1) / 2 - 1) + 0.8`.
pub fn gaussian_kernel(size: usize, sigma: f32) -> Result<Vec<f32>> {
    if size % 2 == 0 {
        return Err(DetectionError::InvalidParams(format!(
            "blur kernel size must be odd, got {}",
            size
        )));
    }
    if !sigma.is_finite() {
        return Err(DetectionError::InvalidParams(format!(
            "blur sigma must be finite, got {}",
            sigma
        )));
    }

    if sigma <= 0.0 {
        match size {
            1 => return Ok(vec![1.0]),
            3 => return Ok(BINOMIAL_3.to_vec()),
            5 => return Ok(BINOMIAL_5.to_vec()),
            7 => return Ok(BINOMIAL_7.to_vec()),
            _ => {}
        }
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size - 1) as f32 * 0.5 - 1.0) + 0.8
    };
    let center = (size / 2) as f32;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - center;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    Ok(kernel)
}

/// Separable blur with a 1D kernel applied along both axes. Borders are
/// padded by continuity and each pass truncates to u8.
pub fn apply_blur(img: &GrayImage, kernel: &[f32]) -> GrayImage {
    separable_filter_equal(img, kernel)
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> Result<GrayImage> {
    if !low_threshold.is_finite() || !high_threshold.is_finite() {
        return Err(DetectionError::InvalidParams(format!(
            "edge thresholds must be finite, got {} and {}",
            low_threshold, high_threshold
        )));
    }
    if low_threshold < 0.0 || low_threshold > high_threshold {
        return Err(DetectionError::InvalidParams(format!(
            "edge thresholds need 0 <= low <= high, got {} and {}",
            low_threshold, high_threshold
        )));
    }
    Ok(canny(img, low_threshold, high_threshold))
}

/// Global binarization at Otsu's level. Pixels strictly above the level
/// become 255, everything else 0.
pub fn binarize_otsu(img: &GrayImage) -> GrayImage {
    let level = otsu_level(img);
    tracing::debug!("otsu level {}", level);

    let mut binary = img.clone();
    for p in binary.pixels_mut() {
        *p = if p.0[0] > level { Luma([255]) } else { Luma([0]) };
    }
    binary
}

/// `contrast * p + brightness`, rounded and clamped to [0, 255]
pub fn adjust_contrast(img: &GrayImage, contrast: f32, brightness: f32) -> GrayImage {
    let mut adjusted = img.clone();
    for p in adjusted.pixels_mut() {
        let value = (p.0[0] as f32 * contrast + brightness).round();
        p.0[0] = value.clamp(0.0, 255.0) as u8;
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_tap_kernel_is_binomial() {
        let kernel = gaussian_kernel(5, 0.0).unwrap();
        assert_eq!(kernel, BINOMIAL_5.to_vec());
        assert_eq!(kernel.iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn computed_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(9, 0.0).unwrap();
        assert_eq!(kernel.len(), 9);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        for i in 0..4 {
            assert!((kernel[i] - kernel[8 - i]).abs() < 1e-6);
        }
        assert!(kernel[4] > kernel[3]);
    }

    #[test]
    fn even_kernel_size_is_rejected() {
        assert!(matches!(
            gaussian_kernel(4, 0.0),
            Err(DetectionError::InvalidParams(_))
        ));
    }

    #[test]
    fn blur_keeps_flat_image_and_smooths_step() {
        let kernel = gaussian_kernel(5, 0.0).unwrap();
        let flat = GrayImage::from_pixel(12, 12, Luma([60]));
        assert_eq!(apply_blur(&flat, &kernel), flat);

        let step = GrayImage::from_fn(12, 12, |x, _| Luma([if x < 6 { 0 } else { 160 }]));
        let blurred = apply_blur(&step, &kernel);
        // 160 * (0.25 + 0.0625) and 160 * (0.375 + 0.25 + 0.0625)
        assert_eq!(blurred.get_pixel(5, 6).0[0], 50);
        assert_eq!(blurred.get_pixel(6, 6).0[0], 110);
    }

    #[test]
    fn inverted_edge_thresholds_are_rejected() {
        let img = GrayImage::new(8, 8);
        assert!(matches!(
            detect_edges(&img, 100.0, 50.0),
            Err(DetectionError::InvalidParams(_))
        ));
        assert!(matches!(
            detect_edges(&img, f32::NAN, 50.0),
            Err(DetectionError::InvalidParams(_))
        ));
        assert!(detect_edges(&img, 50.0, 50.0).is_ok());
    }

    #[test]
    fn contrast_doubles_and_saturates() {
        let img = GrayImage::from_raw(3, 1, vec![10, 100, 200]).unwrap();
        let out = adjust_contrast(&img, 2.0, 0.0);
        assert_eq!(out.into_raw(), vec![20, 200, 255]);
    }

    #[test]
    fn otsu_separates_bright_square() {
        let mut img = GrayImage::from_pixel(20, 20, Luma([30]));
        for y in 5..15 {
            for x in 5..15 {
                img.put_pixel(x, y, Luma([220]));
            }
        }
        let binary = binarize_otsu(&img);
        assert_eq!(binary.get_pixel(10, 10).0[0], 255);
        assert_eq!(binary.get_pixel(0, 0).0[0], 0);
    }
}
