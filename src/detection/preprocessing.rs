use image::{DynamicImage, GrayImage};
use imageproc::contrast::{ThresholdType, threshold};

/// Convert image to grayscale.
///
/// Uses Rec. 709 luma weights, so saturated reds and blues land lower than
/// with Rec. 601 (0.299, 0.587, 0.114) and may fall under the threshold.
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Binary threshold: values above `cutoff` become 255, the rest 0
pub fn binarize(img: &GrayImage, cutoff: u8) -> GrayImage {
    threshold(img, cutoff, ThresholdType::Binary)
}
