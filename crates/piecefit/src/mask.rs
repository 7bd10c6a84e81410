//! Binary mask construction and cleanup.
//!
//! Masks are `GrayImage`s holding only 0 (background) and 255 (foreground).
//! Every function here returns a new buffer; inputs are never modified.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::morphology::{grayscale_dilate, Mask};

use crate::geometry::Rect;

/// Pixel value for "on" mask pixels.
pub const MASK_ON: u8 = 255;
/// Gray level above which a resampled mask pixel counts as on.
pub const MASK_MIDPOINT: u8 = 127;

/// Dark-pixel mask: 255 where every channel is strictly below `threshold`.
///
/// Silhouettes in both puzzle images are drawn in near-black, so this picks
/// the holes out of the background and the pieces out of the sprite sheet.
pub fn binarize(image: &RgbImage, threshold: u8) -> GrayImage {
    let (w, h) = image.dimensions();
    let mut out = GrayImage::new(w, h);
    for (src, dst) in image.pixels().zip(out.pixels_mut()) {
        let [r, g, b] = src.0;
        if r < threshold && g < threshold && b < threshold {
            *dst = Luma([MASK_ON]);
        }
    }
    out
}

/// Morphological dilation with a 2×2 rectangular kernel anchored at its
/// bottom-right cell: each output pixel is the maximum of itself and its
/// left, upper and upper-left neighbours.
pub fn dilate_2x2(mask: &GrayImage) -> GrayImage {
    let kernel = Mask::from_image(&GrayImage::from_pixel(2, 2, Luma([MASK_ON])), 1, 1);
    grayscale_dilate(mask, &kernel)
}

/// Mask cleanup applied before region extraction.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreconditionParams {
    /// Downsampling factor for the smoothing pass. Values `<= 1` skip the
    /// resampling steps; dilation still runs.
    pub factor: u32,
    /// Gray level a resampled pixel must exceed to stay on.
    pub rebinarize_threshold: u8,
}

impl PreconditionParams {
    /// Settings tuned for the background image (speckle removal at 1/4 size).
    pub fn background() -> Self {
        Self {
            factor: 4,
            rebinarize_threshold: MASK_MIDPOINT,
        }
    }

    /// Settings tuned for the sprite sheet (dilation only).
    pub fn sprite() -> Self {
        Self {
            factor: 1,
            rebinarize_threshold: MASK_MIDPOINT,
        }
    }
}

impl Default for PreconditionParams {
    fn default() -> Self {
        Self::background()
    }
}

/// Dilate, area-downsample, re-threshold and nearest-upsample a mask.
///
/// Closes one-pixel gaps along silhouette outlines and drops specks smaller
/// than roughly `factor × factor` pixels. Output has the input's size.
pub fn precondition(mask: &GrayImage, params: &PreconditionParams) -> GrayImage {
    let dilated = dilate_2x2(mask);
    if params.factor <= 1 {
        return dilated;
    }
    let (w, h) = dilated.dimensions();
    let small_w = (w / params.factor).max(1);
    let small_h = (h / params.factor).max(1);
    // Box-filtered shrink, the area-averaging counterpart of the upsample below.
    let small = imageops::thumbnail(&dilated, small_w, small_h);
    let small = threshold(&small, params.rebinarize_threshold, ThresholdType::Binary);
    imageops::resize(&small, w, h, FilterType::Nearest)
}

/// Copy of `rect` out of `image`, clipped to the image bounds.
pub fn crop(image: &GrayImage, rect: &Rect) -> GrayImage {
    let x = rect.x.min(image.width());
    let y = rect.y.min(image.height());
    let w = rect.width.min(image.width() - x);
    let h = rect.height.min(image.height() - y);
    imageops::crop_imm(image, x, y, w, h).to_image()
}

/// Nearest-neighbour rescale of a colour image by a uniform factor.
///
/// Output size is `floor(w * factor) × floor(h * factor)`, at least 1 px.
pub fn upscale_nearest(image: &RgbImage, factor: f64) -> RgbImage {
    let w = ((image.width() as f64 * factor).floor() as u32).max(1);
    let h = ((image.height() as f64 * factor).floor() as u32).max(1);
    if (w, h) == image.dimensions() {
        return image.clone();
    }
    imageops::resize(image, w, h, FilterType::Nearest)
}

/// Shrink `mask` so that neither side exceeds the given limits.
///
/// Only oversized dimensions change; aspect ratio is not preserved.
pub fn fit_within(mask: &GrayImage, max_w: u32, max_h: u32) -> GrayImage {
    let (w, h) = mask.dimensions();
    let nw = w.min(max_w).max(1);
    let nh = h.min(max_h).max(1);
    if (nw, nh) == (w, h) {
        return mask.clone();
    }
    imageops::resize(mask, nw, nh, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{count_on, fill_rect_gray, fill_rect_rgb};
    use image::Rgb;

    #[test]
    fn binarize_requires_every_channel_dark() {
        let mut img = RgbImage::from_pixel(4, 1, Rgb([200, 200, 200]));
        img.put_pixel(0, 0, Rgb([10, 10, 10]));
        img.put_pixel(1, 0, Rgb([10, 40, 10]));
        img.put_pixel(2, 0, Rgb([24, 24, 24]));
        img.put_pixel(3, 0, Rgb([25, 0, 0]));
        let m = binarize(&img, 25);
        let row: Vec<u8> = (0..4).map(|x| m.get_pixel(x, 0).0[0]).collect();
        assert_eq!(row, vec![255, 0, 255, 0]);
    }

    #[test]
    fn binarize_output_is_binary() {
        let mut img = RgbImage::from_pixel(30, 20, Rgb([180, 90, 40]));
        fill_rect_rgb(&mut img, Rect::new(5, 5, 10, 8), Rgb([3, 3, 3]));
        let m = binarize(&img, 30);
        assert!(m.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert_eq!(count_on(&m), 80);
    }

    #[test]
    fn dilation_grows_towards_bottom_right() {
        let mut m = GrayImage::new(5, 5);
        m.put_pixel(2, 2, Luma([255]));
        let d = dilate_2x2(&m);
        assert_eq!(count_on(&d), 4);
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            assert_eq!(d.get_pixel(x, y).0[0], 255, "({x},{y})");
        }
    }

    #[test]
    fn dilation_at_top_left_edge_stays_in_bounds() {
        let mut m = GrayImage::new(4, 3);
        m.put_pixel(0, 0, Luma([255]));
        m.put_pixel(3, 2, Luma([255]));
        let d = dilate_2x2(&m);
        assert_eq!(d.dimensions(), (4, 3));
        let on: Vec<(u32, u32)> = d
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] == 255)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(on, vec![(0, 0), (1, 0), (0, 1), (1, 1), (3, 2)]);
    }

    #[test]
    fn precondition_removes_specks_and_keeps_blobs() {
        let mut m = GrayImage::new(80, 80);
        fill_rect_gray(&mut m, Rect::new(8, 8, 40, 40), 255);
        m.put_pixel(70, 70, Luma([255]));
        let p = precondition(&m, &PreconditionParams::background());
        assert_eq!(p.dimensions(), (80, 80));
        assert_eq!(p.get_pixel(70, 70).0[0], 0);
        assert_eq!(p.get_pixel(71, 71).0[0], 0);
        assert_eq!(p.get_pixel(28, 28).0[0], 255);
        assert!(p.pixels().all(|v| v.0[0] == 0 || v.0[0] == 255));
    }

    #[test]
    fn sprite_precondition_is_dilation_only() {
        let mut m = GrayImage::new(20, 20);
        fill_rect_gray(&mut m, Rect::new(4, 4, 5, 5), 255);
        assert_eq!(
            precondition(&m, &PreconditionParams::sprite()),
            dilate_2x2(&m)
        );
    }

    #[test]
    fn fit_within_only_touches_oversized_sides() {
        let m = GrayImage::new(50, 20);
        let f = fit_within(&m, 30, 40);
        assert_eq!(f.dimensions(), (30, 20));
        let same = fit_within(&m, 60, 60);
        assert_eq!(same.dimensions(), (50, 20));
    }

    #[test]
    fn crop_clips_to_bounds() {
        let m = GrayImage::new(10, 10);
        assert_eq!(crop(&m, &Rect::new(6, 7, 10, 10)).dimensions(), (4, 3));
    }

    #[test]
    fn upscale_floors_size() {
        let img = RgbImage::new(20, 10);
        assert_eq!(upscale_nearest(&img, 1.55).dimensions(), (31, 15));
        assert_eq!(upscale_nearest(&img, 1.0).dimensions(), (20, 10));
    }
}
