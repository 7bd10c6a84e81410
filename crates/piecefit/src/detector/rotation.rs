use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

use super::merge::merge_overlapping;
use super::regions::{extract_regions, sort_regions, SortMode};
use crate::geometry::Rect;
use crate::mask;

/// Angle sweep used to normalize a piece's orientation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RotationParams {
    /// First angle in degrees (inclusive). Positive angles are clockwise.
    pub min_deg: i32,
    /// Last angle in degrees (inclusive).
    pub max_deg: i32,
    pub step_deg: u32,
}

impl Default for RotationParams {
    fn default() -> Self {
        Self {
            min_deg: -45,
            max_deg: 45,
            step_deg: 1,
        }
    }
}

impl RotationParams {
    /// Angles visited by the sweep, ascending.
    pub fn angles(&self) -> impl Iterator<Item = i32> {
        let step = self.step_deg.max(1) as usize;
        (self.min_deg..=self.max_deg).step_by(step)
    }
}

/// One rendered orientation of a sprite piece.
#[derive(Debug, Clone)]
pub struct RotationSample {
    /// Clockwise rotation in degrees.
    pub angle: i32,
    /// Tight bounding box of the piece inside `rendered`.
    pub rect: Rect,
    /// `rect.width / rect.height`; `+inf` for a zero-height box.
    pub aspect_ratio: f64,
    /// Full rotated canvas.
    pub rendered: GrayImage,
}

impl RotationSample {
    /// The piece cropped to its tight box.
    pub fn crop(&self) -> GrayImage {
        mask::crop(&self.rendered, &self.rect)
    }
}

/// All orientations of one sprite region, ordered by angle.
#[derive(Debug, Clone)]
pub struct SpriteRotations {
    /// Region in the (prescaled) sprite image the samples were cut from.
    pub region: Rect,
    pub samples: Vec<RotationSample>,
}

/// Canvas size that holds a `w × h` image rotated by `angle_deg`.
pub fn expanded_size(w: u32, h: u32, angle_deg: f64) -> (u32, u32) {
    let rad = angle_deg.to_radians();
    let (s, c) = (rad.sin().abs(), rad.cos().abs());
    let new_w = (h as f64 * s + w as f64 * c).floor() as u32;
    let new_h = (w as f64 * s + h as f64 * c).floor() as u32;
    (new_w, new_h)
}

/// Rotate a mask clockwise by `angle_deg` about its centre onto an expanded
/// canvas, filling uncovered pixels with 0.
///
/// Nearest-neighbour sampling keeps the output binary. Pixel `(i, j)` is
/// centred on `(i, j)`, so quarter turns are exact pixel permutations.
pub fn rotate_expanded(mask: &GrayImage, angle_deg: f64) -> GrayImage {
    let (w, h) = mask.dimensions();
    let (new_w, new_h) = expanded_size(w, h, angle_deg);
    let mut out = GrayImage::new(new_w, new_h);
    if w == 0 || h == 0 || new_w == 0 || new_h == 0 {
        return out;
    }
    let projection = Projection::translate((new_w - 1) as f32 / 2.0, (new_h - 1) as f32 / 2.0)
        * Projection::rotate((angle_deg as f32).to_radians())
        * Projection::translate(-((w - 1) as f32) / 2.0, -((h - 1) as f32) / 2.0);
    warp_into(mask, &projection, Interpolation::Nearest, Luma([0]), &mut out);
    out
}

/// Render `region` of `mask` at every angle of the sweep and record the
/// tight box of the largest blob in each rendering.
///
/// Angles whose rendering contains no foreground are omitted.
pub fn analyze_rotations(mask: &GrayImage, region: Rect, params: &RotationParams) -> SpriteRotations {
    let roi = mask::crop(mask, &region);
    let mut samples = Vec::new();
    for angle in params.angles() {
        let rendered = rotate_expanded(&roi, angle as f64);
        let mut rects = merge_overlapping(&extract_regions(&rendered, 0, SortMode::AreaDesc), 0.0);
        sort_regions(&mut rects, SortMode::AreaDesc);
        let Some(rect) = rects.first().copied() else {
            continue;
        };
        let aspect_ratio = if rect.height == 0 {
            f64::INFINITY
        } else {
            rect.width as f64 / rect.height as f64
        };
        samples.push(RotationSample {
            angle,
            rect,
            aspect_ratio,
            rendered,
        });
    }
    SpriteRotations { region, samples }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{count_on, fill_rect_gray};
    use approx::assert_abs_diff_eq;

    fn bar_mask() -> (GrayImage, Rect) {
        let mut m = GrayImage::new(60, 40);
        let region = Rect::new(10, 10, 40, 20);
        fill_rect_gray(&mut m, region, 255);
        (m, region)
    }

    #[test]
    fn default_sweep_has_91_angles() {
        let angles: Vec<i32> = RotationParams::default().angles().collect();
        assert_eq!(angles.len(), 91);
        assert_eq!(angles.first(), Some(&-45));
        assert_eq!(angles.last(), Some(&45));
    }

    #[test]
    fn expanded_canvas_matches_trig_bound() {
        assert_eq!(expanded_size(40, 20, 0.0), (40, 20));
        // 20*sin30 + 40*cos30 = 44.64, 40*sin30 + 20*cos30 = 37.32
        assert_eq!(expanded_size(40, 20, 30.0), (44, 37));
        assert_eq!(expanded_size(40, 20, -30.0), (44, 37));
    }

    #[test]
    fn zero_angle_is_identity() {
        let (m, region) = bar_mask();
        let roi = mask::crop(&m, &region);
        assert_eq!(rotate_expanded(&roi, 0.0), roi);
    }

    #[test]
    fn rotation_keeps_mask_binary() {
        let (m, region) = bar_mask();
        let r = rotate_expanded(&mask::crop(&m, &region), 17.0);
        assert!(r.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert!(count_on(&r) > 0);
    }

    #[test]
    fn sweep_records_every_angle_for_solid_piece() {
        let (m, region) = bar_mask();
        let rot = analyze_rotations(&m, region, &RotationParams::default());
        assert_eq!(rot.region, region);
        assert_eq!(rot.samples.len(), 91);
        assert!(rot.samples.windows(2).all(|w| w[0].angle < w[1].angle));

        let zero = rot.samples.iter().find(|s| s.angle == 0).unwrap();
        assert_eq!(zero.rect, Rect::new(0, 0, 40, 20));
        assert_abs_diff_eq!(zero.aspect_ratio, 2.0);
    }

    #[test]
    fn square_piece_keeps_its_box_at_zero_degrees() {
        let mut m = GrayImage::new(60, 60);
        let region = Rect::new(15, 15, 30, 30);
        fill_rect_gray(&mut m, region, 255);
        let rot = analyze_rotations(&m, region, &RotationParams::default());
        assert_eq!(rot.samples.len(), 91);
        let zero = rot.samples.iter().find(|s| s.angle == 0).unwrap();
        assert_eq!(zero.rect, Rect::new(0, 0, region.width, region.height));
        assert_eq!(zero.crop(), mask::crop(&m, &region));
        for angle in [-1, 1] {
            assert!(rot.samples.iter().any(|s| s.angle == angle), "{angle}");
        }
    }

    #[test]
    fn quarter_turn_round_trip_is_exact() {
        let (m, region) = bar_mask();
        let roi = mask::crop(&m, &region);
        let turned = rotate_expanded(&roi, 90.0);
        assert_eq!(turned.dimensions(), (20, 40));
        assert_eq!(count_on(&turned), 800);

        let back = rotate_expanded(&turned, -90.0);
        assert_eq!(back, roi);
        let r = extract_regions(&back, 0, SortMode::AreaDesc)[0];
        assert_abs_diff_eq!(r.width as f64 / r.height as f64, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn off_axis_round_trip_stays_within_a_pixel_per_side() {
        // Nearest resampling and the floored canvas can shave the corners,
        // so only the raster bound holds here.
        let (m, region) = bar_mask();
        let roi = mask::crop(&m, &region);
        let back = rotate_expanded(&rotate_expanded(&roi, 30.0), -30.0);
        let r = extract_regions(&back, 0, SortMode::AreaDesc)[0];
        assert!((38..=41).contains(&r.width), "{r:?}");
        assert!((18..=21).contains(&r.height), "{r:?}");
    }

    #[test]
    fn empty_region_yields_no_samples() {
        let m = GrayImage::new(30, 30);
        let rot = analyze_rotations(&m, Rect::new(5, 5, 10, 10), &RotationParams::default());
        assert!(rot.samples.is_empty());
    }
}
