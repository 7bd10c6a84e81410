use image::{imageops, GrayImage};
use imageproc::contours::{find_contours, BorderType, Contour};

use super::merge::{merge_close, merge_overlapping};
use crate::geometry::Rect;

/// Ordering applied to extracted regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Largest area first.
    #[default]
    AreaDesc,
    /// Smallest area first.
    AreaAsc,
    /// Top to bottom, then left to right.
    PositionTopLeft,
    /// Left to right.
    PositionLeft,
}

/// Region extraction settings for one image.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RegionParams {
    /// Bounding boxes with `width * height` below this are discarded.
    pub min_area: u64,
    /// Overlap merge threshold (fraction of the smaller area); `None` disables.
    pub overlap_threshold: Option<f64>,
    /// Maximum nearest-edge distance for proximity merging; `None` disables.
    pub merge_distance: Option<f64>,
    pub sort: SortMode,
    /// Keep at most this many regions after sorting.
    pub max_regions: Option<usize>,
}

impl RegionParams {
    /// Holes in the background image.
    pub fn background() -> Self {
        Self {
            min_area: 50,
            overlap_threshold: Some(0.0),
            merge_distance: Some(5.0),
            sort: SortMode::AreaDesc,
            max_regions: Some(10),
        }
    }

    /// Pieces in the sprite sheet, reported left to right.
    pub fn sprite() -> Self {
        Self {
            min_area: 100,
            overlap_threshold: Some(0.0),
            merge_distance: None,
            sort: SortMode::PositionLeft,
            max_regions: None,
        }
    }
}

impl Default for RegionParams {
    fn default() -> Self {
        Self::background()
    }
}

/// Bounding box of a contour traced on a mask padded by one pixel on every
/// side, in unpadded coordinates.
fn bounding_rect(contour: &Contour<u32>) -> Option<Rect> {
    let first = contour.points.first()?;
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for p in &contour.points[1..] {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    Some(Rect::new(
        x0.saturating_sub(1),
        y0.saturating_sub(1),
        x1 - x0 + 1,
        y1 - y0 + 1,
    ))
}

/// `mask` inside a one-pixel zero frame. Border following misclassifies
/// blobs that touch the image edge, so contours are always traced on a
/// framed copy.
fn framed(mask: &GrayImage) -> GrayImage {
    let mut out = GrayImage::new(mask.width() + 2, mask.height() + 2);
    imageops::replace(&mut out, mask, 1, 1);
    out
}

pub(crate) fn sort_regions(rects: &mut [Rect], mode: SortMode) {
    match mode {
        SortMode::AreaDesc => rects.sort_by(|a, b| b.area().cmp(&a.area())),
        SortMode::AreaAsc => rects.sort_by_key(Rect::area),
        SortMode::PositionTopLeft => rects.sort_by_key(|r| (r.y, r.x)),
        SortMode::PositionLeft => rects.sort_by_key(|r| r.x),
    }
}

/// Bounding boxes of the outermost foreground blobs of `mask`.
///
/// Blobs nested inside a hole of another blob are not reported. Boxes with
/// area below `min_area` are dropped; the rest are stably sorted by `sort`.
pub fn extract_regions(mask: &GrayImage, min_area: u64, sort: SortMode) -> Vec<Rect> {
    if mask.width() == 0 || mask.height() == 0 {
        return Vec::new();
    }
    let contours: Vec<Contour<u32>> = find_contours(&framed(mask));
    let mut rects: Vec<Rect> = contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(bounding_rect)
        .filter(|r| r.area() >= min_area)
        .collect();
    sort_regions(&mut rects, sort);
    rects
}

/// Extraction followed by the configured merges, ordering and cap.
pub fn find_regions(mask: &GrayImage, params: &RegionParams) -> Vec<Rect> {
    let mut rects = extract_regions(mask, params.min_area, params.sort);
    if let Some(threshold) = params.overlap_threshold {
        rects = merge_overlapping(&rects, threshold);
    }
    if let Some(distance) = params.merge_distance {
        if distance > 0.0 && rects.len() > 1 {
            rects = merge_close(&rects, distance);
        }
    }
    sort_regions(&mut rects, params.sort);
    if let Some(cap) = params.max_regions {
        rects.truncate(cap);
    }
    rects
}
