//! Visual overlay of a solve on top of the background image.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect as PixelRect;

use crate::geometry::Rect;
use crate::pipeline::SolveResult;

/// Colours and stroke width for [`draw_solution`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Outline of every background region considered.
    pub region_color: [u8; 3],
    /// Outline of each matched window.
    pub match_color: [u8; 3],
    /// Cross at each drop point.
    pub point_color: [u8; 3],
    /// Outline thickness in pixels.
    pub thickness: u32,
    pub draw_regions: bool,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            region_color: [0, 160, 255],
            match_color: [0, 255, 0],
            point_color: [255, 0, 0],
            thickness: 2,
            draw_regions: true,
        }
    }
}

fn draw_box(canvas: &mut RgbImage, rect: &Rect, color: Rgb<u8>, thickness: u32) {
    for t in 0..thickness.max(1) {
        let w = rect.width + 2 * t;
        let h = rect.height + 2 * t;
        if w == 0 || h == 0 {
            continue;
        }
        let outline = PixelRect::at(rect.x as i32 - t as i32, rect.y as i32 - t as i32).of_size(w, h);
        draw_hollow_rect_mut(canvas, outline, color);
    }
}

/// Copy of `background` with regions, matched windows and drop points drawn.
pub fn draw_solution(background: &RgbImage, result: &SolveResult, style: &OverlayStyle) -> RgbImage {
    let mut canvas = background.clone();
    if style.draw_regions {
        for region in &result.background_regions {
            draw_box(&mut canvas, region, Rgb(style.region_color), 1);
        }
    }
    for m in &result.matches {
        draw_box(&mut canvas, &m.background_rect, Rgb(style.match_color), style.thickness);
    }
    for [x, y] in result.drop_points() {
        draw_cross_mut(&mut canvas, Rgb(style.point_color), x.round() as i32, y.round() as i32);
    }
    canvas
}
