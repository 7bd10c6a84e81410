//! Shared test utilities: synthetic silhouettes and puzzle image pairs.

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::geometry::Rect;

pub(crate) const DARK: Rgb<u8> = Rgb([8, 8, 8]);
pub(crate) const LIGHT: Rgb<u8> = Rgb([210, 205, 190]);

/// Silhouettes used by the synthetic puzzles. Each has a non-constant
/// bounding-box crop so correlation scoring is well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Disk,
    /// Right triangle with the right angle at the bottom-left.
    Triangle,
    /// L-shaped block: full-height left bar and full-width bottom bar.
    Ell,
}

impl Shape {
    /// Whether local pixel `(x, y)` of a `size × size` box is inside.
    pub(crate) fn contains(self, x: u32, y: u32, size: u32) -> bool {
        let s = size as f32;
        let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
        match self {
            Shape::Disk => {
                let r = s / 2.0;
                (fx - r).powi(2) + (fy - r).powi(2) <= r * r
            }
            Shape::Triangle => fx <= fy,
            Shape::Ell => fx < s * 0.4 || fy > s * 0.6,
        }
    }
}

/// Number of on pixels in a mask.
pub(crate) fn count_on(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p.0[0] > 127).count()
}

pub(crate) fn fill_rect_gray(img: &mut GrayImage, rect: Rect, value: u8) {
    for y in rect.y..rect.bottom().min(img.height()) {
        for x in rect.x..rect.right().min(img.width()) {
            img.put_pixel(x, y, Luma([value]));
        }
    }
}

pub(crate) fn fill_rect_rgb(img: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
    for y in rect.y..rect.bottom().min(img.height()) {
        for x in rect.x..rect.right().min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Paint `shape` with its bounding box at `origin` into a mask.
pub(crate) fn stamp_gray(img: &mut GrayImage, shape: Shape, origin: [u32; 2], size: u32) {
    for y in 0..size {
        for x in 0..size {
            let (px, py) = (origin[0] + x, origin[1] + y);
            if px < img.width() && py < img.height() && shape.contains(x, y, size) {
                img.put_pixel(px, py, Luma([255]));
            }
        }
    }
}

/// Paint `shape` in [`DARK`] with its bounding box at `origin`.
pub(crate) fn stamp_rgb(img: &mut RgbImage, shape: Shape, origin: [u32; 2], size: u32) {
    for y in 0..size {
        for x in 0..size {
            let (px, py) = (origin[0] + x, origin[1] + y);
            if px < img.width() && py < img.height() && shape.contains(x, y, size) {
                img.put_pixel(px, py, DARK);
            }
        }
    }
}

/// Mask containing a single shape.
pub(crate) fn shape_mask(shape: Shape, size: u32, margin: u32) -> GrayImage {
    let mut m = GrayImage::new(size + 2 * margin, size + 2 * margin);
    stamp_gray(&mut m, shape, [margin, margin], size);
    m
}

/// A background/sprite pair with a known pairing.
pub(crate) struct SyntheticPuzzle {
    pub background: RgbImage,
    pub sprite: RgbImage,
    /// Hole bounding box for each sprite piece, in sprite (left-to-right) order.
    pub holes: Vec<Rect>,
}

/// Three pieces laid out left to right in the sprite sheet; their holes
/// appear in the background in a different order.
pub(crate) fn synthetic_puzzle() -> SyntheticPuzzle {
    const SIZE: u32 = 40;
    let pieces = [Shape::Triangle, Shape::Disk, Shape::Ell];
    let hole_origins = [[230, 40], [40, 120], [140, 60]];

    let mut background = RgbImage::from_pixel(320, 200, LIGHT);
    let mut holes = Vec::new();
    for (shape, origin) in pieces.iter().zip(hole_origins) {
        stamp_rgb(&mut background, *shape, origin, SIZE);
        holes.push(Rect::new(origin[0], origin[1], SIZE, SIZE));
    }

    let mut sprite = RgbImage::from_pixel(200, 70, LIGHT);
    for (i, shape) in pieces.iter().enumerate() {
        stamp_rgb(&mut sprite, *shape, [10 + i as u32 * 65, 15], SIZE);
    }

    SyntheticPuzzle {
        background,
        sprite,
        holes,
    }
}
