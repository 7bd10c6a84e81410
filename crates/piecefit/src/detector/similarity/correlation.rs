use image::{GrayImage, ImageBuffer, Luma};
use imageproc::integral_image::{integral_image, integral_squared_image};

use super::{empty_hit, window_offsets, SearchHit, SimilaritySearch};
use crate::geometry::Rect;

/// Zero-mean normalized cross-correlation between the sprite and each
/// window, scaled to 0–100.
///
/// Window sums come from integral images, so only the cross term is
/// accumulated per placement. Arithmetic is exact integer math up to the
/// final division. A template without variance matches every window
/// perfectly, so a solid piece scores 100 at the first placement. Windows
/// without variance score 0 against a textured template, and negative
/// correlation is clamped to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationSearch;

type Integral = ImageBuffer<Luma<u64>, Vec<u64>>;

/// Sum over `[x, x + w) × [y, y + h)` from a `(W + 1) × (H + 1)` integral image.
#[inline]
fn window_sum(ii: &Integral, x: u32, y: u32, w: u32, h: u32) -> u64 {
    let a = ii.get_pixel(x, y).0[0];
    let b = ii.get_pixel(x + w, y).0[0];
    let c = ii.get_pixel(x, y + h).0[0];
    let d = ii.get_pixel(x + w, y + h).0[0];
    d + a - b - c
}

impl SimilaritySearch for CorrelationSearch {
    fn search(&self, sprite: &GrayImage, background: &GrayImage, background_rect: Rect) -> SearchHit {
        let (sw, sh) = sprite.dimensions();
        let (bw, bh) = background.dimensions();
        let n = sw as i128 * sh as i128;
        if n == 0 {
            return empty_hit(sprite, background_rect);
        }

        let t: Vec<i128> = sprite.pixels().map(|p| p.0[0] as i128).collect();
        let t_sum: i128 = t.iter().sum();
        let t_sq: i128 = t.iter().map(|v| v * v).sum();
        let t_var = n * t_sq - t_sum * t_sum;

        let ii: Integral = integral_image(background);
        let ii_sq: Integral = integral_squared_image(background);
        let stride = bw as usize;
        let raw = background.as_raw();

        let mut best: Option<(u32, u32, f64)> = None;
        for (dx, dy) in window_offsets(sw, sh, bw, bh) {
            let score = if t_var == 0 {
                1.0
            } else {
                let w_sum = window_sum(&ii, dx, dy, sw, sh) as i128;
                let w_sq = window_sum(&ii_sq, dx, dy, sw, sh) as i128;
                let w_var = n * w_sq - w_sum * w_sum;
                if w_var == 0 {
                    0.0
                } else {
                    let mut cross: i128 = 0;
                    for row in 0..sh as usize {
                        let start = (dy as usize + row) * stride + dx as usize;
                        let b_row = &raw[start..start + sw as usize];
                        let t_row = &t[row * sw as usize..(row + 1) * sw as usize];
                        cross += t_row
                            .iter()
                            .zip(b_row)
                            .map(|(tv, bv)| tv * *bv as i128)
                            .sum::<i128>();
                    }
                    let num = (n * cross - t_sum * w_sum) as f64;
                    let den = (t_var as f64).sqrt() * (w_var as f64).sqrt();
                    (num / den).clamp(0.0, 1.0)
                }
            };
            if best.map_or(true, |(_, _, top)| score > top) {
                best = Some((dx, dy, score));
            }
        }

        match best {
            Some((dx, dy, score)) => SearchHit {
                rect: Rect::new(background_rect.x + dx, background_rect.y + dy, sw, sh),
                similarity: score * 100.0,
            },
            None => empty_hit(sprite, background_rect),
        }
    }
}
