use image::GrayImage;

use super::{empty_hit, window_offsets, SearchHit, SimilaritySearch};
use crate::geometry::Rect;
use crate::mask::MASK_MIDPOINT;

/// Percentage of pixels whose on/off state agrees between the sprite and
/// each window. The first maximum in row-major order wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceSearch;

fn on_states(img: &GrayImage) -> Vec<bool> {
    img.pixels().map(|p| p.0[0] > MASK_MIDPOINT).collect()
}

impl SimilaritySearch for BruteForceSearch {
    fn search(&self, sprite: &GrayImage, background: &GrayImage, background_rect: Rect) -> SearchHit {
        let (sw, sh) = sprite.dimensions();
        let (bw, bh) = background.dimensions();
        let n = sw as usize * sh as usize;
        if n == 0 {
            return empty_hit(sprite, background_rect);
        }

        let s = on_states(sprite);
        let b = on_states(background);
        let (sw, bw_us) = (sw as usize, bw as usize);

        let mut best: Option<(u32, u32, usize)> = None;
        for (dx, dy) in window_offsets(sprite.width(), sh, bw, bh) {
            let mut agree = 0usize;
            for row in 0..sh as usize {
                let s_row = &s[row * sw..(row + 1) * sw];
                let start = (dy as usize + row) * bw_us + dx as usize;
                let b_row = &b[start..start + sw];
                agree += s_row.iter().zip(b_row).filter(|(p, q)| p == q).count();
            }
            if best.map_or(true, |(_, _, top)| agree > top) {
                best = Some((dx, dy, agree));
            }
        }

        match best {
            Some((dx, dy, agree)) => SearchHit {
                rect: Rect::new(
                    background_rect.x + dx,
                    background_rect.y + dy,
                    sprite.width(),
                    sh,
                ),
                similarity: agree as f64 / n as f64 * 100.0,
            },
            None => empty_hit(sprite, background_rect),
        }
    }
}
