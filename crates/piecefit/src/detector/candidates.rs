use image::GrayImage;
use rayon::prelude::*;

use super::rotation::SpriteRotations;
use super::similarity::{MatchParams, SimilaritySearch};
use crate::geometry::Rect;
use crate::mask;

/// One scored (sprite, background region, angle) combination.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MatchCandidate {
    /// Index into the sprite regions (left-to-right order).
    pub sprite_index: usize,
    /// Index into the background regions (largest first).
    pub background_index: usize,
    /// Clockwise rotation applied to the sprite, in degrees.
    pub angle: i32,
    /// Score in `[0, 100]`.
    pub similarity: f64,
    /// Sprite region the piece was cut from.
    pub sprite_rect: Rect,
    /// Best-matching window in background-image coordinates.
    pub background_rect: Rect,
    /// Rotated (and possibly shrunk) crop that was scored.
    #[serde(skip)]
    pub rotated_sprite: GrayImage,
}

fn score_sprite(
    sprite_index: usize,
    rotations: &SpriteRotations,
    background_crops: &[(Rect, GrayImage)],
    searcher: &dyn SimilaritySearch,
) -> Vec<MatchCandidate> {
    let crops: Vec<(i32, GrayImage)> = rotations
        .samples
        .iter()
        .map(|s| (s.angle, s.crop()))
        .collect();

    let mut out = Vec::with_capacity(background_crops.len() * crops.len());
    for (background_index, (bg_rect, bg_crop)) in background_crops.iter().enumerate() {
        for (angle, crop) in &crops {
            let fitted = mask::fit_within(crop, bg_rect.width, bg_rect.height);
            let hit = searcher.search(&fitted, bg_crop, *bg_rect);
            out.push(MatchCandidate {
                sprite_index,
                background_index,
                angle: *angle,
                similarity: hit.similarity,
                sprite_rect: rotations.region,
                background_rect: hit.rect,
                rotated_sprite: fitted,
            });
        }
    }
    tracing::debug!(
        "sprite {}: {} candidates over {} samples",
        sprite_index,
        out.len(),
        crops.len()
    );
    out
}

/// Score every sprite orientation against every background region.
///
/// Output follows enumeration order (sprite, background, angle) whether or
/// not scoring ran in parallel.
pub fn score_candidates(
    background_mask: &GrayImage,
    background_regions: &[Rect],
    sprites: &[SpriteRotations],
    params: &MatchParams,
) -> Vec<MatchCandidate> {
    let searcher = params.strategy.searcher();
    let background_crops: Vec<(Rect, GrayImage)> = background_regions
        .iter()
        .map(|r| (*r, mask::crop(background_mask, r)))
        .collect();

    let per_sprite: Vec<Vec<MatchCandidate>> = if params.parallel {
        sprites
            .par_iter()
            .enumerate()
            .map(|(i, rot)| score_sprite(i, rot, &background_crops, searcher))
            .collect()
    } else {
        sprites
            .iter()
            .enumerate()
            .map(|(i, rot)| score_sprite(i, rot, &background_crops, searcher))
            .collect()
    };
    per_sprite.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::rotation::{analyze_rotations, RotationParams};
    use crate::detector::similarity::MatchStrategy;
    use crate::test_utils::{fill_rect_gray, stamp_gray, Shape};

    fn narrow_sweep() -> RotationParams {
        RotationParams {
            min_deg: -10,
            max_deg: 10,
            step_deg: 5,
        }
    }

    #[test]
    fn candidate_bag_is_full_cross_product_in_order() {
        let mut sprite_mask = GrayImage::new(120, 50);
        stamp_gray(&mut sprite_mask, Shape::Disk, [5, 5], 30);
        stamp_gray(&mut sprite_mask, Shape::Triangle, [60, 5], 30);
        let sprites = vec![
            analyze_rotations(&sprite_mask, Rect::new(5, 5, 30, 30), &narrow_sweep()),
            analyze_rotations(&sprite_mask, Rect::new(60, 5, 30, 30), &narrow_sweep()),
        ];

        let mut bg = GrayImage::new(200, 80);
        stamp_gray(&mut bg, Shape::Triangle, [20, 20], 30);
        stamp_gray(&mut bg, Shape::Disk, [120, 20], 30);
        let regions = [Rect::new(20, 20, 30, 30), Rect::new(120, 20, 30, 30)];

        for parallel in [false, true] {
            let params = MatchParams {
                parallel,
                ..MatchParams::default()
            };
            let bag = score_candidates(&bg, &regions, &sprites, &params);
            assert_eq!(bag.len(), 2 * 2 * 5);
            let order: Vec<(usize, usize, i32)> = bag
                .iter()
                .map(|c| (c.sprite_index, c.background_index, c.angle))
                .collect();
            let mut sorted = order.clone();
            sorted.sort();
            assert_eq!(order, sorted);
            assert!(bag.iter().all(|c| (0.0..=100.0).contains(&c.similarity)));
        }
    }

    #[test]
    fn oversized_crop_is_shrunk_to_region() {
        let mut sprite_mask = GrayImage::new(60, 60);
        stamp_gray(&mut sprite_mask, Shape::Ell, [5, 5], 50);
        let sprites = vec![analyze_rotations(
            &sprite_mask,
            Rect::new(5, 5, 50, 50),
            &RotationParams {
                min_deg: 0,
                max_deg: 0,
                step_deg: 1,
            },
        )];
        let mut bg = GrayImage::new(100, 100);
        stamp_gray(&mut bg, Shape::Ell, [10, 10], 30);
        let params = MatchParams {
            strategy: MatchStrategy::BruteForce,
            ..MatchParams::default()
        };
        let bag = score_candidates(&bg, &[Rect::new(10, 10, 30, 30)], &sprites, &params);
        assert_eq!(bag.len(), 1);
        assert_eq!(bag[0].rotated_sprite.dimensions(), (30, 30));
        assert_eq!(bag[0].background_rect, Rect::new(10, 10, 30, 30));
        assert_eq!(bag[0].sprite_rect, Rect::new(5, 5, 50, 50));
    }

    #[test]
    fn solid_square_piece_matches_solid_hole_upright() {
        let mut sprite_mask = GrayImage::new(60, 60);
        fill_rect_gray(&mut sprite_mask, Rect::new(10, 10, 40, 40), 255);
        let sprites = vec![analyze_rotations(
            &sprite_mask,
            Rect::new(10, 10, 40, 40),
            &narrow_sweep(),
        )];
        let mut bg = GrayImage::new(120, 80);
        let hole = Rect::new(50, 20, 40, 40);
        fill_rect_gray(&mut bg, hole, 255);

        let bag = score_candidates(&bg, &[hole], &sprites, &MatchParams::default());
        assert_eq!(bag.len(), 5);
        let best = bag
            .iter()
            .max_by(|a, b| a.similarity.total_cmp(&b.similarity))
            .unwrap();
        assert_eq!(best.angle, 0);
        assert_eq!(best.similarity, 100.0);
        assert_eq!(best.background_rect, hole);
    }

    #[test]
    fn no_regions_means_no_candidates() {
        let bg = GrayImage::new(10, 10);
        let bag = score_candidates(&bg, &[], &[], &MatchParams::default());
        assert!(bag.is_empty());
    }
}
