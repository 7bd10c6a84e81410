//! Top-level orchestrator: masks → regions → rotations → candidates → assignment.

use image::{GrayImage, RgbImage};

use super::result::SolveResult;
use crate::config::SolveConfig;
use crate::detector::{
    analyze_rotations, assign_matches, find_regions, score_candidates, SpriteRotations,
};
use crate::error::ConfigError;
use crate::mask::{binarize, precondition, upscale_nearest};

struct Masks {
    background: GrayImage,
    sprite: GrayImage,
}

fn build_masks(background: &RgbImage, sprite: &RgbImage, config: &SolveConfig) -> Masks {
    let mut bg_mask = binarize(background, config.binarize.background_threshold);
    let mut sprite_mask = binarize(sprite, config.binarize.sprite_threshold);
    if config.precondition.enable {
        bg_mask = precondition(&bg_mask, &config.precondition.background);
        sprite_mask = precondition(&sprite_mask, &config.precondition.sprite);
    }
    Masks {
        background: bg_mask,
        sprite: sprite_mask,
    }
}

/// Solve one background/sprite pair with a validated configuration.
pub(crate) fn run(background: &RgbImage, sprite: &RgbImage, config: &SolveConfig) -> SolveResult {
    let strategy = config.matching.strategy;
    let mut result = SolveResult::empty(
        [background.width(), background.height()],
        [sprite.width(), sprite.height()],
        strategy,
    );

    let scaled_sprite = upscale_nearest(sprite, config.sprite_prescale);
    let masks = build_masks(background, &scaled_sprite, config);

    let bg_regions = find_regions(&masks.background, &config.background_regions);
    let sprite_regions = find_regions(&masks.sprite, &config.sprite_regions);
    tracing::info!(
        "{} background regions, {} sprite regions",
        bg_regions.len(),
        sprite_regions.len()
    );

    let rotations: Vec<SpriteRotations> = sprite_regions
        .iter()
        .map(|r| analyze_rotations(&masks.sprite, *r, &config.rotation))
        .collect();
    for (i, rot) in rotations.iter().enumerate() {
        if rot.samples.is_empty() {
            tracing::warn!("sprite region {} has no usable orientation", i);
        } else {
            tracing::debug!("sprite region {}: {} orientations", i, rot.samples.len());
        }
    }

    let candidates = score_candidates(&masks.background, &bg_regions, &rotations, &config.matching);
    result.candidates_scored = candidates.len();
    tracing::info!("{} candidates scored ({})", candidates.len(), strategy);

    let mut matches = assign_matches(
        candidates,
        sprite_regions.len(),
        bg_regions.len(),
        config.matching.exclusive_backgrounds,
    );
    for m in &mut matches {
        m.sprite_rect = m.sprite_rect.scaled_down(config.sprite_prescale);
    }
    tracing::info!("{} of {} sprites matched", matches.len(), sprite_regions.len());

    result.matches = matches;
    result.background_regions = bg_regions;
    result.sprite_regions = sprite_regions
        .iter()
        .map(|r| r.scaled_down(config.sprite_prescale))
        .collect();
    result
}

/// Validate `config`, then solve.
pub fn solve(
    background: &RgbImage,
    sprite: &RgbImage,
    config: &SolveConfig,
) -> Result<SolveResult, ConfigError> {
    config.validate()?;
    Ok(run(background, sprite, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::MatchStrategy;
    use crate::geometry::Rect;
    use crate::test_utils::{fill_rect_rgb, synthetic_puzzle, DARK, LIGHT};

    fn unscaled_config(strategy: MatchStrategy) -> SolveConfig {
        let mut c = SolveConfig::default();
        c.sprite_prescale = 1.0;
        c.precondition.enable = false;
        c.matching.strategy = strategy;
        c
    }

    #[test]
    fn empty_inputs_yield_empty_result() {
        let bg = RgbImage::from_pixel(120, 80, LIGHT);
        let sprite = RgbImage::from_pixel(60, 30, LIGHT);
        let r = solve(&bg, &sprite, &SolveConfig::default()).unwrap();
        assert!(r.matches.is_empty());
        assert!(r.background_regions.is_empty());
        assert!(r.sprite_regions.is_empty());
        assert_eq!(r.candidates_scored, 0);
        assert!(r.drop_points().is_empty());
    }

    #[test]
    fn background_without_holes_matches_nothing() {
        let bg = RgbImage::from_pixel(120, 80, LIGHT);
        let mut sprite = RgbImage::from_pixel(60, 40, LIGHT);
        fill_rect_rgb(&mut sprite, Rect::new(10, 10, 20, 20), DARK);
        let r = solve(&bg, &sprite, &unscaled_config(MatchStrategy::BruteForce)).unwrap();
        assert_eq!(r.sprite_regions.len(), 1);
        assert!(r.matches.is_empty());
        assert!(!r.is_complete());
    }

    #[test]
    fn invalid_config_is_rejected_before_work() {
        let mut c = SolveConfig::default();
        c.sprite_prescale = -1.0;
        let img = RgbImage::new(4, 4);
        assert!(solve(&img, &img, &c).is_err());
    }

    #[test]
    fn synthetic_pairing_is_recovered() {
        let puzzle = synthetic_puzzle();
        for strategy in [MatchStrategy::BruteForce, MatchStrategy::Correlation] {
            let r = solve(&puzzle.background, &puzzle.sprite, &unscaled_config(strategy)).unwrap();
            assert_eq!(r.sprite_regions.len(), 3, "{strategy}");
            assert!(r.is_complete(), "{strategy}");
            for (m, hole) in r.matches.iter().zip(&puzzle.holes) {
                let [cx, cy] = m.background_rect.center();
                let [hx, hy] = hole.center();
                assert!(
                    (cx - hx).abs() <= 3.0 && (cy - hy).abs() <= 3.0,
                    "{strategy}: sprite {} dropped at ({cx},{cy}), hole at ({hx},{hy})",
                    m.sprite_index
                );
                assert!(m.similarity > 90.0, "{strategy}: {}", m.similarity);
            }
        }
    }

    #[test]
    fn sprite_rects_are_rescaled_by_prescale() {
        let puzzle = synthetic_puzzle();
        let mut c = unscaled_config(MatchStrategy::Correlation);
        c.sprite_prescale = 2.0;
        c.rotation.min_deg = -5;
        c.rotation.max_deg = 5;
        let r = solve(&puzzle.background, &puzzle.sprite, &c).unwrap();
        assert_eq!(r.sprite_regions.len(), 3);
        // Prescaled regions are ~80 px wide; reported ones are back near 40.
        for region in &r.sprite_regions {
            assert!((38..=42).contains(&region.width), "{region:?}");
        }
        assert_eq!(r.sprite_size, [200, 70]);
    }
}
