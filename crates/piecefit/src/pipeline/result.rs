use crate::detector::{FinalMatch, MatchStrategy};
use crate::geometry::Rect;

/// Full result of one solve.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SolveResult {
    /// Accepted matches, ascending by `sprite_index`. Sprite rectangles are in
    /// original (un-prescaled) sprite-image coordinates.
    pub matches: Vec<FinalMatch>,
    /// Background regions considered, largest first.
    pub background_regions: Vec<Rect>,
    /// Sprite regions considered, left to right, in original sprite-image
    /// coordinates.
    pub sprite_regions: Vec<Rect>,
    /// Background image dimensions [width, height].
    pub background_size: [u32; 2],
    /// Sprite image dimensions [width, height], before prescaling.
    pub sprite_size: [u32; 2],
    /// Number of (sprite, region, angle) combinations scored.
    pub candidates_scored: usize,
    pub strategy: MatchStrategy,
}

impl SolveResult {
    /// Construct an empty result for inputs of the given dimensions.
    pub fn empty(background_size: [u32; 2], sprite_size: [u32; 2], strategy: MatchStrategy) -> Self {
        Self {
            matches: Vec::new(),
            background_regions: Vec::new(),
            sprite_regions: Vec::new(),
            background_size,
            sprite_size,
            candidates_scored: 0,
            strategy,
        }
    }

    /// Centre of each match's background window, in match order.
    ///
    /// These are the background-image coordinates a piece should be dropped at.
    pub fn drop_points(&self) -> Vec<[f64; 2]> {
        self.matches.iter().map(|m| m.background_rect.center()).collect()
    }

    /// Centre of each match's sprite region, in match order.
    pub fn sprite_centers(&self) -> Vec<[f64; 2]> {
        self.matches.iter().map(|m| m.sprite_rect.center()).collect()
    }

    /// True when every sprite region received a match.
    pub fn is_complete(&self) -> bool {
        !self.sprite_regions.is_empty() && self.matches.len() == self.sprite_regions.len()
    }

    /// Lowest similarity among the accepted matches.
    pub fn min_similarity(&self) -> Option<f64> {
        self.matches
            .iter()
            .map(|m| m.similarity)
            .min_by(|a, b| a.total_cmp(b))
    }
}
