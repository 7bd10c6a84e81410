//! Locating a sprite crop inside a background region.
//!
//! Both strategies slide the crop over every integer offset of the region
//! and report the best-scoring window, with scores on a 0–100 scale. They
//! differ in the score: [`BruteForceSearch`] counts agreeing mask pixels,
//! [`CorrelationSearch`] computes zero-mean normalized cross-correlation.

mod brute;
mod correlation;

use image::GrayImage;

use crate::error::ConfigError;
use crate::geometry::Rect;

pub use brute::BruteForceSearch;
pub use correlation::CorrelationSearch;

/// Best window found by a search.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SearchHit {
    /// Window in background-image coordinates; same size as the sprite crop.
    pub rect: Rect,
    /// Score in `[0, 100]`.
    pub similarity: f64,
}

/// Scoring contract shared by the search strategies.
///
/// `sprite` must not exceed `background` in either dimension; callers shrink
/// oversized crops first. `background` is the crop of `background_rect`.
pub trait SimilaritySearch: Send + Sync {
    fn search(&self, sprite: &GrayImage, background: &GrayImage, background_rect: Rect)
        -> SearchHit;
}

/// Selects a [`SimilaritySearch`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// Exhaustive pixel-agreement scoring.
    BruteForce,
    /// Normalized cross-correlation.
    #[default]
    Correlation,
}

impl MatchStrategy {
    pub fn searcher(self) -> &'static dyn SimilaritySearch {
        match self {
            Self::BruteForce => &BruteForceSearch,
            Self::Correlation => &CorrelationSearch,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BruteForce => "brute-force",
            Self::Correlation => "correlation",
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MatchStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brute-force" | "brute_force" | "brute" => Ok(Self::BruteForce),
            "correlation" | "template" => Ok(Self::Correlation),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Candidate scoring and assignment settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MatchParams {
    pub strategy: MatchStrategy,
    /// Allow each background region to receive at most one sprite.
    pub exclusive_backgrounds: bool,
    /// Score sprites on the rayon thread pool.
    pub parallel: bool,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Correlation,
            exclusive_backgrounds: false,
            parallel: true,
        }
    }
}

/// Offsets `(dx, dy)` of every placement of a `sw × sh` window in a
/// `bw × bh` area, in row-major order.
pub(crate) fn window_offsets(sw: u32, sh: u32, bw: u32, bh: u32) -> impl Iterator<Item = (u32, u32)> {
    let nx = if sw <= bw { bw - sw + 1 } else { 0 };
    let ny = if sh <= bh { bh - sh + 1 } else { 0 };
    (0..ny).flat_map(move |dy| (0..nx).map(move |dx| (dx, dy)))
}

/// Fallback when no placement exists: the region origin with zero score.
pub(crate) fn empty_hit(sprite: &GrayImage, background_rect: Rect) -> SearchHit {
    SearchHit {
        rect: Rect::new(
            background_rect.x,
            background_rect.y,
            sprite.width(),
            sprite.height(),
        ),
        similarity: 0.0,
    }
}
