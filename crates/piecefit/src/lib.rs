//! piecefit — pure-Rust solver for rotated sliding-piece puzzles.
//!
//! Given a *background* image with dark cut-out holes and a *sprite* sheet
//! with the matching pieces (drawn at unknown rotations and a different
//! scale), piecefit decides which piece belongs in which hole and where to
//! drop it. The pipeline stages are:
//!
//! 1. **Masks** – dark-pixel binarization and optional dilate/downsample
//!    cleanup of both images.
//! 2. **Regions** – outer-contour bounding boxes, merged by overlap and
//!    proximity.
//! 3. **Rotation** – each piece is rendered over a −45°..45° sweep on an
//!    expanded canvas.
//! 4. **Similarity** – every orientation is slid over every hole and scored
//!    by pixel agreement or normalized cross-correlation.
//! 5. **Assignment** – greedy, highest score first, one hole per piece.
//!
//! # Public API
//! - [`Solver`] as the primary entry point, with [`SolveConfig`] for tuning
//! - [`SolveResult`] with [`SolveResult::drop_points`] for pointer actions
//! - [`ImageSource`] for paths, encoded bytes, readers and decoded images
//! - [`RetryPolicy`] / [`RetryOutcome`] for bounded re-solving
//! - the individual stages as free functions for custom pipelines

mod api;
mod config;
mod detector;
mod error;
mod geometry;
mod mask;
mod overlay;
mod pipeline;
mod retry;
mod source;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::Solver;
pub use config::{BinarizeParams, PreconditionConfig, SolveConfig, MAX_SPRITE_PRESCALE};
pub use detector::{
    analyze_rotations, assign_matches, expanded_size, extract_regions, find_regions, merge_close,
    merge_overlapping, rotate_expanded, score_candidates, BruteForceSearch, CorrelationSearch,
    FinalMatch, MatchCandidate, MatchParams, MatchStrategy, RegionParams, RotationParams,
    RotationSample, SearchHit, SimilaritySearch, SortMode, SpriteRotations,
};
pub use error::{ConfigError, ImageLoadError, ImageRole, SolveError};
pub use geometry::Rect;
pub use mask::{binarize, dilate_2x2, precondition, PreconditionParams};
pub use overlay::{draw_solution, OverlayStyle};
pub use pipeline::{solve, SolveResult};
pub use retry::{RetryOutcome, RetryPolicy};
pub use source::ImageSource;
