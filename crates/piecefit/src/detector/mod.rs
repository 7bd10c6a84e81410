//! Matching primitives independent of orchestration.
//!
//! The `pipeline` module owns the call order. This module provides the
//! building blocks: region extraction and merging, the rotation sweep,
//! similarity search, candidate scoring and greedy assignment.

pub(crate) mod assign;
pub(crate) mod candidates;
pub(crate) mod merge;
pub(crate) mod regions;
pub(crate) mod rotation;
pub(crate) mod similarity;

pub use assign::{assign_matches, FinalMatch};
pub use candidates::{score_candidates, MatchCandidate};
pub use merge::{merge_close, merge_overlapping};
pub use regions::{extract_regions, find_regions, RegionParams, SortMode};
pub use rotation::{
    analyze_rotations, expanded_size, rotate_expanded, RotationParams, RotationSample,
    SpriteRotations,
};
pub use similarity::{
    BruteForceSearch, CorrelationSearch, MatchParams, MatchStrategy, SearchHit, SimilaritySearch,
};
