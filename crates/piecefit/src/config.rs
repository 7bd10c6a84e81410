//! Solver configuration.
//!
//! [`SolveConfig`] gathers the per-stage parameter structs. Every struct is
//! `#[serde(default)]`, so a JSON file only needs the fields it overrides.
//! Sprite-side structs share their type with the background side, so their
//! missing fields are filled from the sprite defaults explicitly.

use std::path::Path;

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};

use crate::detector::{MatchParams, RegionParams, RotationParams};
use crate::error::ConfigError;
use crate::mask::PreconditionParams;

/// Dark-pixel thresholds for the two inputs.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BinarizeParams {
    /// Background pixels with every channel below this are holes.
    pub background_threshold: u8,
    /// Sprite pixels with every channel below this belong to a piece.
    pub sprite_threshold: u8,
}

impl Default for BinarizeParams {
    fn default() -> Self {
        Self {
            background_threshold: 25,
            sprite_threshold: 30,
        }
    }
}

/// Mask cleanup settings per input.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreconditionConfig {
    pub enable: bool,
    pub background: PreconditionParams,
    #[serde(deserialize_with = "sprite_precondition_over_defaults")]
    pub sprite: PreconditionParams,
}

impl Default for PreconditionConfig {
    fn default() -> Self {
        Self {
            enable: true,
            background: PreconditionParams::background(),
            sprite: PreconditionParams::sprite(),
        }
    }
}

/// Top-level configuration for [`crate::Solver`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SolveConfig {
    /// Uniform upscale applied to the sprite sheet before analysis.
    ///
    /// Sprite-side rectangles in the result are divided by the same factor.
    pub sprite_prescale: f64,
    pub binarize: BinarizeParams,
    pub precondition: PreconditionConfig,
    pub background_regions: RegionParams,
    #[serde(deserialize_with = "sprite_regions_over_defaults")]
    pub sprite_regions: RegionParams,
    pub rotation: RotationParams,
    pub matching: MatchParams,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            sprite_prescale: 1.55,
            binarize: BinarizeParams::default(),
            precondition: PreconditionConfig::default(),
            background_regions: RegionParams::background(),
            sprite_regions: RegionParams::sprite(),
            rotation: RotationParams::default(),
            matching: MatchParams::default(),
        }
    }
}

/// Largest accepted [`SolveConfig::sprite_prescale`].
pub const MAX_SPRITE_PRESCALE: f64 = 10.0;

/// Deserialize a partial JSON object on top of `base`.
fn merge_onto<'de, T, D>(base: T, deserializer: D) -> Result<T, D::Error>
where
    T: Serialize + DeserializeOwned,
    D: Deserializer<'de>,
{
    let patch = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Object(fields) = patch else {
        return serde_json::from_value(patch).map_err(D::Error::custom);
    };
    let mut merged = serde_json::to_value(base).map_err(D::Error::custom)?;
    if let Some(target) = merged.as_object_mut() {
        target.extend(fields);
    }
    serde_json::from_value(merged).map_err(D::Error::custom)
}

fn sprite_regions_over_defaults<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<RegionParams, D::Error> {
    merge_onto(RegionParams::sprite(), deserializer)
}

fn sprite_precondition_over_defaults<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<PreconditionParams, D::Error> {
    merge_onto(PreconditionParams::sprite(), deserializer)
}

fn check_region_params(
    params: &RegionParams,
    overlap_name: &'static str,
    distance_name: &'static str,
) -> Result<(), ConfigError> {
    if let Some(t) = params.overlap_threshold {
        if !t.is_finite() || t < 0.0 {
            return Err(ConfigError::invalid(overlap_name, format!("must be >= 0, got {}", t)));
        }
    }
    if let Some(d) = params.merge_distance {
        if !d.is_finite() || d < 0.0 {
            return Err(ConfigError::invalid(distance_name, format!("must be >= 0, got {}", d)));
        }
    }
    Ok(())
}

impl SolveConfig {
    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter values no stage can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sprite_prescale.is_finite()
            || self.sprite_prescale <= 0.0
            || self.sprite_prescale > MAX_SPRITE_PRESCALE
        {
            return Err(ConfigError::invalid(
                "sprite_prescale",
                format!(
                    "must be in (0, {}], got {}",
                    MAX_SPRITE_PRESCALE, self.sprite_prescale
                ),
            ));
        }
        if self.rotation.step_deg == 0 {
            return Err(ConfigError::invalid("rotation.step_deg", "must be at least 1"));
        }
        if self.rotation.min_deg > self.rotation.max_deg {
            return Err(ConfigError::invalid(
                "rotation.min_deg",
                format!(
                    "must not exceed rotation.max_deg ({} > {})",
                    self.rotation.min_deg, self.rotation.max_deg
                ),
            ));
        }
        if self.precondition.background.rebinarize_threshold == u8::MAX
            || self.precondition.sprite.rebinarize_threshold == u8::MAX
        {
            return Err(ConfigError::invalid(
                "precondition.rebinarize_threshold",
                "must be below 255",
            ));
        }
        check_region_params(
            &self.background_regions,
            "background_regions.overlap_threshold",
            "background_regions.merge_distance",
        )?;
        check_region_params(
            &self.sprite_regions,
            "sprite_regions.overlap_threshold",
            "sprite_regions.merge_distance",
        )?;
        if self.background_regions.max_regions == Some(0) {
            return Err(ConfigError::invalid(
                "background_regions.max_regions",
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }
}
