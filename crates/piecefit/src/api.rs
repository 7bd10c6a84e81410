//! High-level solving API.
//!
//! [`Solver`] is the primary entry point. It wraps a [`SolveConfig`] and
//! provides convenience methods for the common input forms (decoded images,
//! [`ImageSource`]s, and a bounded retry loop over freshly fetched pairs).

use std::path::Path;

use image::RgbImage;

use crate::config::SolveConfig;
use crate::error::{ConfigError, ImageRole, SolveError};
use crate::pipeline::{self, SolveResult};
use crate::retry::{retry_loop, RetryOutcome, RetryPolicy};
use crate::source::ImageSource;

/// Primary solving interface.
///
/// Create once, solve many puzzles.
///
/// # Examples
///
/// ```no_run
/// use piecefit::{ImageSource, Solver};
///
/// let solver = Solver::new();
/// let result = solver
///     .solve_sources(
///         &ImageSource::Path("captcha.jpg".into()),
///         &ImageSource::Path("sprite.jpg".into()),
///     )
///     .unwrap();
/// for [x, y] in result.drop_points() {
///     println!("drop at ({x:.1}, {y:.1})");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolveConfig,
}

impl Solver {
    /// Create a solver with the default tuned configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with full config control.
    pub fn with_config(config: SolveConfig) -> Self {
        Self { config }
    }

    /// Load a JSON configuration file and create a solver in one step.
    pub fn from_config_file(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::with_config(SolveConfig::from_json_file(path)?))
    }

    /// Access the current configuration.
    pub fn config(&self) -> &SolveConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut SolveConfig {
        &mut self.config
    }

    /// Solve a decoded background/sprite pair.
    pub fn solve(&self, background: &RgbImage, sprite: &RgbImage) -> Result<SolveResult, ConfigError> {
        pipeline::solve(background, sprite, &self.config)
    }

    /// Decode both inputs, then solve.
    ///
    /// The configuration is checked before either image is decoded.
    pub fn solve_sources(
        &self,
        background: &ImageSource,
        sprite: &ImageSource,
    ) -> Result<SolveResult, SolveError> {
        self.config.validate()?;
        let bg = background.load_as(ImageRole::Background)?;
        let sp = sprite.load_as(ImageRole::Sprite)?;
        Ok(pipeline::run(&bg, &sp, &self.config))
    }

    /// Solve freshly fetched pairs until `accept` approves a result or the
    /// policy's attempt cap is reached.
    ///
    /// `fetch` receives the 1-based attempt number. Image decoding failures
    /// count as failed attempts; configuration errors are returned at once.
    pub fn solve_with_retry<F, A>(
        &self,
        policy: RetryPolicy,
        mut fetch: F,
        accept: A,
    ) -> Result<RetryOutcome, SolveError>
    where
        F: FnMut(u32) -> (ImageSource, ImageSource),
        A: FnMut(&SolveResult) -> bool,
    {
        self.config.validate()?;
        retry_loop(
            policy,
            |n| {
                let (background, sprite) = fetch(n);
                self.solve_sources(&background, &sprite)
            },
            accept,
        )
    }
}
