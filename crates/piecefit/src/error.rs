//! Error types surfaced by the public API.
//!
//! Only two things can fail in a solve: decoding an input image and an
//! invalid configuration. Every stage after those checks is total.

use std::path::PathBuf;

// ── Image loading ──────────────────────────────────────────────────────────

/// Which of the two solver inputs an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Background,
    Sprite,
    /// Image loaded outside of a solve (CLI helpers, tooling).
    Standalone,
}

impl std::fmt::Display for ImageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Background => f.write_str("background"),
            Self::Sprite => f.write_str("sprite"),
            Self::Standalone => f.write_str("input"),
        }
    }
}

/// Failure to obtain pixels from an [`crate::ImageSource`].
#[derive(Debug)]
pub enum ImageLoadError {
    /// Reading the file or stream failed.
    Io {
        role: ImageRole,
        path: Option<PathBuf>,
        source: std::io::Error,
    },
    /// The bytes could not be decoded as an image.
    Decode {
        role: ImageRole,
        source: image::ImageError,
    },
}

impl ImageLoadError {
    /// Input the error refers to.
    pub fn role(&self) -> ImageRole {
        match self {
            Self::Io { role, .. } | Self::Decode { role, .. } => *role,
        }
    }
}

impl std::fmt::Display for ImageLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io {
                role,
                path: Some(path),
                source,
            } => write!(f, "failed to read {} image {}: {}", role, path.display(), source),
            Self::Io {
                role,
                path: None,
                source,
            } => write!(f, "failed to read {} image: {}", role, source),
            Self::Decode { role, source } => {
                write!(f, "failed to decode {} image: {}", role, source)
            }
        }
    }
}

impl std::error::Error for ImageLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

// ── Configuration ──────────────────────────────────────────────────────────

/// Invalid solver configuration, reported before any image work begins.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Strategy selector did not name a known strategy.
    UnknownStrategy(String),
    /// A parameter is outside its valid domain.
    InvalidParameter {
        /// Dotted path of the offending field.
        name: &'static str,
        /// Human-readable constraint that was violated.
        reason: String,
    },
    /// Configuration file could not be read.
    Read { path: PathBuf, message: String },
    /// Configuration file is not valid JSON for [`crate::SolveConfig`].
    Parse { path: PathBuf, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownStrategy(name) => write!(
                f,
                "unknown matching strategy '{}' (expected 'brute-force' or 'correlation')",
                name
            ),
            Self::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter {}: {}", name, reason)
            }
            Self::Read { path, message } => {
                write!(f, "failed to read config {}: {}", path.display(), message)
            }
            Self::Parse { path, message } => {
                write!(f, "failed to parse config {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ── Umbrella ───────────────────────────────────────────────────────────────

/// Any failure of a solve call.
#[derive(Debug)]
pub enum SolveError {
    Config(ConfigError),
    ImageLoad(ImageLoadError),
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {}", e),
            Self::ImageLoad(e) => write!(f, "image load error: {}", e),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::ImageLoad(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SolveError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ImageLoadError> for SolveError {
    fn from(e: ImageLoadError) -> Self {
        Self::ImageLoad(e)
    }
}
