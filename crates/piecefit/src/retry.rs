//! Bounded re-solve loop for callers that can fetch a fresh puzzle.
//!
//! Puzzles occasionally come out unsolvable (pieces touching, heavy JPEG
//! noise). The usual remedy is to request a new image pair and try again, up
//! to a fixed number of attempts.

use crate::error::SolveError;
use crate::pipeline::SolveResult;

/// Attempt cap for [`crate::Solver::solve_with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total solves attempted, including the first. Zero is treated as one.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// How a retry loop ended.
#[derive(Debug)]
pub enum RetryOutcome {
    /// A result passed the acceptance check.
    Solved { attempts: u32, result: SolveResult },
    /// Every attempt was rejected or failed.
    Exhausted {
        attempts: u32,
        /// Most recent result that solved but was not accepted.
        last_result: Option<SolveResult>,
        /// Most recent failure, if the last attempts failed outright.
        last_error: Option<SolveError>,
    },
}

impl RetryOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Solved { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// The accepted result, if any.
    pub fn solved(self) -> Option<SolveResult> {
        match self {
            Self::Solved { result, .. } => Some(result),
            Self::Exhausted { .. } => None,
        }
    }
}

/// Run `attempt(n)` for `n = 1..=max_attempts` until `accept` approves a
/// result. Configuration errors stop the loop and are returned as `Err`;
/// image errors are recorded and retried.
pub(crate) fn retry_loop<F, A>(
    policy: RetryPolicy,
    mut attempt: F,
    mut accept: A,
) -> Result<RetryOutcome, SolveError>
where
    F: FnMut(u32) -> Result<SolveResult, SolveError>,
    A: FnMut(&SolveResult) -> bool,
{
    let max = policy.max_attempts.max(1);
    let mut last_result = None;
    let mut last_error = None;

    for n in 1..=max {
        match attempt(n) {
            Ok(result) if accept(&result) => {
                tracing::info!("solved on attempt {}/{}", n, max);
                return Ok(RetryOutcome::Solved {
                    attempts: n,
                    result,
                });
            }
            Ok(result) => {
                tracing::warn!(
                    "attempt {}/{} rejected: {} of {} sprites matched",
                    n,
                    max,
                    result.matches.len(),
                    result.sprite_regions.len()
                );
                last_result = Some(result);
                last_error = None;
            }
            Err(SolveError::Config(e)) => return Err(SolveError::Config(e)),
            Err(e) => {
                tracing::warn!("attempt {}/{} failed: {}", n, max, e);
                last_error = Some(e);
            }
        }
    }

    Ok(RetryOutcome::Exhausted {
        attempts: max,
        last_result,
        last_error,
    })
}
