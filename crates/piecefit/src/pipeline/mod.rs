//! High-level solve pipeline.
//!
//! This module is the internal "glue" layer that wires together detector stages:
//! prescale -> binarize/precondition -> regions -> rotation sweep -> scoring -> assignment.
//!
//! Algorithmic primitives live in `crate::detector` and `crate::mask`.
//! The pipeline layer focuses on stage boundaries, call order, and data flow.

mod result;
mod run;

pub use result::SolveResult;
pub use run::solve;
pub(crate) use run::run;
