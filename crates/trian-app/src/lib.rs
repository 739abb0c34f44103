//! Command-line front end for the Trian LOD fix.
//!
//! Reads a RON scene description, removes renderers shared between nested
//! LOD groups, and writes the fixed scene back out.

pub mod platform;
pub mod runner;
pub mod scene_file;

pub use runner::{AppError, RunSummary, output_path, run};
pub use scene_file::{SceneFile, SceneFileError};
