//! One LOD fix run: load a scene file, fix it, and write the result.

use std::path::{Path, PathBuf};

use trian_config::{Config, ConfigError};
use trian_lod::{FixReport, LodFixError, LodFixer, keep_last_level_visible};
use trian_log::LogError;

use crate::platform::PlatformError;
use crate::scene_file::{SceneFile, SceneFileError};

/// Anything that can stop the tool.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The configuration could not be loaded or holds an unusable value.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be set up or reconfigured.
    #[error(transparent)]
    Log(#[from] LogError),

    /// The platform config or log directory could not be resolved or created.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The scene file could not be read, parsed, or written.
    #[error(transparent)]
    SceneFile(#[from] SceneFileError),

    /// The worker thread running the fix could not be started.
    #[error("failed to start worker thread: {0}")]
    Worker(#[source] std::io::Error),

    /// The scene was loaded but the fix refused it.
    #[error("LOD fix failed for {}: {source}", .path.display())]
    Fix {
        path: PathBuf,
        #[source]
        source: LodFixError,
    },
}

/// Outcome of [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// What the fix pass did.
    pub report: FixReport,
    /// Groups whose last level was set to stay visible at any distance.
    pub last_levels_pinned: usize,
    /// Where the fixed scene was written, or `None` on a dry run.
    pub written_to: Option<PathBuf>,
}

/// Decide where the fixed scene goes.
///
/// An explicit output path wins. Otherwise the input is overwritten when the
/// config asks for it, or the config suffix is appended to the input stem.
pub fn output_path(input: &Path, config: &Config, explicit: Option<&Path>) -> PathBuf {
    if let Some(explicit) = explicit {
        return explicit.to_path_buf();
    }
    if config.output.overwrite_input {
        return input.to_path_buf();
    }

    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut file_name = format!("{stem}{}", config.output.suffix);
    if let Some(ext) = input.extension() {
        file_name.push('.');
        file_name.push_str(&ext.to_string_lossy());
    }
    input.with_file_name(file_name)
}

/// Load `input`, fix its LOD groups, and unless this is a dry run write the
/// fixed scene to `output`.
///
/// With `fix.last_level_always_visible` set, the last level of every group is
/// pinned to a transition height of 0 after the fix. Nothing is written when
/// loading or fixing fails.
pub fn run(config: &Config, input: &Path, output: &Path) -> Result<RunSummary, AppError> {
    config.validate()?;

    let fixer = LodFixer::new(config.fix.max_depth);
    let mut scene = SceneFile::load(input, fixer.max_depth())?;
    tracing::info!(
        input = %input.display(),
        max_depth = fixer.max_depth(),
        "fixing LOD groups"
    );

    let report = fixer
        .fix(scene.root.as_mut())
        .map_err(|source| AppError::Fix {
            path: input.to_path_buf(),
            source,
        })?;

    let mut last_levels_pinned = 0;
    if config.fix.last_level_always_visible
        && let Some(root) = scene.root.as_mut()
    {
        last_levels_pinned = keep_last_level_visible(root);
        tracing::info!(groups = last_levels_pinned, "pinned last LOD levels");
    }

    if config.fix.dry_run {
        tracing::info!("dry run, not writing {}", output.display());
        return Ok(RunSummary {
            report,
            last_levels_pinned,
            written_to: None,
        });
    }

    scene.save(output, config.output.pretty, fixer.max_depth())?;
    tracing::info!(output = %output.display(), "wrote fixed scene");

    Ok(RunSummary {
        report,
        last_levels_pinned,
        written_to: Some(output.to_path_buf()),
    })
}
