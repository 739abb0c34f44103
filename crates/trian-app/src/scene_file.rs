//! RON scene descriptions consumed and produced by the tool.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use trian_lod::SceneNode;

/// Errors reading or writing a scene file.
#[derive(Debug, thiserror::Error)]
pub enum SceneFileError {
    /// The file could not be read or written.
    #[error("scene file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid scene description.
    #[error("failed to parse scene {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// The scene could not be encoded as RON.
    #[error("failed to serialize scene: {0}")]
    Serialize(#[from] ron::Error),
}

/// RON recursion budget per hierarchy level. A node consumes four: its
/// `children` field, the list, the list entry, and the node struct.
const RON_NESTING_PER_LEVEL: usize = 8;

/// RON nesting outside the node tree: the document, `Some(..)`, and the
/// innermost renderer lists.
const RON_NESTING_SLACK: usize = 16;

/// RON options whose recursion limit fits a hierarchy `max_depth` levels deep.
///
/// `ron`'s default limit is far below the depths the fix accepts, so scenes
/// within the configured depth would otherwise fail to load or save.
pub fn ron_options(max_depth: usize) -> ron::Options {
    let limit = max_depth
        .saturating_mul(RON_NESTING_PER_LEVEL)
        .saturating_add(RON_NESTING_SLACK);
    ron::Options::default().with_recursion_limit(limit)
}

/// A scene tree as stored on disk.
///
/// `root` is optional so that an exporter producing an empty document still
/// yields a loadable file; fixing it reports the missing root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    /// Top of the scene tree, absent for an empty document.
    pub root: Option<SceneNode>,
}

impl SceneFile {
    /// Create a scene file holding `root`.
    pub fn new(root: SceneNode) -> Self {
        Self { root: Some(root) }
    }

    /// Parse a scene description from RON text, accepting hierarchies up to
    /// `max_depth` levels deep.
    pub fn from_ron(text: &str, path: &Path, max_depth: usize) -> Result<Self, SceneFileError> {
        ron_options(max_depth).from_str(text).map_err(|source| SceneFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a scene description from `path`.
    pub fn load(path: &Path, max_depth: usize) -> Result<Self, SceneFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| SceneFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scene = Self::from_ron(&text, path, max_depth)?;
        tracing::debug!(path = %path.display(), "loaded scene");
        Ok(scene)
    }

    /// Encode the scene as RON.
    pub fn to_ron(&self, pretty: bool, max_depth: usize) -> Result<String, SceneFileError> {
        let options = ron_options(max_depth);
        let text = if pretty {
            let config = ron::ser::PrettyConfig::new().struct_names(false);
            options.to_string_pretty(self, config)?
        } else {
            options.to_string(self)?
        };
        Ok(text)
    }

    /// Write the scene to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path, pretty: bool, max_depth: usize) -> Result<(), SceneFileError> {
        let text = self.to_ron(pretty, max_depth)?;
        let io_error = |source| SceneFileError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, text).map_err(io_error)?;
        tracing::debug!(path = %path.display(), "wrote scene");
        Ok(())
    }
}
