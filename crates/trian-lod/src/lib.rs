//! Level-of-detail renderer deduplication for nested LOD hierarchies.
//!
//! Imported terrain often nests independently authored LOD groups, and a
//! renderer claimed by a nested group may also be listed by a group on one of
//! its ancestors. Both groups would then draw it at overlapping distances.
//! [`fix_lod`] walks the hierarchy and leaves each shared renderer only in
//! the deepest group that references it.

mod error;
mod model;
mod pending;
mod scene;
mod visibility;
mod walker;

pub use error::LodFixError;
pub use model::{DetailLevel, LodGroup, LodHierarchy, RendererRef};
pub use pending::{PendingGroupFix, PendingLevelFix};
pub use scene::SceneNode;
pub use visibility::keep_last_level_visible;
pub use walker::{DEFAULT_MAX_DEPTH, FixReport, LodFixer, fix_lod, hierarchy_depth};
