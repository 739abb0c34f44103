//! Level-of-detail data model: renderer handles, detail levels, LOD groups, and
//! the [`LodHierarchy`] trait the fix walks over.

use serde::{Deserialize, Serialize};

/// Opaque handle to one renderable mesh instance.
///
/// Two handles are equal only if they name the same renderer. Two distinct
/// renderers with identical geometry have different handles and are never
/// merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RendererRef(pub u64);

impl RendererRef {
    /// Create a handle from a raw identity value.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identity value.
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// One complexity tier within a [`LodGroup`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailLevel {
    /// Screen-relative height below which this level switches to the next one.
    pub screen_relative_transition_height: f32,
    /// Renderers shown while this level is active. Order is significant only
    /// in that the fix never reorders it.
    #[serde(default)]
    pub renderers: Vec<RendererRef>,
}

impl DetailLevel {
    /// Create a detail level with the given transition height and renderers.
    pub fn new(screen_relative_transition_height: f32, renderers: Vec<RendererRef>) -> Self {
        Self {
            screen_relative_transition_height,
            renderers,
        }
    }
}

/// An ordered sequence of detail levels bundling all LODs of one visual object.
///
/// Index 0 is the highest detail, shown at the closest range.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodGroup {
    levels: Vec<DetailLevel>,
}

impl LodGroup {
    /// Create a group from its detail levels.
    pub fn new(levels: Vec<DetailLevel>) -> Self {
        Self { levels }
    }

    /// The current detail levels.
    pub fn levels(&self) -> &[DetailLevel] {
        &self.levels
    }

    /// Replace every detail level at once.
    ///
    /// This is the only write path, mirroring engines where each change to a
    /// group triggers a full recalculation of its bounds.
    pub fn set_levels(&mut self, levels: Vec<DetailLevel>) {
        self.levels = levels;
    }

    /// Iterate over every renderer referenced by any level, in level order.
    pub fn renderers(&self) -> impl Iterator<Item = RendererRef> + '_ {
        self.levels
            .iter()
            .flat_map(|level| level.renderers.iter().copied())
    }

    /// Returns `true` if any level references `renderer`.
    pub fn contains(&self, renderer: RendererRef) -> bool {
        self.renderers().any(|candidate| candidate == renderer)
    }
}

/// A node of an externally owned scene tree, as seen by the LOD fix.
///
/// Implementors expose the LOD groups attached directly to the node and its
/// children in a fixed order. Reads return snapshots; writes replace a
/// group's whole level list in one call.
pub trait LodHierarchy {
    /// Number of LOD groups attached directly to this node.
    fn lod_group_count(&self) -> usize;

    /// Snapshot of the detail levels of the group at `index`.
    fn lod_levels(&self, index: usize) -> Vec<DetailLevel>;

    /// Replace the detail levels of the group at `index`.
    fn set_lod_levels(&mut self, index: usize, levels: Vec<DetailLevel>);

    /// Number of direct children.
    fn child_count(&self) -> usize;

    /// Shared access to the child at `index`.
    fn child(&self, index: usize) -> &Self;

    /// Exclusive access to the child at `index`.
    fn child_mut(&mut self, index: usize) -> &mut Self;
}
