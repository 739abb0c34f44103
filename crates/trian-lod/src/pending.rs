//! Staged renderer removals for detail levels and LOD groups.
//!
//! Rewriting a live group is expensive, so removals are recorded against a
//! snapshot and applied with a single bulk write once every nested group has
//! made its claims.

use crate::model::{DetailLevel, RendererRef};

/// Tracks which renderers should be dropped from one [`DetailLevel`].
#[derive(Clone, Debug)]
pub struct PendingLevelFix {
    level: DetailLevel,
    /// `keep[i]` tells whether `level.renderers[i]` survives.
    keep: Vec<bool>,
    removed: usize,
}

impl PendingLevelFix {
    /// Start tracking removals against a snapshot of `level`.
    pub fn new(level: DetailLevel) -> Self {
        let keep = vec![true; level.renderers.len()];
        Self {
            level,
            keep,
            removed: 0,
        }
    }

    /// Exclude the first still-included occurrence of `renderer`.
    ///
    /// Returns `false` when no included occurrence is left. A level listing
    /// the same renderer twice needs two calls to drop both copies.
    pub fn remove(&mut self, renderer: RendererRef) -> bool {
        let hit = self
            .level
            .renderers
            .iter()
            .zip(self.keep.iter())
            .position(|(&candidate, &kept)| kept && candidate == renderer);

        match hit {
            Some(index) => {
                self.keep[index] = false;
                self.removed += 1;
                true
            }
            None => false,
        }
    }

    /// Number of occurrences excluded so far.
    pub fn removed_count(&self) -> usize {
        self.removed
    }

    /// Produce the level without excluded renderers.
    ///
    /// The transition height is carried over untouched, and surviving
    /// renderers keep their relative order. The result may be empty.
    pub fn build(self) -> DetailLevel {
        if self.removed == 0 {
            return self.level;
        }

        tracing::debug!("removing {} renderers from LOD", self.removed);

        let expected = self.level.renderers.len() - self.removed;
        let renderers: Vec<RendererRef> = self
            .level
            .renderers
            .into_iter()
            .zip(self.keep)
            .filter_map(|(renderer, kept)| kept.then_some(renderer))
            .collect();
        debug_assert_eq!(renderers.len(), expected);

        DetailLevel {
            screen_relative_transition_height: self.level.screen_relative_transition_height,
            renderers,
        }
    }
}

/// Tracks which renderers should be dropped from every level of one LOD group.
#[derive(Clone, Debug)]
pub struct PendingGroupFix {
    levels: Vec<PendingLevelFix>,
    dirty: bool,
}

impl PendingGroupFix {
    /// Start tracking removals against a snapshot of a group's levels.
    pub fn new(levels: Vec<DetailLevel>) -> Self {
        Self {
            levels: levels.into_iter().map(PendingLevelFix::new).collect(),
            dirty: false,
        }
    }

    /// Mark `renderer` for removal from every level that still includes it.
    ///
    /// All included occurrences are excluded. Returns `true` if at least one
    /// occurrence was newly excluded, so a repeated call returns `false`.
    pub fn remove(&mut self, renderer: RendererRef) -> bool {
        let mut found = false;
        for level in &mut self.levels {
            while level.remove(renderer) {
                found = true;
            }
        }
        self.dirty |= found;
        found
    }

    /// Total number of renderer occurrences excluded across all levels.
    pub fn removed_count(&self) -> usize {
        self.levels.iter().map(PendingLevelFix::removed_count).sum()
    }

    /// Consume the fix and return the rebuilt level list, or `None` when
    /// nothing was removed and the live group should be left alone.
    pub fn commit(self) -> Option<Vec<DetailLevel>> {
        if !self.dirty {
            return None;
        }
        Some(self.levels.into_iter().map(PendingLevelFix::build).collect())
    }
}
