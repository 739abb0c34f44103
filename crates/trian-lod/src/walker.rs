//! Depth-first hierarchy walk that strips renderers from ancestor LOD groups.

use crate::error::LodFixError;
use crate::model::LodHierarchy;
use crate::pending::PendingGroupFix;

/// Default maximum hierarchy depth accepted by [`fix_lod`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Summary of one fix pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixReport {
    /// Nodes entered by the walk.
    pub nodes_visited: usize,
    /// Pending group fixes pushed onto the ancestor stack.
    pub groups_opened: usize,
    /// Pending group fixes popped and committed.
    pub groups_closed: usize,
    /// Groups whose levels were written back.
    pub groups_rewritten: usize,
    /// Renderer occurrences removed across all groups.
    pub renderers_removed: usize,
    /// Deepest node depth reached (a lone root has depth 1).
    pub max_depth_seen: usize,
}

impl FixReport {
    /// Returns `true` if every opened group fix was closed again.
    pub fn is_balanced(&self) -> bool {
        self.groups_opened == self.groups_closed
    }

    /// Returns `true` if the pass did not write to any group.
    pub fn is_noop(&self) -> bool {
        self.groups_rewritten == 0
    }
}

/// Removes renderers shared between LOD groups and the LOD groups nested
/// below them, giving priority to the deeper groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LodFixer {
    max_depth: usize,
}

impl Default for LodFixer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl LodFixer {
    /// Create a fixer that rejects hierarchies deeper than `max_depth`.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// The configured depth limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Fix the hierarchy below `root` in place.
    ///
    /// The root is validated and the depth limit checked before any group is
    /// touched, so an error leaves the hierarchy exactly as it was.
    pub fn fix<N: LodHierarchy>(&self, root: Option<&mut N>) -> Result<FixReport, LodFixError> {
        let root = root.ok_or(LodFixError::MissingRoot)?;

        let depth = hierarchy_depth(&*root);
        if depth > self.max_depth {
            return Err(LodFixError::DepthLimitExceeded {
                depth,
                limit: self.max_depth,
            });
        }

        let _span = tracing::info_span!("fix_lod", depth).entered();

        let mut open = Vec::new();
        let mut report = FixReport::default();
        fix_recursively(root, &mut open, 1, &mut report);
        debug_assert!(open.is_empty());
        debug_assert!(report.is_balanced());

        tracing::info!(
            nodes = report.nodes_visited,
            groups = report.groups_closed,
            rewritten = report.groups_rewritten,
            removed = report.renderers_removed,
            "LOD fix finished"
        );
        Ok(report)
    }
}

/// Fix the hierarchy below `root` with the default depth limit.
///
/// See [`LodFixer::fix`].
pub fn fix_lod<N: LodHierarchy>(root: Option<&mut N>) -> Result<FixReport, LodFixError> {
    LodFixer::default().fix(root)
}

/// Depth of the hierarchy below `root`, counting `root` itself as 1.
///
/// Iterative, so it is safe to call on hierarchies too deep to recurse into.
pub fn hierarchy_depth<N: LodHierarchy>(root: &N) -> usize {
    let mut deepest = 0;
    let mut pending = vec![(root, 1)];
    while let Some((node, depth)) = pending.pop() {
        deepest = deepest.max(depth);
        pending.extend((0..node.child_count()).map(|index| (node.child(index), depth + 1)));
    }
    deepest
}

/// Strip renderers used by groups on `node` from every open ancestor fix,
/// recurse into the children, then commit the groups opened here.
///
/// `open` holds the pending fixes of every group on the path from the root.
/// On return it has the same length as on entry.
fn fix_recursively<N: LodHierarchy>(
    node: &mut N,
    open: &mut Vec<PendingGroupFix>,
    depth: usize,
    report: &mut FixReport,
) {
    report.nodes_visited += 1;
    report.max_depth_seen = report.max_depth_seen.max(depth);

    let base = open.len();
    let local_groups = node.lod_group_count();

    for index in 0..local_groups {
        let levels = node.lod_levels(index);
        for renderer in levels.iter().flat_map(|level| level.renderers.iter().copied()) {
            for ancestor in open.iter_mut() {
                ancestor.remove(renderer);
            }
        }
        open.push(PendingGroupFix::new(levels));
        report.groups_opened += 1;
    }

    for child in 0..node.child_count() {
        fix_recursively(node.child_mut(child), open, depth + 1, report);
        debug_assert_eq!(open.len(), base + local_groups);
    }

    let local = open.split_off(base);
    debug_assert_eq!(local.len(), local_groups);

    // Stack order: last opened is committed first.
    for (index, fix) in local.into_iter().enumerate().rev() {
        let removed = fix.removed_count();
        if let Some(levels) = fix.commit() {
            tracing::debug!(group = index, depth, removed, "rewriting LOD group");
            node.set_lod_levels(index, levels);
            report.groups_rewritten += 1;
            report.renderers_removed += removed;
        }
        report.groups_closed += 1;
    }

    debug_assert_eq!(open.len(), base);
}
