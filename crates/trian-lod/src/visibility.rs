//! Pinning the coarsest detail level of each LOD group so it never culls out.

use crate::model::LodHierarchy;

/// Set the transition height of the last detail level of every group below
/// `root` to 0, so each group keeps drawing its coarsest level at any
/// distance instead of switching off completely.
///
/// Groups without levels, and groups whose last level is already at 0, are
/// left untouched. Every other group gets one `set_lod_levels` call. Returns
/// the number of groups rewritten.
pub fn keep_last_level_visible<N: LodHierarchy>(root: &mut N) -> usize {
    let mut rewritten = 0;

    for index in 0..root.lod_group_count() {
        let mut levels = root.lod_levels(index);
        let Some(last) = levels.last_mut() else {
            continue;
        };
        if last.screen_relative_transition_height == 0.0 {
            continue;
        }
        last.screen_relative_transition_height = 0.0;
        root.set_lod_levels(index, levels);
        rewritten += 1;
    }

    for child in 0..root.child_count() {
        rewritten += keep_last_level_visible(root.child_mut(child));
    }
    rewritten
}
