//! End-to-end behavior of the LOD fix over whole hierarchies.

use trian_lod::{
    DetailLevel, LodFixError, LodGroup, LodHierarchy, RendererRef, SceneNode, fix_lod,
    keep_last_level_visible,
};

fn r(id: u64) -> RendererRef {
    RendererRef::new(id)
}

fn level(height: f32, ids: &[u64]) -> DetailLevel {
    DetailLevel::new(height, ids.iter().copied().map(r).collect())
}

fn group(ids: &[u64]) -> LodGroup {
    LodGroup::new(vec![level(0.5, ids)])
}

/// Scene node that counts writes to its LOD groups.
#[derive(Default)]
struct CountingNode {
    groups: Vec<Vec<DetailLevel>>,
    children: Vec<CountingNode>,
    writes: usize,
}

impl CountingNode {
    fn new(groups: Vec<Vec<DetailLevel>>, children: Vec<CountingNode>) -> Self {
        Self {
            groups,
            children,
            writes: 0,
        }
    }

    fn total_writes(&self) -> usize {
        self.writes + self.children.iter().map(CountingNode::total_writes).sum::<usize>()
    }
}

impl LodHierarchy for CountingNode {
    fn lod_group_count(&self) -> usize {
        self.groups.len()
    }

    fn lod_levels(&self, index: usize) -> Vec<DetailLevel> {
        self.groups[index].clone()
    }

    fn set_lod_levels(&mut self, index: usize, levels: Vec<DetailLevel>) {
        self.writes += 1;
        self.groups[index] = levels;
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> &Self {
        &self.children[index]
    }

    fn child_mut(&mut self, index: usize) -> &mut Self {
        &mut self.children[index]
    }
}

/// A parent loses a renderer its child also uses; the child keeps it.
#[test]
fn test_parent_child_scenario() {
    let mut a = SceneNode::new("A")
        .with_group(group(&[1, 2]))
        .with_child(SceneNode::new("B").with_group(group(&[2, 3])));

    fix_lod(Some(&mut a)).unwrap();

    assert_eq!(a.lod_groups()[0], group(&[1]));
    assert_eq!(a.find("B").unwrap().lod_groups()[0], group(&[2, 3]));
}

/// In a three-level chain only the deepest group keeps the shared renderer.
#[test]
fn test_three_level_chain() {
    let mut a = SceneNode::new("A").with_group(group(&[9, 1])).with_child(
        SceneNode::new("B")
            .with_group(group(&[2, 9]))
            .with_child(SceneNode::new("C").with_group(group(&[9]))),
    );

    let report = fix_lod(Some(&mut a)).unwrap();

    assert_eq!(a.lod_groups()[0], group(&[1]));
    assert_eq!(a.find("B").unwrap().lod_groups()[0], group(&[2]));
    assert_eq!(a.find("C").unwrap().lod_groups()[0], group(&[9]));
    assert_eq!(report.groups_rewritten, 2);
    assert_eq!(report.renderers_removed, 2);
}

/// Unrelated siblings both keep a renderer they share.
#[test]
fn test_siblings_are_not_deduplicated() {
    let mut root = SceneNode::new("root")
        .with_child(SceneNode::new("left").with_group(group(&[5])))
        .with_child(SceneNode::new("right").with_group(group(&[5])));

    let report = fix_lod(Some(&mut root)).unwrap();

    assert_eq!(root.find("left").unwrap().lod_groups()[0], group(&[5]));
    assert_eq!(root.find("right").unwrap().lod_groups()[0], group(&[5]));
    assert!(report.is_noop());
}

/// Claims from every descendant path are collected before the ancestor commits.
#[test]
fn test_claims_from_several_subtrees() {
    let mut root = SceneNode::new("root")
        .with_group(group(&[1, 2, 3, 4]))
        .with_child(SceneNode::new("a").with_group(group(&[1])))
        .with_child(SceneNode::new("b").with_child(SceneNode::new("b0").with_group(group(&[3]))));

    fix_lod(Some(&mut root)).unwrap();

    assert_eq!(root.lod_groups()[0], group(&[2, 4]));
}

/// A subtree claim does not leak into a sibling subtree's groups.
#[test]
fn test_claim_does_not_cross_into_sibling_subtree() {
    let mut root = SceneNode::new("root")
        .with_child(
            SceneNode::new("a")
                .with_group(group(&[7, 8]))
                .with_child(SceneNode::new("a0").with_group(group(&[7]))),
        )
        .with_child(SceneNode::new("b").with_group(group(&[8])));

    fix_lod(Some(&mut root)).unwrap();

    assert_eq!(root.find("a").unwrap().lod_groups()[0], group(&[8]));
    assert_eq!(root.find("b").unwrap().lod_groups()[0], group(&[8]));
}

/// Running the fix a second time changes nothing and writes nothing.
#[test]
fn test_idempotent() {
    let mut root = SceneNode::new("root")
        .with_group(LodGroup::new(vec![level(0.6, &[1, 2, 3]), level(0.2, &[4, 2])]))
        .with_child(
            SceneNode::new("child")
                .with_group(group(&[2]))
                .with_child(SceneNode::new("grandchild").with_group(group(&[3, 2]))),
        );

    let first = fix_lod(Some(&mut root)).unwrap();
    assert!(!first.is_noop());
    let after_first = root.clone();

    let second = fix_lod(Some(&mut root)).unwrap();
    assert!(second.is_noop());
    assert_eq!(second.renderers_removed, 0);
    assert_eq!(root, after_first);
}

/// Every renderer on an ancestor chain ends up in exactly one group.
#[test]
fn test_completeness_along_chain() {
    let mut root = SceneNode::new("n0").with_group(group(&[1, 2, 3])).with_child(
        SceneNode::new("n1")
            .with_group(group(&[1, 2]))
            .with_child(SceneNode::new("n2").with_group(group(&[1]))),
    );

    fix_lod(Some(&mut root)).unwrap();

    for id in 1..=3 {
        let owners = ["n0", "n1", "n2"]
            .iter()
            .filter(|name| root.find(name).unwrap().lod_groups()[0].contains(r(id)))
            .count();
        assert_eq!(owners, 1, "renderer {id} owned by {owners} groups");
    }
    assert!(root.find("n2").unwrap().lod_groups()[0].contains(r(1)));
    assert!(root.find("n1").unwrap().lod_groups()[0].contains(r(2)));
    assert!(root.find("n0").unwrap().lod_groups()[0].contains(r(3)));
}

/// Survivors keep their input order, and untouched levels are unchanged.
#[test]
fn test_order_preserved() {
    let mut root = SceneNode::new("root")
        .with_group(LodGroup::new(vec![
            level(0.6, &[5, 3, 9, 1, 7]),
            level(0.3, &[8, 6, 4]),
        ]))
        .with_child(SceneNode::new("child").with_group(group(&[9, 3])));

    fix_lod(Some(&mut root)).unwrap();

    let levels = root.lod_groups()[0].levels();
    assert_eq!(levels[0], level(0.6, &[5, 1, 7]));
    assert_eq!(levels[1], level(0.3, &[8, 6, 4]));
}

/// Transition heights survive removal, even when a level empties out.
#[test]
fn test_thresholds_preserved_when_level_empties() {
    let mut root = SceneNode::new("root")
        .with_group(LodGroup::new(vec![
            level(0.6, &[1, 2]),
            level(0.25, &[3]),
            level(0.05, &[3]),
        ]))
        .with_child(SceneNode::new("child").with_group(group(&[3])));

    fix_lod(Some(&mut root)).unwrap();

    let levels = root.lod_groups()[0].levels();
    assert_eq!(levels.len(), 3);
    assert_eq!(levels[0], level(0.6, &[1, 2]));
    assert_eq!(levels[1], level(0.25, &[]));
    assert_eq!(levels[2], level(0.05, &[]));
}

/// A group emptied of every renderer is kept in place.
#[test]
fn test_fully_emptied_group_is_kept() {
    let mut root = SceneNode::new("root")
        .with_group(group(&[1]))
        .with_child(SceneNode::new("child").with_group(group(&[1])));

    fix_lod(Some(&mut root)).unwrap();

    assert_eq!(root.lod_groups().len(), 1);
    assert_eq!(root.lod_groups()[0], group(&[]));
}

/// A duplicated entry in an ancestor level is stripped completely.
#[test]
fn test_duplicated_ancestor_entry_removed() {
    let mut root = SceneNode::new("root")
        .with_group(group(&[4, 1, 4]))
        .with_child(SceneNode::new("child").with_group(group(&[4])));

    let report = fix_lod(Some(&mut root)).unwrap();

    assert_eq!(root.lod_groups()[0], group(&[1]));
    assert_eq!(report.renderers_removed, 2);
}

/// A hierarchy with no shared renderers produces zero group writes.
#[test]
fn test_no_shared_renderers_writes_nothing() {
    let mut root = CountingNode::new(
        vec![vec![level(0.5, &[1, 2])], vec![level(0.4, &[3])]],
        vec![
            CountingNode::new(
                vec![vec![level(0.5, &[4])]],
                vec![CountingNode::new(vec![vec![level(0.5, &[5])]], vec![])],
            ),
            CountingNode::new(vec![vec![level(0.5, &[6])]], vec![]),
        ],
    );

    let report = fix_lod(Some(&mut root)).unwrap();

    assert_eq!(root.total_writes(), 0);
    assert!(report.is_noop());
    assert_eq!(report.groups_opened, 5);
}

/// A shared renderer produces exactly one write to the losing group.
#[test]
fn test_single_bulk_write_per_group() {
    let mut root = CountingNode::new(
        vec![vec![level(0.6, &[1, 2]), level(0.2, &[1, 3])]],
        vec![CountingNode::new(
            vec![vec![level(0.5, &[1, 2, 3])]],
            vec![],
        )],
    );

    fix_lod(Some(&mut root)).unwrap();

    assert_eq!(root.writes, 1);
    assert_eq!(root.children[0].writes, 0);
    assert_eq!(root.groups[0], vec![level(0.6, &[]), level(0.2, &[])]);
}

/// Opened and closed group fix counts match across a large tree.
#[test]
fn test_stack_balance_on_wide_tree() {
    let mut root = SceneNode::new("root").with_group(group(&[0]));
    for i in 0..8 {
        let mut child = SceneNode::new(format!("c{i}")).with_group(group(&[i]));
        for j in 0..4 {
            child = child.with_child(
                SceneNode::new(format!("c{i}_{j}"))
                    .with_group(group(&[i, 100 + j]))
                    .with_group(group(&[200])),
            );
        }
        root = root.with_child(child);
    }

    let report = fix_lod(Some(&mut root)).unwrap();

    assert!(report.is_balanced());
    assert_eq!(report.groups_opened, root.group_count());
    assert_eq!(report.nodes_visited, root.node_count());
    assert_eq!(report.max_depth_seen, 3);
}

/// Pinning the last level writes each group at most once and skips groups
/// without levels.
#[test]
fn test_last_level_pinned_with_one_write_per_group() {
    let mut root = CountingNode::new(
        vec![vec![level(0.6, &[1]), level(0.3, &[2]), level(0.1, &[3])], vec![]],
        vec![CountingNode::new(
            vec![vec![level(0.5, &[4])], vec![level(0.4, &[5]), level(0.0, &[6])]],
            vec![],
        )],
    );

    let pinned = keep_last_level_visible(&mut root);

    assert_eq!(pinned, 2);
    assert_eq!(root.writes, 1);
    assert_eq!(root.children[0].writes, 1);
    assert_eq!(root.groups[1], Vec::<DetailLevel>::new());
    assert_eq!(
        root.groups[0],
        vec![level(0.6, &[1]), level(0.3, &[2]), level(0.0, &[3])]
    );
    assert_eq!(root.children[0].groups[0], vec![level(0.0, &[4])]);
}

/// Pinning after the fix keeps the renderer split the fix produced.
#[test]
fn test_pin_after_fix_keeps_ownership() {
    let mut root = SceneNode::new("root")
        .with_group(LodGroup::new(vec![level(0.6, &[1, 2]), level(0.2, &[3])]))
        .with_child(SceneNode::new("child").with_group(group(&[2])));

    fix_lod(Some(&mut root)).unwrap();
    keep_last_level_visible(&mut root);

    assert_eq!(
        root.lod_groups()[0],
        LodGroup::new(vec![level(0.6, &[1]), level(0.0, &[3])])
    );
    assert_eq!(root.find("child").unwrap().lod_groups()[0], LodGroup::new(vec![level(0.0, &[2])]));
}

/// A missing root is an invalid argument.
#[test]
fn test_missing_root_rejected() {
    let result = fix_lod::<CountingNode>(None);
    assert!(matches!(result, Err(LodFixError::MissingRoot)));
}
