//! In-memory scene tree implementing [`LodHierarchy`].

use serde::{Deserialize, Serialize};

use crate::model::{DetailLevel, LodGroup, LodHierarchy};

/// A named scene node owning LOD groups and child nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneNode {
    /// Node name, used only for lookup and diagnostics.
    pub name: String,
    lod_groups: Vec<LodGroup>,
    children: Vec<SceneNode>,
}

impl SceneNode {
    /// Create a node with no groups and no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lod_groups: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: attach a LOD group.
    #[must_use]
    pub fn with_group(mut self, group: LodGroup) -> Self {
        self.lod_groups.push(group);
        self
    }

    /// Builder: append a child node.
    #[must_use]
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// LOD groups attached directly to this node, in order.
    pub fn lod_groups(&self) -> &[LodGroup] {
        &self.lod_groups
    }

    /// Mutable access to this node's LOD groups.
    pub fn lod_groups_mut(&mut self) -> &mut Vec<LodGroup> {
        &mut self.lod_groups
    }

    /// Direct children, in order.
    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Mutable access to the direct children.
    pub fn children_mut(&mut self) -> &mut Vec<SceneNode> {
        &mut self.children
    }

    /// Depth-first search for the first node named `name`, including `self`.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if node.name == name {
                return Some(node);
            }
            pending.extend(node.children.iter().rev());
        }
        None
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Total number of LOD groups in this subtree.
    pub fn group_count(&self) -> usize {
        self.lod_groups.len()
            + self
                .children
                .iter()
                .map(SceneNode::group_count)
                .sum::<usize>()
    }
}

impl LodHierarchy for SceneNode {
    fn lod_group_count(&self) -> usize {
        self.lod_groups.len()
    }

    fn lod_levels(&self, index: usize) -> Vec<DetailLevel> {
        self.lod_groups[index].levels().to_vec()
    }

    fn set_lod_levels(&mut self, index: usize, levels: Vec<DetailLevel>) {
        self.lod_groups[index].set_levels(levels);
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
