//! Control nodes and the edge-midpoint nodes they own.
//!
//! Every sample of a scalar field becomes a [`ControlNode`]. Each control
//! node owns three [`Node`]s in the grid's flat node array: its corner, the
//! midpoint of the edge above it and the midpoint of the edge to its right.
//! Neighbouring cells address those midpoints by [`NodeId`], so a shared
//! edge is always the same node and contributes a single vertex.

use glam::{Vec2, Vec3};

/// Nodes stored per control node (corner, above, right).
const SLOTS_PER_CONTROL: usize = 3;

/// Handle to a [`Node`] in a cell grid's flat node array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The corner node of a control node.
    #[must_use]
    pub const fn corner(control: usize) -> Self {
        Self(control * SLOTS_PER_CONTROL)
    }

    /// The midpoint of the edge above a control node.
    #[must_use]
    pub const fn above(control: usize) -> Self {
        Self(control * SLOTS_PER_CONTROL + 1)
    }

    /// The midpoint of the edge right of a control node.
    #[must_use]
    pub const fn right(control: usize) -> Self {
        Self(control * SLOTS_PER_CONTROL + 2)
    }

    /// Index into the node array.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Index of the owning control node.
    #[must_use]
    pub const fn control(self) -> usize {
        self.0 / SLOTS_PER_CONTROL
    }

    /// Number of node slots needed for `controls` control nodes.
    #[must_use]
    pub const fn slots_for(controls: usize) -> usize {
        controls * SLOTS_PER_CONTROL
    }
}

/// A mesh point with a lazily assigned vertex index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// World-space position
    pub position: Vec2,
    /// Index into the vertex buffer, assigned on first use
    vertex_index: Option<u32>,
}

impl Node {
    /// Creates a node with no vertex assigned yet.
    #[must_use]
    pub const fn new(position: Vec2) -> Self {
        Self {
            position,
            vertex_index: None,
        }
    }

    /// Returns the assigned vertex index, if any.
    #[must_use]
    pub const fn vertex_index(&self) -> Option<u32> {
        self.vertex_index
    }

    /// Returns this node's vertex index, appending its position to
    /// `vertices` the first time it is referenced.
    pub fn vertex_index_or_insert(&mut self, vertices: &mut Vec<Vec3>) -> u32 {
        if let Some(index) = self.vertex_index {
            return index;
        }
        let index = vertices.len() as u32;
        vertices.push(self.position.extend(0.0));
        self.vertex_index = Some(index);
        index
    }
}

/// One scalar-field sample placed in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlNode {
    /// World-space position of the sample
    pub position: Vec2,
    /// Whether the sample is solid (`sample >= 0`)
    pub active: bool,
    /// Raw iso-value magnitude
    pub iso_value: u32,
}

impl ControlNode {
    /// Creates a control node from a signed sample.
    #[must_use]
    pub const fn new(position: Vec2, sample: i32) -> Self {
        Self {
            position,
            active: sample >= 0,
            iso_value: sample.unsigned_abs(),
        }
    }

    /// Position of the midpoint on the edge above this node.
    #[must_use]
    pub fn above_position(&self, cell_size: f32) -> Vec2 {
        self.position + Vec2::new(0.0, cell_size / 2.0)
    }

    /// Position of the midpoint on the edge right of this node.
    #[must_use]
    pub fn right_position(&self, cell_size: f32) -> Vec2 {
        self.position + Vec2::new(cell_size / 2.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ids_are_distinct_per_control() {
        let ids = [NodeId::corner(4), NodeId::above(4), NodeId::right(4)];
        assert_eq!(ids[0].index(), 12);
        assert_eq!(ids[1].index(), 13);
        assert_eq!(ids[2].index(), 14);
        assert!(ids.iter().all(|id| id.control() == 4));
        assert_eq!(NodeId::corner(5).index(), 15);
    }

    #[test]
    fn test_vertex_assigned_once() {
        let mut vertices = Vec::new();
        let mut node = Node::new(Vec2::new(1.0, 2.0));
        assert_eq!(node.vertex_index(), None);

        assert_eq!(node.vertex_index_or_insert(&mut vertices), 0);
        assert_eq!(node.vertex_index_or_insert(&mut vertices), 0);
        assert_eq!(vertices, vec![Vec3::new(1.0, 2.0, 0.0)]);

        let mut other = Node::new(Vec2::ZERO);
        assert_eq!(other.vertex_index_or_insert(&mut vertices), 1);
        assert_eq!(vertices.len(), 2);
    }

    #[test]
    fn test_control_node_sign() {
        let solid = ControlNode::new(Vec2::ZERO, 42);
        assert!(solid.active);
        assert_eq!(solid.iso_value, 42);

        let empty = ControlNode::new(Vec2::ZERO, -17);
        assert!(!empty.active);
        assert_eq!(empty.iso_value, 17);

        // Zero counts as solid.
        assert!(ControlNode::new(Vec2::ZERO, 0).active);
    }

    #[test]
    fn test_midpoint_positions() {
        let node = ControlNode::new(Vec2::new(2.0, 3.0), 1);
        assert_eq!(node.above_position(2.0), Vec2::new(2.0, 4.0));
        assert_eq!(node.right_position(2.0), Vec2::new(3.0, 3.0));
    }
}
