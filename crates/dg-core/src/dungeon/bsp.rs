//! Binary space partition tree
//!
//! Nodes live in a single arena (`Vec<Node>`) and refer to each other by
//! index, so the whole tree is dropped at once when generation is done.
//! Building, traversal and folding all use explicit stacks: degenerate
//! minimum sizes can make the tree deep.

use log::trace;

use crate::options::GenerationOptions;
use crate::rng::DungeonRng;

use super::region::Region;

/// Index of a node in its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    value: Region,
}

/// BSP tree of regions
///
/// A node is a leaf until `split` gives it two children; `merge` turns it
/// back into a leaf holding a derived value.
#[derive(Debug, Clone)]
pub struct BspTree {
    nodes: Vec<Node>,
}

impl BspTree {
    pub const ROOT: NodeId = NodeId(0);

    /// Create a tree with a single leaf
    pub fn root(value: Region) -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                left: None,
                right: None,
                value,
            }],
        }
    }

    /// Partition a `rows` x `cols` dungeon down to the minimum region size
    ///
    /// Regions flatter than `square_ratio` are cut vertically, the others
    /// horizontally. A region that can't fit two minimum-sized children
    /// along the chosen axis stays a leaf.
    pub fn build(rows: u8, cols: u8, options: &GenerationOptions, rng: &mut DungeonRng) -> Self {
        let mut tree = Self::root(Region::new(1, 1, rows, cols));
        let mut stack = vec![Self::ROOT];

        while let Some(id) = stack.pop() {
            let region = tree.value(id);
            let children = if region.ratio() < options.square_ratio {
                let min = options.region_min_cols;
                (u16::from(region.cols) >= 2 * u16::from(min)).then(|| {
                    let cols = rng.between_u8(min, region.cols - min);
                    region.split_vertically(cols)
                })
            } else {
                let min = options.region_min_rows;
                (u16::from(region.rows) >= 2 * u16::from(min)).then(|| {
                    let rows = rng.between_u8(min, region.rows - min);
                    region.split_horizontally(rows)
                })
            };

            if let Some((first, second)) = children {
                trace!("split {region} into {first} and {second}");
                let (left, right) = tree.split(id, first, second);
                stack.push(left);
                stack.push(right);
            }
        }

        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn value(&self, id: NodeId) -> Region {
        self.nodes[id.0].value
    }

    pub fn set_value(&mut self, id: NodeId, value: Region) {
        self.nodes[id.0].value = value;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> (Option<NodeId>, Option<NodeId>) {
        let node = &self.nodes[id.0];
        (node.left, node.right)
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        let node = &self.nodes[id.0];
        node.left.is_none() && node.right.is_none()
    }

    /// Give a leaf two children
    pub fn split(&mut self, id: NodeId, left: Region, right: Region) -> (NodeId, NodeId) {
        let left_id = self.push(id, left);
        let right_id = self.push(id, right);
        let node = &mut self.nodes[id.0];
        node.left = Some(left_id);
        node.right = Some(right_id);
        (left_id, right_id)
    }

    /// Replace the value of `id` and detach its children
    ///
    /// Detached nodes stay in the arena but are no longer reachable.
    pub fn merge(&mut self, id: NodeId, value: Region) {
        let node = &mut self.nodes[id.0];
        node.value = value;
        node.left = None;
        node.right = None;
    }

    fn push(&mut self, parent: NodeId, value: Region) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            left: None,
            right: None,
            value,
        });
        id
    }

    /// Pre-order walk calling `visitor` on every node, leaves and inner nodes alike
    pub fn traverse(&self, from: NodeId, mut visitor: impl FnMut(NodeId, Region)) {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            visitor(id, node.value);
            if let Some(right) = node.right {
                stack.push(right);
            }
            if let Some(left) = node.left {
                stack.push(left);
            }
        }
    }

    /// Leaves in pre-order, left before right
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        self.traverse(Self::ROOT, |id, _| {
            if self.is_leaf(id) {
                leaves.push(id);
            }
        });
        leaves
    }

    /// Collapse the subtree under `from` bottom-up
    ///
    /// Every pair of sibling leaves is replaced by `combiner(left, right)` on
    /// their parent, which becomes a leaf; this repeats until `from` is a
    /// leaf, whose value is returned. A node left with a single child takes
    /// that child's value without calling `combiner`. The left subtree is
    /// always collapsed before the right one. The first error aborts the fold.
    pub fn fold_modify<E>(
        &mut self,
        from: NodeId,
        mut combiner: impl FnMut(Region, Region) -> Result<Region, E>,
    ) -> Result<Region, E> {
        let mut stack = vec![from];

        while let Some(&id) = stack.last() {
            match self.children(id) {
                (None, None) => {
                    stack.pop();
                }
                (Some(left), Some(right)) => {
                    if self.is_leaf(left) && self.is_leaf(right) {
                        let value = combiner(self.value(left), self.value(right))?;
                        self.merge(id, value);
                        stack.pop();
                    } else {
                        if !self.is_leaf(right) {
                            stack.push(right);
                        }
                        if !self.is_leaf(left) {
                            stack.push(left);
                        }
                    }
                }
                (Some(child), None) | (None, Some(child)) => {
                    if self.is_leaf(child) {
                        let value = self.value(child);
                        self.merge(id, value);
                        stack.pop();
                    } else {
                        stack.push(child);
                    }
                }
            }
        }

        Ok(self.value(from))
    }
}
