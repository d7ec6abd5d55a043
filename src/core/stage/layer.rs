//=========================================================================
// Layer
//=========================================================================

//=== Internal Dependencies ===============================================

use super::NodeId;

//=== Layer ===============================================================

/// Named, ordered bucket of stage nodes.
///
/// Layers draw back-to-front in creation order, nodes within a layer in
/// insertion order. Hiding a layer hides its nodes without removing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    name: String,
    visible: bool,
    nodes: Vec<NodeId>,
}

impl Layer {
    pub(super) fn new(name: String) -> Self {
        Self {
            name,
            visible: true,
            nodes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(super) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Nodes in draw order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(super) fn push(&mut self, node: NodeId) {
        self.nodes.push(node);
    }

    /// Returns `true` if the node was on this layer.
    pub(super) fn remove(&mut self, node: NodeId) -> bool {
        match self.nodes.iter().position(|other| *other == node) {
            Some(index) => {
                self.nodes.remove(index);
                true
            }
            None => false,
        }
    }
}
