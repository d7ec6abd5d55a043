//=========================================================================
// Scene Graph
//=========================================================================
//
// Arena holding every live scene: active tree, pending tree, globals.
//
// Architecture:
//   SlotMap<SceneId, SceneNode>
//     SceneNode { scene, parent, children (attach order), lifecycle }
//
// A scene is taken out of its slot while one of its callbacks runs and
// put back afterwards, so the callback can receive `&mut SceneContext`.
// Ended nodes stay in their parent's child list as tombstones until the
// parent's traversal sweeps them.
//
//=========================================================================

//=== External Dependencies ===============================================

use slotmap::{new_key_type, SlotMap};

//=== Internal Dependencies ===============================================

use super::Scene;

//=== SceneId =============================================================

new_key_type! {
    /// Handle to a scene attached to a [`SceneContext`](super::SceneContext).
    pub struct SceneId;
}

//=== Lifecycle ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    /// Attached to a pending tree, `start` not yet called.
    Dormant,
    Running,
    /// `end` has been called (or the scene never started). Awaiting sweep.
    Ended,
}

//=== SceneNode ===========================================================

pub(crate) struct SceneNode {
    /// `None` while the scene is executing one of its callbacks.
    pub(crate) scene: Option<Box<dyn Scene>>,
    pub(crate) parent: Option<SceneId>,
    pub(crate) children: Vec<SceneId>,
    /// First frame number in which this scene may be updated.
    pub(crate) first_frame: u64,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) detach_requested: bool,
}

impl SceneNode {
    /// Running and not marked for removal.
    pub(crate) fn is_live(&self) -> bool {
        self.lifecycle != Lifecycle::Ended && !self.detach_requested
    }
}

//=== SceneGraph ==========================================================

#[derive(Default)]
pub(crate) struct SceneGraph {
    nodes: SlotMap<SceneId, SceneNode>,
}

impl SceneGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Structure --------------------------------------------------------

    /// Inserts a dormant node, appended to `parent`'s children if given.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not in the graph.
    pub(crate) fn insert(
        &mut self,
        scene: Box<dyn Scene>,
        parent: Option<SceneId>,
        first_frame: u64,
    ) -> SceneId {
        if let Some(parent) = parent {
            assert!(self.nodes.contains_key(parent), "Unknown parent scene {:?}", parent);
        }

        let id = self.nodes.insert(SceneNode {
            scene: Some(scene),
            parent,
            children: Vec::new(),
            first_frame,
            lifecycle: Lifecycle::Dormant,
            detach_requested: false,
        });

        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.push(id);
        }

        id
    }

    /// Removes a node with all its descendants, without any callbacks.
    ///
    /// Returns the number of nodes removed.
    pub(crate) fn remove_subtree(&mut self, id: SceneId) -> usize {
        let Some(node) = self.nodes.remove(id) else {
            return 0;
        };

        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|child| *child != id);
        }

        let mut removed = 1;
        let mut stack = node.children;
        while let Some(child) = stack.pop() {
            if let Some(node) = self.nodes.remove(child) {
                removed += 1;
                stack.extend(node.children);
            }
        }
        removed
    }

    /// Drops ended children of `id` from the arena.
    pub(crate) fn sweep_children(&mut self, id: SceneId) {
        let ended: Vec<SceneId> = self
            .children(id)
            .iter()
            .copied()
            .filter(|child| self.lifecycle(*child) == Some(Lifecycle::Ended))
            .collect();

        for child in ended {
            self.remove_subtree(child);
        }
    }

    //--- Access -----------------------------------------------------------

    pub(crate) fn get(&self, id: SceneId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: SceneId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn is_live(&self, id: SceneId) -> bool {
        self.nodes.get(id).is_some_and(SceneNode::is_live)
    }

    pub(crate) fn lifecycle(&self, id: SceneId) -> Option<Lifecycle> {
        self.nodes.get(id).map(|node| node.lifecycle)
    }

    pub(crate) fn children(&self, id: SceneId) -> &[SceneId] {
        match self.nodes.get(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    pub(crate) fn child_at(&self, id: SceneId, index: usize) -> Option<SceneId> {
        self.children(id).get(index).copied()
    }

    //--- Callback Support -------------------------------------------------

    pub(crate) fn take_scene(&mut self, id: SceneId) -> Option<Box<dyn Scene>> {
        self.nodes.get_mut(id).and_then(|node| node.scene.take())
    }

    /// Puts a scene back after a callback. Dropped if the node is gone.
    pub(crate) fn restore_scene(&mut self, id: SceneId, scene: Box<dyn Scene>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.scene = Some(scene);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::SceneContext;

    struct Idle;

    impl Scene for Idle {
        fn update(&mut self, _context: &mut SceneContext, _delta_time: f32) {}
    }

    #[test]
    fn insert_appends_children_in_order() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Box::new(Idle), None, 0);
        let a = graph.insert(Box::new(Idle), Some(root), 0);
        let b = graph.insert(Box::new(Idle), Some(root), 0);

        assert_eq!(graph.children(root), &[a, b]);
        assert_eq!(graph.lifecycle(a), Some(Lifecycle::Dormant));
        assert_eq!(graph.get(b).and_then(|node| node.parent), Some(root));
    }

    #[test]
    #[should_panic(expected = "Unknown parent scene")]
    fn insert_under_removed_parent_panics() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Box::new(Idle), None, 0);
        graph.remove_subtree(root);

        graph.insert(Box::new(Idle), Some(root), 0);
    }

    #[test]
    fn remove_subtree_drops_descendants() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Box::new(Idle), None, 0);
        let child = graph.insert(Box::new(Idle), Some(root), 0);
        let grandchild = graph.insert(Box::new(Idle), Some(child), 0);
        let sibling = graph.insert(Box::new(Idle), Some(root), 0);

        assert_eq!(graph.remove_subtree(child), 2);

        assert!(graph.get(grandchild).is_none());
        assert_eq!(graph.children(root), &[sibling]);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn sweep_removes_only_ended_children() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Box::new(Idle), None, 0);
        let a = graph.insert(Box::new(Idle), Some(root), 0);
        let b = graph.insert(Box::new(Idle), Some(root), 0);

        if let Some(node) = graph.get_mut(a) {
            node.lifecycle = Lifecycle::Ended;
        }
        graph.sweep_children(root);

        assert_eq!(graph.children(root), &[b]);
        assert!(graph.get(a).is_none());
    }

    #[test]
    fn taken_scene_can_be_restored() {
        let mut graph = SceneGraph::new();
        let id = graph.insert(Box::new(Idle), None, 0);

        let scene = graph.take_scene(id);
        assert!(scene.is_some());
        assert!(graph.take_scene(id).is_none());

        if let Some(scene) = scene {
            graph.restore_scene(id, scene);
        }
        assert!(graph.get(id).is_some_and(|node| node.scene.is_some()));
    }

    #[test]
    fn detach_request_makes_node_not_live() {
        let mut graph = SceneGraph::new();
        let id = graph.insert(Box::new(Idle), None, 0);
        assert!(graph.is_live(id));

        if let Some(node) = graph.get_mut(id) {
            node.detach_requested = true;
        }

        assert!(!graph.is_live(id));
    }
}
