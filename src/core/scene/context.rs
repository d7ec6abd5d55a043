//=========================================================================
// Scene Context
//=========================================================================
//
// Everything a scene may touch during its callbacks, plus the scene tree
// bookkeeping that drives them.
//
// Architecture:
//   SceneContext
//     ├─ graph: SceneGraph ──> active root, pending root, globals
//     ├─ stage: Stage
//     ├─ stats: FrameStats
//     └─ input / media / network collaborators
//
// Tree traversal (once per frame, driven by SceneManager):
//   1. apply pending scene: end old tree → clear stage → start new tree
//   2. update root, then each live child in attach order:
//        completed? → end + tombstone
//        attached this frame? → skip until next frame
//        update subtree → completed? → end + tombstone
//      sweep tombstones after the sibling list is done
//   3. same for global scenes, in registration order
//
// Appending children and tombstoning removals keeps indices stable, so a
// scene may attach or detach siblings from inside its own update.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::scene_graph::{Lifecycle, SceneGraph, SceneId};
use super::sub_scene::AgentScene;
use super::{Agent, Scene};
use crate::core::input::{InputDevice, StateTracker};
use crate::core::media::{MediaLoader, Network, NullMediaLoader, NullNetwork};
use crate::core::stage::{Canvas, GraphicsMode, Stage};
use crate::core::stats::FrameStats;

//=== SceneContext ========================================================

/// Access point handed to every scene callback.
pub struct SceneContext {
    stage: Stage,
    stats: FrameStats,
    graph: SceneGraph,
    active_root: Option<SceneId>,
    pending_root: Option<SceneId>,
    globals: Vec<SceneId>,
    frame: u64,
    input: Box<dyn InputDevice>,
    media: Box<dyn MediaLoader>,
    network: Box<dyn Network>,
    renderer_name: String,
    quit_requested: bool,
    shutting_down: bool,
}

impl SceneContext {
    //--- Construction -----------------------------------------------------

    /// Creates a context without any scenes.
    ///
    /// Input comes from a [`StateTracker`]; media and network requests fail
    /// with `MediaError::Unsupported` until real collaborators are set.
    pub fn new(stage: Stage, stats: FrameStats) -> Self {
        Self {
            stage,
            stats,
            graph: SceneGraph::new(),
            active_root: None,
            pending_root: None,
            globals: Vec::new(),
            frame: 0,
            input: Box::new(StateTracker::new()),
            media: Box::new(NullMediaLoader),
            network: Box::new(NullNetwork),
            renderer_name: String::from("Headless"),
            quit_requested: false,
            shutting_down: false,
        }
    }

    //--- Collaborators ----------------------------------------------------

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn canvas(&self) -> &Canvas {
        self.stage.canvas()
    }

    pub fn input(&self) -> &dyn InputDevice {
        self.input.as_ref()
    }

    pub fn media_loader(&mut self) -> &mut dyn MediaLoader {
        self.media.as_mut()
    }

    pub fn network(&mut self) -> &mut dyn Network {
        self.network.as_mut()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut FrameStats {
        &mut self.stats
    }

    pub fn renderer_name(&self) -> &str {
        &self.renderer_name
    }

    /// Number of frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Asks the frame loop to stop after the current frame.
    pub fn quit(&mut self) {
        info!("Quit requested by scene");
        self.quit_requested = true;
    }

    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }

    //--- Scene Requests ---------------------------------------------------

    /// Requests a new root scene, applied at the start of the next frame.
    ///
    /// A request that has not been applied yet is replaced, together with
    /// any sub-scenes already attached to it. Replaced scenes receive no
    /// callbacks.
    pub fn change_scene(&mut self, scene: impl Scene + 'static) -> SceneId {
        if let Some(overridden) = self.pending_root.take() {
            warn!("Pending scene {:?} replaced before it was started", overridden);
            self.graph.remove_subtree(overridden);
        }

        let id = self.graph.insert(Box::new(scene), None, self.frame + 1);
        debug!("Scene {:?} requested", id);
        self.pending_root = Some(id);
        id
    }

    /// Attaches a sub-scene to the current root.
    ///
    /// While a scene change is pending the sub-scene joins the requested
    /// scene and starts together with it. Otherwise it joins the active
    /// scene and starts immediately. Either way its first update happens
    /// in a frame that begins after this call.
    ///
    /// Sub-scenes attached while the manager shuts down are never started.
    ///
    /// # Panics
    ///
    /// Panics if there is neither an active nor a requested scene.
    pub fn attach(&mut self, scene: impl Scene + 'static) -> SceneId {
        if self.shutting_down {
            let id = self.graph.insert(Box::new(scene), None, self.frame + 1);
            self.graph.remove_subtree(id);
            debug!("Dropped sub-scene {:?} attached during shutdown", id);
            return id;
        }

        let Some(root) = self.pending_root.or(self.active_root) else {
            panic!("Cannot attach sub-scene: no active scene");
        };
        self.attach_to(root, scene)
    }

    /// Attaches a sub-scene under `parent`. It ends when `parent` ends.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is unknown or has already ended.
    pub fn attach_to(&mut self, parent: SceneId, scene: impl Scene + 'static) -> SceneId {
        let Some(lifecycle) = self.graph.lifecycle(parent) else {
            panic!("Unknown parent scene {:?}", parent);
        };
        assert!(
            lifecycle != Lifecycle::Ended,
            "Cannot attach to scene {:?} after it has ended",
            parent
        );

        let id = self.graph.insert(Box::new(scene), Some(parent), self.frame + 1);
        debug!("Attached sub-scene {:?} to {:?}", id, parent);

        if lifecycle == Lifecycle::Running {
            self.start_scene(id);
        }
        id
    }

    /// Attaches context-free logic as a sub-scene of the current root.
    ///
    /// # Panics
    ///
    /// Panics if there is neither an active nor a requested scene.
    pub fn attach_agent(&mut self, agent: impl Agent + 'static) -> SceneId {
        self.attach(AgentScene::new(agent))
    }

    /// Starts a scene that lives independently of the active scene.
    ///
    /// Global scenes keep running across scene changes until they
    /// complete or are detached.
    pub fn attach_global(&mut self, scene: impl Scene + 'static) -> SceneId {
        let id = self.graph.insert(Box::new(scene), None, self.frame + 1);
        debug!("Attached global scene {:?}", id);
        self.globals.push(id);
        self.start_scene(id);
        id
    }

    /// Marks a sub-scene or global scene for removal.
    ///
    /// Its `end` (and that of its sub-scenes) runs during the next
    /// completion check. Returns `false` if the scene was not attached.
    ///
    /// # Panics
    ///
    /// Panics if `id` is the active or requested root scene.
    pub fn detach(&mut self, id: SceneId) -> bool {
        assert!(
            Some(id) != self.active_root && Some(id) != self.pending_root,
            "Cannot detach root scene {:?}, use change_scene instead",
            id
        );

        match self.graph.get_mut(id) {
            Some(node) if node.is_live() => {
                node.detach_requested = true;
                debug!("Detach requested for scene {:?}", id);
                true
            }
            _ => false,
        }
    }

    /// `true` while the scene is attached and not marked for removal.
    pub fn is_attached(&self, id: SceneId) -> bool {
        self.graph.is_live(id)
    }

    pub fn active_scene(&self) -> Option<SceneId> {
        self.active_root
    }

    pub fn pending_scene(&self) -> Option<SceneId> {
        self.pending_root
    }

    /// Attached sub-scenes of `id`, in attach order.
    pub fn sub_scenes(&self, id: SceneId) -> Vec<SceneId> {
        self.graph
            .children(id)
            .iter()
            .copied()
            .filter(|child| self.graph.is_live(*child))
            .collect()
    }

    /// Attached global scenes, in registration order.
    pub fn global_scenes(&self) -> Vec<SceneId> {
        self.globals
            .iter()
            .copied()
            .filter(|id| self.graph.is_live(*id))
            .collect()
    }

    //--- Frame Processing -------------------------------------------------

    pub(crate) fn begin_frame(&mut self) {
        self.frame += 1;
    }

    /// Replaces the active tree with the requested one, if any.
    ///
    /// The request stays pending while the old tree ends, so sub-scenes
    /// attached from an `end` callback join the requested scene.
    pub(crate) fn apply_pending_scene(&mut self) {
        if self.pending_root.is_none() {
            return;
        }

        if let Some(previous) = self.active_root.take() {
            debug!("Ending scene {:?}", previous);
            self.end_subtree(previous);
            self.graph.remove_subtree(previous);
            self.stage.clear();
        }

        let Some(requested) = self.pending_root.take() else {
            return;
        };
        debug!("Starting scene {:?}", requested);
        self.active_root = Some(requested);
        self.start_subtree(requested);
    }

    pub(crate) fn update_scenes(&mut self, delta_time: f32) {
        if let Some(root) = self.active_root {
            self.update_tree(root, delta_time);
        }
        self.update_globals(delta_time);
    }

    /// Ends every scene and clears the stage. Pending requests are dropped.
    pub(crate) fn end_all(&mut self) {
        self.shutting_down = true;

        if let Some(pending) = self.pending_root.take() {
            self.graph.remove_subtree(pending);
        }

        if let Some(root) = self.active_root.take() {
            self.end_subtree(root);
            self.graph.remove_subtree(root);
        }

        for id in std::mem::take(&mut self.globals) {
            self.end_subtree(id);
            self.graph.remove_subtree(id);
        }

        self.stage.clear();
        self.shutting_down = false;
    }

    pub(crate) fn input_mut(&mut self) -> &mut dyn InputDevice {
        self.input.as_mut()
    }

    pub(crate) fn set_input(&mut self, device: Box<dyn InputDevice>) {
        self.input = device;
    }

    pub(crate) fn set_media_loader(&mut self, loader: Box<dyn MediaLoader>) {
        self.media = loader;
    }

    pub(crate) fn set_network(&mut self, network: Box<dyn Network>) {
        self.network = network;
    }

    pub(crate) fn set_renderer_name(&mut self, name: String) {
        self.renderer_name = name;
    }

    pub(crate) fn scene_count(&self) -> usize {
        self.graph.len()
    }

    //--- Traversal --------------------------------------------------------

    fn start_scene(&mut self, id: SceneId) {
        match self.graph.get_mut(id) {
            Some(node) if node.lifecycle == Lifecycle::Dormant => node.lifecycle = Lifecycle::Running,
            _ => return,
        }

        if let Some(mut scene) = self.graph.take_scene(id) {
            scene.start(self);
            self.graph.restore_scene(id, scene);
        }
    }

    /// Starts a dormant scene, then depth-first its dormant sub-scenes.
    fn start_subtree(&mut self, id: SceneId) {
        if let Some(node) = self.graph.get_mut(id) {
            if node.detach_requested {
                node.lifecycle = Lifecycle::Ended;
                return;
            }
        }

        self.start_scene(id);

        let mut index = 0;
        while let Some(child) = self.graph.child_at(id, index) {
            index += 1;
            if self.graph.lifecycle(child) == Some(Lifecycle::Dormant) {
                self.start_subtree(child);
            }
        }
    }

    fn update_scene(&mut self, id: SceneId, delta_time: f32) {
        if let Some(mut scene) = self.graph.take_scene(id) {
            scene.update(self, delta_time);
            self.graph.restore_scene(id, scene);
        }
    }

    fn update_tree(&mut self, id: SceneId, delta_time: f32) {
        self.update_scene(id, delta_time);

        let mut index = 0;
        while let Some(child) = self.graph.child_at(id, index) {
            index += 1;
            if self.graph.lifecycle(child) != Some(Lifecycle::Running) {
                continue;
            }
            if self.check_completed(child) || self.is_newborn(child) {
                continue;
            }

            self.update_tree(child, delta_time);
            self.check_completed(child);
        }

        self.graph.sweep_children(id);
    }

    fn update_globals(&mut self, delta_time: f32) {
        let mut index = 0;
        while let Some(&id) = self.globals.get(index) {
            index += 1;
            if self.graph.lifecycle(id) != Some(Lifecycle::Running) {
                continue;
            }
            if self.check_completed(id) || self.is_newborn(id) {
                continue;
            }

            self.update_tree(id, delta_time);
            self.check_completed(id);
        }

        let graph = &mut self.graph;
        self.globals.retain(|id| {
            if graph.lifecycle(*id) == Some(Lifecycle::Ended) {
                graph.remove_subtree(*id);
                false
            } else {
                true
            }
        });
    }

    /// Attached during the current frame, so not updated until the next.
    fn is_newborn(&self, id: SceneId) -> bool {
        self.graph
            .get(id)
            .is_some_and(|node| self.frame < node.first_frame)
    }

    /// Ends the scene if it completed or was detached.
    fn check_completed(&mut self, id: SceneId) -> bool {
        let Some(node) = self.graph.get(id) else {
            return true;
        };
        if node.lifecycle == Lifecycle::Ended {
            return true;
        }

        let completed = node.detach_requested
            || node.scene.as_ref().is_some_and(|scene| scene.is_completed());

        if completed {
            debug!("Scene {:?} completed", id);
            self.end_subtree(id);
        }
        completed
    }

    /// Calls `end` on the scene and then on its sub-scenes, depth-first.
    ///
    /// Scenes that never started are marked ended without a callback.
    fn end_subtree(&mut self, id: SceneId) {
        let was_running = match self.graph.get_mut(id) {
            Some(node) => {
                let running = node.lifecycle == Lifecycle::Running;
                node.lifecycle = Lifecycle::Ended;
                running
            }
            None => return,
        };

        if was_running {
            if let Some(mut scene) = self.graph.take_scene(id) {
                scene.end(self);
                self.graph.restore_scene(id, scene);
            }
        }

        let mut index = 0;
        while let Some(child) = self.graph.child_at(id, index) {
            index += 1;
            if self.graph.lifecycle(child) != Some(Lifecycle::Ended) {
                self.end_subtree(child);
            }
        }
    }
}

impl Default for SceneContext {
    fn default() -> Self {
        Self::new(
            Stage::new(Canvas::default(), GraphicsMode::Mode2D),
            FrameStats::default(),
        )
    }
}

impl fmt::Debug for SceneContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneContext")
            .field("frame", &self.frame)
            .field("active_root", &self.active_root)
            .field("pending_root", &self.pending_root)
            .field("globals", &self.globals)
            .field("scenes", &self.graph.len())
            .field("renderer_name", &self.renderer_name)
            .finish_non_exhaustive()
    }
}
