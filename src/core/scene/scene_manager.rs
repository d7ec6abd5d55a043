//=========================================================================
// Scene Manager
//=========================================================================
//
// Drives the scene tree one frame at a time and hands the stage to a
// renderer.
//
// Frame order:
//   process_input() → update() → render() → record_frame()
//
// update():
//   1. apply the pending scene change (end old tree, clear stage, start)
//   2. Stage::update() for node animation
//   3. active tree, then global scenes
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::info;

//=== Internal Dependencies ===============================================

use super::{Scene, SceneContext, SceneId};
use crate::core::input::{InputDevice, InputEvent};
use crate::core::media::{MediaLoader, Network};
use crate::core::stage::{Canvas, DrawStats, GraphicsMode, Stage, StageVisitor};
use crate::core::stats::FrameStats;

//=== SceneManager ========================================================

/// Owns the [`SceneContext`] and advances it frame by frame.
#[derive(Debug)]
pub struct SceneManager {
    context: SceneContext,
}

impl SceneManager {
    //--- Construction -----------------------------------------------------

    pub fn new(stage: Stage, target_framerate: f32) -> Self {
        Self {
            context: SceneContext::new(stage, FrameStats::new(target_framerate)),
        }
    }

    //--- Configuration ----------------------------------------------------

    pub fn with_input_device(&mut self, device: impl InputDevice + 'static) -> &mut Self {
        self.context.set_input(Box::new(device));
        self
    }

    pub fn with_media_loader(&mut self, loader: impl MediaLoader + 'static) -> &mut Self {
        self.context.set_media_loader(Box::new(loader));
        self
    }

    pub fn with_network(&mut self, network: impl Network + 'static) -> &mut Self {
        self.context.set_network(Box::new(network));
        self
    }

    /// Name shown in the debug information.
    pub fn with_renderer_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.context.set_renderer_name(name.into());
        self
    }

    //--- Scene Requests ---------------------------------------------------

    /// See [`SceneContext::change_scene`].
    pub fn change_scene(&mut self, scene: impl Scene + 'static) -> SceneId {
        self.context.change_scene(scene)
    }

    /// See [`SceneContext::attach_global`].
    pub fn attach_global(&mut self, scene: impl Scene + 'static) -> SceneId {
        self.context.attach_global(scene)
    }

    //--- Frame Loop -------------------------------------------------------

    /// Feeds the input collected since the previous frame to the device.
    pub fn process_input(&mut self, events: &[InputEvent]) {
        self.context.input_mut().process_frame(events);
    }

    /// Advances every active scene by `delta_time` seconds.
    pub fn update(&mut self, delta_time: f32) {
        self.context.begin_frame();
        self.context.apply_pending_scene();
        self.context.stage_mut().update(delta_time);
        self.context.update_scenes(delta_time);
    }

    /// Visits the stage and records the resulting draw counts.
    pub fn render<V: StageVisitor + ?Sized>(&mut self, visitor: &mut V) -> DrawStats {
        let draws = self.context.stage().visit(visitor);
        self.context.stats_mut().record_draws(draws);
        draws
    }

    /// Folds frame timings into the statistics.
    pub fn record_frame(&mut self, frame_time: Duration, update_time: Duration, render_time: Duration) {
        self.context
            .stats_mut()
            .record_frame(frame_time, update_time, render_time);
    }

    /// Ends the active tree and all global scenes, then clears the stage.
    pub fn shutdown(&mut self) {
        info!(
            "Shutting down scene manager ({} scenes attached)",
            self.context.scene_count()
        );
        self.context.end_all();
    }

    //--- Queries ----------------------------------------------------------

    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.context
    }

    pub fn stage(&self) -> &Stage {
        self.context.stage()
    }

    pub fn is_quit_requested(&self) -> bool {
        self.context.is_quit_requested()
    }

    /// Human-readable status lines for an on-screen overlay.
    pub fn debug_information(&self) -> Vec<String> {
        let stats = self.context.stats();
        let draws = stats.draws();

        let mut info = vec![
            format!("Renderer:  {}", self.context.renderer_name()),
            format!("Canvas:  {}", self.context.canvas()),
            format!(
                "Framerate:  {:.1} / {:.0}",
                stats.framerate(),
                stats.target_framerate()
            ),
            format!("Update time:  {:.1}ms", stats.update_time_ms()),
            format!("Render time:  {:.1}ms", stats.render_time_ms()),
            format!("# Sprites:  {}", draws.sprites),
            format!("# Primitives:  {}", draws.primitives),
            format!("# Text:  {}", draws.texts),
        ];

        for (name, value) in stats.counters() {
            info.push(format!("{}:  {}", name, value));
        }
        info
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new(Stage::new(Canvas::default(), GraphicsMode::Mode2D), 60.0)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::PointerButton;
    use crate::core::scene::SubScene;
    use crate::core::stage::{CollectingVisitor, ColorRGB, Primitive, Rect, Shape, StageEvent};
    use glam::Vec2;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    type Log = Rc<RefCell<Vec<String>>>;

    fn new_log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn take(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.borrow_mut())
    }

    /// Records every lifecycle callback.
    struct Probe {
        name: &'static str,
        log: Log,
        completed: Rc<Cell<bool>>,
    }

    impl Probe {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Rc::clone(log),
                completed: Rc::new(Cell::new(false)),
            }
        }

        fn completion(name: &'static str, log: &Log) -> (Self, Rc<Cell<bool>>) {
            let probe = Self::new(name, log);
            let flag = Rc::clone(&probe.completed);
            (probe, flag)
        }
    }

    impl Scene for Probe {
        fn start(&mut self, _context: &mut SceneContext) {
            self.log.borrow_mut().push(format!("{}.start", self.name));
        }

        fn update(&mut self, _context: &mut SceneContext, _delta_time: f32) {
            self.log.borrow_mut().push(format!("{}.update", self.name));
        }

        fn end(&mut self, _context: &mut SceneContext) {
            self.log.borrow_mut().push(format!("{}.end", self.name));
        }

        fn is_completed(&self) -> bool {
            self.completed.get()
        }
    }

    /// Attaches a follow-up sub-scene from its `end` callback.
    struct Chain {
        name: &'static str,
        log: Log,
    }

    impl Scene for Chain {
        fn update(&mut self, _context: &mut SceneContext, _delta_time: f32) {}

        fn end(&mut self, context: &mut SceneContext) {
            self.log.borrow_mut().push(format!("{}.end", self.name));
            let follow_up = context.attach(Probe::new("F", &self.log));
            self.log.borrow_mut().push(format!("F.attached:{}", context.is_attached(follow_up)));
        }
    }

    fn square() -> Primitive {
        Primitive::new(Shape::Rect(Rect::new(10.0, 10.0, 20.0, 20.0)), ColorRGB::RED)
    }

    //=====================================================================
    // Scene Change Tests
    //=====================================================================

    #[test]
    fn requested_scene_starts_at_next_frame() {
        let log = new_log();
        let mut manager = SceneManager::default();

        let id = manager.change_scene(Probe::new("A", &log));
        assert!(take(&log).is_empty());
        assert_eq!(manager.context().pending_scene(), Some(id));

        manager.update(0.1);

        assert_eq!(take(&log), vec!["A.start", "A.update"]);
        assert_eq!(manager.context().active_scene(), Some(id));
        assert_eq!(manager.context().pending_scene(), None);
    }

    #[test]
    fn scene_change_tears_down_tree_before_start() {
        let log = new_log();
        let mut manager = SceneManager::default();
        manager.change_scene(Probe::new("A", &log));
        manager.update(0.1);

        let context = manager.context_mut();
        context.attach(Probe::new("S1", &log));
        context.attach(Probe::new("S2", &log));
        context.stage_mut().spawn("default", square());
        let observer_log = Rc::clone(&log);
        context.stage_mut().subscribe(move |event: &StageEvent| {
            if matches!(event, StageEvent::Cleared) {
                observer_log.borrow_mut().push("stage.cleared".to_string());
            }
        });
        take(&log);

        manager.change_scene(Probe::new("B", &log));
        manager.update(0.1);

        assert_eq!(
            take(&log),
            vec!["A.end", "S1.end", "S2.end", "stage.cleared", "B.start", "B.update"]
        );
        assert_eq!(manager.stage().node_count(), 0);
    }

    #[test]
    fn sub_scene_attached_from_end_joins_requested_scene() {
        let log = new_log();
        let mut manager = SceneManager::default();
        manager.change_scene(Probe::new("A", &log));
        manager.update(0.1);

        let context = manager.context_mut();
        context.attach(Chain { name: "S1", log: Rc::clone(&log) });
        let observer_log = Rc::clone(&log);
        context.stage_mut().subscribe(move |event: &StageEvent| {
            if matches!(event, StageEvent::Cleared) {
                observer_log.borrow_mut().push("stage.cleared".to_string());
            }
        });
        take(&log);

        let b = manager.change_scene(Probe::new("B", &log));
        manager.update(0.1);

        assert_eq!(
            take(&log),
            vec!["A.end", "S1.end", "F.attached:true", "stage.cleared", "B.start", "F.start", "B.update"]
        );
        assert_eq!(manager.context().active_scene(), Some(b));
        assert_eq!(manager.context().sub_scenes(b).len(), 1);

        manager.update(0.1);
        assert_eq!(take(&log), vec!["B.update", "F.update"]);
    }

    #[test]
    fn second_request_replaces_pending_one() {
        let log = new_log();
        let mut manager = SceneManager::default();

        manager.change_scene(Probe::new("A", &log));
        let orphan = manager.context_mut().attach(Probe::new("S1", &log));
        let b = manager.change_scene(Probe::new("B", &log));
        manager.update(0.1);

        assert_eq!(take(&log), vec!["B.start", "B.update"]);
        assert_eq!(manager.context().active_scene(), Some(b));
        assert!(!manager.context().is_attached(orphan));
    }

    #[test]
    fn sub_scenes_attached_to_pending_scene_start_with_it() {
        let log = new_log();
        let mut manager = SceneManager::default();

        manager.change_scene(Probe::new("A", &log));
        manager.context_mut().attach(Probe::new("S1", &log));
        assert!(take(&log).is_empty());

        manager.update(0.1);

        assert_eq!(take(&log), vec!["A.start", "S1.start", "A.update", "S1.update"]);
    }

    #[test]
    #[should_panic(expected = "no active scene")]
    fn attach_without_scene_panics() {
        let log = new_log();
        let mut manager = SceneManager::default();
        manager.context_mut().attach(Probe::new("S1", &log));
    }

    #[test]
    #[should_panic(expected = "Cannot detach root scene")]
    fn detach_root_panics() {
        let log = new_log();
        let mut manager = SceneManager::default();
        let root = manager.change_scene(Probe::new("A", &log));
        manager.update(0.1);

        manager.context_mut().detach(root);
    }

    //=====================================================================
    // Sub-Scene Tests
    //=====================================================================

    /// Root that attaches a timed sub-scene when it starts.
    struct Spawner {
        sub: Rc<Cell<Option<SceneId>>>,
        sub_updates: Rc<Cell<u32>>,
    }

    impl Scene for Spawner {
        fn start(&mut self, context: &mut SceneContext) {
            let updates = Rc::clone(&self.sub_updates);
            let id = context.attach(SubScene::timed(1.0, move |_, _| updates.set(updates.get() + 1)));
            self.sub.set(Some(id));
        }

        fn update(&mut self, _context: &mut SceneContext, _delta_time: f32) {}
    }

    #[test]
    fn timed_sub_scene_is_removed_when_done() {
        let sub = Rc::new(Cell::new(None));
        let sub_updates = Rc::new(Cell::new(0));
        let mut manager = SceneManager::default();
        let root = manager.change_scene(Spawner {
            sub: Rc::clone(&sub),
            sub_updates: Rc::clone(&sub_updates),
        });

        manager.update(0.5);
        let Some(sub) = sub.get() else {
            panic!("sub-scene was not attached during start");
        };
        assert!(manager.context().is_attached(sub));

        manager.update(0.5);
        assert!(manager.context().is_attached(sub));

        manager.update(0.5);
        assert!(!manager.context().is_attached(sub));
        assert!(manager.context().sub_scenes(root).is_empty());
        assert_eq!(sub_updates.get(), 2);
        assert_eq!(manager.context().active_scene(), Some(root));
    }

    #[test]
    fn completed_sub_scene_is_ended_once() {
        let log = new_log();
        let mut manager = SceneManager::default();
        manager.change_scene(Probe::new("A", &log));
        manager.update(0.1);
        let (probe, done) = Probe::completion("S1", &log);
        let s1 = manager.context_mut().attach(probe);
        manager.update(0.1);
        take(&log);

        done.set(true);
        manager.update(0.1);
        manager.update(0.1);

        assert_eq!(take(&log), vec!["A.update", "S1.end", "A.update"]);
        assert!(!manager.context().is_attached(s1));
    }

    #[test]
    fn sub_scene_attached_mid_frame_waits_one_frame() {
        let log = new_log();
        let mut manager = SceneManager::default();
        manager.change_scene(Probe::new("A", &log));
        manager.update(0.1);
        take(&log);

        let late = Rc::new(Cell::new(None));
        let late_slot = Rc::clone(&late);
        let late_log = Rc::clone(&log);
        manager.context_mut().attach(SubScene::new(move |context, _| {
            if late_slot.get().is_none() {
                late_slot.set(Some(context.attach(Probe::new("late", &late_log))));
            }
        }));
        manager.update(0.1);
        assert_eq!(take(&log), vec!["A.update", "late.start"]);

        manager.update(0.1);
        assert_eq!(take(&log), vec!["A.update", "late.update"]);
    }

    /// Detaches the registered targets and attaches a replacement on its
    /// first update.
    struct Mutator {
        log: Log,
        targets: Rc<RefCell<Vec<SceneId>>>,
        fired: bool,
    }

    impl Scene for Mutator {
        fn update(&mut self, context: &mut SceneContext, _delta_time: f32) {
            self.log.borrow_mut().push("S2.update".to_string());
            if !self.fired {
                self.fired = true;
                for id in self.targets.borrow().iter() {
                    context.detach(*id);
                }
                context.attach(Probe::new("S4", &self.log));
            }
        }

        fn end(&mut self, _context: &mut SceneContext) {
            self.log.borrow_mut().push("S2.end".to_string());
        }
    }

    #[test]
    fn mutation_during_update_skips_and_repeats_nothing() {
        let log = new_log();
        let targets = Rc::new(RefCell::new(Vec::new()));
        let mut manager = SceneManager::default();
        manager.change_scene(Probe::new("A", &log));
        manager.update(0.1);

        let context = manager.context_mut();
        context.attach(Probe::new("S1", &log));
        let s2 = context.attach(Mutator {
            log: Rc::clone(&log),
            targets: Rc::clone(&targets),
            fired: false,
        });
        let s3 = context.attach(Probe::new("S3", &log));
        targets.borrow_mut().extend([s3, s2]);
        take(&log);

        manager.update(0.1);
        assert_eq!(
            take(&log),
            vec!["A.update", "S1.update", "S2.update", "S4.start", "S2.end", "S3.end"]
        );

        manager.update(0.1);
        assert_eq!(take(&log), vec!["A.update", "S1.update", "S4.update"]);
    }

    #[test]
    fn nested_sub_scenes_end_with_parent() {
        let log = new_log();
        let mut manager = SceneManager::default();
        manager.change_scene(Probe::new("A", &log));
        manager.update(0.1);

        let (parent, done) = Probe::completion("S1", &log);
        let s1 = manager.context_mut().attach(parent);
        let child = manager.context_mut().attach_to(s1, Probe::new("C", &log));
        manager.update(0.1);
        assert_eq!(manager.context().sub_scenes(s1), vec![child]);
        take(&log);

        done.set(true);
        manager.update(0.1);

        assert_eq!(take(&log), vec!["A.update", "S1.end", "C.end"]);
        assert!(!manager.context().is_attached(child));
    }

    #[test]
    fn detach_ends_scene_at_next_check() {
        let log = new_log();
        let mut manager = SceneManager::default();
        manager.change_scene(Probe::new("A", &log));
        manager.update(0.1);
        let s1 = manager.context_mut().attach(Probe::new("S1", &log));
        take(&log);

        assert!(manager.context_mut().detach(s1));
        assert!(!manager.context().is_attached(s1));
        assert!(!manager.context_mut().detach(s1));

        manager.update(0.1);
        assert_eq!(take(&log), vec!["A.update", "S1.end"]);
    }

    #[test]
    fn attach_agent_runs_closure() {
        let total = Rc::new(Cell::new(0.0));
        let sum = Rc::clone(&total);
        let log = new_log();
        let mut manager = SceneManager::default();
        manager.change_scene(Probe::new("A", &log));
        manager.context_mut().attach_agent(move |dt: f32| sum.set(sum.get() + dt));

        manager.update(0.25);
        manager.update(0.25);

        assert_eq!(total.get(), 0.5);
    }

    //=====================================================================
    // Global Scene Tests
    //=====================================================================

    #[test]
    fn global_scene_survives_scene_change() {
        let log = new_log();
        let mut manager = SceneManager::default();
        manager.change_scene(Probe::new("A", &log));
        let (global, done) = Probe::completion("G", &log);
        let g = manager.attach_global(global);
        assert_eq!(take(&log), vec!["G.start"]);

        manager.update(0.1);
        assert_eq!(take(&log), vec!["A.start", "A.update", "G.update"]);

        manager.change_scene(Probe::new("B", &log));
        manager.update(0.1);
        assert_eq!(take(&log), vec!["A.end", "B.start", "B.update", "G.update"]);

        done.set(true);
        manager.update(0.1);
        assert_eq!(take(&log), vec!["B.update", "G.end"]);
        assert!(!manager.context().is_attached(g));
        assert!(manager.context().global_scenes().is_empty());
    }

    //=====================================================================
    // Manager Tests
    //=====================================================================

    #[test]
    fn shutdown_ends_everything() {
        let log = new_log();
        let mut manager = SceneManager::default();
        manager.change_scene(Probe::new("A", &log));
        manager.attach_global(Probe::new("G", &log));
        manager.update(0.1);
        manager.context_mut().attach(Probe::new("S1", &log));
        manager.context_mut().stage_mut().spawn("default", square());
        manager.change_scene(Probe::new("never", &log));
        take(&log);

        manager.shutdown();

        assert_eq!(take(&log), vec!["A.end", "S1.end", "G.end"]);
        assert_eq!(manager.context().active_scene(), None);
        assert_eq!(manager.context().pending_scene(), None);
        assert_eq!(manager.stage().node_count(), 0);
    }

    #[test]
    fn shutdown_drops_sub_scenes_attached_from_end() {
        let log = new_log();
        let mut manager = SceneManager::default();
        manager.change_scene(Probe::new("A", &log));
        manager.update(0.1);
        manager.context_mut().attach(Chain { name: "S1", log: Rc::clone(&log) });
        take(&log);

        manager.shutdown();

        assert_eq!(take(&log), vec!["A.end", "S1.end", "F.attached:false"]);
        assert_eq!(manager.context().scene_count(), 0);
    }

    #[test]
    fn render_records_draw_counts() {
        let mut manager = SceneManager::default();
        manager.context_mut().stage_mut().spawn("default", square());
        let mut visitor = CollectingVisitor::new();

        let draws = manager.render(&mut visitor);

        assert_eq!(draws.primitives, 1);
        assert_eq!(manager.context().stats().draws(), draws);
        assert_eq!(visitor.draws(), vec!["draw_background #000000", "draw_rect Rect(10, 10, 20, 20)"]);
    }

    #[test]
    fn debug_information_lists_status() {
        let mut manager = SceneManager::default();
        manager.with_renderer_name("Test");
        manager.context_mut().stats_mut().count("bullets");

        let info = manager.debug_information();

        assert_eq!(info[0], "Renderer:  Test");
        assert_eq!(info[1], "Canvas:  800x600");
        assert!(info[2].starts_with("Framerate:  "));
        assert!(info.contains(&"bullets:  1".to_string()));
    }

    #[test]
    fn scenes_can_request_quit() {
        let mut manager = SceneManager::default();
        manager.change_scene(SubScene::new(|context, _| context.quit()));
        assert!(!manager.is_quit_requested());

        manager.update(0.1);

        assert!(manager.is_quit_requested());
    }

    #[test]
    fn input_reaches_scenes() {
        let pressed = Rc::new(Cell::new(false));
        let seen = Rc::clone(&pressed);
        let mut manager = SceneManager::default();
        manager.change_scene(SubScene::new(move |context, _| {
            seen.set(context.input().is_pointer_pressed());
        }));

        manager.process_input(&[InputEvent::PointerPressed {
            button: PointerButton::Primary,
            position: Vec2::new(5.0, 5.0),
        }]);
        manager.update(0.1);
        assert!(pressed.get());

        manager.process_input(&[]);
        manager.update(0.1);
        assert!(!pressed.get());
    }

    #[test]
    fn frame_count_advances_per_update() {
        let mut manager = SceneManager::default();
        manager.update(0.1);
        manager.update(0.1);
        assert_eq!(manager.context().frame_count(), 2);
    }
}
