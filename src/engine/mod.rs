//=========================================================================
// Proscenium Engine
//
// Frame loop that ties the scene manager to a renderer.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run(renderer)──>  [Frame loop]
//         │                          │
//         ├─ with_tps()              ├─ init(|manager| ...)
//         ├─ with_canvas()           ├─ handle() → EngineHandle (any thread)
//         └─ with_channel_capacity() └─ step(delta, renderer) per frame
// ```
//
// Each frame:
//   drain EngineHandle signals → input → SceneManager::update
//     → SceneManager::render(renderer) → Renderer::present → stats
//
//=========================================================================

//=== Module Declarations =================================================

mod collector;
mod renderer;

//=== Public API ==========================================================

pub use collector::{EngineHandle, TickControl};
pub use renderer::{EngineError, Renderer, RendererError};

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneManager;
use crate::core::stage::{Canvas, ColorRGB, GraphicsMode, Stage};
use collector::{EngineSignal, SignalCollector};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (frames per second)
/// - **Canvas**: 800x600, 2D graphics, black background
/// - **Channel capacity**: 128 signals
/// - **Max delta time**: 0.1 seconds
///
/// # Examples
///
/// ```no_run
/// use proscenium::prelude::*;
///
/// struct Title;
///
/// impl Scene for Title {
///     fn update(&mut self, _context: &mut SceneContext, _delta_time: f32) {}
/// }
///
/// let mut renderer = CollectingVisitor::new();
///
/// EngineBuilder::new()
///     .with_tps(30.0)
///     .with_canvas(1280, 720)
///     .build()
///     .init(|manager| {
///         manager.change_scene(Title);
///     })
///     .run(&mut renderer)
///     .expect("renderer failed");
/// ```
#[derive(Debug)]
pub struct EngineBuilder {
    tps: f64,
    canvas_width: u32,
    canvas_height: u32,
    graphics_mode: GraphicsMode,
    background_color: ColorRGB,
    channel_capacity: usize,
    max_delta_time: f32,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            canvas_width: 800,
            canvas_height: 600,
            graphics_mode: GraphicsMode::Mode2D,
            background_color: ColorRGB::BLACK,
            channel_capacity: 128,
            max_delta_time: 0.1,
        }
    }

    /// Sets the target number of frames per second for [`Engine::run`].
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the canvas size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Canvas dimensions must be positive, got {}x{}",
            width,
            height
        );
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// `GraphicsMode::Mode3D` gives the stage a 3D world.
    pub fn with_graphics_mode(mut self, mode: GraphicsMode) -> Self {
        self.graphics_mode = mode;
        self
    }

    pub fn with_background_color(mut self, color: ColorRGB) -> Self {
        self.background_color = color;
        self
    }

    /// Sets the capacity of the [`EngineHandle`] control channel.
    ///
    /// Senders block while the channel is full.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Upper bound for the delta time handed to scenes.
    ///
    /// Keeps a long stall (debugger, suspended window) from turning into
    /// one giant simulation step.
    ///
    /// # Panics
    ///
    /// Panics if `seconds <= 0.0`.
    pub fn with_max_delta_time(mut self, seconds: f32) -> Self {
        assert!(seconds > 0.0, "Max delta time must be positive, got {}", seconds);
        self.max_delta_time = seconds;
        self
    }

    /// Builds the engine with an empty scene manager.
    pub fn build(self) -> Engine {
        info!(
            "Building engine (TPS: {}, canvas: {}x{}, {:?}, channel: {})",
            self.tps,
            self.canvas_width,
            self.canvas_height,
            self.graphics_mode,
            self.channel_capacity
        );

        let mut stage = Stage::new(
            Canvas::new(self.canvas_width, self.canvas_height),
            self.graphics_mode,
        );
        stage.set_background_color(self.background_color);

        let (sender, receiver) = bounded(self.channel_capacity);

        Engine {
            manager: SceneManager::new(stage, self.tps as f32),
            collector: SignalCollector::new(receiver),
            sender,
            tps: self.tps,
            max_delta_time: self.max_delta_time,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Single-threaded frame loop around a [`SceneManager`].
///
/// Create via [`EngineBuilder`]. Drive it with [`Engine::run`], or call
/// [`Engine::step`] from a host-owned animation loop.
pub struct Engine {
    manager: SceneManager,
    collector: SignalCollector,
    sender: Sender<EngineSignal>,
    tps: f64,
    max_delta_time: f32,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Configures the scene manager before the loop starts.
    ///
    /// ```no_run
    /// # use proscenium::prelude::*;
    /// # struct Menu;
    /// # impl Scene for Menu {
    /// #     fn update(&mut self, _context: &mut SceneContext, _delta_time: f32) {}
    /// # }
    /// let engine = EngineBuilder::new().build().init(|manager| {
    ///     manager.with_renderer_name("Canvas2D");
    ///     manager.change_scene(Menu);
    /// });
    /// ```
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut SceneManager),
    {
        info!("Initializing scene manager");
        init_fn(&mut self.manager);
        self
    }

    /// Remote control usable from other threads.
    pub fn handle(&self) -> EngineHandle {
        EngineHandle::new(self.sender.clone())
    }

    pub fn manager(&self) -> &SceneManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut SceneManager {
        &mut self.manager
    }

    //--- Execution --------------------------------------------------------

    /// Processes exactly one frame.
    ///
    /// Scenes receive `delta_time` clamped to `[0, max_delta_time]`, while
    /// frame statistics record the unclamped interval. Returns
    /// [`TickControl::Exit`] when quit was requested through a handle
    /// (before the frame runs) or by a scene (after it ran).
    pub fn step<R>(&mut self, delta_time: f32, renderer: &mut R) -> Result<TickControl, EngineError>
    where
        R: Renderer + ?Sized,
    {
        if self.collector.collect_frame() == TickControl::Exit {
            info!("Quit signal received");
            return Ok(TickControl::Exit);
        }

        let frame_time = if delta_time.is_finite() { delta_time.max(0.0) } else { 0.0 };
        let delta_time = frame_time.min(self.max_delta_time);
        let frame_start = Instant::now();

        //--- 1. Input and scene logic ------------------------------------
        self.manager.process_input(self.collector.events());
        self.manager.update(delta_time);
        let update_time = frame_start.elapsed();

        //--- 2. Rendering -----------------------------------------------
        self.manager.render(renderer);
        if let Err(e) = renderer.present() {
            error!("Renderer {} failed to present frame: {}", renderer.name(), e);
            return Err(e.into());
        }
        let render_time = frame_start.elapsed().saturating_sub(update_time);

        //--- 3. Statistics ----------------------------------------------
        self.manager
            .record_frame(Duration::from_secs_f32(frame_time), update_time, render_time);

        if self.manager.is_quit_requested() {
            return Ok(TickControl::Exit);
        }
        Ok(TickControl::Continue)
    }

    /// Runs the frame loop at the configured rate until quit is requested.
    ///
    /// All scenes are ended before returning, also when the renderer fails.
    pub fn run<R>(mut self, renderer: &mut R) -> Result<(), EngineError>
    where
        R: Renderer + ?Sized,
    {
        info!("Starting frame loop (TPS: {}, renderer: {})", self.tps, renderer.name());
        self.manager.with_renderer_name(renderer.name().to_string());

        let frame_duration = Duration::from_secs_f64(1.0 / self.tps);
        let mut delta_time = frame_duration.as_secs_f32();
        let mut last_frame = Instant::now();

        let result = loop {
            let frame_start = Instant::now();

            match self.step(delta_time, renderer) {
                Ok(TickControl::Continue) => {}
                Ok(TickControl::Exit) => break Ok(()),
                Err(e) => break Err(e),
            }

            //--- Maintain pacing ---------------------------------------------
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }

            let now = Instant::now();
            delta_time = now.duration_since(last_frame).as_secs_f32();
            last_frame = now;
        };

        self.manager.shutdown();
        info!("Engine shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode, Modifiers};
    use crate::core::scene::{Scene, SceneContext, SubScene};
    use crate::core::stage::{
        Circle, CollectingVisitor, Line, Polygon, Primitive, Rect, Shape, Sprite, StageVisitor,
        Text,
    };
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::thread;

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!((builder.canvas_width, builder.canvas_height), (800, 600));
        assert_eq!(builder.graphics_mode, GraphicsMode::Mode2D);
        assert_eq!(builder.max_delta_time, 0.1);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        EngineBuilder::new().with_tps(-60.0);
    }

    #[test]
    #[should_panic(expected = "Canvas dimensions must be positive")]
    fn builder_with_canvas_panics_on_zero() {
        EngineBuilder::new().with_canvas(0, 600);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Max delta time must be positive")]
    fn builder_with_max_delta_time_panics_on_zero() {
        EngineBuilder::new().with_max_delta_time(0.0);
    }

    #[test]
    fn builder_configures_stage() {
        let engine = EngineBuilder::new()
            .with_tps(120.0)
            .with_canvas(320, 240)
            .with_graphics_mode(GraphicsMode::Mode3D)
            .with_background_color(ColorRGB::BLUE)
            .build();

        let stage = engine.manager().stage();
        assert_eq!(engine.tps, 120.0);
        assert_eq!(stage.canvas().width(), 320);
        assert_eq!(stage.canvas().height(), 240);
        assert!(stage.has_world());
        assert_eq!(stage.background_color(), ColorRGB::BLUE);
        assert_eq!(engine.manager().context().stats().target_framerate(), 120.0);
    }

    //=====================================================================
    // Engine Tests
    //=====================================================================

    struct Counter {
        updates: Rc<Cell<u32>>,
        last_delta: Rc<Cell<f32>>,
        ended: Rc<Cell<bool>>,
    }

    impl Scene for Counter {
        fn update(&mut self, _context: &mut SceneContext, delta_time: f32) {
            self.updates.set(self.updates.get() + 1);
            self.last_delta.set(delta_time);
        }

        fn end(&mut self, _context: &mut SceneContext) {
            self.ended.set(true);
        }
    }

    fn counter() -> (Counter, Rc<Cell<u32>>, Rc<Cell<f32>>, Rc<Cell<bool>>) {
        let updates = Rc::new(Cell::new(0));
        let last_delta = Rc::new(Cell::new(0.0));
        let ended = Rc::new(Cell::new(false));
        let scene = Counter {
            updates: Rc::clone(&updates),
            last_delta: Rc::clone(&last_delta),
            ended: Rc::clone(&ended),
        };
        (scene, updates, last_delta, ended)
    }

    #[test]
    fn init_gives_access_to_manager() {
        let (scene, _, _, _) = counter();
        let engine = EngineBuilder::new().build().init(|manager| {
            manager.change_scene(scene);
        });

        assert!(engine.manager().context().pending_scene().is_some());
    }

    #[test]
    fn step_updates_and_renders() {
        let (scene, updates, last_delta, _) = counter();
        let mut engine = EngineBuilder::new().build().init(|manager| {
            manager.change_scene(scene);
        });
        engine
            .manager_mut()
            .context_mut()
            .stage_mut()
            .spawn("default", Primitive::new(Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)), ColorRGB::RED));
        let mut renderer = CollectingVisitor::new();

        let control = engine.step(0.05, &mut renderer);

        assert_eq!(control, Ok(TickControl::Continue));
        assert_eq!(updates.get(), 1);
        assert_eq!(last_delta.get(), 0.05);
        assert_eq!(renderer.draws().len(), 2);
        assert_eq!(engine.manager().context().stats().frame_count(), 1);
    }

    #[test]
    fn step_clamps_delta_time() {
        let (scene, _, last_delta, _) = counter();
        let mut engine = EngineBuilder::new()
            .with_max_delta_time(0.25)
            .build()
            .init(|manager| {
                manager.change_scene(scene);
            });
        let mut renderer = CollectingVisitor::new();

        engine.step(3.0, &mut renderer).unwrap();
        assert_eq!(last_delta.get(), 0.25);

        engine.step(-1.0, &mut renderer).unwrap();
        assert_eq!(last_delta.get(), 0.0);
    }

    #[test]
    fn stats_record_unclamped_frame_time() {
        let (scene, _, last_delta, _) = counter();
        let mut engine = EngineBuilder::new()
            .with_max_delta_time(0.25)
            .build()
            .init(|manager| {
                manager.change_scene(scene);
            });
        let mut renderer = CollectingVisitor::new();

        engine.step(2.0, &mut renderer).unwrap();

        assert_eq!(last_delta.get(), 0.25);
        assert_eq!(engine.manager().context().stats().framerate(), 0.5);
    }

    #[test]
    fn handle_input_reaches_scenes() {
        let pressed = Rc::new(Cell::new(false));
        let seen = Rc::clone(&pressed);
        let mut engine = EngineBuilder::new().build().init(|manager| {
            manager.change_scene(SubScene::new(move |context, _| {
                seen.set(context.input().is_key_pressed(KeyCode::Enter));
            }));
        });
        let handle = engine.handle();
        let mut renderer = CollectingVisitor::new();

        thread::spawn(move || {
            handle.send_input(vec![InputEvent::KeyDown {
                key: KeyCode::Enter,
                modifiers: Modifiers::NONE,
            }]);
        })
        .join()
        .unwrap();

        engine.step(0.016, &mut renderer).unwrap();
        assert!(pressed.get());

        engine.step(0.016, &mut renderer).unwrap();
        assert!(!pressed.get());
    }

    #[test]
    fn handle_quit_stops_before_frame() {
        let (scene, updates, _, _) = counter();
        let mut engine = EngineBuilder::new().build().init(|manager| {
            manager.change_scene(scene);
        });
        let mut renderer = CollectingVisitor::new();

        assert!(engine.handle().request_quit());

        assert_eq!(engine.step(0.016, &mut renderer), Ok(TickControl::Exit));
        assert_eq!(updates.get(), 0);
    }

    #[test]
    fn run_stops_when_scene_quits_and_ends_scenes() {
        let frames = Rc::new(Cell::new(0));
        let ended = Rc::new(RefCell::new(Vec::new()));

        struct Quitter {
            frames: Rc<Cell<u32>>,
            ended: Rc<RefCell<Vec<&'static str>>>,
        }

        impl Scene for Quitter {
            fn update(&mut self, context: &mut SceneContext, _delta_time: f32) {
                self.frames.set(self.frames.get() + 1);
                if self.frames.get() == 3 {
                    context.quit();
                }
            }

            fn end(&mut self, _context: &mut SceneContext) {
                self.ended.borrow_mut().push("quitter");
            }
        }

        let scene = Quitter {
            frames: Rc::clone(&frames),
            ended: Rc::clone(&ended),
        };
        let mut renderer = CollectingVisitor::new();

        let result = EngineBuilder::new()
            .with_tps(1000.0)
            .build()
            .init(|manager| {
                manager.change_scene(scene);
            })
            .run(&mut renderer);

        assert_eq!(result, Ok(()));
        assert_eq!(frames.get(), 3);
        assert_eq!(*ended.borrow(), vec!["quitter"]);
    }

    //--- Failing Renderer -------------------------------------------------

    struct BrokenRenderer;

    impl StageVisitor for BrokenRenderer {
        fn draw_background(&mut self, _color: ColorRGB) {}
        fn draw_sprite(&mut self, _sprite: &Sprite) {}
        fn draw_line(&mut self, _primitive: &Primitive, _line: &Line) {}
        fn draw_rect(&mut self, _primitive: &Primitive, _rect: &Rect) {}
        fn draw_circle(&mut self, _primitive: &Primitive, _circle: &Circle) {}
        fn draw_polygon(&mut self, _primitive: &Primitive, _polygon: &Polygon) {}
        fn draw_text(&mut self, _text: &Text) {}
    }

    impl Renderer for BrokenRenderer {
        fn name(&self) -> &str {
            "Broken"
        }

        fn present(&mut self) -> Result<(), RendererError> {
            Err(RendererError::ContextLost)
        }
    }

    #[test]
    fn run_reports_renderer_failure_after_shutdown() {
        let (scene, updates, _, ended) = counter();
        let result = EngineBuilder::new()
            .build()
            .init(|manager| {
                manager.change_scene(scene);
            })
            .run(&mut BrokenRenderer);

        assert_eq!(result, Err(EngineError::Renderer(RendererError::ContextLost)));
        assert_eq!(updates.get(), 1);
        assert!(ended.get());
    }

    #[test]
    fn run_returns_immediately_on_quit_signal() {
        let (scene, updates, _, ended) = counter();
        let engine = EngineBuilder::new().build().init(|manager| {
            manager.change_scene(scene);
        });
        engine.handle().request_quit();
        let mut renderer = CollectingVisitor::new();

        assert_eq!(engine.run(&mut renderer), Ok(()));
        assert_eq!(updates.get(), 0);
        assert!(!ended.get());
        assert!(renderer.calls().is_empty());
    }
}
