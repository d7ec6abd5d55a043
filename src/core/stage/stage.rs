//=========================================================================
// Stage
//=========================================================================
//
// Renderer-agnostic description of everything that should be drawn.
//
// Architecture:
//   Stage
//     ├─ layers: Vec<Layer>                    (creation order = draw order)
//     ├─ nodes: SlotMap<NodeId, StageNode>     (arena of 2D graphics)
//     ├─ world: Option<World3D>                (Mode3D only)
//     └─ observers: Vec<Box<dyn StageObserver>>
//
// Nodes are created in the arena first and then placed on exactly one
// layer. Placing a node that is already on the stage is a programming
// error. Every mutation is published to the observers before returning,
// so the next `visit()` always sees the latest content.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{debug, warn};
use slotmap::{new_key_type, SlotMap};

//=== Internal Dependencies ===============================================

use super::canvas::{Canvas, GraphicsMode};
use super::color::ColorRGB;
use super::geometry::Shape;
use super::graphic::{Graphic2D, Primitive, Sprite, Text};
use super::layer::Layer;
use super::observer::{ObserverId, StageEvent, StageObserver};
use super::visitor::{DrawStats, StageVisitor};
use super::world::{ModelId, PolygonModel, World3D};

new_key_type! {
    /// Handle to a 2D node in a [`Stage`].
    pub struct NodeId;
}

/// Name of the layer created on first use when no layer is specified.
pub const DEFAULT_LAYER: &str = "default";

//=== StageNode ===========================================================

#[derive(Debug)]
struct StageNode {
    graphic: Graphic2D,
    layer: Option<String>,
}

//=== Stage ===============================================================

/// Layered 2D content plus an optional 3D world.
///
/// # Examples
///
/// ```
/// use proscenium::core::stage::{Canvas, CollectingVisitor, ColorRGB, GraphicsMode, Stage};
/// use proscenium::core::stage::{Primitive, Rect, Shape};
///
/// let mut stage = Stage::new(Canvas::new(800, 600), GraphicsMode::Mode2D);
/// stage.add_layer("background");
/// stage.add_layer("hud");
///
/// let panel = Primitive::new(Shape::Rect(Rect::new(0.0, 0.0, 100.0, 20.0)), ColorRGB::BLUE);
/// let id = stage.spawn("hud", panel);
/// assert!(stage.contains(id));
///
/// let mut visitor = CollectingVisitor::new();
/// let stats = stage.visit(&mut visitor);
/// assert_eq!(stats.primitives, 1);
/// ```
pub struct Stage {
    canvas: Canvas,
    graphics_mode: GraphicsMode,
    background_color: ColorRGB,
    layers: Vec<Layer>,
    nodes: SlotMap<NodeId, StageNode>,
    world: Option<World3D>,
    observers: Vec<(ObserverId, Box<dyn StageObserver>)>,
    next_observer_id: u64,
}

impl Stage {
    //--- Construction -----------------------------------------------------

    pub fn new(canvas: Canvas, graphics_mode: GraphicsMode) -> Self {
        let world = match graphics_mode {
            GraphicsMode::Mode2D => None,
            GraphicsMode::Mode3D => Some(World3D::new()),
        };

        Self {
            canvas,
            graphics_mode,
            background_color: ColorRGB::BLACK,
            layers: Vec::new(),
            nodes: SlotMap::with_key(),
            world,
            observers: Vec::new(),
            next_observer_id: 0,
        }
    }

    //--- Canvas & Background ----------------------------------------------

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn graphics_mode(&self) -> GraphicsMode {
        self.graphics_mode
    }

    pub fn background_color(&self) -> ColorRGB {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: ColorRGB) {
        self.background_color = color;
    }

    //--- Layers -----------------------------------------------------------

    /// Creates a layer drawn on top of all existing layers.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or a layer with that name already exists.
    pub fn add_layer(&mut self, name: &str) -> &Layer {
        assert!(!name.is_empty(), "Invalid layer name: layer names cannot be empty");
        assert!(!self.has_layer(name), "Layer with same name already exists: {}", name);

        self.layers.push(Layer::new(name.to_string()));
        self.notify(StageEvent::LayerAdded {
            layer: name.to_string(),
        });

        &self.layers[self.layers.len() - 1]
    }

    /// Returns the named layer, creating it first if it does not exist.
    pub fn retrieve_layer(&mut self, name: &str) -> &Layer {
        match self.layer_index(name) {
            Some(index) => &self.layers[index],
            None => self.add_layer(name),
        }
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name() == name)
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.layer_index(name).is_some()
    }

    /// Layers in draw order, bottom first.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Shows or hides every node on a layer.
    ///
    /// # Panics
    ///
    /// Panics if the layer does not exist.
    pub fn set_layer_visible(&mut self, name: &str, visible: bool) {
        let index = self.expect_layer(name);
        self.layers[index].set_visible(visible);
    }

    fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.name() == name)
    }

    fn expect_layer(&self, name: &str) -> usize {
        self.layer_index(name)
            .unwrap_or_else(|| panic!("No such layer: {}", name))
    }

    //--- Nodes ------------------------------------------------------------

    /// Stores a graphic in the stage without placing it on a layer.
    pub fn create(&mut self, graphic: impl Into<Graphic2D>) -> NodeId {
        self.nodes.insert(StageNode {
            graphic: graphic.into(),
            layer: None,
        })
    }

    /// Places a node at the top of a layer.
    ///
    /// The default layer is created on first use. Other layers must have
    /// been added beforehand.
    ///
    /// # Panics
    ///
    /// - If `node` was not created by this stage
    /// - If `node` is already placed on any layer
    /// - If `layer` does not exist and is not the default layer
    pub fn add(&mut self, layer: &str, node: NodeId) {
        let placed = self
            .nodes
            .get(node)
            .unwrap_or_else(|| panic!("Unknown stage node: {:?}", node))
            .layer
            .clone();

        if let Some(existing) = placed {
            panic!("Node {:?} is already on the stage (layer {})", node, existing);
        }

        if layer == DEFAULT_LAYER && !self.has_layer(DEFAULT_LAYER) {
            self.add_layer(DEFAULT_LAYER);
        }

        let index = self.expect_layer(layer);
        self.layers[index].push(node);

        if let Some(entry) = self.nodes.get_mut(node) {
            entry.layer = Some(layer.to_string());
        }

        self.notify(StageEvent::NodeAdded {
            layer: layer.to_string(),
            node,
        });
    }

    /// Creates a node and places it on a layer in one step.
    pub fn spawn(&mut self, layer: &str, graphic: impl Into<Graphic2D>) -> NodeId {
        let node = self.create(graphic);
        self.add(layer, node);
        node
    }

    /// Takes a node off whichever layer holds it. The node stays in the
    /// stage and can be added again. Returns `true` if it was placed.
    pub fn remove(&mut self, node: NodeId) -> bool {
        let Some(layer) = self.nodes.get(node).and_then(|entry| entry.layer.clone()) else {
            return false;
        };
        self.remove_from(&layer, node)
    }

    /// Takes a node off a specific layer. Observers are only notified if
    /// the node was actually on that layer.
    pub fn remove_from(&mut self, layer: &str, node: NodeId) -> bool {
        let Some(index) = self.layer_index(layer) else {
            return false;
        };

        if !self.layers[index].remove(node) {
            return false;
        }

        if let Some(entry) = self.nodes.get_mut(node) {
            entry.layer = None;
        }

        self.notify(StageEvent::NodeRemoved {
            layer: layer.to_string(),
            node,
        });
        true
    }

    /// Removes a node from its layer and from the stage, returning it.
    pub fn destroy(&mut self, node: NodeId) -> Option<Graphic2D> {
        self.remove(node);
        self.nodes.remove(node).map(|entry| entry.graphic)
    }

    /// Returns `true` if the node is currently placed on a layer.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|entry| entry.layer.is_some())
    }

    pub fn node(&self, node: NodeId) -> Option<&Graphic2D> {
        self.nodes.get(node).map(|entry| &entry.graphic)
    }

    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut Graphic2D> {
        self.nodes.get_mut(node).map(|entry| &mut entry.graphic)
    }

    pub fn sprite_mut(&mut self, node: NodeId) -> Option<&mut Sprite> {
        match self.node_mut(node)? {
            Graphic2D::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    pub fn primitive_mut(&mut self, node: NodeId) -> Option<&mut Primitive> {
        match self.node_mut(node)? {
            Graphic2D::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, node: NodeId) -> Option<&mut Text> {
        match self.node_mut(node)? {
            Graphic2D::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Layer the node is placed on, if any.
    pub fn layer_of(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).and_then(|entry| entry.layer.as_deref())
    }

    /// Number of nodes placed on layers.
    pub fn node_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    //--- 3D World ---------------------------------------------------------

    pub fn has_world(&self) -> bool {
        self.world.is_some()
    }

    /// # Panics
    ///
    /// Panics if the stage was created in 2D mode.
    pub fn world(&self) -> &World3D {
        self.world
            .as_ref()
            .unwrap_or_else(|| panic!("3D graphics not supported in {:?}", self.graphics_mode))
    }

    /// # Panics
    ///
    /// Panics if the stage was created in 2D mode.
    pub fn world_mut(&mut self) -> &mut World3D {
        let mode = self.graphics_mode;
        self.world
            .as_mut()
            .unwrap_or_else(|| panic!("3D graphics not supported in {:?}", mode))
    }

    /// # Panics
    ///
    /// Panics if the stage was created in 2D mode.
    pub fn add_model(&mut self, model: PolygonModel) -> ModelId {
        let id = self.world_mut().add(model);
        self.notify(StageEvent::ModelAdded { model: id });
        id
    }

    pub fn remove_model(&mut self, id: ModelId) -> Option<PolygonModel> {
        let model = self.world.as_mut()?.remove(id)?;
        self.notify(StageEvent::ModelRemoved { model: id });
        Some(model)
    }

    //--- Frame Update -----------------------------------------------------

    /// Advances node-local animation for every placed node and model,
    /// including nodes on hidden layers.
    pub fn update(&mut self, delta_time: f32) {
        for layer in &self.layers {
            for id in layer.nodes() {
                if let Some(entry) = self.nodes.get_mut(*id) {
                    entry.graphic.update(delta_time);
                }
            }
        }

        if let Some(world) = &mut self.world {
            world.update(delta_time);
        }
    }

    /// Drops every layer, node and model, then notifies observers once.
    pub fn clear(&mut self) {
        debug!(
            "Clearing stage ({} layers, {} nodes)",
            self.layers.len(),
            self.nodes.len()
        );

        self.layers.clear();
        self.nodes.clear();
        if let Some(world) = &mut self.world {
            world.clear();
        }

        self.notify(StageEvent::Cleared);
    }

    //--- Observers --------------------------------------------------------

    pub fn subscribe(&mut self, observer: impl StageObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `true` if the observer was subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(other, _)| *other != id);
        self.observers.len() != before
    }

    fn notify(&mut self, event: StageEvent) {
        for (_, observer) in &mut self.observers {
            observer.notify(&event);
        }
    }

    //--- Visiting ---------------------------------------------------------

    /// Walks the stage back-to-front, handing content to `visitor`.
    ///
    /// A node is visible when its own flag and its layer are visible and
    /// its bounds intersect the canvas. Invisible nodes still receive the
    /// pre/post callbacks but are not drawn.
    pub fn visit<V: StageVisitor + ?Sized>(&self, visitor: &mut V) -> DrawStats {
        let canvas_bounds = self.canvas.bounds();
        let mut stats = DrawStats::default();

        visitor.pre_visit_stage(self);
        visitor.draw_background(self.background_color);

        if let Some(world) = &self.world {
            visitor.visit_world(world);
        }

        for layer in &self.layers {
            visitor.pre_visit_layer(layer);

            for id in layer.nodes() {
                let Some(entry) = self.nodes.get(*id) else {
                    continue;
                };
                let graphic = &entry.graphic;
                let visible = layer.is_visible()
                    && graphic.is_visible()
                    && graphic.bounds().intersects(&canvas_bounds);

                visitor.pre_visit_graphic(*id, graphic, visible);
                if visible {
                    Self::draw_graphic(graphic, visitor, &mut stats);
                }
                visitor.post_visit_graphic(*id, graphic);
            }

            visitor.post_visit_layer(layer);
        }

        visitor.post_visit_stage(self);
        stats
    }

    fn draw_graphic<V: StageVisitor + ?Sized>(graphic: &Graphic2D, visitor: &mut V, stats: &mut DrawStats) {
        match graphic {
            Graphic2D::Sprite(sprite) => {
                visitor.draw_sprite(sprite);
                stats.sprites += 1;
            }
            Graphic2D::Primitive(primitive) => {
                match primitive.displayed_shape() {
                    Shape::Line(line) => visitor.draw_line(primitive, &line),
                    Shape::Rect(rect) => visitor.draw_rect(primitive, &rect),
                    Shape::Circle(circle) => visitor.draw_circle(primitive, &circle),
                    Shape::Polygon(polygon) => visitor.draw_polygon(primitive, &polygon),
                    other => {
                        warn!("Stage contains unsupported primitive shape: {}", other.kind());
                        return;
                    }
                }
                stats.primitives += 1;
            }
            Graphic2D::Text(text) => {
                visitor.draw_text(text);
                stats.texts += 1;
            }
        }
    }
}

//--- Trait Implementations -----------------------------------------------

/// Textual dump of the stage as it is drawn: layers and nodes listed
/// higher are drawn on top.
impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stage")?;

        for layer in self.layers.iter().rev() {
            writeln!(f, "    2D graphics layer [{}]", layer.name())?;
            for id in layer.nodes().iter().rev() {
                if let Some(entry) = self.nodes.get(*id) {
                    writeln!(f, "        {}", entry.graphic)?;
                }
            }
        }

        if let Some(world) = &self.world {
            writeln!(f, "    3D graphics layer")?;
            for (_, model) in world.models() {
                writeln!(f, "        PolygonModel [{}]", model.mesh)?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("canvas", &self.canvas)
            .field("graphics_mode", &self.graphics_mode)
            .field("layers", &self.layers)
            .field("nodes", &self.nodes.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
