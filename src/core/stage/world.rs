//=========================================================================
// 3D World
//=========================================================================
//
// Optional 3D scene composed underneath the 2D layers.
//
// Only available when the stage was created in `GraphicsMode::Mode3D`.
// Models follow the same add/update/clear discipline as 2D nodes and
// are visited before any 2D layer, so 2D always draws on top.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use glam::Vec3;
use slotmap::{new_key_type, SlotMap};

//=== Internal Dependencies ===============================================

use super::color::ColorRGB;

new_key_type! {
    /// Handle to a model in the 3D world.
    pub struct ModelId;
}

//=== Transform3D =========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    pub position: Vec3,
    /// Euler angles in degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

//=== PolygonModel ========================================================

/// Mesh instance placed in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonModel {
    pub mesh: String,
    pub transform: Transform3D,
    pub visible: bool,
    animation: Option<String>,
    animation_time: f32,
}

impl PolygonModel {
    pub fn new(mesh: impl Into<String>) -> Self {
        Self {
            mesh: mesh.into(),
            transform: Transform3D::default(),
            visible: true,
            animation: None,
            animation_time: 0.0,
        }
    }

    /// Starts playing a named mesh animation from the beginning.
    pub fn play_animation(&mut self, name: impl Into<String>) {
        self.animation = Some(name.into());
        self.animation_time = 0.0;
    }

    pub fn animation(&self) -> Option<(&str, f32)> {
        self.animation.as_deref().map(|name| (name, self.animation_time))
    }

    pub fn update(&mut self, delta_time: f32) {
        if self.animation.is_some() {
            self.animation_time += delta_time;
        }
    }
}

//=== World3D =============================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: ColorRGB,
    pub direction: Vec3,
}

/// Camera, lights and models of the 3D part of the stage.
#[derive(Debug)]
pub struct World3D {
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub ambient_light: ColorRGB,
    pub light: DirectionalLight,
    models: SlotMap<ModelId, PolygonModel>,
    order: Vec<ModelId>,
}

impl World3D {
    pub(super) fn new() -> Self {
        Self {
            camera_position: Vec3::new(10.0, 10.0, 10.0),
            camera_target: Vec3::ZERO,
            ambient_light: ColorRGB::new(100, 100, 100),
            light: DirectionalLight {
                color: ColorRGB::new(200, 200, 200),
                direction: Vec3::new(-1.0, -0.8, -0.2),
            },
            models: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    pub(super) fn add(&mut self, model: PolygonModel) -> ModelId {
        let id = self.models.insert(model);
        self.order.push(id);
        id
    }

    pub(super) fn remove(&mut self, id: ModelId) -> Option<PolygonModel> {
        let model = self.models.remove(id)?;
        self.order.retain(|other| *other != id);
        Some(model)
    }

    pub(super) fn clear(&mut self) {
        self.models.clear();
        self.order.clear();
    }

    pub fn model(&self, id: ModelId) -> Option<&PolygonModel> {
        self.models.get(id)
    }

    pub fn model_mut(&mut self, id: ModelId) -> Option<&mut PolygonModel> {
        self.models.get_mut(id)
    }

    /// Models in the order they were added.
    pub fn models(&self) -> impl Iterator<Item = (ModelId, &PolygonModel)> {
        self.order.iter().filter_map(|id| self.models.get(*id).map(|model| (*id, model)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn update(&mut self, delta_time: f32) {
        for model in self.models.values_mut() {
            model.update(delta_time);
        }
    }
}

impl fmt::Display for World3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "World3D ({} models)", self.len())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
