//! Render Abstraction
//!
//! The graphics backend is an external collaborator: everything in this
//! crate draws through the [`Renderer`] capability (fill a polygon, stroke
//! a polyline, blit a sprite, clip with a mask) and never touches a
//! graphics API directly. [`DrawList`] is the recording implementation used
//! by headless runs and tests; a windowed build supplies its own backend.

use glam::Vec2;

/// Opaque handle to a loaded texture, issued by the asset layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Drawing capability consumed by the scene and effect systems.
///
/// Coordinates are world-space; the backend applies the view transform set
/// by [`Renderer::set_view_transform`]. Colors are premultiplied-free RGBA
/// in `[0, 1]`.
pub trait Renderer {
    /// Set the world-to-screen transform for subsequent draws.
    fn set_view_transform(&mut self, center: Vec2, zoom: f32, viewport: Vec2);

    /// Fill a convex polygon given by its vertices in order.
    fn fill_polygon(&mut self, points: &[Vec2], color: [f32; 4]);

    /// Stroke an open polyline with the given width in world units.
    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: [f32; 4]);

    /// Blit a sprite centered on `center`, rotated by `rotation` radians.
    fn draw_sprite(
        &mut self,
        texture: TextureId,
        center: Vec2,
        size: Vec2,
        rotation: f32,
        tint: [f32; 4],
    );

    /// Clip subsequent draws to a convex polygon. Masks nest.
    fn push_mask(&mut self, points: &[Vec2]);

    /// Remove the innermost mask. Unbalanced pops are a caller bug; the
    /// backend may ignore them.
    fn pop_mask(&mut self);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ViewTransform {
        center: Vec2,
        zoom: f32,
        viewport: Vec2,
    },
    Polygon {
        points: Vec<Vec2>,
        color: [f32; 4],
    },
    Polyline {
        points: Vec<Vec2>,
        width: f32,
        color: [f32; 4],
    },
    Sprite {
        texture: TextureId,
        center: Vec2,
        size: Vec2,
        rotation: f32,
        tint: [f32; 4],
    },
    PushMask {
        points: Vec<Vec2>,
    },
    PopMask,
}

/// Recording renderer: captures every call as a [`DrawCommand`].
///
/// Backends replay the list; tests assert on it.
#[derive(Debug, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of recorded polygon fills.
    pub fn polygon_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polygon { .. }))
            .count()
    }

    /// Number of recorded polyline strokes.
    pub fn polyline_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polyline { .. }))
            .count()
    }

    /// Number of recorded sprite blits.
    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { .. }))
            .count()
    }
}

impl Renderer for DrawList {
    fn set_view_transform(&mut self, center: Vec2, zoom: f32, viewport: Vec2) {
        self.commands.push(DrawCommand::ViewTransform {
            center,
            zoom,
            viewport,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: [f32; 4]) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: [f32; 4]) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            width,
            color,
        });
    }

    fn draw_sprite(
        &mut self,
        texture: TextureId,
        center: Vec2,
        size: Vec2,
        rotation: f32,
        tint: [f32; 4],
    ) {
        self.commands.push(DrawCommand::Sprite {
            texture,
            center,
            size,
            rotation,
            tint,
        });
    }

    fn push_mask(&mut self, points: &[Vec2]) {
        self.commands.push(DrawCommand::PushMask {
            points: points.to_vec(),
        });
    }

    fn pop_mask(&mut self) {
        self.commands.push(DrawCommand::PopMask);
    }
}
