//! Virtual scene geometry.
//!
//! Shapes are positioned on a scene with the slide's native pixel
//! dimensions; fitting a container means scaling that one scene, so
//! every shape keeps its relative position at any width.

use crate::model::{PresentationSize, ShapeGeometry};
use crate::units::emu_to_px;

/// An axis-aligned rectangle in scene pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SceneRect {
    /// Convert shape geometry from EMUs into scene pixels.
    pub fn from_geometry(geometry: ShapeGeometry) -> Self {
        Self {
            x: emu_to_px(geometry.x_emu),
            y: emu_to_px(geometry.y_emu),
            width: emu_to_px(geometry.width_emu),
            height: emu_to_px(geometry.height_emu),
        }
    }

    /// The rectangle after uniform scaling about the scene origin.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// The fixed drawing surface shared by every slide in a deck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideScene {
    /// Native scene width in CSS pixels.
    pub width: f64,
    /// Native scene height in CSS pixels.
    pub height: f64,
}

impl SlideScene {
    /// Scene for a deck's declared slide size.
    pub fn new(size: PresentationSize) -> Self {
        Self {
            width: size.width_px(),
            height: size.height_px(),
        }
    }

    /// Uniform scale factor that fits the scene to a container width.
    ///
    /// Degenerate container widths render unscaled instead of collapsing
    /// or mirroring the scene.
    pub fn scale_for_width(&self, container_width: f64) -> f64 {
        if container_width <= 0.0 || self.width <= 0.0 {
            return 1.0;
        }
        container_width / self.width
    }

    /// Vertical space one slide occupies in the container at the given
    /// scale.
    pub fn reserved_height(&self, scale: f64) -> f64 {
        self.height * scale
    }
}
