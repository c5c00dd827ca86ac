//! Per-frame draw instructions and the painting seam.
//!
//! A simulation never draws. It describes its current state as a [`Frame`]:
//! one [`Backdrop`] instruction applied to the whole surface, followed by one
//! [`Primitive`] per particle. Whatever owns the surface implements
//! [`Painter`] and turns the frame into pixels.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;

/// Shape of a single draw primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Filled circle centred on (x, y); `size` is the radius.
    Disc,
    /// Axis-aligned square with its top-left corner at (x, y); `size` is the edge.
    Point,
}

/// What happens to the whole surface before the primitives are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Backdrop {
    /// Erase to fully transparent.
    Clear,
    /// Composite a translucent fill over the previous frame, leaving trails.
    Fade { color: Srgb, alpha: f64 },
}

/// Draw state of one particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: Srgb,
    pub opacity: f64,
    pub shape: Shape,
}

/// Complete draw instruction set for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub backdrop: Backdrop,
    pub primitives: Vec<Primitive>,
}

impl Frame {
    /// Creates a frame with no primitives.
    pub fn empty(backdrop: Backdrop) -> Self {
        Self {
            backdrop,
            primitives: Vec::new(),
        }
    }

    /// Number of primitives in the frame.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// True if the frame draws nothing beyond its backdrop.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// A surface that can render frames.
pub trait Painter {
    fn paint(&mut self, frame: &Frame);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingPainter {
        frames: usize,
        primitives: usize,
    }

    impl Painter for CountingPainter {
        fn paint(&mut self, frame: &Frame) {
            self.frames += 1;
            self.primitives += frame.len();
        }
    }

    fn dot(x: f64) -> Primitive {
        Primitive {
            x,
            y: 0.0,
            size: 1.0,
            color: Srgb::WHITE,
            opacity: 1.0,
            shape: Shape::Point,
        }
    }

    #[test]
    fn empty_frame_has_no_primitives() {
        let frame = Frame::empty(Backdrop::Clear);
        assert!(frame.is_empty());
        assert_eq!(frame.len(), 0);
    }

    #[test]
    fn painter_is_object_safe() {
        let mut counter = CountingPainter::default();
        {
            let painter: &mut dyn Painter = &mut counter;
            painter.paint(&Frame {
                backdrop: Backdrop::Clear,
                primitives: vec![dot(0.0), dot(1.0)],
            });
        }
        assert_eq!(counter.frames, 1);
        assert_eq!(counter.primitives, 2);
    }

    #[test]
    fn backdrop_serializes_with_kind_tag() {
        let fade = Backdrop::Fade {
            color: Srgb::BLACK,
            alpha: 0.05,
        };
        let v = serde_json::to_value(fade).unwrap();
        assert_eq!(v["kind"], "fade");
        assert_eq!(v["color"], "#000000");
        assert_eq!(serde_json::to_value(Backdrop::Clear).unwrap()["kind"], "clear");
    }

    #[test]
    fn primitive_serializes_shape_in_snake_case() {
        let v = serde_json::to_value(dot(3.0)).unwrap();
        assert_eq!(v["shape"], "point");
        assert_eq!(v["x"], 3.0);
    }
}
