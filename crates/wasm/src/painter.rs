//! [`Painter`] over a 2D canvas context.

use std::f64::consts::TAU;

use motes_core::{Backdrop, Frame, Painter, Shape};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }
}

impl Painter for CanvasPainter {
    fn paint(&mut self, frame: &Frame) {
        let w = f64::from(self.canvas.width());
        let h = f64::from(self.canvas.height());
        let ctx = &self.ctx;

        ctx.set_global_alpha(1.0);
        match frame.backdrop {
            Backdrop::Clear => ctx.clear_rect(0.0, 0.0, w, h),
            Backdrop::Fade { color, alpha } => {
                ctx.set_fill_style_str(&color.to_css_rgba(alpha));
                ctx.fill_rect(0.0, 0.0, w, h);
            }
        }

        for p in &frame.primitives {
            if p.opacity <= 0.0 || p.size <= 0.0 {
                continue;
            }
            ctx.set_global_alpha(p.opacity.min(1.0));
            ctx.set_fill_style_str(&p.color.to_hex());
            match p.shape {
                Shape::Disc => {
                    ctx.begin_path();
                    if ctx.arc(p.x, p.y, p.size, 0.0, TAU).is_ok() {
                        ctx.fill();
                    }
                }
                Shape::Point => ctx.fill_rect(p.x, p.y, p.size, p.size),
            }
        }
        ctx.set_global_alpha(1.0);
    }
}
