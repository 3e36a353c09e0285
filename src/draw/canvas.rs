//! Cairo/Pango implementation of [`DisplaySurface`].

use log::{debug, warn};

use super::color::Color;
use super::surface::{Anchor, DisplaySurface};
use crate::util::Rect;

/// Reference glyphs used to measure the font's line height.
const LINE_PROBE: &str = "Ag";

/// Paints onto a Cairo context and collects the regions to present.
///
/// The backend drains [`CairoCanvas::take_presented`] after painting and
/// turns each region into Wayland buffer damage.
pub struct CairoCanvas<'a> {
    ctx: &'a cairo::Context,
    font: &'a pango::FontDescription,
    foreground: Color,
    background: Color,
    width: i32,
    height: i32,
    presented: Vec<Rect>,
}

impl<'a> CairoCanvas<'a> {
    pub fn new(
        ctx: &'a cairo::Context,
        font: &'a pango::FontDescription,
        foreground: Color,
        background: Color,
        width: i32,
        height: i32,
    ) -> Self {
        Self {
            ctx,
            font,
            foreground,
            background,
            width,
            height,
            presented: Vec::new(),
        }
    }

    /// Drains the regions presented since the last call, clipped to the surface.
    pub fn take_presented(&mut self) -> Vec<Rect> {
        let (width, height) = (self.width, self.height);
        self.presented
            .drain(..)
            .filter_map(|rect| rect.clip_to(width, height))
            .collect()
    }

    fn layout(&self, text: &str) -> pango::Layout {
        let layout = pangocairo::functions::create_layout(self.ctx);
        layout.set_font_description(Some(self.font));
        layout.set_text(text);
        layout
    }
}

impl DisplaySurface for CairoCanvas<'_> {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn line_height(&self) -> i32 {
        self.layout(LINE_PROBE).pixel_size().1
    }

    fn render(&mut self, text: &str, anchor: Anchor) -> Rect {
        if text.is_empty() {
            return Rect::default();
        }

        let layout = self.layout(text);
        let (text_width, text_height) = layout.pixel_size();
        let (x, y) = match anchor {
            Anchor::Center { y } => ((self.width - text_width) / 2, y),
            Anchor::At { x, y } => (x, y),
        };

        self.ctx.save().ok();
        self.ctx.set_antialias(cairo::Antialias::Best);
        self.foreground.apply(self.ctx);
        self.ctx.move_to(f64::from(x), f64::from(y));
        pangocairo::functions::show_layout(self.ctx, &layout);
        self.ctx.restore().ok();

        Rect {
            x,
            y,
            width: text_width,
            height: text_height,
        }
    }

    fn clear(&mut self, region: Rect) {
        if !region.is_valid() {
            return;
        }
        self.ctx.save().ok();
        self.ctx.set_operator(cairo::Operator::Source);
        self.background.apply(self.ctx);
        self.ctx.rectangle(
            f64::from(region.x),
            f64::from(region.y),
            f64::from(region.width),
            f64::from(region.height),
        );
        if let Err(err) = self.ctx.fill() {
            warn!("Failed to clear region {:?}: {}", region, err);
        }
        self.ctx.restore().ok();
    }

    fn present(&mut self, region: Rect) {
        if region.is_valid() {
            debug!(
                "Presenting region x={} y={} w={} h={}",
                region.x, region.y, region.width, region.height
            );
            self.presented.push(region);
        }
    }
}
