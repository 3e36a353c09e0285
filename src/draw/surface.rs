//! The drawing contract the lock screen paints through.

use crate::util::Rect;

/// Where a rendered line of text is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Horizontally centered on the surface, top edge at `y`.
    Center { y: i32 },
    /// Top-left corner at `(x, y)`.
    At { x: i32, y: i32 },
}

/// A full-screen drawable area with one loaded font.
///
/// Implementations only paint what they are told; they never look at input.
pub trait DisplaySurface {
    /// Surface size in pixels as `(width, height)`.
    fn size(&self) -> (i32, i32);

    /// Height of one line of text in the loaded font.
    fn line_height(&self) -> i32;

    /// Rasterizes `text` in the foreground color at `anchor`.
    ///
    /// Returns the rectangle touched. Empty text draws nothing and returns an
    /// empty rectangle.
    fn render(&mut self, text: &str, anchor: Anchor) -> Rect;

    /// Fills `region` with the background color.
    fn clear(&mut self, region: Rect);

    /// Makes the most recent draws inside `region` visible.
    fn present(&mut self, region: Rect);
}
