//! Small geometry and diagnostics helpers shared by the renderer and backend.

/// Formats a diagnostic message tagged with the source location it was raised from.
///
/// Fatal startup errors carry this location so a broken environment can be
/// traced back to the exact initialization step that failed.
#[macro_export]
macro_rules! here {
    ($($arg:tt)*) => {
        format!("{} ({}:{})", format_args!($($arg)*), file!(), line!())
    };
}

/// Axis-aligned rectangle in surface pixels.
///
/// A rectangle with zero width or height is "empty": it touches no pixels and
/// is skipped when damage is reported to the compositor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle, or `None` when either dimension is not positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Rectangle covering a whole `width` x `height` surface.
    pub fn full(width: i32, height: i32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Returns true if the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Intersects this rectangle with the surface bounds.
    pub fn clip_to(&self, width: i32, height: i32) -> Option<Self> {
        let min_x = self.x.max(0);
        let min_y = self.y.max(0);
        let max_x = (self.x + self.width).min(width);
        let max_y = (self.y + self.height).min(height);
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}
