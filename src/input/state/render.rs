use crate::draw::{Anchor, DisplaySurface};
use crate::util::Rect;

use super::LockState;

/// Vertical gap between the banner, the screen's center line, and the password line.
const LINE_GAP: i32 = 8;

/// Top edge of the banner: one line (plus gap) above the vertically centered line.
pub fn banner_top(screen_height: i32, line_height: i32) -> i32 {
    screen_height / 2 - line_height / 2 - (line_height + LINE_GAP)
}

/// Full-width band holding the password line, one line (plus gap) below center.
pub fn mask_line(screen_width: i32, screen_height: i32, line_height: i32) -> Rect {
    Rect {
        x: 0,
        y: screen_height / 2 - line_height / 2 + line_height + LINE_GAP,
        width: screen_width.max(0),
        height: line_height.max(0),
    }
}

/// Paints the lock screen: blank background, banner, masked password line.
///
/// Only the password line is presented unless `full` is set (first frame or
/// after a resize), since the banner never changes after startup. The buffer's
/// characters are never handed to the surface, only [`LockState::mask_text`].
pub fn render_lock_screen<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    banner: &str,
    lock: &LockState,
    full: bool,
) {
    let (width, height) = surface.size();
    let line_height = surface.line_height();

    let whole = Rect::full(width, height);
    surface.clear(whole);

    let banner_rect = surface.render(
        banner,
        Anchor::Center {
            y: banner_top(height, line_height),
        },
    );

    let line = mask_line(width, height, line_height);
    surface.clear(line);
    surface.render(
        &lock.mask_text(),
        Anchor::At {
            x: banner_rect.x.max(0),
            y: line.y,
        },
    );

    surface.present(if full { whole } else { line });
}
