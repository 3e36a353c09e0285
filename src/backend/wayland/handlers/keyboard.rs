// Bridges Wayland key events into the lock state machine.
use log::debug;
use smithay_client_toolkit::seat::keyboard::{
    KeyEvent, KeyboardHandler, Keysym, Modifiers, RawModifiers,
};
use wayland_client::{
    Connection, QueueHandle,
    protocol::{wl_keyboard, wl_surface},
};

use crate::input::Key;

use super::super::state::WaylandState;

impl KeyboardHandler for WaylandState {
    fn enter(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _surface: &wl_surface::WlSurface,
        _serial: u32,
        _raw: &[u32],
        _keysyms: &[Keysym],
    ) {
        debug!("Keyboard focus entered");
    }

    fn leave(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _surface: &wl_surface::WlSurface,
        _serial: u32,
    ) {
        debug!("Keyboard focus left");
    }

    fn press_key(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _serial: u32,
        event: KeyEvent,
    ) {
        if let Some(key) = lock_key(event.keysym, event.utf8.as_deref(), KeyOrigin::Press) {
            self.handle_key(key);
        }
    }

    fn release_key(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _serial: u32,
        _event: KeyEvent,
    ) {
    }

    fn update_modifiers(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _serial: u32,
        _modifiers: Modifiers,
        _layout: RawModifiers,
        _group: u32,
    ) {
    }

    fn repeat_key(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _serial: u32,
        event: KeyEvent,
    ) {
        if let Some(key) = lock_key(event.keysym, event.utf8.as_deref(), KeyOrigin::Repeat) {
            self.handle_key(key);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOrigin {
    Press,
    Repeat,
}

/// Key delivered to the lock state machine, if any.
///
/// Only physical presses count; compositor-side repeats of a held key are
/// dropped so holding a key never adds characters.
fn lock_key(keysym: Keysym, utf8: Option<&str>, origin: KeyOrigin) -> Option<Key> {
    match origin {
        KeyOrigin::Press => Some(classify_key(keysym, utf8)),
        KeyOrigin::Repeat => None,
    }
}

/// Maps a keysym and the text it produced to a lock [`Key`].
fn classify_key(keysym: Keysym, utf8: Option<&str>) -> Key {
    match keysym {
        Keysym::Return | Keysym::KP_Enter => Key::Return,
        Keysym::BackSpace => Key::Backspace,
        Keysym::Escape => Key::Escape,
        _ => utf8.map(Key::from_text).unwrap_or(Key::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_keys_map_by_keysym() {
        assert_eq!(classify_key(Keysym::Return, Some("\r")), Key::Return);
        assert_eq!(classify_key(Keysym::KP_Enter, Some("\r")), Key::Return);
        assert_eq!(classify_key(Keysym::BackSpace, Some("\u{8}")), Key::Backspace);
        assert_eq!(classify_key(Keysym::Escape, Some("\u{1b}")), Key::Escape);
    }

    #[test]
    fn printable_keys_use_produced_text() {
        assert_eq!(classify_key(Keysym::a, Some("a")), Key::Char('a'));
        assert_eq!(classify_key(Keysym::A, Some("A")), Key::Char('A'));
        assert_eq!(classify_key(Keysym::space, Some(" ")), Key::Char(' '));
    }

    #[test]
    fn repeated_keys_never_reach_the_lock() {
        assert_eq!(lock_key(Keysym::a, Some("a"), KeyOrigin::Repeat), None);
        assert_eq!(lock_key(Keysym::BackSpace, None, KeyOrigin::Repeat), None);
        assert_eq!(lock_key(Keysym::Return, Some("\r"), KeyOrigin::Repeat), None);
        assert_eq!(
            lock_key(Keysym::a, Some("a"), KeyOrigin::Press),
            Some(Key::Char('a'))
        );
    }

    #[test]
    fn keys_without_text_are_unknown() {
        assert_eq!(classify_key(Keysym::Shift_L, None), Key::Unknown);
        assert_eq!(classify_key(Keysym::Tab, Some("\t")), Key::Unknown);
        assert_eq!(classify_key(Keysym::F1, None), Key::Unknown);
    }
}
