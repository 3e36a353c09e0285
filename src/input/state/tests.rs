use std::cell::RefCell;

use super::*;
use crate::auth::Authenticator;
use crate::draw::{Anchor, DisplaySurface};
use crate::input::{DEFAULT_MAX_LEN, Key};
use crate::session::{DEFAULT_BANNER_PREFIX, Session};
use crate::util::Rect;

/// Accepts a single password and records every verification request.
struct FakeAuthenticator {
    password: &'static str,
    calls: RefCell<Vec<(String, String)>>,
}

impl FakeAuthenticator {
    fn accepting(password: &'static str) -> Self {
        Self {
            password,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl Authenticator for FakeAuthenticator {
    fn verify(&self, identity: &str, candidate: &str) -> bool {
        self.calls
            .borrow_mut()
            .push((identity.to_string(), candidate.to_string()));
        candidate == self.password
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Clear(Rect),
    Render(String, Anchor),
    Present(Rect),
}

/// Display surface that records what it was asked to paint.
struct RecordingSurface {
    width: i32,
    height: i32,
    line_height: i32,
    ops: Vec<Op>,
}

impl RecordingSurface {
    fn new() -> Self {
        Self {
            width: 1920,
            height: 1080,
            line_height: 50,
            ops: Vec::new(),
        }
    }

    fn rendered_texts(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Render(text, _) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn presented(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Present(rect) => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl DisplaySurface for RecordingSurface {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn line_height(&self) -> i32 {
        self.line_height
    }

    fn render(&mut self, text: &str, anchor: Anchor) -> Rect {
        self.ops.push(Op::Render(text.to_string(), anchor));
        if text.is_empty() {
            return Rect::default();
        }
        let width = text.chars().count() as i32 * 20;
        let (x, y) = match anchor {
            Anchor::Center { y } => ((self.width - width) / 2, y),
            Anchor::At { x, y } => (x, y),
        };
        Rect {
            x,
            y,
            width,
            height: self.line_height,
        }
    }

    fn clear(&mut self, region: Rect) {
        self.ops.push(Op::Clear(region));
    }

    fn present(&mut self, region: Rect) {
        self.ops.push(Op::Present(region));
    }
}

fn alice() -> Session {
    Session::new("alice", DEFAULT_BANNER_PREFIX)
}

fn create_test_lock_state() -> LockState {
    LockState::new(DEFAULT_MAX_LEN, DEFAULT_MASK_CHAR)
}

fn type_text(
    lock: &mut LockState,
    session: &Session,
    auth: &FakeAuthenticator,
    text: &str,
) -> Vec<KeyOutcome> {
    text.chars()
        .map(|c| lock.on_key_press(Key::Char(c), session, auth))
        .collect()
}

#[test]
fn new_lock_is_idle_empty_and_needs_first_paint() {
    let lock = create_test_lock_state();
    assert_eq!(lock.phase(), LockPhase::Idle);
    assert!(lock.is_empty());
    assert!(lock.needs_redraw);
    assert_eq!(lock.mask_text(), "");
}

#[test]
fn typing_shows_one_mask_glyph_per_char() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("hunter2");
    let mut lock = create_test_lock_state();

    for (typed, c) in "s3cr!t".chars().enumerate() {
        let outcome = lock.on_key_press(Key::Char(c), &session, &auth);
        assert_eq!(outcome, KeyOutcome::Repaint);
        assert_eq!(lock.len(), typed + 1);
        assert_eq!(lock.mask_text(), "#".repeat(typed + 1));
    }
}

#[test]
fn rendered_password_line_never_contains_typed_chars() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("hunter2");
    let mut lock = create_test_lock_state();

    for c in "xyzzy".chars() {
        lock.on_key_press(Key::Char(c), &session, &auth);
        let mut surface = RecordingSurface::new();
        render_lock_screen(&mut surface, session.banner(), &lock, false);

        let texts = surface.rendered_texts();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0], session.banner());
        assert_eq!(texts[1], "#".repeat(lock.len()));
        assert!(texts.iter().all(|text| !text.contains(['x', 'y', 'z'])));
    }
}

#[test]
fn chars_beyond_capacity_are_ignored_without_repaint() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("hunter2");
    let mut lock = LockState::new(3, DEFAULT_MASK_CHAR);

    type_text(&mut lock, &session, &auth, "abc");
    lock.needs_redraw = false;

    let outcome = lock.on_key_press(Key::Char('d'), &session, &auth);
    assert_eq!(outcome, KeyOutcome::Ignored);
    assert!(!lock.needs_redraw);
    assert_eq!(lock.len(), 3);
}

#[test]
fn thirty_chars_stabilize_at_twenty_four() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("hunter2");
    let mut lock = create_test_lock_state();

    let outcomes = type_text(&mut lock, &session, &auth, &"q".repeat(30));

    assert_eq!(lock.len(), 24);
    assert_eq!(lock.mask_text(), "#".repeat(24));
    assert!(outcomes[..24].iter().all(|o| *o == KeyOutcome::Repaint));
    assert!(outcomes[24..].iter().all(|o| *o == KeyOutcome::Ignored));
}

#[test]
fn backspace_removes_last_char() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("ab");
    let mut lock = create_test_lock_state();

    type_text(&mut lock, &session, &auth, "abc");
    let outcome = lock.on_key_press(Key::Backspace, &session, &auth);

    assert_eq!(outcome, KeyOutcome::Repaint);
    assert_eq!(lock.mask_text(), "##");

    // The remaining buffer is exactly "ab".
    lock.on_key_press(Key::Return, &session, &auth);
    assert!(lock.is_unlocked());
}

#[test]
fn backspace_past_empty_stays_at_zero() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("hunter2");
    let mut lock = create_test_lock_state();

    type_text(&mut lock, &session, &auth, "ab");
    for _ in 0..3 {
        let outcome = lock.on_key_press(Key::Backspace, &session, &auth);
        assert_eq!(outcome, KeyOutcome::Repaint);
    }

    assert_eq!(lock.len(), 0);
    assert_eq!(lock.mask_text(), "");
    assert_eq!(lock.phase(), LockPhase::Idle);
}

#[test]
fn escape_clears_with_exactly_one_repaint() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("hunter2");

    let full = "z".repeat(24);
    for typed in ["", "a", "abcdef", full.as_str()] {
        let mut lock = create_test_lock_state();
        type_text(&mut lock, &session, &auth, typed);
        lock.needs_redraw = false;

        let outcome = lock.on_key_press(Key::Escape, &session, &auth);

        assert_eq!(outcome, KeyOutcome::Repaint);
        assert!(lock.needs_redraw);
        assert!(lock.is_empty());

        let mut surface = RecordingSurface::new();
        render_lock_screen(&mut surface, session.banner(), &lock, false);
        assert_eq!(surface.rendered_texts()[1], "");
        assert_eq!(surface.presented().len(), 1);
    }
    assert!(auth.calls().is_empty());
}

#[test]
fn correct_password_unlocks() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("hunter2");
    let mut lock = create_test_lock_state();

    type_text(&mut lock, &session, &auth, "hunter2");
    lock.needs_redraw = false;
    let outcome = lock.on_key_press(Key::Return, &session, &auth);

    assert_eq!(outcome, KeyOutcome::Unlocked);
    assert!(lock.is_unlocked());
    assert!(lock.is_empty());
    assert!(!lock.needs_redraw);
    assert_eq!(
        auth.calls(),
        vec![("alice".to_string(), "hunter2".to_string())]
    );
}

#[test]
fn wrong_password_clears_and_keeps_locked() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("hunter2");
    let mut lock = create_test_lock_state();

    type_text(&mut lock, &session, &auth, "wrong");
    let outcome = lock.on_key_press(Key::Return, &session, &auth);

    assert_eq!(outcome, KeyOutcome::Repaint);
    assert!(!lock.is_unlocked());
    assert!(lock.is_empty());
    assert!(lock.needs_redraw);
    assert_eq!(auth.calls(), vec![("alice".to_string(), "wrong".to_string())]);
}

#[test]
fn enter_on_empty_buffer_verifies_empty_candidate() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("hunter2");
    let mut lock = create_test_lock_state();

    lock.on_key_press(Key::Return, &session, &auth);

    assert_eq!(auth.calls(), vec![("alice".to_string(), String::new())]);
    assert!(!lock.is_unlocked());
}

#[test]
fn keys_queued_during_verification_are_discarded() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("hunter2");
    let mut lock = create_test_lock_state();

    type_text(&mut lock, &session, &auth, "AB");
    lock.on_key_press(Key::Return, &session, &auth);
    assert!(lock.is_draining());
    lock.needs_redraw = false;

    for key in [Key::Char('x'), Key::Return, Key::Char('y')] {
        assert_eq!(
            lock.on_key_press(key, &session, &auth),
            KeyOutcome::Ignored
        );
    }

    assert!(lock.is_empty());
    assert!(!lock.needs_redraw);
    assert_eq!(auth.calls().len(), 1);

    lock.finish_drain();
    assert_eq!(lock.phase(), LockPhase::Idle);
    assert_eq!(
        lock.on_key_press(Key::Char('c'), &session, &auth),
        KeyOutcome::Repaint
    );
    assert_eq!(lock.len(), 1);
}

#[test]
fn retry_after_failure_can_unlock() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("hunter2");
    let mut lock = create_test_lock_state();

    type_text(&mut lock, &session, &auth, "hunter3");
    lock.on_key_press(Key::Return, &session, &auth);
    lock.finish_drain();

    type_text(&mut lock, &session, &auth, "hunter2");
    assert_eq!(
        lock.on_key_press(Key::Return, &session, &auth),
        KeyOutcome::Unlocked
    );
    assert_eq!(auth.calls().len(), 2);
}

#[test]
fn finish_drain_does_not_leave_unlocked() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("");
    let mut lock = create_test_lock_state();

    lock.on_key_press(Key::Return, &session, &auth);
    lock.finish_drain();

    assert!(lock.is_unlocked());
    assert_eq!(
        lock.on_key_press(Key::Char('a'), &session, &auth),
        KeyOutcome::Ignored
    );
}

#[test]
fn unknown_keys_are_ignored() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("hunter2");
    let mut lock = create_test_lock_state();

    type_text(&mut lock, &session, &auth, "ab");
    lock.needs_redraw = false;

    assert_eq!(
        lock.on_key_press(Key::Unknown, &session, &auth),
        KeyOutcome::Ignored
    );
    assert_eq!(lock.len(), 2);
    assert!(!lock.needs_redraw);
}

#[test]
fn custom_mask_char_is_used() {
    let session = alice();
    let auth = FakeAuthenticator::accepting("hunter2");
    let mut lock = LockState::new(DEFAULT_MAX_LEN, '*');

    type_text(&mut lock, &session, &auth, "abc");
    assert_eq!(lock.mask_text(), "***");
}

#[test]
fn layout_places_banner_above_and_line_below_center() {
    assert_eq!(banner_top(1080, 50), 540 - 25 - 58);
    let line = mask_line(1920, 1080, 50);
    assert_eq!(line, Rect::new(0, 540 - 25 + 58, 1920, 50).unwrap());
}

#[test]
fn render_aligns_mask_with_banner_left_edge() {
    let session = alice();
    let lock = create_test_lock_state();
    let mut surface = RecordingSurface::new();

    render_lock_screen(&mut surface, session.banner(), &lock, true);

    let banner_width = session.banner().chars().count() as i32 * 20;
    let expected_x = (1920 - banner_width) / 2;
    let line = mask_line(1920, 1080, 50);
    assert!(surface.ops.contains(&Op::Render(
        String::new(),
        Anchor::At {
            x: expected_x,
            y: line.y
        }
    )));
    assert!(surface.ops.contains(&Op::Clear(line)));
}

#[test]
fn full_render_presents_whole_surface() {
    let lock = create_test_lock_state();
    let mut surface = RecordingSurface::new();

    render_lock_screen(&mut surface, "BANNER", &lock, true);
    assert_eq!(surface.presented(), vec![Rect::full(1920, 1080)]);

    let mut surface = RecordingSurface::new();
    render_lock_screen(&mut surface, "BANNER", &lock, false);
    assert_eq!(surface.presented(), vec![mask_line(1920, 1080, 50)]);
}
