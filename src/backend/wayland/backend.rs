// Coordinates lock startup/shutdown and drives the event loop while delegating
// rendering & protocol state to `WaylandState` and its handler modules.
use std::io;
use std::mem::ManuallyDrop;

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use smithay_client_toolkit::{
    compositor::CompositorState, output::OutputState, registry::RegistryState, seat::SeatState,
    session_lock::SessionLockState, shm::Shm,
};
use wayland_client::{
    Connection, EventQueue, backend::WaylandError, globals::registry_queue_init,
};
use wayland_protocols::wp::idle_inhibit::zv1::client::zwp_idle_inhibit_manager_v1::ZwpIdleInhibitManagerV1;

use super::state::WaylandState;
use super::surface::IdleInhibit;
use crate::{auth::Authenticator, config::Config, here, input::LockState, session::Session};

/// Consecutive render failures tolerated before giving up.
const MAX_RENDER_FAILURES: u32 = 10;

/// Flushes queued requests exactly once, however `run` exits.
///
/// Created right after connecting. Locals drop in reverse order, so by the
/// time this runs the lock surfaces have already queued their destroy
/// requests; flushing sends them. The session lock itself is only released
/// by [`WaylandState::unlock_session`], so an error exit leaves the
/// compositor holding the session locked.
struct LockGuard {
    conn: Connection,
}

impl LockGuard {
    fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(err) = self.conn.flush() {
            warn!("Failed to flush teardown requests: {}", err);
        }
        debug!("Wayland connection flushed");
    }
}

/// What the event loop does after a dispatch round.
#[derive(Debug, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Unlock,
    Fail(&'static str),
}

fn loop_control(unlocked: bool, locked: bool, finished: bool) -> LoopControl {
    if unlocked {
        LoopControl::Unlock
    } else if finished && locked {
        LoopControl::Fail("Compositor ended the session lock before unlock")
    } else if finished {
        LoopControl::Fail("Compositor refused to lock the session")
    } else {
        LoopControl::Continue
    }
}

/// Wayland lock backend.
pub struct WaylandBackend {
    config: Config,
    session: Session,
    authenticator: Box<dyn Authenticator>,
}

impl WaylandBackend {
    pub fn new(config: Config, session: Session, authenticator: Box<dyn Authenticator>) -> Self {
        Self {
            config,
            session,
            authenticator,
        }
    }

    /// Locks the session on every output and runs until the correct password is entered.
    pub fn run(self) -> Result<()> {
        info!("Starting Wayland backend");

        let conn = Connection::connect_to_env()
            .with_context(|| here!("Failed to connect to Wayland compositor"))?;
        let _guard = LockGuard::new(conn.clone());
        debug!("Connected to Wayland display");

        let (globals, mut event_queue) = registry_queue_init(&conn)
            .with_context(|| here!("Failed to initialize Wayland registry"))?;
        let qh = event_queue.handle();

        let compositor_state = CompositorState::bind(&globals, &qh)
            .with_context(|| here!("wl_compositor not available"))?;
        debug!("Bound compositor");

        let shm = Shm::bind(&globals, &qh).with_context(|| here!("wl_shm not available"))?;
        debug!("Bound shared memory");

        let output_state = OutputState::new(&globals, &qh);
        let seat_state = SeatState::new(&globals, &qh);
        let registry_state = RegistryState::new(&globals);
        let session_lock_state = SessionLockState::new(&globals, &qh);

        let idle_inhibit = if self.config.display.inhibit_idle {
            let bound: Result<ZwpIdleInhibitManagerV1, _> = globals.bind(&qh, 1..=1, ());
            match bound {
                Ok(manager) => Some(IdleInhibit::new(manager)),
                Err(err) => {
                    warn!("Idle inhibit requested but unavailable: {}", err);
                    None
                }
            }
        } else {
            None
        };

        let font = self.config.font();
        info!("Loading font '{}'", font.to_pango_string());

        let lock = LockState::new(
            self.config.password.max_length,
            self.config.password.mask_char,
        );

        let mut state = WaylandState::new(
            registry_state,
            compositor_state,
            shm,
            output_state,
            seat_state,
            session_lock_state,
            idle_inhibit,
            font.to_pango(),
            self.config.foreground(),
            self.config.background(),
            self.session,
            self.authenticator,
            lock,
        );

        let session_lock = state
            .session_lock_state
            .lock(&qh)
            .with_context(|| here!("ext_session_lock_v1 not available"))?;
        state.session_lock = Some(ManuallyDrop::new(session_lock));
        info!("Session lock requested");

        state.cover_all_outputs(&qh);
        if state.surfaces.is_empty() {
            warn!("No outputs announced yet; lock surfaces follow as outputs appear");
        }

        let mut consecutive_render_failures = 0u32;

        loop {
            match loop_control(
                state.lock.is_unlocked(),
                state.locked,
                state.lock_finished,
            ) {
                LoopControl::Unlock => {
                    info!("Unlocked, breaking event loop");
                    break;
                }
                LoopControl::Fail(reason) => return Err(anyhow!(here!("{}", reason))),
                LoopControl::Continue => {}
            }

            event_queue
                .blocking_dispatch(&mut state)
                .map_err(|e| anyhow!("Wayland event queue error: {}", e))?;

            if state.lock.is_unlocked() {
                continue;
            }

            if state.lock.is_draining() {
                discard_queued_input(&mut event_queue, &mut state)?;
            }

            state.propagate_redraw();

            for index in 0..state.surfaces.len() {
                let surface = &state.surfaces[index];
                if !surface.can_render() {
                    if surface.needs_redraw() && surface.frame_callback_pending() {
                        debug!("Main loop: Skipping render - frame callback already pending");
                    }
                    continue;
                }

                match state.render(index, &qh) {
                    Ok(()) => consecutive_render_failures = 0,
                    Err(e) => {
                        consecutive_render_failures += 1;
                        warn!(
                            "Rendering error (attempt {}/{}): {}",
                            consecutive_render_failures, MAX_RENDER_FAILURES, e
                        );

                        if consecutive_render_failures >= MAX_RENDER_FAILURES {
                            return Err(anyhow!(
                                "Too many consecutive render failures ({}), exiting: {}",
                                consecutive_render_failures,
                                e
                            ));
                        }
                    }
                }
            }
        }

        state.unlock_session();
        conn.roundtrip()
            .with_context(|| here!("Failed to confirm unlock with the compositor"))?;

        info!("Wayland backend exiting");
        Ok(())
    }
}

/// Throws away key presses that piled up while a verification was running.
///
/// The lock stays in its draining phase while everything already buffered or
/// waiting on the socket is dispatched, so those key presses are dropped;
/// other events (configure, frame callbacks) are still handled normally.
fn discard_queued_input(
    event_queue: &mut EventQueue<WaylandState>,
    state: &mut WaylandState,
) -> Result<()> {
    event_queue
        .flush()
        .context("Failed to flush Wayland connection")?;
    event_queue
        .dispatch_pending(state)
        .map_err(|e| anyhow!("Wayland event queue error: {}", e))?;

    if let Some(guard) = event_queue.prepare_read() {
        match guard.read() {
            Ok(count) => debug!("Read {} events queued during verification", count),
            Err(WaylandError::Io(err)) if err.kind() == io::ErrorKind::WouldBlock => {}
            Err(err) => return Err(anyhow!("Failed to read Wayland events: {}", err)),
        }
    }

    event_queue
        .dispatch_pending(state)
        .map_err(|e| anyhow!("Wayland event queue error: {}", e))?;

    state.lock.finish_drain();
    Ok(())
}
