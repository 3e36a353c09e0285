// Holds the live Wayland protocol state shared by the backend loop and the handler
// submodules; owns the lock state machine and paints it onto every lock surface.
use std::mem::ManuallyDrop;

use anyhow::{Context, Result};
use log::{debug, info};
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    session_lock::{SessionLock, SessionLockState},
    shm::Shm,
};
use wayland_client::{
    QueueHandle,
    protocol::{wl_output::WlOutput, wl_shm, wl_surface::WlSurface},
};

use crate::{
    auth::Authenticator,
    draw::{CairoCanvas, Color},
    input::{Key, KeyOutcome, LockState, state::render_lock_screen},
    session::Session,
    util::Rect,
};

use super::surface::{IdleInhibit, SurfaceState};

/// Internal Wayland state shared across modules.
pub(super) struct WaylandState {
    // Wayland protocol objects
    pub(super) registry_state: RegistryState,
    pub(super) compositor_state: CompositorState,
    pub(super) shm: Shm,
    pub(super) output_state: OutputState,
    pub(super) seat_state: SeatState,
    pub(super) session_lock_state: SessionLockState,

    // Never dropped implicitly: dropping a locked SessionLock unlocks the
    // session, which only a verified password may do.
    pub(super) session_lock: Option<ManuallyDrop<SessionLock>>,
    pub(super) locked: bool,
    pub(super) lock_finished: bool,

    // One lock surface per output
    pub(super) surfaces: Vec<SurfaceState>,
    pub(super) idle_inhibit: Option<IdleInhibit>,

    // Appearance
    pub(super) font: pango::FontDescription,
    pub(super) foreground: Color,
    pub(super) background: Color,

    // Lock session
    pub(super) session: Session,
    pub(super) authenticator: Box<dyn Authenticator>,
    pub(super) lock: LockState,
}

impl WaylandState {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        registry_state: RegistryState,
        compositor_state: CompositorState,
        shm: Shm,
        output_state: OutputState,
        seat_state: SeatState,
        session_lock_state: SessionLockState,
        idle_inhibit: Option<IdleInhibit>,
        font: pango::FontDescription,
        foreground: Color,
        background: Color,
        session: Session,
        authenticator: Box<dyn Authenticator>,
        lock: LockState,
    ) -> Self {
        Self {
            registry_state,
            compositor_state,
            shm,
            output_state,
            seat_state,
            session_lock_state,
            session_lock: None,
            locked: false,
            lock_finished: false,
            surfaces: Vec::new(),
            idle_inhibit,
            font,
            foreground,
            background,
            session,
            authenticator,
            lock,
        }
    }

    /// Feeds one classified key press to the lock state machine.
    pub(super) fn handle_key(&mut self, key: Key) {
        let outcome = self
            .lock
            .on_key_press(key, &self.session, self.authenticator.as_ref());
        if outcome == KeyOutcome::Unlocked {
            debug!("Unlock accepted; event loop will stop");
        }
    }

    /// Creates a lock surface for every output currently known.
    pub(super) fn cover_all_outputs(&mut self, qh: &QueueHandle<Self>) {
        let outputs: Vec<WlOutput> = self.output_state.outputs().collect();
        info!("Covering {} output(s)", outputs.len());
        for output in outputs {
            self.add_lock_surface(output, qh);
        }
    }

    /// Creates the lock surface for `output` unless it already has one.
    pub(super) fn add_lock_surface(&mut self, output: WlOutput, qh: &QueueHandle<Self>) {
        let Some(session_lock) = self.session_lock.as_ref() else {
            return;
        };
        if self.surfaces.iter().any(|surface| surface.output() == &output) {
            return;
        }

        let wl_surface = self.compositor_state.create_surface(qh);
        let lock_surface = session_lock.create_lock_surface(wl_surface, &output, qh);
        if let Some(idle) = self.idle_inhibit.as_mut() {
            idle.attach(lock_surface.wl_surface(), qh);
        }
        debug!("Lock surface created for output {:?}", output);
        self.surfaces.push(SurfaceState::new(lock_surface, output));
    }

    /// Drops the lock surface of an unplugged output.
    pub(super) fn remove_lock_surface(&mut self, output: &WlOutput, qh: &QueueHandle<Self>) {
        let Some(index) = self
            .surfaces
            .iter()
            .position(|surface| surface.output() == output)
        else {
            return;
        };
        let removed = self.surfaces.remove(index);
        debug!("Lock surface removed for output {:?}", output);

        if let Some(idle) = self.idle_inhibit.as_mut() {
            if idle.detach_from(removed.wl_surface()) {
                if let Some(first) = self.surfaces.first() {
                    idle.attach(first.wl_surface(), qh);
                }
            }
        }
    }

    pub(super) fn surface_mut(&mut self, wl_surface: &WlSurface) -> Option<&mut SurfaceState> {
        self.surfaces
            .iter_mut()
            .find(|surface| surface.wl_surface() == wl_surface)
    }

    /// Moves a pending repaint from the state machine onto every lock surface.
    pub(super) fn propagate_redraw(&mut self) {
        if self.lock.needs_redraw {
            self.lock.needs_redraw = false;
            for surface in &mut self.surfaces {
                surface.mark_needs_redraw();
            }
        }
    }

    /// Hands the session back to the compositor after a verified password.
    pub(super) fn unlock_session(&mut self) {
        if let Some(session_lock) = self.session_lock.take() {
            let session_lock = ManuallyDrop::into_inner(session_lock);
            session_lock.unlock();
            info!("Session unlocked");
        }
        self.surfaces.clear();
        self.idle_inhibit = None;
    }

    pub(super) fn render(&mut self, index: usize, qh: &QueueHandle<Self>) -> Result<()> {
        debug!("=== RENDER START (surface {}) ===", index);
        let surface = self
            .surfaces
            .get_mut(index)
            .context("Lock surface index out of range")?;
        let width = surface.width();
        let height = surface.height();
        let full = surface.take_full_damage();
        let (buffer_width, buffer_height) = (
            i32::try_from(width).context("Surface width out of range")?,
            i32::try_from(height).context("Surface height out of range")?,
        );
        let stride = buffer_width
            .checked_mul(4)
            .context("Surface stride out of range")?;

        let (buffer, canvas) = {
            let pool = surface.ensure_pool(&self.shm)?;
            pool.create_buffer(
                buffer_width,
                buffer_height,
                stride,
                wl_shm::Format::Argb8888,
            )
            .context("Failed to create buffer")?
        };

        // SAFETY: `canvas` is a mutable slice from the SlotPool holding exactly
        // width * height * 4 bytes in ARGB32 layout with a stride of width * 4.
        // The Cairo surface and context are dropped before the buffer is attached,
        // so Cairo never touches the memory once the compositor owns it.
        let cairo_surface = unsafe {
            cairo::ImageSurface::create_for_data_unsafe(
                canvas.as_mut_ptr(),
                cairo::Format::ARgb32,
                buffer_width,
                buffer_height,
                stride,
            )
            .context("Failed to create Cairo surface")?
        };
        let ctx = cairo::Context::new(&cairo_surface).context("Failed to create Cairo context")?;

        let damage = {
            let mut painter = CairoCanvas::new(
                &ctx,
                &self.font,
                self.foreground,
                self.background,
                buffer_width,
                buffer_height,
            );
            render_lock_screen(&mut painter, self.session.banner(), &self.lock, full);
            painter.take_presented()
        };

        cairo_surface.flush();
        drop(ctx);
        drop(cairo_surface);

        let wl_surface = surface.wl_surface();
        wl_surface.attach(Some(buffer.wl_buffer()), 0, 0);

        for rect in resolve_damage_regions(buffer_width, buffer_height, damage) {
            debug!(
                "Damaging buffer region x={} y={} w={} h={}",
                rect.x, rect.y, rect.width, rect.height
            );
            wl_surface.damage_buffer(rect.x, rect.y, rect.width, rect.height);
        }

        wl_surface.frame(qh, wl_surface.clone());
        wl_surface.commit();

        surface.clear_needs_redraw();
        surface.set_frame_callback_pending(true);
        debug!("=== RENDER COMPLETE ===");

        Ok(())
    }
}

/// Falls back to full-surface damage when painting presented nothing valid.
fn resolve_damage_regions(width: i32, height: i32, mut regions: Vec<Rect>) -> Vec<Rect> {
    regions.retain(Rect::is_valid);

    if regions.is_empty() {
        if let Some(full) = Rect::new(0, 0, width, height) {
            regions.push(full);
        }
    }

    regions
}
