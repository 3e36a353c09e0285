//! Per-output lock surfaces, their shared memory buffers, and the optional idle inhibitor.

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use smithay_client_toolkit::{
    session_lock::SessionLockSurface,
    shm::{Shm, slot::SlotPool},
};
use wayland_client::{
    QueueHandle,
    protocol::{wl_output::WlOutput, wl_surface::WlSurface},
};
use wayland_protocols::wp::idle_inhibit::zv1::client::{
    zwp_idle_inhibit_manager_v1::ZwpIdleInhibitManagerV1,
    zwp_idle_inhibitor_v1::ZwpIdleInhibitorV1,
};

use super::state::WaylandState;

/// Buffers in the pool: one on screen, one being painted.
const BUFFER_COUNT: usize = 2;

/// Bytes per ARGB8888 pixel.
const BYTES_PER_PIXEL: usize = 4;

/// Size in bytes of one `width` x `height` ARGB8888 buffer, or `None` if it
/// does not fit in memory.
pub(super) fn buffer_size(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
}

/// The lock surface shown on one output, with its buffer pool and sizing state.
pub struct SurfaceState {
    lock_surface: SessionLockSurface,
    output: WlOutput,
    pool: Option<SlotPool>,
    width: u32,
    height: u32,
    configured: bool,
    frame_callback_pending: bool,
    full_damage: bool,
    needs_redraw: bool,
}

impl SurfaceState {
    /// Wraps a freshly created, unconfigured lock surface for `output`.
    pub fn new(lock_surface: SessionLockSurface, output: WlOutput) -> Self {
        Self {
            lock_surface,
            output,
            pool: None,
            width: 0,
            height: 0,
            configured: false,
            frame_callback_pending: false,
            full_damage: true,
            needs_redraw: true,
        }
    }

    pub fn wl_surface(&self) -> &WlSurface {
        self.lock_surface.wl_surface()
    }

    pub fn output(&self) -> &WlOutput {
        &self.output
    }

    /// Updates the surface dimensions, returning `true` if the size changed.
    ///
    /// When the size changes the buffer pool is dropped and the next frame
    /// repaints and presents the whole surface.
    pub fn update_dimensions(&mut self, width: u32, height: u32) -> bool {
        let changed = self.width != width || self.height != height;
        self.width = width;
        self.height = height;
        if changed {
            self.pool = None;
            self.full_damage = true;
        }
        changed
    }

    /// Current surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_configured(&mut self, configured: bool) {
        self.configured = configured;
    }

    pub fn set_frame_callback_pending(&mut self, pending: bool) {
        self.frame_callback_pending = pending;
    }

    pub fn frame_callback_pending(&self) -> bool {
        self.frame_callback_pending
    }

    pub fn mark_needs_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn clear_needs_redraw(&mut self) {
        self.needs_redraw = false;
    }

    /// Whether a frame may be painted now.
    pub fn can_render(&self) -> bool {
        self.configured && self.needs_redraw && !self.frame_callback_pending
    }

    /// Returns whether the next frame must present the whole surface, and resets the flag.
    pub fn take_full_damage(&mut self) -> bool {
        std::mem::take(&mut self.full_damage)
    }

    /// Ensures a shared memory pool of the appropriate size exists.
    pub fn ensure_pool(&mut self, shm: &Shm) -> Result<&mut SlotPool> {
        if self.pool.is_none() {
            let pool_size = buffer_size(self.width, self.height)
                .and_then(|size| size.checked_mul(BUFFER_COUNT))
                .ok_or_else(|| {
                    anyhow!(
                        "Surface {}x{} is too large for a buffer pool",
                        self.width,
                        self.height
                    )
                })?;
            info!(
                "Creating new SlotPool ({}x{}, {} bytes, {} buffers)",
                self.width, self.height, pool_size, BUFFER_COUNT
            );
            let pool = SlotPool::new(pool_size, shm).context("Failed to create slot pool")?;
            self.pool = Some(pool);
        }

        self.pool
            .as_mut()
            .context("Buffer pool not initialized despite previous check")
    }
}

/// Keeps the screen from idling while the session is locked.
///
/// The inhibitor is attached to the first lock surface and both protocol
/// objects are destroyed on drop.
pub struct IdleInhibit {
    manager: ZwpIdleInhibitManagerV1,
    inhibitor: Option<(ZwpIdleInhibitorV1, WlSurface)>,
}

impl IdleInhibit {
    pub fn new(manager: ZwpIdleInhibitManagerV1) -> Self {
        Self {
            manager,
            inhibitor: None,
        }
    }

    /// Attaches the inhibitor to `surface` unless one is already active.
    pub fn attach(&mut self, surface: &WlSurface, qh: &QueueHandle<WaylandState>) {
        if self.inhibitor.is_none() {
            let inhibitor = self.manager.create_inhibitor(surface, qh, ());
            self.inhibitor = Some((inhibitor, surface.clone()));
            info!("Idle inhibitor active while locked");
        }
    }

    /// Releases the inhibitor if it is attached to `surface`.
    ///
    /// Returns `true` when it was, so the caller can attach it elsewhere.
    pub fn detach_from(&mut self, surface: &WlSurface) -> bool {
        match self.inhibitor.take() {
            Some((inhibitor, attached)) if &attached == surface => {
                debug!("Lock surface removed; releasing idle inhibitor");
                inhibitor.destroy();
                true
            }
            other => {
                self.inhibitor = other;
                false
            }
        }
    }
}

impl Drop for IdleInhibit {
    fn drop(&mut self) {
        debug!("Releasing idle inhibitor");
        if let Some((inhibitor, _)) = self.inhibitor.take() {
            inhibitor.destroy();
        }
        self.manager.destroy();
    }
}
