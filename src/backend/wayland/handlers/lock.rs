// Follows the ext-session-lock lifecycle: confirmation, refusal, and per-output configures.
use log::{debug, error, info};
use smithay_client_toolkit::session_lock::{
    SessionLock, SessionLockHandler, SessionLockSurface, SessionLockSurfaceConfigure,
};
use wayland_client::{Connection, QueueHandle};

use super::super::state::WaylandState;

impl SessionLockHandler for WaylandState {
    fn locked(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _session_lock: SessionLock) {
        info!("Compositor confirmed the session is locked");
        self.locked = true;
    }

    fn finished(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _session_lock: SessionLock,
    ) {
        if self.locked {
            error!("Compositor ended the session lock before unlock");
        } else {
            error!("Compositor refused to lock the session (is another locker running?)");
        }
        self.lock_finished = true;
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        session_lock_surface: SessionLockSurface,
        configure: SessionLockSurfaceConfigure,
        _serial: u32,
    ) {
        let (width, height) = configure.new_size;
        info!("Lock surface configured: {}x{}", width, height);

        let Some(surface) = self.surface_mut(session_lock_surface.wl_surface()) else {
            debug!("Configure for an unknown lock surface ignored");
            return;
        };

        if width > 0 && height > 0 && surface.update_dimensions(width, height) {
            info!("Surface size changed - recreating SlotPool");
        }

        surface.set_configured(true);
        surface.mark_needs_redraw();
    }
}
