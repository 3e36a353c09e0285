use anyhow::Result;

use crate::auth::Authenticator;
use crate::config::Config;
use crate::session::Session;

pub mod wayland;

/// Locks the screen and blocks until `session`'s password is entered.
///
/// Returns `Ok(())` only after a successful unlock; every other way out of
/// the event loop is an error.
pub fn run_wayland(
    config: Config,
    session: Session,
    authenticator: Box<dyn Authenticator>,
) -> Result<()> {
    let backend = wayland::WaylandBackend::new(config, session, authenticator);
    backend.run()
}
