use anyhow::{Context, anyhow};
use clap::Parser;

use hushlock::{
    Config,
    auth::{Authenticator, PamAuthenticator},
    backend, here,
    session::Session,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("HUSHLOCK_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "hushlock")]
#[command(
    version,
    long_version = LONG_VERSION,
    about = "Full-screen session locker for Wayland compositors",
    long_about = "Locks the Wayland session (ext-session-lock-v1), covering every output \
                  until the current user's password is accepted by PAM.\n\n\
                  Settings are read from ~/.config/hushlock/config.toml when present."
)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let _cli = Cli::parse();

    // Check for Wayland environment
    if std::env::var_os("WAYLAND_DISPLAY").is_none() {
        log::error!("WAYLAND_DISPLAY not set - this application requires Wayland.");
        log::error!("Please run on a Wayland compositor (Hyprland, Sway, etc.).");
        return Err(anyhow!("WAYLAND_DISPLAY not set"));
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load config: {}. Using defaults.", e);
            Config::default()
        }
    };

    let session = Session::for_current_user(&config.banner.prefix)
        .with_context(|| here!("Failed to resolve the current user"))?;

    let authenticator = PamAuthenticator::new(config.auth.service.clone());
    authenticator
        .probe(session.identity())
        .with_context(|| here!("PAM is not usable, refusing to lock"))?;
    let authenticator: Box<dyn Authenticator> = Box::new(authenticator);

    log::info!("Locking screen...");
    backend::run_wayland(config, session, authenticator)?;
    log::info!("Screen unlocked");

    Ok(())
}
