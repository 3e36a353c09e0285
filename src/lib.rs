//! Library exports for the hushlock session locker.
//!
//! The binary wires these together; keeping them in a library lets the
//! integration tests drive the renderer and configuration without a
//! compositor.

pub mod auth;
pub mod backend;
pub mod config;
pub mod draw;
pub mod input;
pub mod session;
pub mod util;

pub use config::Config;
