//! Wayland backend: an ext-session-lock client with one lock surface per output.

mod backend;
mod handlers;
mod state;
mod surface;

pub use backend::WaylandBackend;
