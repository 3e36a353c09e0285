//! Rendering primitives for the lock screen (Cairo + Pango).
//!
//! - [`Color`]: RGBA color representation
//! - [`FontDescriptor`]: the single font the lock screen loads
//! - [`DisplaySurface`]: render / clear / present contract
//! - [`CairoCanvas`]: the Cairo-backed implementation used on screen

pub mod canvas;
pub mod color;
pub mod font;
pub mod surface;

pub use canvas::CairoCanvas;
pub use color::{BLACK, Color, WHITE};
pub use font::FontDescriptor;
pub use surface::{Anchor, DisplaySurface};
