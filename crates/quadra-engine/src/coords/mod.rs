//! Size and color types shared by the renderer and the runtime.
//!
//! Canonical spaces:
//! - viewport sizes are physical pixels
//! - quad positions are pixels relative to the quad center, +Y up
//!
//! The vertex shader converts pixel positions to NDC using the viewport uniform.

mod color;
mod viewport;

pub use color::ClearColor;
pub use viewport::ViewportSize;
