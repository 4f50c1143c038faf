//! Quadra engine crate.
//!
//! Decodes an image, uploads it to the GPU and draws it as one textured quad
//! per frame inside a `winit` window.

pub mod core;
pub mod device;
pub mod window;

pub mod coords;
pub mod decode;
pub mod logging;
pub mod render;
