//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and recording the quad pass (`RenderBackend` impl)

mod backend;
mod frame;
mod gpu;
mod init;
mod resources;
mod surface;

pub use backend::{GpuPass, WgpuResources};
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use resources::{GpuPipeline, GpuTexture};
