//! GPU capability seam used by the quad renderer.
//!
//! The renderer never touches wgpu objects directly; it allocates and records
//! through [`RenderBackend`] and [`PassEncoder`]. `device::Gpu` is the
//! production implementation.

use std::ops::Range;

use thiserror::Error;

use crate::coords::{ClearColor, ViewportSize};

/// Resource allocation or presentation failure reported by a backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("texture {width}x{height} exceeds device limit {limit}")]
    TextureTooLarge { width: u32, height: u32, limit: u32 },

    #[error("buffer `{label}` of {size} bytes exceeds device limit {limit}")]
    BufferTooLarge { label: String, size: u64, limit: u64 },

    #[error("{0} is empty")]
    Empty(&'static str),

    #[error("`{what}` rejected by the device: {reason}")]
    Device { what: String, reason: String },

    #[error("pipeline `{label}`: {reason}")]
    Pipeline { label: String, reason: String },

    #[error("surface is unrecoverable: {0}")]
    SurfaceLost(String),
}

/// Parameters for a sampled 2D texture.
#[derive(Debug, Clone, Copy)]
pub struct TextureDesc<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
}

/// Texel rectangle of a texture upload.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TexelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Shader library compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct ShaderLibrary<'a> {
    pub label: &'a str,
    pub wgsl: &'a str,
}

/// Inputs to pipeline creation.
#[derive(Debug, Clone)]
pub struct PipelineDesc<'a> {
    pub label: &'a str,
    pub library: ShaderLibrary<'a>,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub vertex_layout: wgpu::VertexBufferLayout<'a>,
    pub topology: wgpu::PrimitiveTopology,
    pub color_format: wgpu::TextureFormat,
}

/// Handle types a backend allocates.
///
/// Kept apart from [`RenderBackend`] so that owners of the handles do not
/// carry the backend's borrow of its window.
pub trait BackendResources {
    type Texture;
    type Buffer;
    type Pipeline;
    type Queue;
}

pub type TextureOf<B> = <<B as RenderBackend>::Resources as BackendResources>::Texture;
pub type PipelineOf<B> = <<B as RenderBackend>::Resources as BackendResources>::Pipeline;

/// Resource factory, frame source and submission queue.
///
/// Handles returned by the factory methods are owned by the caller; dropping
/// them releases the GPU resource.
pub trait RenderBackend {
    type Resources: BackendResources;
    type Frame;
    type Pass<'f>: PassEncoder<Self::Resources>
    where
        Self: 'f;

    /// Pixel format of the drawables this backend hands out.
    fn output_format(&self) -> wgpu::TextureFormat;

    /// Current drawable size in physical pixels.
    fn drawable_size(&self) -> ViewportSize;

    fn create_texture(
        &self,
        desc: &TextureDesc<'_>,
    ) -> Result<<Self::Resources as BackendResources>::Texture, BackendError>;

    fn upload_texture_region(
        &self,
        texture: &<Self::Resources as BackendResources>::Texture,
        region: TexelRegion,
        bytes: &[u8],
        bytes_per_row: u32,
    ) -> Result<(), BackendError>;

    fn create_buffer(
        &self,
        label: &str,
        contents: &[u8],
    ) -> Result<<Self::Resources as BackendResources>::Buffer, BackendError>;

    fn create_pipeline(
        &self,
        desc: &PipelineDesc<'_>,
    ) -> Result<<Self::Resources as BackendResources>::Pipeline, BackendError>;

    fn create_command_queue(
        &self,
    ) -> Result<<Self::Resources as BackendResources>::Queue, BackendError>;

    /// Acquires this frame's drawable.
    ///
    /// `Ok(None)` means no drawable is available right now; the caller skips
    /// the frame. `Err` is reserved for unrecoverable surface loss.
    fn acquire_frame(&mut self) -> Result<Option<Self::Frame>, BackendError>;

    /// Opens a recording context that clears `frame` to `clear`.
    fn begin_pass<'f>(
        &'f self,
        queue: &'f <Self::Resources as BackendResources>::Queue,
        frame: &'f mut Self::Frame,
        clear: ClearColor,
    ) -> Self::Pass<'f>;

    /// Marks `frame` for presentation once its commands are committed.
    fn schedule_present(&self, frame: &mut Self::Frame);

    /// Submits the recorded commands, then presents if scheduled.
    fn commit(&self, queue: &<Self::Resources as BackendResources>::Queue, frame: Self::Frame);
}

/// Recording context for one render pass.
pub trait PassEncoder<R: BackendResources> {
    fn set_viewport(&mut self, size: ViewportSize);

    fn set_pipeline(&mut self, pipeline: &R::Pipeline);

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &R::Buffer);

    /// Binds `size` as the vertex stage's viewport uniform.
    fn set_viewport_uniform(&mut self, size: ViewportSize);

    fn set_fragment_texture(&mut self, texture: &R::Texture);

    fn draw(&mut self, topology: wgpu::PrimitiveTopology, vertices: Range<u32>);

    fn end_encoding(self);
}
