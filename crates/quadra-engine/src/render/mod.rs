//! Textured quad rendering.
//!
//! Construction pipeline: image → quad geometry + texture upload → pipeline
//! → [`QuadRenderer`]. The renderer then records one draw per frame through
//! the [`RenderBackend`] seam.
//!
//! Convention:
//! - quad positions are pixels relative to the quad center, +Y up
//! - the vertex shader divides by half the viewport to reach NDC

mod backend;
mod error;
mod geometry;
mod pipeline;
mod renderer;
mod texture;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{
    BackendError, BackendResources, PassEncoder, PipelineDesc, PipelineOf, RenderBackend,
    ShaderLibrary, TexelRegion, TextureDesc, TextureOf,
};
pub use error::RenderError;
pub use geometry::{
    build_quad, QuadRegion, RegionError, TexcoordOrigin, TexturedVertex, NUM_VERTICES,
};
pub use pipeline::{configure_pipeline, FRAGMENT_ENTRY, QUAD_SHADERS, VERTEX_ENTRY};
pub use renderer::{FrameOutcome, QuadConfig, QuadRenderer, RegionSpec};
pub use texture::{upload_texture, TEXTURE_FORMAT};
