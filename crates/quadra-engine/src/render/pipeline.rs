use super::backend::{PipelineDesc, PipelineOf, RenderBackend, ShaderLibrary};
use super::error::RenderError;
use super::geometry::TexturedVertex;

/// Vertex + fragment programs for the textured quad.
pub const QUAD_SHADERS: ShaderLibrary<'static> = ShaderLibrary {
    label: "quadra textured quad shader",
    wgsl: include_str!("shaders/textured_quad.wgsl"),
};

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Builds the textured-quad pipeline for `output_format`.
pub fn configure_pipeline<B: RenderBackend>(
    backend: &B,
    output_format: wgpu::TextureFormat,
) -> Result<PipelineOf<B>, RenderError> {
    let pipeline = backend.create_pipeline(&PipelineDesc {
        label: "quadra textured quad pipeline",
        library: QUAD_SHADERS,
        vertex_entry: VERTEX_ENTRY,
        fragment_entry: FRAGMENT_ENTRY,
        vertex_layout: TexturedVertex::layout(),
        topology: wgpu::PrimitiveTopology::TriangleList,
        color_format: output_format,
    })?;

    log::debug!("textured quad pipeline ready for {output_format:?}");

    Ok(pipeline)
}
