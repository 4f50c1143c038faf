//! GPU resource construction for the quad renderer.
//!
//! Every wgpu call that can fail validation or run out of memory runs inside
//! [`capture`], so failures come back as [`BackendError`] instead of reaching
//! the device's uncaptured-error handler.
//!
//! Bind group layout used by the quad pipeline:
//! - group 0, binding 0: viewport uniform (vertex)
//! - group 1, binding 0: color texture (fragment)
//! - group 1, binding 1: filtering sampler (fragment)

use std::cell::OnceCell;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::{BackendError, PipelineDesc, TexelRegion, TextureDesc};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub(super) viewport: [f32; 2],
    pub(super) _pad: [f32; 2], // 16-byte alignment
}

/// Sampled image texture.
///
/// The texture bind group is created on first bind against the bound
/// pipeline's layout and reused afterwards.
pub struct GpuTexture {
    pub(super) texture: wgpu::Texture,
    pub(super) view: wgpu::TextureView,
    pub(super) bind_group: OnceCell<wgpu::BindGroup>,
}

/// Quad pipeline plus the bindings it owns (viewport UBO, sampler).
#[derive(Clone)]
pub struct GpuPipeline {
    pub(super) pipeline: wgpu::RenderPipeline,
    pub(super) topology: wgpu::PrimitiveTopology,
    pub(super) texture_layout: wgpu::BindGroupLayout,
    pub(super) sampler: wgpu::Sampler,
    pub(super) viewport_ubo: wgpu::Buffer,
    pub(super) viewport_bind_group: wgpu::BindGroup,
}

/// Runs `f` inside out-of-memory and validation error scopes.
///
/// Returns the first error either scope caught; the value `f` produced is
/// dropped in that case.
pub(super) fn capture<T>(
    device: &wgpu::Device,
    f: impl FnOnce() -> T,
) -> Result<T, wgpu::Error> {
    let out_of_memory_scope = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let validation_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let value = f();

    // Scopes pop innermost first.
    let validation = pollster::block_on(validation_scope.pop());
    let out_of_memory = pollster::block_on(out_of_memory_scope.pop());

    match validation.or(out_of_memory) {
        Some(err) => Err(err),
        None => Ok(value),
    }
}

fn device_error(what: &str, err: wgpu::Error) -> BackendError {
    BackendError::Device {
        what: what.to_string(),
        reason: err.to_string(),
    }
}

pub(super) fn create_texture(
    device: &wgpu::Device,
    desc: &TextureDesc<'_>,
) -> Result<GpuTexture, BackendError> {
    if desc.width == 0 || desc.height == 0 {
        return Err(BackendError::Empty("texture"));
    }

    let limit = device.limits().max_texture_dimension_2d;
    if desc.width > limit || desc.height > limit {
        return Err(BackendError::TextureTooLarge {
            width: desc.width,
            height: desc.height,
            limit,
        });
    }

    let (texture, view) = capture(device, || {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: desc.format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    })
    .map_err(|err| device_error(desc.label, err))?;

    Ok(GpuTexture {
        texture,
        view,
        bind_group: OnceCell::new(),
    })
}

pub(super) fn upload_texture_region(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &GpuTexture,
    region: TexelRegion,
    bytes: &[u8],
    bytes_per_row: u32,
) -> Result<(), BackendError> {
    capture(device, || {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x: region.x, y: region.y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(region.height),
            },
            wgpu::Extent3d {
                width: region.width,
                height: region.height,
                depth_or_array_layers: 1,
            },
        );
    })
    .map_err(|err| device_error("texture upload", err))
}

pub(super) fn create_vertex_buffer(
    device: &wgpu::Device,
    label: &str,
    contents: &[u8],
) -> Result<wgpu::Buffer, BackendError> {
    if contents.is_empty() {
        return Err(BackendError::Empty("vertex buffer"));
    }

    let limit = device.limits().max_buffer_size;
    let size = contents.len() as u64;
    if size > limit {
        return Err(BackendError::BufferTooLarge {
            label: label.to_string(),
            size,
            limit,
        });
    }

    capture(device, || {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::VERTEX,
        })
    })
    .map_err(|err| device_error(label, err))
}

/// Compiles the shader library and builds the pipeline with its bindings.
///
/// Shader compilation errors, entry-point or layout mismatches and an
/// unrenderable color format all surface as [`BackendError::Pipeline`].
pub(super) fn create_pipeline(
    device: &wgpu::Device,
    desc: &PipelineDesc<'_>,
) -> Result<GpuPipeline, BackendError> {
    capture(device, || build_pipeline(device, desc)).map_err(|err| BackendError::Pipeline {
        label: desc.label.to_string(),
        reason: err.to_string(),
    })
}

fn build_pipeline(device: &wgpu::Device, desc: &PipelineDesc<'_>) -> GpuPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(desc.library.label),
        source: wgpu::ShaderSource::Wgsl(desc.library.wgsl.into()),
    });

    let viewport_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("quadra viewport bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(
                    std::mem::size_of::<ViewportUniform>() as u64,
                ),
            },
            count: None,
        }],
    });

    let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("quadra texture bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("quadra pipeline layout"),
        bind_group_layouts: &[&viewport_layout, &texture_layout],
        immediate_size: 0,
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some(desc.vertex_entry),
            compilation_options: Default::default(),
            buffers: &[desc.vertex_layout.clone()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some(desc.fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.color_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("quadra image sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    });

    let viewport_ubo = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("quadra viewport ubo"),
        size: std::mem::size_of::<ViewportUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let viewport_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("quadra viewport bind group"),
        layout: &viewport_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: viewport_ubo.as_entire_binding(),
        }],
    });

    GpuPipeline {
        pipeline,
        topology: desc.topology,
        texture_layout,
        sampler,
        viewport_ubo,
        viewport_bind_group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::render::{ShaderLibrary, TexturedVertex, QUAD_SHADERS};

    /// Headless device on whatever adapter is available; `None` on machines
    /// without one, in which case the calling test returns early.
    fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .ok()?;
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).ok()
    }

    fn quad_desc(library: ShaderLibrary<'static>) -> PipelineDesc<'static> {
        PipelineDesc {
            label: "test quad pipeline",
            library,
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            vertex_layout: TexturedVertex::layout(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            color_format: wgpu::TextureFormat::Rgba8UnormSrgb,
        }
    }

    #[test]
    fn quad_shaders_build_a_pipeline() {
        let Some((device, _queue)) = headless_device() else {
            return;
        };
        assert!(create_pipeline(&device, &quad_desc(QUAD_SHADERS)).is_ok());
    }

    #[test]
    fn shader_type_error_is_reported_not_panicked() {
        let Some((device, _queue)) = headless_device() else {
            return;
        };
        // Declares both entry points but does not type-check.
        let broken = ShaderLibrary {
            label: "broken shader",
            wgsl: "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return 1u; }\n\
                   @fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }",
        };

        let err = create_pipeline(&device, &quad_desc(broken)).err().unwrap();
        assert!(matches!(err, BackendError::Pipeline { .. }), "{err:?}");
    }

    #[test]
    fn missing_entry_point_is_reported() {
        let Some((device, _queue)) = headless_device() else {
            return;
        };
        let desc = PipelineDesc {
            vertex_entry: "vs_absent",
            ..quad_desc(QUAD_SHADERS)
        };
        let err = create_pipeline(&device, &desc).err().unwrap();
        assert!(matches!(err, BackendError::Pipeline { .. }), "{err:?}");
    }

    #[test]
    fn unrenderable_format_is_reported() {
        let Some((device, _queue)) = headless_device() else {
            return;
        };
        let desc = PipelineDesc {
            color_format: wgpu::TextureFormat::Rgb9e5Ufloat,
            ..quad_desc(QUAD_SHADERS)
        };
        let err = create_pipeline(&device, &desc).err().unwrap();
        assert!(matches!(err, BackendError::Pipeline { .. }), "{err:?}");
    }

    #[test]
    fn mismatched_upload_is_reported() {
        let Some((device, queue)) = headless_device() else {
            return;
        };
        let texture = create_texture(
            &device,
            &TextureDesc {
                label: "test texture",
                width: 4,
                height: 4,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
            },
        )
        .unwrap();

        let region = TexelRegion { x: 0, y: 0, width: 4, height: 4 };
        assert!(upload_texture_region(&device, &queue, &texture, region, &[0; 64], 16).is_ok());

        // Region larger than the texture.
        let oversized = TexelRegion { x: 2, y: 2, width: 4, height: 4 };
        let err = upload_texture_region(&device, &queue, &texture, oversized, &[0; 64], 16)
            .unwrap_err();
        assert!(matches!(err, BackendError::Device { .. }), "{err:?}");
    }
}
