//! `RenderBackend` implementation over wgpu.

use std::ops::Range;

use crate::coords::{ClearColor, ViewportSize};
use crate::render::{
    BackendError, BackendResources, PassEncoder, PipelineDesc, RenderBackend, TexelRegion,
    TextureDesc,
};

use super::resources::{self, GpuPipeline, GpuTexture, ViewportUniform};
use super::{Gpu, GpuFrame};

/// Handle set allocated by [`Gpu`].
pub enum WgpuResources {}

impl BackendResources for WgpuResources {
    type Texture = GpuTexture;
    type Buffer = wgpu::Buffer;
    type Pipeline = GpuPipeline;
    type Queue = wgpu::Queue;
}

// ── backend ───────────────────────────────────────────────────────────────

impl<'w> RenderBackend for Gpu<'w> {
    type Resources = WgpuResources;
    type Frame = GpuFrame;
    type Pass<'f>
        = GpuPass<'f>
    where
        Self: 'f;

    fn output_format(&self) -> wgpu::TextureFormat {
        self.surface_format()
    }

    fn drawable_size(&self) -> ViewportSize {
        self.surface.size()
    }

    fn create_texture(&self, desc: &TextureDesc<'_>) -> Result<GpuTexture, BackendError> {
        resources::create_texture(&self.device, desc)
    }

    fn upload_texture_region(
        &self,
        texture: &GpuTexture,
        region: TexelRegion,
        bytes: &[u8],
        bytes_per_row: u32,
    ) -> Result<(), BackendError> {
        resources::upload_texture_region(
            &self.device,
            &self.queue,
            texture,
            region,
            bytes,
            bytes_per_row,
        )
    }

    fn create_buffer(&self, label: &str, contents: &[u8]) -> Result<wgpu::Buffer, BackendError> {
        resources::create_vertex_buffer(&self.device, label, contents)
    }

    fn create_pipeline(&self, desc: &PipelineDesc<'_>) -> Result<GpuPipeline, BackendError> {
        resources::create_pipeline(&self.device, desc)
    }

    fn create_command_queue(&self) -> Result<wgpu::Queue, BackendError> {
        Ok(self.queue.clone())
    }

    fn acquire_frame(&mut self) -> Result<Option<GpuFrame>, BackendError> {
        self.begin_frame()
    }

    fn begin_pass<'f>(
        &'f self,
        queue: &'f wgpu::Queue,
        frame: &'f mut GpuFrame,
        clear: ClearColor,
    ) -> GpuPass<'f> {
        let target = ViewportSize::new(
            frame.surface_texture.texture.width(),
            frame.surface_texture.texture.height(),
        );

        let GpuFrame { view, encoder, .. } = frame;
        let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quadra quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &*view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        GpuPass {
            device: &self.device,
            queue,
            pass,
            target,
            bound: None,
        }
    }

    fn schedule_present(&self, frame: &mut GpuFrame) {
        frame.present = true;
    }

    fn commit(&self, queue: &wgpu::Queue, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
            present,
        } = frame;

        queue.submit(std::iter::once(encoder.finish()));
        drop(view);

        if present {
            surface_texture.present();
        }
    }
}

// ── pass ──────────────────────────────────────────────────────────────────

/// Open render pass on the current drawable.
pub struct GpuPass<'f> {
    device: &'f wgpu::Device,
    queue: &'f wgpu::Queue,
    pass: wgpu::RenderPass<'f>,
    target: ViewportSize,
    bound: Option<GpuPipeline>,
}

impl PassEncoder<WgpuResources> for GpuPass<'_> {
    fn set_viewport(&mut self, size: ViewportSize) {
        // wgpu rejects viewports larger than the attachment; a resize event may
        // arrive before the surface texture catches up.
        let w = size.width.min(self.target.width);
        let h = size.height.min(self.target.height);
        if w == 0 || h == 0 {
            return;
        }
        self.pass.set_viewport(0.0, 0.0, w as f32, h as f32, 0.0, 1.0);
    }

    fn set_pipeline(&mut self, pipeline: &GpuPipeline) {
        self.pass.set_pipeline(&pipeline.pipeline);
        self.bound = Some(pipeline.clone());
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &wgpu::Buffer) {
        self.pass.set_vertex_buffer(slot, buffer.slice(..));
    }

    fn set_viewport_uniform(&mut self, size: ViewportSize) {
        let Some(bound) = self.bound.as_ref() else {
            log::warn!("viewport uniform bound before a pipeline; ignored");
            return;
        };
        let u = ViewportUniform {
            viewport: size.as_uniform(),
            _pad: [0.0; 2],
        };
        self.queue.write_buffer(&bound.viewport_ubo, 0, bytemuck::bytes_of(&u));
        self.pass.set_bind_group(0, &bound.viewport_bind_group, &[]);
    }

    fn set_fragment_texture(&mut self, texture: &GpuTexture) {
        let Some(bound) = self.bound.as_ref() else {
            log::warn!("texture bound before a pipeline; ignored");
            return;
        };
        let device = self.device;
        let bind_group = texture.bind_group.get_or_init(|| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("quadra texture bind group"),
                layout: &bound.texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&bound.sampler),
                    },
                ],
            })
        });
        self.pass.set_bind_group(1, bind_group, &[]);
    }

    fn draw(&mut self, topology: wgpu::PrimitiveTopology, vertices: Range<u32>) {
        debug_assert_eq!(
            Some(topology),
            self.bound.as_ref().map(|p| p.topology),
            "draw topology must match the bound pipeline"
        );
        self.pass.draw(vertices, 0..1);
    }

    fn end_encoding(self) {
        drop(self.pass);
    }
}
