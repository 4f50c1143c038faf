//! Recording `RenderBackend` for unit tests.
//!
//! Every call is appended to an in-memory log; handles are sequential ids in
//! allocation order.

use std::cell::{Cell, RefCell};
use std::ops::Range;

use crate::coords::{ClearColor, ViewportSize};

use super::backend::{
    BackendError, BackendResources, PassEncoder, PipelineDesc, RenderBackend, TexelRegion,
    TextureDesc,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Handle(pub u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Failure {
    Buffer,
    Texture,
    Upload,
    Pipeline,
    Queue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateTexture {
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    },
    UploadTexture {
        texture: Handle,
        region: TexelRegion,
        len: usize,
        bytes_per_row: u32,
    },
    CreateBuffer {
        label: String,
        len: usize,
    },
    CreatePipeline {
        vertex_entry: String,
        fragment_entry: String,
        format: wgpu::TextureFormat,
    },
    CreateQueue,
    AcquireFrame,
    BeginPass,
    SetViewport(ViewportSize),
    SetPipeline(Handle),
    SetVertexBuffer {
        slot: u32,
        buffer: Handle,
    },
    SetViewportUniform(ViewportSize),
    SetTexture(Handle),
    Draw {
        topology: wgpu::PrimitiveTopology,
        vertices: Range<u32>,
    },
    EndEncoding,
    SchedulePresent,
    Commit {
        presented: bool,
    },
}

impl Call {
    pub fn is_allocation(&self) -> bool {
        matches!(
            self,
            Call::CreateTexture { .. }
                | Call::UploadTexture { .. }
                | Call::CreateBuffer { .. }
                | Call::CreatePipeline { .. }
                | Call::CreateQueue
        )
    }
}

pub struct RecordingFrame {
    present: bool,
}

pub struct RecordingBackend {
    pub format: wgpu::TextureFormat,
    pub drawable: ViewportSize,
    pub drawable_available: bool,
    pub surface_lost: bool,
    failure: Option<Failure>,

    calls: RefCell<Vec<Call>>,
    buffers: RefCell<Vec<(Handle, Vec<u8>)>>,
    next_id: Cell<u32>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            drawable: ViewportSize::new(800, 600),
            drawable_available: true,
            surface_lost: false,
            failure: None,
            calls: RefCell::new(Vec::new()),
            buffers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn failing(failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new()
        }
    }

    /// Drains the call log.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    pub fn buffer_contents(&self, id: u32) -> Vec<u8> {
        self.buffers
            .borrow()
            .iter()
            .find(|(h, _)| *h == Handle(id))
            .map(|(_, bytes)| bytes.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next_handle(&self) -> Handle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Handle(id)
    }

    fn fails(&self, what: Failure) -> bool {
        self.failure == Some(what)
    }
}

impl BackendResources for RecordingBackend {
    type Texture = Handle;
    type Buffer = Handle;
    type Pipeline = Handle;
    type Queue = Handle;
}

impl RenderBackend for RecordingBackend {
    type Resources = Self;
    type Frame = RecordingFrame;
    type Pass<'f>
        = RecordingPass<'f>
    where
        Self: 'f;

    fn output_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn drawable_size(&self) -> ViewportSize {
        self.drawable
    }

    fn create_texture(&self, desc: &TextureDesc<'_>) -> Result<Handle, BackendError> {
        if self.fails(Failure::Texture) {
            return Err(BackendError::TextureTooLarge {
                width: desc.width,
                height: desc.height,
                limit: 0,
            });
        }
        self.record(Call::CreateTexture {
            width: desc.width,
            height: desc.height,
            format: desc.format,
        });
        Ok(self.next_handle())
    }

    fn upload_texture_region(
        &self,
        texture: &Handle,
        region: TexelRegion,
        bytes: &[u8],
        bytes_per_row: u32,
    ) -> Result<(), BackendError> {
        if self.fails(Failure::Upload) {
            return Err(BackendError::Device {
                what: "texture upload".into(),
                reason: "rejected by test backend".into(),
            });
        }
        self.record(Call::UploadTexture {
            texture: *texture,
            region,
            len: bytes.len(),
            bytes_per_row,
        });
        Ok(())
    }

    fn create_buffer(&self, label: &str, contents: &[u8]) -> Result<Handle, BackendError> {
        if self.fails(Failure::Buffer) {
            return Err(BackendError::BufferTooLarge {
                label: label.to_string(),
                size: contents.len() as u64,
                limit: 0,
            });
        }
        self.record(Call::CreateBuffer {
            label: label.to_string(),
            len: contents.len(),
        });
        let handle = self.next_handle();
        self.buffers.borrow_mut().push((handle, contents.to_vec()));
        Ok(handle)
    }

    fn create_pipeline(&self, desc: &PipelineDesc<'_>) -> Result<Handle, BackendError> {
        if self.fails(Failure::Pipeline) {
            return Err(BackendError::Pipeline {
                label: desc.label.to_string(),
                reason: "rejected by test backend".into(),
            });
        }
        self.record(Call::CreatePipeline {
            vertex_entry: desc.vertex_entry.to_string(),
            fragment_entry: desc.fragment_entry.to_string(),
            format: desc.color_format,
        });
        Ok(self.next_handle())
    }

    fn create_command_queue(&self) -> Result<Handle, BackendError> {
        if self.fails(Failure::Queue) {
            return Err(BackendError::Empty("command queue"));
        }
        self.record(Call::CreateQueue);
        Ok(self.next_handle())
    }

    fn acquire_frame(&mut self) -> Result<Option<RecordingFrame>, BackendError> {
        self.record(Call::AcquireFrame);
        if self.surface_lost {
            return Err(BackendError::SurfaceLost("test surface lost".into()));
        }
        Ok(self
            .drawable_available
            .then_some(RecordingFrame { present: false }))
    }

    fn begin_pass<'f>(
        &'f self,
        _queue: &'f Handle,
        _frame: &'f mut RecordingFrame,
        _clear: ClearColor,
    ) -> RecordingPass<'f> {
        self.record(Call::BeginPass);
        RecordingPass { calls: &self.calls }
    }

    fn schedule_present(&self, frame: &mut RecordingFrame) {
        self.record(Call::SchedulePresent);
        frame.present = true;
    }

    fn commit(&self, _queue: &Handle, frame: RecordingFrame) {
        self.record(Call::Commit {
            presented: frame.present,
        });
    }
}

pub struct RecordingPass<'f> {
    calls: &'f RefCell<Vec<Call>>,
}

impl RecordingPass<'_> {
    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl PassEncoder<RecordingBackend> for RecordingPass<'_> {
    fn set_viewport(&mut self, size: ViewportSize) {
        self.record(Call::SetViewport(size));
    }

    fn set_pipeline(&mut self, pipeline: &Handle) {
        self.record(Call::SetPipeline(*pipeline));
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &Handle) {
        self.record(Call::SetVertexBuffer {
            slot,
            buffer: *buffer,
        });
    }

    fn set_viewport_uniform(&mut self, size: ViewportSize) {
        self.record(Call::SetViewportUniform(size));
    }

    fn set_fragment_texture(&mut self, texture: &Handle) {
        self.record(Call::SetTexture(*texture));
    }

    fn draw(&mut self, topology: wgpu::PrimitiveTopology, vertices: Range<u32>) {
        self.record(Call::Draw { topology, vertices });
    }

    fn end_encoding(self) {
        self.record(Call::EndEncoding);
    }
}
