use thiserror::Error;

use crate::decode::DecodeError;

use super::backend::BackendError;
use super::geometry::RegionError;

/// Renderer construction or frame failure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image could not be loaded")]
    Decode(#[from] DecodeError),

    #[error("invalid quad region")]
    Region(#[from] RegionError),

    #[error("GPU backend failure")]
    Backend(#[from] BackendError),

    /// A frame was requested before the renderer finished construction.
    #[error("renderer is not ready")]
    NotReady,
}
