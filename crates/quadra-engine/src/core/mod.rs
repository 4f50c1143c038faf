//! Core engine-facing contracts.
//!
//! The interface between the runtime (platform loop) and applications: the
//! `App` callbacks and the contexts they receive.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, InitCtx, WindowCtx};
