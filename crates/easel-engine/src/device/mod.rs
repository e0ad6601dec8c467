//! GPU device + surface management for the accelerated drawable.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain) for a window
//! - acquiring frames, submitting them and reporting their completion

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
