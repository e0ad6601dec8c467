use std::sync::Arc;

use anyhow::{Context, Result};
use winit::window::Window;

use crate::coords::Size;
use crate::surface::FrameToken;

use super::surface::{choose_alpha_mode, choose_present_mode, choose_surface_format, map_surface_error};
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// Owns wgpu core objects and the surface configuration.
///
/// This type is the low-level rendering context:
/// - creates and stores Instance/Adapter/Device/Queue
/// - creates and configures the Surface (swapchain)
/// - acquires frames and provides an encoder + view for rendering
///
/// The surface holds its own `Arc` of the window, so no lifetime ties a `Gpu`
/// to the window that created it.
pub struct Gpu {
    /// Surface bound to the window. Declared first: dropped before the device.
    surface: wgpu::Surface<'static>,

    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: Size,

    adapter_name: String,

    /// Kept alive for as long as the objects created from it.
    _instance: wgpu::Instance,
}

impl Gpu {
    /// Creates a GPU context bound to `window`.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: Arc<Window>, size: Size, init: GpuInit) -> Result<Self> {
        anyhow::ensure!(!size.is_empty(), "drawable has zero size");

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        // Use all backends to allow wgpu to select the optimal platform backend.
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("easel-engine device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps, prefer_srgb).context("no supported surface formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: choose_present_mode(&caps, present_mode),
            alpha_mode: choose_alpha_mode(&caps, alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        let adapter_name = adapter.get_info().name;
        log::debug!(
            "gpu ready: {adapter_name}, {format:?}, {:?}, {size}",
            config.present_mode
        );

        Ok(Gpu {
            surface,
            device,
            queue,
            config,
            size,
            adapter_name,
            _instance: instance,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        self.config.present_mode
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface after a resize.
    ///
    /// wgpu does not support configuring a surface with a 0x0 size; in that case,
    /// only internal state is updated and configuration is deferred.
    pub fn resize(&mut self, new_size: Size) {
        self.size = new_size;
        if new_size.is_empty() {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquires the next surface texture and creates an encoder.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("easel frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits and presents `frame`. `token` is released once the GPU has
    /// finished the submitted work.
    pub fn submit(&self, frame: GpuFrame, token: FrameToken) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        self.queue.on_submitted_work_done(move || token.release());
        drop(frame.view);
        frame.surface_texture.present();
    }

    /// Lets completion callbacks of finished submissions run.
    pub fn poll(&self) {
        let _ = self.device.poll(wgpu::PollType::Poll);
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: &wgpu::SurfaceError) -> SurfaceErrorAction {
        map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }
}
