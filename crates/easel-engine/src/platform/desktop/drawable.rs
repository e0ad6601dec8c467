use std::sync::Arc;

use anyhow::{Context, Result};
use winit::window::Window;

use crate::coords::{Size, Viewport};
use crate::device::{Gpu, GpuInit};
use crate::error::PresentError;
use crate::platform::{Drawable, DrawableConfig, FrameListener, FrameSink};
use crate::render::{RectRenderer, RenderCtx, RenderTarget};
use crate::scene::Scene;
use crate::surface::FrameToken;

/// GPU drawable covering a window's client area.
pub(super) struct WgpuDrawable {
    gpu: Option<Gpu>,
    rects: RectRenderer,
    /// `None` once disposed, so the window can be destroyed with its owner.
    window: Option<Arc<Window>>,
    configured: Option<Size>,
    auto_redraw: bool,
}

impl WgpuDrawable {
    pub(super) fn new(window: Arc<Window>, config: DrawableConfig) -> Result<Self> {
        let gpu = pollster::block_on(Gpu::new(window.clone(), config.size, GpuInit::for_vsync(config.vsync)))
            .context("failed to initialize GPU drawable")?;

        Ok(Self {
            gpu: Some(gpu),
            rects: RectRenderer::new(),
            window: Some(window),
            configured: None,
            auto_redraw: true,
        })
    }

    fn client_size(&self) -> Option<Size> {
        let inner = self.window.as_ref()?.inner_size();
        Some(Size::new(inner.width, inner.height))
    }
}

impl Drawable for WgpuDrawable {
    fn size(&self) -> Size {
        match &self.gpu {
            Some(gpu) => gpu.size(),
            None => Size::default(),
        }
    }

    fn set_auto_redraw(&mut self, enabled: bool) {
        self.auto_redraw = enabled;
    }

    fn set_focusable(&mut self, focusable: bool) {
        // The drawable is the whole client area; focusing it means focusing the window.
        if let (true, Some(window)) = (focusable, &self.window) {
            window.focus_window();
        }
    }

    fn display(&mut self, listener: &mut dyn FrameListener, token: FrameToken) -> Result<(), PresentError> {
        let (Some(size), Some(gpu)) = (self.client_size(), self.gpu.as_mut()) else {
            return Err(PresentError::Fatal("drawable disposed".into()));
        };
        if size.is_empty() {
            return Err(PresentError::Transient("client area has zero size".into()));
        }

        match self.configured {
            None => listener.init(size),
            Some(prev) if prev != size => {
                gpu.resize(size);
                listener.reshape(size);
            }
            Some(_) => {}
        }
        self.configured = Some(size);

        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(e) => {
                let action = gpu.handle_surface_error(&e);
                return Err(action.into_present_error(&e));
            }
        };

        let mut sink = GpuSink {
            ctx: RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format(), Viewport::from_size(size)),
            target: RenderTarget::new(&mut frame.encoder, &frame.view),
            rects: &mut self.rects,
            size,
            drawn: false,
        };
        listener.display(&mut sink);
        if !sink.drawn {
            // Never present uninitialized swap-chain contents.
            sink.target.clear(wgpu::Color::BLACK);
        }
        drop(sink);

        gpu.submit(frame, token);
        if let (true, Some(window)) = (self.auto_redraw, &self.window) {
            window.request_redraw();
        }
        Ok(())
    }

    fn poll(&mut self) {
        if let Some(gpu) = &self.gpu {
            gpu.poll();
        }
    }

    fn dispose(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.poll();
            log::debug!("gpu drawable on {} released", gpu.adapter_name());
        }
        self.window = None;
    }
}

/// Replays scenes into the frame being recorded.
struct GpuSink<'a> {
    ctx: RenderCtx<'a>,
    target: RenderTarget<'a>,
    rects: &'a mut RectRenderer,
    size: Size,
    drawn: bool,
}

impl FrameSink for GpuSink<'_> {
    fn size(&self) -> Size {
        self.size
    }

    fn draw(&mut self, scene: &Scene) {
        let clear = scene.clear.unwrap_or(crate::paint::Color::BLACK);
        self.target.clear(wgpu::Color {
            r: f64::from(clear.r),
            g: f64::from(clear.g),
            b: f64::from(clear.b),
            a: f64::from(clear.a),
        });
        self.rects.render(&self.ctx, &mut self.target, &scene.list);
        self.drawn = true;
    }
}
