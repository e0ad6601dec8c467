//! GPU types shared by the renderers.

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Viewport};

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    pub(super) fn new(viewport: Viewport) -> Self {
        Self {
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            _pad: [0.0; 2],
        }
    }

    /// Minimum binding size of the uniform buffer.
    pub(super) const MIN_BINDING_SIZE: Option<std::num::NonZeroU64> =
        std::num::NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64);
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── scissor rect ──────────────────────────────────────────────────────────

/// Scissor arguments `(x, y, w, h)` for `clip`, cropped to the viewport.
///
/// `None` clip means the full viewport. Returns `None` when nothing is left
/// to draw.
pub(super) fn clip_to_scissor(clip: Option<Rect>, viewport: Viewport) -> Option<(u32, u32, u32, u32)> {
    let vw = viewport.width.max(1.0) as u32;
    let vh = viewport.height.max(1.0) as u32;
    let full = Rect::new(0, 0, vw, vh);

    let r = match clip {
        None => full,
        Some(clip) => clip.intersect(full)?,
    };

    if r.is_empty() {
        None
    } else {
        Some((r.origin.x as u32, r.origin.y as u32, r.size.width, r.size.height))
    }
}
