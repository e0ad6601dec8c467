use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::common::{
    clip_to_scissor, premul_alpha_blend, QuadVertex, ViewportUniform, QUAD_INDICES, QUAD_VERTICES,
};

/// Instanced solid-rectangle renderer.
///
/// Geometry is provided in pixels, converted to NDC in the vertex shader using viewport.
/// Color is expected to be premultiplied RGBA (`paint::Color`).
#[derive(Default)]
pub struct RectRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the rectangles of `draw_list` into `target`, in insertion order.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, draw_list: &DrawList) {
        let instances = collect_instances(draw_list);
        if instances.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        // Mutating methods must happen before borrowing pipeline/buffers immutably.
        self.write_viewport_uniform(ctx);
        self.ensure_instance_capacity(ctx, instances.len());

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };

        let raw: Vec<RectInstance> = instances.iter().map(|(inst, _)| *inst).collect();
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&raw));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("easel rect pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        // One instanced call per run of equal clip rects.
        for (range, clip) in clip_runs(&instances) {
            if let Some((sx, sy, sw, sh)) = clip_to_scissor(clip, ctx.viewport) {
                rpass.set_scissor_rect(sx, sy, sw, sh);
                rpass.draw_indexed(0..6, 0, range);
            }
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("easel rect shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/rect.wgsl").into()),
        });

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("easel rect bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: ViewportUniform::MIN_BINDING_SIZE,
                },
                count: None,
            }],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("easel rect pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("easel rect pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), RectInstance::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
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

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("easel rect viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("easel rect bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("easel rect quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("easel rect quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_viewport_uniform(&mut self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::new(ctx.viewport)));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required_instances: usize) {
        if required_instances <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required_instances.next_power_of_two().max(64);
        let new_size = (new_cap * std::mem::size_of::<RectInstance>()) as u64;

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("easel rect instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

/// GPU instances paired with their clip rects, in paint order.
fn collect_instances(draw_list: &DrawList) -> Vec<(RectInstance, Option<Rect>)> {
    draw_list
        .items()
        .iter()
        .filter_map(|item| {
            let DrawCmd::FillRect(cmd) = &item.cmd;
            if cmd.rect.is_empty() {
                return None;
            }
            let c = cmd.color;
            Some((
                RectInstance {
                    origin: [cmd.rect.origin.x as f32, cmd.rect.origin.y as f32],
                    size: [cmd.rect.size.width as f32, cmd.rect.size.height as f32],
                    color: [c.r, c.g, c.b, c.a],
                },
                item.clip_rect,
            ))
        })
        .collect()
}

/// Splits instances into consecutive runs sharing a clip rect.
fn clip_runs(instances: &[(RectInstance, Option<Rect>)]) -> Vec<(std::ops::Range<u32>, Option<Rect>)> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < instances.len() {
        let clip = instances[i].1;
        let mut j = i + 1;
        while j < instances.len() && instances[j].1 == clip {
            j += 1;
        }
        runs.push((i as u32..j as u32, clip));
        i = j;
    }
    runs
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl RectInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    #[test]
    fn empty_rects_produce_no_instances() {
        let mut list = DrawList::new();
        list.push_fill_rect(Rect::new(0, 0, 0, 10), Color::WHITE);
        list.push_fill_rect(Rect::new(0, 0, 10, 10), Color::WHITE);
        assert_eq!(collect_instances(&list).len(), 1);
    }

    #[test]
    fn runs_split_on_clip_changes() {
        let mut list = DrawList::new();
        list.push_fill_rect(Rect::new(0, 0, 4, 4), Color::WHITE);
        list.push_fill_rect(Rect::new(4, 0, 4, 4), Color::WHITE);
        list.push_clip(Rect::new(0, 0, 2, 2));
        list.push_fill_rect(Rect::new(0, 0, 4, 4), Color::BLACK);
        list.pop_clip();
        list.push_fill_rect(Rect::new(8, 0, 4, 4), Color::WHITE);

        let runs = clip_runs(&collect_instances(&list));
        let ranges: Vec<_> = runs.iter().map(|(r, _)| r.clone()).collect();
        assert_eq!(ranges, vec![0..2, 2..3, 3..4]);
        assert_eq!(runs[1].1, Some(Rect::new(0, 0, 2, 2)));
    }
}
