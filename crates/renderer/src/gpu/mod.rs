mod context;
mod pipeline;
pub(crate) mod uniforms;

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{error, info};
use winit::dpi::PhysicalSize;

use crate::compile::FALLBACK_FRAGMENT_GLSL;
use crate::runtime::FrameTiming;
use context::GpuContext;
use pipeline::{PipelineLayouts, ShaderPipeline};
use uniforms::FrameUniforms;

/// Aggregates every GPU-side object the render loop needs.
///
/// Owned exclusively by the render thread; the active pipeline is swapped in
/// place when a reload compiles successfully, and the superseded pipeline is
/// dropped (and its GPU objects released) at that point.
pub(crate) struct GpuState {
    context: GpuContext,
    layouts: PipelineLayouts,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: FrameUniforms,
    pipeline: ShaderPipeline,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        size: PhysicalSize<u32>,
        fragment_source: &str,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, size)?;
        let layouts = PipelineLayouts::new(&context.device)?;

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform buffer"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform bind group"),
            layout: &layouts.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline = match ShaderPipeline::new(
            &context.device,
            &layouts,
            context.surface_format,
            fragment_source,
        ) {
            Ok(pipeline) => pipeline,
            Err(err) => {
                error!("initial shader failed to compile; starting dark:\n{err:#}");
                ShaderPipeline::new(
                    &context.device,
                    &layouts,
                    context.surface_format,
                    FALLBACK_FRAGMENT_GLSL,
                )?
            }
        };

        let uniforms = FrameUniforms::new(context.size);
        context
            .queue
            .write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        Ok(Self {
            context,
            layouts,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
            pipeline,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
        self.uniforms
            .set_resolution(self.context.size.width, self.context.size.height);
        info!(
            width = self.context.size.width,
            height = self.context.size.height,
            "setting resolution"
        );
    }

    /// Compiles `fragment_source` and swaps it in as the active program.
    ///
    /// On failure the previous program stays active and the diagnostic is
    /// returned to the caller.
    pub(crate) fn swap_fragment(&mut self, fragment_source: &str) -> Result<()> {
        let pipeline = ShaderPipeline::new(
            &self.context.device,
            &self.layouts,
            self.context.surface_format,
            fragment_source,
        )?;
        info!("swapping shader program");
        self.pipeline = pipeline;
        Ok(())
    }

    /// Binds the frame's uniform values and issues the full-screen draw.
    pub(crate) fn render(
        &mut self,
        timing: FrameTiming,
        mouse: [i32; 4],
    ) -> Result<(), wgpu::SurfaceError> {
        self.uniforms.update_frame(timing, mouse);
        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        tracing::trace!(
            "presented frame size={}x{}",
            self.context.size.width,
            self.context.size.height
        );
        Ok(())
    }
}
