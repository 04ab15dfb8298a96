//! GPU-accelerated backend for the Graveyard Shift skeleton using wgpu.
//!
//! Renders each frame as a batch of instanced solid quads and presents
//! with [`wgpu::PresentMode::AutoVsync`], so the present call paces the
//! run loop to the display refresh rate.
//!
//! Uses:
//! - [`wgpu`] for GPU rendering
//! - [`winit`] for window creation and the event queue
//!
//! The core pulls frames through [`Backend`] instead of handing control
//! to the platform, so this driver pumps the winit event loop manually
//! once per poll rather than parking inside `run_app`.

mod input;
mod renderer;

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowId},
};

use shift_core::{AppConfig, Backend, BackendError, Color, Event, Rect};

use renderer::{RectInstance, Uniforms};

/// Pumps allowed for `resumed` to deliver the window during creation.
const CREATE_WINDOW_ATTEMPTS: usize = 64;

/// How long one creation pump may block waiting for the compositor.
const CREATE_WINDOW_TIMEOUT: Duration = Duration::from_millis(10);

/// Rectangles the instance buffer starts with room for.
const INSTANCE_CAPACITY: usize = 16;

// ---------------------------------------------------------------------------
// WindowShell — ApplicationHandler
// ---------------------------------------------------------------------------

/// The winit side of the driver: creates the window when the event loop
/// resumes and queues translated events for the core to drain.
struct WindowShell {
    title: String,
    width: u32,
    height: u32,
    window: Option<Arc<Window>>,
    create_error: Option<String>,
    queue: Vec<Event>,
}

impl WindowShell {
    fn new() -> Self {
        Self {
            title: String::new(),
            width: 0,
            height: 0,
            window: None,
            create_error: None,
            queue: Vec::new(),
        }
    }
}

impl ApplicationHandler for WindowShell {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);

        let window_attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(self.width, self.height))
            .with_resizable(true);

        match event_loop.create_window(window_attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => self.create_error = Some(e.to_string()),
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(ev) = input::translate(&event) {
            self.queue.push(ev);
        }
    }
}

// ---------------------------------------------------------------------------
// GPU State
// ---------------------------------------------------------------------------

struct GpuState {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
}

// ---------------------------------------------------------------------------
// WgpuBackend
// ---------------------------------------------------------------------------

/// GPU-accelerated [`Backend`]: a winit window with a wgpu renderer
/// behind it.
///
/// Must be used from the main thread; winit requires it for event loop
/// creation on most platforms.
pub struct WgpuBackend {
    event_loop: Option<EventLoop<()>>,
    shell: WindowShell,
    gpu: Option<GpuState>,
    draw_color: Color,
    clear_color: Color,
    /// Rectangles batched since the last `clear`.
    instances: Vec<RectInstance>,
    /// Most recent resize, applied at the next frame start.
    pending_resize: Option<(u32, u32)>,
}

impl WgpuBackend {
    pub fn new() -> Self {
        Self {
            event_loop: None,
            shell: WindowShell::new(),
            gpu: None,
            draw_color: Color::BLACK,
            clear_color: Color::BLACK,
            instances: Vec::new(),
            pending_resize: None,
        }
    }
}

impl Default for WgpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for WgpuBackend {
    fn init_video(&mut self, _config: &AppConfig) -> Result<(), BackendError> {
        if self.event_loop.is_some() {
            return Ok(());
        }
        let event_loop = EventLoop::new().map_err(BackendError::from_err)?;
        self.event_loop = Some(event_loop);
        Ok(())
    }

    fn create_window(&mut self, config: &AppConfig) -> Result<(), BackendError> {
        let event_loop = self
            .event_loop
            .as_mut()
            .ok_or_else(|| BackendError::new("video subsystem not initialized"))?;

        self.shell.title = config.title.clone();
        self.shell.width = config.width;
        self.shell.height = config.height;

        // The window is created inside `resumed`; pump until it shows up.
        for _ in 0..CREATE_WINDOW_ATTEMPTS {
            if self.shell.window.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(CREATE_WINDOW_TIMEOUT), &mut self.shell)
            {
                return Err(BackendError::new(format!(
                    "event loop exited with code {code} before the window appeared"
                )));
            }
            if let Some(reason) = self.shell.create_error.take() {
                return Err(BackendError::new(reason));
            }
        }

        match self.shell.window {
            Some(_) => Ok(()),
            None => Err(BackendError::new("window was never delivered")),
        }
    }

    fn create_renderer(&mut self) -> Result<(), BackendError> {
        if self.gpu.is_some() {
            return Ok(());
        }
        let window = self
            .shell
            .window
            .clone()
            .ok_or_else(|| BackendError::new("window not created"))?;

        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(BackendError::from_err)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| BackendError::new("no suitable GPU adapter found"))?;

        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default(), None))
                .map_err(BackendError::from_err)?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        // Shader
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("rect shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("rect.wgsl").into()),
        });

        // Uniform buffer
        let uniforms = Uniforms::new(surface_config.width, surface_config.height);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Instance buffer
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("rect instances"),
            size: (INSTANCE_CAPACITY * std::mem::size_of::<RectInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Bind group
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("rect bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("rect bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // Pipeline
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("rect pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("rect pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<RectInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[
                        // pos
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x2,
                            offset: 0,
                            shader_location: 0,
                        },
                        // size
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x2,
                            offset: 8,
                            shader_location: 1,
                        },
                        // color
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Uint32,
                            offset: 16,
                            shader_location: 2,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        info!(
            "wgpu renderer ready: {}x{} {:?}, vsync",
            surface_config.width, surface_config.height, surface_format
        );

        self.gpu = Some(GpuState {
            device,
            queue,
            surface,
            surface_config,
            pipeline,
            bind_group,
            uniform_buffer,
            instance_buffer,
        });
        Ok(())
    }

    fn poll_events(&mut self, out: &mut Vec<Event>) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.shell);
        if let PumpStatus::Exit(_) = status {
            // The platform tore the loop down underneath us; surface it
            // as a close request so the run loop winds down normally.
            self.shell.queue.push(Event::CloseRequested);
        }

        let start = out.len();
        out.append(&mut self.shell.queue);

        for ev in &out[start..] {
            if let Event::Resized { width, height } = *ev {
                self.pending_resize = Some((width, height));
            }
        }
    }

    fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    fn clear(&mut self) {
        // Frame start: latch the clear color, drop last frame's batch,
        // and apply any resize observed since.
        self.clear_color = self.draw_color;
        self.instances.clear();

        if let (Some((width, height)), Some(gpu)) =
            (self.pending_resize.take(), self.gpu.as_mut())
        {
            gpu.surface_config.width = width.max(1);
            gpu.surface_config.height = height.max(1);
            gpu.surface.configure(&gpu.device, &gpu.surface_config);
        }
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.instances.push(RectInstance::new(rect, self.draw_color));
    }

    fn present(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        // Reallocate the instance buffer if this frame batched more
        // rectangles than it has room for.
        let needed = (self.instances.len() * std::mem::size_of::<RectInstance>()) as u64;
        if needed > gpu.instance_buffer.size() {
            gpu.instance_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("rect instances"),
                size: needed,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }
        if !self.instances.is_empty() {
            gpu.queue.write_buffer(
                &gpu.instance_buffer,
                0,
                bytemuck::cast_slice(&self.instances),
            );
        }

        let uniforms = Uniforms::new(gpu.surface_config.width, gpu.surface_config.height);
        gpu.queue
            .write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let surface_texture = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                // Outdated or lost surface; skip this frame and let the
                // next resize reconfigure it.
                warn!("surface unavailable, skipping frame: {e}");
                return;
            }
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("rect encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rect pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(to_wgpu_color(self.clear_color)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !self.instances.is_empty() {
                pass.set_pipeline(&gpu.pipeline);
                pass.set_bind_group(0, &gpu.bind_group, &[]);
                pass.set_vertex_buffer(0, gpu.instance_buffer.slice(..));
                pass.draw(0..4, 0..self.instances.len() as u32);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    fn shutdown(&mut self) {
        // Reverse acquisition order: renderer, window, subsystem.
        self.gpu = None;
        self.shell.window = None;
        self.event_loop = None;
        self.instances.clear();
        self.pending_resize = None;
    }
}

fn to_wgpu_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r() as f64 / 255.0,
        g: color.g() as f64 / 255.0,
        b: color.b() as f64 / 255.0,
        a: 1.0,
    }
}
