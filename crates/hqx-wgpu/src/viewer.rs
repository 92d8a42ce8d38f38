//! Window, GPU context and the per-frame render path
//!
//! `ViewerContext` owns everything with a GPU lifetime: the window and its
//! surface, the device and queue, the persistent source image texture, the
//! static quad geometry, and the filter registry. Construction acquires
//! resources in dependency order and teardown releases them in reverse by
//! ownership — a failure mid-initialization drops whatever was already built.

use std::path::Path;
use std::sync::Arc;

use hqx_wgpu::geometry::{QUAD_INDICES, create_quad_buffers};
use hqx_wgpu::texture::{LoadedTexture, load_texture};
use hqx_wgpu::{DEFAULT_ZOOM, FilterRegistry, HqxError};
use winit::{
    dpi::PhysicalSize,
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes},
};

const WINDOW_TITLE: &str = "HQx Viewer";

/// Background color for any surface area the quad does not cover
const BACKGROUND_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// The complete rendering state of the viewer.
pub struct ViewerContext {
    /// Window handle, shared with the surface
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_configuration: wgpu::SurfaceConfiguration,

    /// Static quad geometry shared by every filter
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,

    /// The one persistent source image texture
    source: LoadedTexture,
    /// All filter slots and the active selection
    registry: FilterRegistry,
}

impl ViewerContext {
    /// Creates the window, the GPU context, and every filter resource.
    ///
    /// The window starts hidden and is shown once all resources exist, sized
    /// to the source image times the default zoom factor.
    ///
    /// # Arguments
    /// * `event_loop` - The active event loop for window creation
    /// * `assets_dir` - Base directory of the filter asset pack
    /// * `image_path` - The image file to display
    pub fn new(event_loop: &ActiveEventLoop, assets_dir: &Path, image_path: &Path) -> Result<Self, HqxError> {
        let window = Arc::new(
            event_loop
                .create_window(
                    WindowAttributes::default()
                        .with_resizable(true)
                        .with_visible(false)
                        .with_title(WINDOW_TITLE),
                )
                .expect("failed to create window"),
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: Default::default(),
        }))?;

        tracing::debug!("graphics device ready");

        let source = load_texture(&device, &queue, image_path, "Source image")?;
        tracing::info!(
            path = %image_path.display(),
            width = source.width,
            height = source.height,
            "source image loaded"
        );

        // The image is drawn with its raw byte values, so render through a
        // non-sRGB view of the surface.
        let surface_capabilities = surface.get_capabilities(&adapter);
        let surface_texture_format = surface_capabilities
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_capabilities.formats[0]);

        let initial_width = source.width * DEFAULT_ZOOM;
        let initial_height = source.height * DEFAULT_ZOOM;

        let surface_configuration = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            width: initial_width,
            height: initial_height,
            format: surface_texture_format,
            view_formats: vec![surface_texture_format, surface_texture_format.remove_srgb_suffix()],
            alpha_mode: surface_capabilities.alpha_modes[0],
            present_mode: surface_capabilities.present_modes[0],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_configuration);

        let render_format = surface_texture_format.remove_srgb_suffix();
        let registry = FilterRegistry::new(
            &device,
            &queue,
            assets_dir,
            &source,
            render_format,
            DEFAULT_ZOOM as usize - 1,
        )?;
        tracing::info!(slots = registry.len(), "filter registry initialized");

        let (vertex_buffer, index_buffer) = create_quad_buffers(&device);

        let context = Self {
            window,
            surface,
            device,
            queue,
            surface_configuration,
            vertex_buffer,
            index_buffer,
            source,
            registry,
        };

        let _ = context.window.request_inner_size(PhysicalSize::new(initial_width, initial_height));
        context.update_window_title();
        context.window.set_visible(true);
        context.window.focus_window();
        context.window.request_redraw();

        Ok(context)
    }

    /// Renders one frame: clear, bind the active filter's resources, one
    /// indexed draw of the quad, present.
    ///
    /// No GPU objects are allocated on this path; everything was built at
    /// startup.
    pub fn render(&mut self) {
        let surface = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure and draw on the next redraw request.
                self.surface.configure(&self.device, &self.surface_configuration);
                self.window.request_redraw();
                return;
            }
            Err(err) => {
                tracing::warn!("skipping frame: {err}");
                return;
            }
        };

        let surface_view = surface.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(surface.texture.format().remove_srgb_suffix()),
            ..Default::default()
        });

        let slot = self.registry.current_slot();

        let mut encoder = self.device.create_command_encoder(&Default::default());
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(slot.name),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });

            render_pass.set_pipeline(slot.pipeline());
            render_pass.set_bind_group(0, slot.bind_group(), &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
        }

        self.queue.submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        surface.present();
    }

    /// Switches the active filter and optionally resizes the window to the
    /// requested zoom factor times the source image.
    pub fn set_filter(&mut self, index: usize, zoom: Option<u32>) {
        // The key mapping is bounded by construction; an out-of-range index
        // here is a logic bug, not a user error.
        self.registry
            .select(index)
            .expect("key mapping selected a filter index outside the registry");

        let slot = self.registry.current_slot();
        tracing::info!(filter = slot.name, scale = slot.scale, ?zoom, "filter selected");

        if let Some(zoom) = zoom {
            let _ = self
                .window
                .request_inner_size(PhysicalSize::new(self.source.width * zoom, self.source.height * zoom));
        }

        self.update_window_title();
        self.window.request_redraw();
    }

    /// Handles a window resize by reconfiguring the surface.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_configuration.width = new_size.width;
            self.surface_configuration.height = new_size.height;
            self.surface.configure(&self.device, &self.surface_configuration);
            self.window.request_redraw();
        }
    }

    fn update_window_title(&self) {
        let slot = self.registry.current_slot();
        self.window.set_title(&format!("{WINDOW_TITLE} [{}]", slot.name));
    }
}
