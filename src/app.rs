//! The application shell: window and event-loop wiring, pointer tracking,
//! asynchronous texture delivery and the per-frame render cycle.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window (on the web, bound to the `webgl` canvas),
//!    builds the GPU context and scene, and kicks off the three texture loads
//! 2. each finished load arrives as an [`AppEvent`] and is bound on the loop
//!    thread
//! 3. `CursorMoved` overwrites the pointer state; `Resized` goes through the
//!    capped-pixel-ratio resize path
//! 4. `RedrawRequested` advances the clock-driven animation, uploads the
//!    uniforms, records the relief pass and the panel pass, presents, and
//!    requests the next frame

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

use crate::{
    clock::Clock,
    context::Context,
    data_structures::{
        scene::{PointerState, Scene},
        texture::Texture,
    },
    panel::Panel,
    render::ReliefRender,
    resources::{self, LoadState, TextureKind},
    uniforms::LightUniform,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// The canvas element the web build renders into. Startup panics if the host
/// document has no element with this id.
#[cfg(target_arch = "wasm32")]
const CANVAS_ID: &str = "webgl";

/// Events posted back into the winit loop from outside it.
pub enum AppEvent {
    /// Deferred initialization result; the web build constructs the GPU
    /// context in a spawned future.
    #[cfg(target_arch = "wasm32")]
    Initialized(Box<AppState>),
    /// One texture load finished, successfully or not.
    TextureLoaded {
        kind: TextureKind,
        result: anyhow::Result<image::DynamicImage>,
    },
}

/// Fully initialized application state.
pub struct AppState {
    ctx: Context,
    scene: Scene,
    relief: ReliefRender,
    panel: Panel,
    clock: Clock,
    pointer: PointerState,
    egui_ctx: egui::Context,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl AppState {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        let scene = Scene::new(aspect);

        let ctx = Context::new(window, &scene.camera, LightUniform::from_light(&scene.light)).await?;

        let relief = ReliefRender::new(
            &ctx.device,
            &ctx.queue,
            &ctx.config,
            &ctx.camera.bind_group_layout,
            &ctx.light.bind_group_layout,
            &scene.mesh,
        );
        let panel = Panel::new(&scene);

        let egui_ctx = egui::Context::default();
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &ctx.device,
            ctx.config.format,
            egui_wgpu::RendererOptions {
                msaa_samples: 1,
                depth_stencil_format: None,
                dithering: false,
                ..Default::default()
            },
        );

        Ok(Self {
            ctx,
            scene,
            relief,
            panel,
            clock: Clock::start(),
            pointer: PointerState::default(),
            egui_ctx,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        let scale_factor = self.ctx.window.scale_factor();
        self.ctx
            .resize(width, height, scale_factor, &mut self.scene.camera);
    }

    /// Bind one resolved texture load. Failures keep the placeholder.
    fn apply_texture(&mut self, kind: TextureKind, result: anyhow::Result<image::DynamicImage>) {
        let state = match result {
            Ok(img) => {
                let texture = Texture::from_image(
                    &self.ctx.device,
                    &self.ctx.queue,
                    &img,
                    Some(kind.path()),
                    kind.is_srgb(),
                );
                self.relief.bind_texture(&self.ctx.device, kind, texture);
                log::info!("bound {}", kind.path());
                LoadState::Loaded
            }
            Err(e) => {
                log::warn!("could not load {}: {}", kind.path(), e);
                LoadState::Failed
            }
        };
        *self.scene.mesh.material.slot_mut(kind) = state;
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // The steady-state cycle: clock, the two animated fields, uniforms.
        let elapsed = self.clock.elapsed_secs();
        self.scene.advance(elapsed, &self.pointer);

        self.ctx.camera.update(&self.ctx.queue, &self.scene.camera);
        self.ctx.light.update(&self.ctx.queue, &self.scene.light);
        self.relief.update(&self.ctx.queue, &self.scene.mesh);

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Relief Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            self.relief.draw(
                &mut render_pass,
                &self.ctx.camera.bind_group,
                &self.ctx.light.bind_group,
            );
        }

        // The panel rides in its own pass on top of the scene.
        let raw_input = self.egui_winit.take_egui_input(&self.ctx.window);
        let full_output = self
            .egui_ctx
            .run(raw_input, |ctx| self.panel.ui(ctx, &mut self.scene));
        self.egui_winit
            .handle_platform_output(&self.ctx.window, full_output.platform_output);
        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.config.width, self.ctx.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut panel_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Panel Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                    multiview_mask: None,
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut panel_pass, &paint_jobs, &screen_descriptor);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
        Ok(())
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<AppEvent>,
    state: Option<AppState>,
}

impl App {
    fn new(event_loop: &EventLoop<AppEvent>) -> anyhow::Result<Self> {
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy: event_loop.create_proxy(),
            state: None,
        })
    }

    /// Kick off the three independent texture loads. Each task posts its own
    /// completion event; the slots resolve in whatever order the bytes
    /// arrive.
    fn spawn_texture_loads(&self) {
        for kind in TextureKind::ALL {
            let proxy = self.proxy.clone();

            #[cfg(not(target_arch = "wasm32"))]
            self.async_runtime.spawn(async move {
                let result = resources::load_image(kind).await;
                if proxy
                    .send_event(AppEvent::TextureLoaded { kind, result })
                    .is_err()
                {
                    log::warn!("event loop closed before {} finished loading", kind.path());
                }
            });

            #[cfg(target_arch = "wasm32")]
            wasm_bindgen_futures::spawn_local(async move {
                let result = resources::load_image(kind).await;
                let _ = proxy.send_event(AppEvent::TextureLoaded { kind, result });
            });
        }
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("undula");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .expect("failed to create the window"),
        );

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(AppState::new(window)) {
                Ok(state) => {
                    state.ctx.window.request_redraw();
                    self.state = Some(state);
                    self.spawn_texture_loads();
                }
                Err(e) => panic!(
                    "App initialization failed. Cannot create the main context: {}",
                    e
                ),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match AppState::new(window).await {
                    Ok(state) => {
                        assert!(proxy.send_event(AppEvent::Initialized(Box::new(state))).is_ok());
                    }
                    Err(e) => log::error!("App initialization failed: {}", e),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            #[cfg(target_arch = "wasm32")]
            AppEvent::Initialized(state) => {
                // This is the message from our wasm `spawn_local`.
                self.state = Some(*state);
                self.spawn_texture_loads();

                // Trigger a resize and redraw now that we are initialized.
                let state = self.state.as_mut().unwrap();
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
            }
            AppEvent::TextureLoaded { kind, result } => {
                if let Some(state) = &mut self.state {
                    state.apply_texture(kind, result);
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        // Let the panel see events first; it swallows the ones aimed at it.
        let response = state.egui_winit.on_window_event(&state.ctx.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                // Raw vertical pixels; the frame update owns the scaling.
                state.pointer.last_y = position.y;
            }
            WindowEvent::RedrawRequested => match state.render() {
                Ok(()) => {}
                // Reconfigure the surface if it's lost or outdated
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    state.ctx.reconfigure();
                }
                Err(e) => {
                    log::error!("Unable to render {}", e);
                }
            },
            _ => {}
        }
    }
}

/// Build the event loop and run until the window closes.
pub fn run() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<AppEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}

/// Web entry point; the native binary goes through `main` instead.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    if let Err(e) = run() {
        log::error!("fatal: {}", e);
    }
}
