//! Central GPU and window context.

use std::sync::Arc;

use winit::window::Window;

use crate::{
    camera::CameraResources,
    data_structures::{scene::Camera, texture::Texture},
    uniforms::{LightResources, LightUniform},
};

/// Device pixel ratios above this are not worth the fill rate on very dense
/// displays.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Viewport bookkeeping: the window's physical size and scale factor, and the
/// surface extent derived from them with the pixel ratio capped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSizes {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

impl SurfaceSizes {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            scale_factor,
        }
    }

    /// The pixel ratio actually applied, never above [`MAX_PIXEL_RATIO`].
    pub fn applied_ratio(&self) -> f64 {
        self.scale_factor.min(MAX_PIXEL_RATIO)
    }

    /// Surface extent in pixels. Up to the cap this is the window's physical
    /// size; beyond it the extent shrinks so the surface never renders at
    /// more than twice the logical resolution.
    pub fn surface_extent(&self) -> (u32, u32) {
        let scale = self.applied_ratio() / self.scale_factor;
        (
            ((self.width as f64 * scale).round() as u32).max(1),
            ((self.height as f64 * scale).round() as u32).max(1),
        )
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Store new dimensions. Returns whether anything changed, so repeated
    /// identical calls fall through without touching the surface.
    pub fn apply(&mut self, width: u32, height: u32, scale_factor: f64) -> bool {
        let next = Self::new(width, height, scale_factor);
        if next == *self {
            return false;
        }
        *self = next;
        true
    }
}

/// Owns the window, the wgpu device/queue/surface, and the camera and light
/// GPU resources shared by every frame.
#[derive(Debug)]
pub struct Context {
    pub window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub sizes: SurfaceSizes,
    pub depth_texture: Texture,
    pub camera: CameraResources,
    pub light: LightResources,
}

impl Context {
    pub async fn new(
        window: Arc<Window>,
        camera: &Camera,
        light_uniform: LightUniform,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let sizes = SurfaceSizes::new(size.width, size.height, window.scale_factor());
        let (extent_w, extent_h) = sizes.surface_extent();

        log::info!("wgpu setup");
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                experimental_features: Default::default(),
            })
            .await?;

        log::info!("surface");
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: extent_w,
            height: extent_h,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera = CameraResources::new(&device, camera);
        let light = LightResources::new(&device, light_uniform);
        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            sizes,
            depth_texture,
            camera,
            light,
        })
    }

    /// Reconfigure for new window dimensions: cap the pixel ratio, resize the
    /// surface and depth texture, recompute the camera aspect. A call with
    /// unchanged dimensions is a no-op.
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f64, camera: &mut Camera) {
        if !self.sizes.apply(width, height, scale_factor) {
            return;
        }
        let (extent_w, extent_h) = self.sizes.surface_extent();
        self.config.width = extent_w;
        self.config.height = extent_h;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            Texture::create_depth_texture(&self.device, [extent_w, extent_h], "depth_texture");
        camera.set_aspect(self.sizes.aspect());
        self.camera.update(&self.queue, camera);
    }

    /// Reapply the current configuration, for a lost or outdated surface.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applied_ratio_is_capped_at_two() {
        for (dpr, expected) in [(1.0, 1.0), (2.0, 2.0), (3.0, 2.0)] {
            let sizes = SurfaceSizes::new(800, 600, dpr);
            assert_eq!(sizes.applied_ratio(), expected);
        }
    }

    #[test]
    fn surface_extent_shrinks_beyond_the_cap() {
        let native = SurfaceSizes::new(1920, 1080, 2.0);
        assert_eq!(native.surface_extent(), (1920, 1080));

        let dense = SurfaceSizes::new(3000, 1500, 3.0);
        assert_eq!(dense.surface_extent(), (2000, 1000));
    }

    #[test]
    fn apply_is_idempotent() {
        let mut sizes = SurfaceSizes::new(800, 600, 1.0);
        assert!(sizes.apply(1024, 768, 2.0));
        let snapshot = sizes;
        assert!(!sizes.apply(1024, 768, 2.0));
        assert_eq!(sizes, snapshot);
        assert_eq!(sizes.surface_extent(), snapshot.surface_extent());
        assert_eq!(sizes.aspect(), snapshot.aspect());
    }

    #[test]
    fn zero_dimensions_are_clamped() {
        let sizes = SurfaceSizes::new(0, 0, 1.0);
        assert_eq!(sizes.surface_extent(), (1, 1));
    }
}
