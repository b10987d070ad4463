use std::fmt;

/// Errors that can occur during GPU context initialization.
#[derive(Debug)]
pub enum RenderContextError {
    /// Failed to create a wgpu surface from the window handle.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    AdapterRequest(wgpu::RequestAdapterError),
    /// GPU device request failed (limits or features not met).
    DeviceRequest(wgpu::RequestDeviceError),
    /// The adapter reports no usable surface format.
    UnsupportedSurface,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceCreation(e) => {
                write!(f, "surface creation failed: {e}")
            }
            Self::AdapterRequest(e) => {
                write!(f, "no compatible GPU adapter found: {e}")
            }
            Self::DeviceRequest(e) => write!(f, "device request failed: {e}"),
            Self::UnsupportedSurface => {
                write!(f, "surface configuration not supported by adapter")
            }
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SurfaceCreation(e) => Some(e),
            Self::AdapterRequest(e) => Some(e),
            Self::DeviceRequest(e) => Some(e),
            Self::UnsupportedSurface => None,
        }
    }
}

/// Owns the core wgpu resources: device, queue, and the presentation
/// surface with its configuration.
pub struct RenderContext {
    /// The wgpu logical device.
    pub device: wgpu::Device,
    /// The wgpu command queue.
    pub queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    /// Create a context presenting to `window` at `size` pixels.
    ///
    /// Prefers an sRGB surface format so shader output in linear space is
    /// encoded on write.
    ///
    /// # Errors
    ///
    /// Returns `RenderContextError` if surface creation, adapter request,
    /// device request, or surface configuration fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(RenderContextError::SurfaceCreation)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::default(),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::AdapterRequest)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Viewport Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::DeviceRequest)?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| caps.formats.first().copied())
            .ok_or(RenderContextError::UnsupportedSurface)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        log::info!(
            "GPU context ready: {} ({:?}), surface {format:?} {}x{}",
            adapter.get_info().name,
            adapter.get_info().backend,
            config.width,
            config.height
        );

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }

    /// The surface texture format.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current surface size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface for a new size. Ignores zero-sized
    /// dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Acquire the next swapchain texture.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped
    /// (`Ok(None)`); a timeout also skips the frame.
    ///
    /// # Errors
    ///
    /// Returns the surface error when the GPU is out of memory or the
    /// failure is otherwise unrecoverable.
    pub fn acquire(
        &mut self,
    ) -> Result<Option<wgpu::SurfaceTexture>, wgpu::SurfaceError> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a new command encoder for recording GPU commands.
    #[must_use]
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Viewport Encoder"),
            })
    }

    /// Finish the encoder and submit its command buffer to the GPU queue.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}
