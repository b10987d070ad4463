//! Standalone viewport window backed by winit.
//!
//! The window is the mount point: the viewport attaches a
//! [`SurfaceRenderer`] to it on mount and detaches it when the window
//! closes. Window-relative pointer positions are shifted by the configured
//! viewport origin so the viewport sees the same absolute coordinates a host
//! page would deliver.
//!
//! ```no_run
//! # use orbitview::navigation::JsonLinesChannel;
//! # use orbitview::Viewer;
//! Viewer::builder(JsonLinesChannel::new(std::io::stdout()))
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    assets::{AssetSource, DefaultSource},
    calibration::CalibrationRecord,
    engine::{MountPoint, Viewport},
    error::ViewportError,
    gpu::renderer::SurfaceRenderer,
    input::{InputEvent, MouseButton},
    navigation::CommandChannel,
    options::Options,
};

// ── Mount point ──────────────────────────────────────────────────────────

/// A winit window the render output attaches to.
pub struct WindowMount {
    window: Arc<Window>,
    attached: bool,
}

impl WindowMount {
    /// Mount point for `window`.
    #[must_use]
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            attached: false,
        }
    }
}

impl MountPoint for WindowMount {
    type Output = SurfaceRenderer;

    fn attach(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<SurfaceRenderer, ViewportError> {
        let inner = self.window.inner_size();
        if (inner.width, inner.height) != (width, height) {
            log::debug!(
                "window is {}x{} physical for a {width}x{height} viewport",
                inner.width,
                inner.height
            );
        }
        let renderer = pollster::block_on(SurfaceRenderer::new(
            Arc::clone(&self.window),
            surface_size(inner),
        ))?;
        self.attached = true;
        Ok(renderer)
    }

    fn detach(&mut self, output: SurfaceRenderer) -> bool {
        drop(output);
        if !self.attached {
            return false;
        }
        self.attached = false;
        self.window.set_visible(false);
        true
    }
}

/// The wgpu surface always covers the full window.
fn surface_size(inner: PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder<C> {
    channel: C,
    options: Option<Options>,
    calibration: Option<CalibrationRecord>,
    source: Option<Arc<dyn AssetSource>>,
    title: String,
}

impl<C: CommandChannel + 'static> ViewerBuilder<C> {
    fn new(channel: C) -> Self {
        Self {
            channel,
            options: None,
            calibration: None,
            source: None,
            title: "orbitview".into(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Use `calibration` instead of the built-in reference record.
    #[must_use]
    pub fn with_calibration(mut self, calibration: CalibrationRecord) -> Self {
        self.calibration = Some(calibration);
        self
    }

    /// Fetch assets through `source` instead of the scheme-dispatching
    /// default.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn AssetSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer<C> {
        let options = self.options.unwrap_or_default();
        let source = self.source.unwrap_or_else(|| {
            Arc::new(DefaultSource::new(options.assets.max_bytes))
        });
        Viewer {
            setup: Setup {
                options,
                calibration: self
                    .calibration
                    .unwrap_or_else(CalibrationRecord::reference),
                channel: self.channel,
                source,
            },
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// Everything needed to build the viewport once the window exists.
struct Setup<C> {
    options: Options,
    calibration: CalibrationRecord,
    channel: C,
    source: Arc<dyn AssetSource>,
}

/// A standalone window showing the calibrated surface viewport.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer<C> {
    setup: Setup<C>,
    title: String,
}

impl<C: CommandChannel + 'static> Viewer<C> {
    /// Start a builder that sends navigation requests through `channel`.
    #[must_use]
    pub fn builder(channel: C) -> ViewerBuilder<C> {
        ViewerBuilder::new(channel)
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::Viewer`] if the event loop cannot be created
    /// or exits with an error.
    pub fn run(self) -> Result<(), ViewportError> {
        let event_loop = EventLoop::new()
            .map_err(|e| ViewportError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            viewport: None,
            setup: Some(self.setup),
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| ViewportError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp<C: CommandChannel> {
    window: Option<Arc<Window>>,
    viewport: Option<Viewport<WindowMount, C>>,
    setup: Option<Setup<C>>,
    title: String,
}

impl<C: CommandChannel> ViewerApp<C> {
    /// Window position to the host's absolute pointer space.
    fn to_host(&self, x: f64, y: f64) -> (f32, f32) {
        let [ox, oy] = self
            .viewport
            .as_ref()
            .map_or([0.0; 2], |v| v.options().viewport.origin);
        (ox + x as f32, oy + y as f32)
    }

    fn dispatch(&mut self, event: InputEvent) {
        if let Some(viewport) = &mut self.viewport {
            viewport.handle_input(event);
        }
    }
}

impl<C: CommandChannel> ApplicationHandler for ViewerApp<C> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(setup) = self.setup.take() else {
            return;
        };

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(
                setup.options.viewport.width,
                setup.options.viewport.height,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let mut viewport = Viewport::new(
            setup.options,
            &setup.calibration,
            WindowMount::new(Arc::clone(&window)),
            setup.channel,
            setup.source,
        );
        if let Err(e) = viewport.mount() {
            log::error!("Failed to mount viewport: {e}");
            event_loop.exit();
            return;
        }
        let (width, height) = surface_size(window.inner_size());
        viewport.resize(width, height);

        window.request_redraw();
        self.window = Some(window);
        self.viewport = Some(viewport);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            if let Some(viewport) = &mut self.viewport {
                let _ = viewport.dispose();
            }
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                let (width, height) = surface_size(size);
                if let Some(viewport) = &mut self.viewport {
                    viewport.resize(width, height);
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(viewport) = &mut self.viewport {
                    let _ = viewport.tick();
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                match MouseButton::try_from(button) {
                    Ok(button) => self.dispatch(InputEvent::MouseButton {
                        button,
                        pressed: state == ElementState::Pressed,
                    }),
                    Err(other) => log::trace!("ignoring {other:?} button"),
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = self.to_host(position.x, position.y);
                self.dispatch(InputEvent::CursorMoved { x, y });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.dispatch(InputEvent::Scroll { delta });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.dispatch(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            _ => (),
        }
    }
}
