//! The viewport controller.
//!
//! [`Viewport`] owns the scene, the camera, and every component that acts on
//! them: the orbit controller, the yaw tracker and slice mapper, the surface
//! picker, the input processor, and the asset loader. The host drives it with
//! three calls: [`Viewport::mount`] once, [`Viewport::handle_input`] per
//! platform event and [`Viewport::tick`] per display refresh, then
//! [`Viewport::dispose`] on teardown.
//!
//! Everything runs on the caller's thread. Asset workers only hand finished
//! data back through a channel that `tick` drains, so a pick or an orbit end
//! always runs to completion before the scene changes under it.

pub mod lifecycle;
pub mod mount;
pub mod render_loop;
mod surface;

use std::sync::Arc;
use std::time::Duration;

use glam::{Vec2, Vec3};

pub use lifecycle::{Lifecycle, Listener, ListenerSet};
pub use mount::{Frame, MountPoint, RenderOutput};
pub use render_loop::RenderLoop;

use self::surface::SurfaceAssets;
use crate::assets::{AssetLoader, AssetSource};
use crate::calibration::CalibrationRecord;
use crate::camera::controller::OrbitController;
use crate::camera::core::CameraState;
use crate::camera::pose::initial_pose;
use crate::error::ViewportError;
use crate::input::{InputEvent, InputProcessor, Interaction};
use crate::navigation::{CommandChannel, OrbitTracker, SliceIndexMapper};
use crate::options::{Options, OrbitPivot};
use crate::picking::{Marker, SurfacePicker, ViewportGeometry};
use crate::scene::{NodeId, Scene};

/// Calibrated surface viewport with orbit-synchronized navigation.
///
/// `M` is the host container the render output attaches to and `C` the
/// channel navigation requests are sent through.
pub struct Viewport<M: MountPoint, C: CommandChannel> {
    options: Options,
    scene: Scene,
    camera: CameraState,
    controller: OrbitController,
    tracker: OrbitTracker,
    slices: SliceIndexMapper,
    picker: SurfacePicker,
    input: InputProcessor,
    assets: AssetLoader,
    surface: SurfaceAssets,

    lifecycle: Lifecycle,
    listeners: ListenerSet,
    render_loop: RenderLoop,

    mount: M,
    output: Option<M::Output>,
    channel: C,
}

// =============================================================================
// Construction
// =============================================================================

impl<M: MountPoint, C: CommandChannel> Viewport<M, C> {
    /// Build a viewport posed from `calibration`.
    ///
    /// Nothing is attached, loaded, or registered until [`Self::mount`].
    #[must_use]
    pub fn new(
        options: Options,
        calibration: &CalibrationRecord,
        mount: M,
        channel: C,
        source: Arc<dyn AssetSource>,
    ) -> Self {
        let pose = initial_pose(calibration, &options.camera, &options.viewport);
        let camera = pose.camera;
        let pivot = match options.orbit.pivot {
            OrbitPivot::LookTarget => pose.look_target,
            OrbitPivot::WorldOrigin => Vec3::ZERO,
        };
        let geometry = ViewportGeometry::from(&options.viewport);

        Self {
            scene: Scene::new(
                options.viewport.background,
                Vec3::from_array(options.lighting.position),
            ),
            controller: OrbitController::new(
                options.orbit.clone(),
                pivot,
                options.viewport.height,
            ),
            tracker: OrbitTracker::capture(camera.orientation),
            slices: SliceIndexMapper::from(&options.navigation),
            picker: SurfacePicker::new(geometry, options.marker.clone()),
            input: InputProcessor::new(geometry, options.orbit.drag_threshold),
            assets: AssetLoader::new(source),
            surface: SurfaceAssets::new(
                Vec3::from_array(options.assets.mesh_offset),
                options.assets.shading,
            ),
            camera,
            options,
            lifecycle: Lifecycle::Uninitialized,
            listeners: ListenerSet::default(),
            render_loop: RenderLoop::new(),
            mount,
            output: None,
            channel,
        }
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

impl<M: MountPoint, C: CommandChannel> Viewport<M, C> {
    /// Attach the render output, register listeners, start the surface
    /// loads, and start the render loop.
    ///
    /// Mounting an already mounted or disposed viewport does nothing.
    ///
    /// # Errors
    ///
    /// Returns the mount point's error if the output cannot be attached; the
    /// viewport then stays unmounted.
    pub fn mount(&mut self) -> Result<(), ViewportError> {
        if self.lifecycle != Lifecycle::Uninitialized {
            log::debug!("mount ignored in state {:?}", self.lifecycle);
            return Ok(());
        }
        let output = self
            .mount
            .attach(self.options.viewport.width, self.options.viewport.height)?;
        self.output = Some(output);
        self.listeners.register_all();
        self.start_asset_loads();
        let _ = self.render_loop.start();
        let _ = self.lifecycle.mount();
        log::info!(
            "viewport mounted ({}x{} at {:?})",
            self.options.viewport.width,
            self.options.viewport.height,
            self.options.viewport.origin
        );
        Ok(())
    }

    fn start_asset_loads(&mut self) {
        let texture_url = self.options.assets.texture_url.clone();
        let mesh_url = self.options.assets.mesh_url.clone();
        if let Err(e) = self.assets.load_texture(&texture_url) {
            log::error!("could not start texture load: {e}");
        }
        if let Err(e) = self.assets.load_mesh(&mesh_url) {
            log::error!("could not start mesh load: {e}");
        }
    }

    /// Tear down: cancel the render loop, deregister listeners, and detach
    /// the output from the mount point.
    ///
    /// Safe to call more than once and before [`Self::mount`]. Returns
    /// whether this call did the teardown.
    pub fn dispose(&mut self) -> bool {
        if !self.lifecycle.dispose() {
            return false;
        }
        let was_running = self.render_loop.cancel();
        let listeners = self.listeners.deregister_all();
        let detached = self
            .output
            .take()
            .is_some_and(|output| self.mount.detach(output));
        log::info!(
            "viewport disposed after {} frames (render loop running: \
             {was_running}, listeners removed: {listeners}, output detached: \
             {detached})",
            self.render_loop.frames()
        );
        true
    }
}

// =============================================================================
// Input
// =============================================================================

impl<M: MountPoint, C: CommandChannel> Viewport<M, C> {
    /// Feed one platform event. Pointer positions are absolute in the host's
    /// coordinate space. Ignored unless mounted.
    pub fn handle_input(&mut self, event: InputEvent) {
        if self.lifecycle != Lifecycle::Mounted {
            return;
        }
        for interaction in self.input.handle_event(event) {
            self.apply(interaction);
        }
    }

    fn apply(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::OrbitStart => log::trace!("orbit start"),
            Interaction::Rotate { delta } => self.controller.rotate(delta),
            Interaction::Pan { delta } => self.controller.pan(delta, &self.camera),
            Interaction::Zoom { steps } => self.controller.zoom(steps),
            Interaction::OrbitEnd => {
                if self.listeners.is_registered(Listener::OrbitEnd) {
                    let _ = self.navigate_to_current_yaw();
                }
            }
            Interaction::Click { position } => {
                if self.listeners.is_registered(Listener::Click) {
                    let _ = self.pick(position);
                }
            }
        }
    }

    /// Measure the camera's yaw against the initial pose and ask the host
    /// to show the matching slice. Returns the requested index, or `None`
    /// (and sends nothing) unless mounted.
    pub fn navigate_to_current_yaw(&mut self) -> Option<u32> {
        if self.lifecycle != Lifecycle::Mounted {
            return None;
        }
        let yaw = self.tracker.measure_yaw(self.camera.orientation);
        Some(self.slices.navigate(yaw, &mut self.channel))
    }

    /// Pick the surface under an absolute pointer position and move the
    /// marker there. Returns the marker position, or `None` on a miss or
    /// when not mounted.
    pub fn pick(&mut self, screen: Vec2) -> Option<Vec3> {
        if self.lifecycle != Lifecycle::Mounted {
            return None;
        }
        self.picker.pick(screen, &self.camera, &mut self.scene)
    }
}

// =============================================================================
// Frame
// =============================================================================

impl<M: MountPoint, C: CommandChannel> Viewport<M, C> {
    /// Run one render-loop iteration: integrate finished asset loads, step
    /// the damped orbit, release dropped GPU resources, and draw.
    ///
    /// Returns whether a frame was drawn. Does nothing once disposed.
    pub fn tick(&mut self) -> bool {
        if self.render_loop.begin_frame().is_none() {
            return false;
        }
        for event in self.assets.poll() {
            self.surface.apply(&mut self.scene, event);
        }
        let _ = self.controller.update(&mut self.camera);

        let Some(output) = self.output.as_mut() else {
            return false;
        };
        let released = self.scene.take_released();
        if !released.is_empty() {
            output.release(&released);
        }
        let frame = Frame {
            scene: &self.scene,
            camera: &self.camera,
            ambient: self.options.lighting.ambient,
        };
        match output.render(&frame) {
            Ok(()) => true,
            Err(e) => {
                log::error!("render error: {e}");
                false
            }
        }
    }

    /// Block until every pending asset load has finished (or `timeout`
    /// passes) and integrate the results.
    pub fn wait_for_assets(&mut self, timeout: Duration) {
        for event in self.assets.wait(timeout) {
            self.surface.apply(&mut self.scene, event);
        }
    }

    /// Track a new viewport size in pixels.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.options.viewport.width = width;
        self.options.viewport.height = height;
        self.camera.aspect = self.options.viewport.aspect();
        self.controller.set_viewport_height(height);

        let geometry = ViewportGeometry::from(&self.options.viewport);
        self.picker.set_viewport(geometry);
        self.input.set_viewport(geometry);
        if let Some(output) = self.output.as_mut() {
            output.resize(width, height);
        }
    }
}

// =============================================================================
// Accessors
// =============================================================================

impl<M: MountPoint, C: CommandChannel> Viewport<M, C> {
    /// Active options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Current camera.
    #[must_use]
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// The scene graph.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene graph, for hosts adding their own content.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The current marker, if a pick has succeeded.
    #[must_use]
    pub fn marker(&self) -> Option<&Marker> {
        self.picker.marker()
    }

    /// The surface mesh node, once loaded.
    #[must_use]
    pub fn surface_node(&self) -> Option<NodeId> {
        self.surface.node()
    }

    /// Lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Registered listeners.
    #[must_use]
    pub fn listeners(&self) -> &ListenerSet {
        &self.listeners
    }

    /// The render loop (running state and frame count).
    #[must_use]
    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    /// Number of asset loads still in flight.
    #[must_use]
    pub fn pending_assets(&self) -> usize {
        self.assets.pending()
    }

    /// The mount point.
    #[must_use]
    pub fn mount_point(&self) -> &M {
        &self.mount
    }

    /// The command channel.
    #[must_use]
    pub fn channel(&self) -> &C {
        &self.channel
    }
}
