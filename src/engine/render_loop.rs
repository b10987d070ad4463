//! The cancellable per-frame task driving redraws.

use web_time::Instant;

/// Cancellable per-frame task.
///
/// The loop itself does no scheduling: the host calls
/// [`Viewport::tick`](super::Viewport::tick) once per display refresh and the
/// loop decides whether that tick runs. Cancelling is permanent for the
/// viewport that owns it.
pub struct RenderLoop {
    running: bool,
    frames: u64,
    last_frame: Option<Instant>,
}

impl RenderLoop {
    /// A stopped loop.
    #[must_use]
    pub fn new() -> Self {
        Self {
            running: false,
            frames: 0,
            last_frame: None,
        }
    }

    /// Start ticking. Returns whether the loop was stopped before.
    pub fn start(&mut self) -> bool {
        let started = !self.running;
        self.running = true;
        started
    }

    /// Stop ticking. Returns whether the loop was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        self.last_frame = None;
        was_running
    }

    /// Whether ticks currently run.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin a frame. Returns seconds since the previous frame (zero for
    /// the first), or `None` when the loop is not running.
    pub fn begin_frame(&mut self) -> Option<f32> {
        if !self.running {
            return None;
        }
        let now = Instant::now();
        let dt = self
            .last_frame
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_frame = Some(now);
        self.frames += 1;
        Some(dt)
    }

    /// Frames begun since construction.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_loop_skips_frames() {
        let mut render_loop = RenderLoop::new();
        assert!(render_loop.begin_frame().is_none());
        assert!(render_loop.start());
        assert!(!render_loop.start());
        assert_eq!(render_loop.begin_frame(), Some(0.0));
        assert!(render_loop.begin_frame().is_some());
        assert_eq!(render_loop.frames(), 2);

        assert!(render_loop.cancel());
        assert!(!render_loop.cancel());
        assert!(render_loop.begin_frame().is_none());
        assert_eq!(render_loop.frames(), 2);
    }
}
