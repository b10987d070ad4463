//! Background asset loading.
//!
//! Each request runs fetch + decode on its own worker thread and reports
//! back through a channel. The viewport drains completions with
//! [`AssetLoader::poll`] once per frame, so loads never block the render
//! cadence and a failed load only costs its own visual.

pub mod ply;
pub mod source;
pub mod texture;

use std::sync::{mpsc, Arc};
use std::time::Duration;

pub use source::{AssetSource, DefaultSource, FileSource};
#[cfg(feature = "fetch")]
pub use source::HttpSource;

use crate::error::ViewportError;
use crate::scene::material::Texture;
use crate::scene::mesh::Geometry;

/// A finished load, successful or not.
#[derive(Debug)]
pub enum AssetEvent {
    /// Texture load completed.
    Texture {
        /// Requested URL.
        url: String,
        /// Decoded image or the failure.
        result: Result<Texture, ViewportError>,
    },
    /// Mesh load completed; normals are already computed.
    Mesh {
        /// Requested URL.
        url: String,
        /// Decoded geometry or the failure.
        result: Result<Geometry, ViewportError>,
    },
}

/// Spawns load workers and collects their results.
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    sender: mpsc::Sender<AssetEvent>,
    receiver: mpsc::Receiver<AssetEvent>,
    pending: usize,
}

impl AssetLoader {
    /// Loader fetching through `source`.
    #[must_use]
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            source,
            sender,
            receiver,
            pending: 0,
        }
    }

    /// Number of requests that have not reported back yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Start loading a PNG/JPEG texture.
    pub fn load_texture(&mut self, url: &str) -> Result<(), ViewportError> {
        self.spawn("texture", url, |source, url| {
            let result = source.fetch(&url).and_then(|bytes| {
                texture::decode_texture(&bytes).map_err(|reason| {
                    ViewportError::AssetDecode {
                        url: url.clone(),
                        reason,
                    }
                })
            });
            AssetEvent::Texture { url, result }
        })
    }

    /// Start loading a PLY mesh. Vertex normals are computed on the worker.
    pub fn load_mesh(&mut self, url: &str) -> Result<(), ViewportError> {
        self.spawn("mesh", url, |source, url| {
            let result = source.fetch(&url).and_then(|bytes| {
                let mut geometry = ply::decode_ply(&bytes).map_err(|reason| {
                    ViewportError::AssetDecode {
                        url: url.clone(),
                        reason,
                    }
                })?;
                geometry.compute_vertex_normals();
                Ok(geometry)
            });
            AssetEvent::Mesh { url, result }
        })
    }

    fn spawn(
        &mut self,
        kind: &str,
        url: &str,
        job: impl FnOnce(&dyn AssetSource, String) -> AssetEvent + Send + 'static,
    ) -> Result<(), ViewportError> {
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        let owned_url = url.to_owned();
        let _handle = std::thread::Builder::new()
            .name(format!("asset-{kind}"))
            .spawn(move || {
                // The receiver is gone once the viewport is disposed.
                let _ = sender.send(job(source.as_ref(), owned_url));
            })
            .map_err(ViewportError::ThreadSpawn)?;
        self.pending += 1;
        log::debug!("loading {kind} from {url}");
        Ok(())
    }

    /// Drain every completed load without blocking.
    pub fn poll(&mut self) -> Vec<AssetEvent> {
        let events: Vec<AssetEvent> = self.receiver.try_iter().collect();
        self.pending = self.pending.saturating_sub(events.len());
        events
    }

    /// Block until every pending load has reported or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Vec<AssetEvent> {
        let deadline = web_time::Instant::now() + timeout;
        let mut events = Vec::new();
        while self.pending > 0 {
            let remaining = deadline.saturating_duration_since(web_time::Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(event) => {
                    self.pending -= 1;
                    events.push(event);
                }
                Err(_) => break,
            }
        }
        events
    }
}

impl AssetEvent {
    /// The URL this event answers.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Texture { url, .. } | Self::Mesh { url, .. } => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemorySource, TRIANGLE_PLY};

    fn loader() -> AssetLoader {
        AssetLoader::new(Arc::new(
            MemorySource::default()
                .with("mesh.ply", TRIANGLE_PLY.as_bytes().to_vec())
                .with("texture.png", crate::testing::png_bytes(2, 2))
                .with("broken.png", b"not an image".to_vec()),
        ))
    }

    #[test]
    fn loads_complete_off_thread() {
        let mut loader = loader();
        loader.load_mesh("mesh.ply").unwrap();
        loader.load_texture("texture.png").unwrap();
        assert_eq!(loader.pending(), 2);

        let events = loader.wait(Duration::from_secs(10));
        assert_eq!(events.len(), 2);
        assert_eq!(loader.pending(), 0);
        for event in events {
            match event {
                AssetEvent::Mesh { result, .. } => {
                    let geometry = result.unwrap();
                    assert_eq!(geometry.triangle_count(), 1);
                    assert!(geometry.normals().iter().all(|n| n.z > 0.99));
                }
                AssetEvent::Texture { result, .. } => {
                    assert_eq!(result.unwrap().width(), 2);
                }
            }
        }
    }

    #[test]
    fn failures_are_reported_independently() {
        let mut loader = loader();
        loader.load_texture("broken.png").unwrap();
        loader.load_mesh("missing.ply").unwrap();
        let mut events = loader.wait(Duration::from_secs(10));
        events.sort_by(|a, b| a.url().cmp(b.url()));

        assert!(matches!(
            &events[0],
            AssetEvent::Texture { result: Err(ViewportError::AssetDecode { .. }), .. }
        ));
        assert!(matches!(
            &events[1],
            AssetEvent::Mesh { result: Err(ViewportError::AssetFetch { .. }), .. }
        ));
    }

    #[test]
    fn poll_without_requests_is_empty() {
        let mut loader = loader();
        assert!(loader.poll().is_empty());
        assert_eq!(loader.pending(), 0);
    }
}
