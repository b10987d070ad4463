//! Where asset bytes come from.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::ViewportError;

/// Fetches raw bytes for an asset URL. Called from loader worker threads.
pub trait AssetSource: Send + Sync + 'static {
    /// Fetch the whole resource at `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ViewportError>;
}

/// Reads `file://` URLs and plain filesystem paths.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
    max_bytes: u64,
}

impl FileSource {
    /// Resolve relative paths against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl AssetSource for FileSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ViewportError> {
        let path = self.resolve(url);
        let fetch_error = |reason: String| ViewportError::AssetFetch {
            url: url.to_owned(),
            reason,
        };
        let file = std::fs::File::open(&path)
            .map_err(|e| fetch_error(format!("{}: {e}", path.display())))?;
        let mut bytes = Vec::new();
        let _ = file
            .take(self.max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|e| fetch_error(e.to_string()))?;
        if bytes.len() as u64 > self.max_bytes {
            return Err(fetch_error(format!(
                "larger than the {} byte limit",
                self.max_bytes
            )));
        }
        Ok(bytes)
    }
}

/// Fetches `http://` and `https://` URLs with a blocking client.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    max_bytes: u64,
}

#[cfg(feature = "fetch")]
impl HttpSource {
    /// Client that refuses bodies larger than `max_bytes`.
    #[must_use]
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

#[cfg(feature = "fetch")]
impl AssetSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ViewportError> {
        let fetch_error = |e: ureq::Error| ViewportError::AssetFetch {
            url: url.to_owned(),
            reason: e.to_string(),
        };
        let response = ureq::get(url).call().map_err(fetch_error)?;
        let bytes = response
            .into_body()
            .with_config()
            .limit(self.max_bytes)
            .read_to_vec()
            .map_err(fetch_error)?;
        log::debug!("fetched {} bytes from {url}", bytes.len());
        Ok(bytes)
    }
}

/// Dispatches on the URL scheme: HTTP(S) when the `fetch` feature is on,
/// everything else from the filesystem.
#[derive(Debug, Clone)]
pub struct DefaultSource {
    file: FileSource,
    #[cfg(feature = "fetch")]
    http: HttpSource,
}

impl DefaultSource {
    /// Source with a per-asset size limit, resolving relative paths against
    /// the working directory.
    #[must_use]
    pub fn new(max_bytes: u64) -> Self {
        Self {
            file: FileSource::new(".", max_bytes),
            #[cfg(feature = "fetch")]
            http: HttpSource::new(max_bytes),
        }
    }
}

fn is_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl DefaultSource {
    #[cfg(feature = "fetch")]
    fn fetch_http(&self, url: &str) -> Result<Vec<u8>, ViewportError> {
        self.http.fetch(url)
    }

    #[cfg(not(feature = "fetch"))]
    fn fetch_http(&self, url: &str) -> Result<Vec<u8>, ViewportError> {
        Err(ViewportError::AssetFetch {
            url: url.to_owned(),
            reason: "built without HTTP support (feature `fetch`)".to_owned(),
        })
    }
}

impl AssetSource for DefaultSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ViewportError> {
        if is_http(url) {
            self.fetch_http(url)
        } else {
            self.file.fetch(url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "orbitview-source-{name}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn file_source_reads_relative_and_file_urls() {
        let dir = temp_dir("read");
        std::fs::write(dir.join("mesh.ply"), b"abc").unwrap();
        let source = FileSource::new(&dir, 1024);
        assert_eq!(source.fetch("mesh.ply").unwrap(), b"abc");

        let absolute = format!("file://{}", dir.join("mesh.ply").display());
        assert_eq!(source.fetch(&absolute).unwrap(), b"abc");
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn file_source_enforces_size_limit() {
        let dir = temp_dir("limit");
        std::fs::write(dir.join("big.bin"), vec![0_u8; 64]).unwrap();
        let source = FileSource::new(&dir, 16);
        let err = source.fetch("big.bin").unwrap_err();
        assert!(matches!(err, ViewportError::AssetFetch { .. }));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_file_is_fetch_error() {
        let source = FileSource::new(temp_dir("missing"), 16);
        assert!(matches!(
            source.fetch("nope.png"),
            Err(ViewportError::AssetFetch { .. })
        ));
    }
}
