//! Content-addressed render cache.
//!
//! A source file is rendered again only when its modification time or its
//! content digest changed since the last successful render. Checking both
//! guards against coarse mtime granularity and clock skew.
//!
//! The cache is shared across threads. Each path has its own lock, so at
//! most one render per path runs at a time and callers waiting on it reuse
//! its result, while unrelated paths render in parallel.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::backend::{Backend, RenderError};
use crate::document::RenderedDocument;

/// Digest read buffer size.
const CHUNK_SIZE: usize = 64 * 1024;

/// What identifies a version of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    /// Last modification time
    pub modified: SystemTime,

    /// Hex SHA-256 of the file contents
    pub digest: String,
}

impl FileStamp {
    /// Stat and hash a file, streaming it in fixed-size chunks.
    pub fn read(path: &Path) -> io::Result<Self> {
        let modified = fs::metadata(path)?.modified()?;

        let mut file = File::open(path)?;
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }

        Ok(Self {
            modified,
            digest: hex::encode(hasher.finalize()),
        })
    }
}

/// A successful render and the file version it came from.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub stamp: FileStamp,
    pub document: Arc<RenderedDocument>,
}

type Slot = Arc<Mutex<Option<CacheEntry>>>;

/// Render cache for one build.
pub struct RenderCache<B> {
    backend: B,
    fail_on_error: bool,
    slots: Mutex<HashMap<PathBuf, Slot>>,
}

impl<B: Backend> RenderCache<B> {
    /// Create an empty cache in front of `backend`.
    ///
    /// With `fail_on_error` unset, renderer failures degrade to a
    /// placeholder page in [`RenderCache::render_page`].
    pub fn new(backend: B, fail_on_error: bool) -> Self {
        Self {
            backend,
            fail_on_error,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// The backend renders are delegated to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of paths with a cached render.
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = self.slots.lock().values().cloned().collect();
        slots.iter().filter(|slot| slot.lock().is_some()).count()
    }

    /// Whether nothing has been rendered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached render for `path`, rendering it if the file changed.
    ///
    /// Failed renders are not stored, so the next call tries again.
    pub fn get_or_render(&self, path: &Path) -> Result<Arc<RenderedDocument>, RenderError> {
        let slot = self.slot(path);
        let mut entry = slot.lock();

        let stamp = FileStamp::read(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(cached) = entry.as_ref() {
            if cached.stamp == stamp {
                tracing::debug!("Cache hit: {}", path.display());
                return Ok(Arc::clone(&cached.document));
            }
        }

        tracing::debug!("Rendering {} with {}", path.display(), self.backend.name());
        let html = self.backend.convert(path)?;
        let document = Arc::new(RenderedDocument::from_html(&html));

        *entry = Some(CacheEntry {
            stamp,
            document: Arc::clone(&document),
        });

        Ok(document)
    }

    /// Like [`RenderCache::get_or_render`], applying the failure policy.
    ///
    /// Renderer failures are returned as errors when `fail_on_error` is set,
    /// and become an uncached placeholder page otherwise. Errors reading the
    /// source are always returned.
    pub fn render_page(&self, path: &Path) -> Result<Arc<RenderedDocument>, RenderError> {
        match self.get_or_render(path) {
            Ok(document) => Ok(document),
            Err(e) if e.is_renderer_failure() && !self.fail_on_error => {
                tracing::warn!("{e}");
                Ok(Arc::new(RenderedDocument::placeholder(&e.to_string())))
            }
            Err(e) => Err(e),
        }
    }

    fn slot(&self, path: &Path) -> Slot {
        let mut slots = self.slots.lock();
        Arc::clone(slots.entry(path.to_path_buf()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    /// Renders the file contents into a paragraph and counts invocations.
    #[derive(Default)]
    struct CountingBackend {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Backend for CountingBackend {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn convert(&self, source: &Path) -> Result<String, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RenderError::NotFound {
                    command: "asciidoctor".to_string(),
                });
            }
            let text = fs::read_to_string(source).map_err(|e| RenderError::Io {
                path: source.to_path_buf(),
                source: e,
            })?;
            Ok(format!("<h2>{}</h2>", text.trim()))
        }
    }

    impl CountingBackend {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn reuses_render_for_unchanged_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.adoc");
        fs::write(&path, "Hello").unwrap();

        let cache = RenderCache::new(CountingBackend::default(), true);
        let first = cache.get_or_render(&path).unwrap();
        let second = cache.get_or_render(&path).unwrap();

        assert_eq!(cache.backend().calls(), 1);
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn rerenders_when_only_mtime_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.adoc");
        fs::write(&path, "Hello").unwrap();

        let cache = RenderCache::new(CountingBackend::default(), true);
        cache.get_or_render(&path).unwrap();

        let later = fs::metadata(&path).unwrap().modified().unwrap() + Duration::from_secs(10);
        set_mtime(&path, later);
        cache.get_or_render(&path).unwrap();

        assert_eq!(cache.backend().calls(), 2);
    }

    #[test]
    fn rerenders_when_only_content_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.adoc");
        fs::write(&path, "Hello").unwrap();
        let original = fs::metadata(&path).unwrap().modified().unwrap();

        let cache = RenderCache::new(CountingBackend::default(), true);
        let first = cache.get_or_render(&path).unwrap();

        fs::write(&path, "World").unwrap();
        set_mtime(&path, original);
        let second = cache.get_or_render(&path).unwrap();

        assert_eq!(cache.backend().calls(), 2);
        assert_eq!(first.toc[0].title, "Hello");
        assert_eq!(second.toc[0].title, "World");
    }

    #[test]
    fn failed_renders_are_not_cached() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.adoc");
        fs::write(&path, "Hello").unwrap();

        let backend = CountingBackend {
            fail: true,
            ..Default::default()
        };
        let cache = RenderCache::new(backend, false);

        let first = cache.render_page(&path).unwrap();
        let second = cache.render_page(&path).unwrap();

        assert_eq!(cache.backend().calls(), 2);
        assert!(cache.is_empty());
        assert!(first.html.starts_with("<pre>Asciidoctor not found"));
        assert!(second.meta.is_empty());
    }

    #[test]
    fn fail_fast_propagates_renderer_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.adoc");
        fs::write(&path, "Hello").unwrap();

        let backend = CountingBackend {
            fail: true,
            ..Default::default()
        };
        let cache = RenderCache::new(backend, true);

        let err = cache.render_page(&path).unwrap_err();
        assert!(matches!(err, RenderError::NotFound { .. }));
    }

    #[test]
    fn missing_source_is_always_an_error() {
        let dir = tempdir().unwrap();
        let cache = RenderCache::new(CountingBackend::default(), false);

        let err = cache.render_page(&dir.path().join("gone.adoc")).unwrap_err();

        assert!(matches!(err, RenderError::Io { .. }));
        assert_eq!(cache.backend().calls(), 0);
    }

    #[test]
    fn concurrent_callers_share_one_render() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.adoc");
        fs::write(&path, "Shared").unwrap();

        let cache = RenderCache::new(CountingBackend::default(), true);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| cache.get_or_render(&path).unwrap());
            }
        });

        assert_eq!(cache.backend().calls(), 1);
    }

    #[test]
    fn digest_matches_known_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("abc.txt");
        fs::write(&path, "abc").unwrap();

        let stamp = FileStamp::read(&path).unwrap();
        assert_eq!(
            stamp.digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
