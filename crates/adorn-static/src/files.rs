//! Site files and their output locations.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// How a file takes part in the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A page rendered through the page pipeline
    Documentation,
    /// Anything else, copied verbatim
    Media,
}

/// A file under the docs directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteFile {
    /// Path relative to the docs directory, `/`-separated
    pub src_uri: String,

    /// Absolute source path
    pub abs_src_path: PathBuf,

    /// Path relative to the site directory, `/`-separated
    pub dest_uri: String,

    /// Absolute output path
    pub abs_dest_path: PathBuf,

    /// URL relative to the site root
    pub url: String,

    /// Page or media
    pub kind: FileKind,
}

impl SiteFile {
    /// A documentation page, addressed like every other page on the site.
    pub fn page(src_uri: &str, docs_dir: &Path, site_dir: &Path, use_directory_urls: bool) -> Self {
        let (dest_uri, url) = page_destination(src_uri, use_directory_urls);
        Self {
            src_uri: src_uri.to_string(),
            abs_src_path: docs_dir.join(src_uri),
            abs_dest_path: site_dir.join(&dest_uri),
            dest_uri,
            url,
            kind: FileKind::Documentation,
        }
    }

    /// A file copied to the same relative location.
    pub fn media(src_uri: &str, docs_dir: &Path, site_dir: &Path) -> Self {
        Self {
            src_uri: src_uri.to_string(),
            abs_src_path: docs_dir.join(src_uri),
            dest_uri: src_uri.to_string(),
            abs_dest_path: site_dir.join(src_uri),
            url: src_uri.to_string(),
            kind: FileKind::Media,
        }
    }

    /// Whether this file goes through the page pipeline.
    pub fn is_documentation_page(&self) -> bool {
        self.kind == FileKind::Documentation
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.src_uri)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }

    /// Parent directory of the source, `/`-separated, empty at the top level.
    pub fn parent_uri(&self) -> &str {
        self.src_uri
            .rsplit_once('/')
            .map(|(parent, _)| parent)
            .unwrap_or("")
    }
}

/// Output path and URL for a page.
///
/// `index` pages map onto their directory. Other pages get their own
/// directory with directory URLs, or a sibling `.html` file without.
pub fn page_destination(src_uri: &str, use_directory_urls: bool) -> (String, String) {
    let (parent, name) = src_uri.rsplit_once('/').unwrap_or(("", src_uri));
    let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name);

    if stem == "index" {
        if parent.is_empty() {
            ("index.html".to_string(), String::new())
        } else {
            (format!("{parent}/index.html"), format!("{parent}/"))
        }
    } else if use_directory_urls {
        if parent.is_empty() {
            (format!("{stem}/index.html"), format!("{stem}/"))
        } else {
            (
                format!("{parent}/{stem}/index.html"),
                format!("{parent}/{stem}/"),
            )
        }
    } else {
        let dest = if parent.is_empty() {
            format!("{stem}.html")
        } else {
            format!("{parent}/{stem}.html")
        };
        (dest.clone(), dest)
    }
}

/// Relative `/`-separated path of `path` under `base`.
pub fn relative_uri(path: &Path, base: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

/// Every regular file under `dir` with its `/`-separated relative path,
/// sorted by path. Hidden files and directories are skipped.
pub fn walk_files(dir: &Path) -> Vec<(String, PathBuf)> {
    let mut files: Vec<(String, PathBuf)> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let uri = relative_uri(e.path(), dir)?;
            Some((uri, e.into_path()))
        })
        .collect();
    files.sort();
    files
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

/// The collection of files the host builds.
#[derive(Debug, Clone, Default)]
pub struct Files {
    files: Vec<SiteFile>,
}

impl Files {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any existing entry with the same source path.
    pub fn append(&mut self, file: SiteFile) {
        self.remove(&file.src_uri);
        self.files.push(file);
    }

    /// Remove the file with this source path, if present.
    pub fn remove(&mut self, src_uri: &str) -> Option<SiteFile> {
        let pos = self.files.iter().position(|f| f.src_uri == src_uri)?;
        Some(self.files.remove(pos))
    }

    /// Keep only the files matching `keep`.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&SiteFile) -> bool,
    {
        self.files.retain(keep);
    }

    /// Look up a file by source path.
    pub fn get(&self, src_uri: &str) -> Option<&SiteFile> {
        self.files.iter().find(|f| f.src_uri == src_uri)
    }

    /// All files.
    pub fn iter(&self) -> impl Iterator<Item = &SiteFile> {
        self.files.iter()
    }

    /// Files going through the page pipeline.
    pub fn documentation_pages(&self) -> impl Iterator<Item = &SiteFile> {
        self.files.iter().filter(|f| f.is_documentation_page())
    }

    /// Files copied verbatim.
    pub fn media_files(&self) -> impl Iterator<Item = &SiteFile> {
        self.files.iter().filter(|f| !f.is_documentation_page())
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether there are no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
