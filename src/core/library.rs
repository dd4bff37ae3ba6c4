//! Poster discovery: turns command-line inputs into an ordered item list.
//!
//! Files are taken as given; directories are walked and every image file in
//! them is collected in path order.  Nothing is decoded here.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Extensions accepted when MIME sniffing is inconclusive.
const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff", "ico",
];

/// Opaque reference to one poster image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    pub path: PathBuf,
}

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File name for titles and status messages.
    pub fn label(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// How directories are walked.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoverConfig {
    /// Descend into sub-directories.
    pub recursive: bool,
    /// Include dot-files and dot-directories.
    pub show_hidden: bool,
}

/// Collect image references from `inputs`, preserving input order.
///
/// Unreadable inputs are logged and skipped; the result may be empty.
pub fn discover(inputs: &[PathBuf], config: &DiscoverConfig) -> Vec<ImageRef> {
    let mut out = Vec::new();
    for input in inputs {
        if input.is_dir() {
            out.extend(scan_dir(input, config));
        } else if input.is_file() {
            if is_image(input) {
                out.push(ImageRef::new(input.clone()));
            } else {
                tracing::warn!(path = %input.display(), "not an image, skipped");
            }
        } else {
            tracing::warn!(path = %input.display(), "input not found, skipped");
        }
    }
    tracing::debug!(count = out.len(), "discovered posters");
    out
}

fn scan_dir(dir: &Path, config: &DiscoverConfig) -> Vec<ImageRef> {
    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || config.show_hidden || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::warn!("walk error: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_image(e.path()))
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found.into_iter().map(ImageRef::new).collect()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Sniff the file's MIME type, falling back to its extension.
pub fn is_image(path: &Path) -> bool {
    match tree_magic_mini::from_filepath(path) {
        Some(mime) if mime.starts_with("image/") => true,
        Some(mime) if mime != "application/octet-stream" && mime != "text/plain" => false,
        _ => has_image_extension(path),
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}
