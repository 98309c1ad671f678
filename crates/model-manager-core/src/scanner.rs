//! Model file discovery.
//!
//! Walks the configured root directories, keeps files whose extension is in
//! [`MODEL_EXTENSIONS`], classifies them and returns one [`ModelFile`] per
//! unique canonical path, largest first.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Timelike};
use serde::Serialize;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::category::{Category, CategoryClassifier};
use crate::render::format_size;

/// Extensions (lowercase, without dot) treated as model weights
pub const MODEL_EXTENSIONS: &[&str] = &["safetensors", "sft", "pth", "pt", "ckpt"];

/// Display format for modification timestamps (minute resolution)
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A model weight file found during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelFile {
    /// Base name of the file
    pub name: String,
    /// Canonical absolute path (unique within a scan)
    pub path: PathBuf,
    /// Path relative to the root it was found under
    pub relative_path: PathBuf,
    /// Configured root that produced this entry
    pub root_directory: PathBuf,
    pub size_bytes: u64,
    /// Last modification time, truncated to the minute
    pub modified_at: DateTime<Local>,
    /// Assigned by the classifier at scan time; depends on the active rules
    pub category: Category,
}

impl ModelFile {
    /// Human readable size (`"1.50 GB"`)
    pub fn size_display(&self) -> String {
        format_size(self.size_bytes)
    }

    /// Modification time as `YYYY-MM-DD HH:MM`
    pub fn modified_display(&self) -> String {
        self.modified_at.format(DATE_FORMAT).to_string()
    }
}

/// Check whether a file name carries one of [`MODEL_EXTENSIONS`] (case-insensitive)
pub fn is_model_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| MODEL_EXTENSIONS.contains(&ext.as_str()))
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

fn truncate_to_minute(time: DateTime<Local>) -> DateTime<Local> {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// Scan `roots` with the builtin classification rules
pub fn scan<P: AsRef<Path>>(roots: &[P]) -> Vec<ModelFile> {
    scan_with(roots, CategoryClassifier::builtin())
}

/// Scan `roots`, classifying each file with `classifier`
///
/// Roots that are not directories are skipped. Files that vanish or cannot be
/// stat'ed between listing and metadata lookup are skipped. When two roots
/// reach the same canonical path, the first occurrence wins.
pub fn scan_with<P: AsRef<Path>>(roots: &[P], classifier: &CategoryClassifier) -> Vec<ModelFile> {
    let mut models = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for root in roots {
        let root = root.as_ref();
        if !root.is_dir() {
            debug!(root = %root.display(), "skipping root: not a directory");
            continue;
        }
        let abs_root = match fs::canonicalize(root) {
            Ok(p) => p,
            Err(e) => {
                debug!(root = %root.display(), error = %e, "skipping root: cannot resolve");
                continue;
            }
        };

        let walker = WalkDir::new(&abs_root)
            .into_iter()
            .filter_entry(|e| !is_hidden_dir(e))
            .filter_map(|e| e.ok());

        for entry in walker {
            if entry.file_type().is_dir() || !is_model_file(entry.path()) {
                continue;
            }

            let full_path = match fs::canonicalize(entry.path()) {
                Ok(p) => p,
                Err(e) => {
                    debug!(path = %entry.path().display(), error = %e, "skipping entry");
                    continue;
                }
            };
            if !seen.insert(full_path.clone()) {
                continue;
            }

            let metadata = match fs::metadata(&full_path) {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    debug!(path = %full_path.display(), error = %e, "skipping entry");
                    continue;
                }
            };
            let modified = match metadata.modified() {
                Ok(t) => truncate_to_minute(DateTime::<Local>::from(t)),
                Err(e) => {
                    debug!(path = %full_path.display(), error = %e, "skipping entry");
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            let relative_path = entry
                .path()
                .strip_prefix(&abs_root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(&name));
            let category = classifier
                .classify(&name, &full_path, metadata.len())
                .clone();

            models.push(ModelFile {
                name,
                path: full_path,
                relative_path,
                root_directory: root.to_path_buf(),
                size_bytes: metadata.len(),
                modified_at: modified,
                category,
            });
        }
    }

    models.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
    info!(
        count = models.len(),
        roots = roots.len(),
        "scan finished"
    );
    models
}

/// Holder for the most recent scan result
///
/// Every refresh replaces the whole set; nothing is updated incrementally.
pub struct ModelLibrary {
    classifier: Option<CategoryClassifier>,
    models: Vec<ModelFile>,
}

impl ModelLibrary {
    /// Empty library using the builtin classification rules
    pub fn new() -> Self {
        Self {
            classifier: None,
            models: Vec::new(),
        }
    }

    /// Empty library using a custom classifier
    pub fn with_classifier(classifier: CategoryClassifier) -> Self {
        Self {
            classifier: Some(classifier),
            models: Vec::new(),
        }
    }

    fn classifier(&self) -> &CategoryClassifier {
        self.classifier
            .as_ref()
            .unwrap_or_else(|| CategoryClassifier::builtin())
    }

    /// Rescan `roots` and replace the cached result
    pub fn refresh<P: AsRef<Path>>(&mut self, roots: &[P]) -> &[ModelFile] {
        self.models = scan_with(roots, self.classifier());
        &self.models
    }

    /// Cached result of the last scan
    pub fn models(&self) -> &[ModelFile] {
        &self.models
    }

    /// Cached result, scanning first when the cache is empty
    pub fn models_or_scan<P: AsRef<Path>>(&mut self, roots: &[P]) -> &[ModelFile] {
        if self.models.is_empty() {
            self.refresh(roots);
        }
        &self.models
    }

    /// Replace the cache with an externally built result
    ///
    /// The records are taken as-is; their categories are not re-checked
    /// against this library's classifier.
    pub fn replace(&mut self, models: Vec<ModelFile>) {
        self.models = models;
    }

    pub fn clear(&mut self) {
        self.models.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Look up a cached model by canonical path
    pub fn get(&self, path: &Path) -> Option<&ModelFile> {
        self.models.iter().find(|m| m.path == path)
    }
}

impl Default for ModelLibrary {
    fn default() -> Self {
        Self::new()
    }
}
