//! Deleting model files and revealing them in the file manager.
//!
//! Deletion is permanent and best-effort: each path is handled on its own and
//! a failure is recorded in the report without stopping the batch.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ModelManagerError, Result};
use crate::render::format_size;

/// Number of deleted names listed individually in the summary
const MAX_LISTED_DELETED: usize = 5;
/// Number of error messages listed in the summary
const MAX_LISTED_ERRORS: usize = 3;

/// Outcome of a delete batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    /// Base names of removed files, in input order
    pub deleted: Vec<String>,
    /// `"<name>: <error>"` for each failure
    pub errors: Vec<String>,
    /// Sum of the sizes of removed files
    pub freed_bytes: u64,
}

impl DeleteReport {
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl std::fmt::Display for DeleteReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "❌ Nothing deleted");
        }

        let mut lines: Vec<String> = Vec::new();
        if !self.deleted.is_empty() {
            lines.push(format!(
                "✅ Deleted {} files ({} freed)",
                self.deleted.len(),
                format_size(self.freed_bytes)
            ));
            for name in self.deleted.iter().take(MAX_LISTED_DELETED) {
                lines.push(format!("• {}", name));
            }
            if self.deleted.len() > MAX_LISTED_DELETED {
                lines.push(format!(
                    "... and {} more",
                    self.deleted.len() - MAX_LISTED_DELETED
                ));
            }
        }
        if !self.errors.is_empty() {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push("⚠️ Errors:".to_string());
            for error in self.errors.iter().take(MAX_LISTED_ERRORS) {
                lines.push(format!("• {}", error));
            }
        }
        write!(f, "{}", lines.join("\n"))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn delete_one(path: &Path) -> std::io::Result<u64> {
    let metadata = fs::metadata(path)?;
    fs::remove_file(path)?;
    Ok(metadata.len())
}

/// Permanently delete each path in `paths`
///
/// Returns [`ModelManagerError::NothingSelected`] for empty input without
/// touching the filesystem. Missing files and removal failures are recorded
/// in [`DeleteReport::errors`].
pub fn delete_models<P: AsRef<Path>>(paths: &[P]) -> Result<DeleteReport> {
    if paths.is_empty() {
        return Err(ModelManagerError::NothingSelected);
    }

    let mut report = DeleteReport::default();
    for path in paths {
        let path = path.as_ref();
        let name = display_name(path);

        if !path.exists() {
            warn!(path = %path.display(), "delete skipped: not found");
            report.errors.push(format!("{}: not found", name));
            continue;
        }

        match delete_one(path) {
            Ok(size) => {
                info!(path = %path.display(), size, "deleted model file");
                report.freed_bytes += size;
                report.deleted.push(name);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "delete failed");
                report.errors.push(format!("{}: {}", name, e));
            }
        }
    }

    Ok(report)
}

/// Build the platform command that reveals `path` in the file manager
///
/// - Windows: `explorer /select,"<path>"`
/// - macOS: `open -R <path>`
/// - elsewhere: `xdg-open <parent directory>`
#[cfg(target_os = "windows")]
pub fn reveal_command(path: &Path) -> Command {
    use std::os::windows::process::CommandExt;

    let mut cmd = Command::new("explorer");
    // explorer parses its own command line; the path must stay quoted as one token
    cmd.raw_arg(format!("/select,\"{}\"", path.display()));
    cmd
}

#[cfg(target_os = "macos")]
pub fn reveal_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg("-R").arg(path);
    cmd
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn reveal_command(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(containing_folder(path));
    cmd
}

/// Directory containing `path`
pub fn containing_folder(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Open the file manager on the folder containing `path`
///
/// Fails with [`ModelManagerError::ModelNotFound`] before running anything
/// if the file no longer exists. The file manager is spawned and not waited
/// on. Returns the folder that was opened.
pub fn open_containing_folder(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(ModelManagerError::ModelNotFound {
            path: path.to_path_buf(),
        });
    }

    let folder = containing_folder(path);
    reveal_command(path)
        .spawn()
        .map_err(|e| ModelManagerError::OpenFolder {
            path: folder.clone(),
            message: e.to_string(),
        })?;

    info!(folder = %folder.display(), "opened containing folder");
    Ok(folder)
}
