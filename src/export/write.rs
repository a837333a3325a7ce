//! Safe replacement of export files.
//!
//! 1. Optionally copy the current destination to a timestamped backup.
//! 2. Write the new content to a temp file in the same directory,
//!    created owner-only (`0600`), and flush it to disk.
//! 3. Rename the temp file over the destination.
//!
//! The rename ensures readers never see a half-written file.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::errors::Result;

/// Atomically replace `path` with `data`.
///
/// When `backup` is set and `path` already exists, a copy is taken first
/// into `backup_dir` (default: the destination's directory).  Returns the
/// backup path, if one was written.
pub fn safe_write_file(
    path: &Path,
    data: &[u8],
    backup: bool,
    backup_dir: Option<&Path>,
) -> Result<Option<PathBuf>> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let backup_path = if backup && path.exists() {
        Some(backup_file(path, backup_dir.unwrap_or(parent))?)
    } else {
        None
    };

    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let tmp_path = parent.join(format!(".{file_name}.tmp"));

    let written = write_private(&tmp_path, data).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    info!(path = %path.display(), bytes = data.len(), "wrote file");
    Ok(backup_path)
}

/// Copy `path` to `<dir>/<file name>.<UTC timestamp>.bak`, owner-only.
fn backup_file(path: &Path, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
    let backup_path = dir.join(format!("{file_name}.{stamp}.bak"));

    let content = fs::read(path)?;
    write_private(&backup_path, &content)?;

    info!(backup = %backup_path.display(), "backed up existing file");
    Ok(backup_path)
}

/// Create (or truncate) `path` with owner-only permissions and write `data`.
fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file: File = options.open(path)?;

    // `mode` only applies on creation; tighten a pre-existing file too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(data)?;
    file.sync_all()
}
