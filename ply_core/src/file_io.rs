//! # File I/O Module
//!
//! Material libraries live in `.plib` files (pretty JSON). Saves go through a
//! temporary file and a rename, loads check the schema version and the
//! library's cross-references, and an editing session holds a [`FileLock`]
//! whose `.plib.lock` sidecar names the holder.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ply_core::file_io::{save_library, load_library, FileLock};
//! use ply_core::library::MaterialLibrary;
//! use std::path::Path;
//!
//! let library = MaterialLibrary::new("Analyst", "Prepregs");
//! let path = Path::new("prepregs.plib");
//!
//! let lock = FileLock::acquire(path, "analyst@lab.org")?;
//! save_library(&library, path)?;
//! drop(lock);
//! # Ok::<(), ply_core::errors::PlyError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{PlyError, PlyResult};
use crate::library::{MaterialLibrary, SCHEMA_VERSION};

/// Hours after which a lock left behind by a crashed session is ignored
const STALE_AFTER_HOURS: i64 = 24;

/// Who holds a library, as written to its `.plib.lock` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockHolder {
    pub user: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockHolder {
    fn current(user: String) -> Self {
        LockHolder {
            user,
            machine: machine_name(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// A holder is stale once its process is gone from this machine or its
    /// lock has outlived [`STALE_AFTER_HOURS`].
    fn is_stale(&self) -> bool {
        #[cfg(unix)]
        {
            let proc_fs = Path::new("/proc/self").exists();
            if proc_fs && self.machine == machine_name() && !Path::new(&format!("/proc/{}", self.pid)).exists() {
                return true;
            }
        }
        (Utc::now() - self.locked_at).num_hours() > STALE_AFTER_HOURS
    }

    fn describe(&self) -> String {
        format!("{} on {} (pid {})", self.user, self.machine, self.pid)
    }
}

fn machine_name() -> String {
    ["HOSTNAME", "COMPUTERNAME", "HOST"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Exclusive edit lock on a `.plib` file, released on drop.
///
/// Pairs an OS lock (fs2) on the `.plib.lock` file with the [`LockHolder`]
/// record written into it, so other sessions can say who is editing.
pub struct FileLock {
    library_path: PathBuf,
    lock_path: PathBuf,
    _handle: File,
    holder: LockHolder,
}

impl FileLock {
    /// Take the lock for `path` on behalf of `user`.
    ///
    /// Fails with `FileLocked` while another live session holds it.
    pub fn acquire(path: &Path, user: impl Into<String>) -> PlyResult<Self> {
        let lock_path = lock_path_for(path);
        if let Some(other) = live_holder(&lock_path) {
            return Err(locked_by(path, &other));
        }

        let lock_error =
            |op: &str, e: std::io::Error| PlyError::file_error(op, lock_path.display().to_string(), e.to_string());
        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| lock_error("create lock", e))?;
        handle
            .try_lock_exclusive()
            .map_err(|_| PlyError::file_locked(path.display().to_string(), "another process", "unknown"))?;

        let holder = LockHolder::current(user.into());
        handle
            .write_all(serde_json::to_string_pretty(&holder)?.as_bytes())
            .map_err(|e| lock_error("write lock", e))?;
        handle.sync_all().map_err(|e| lock_error("sync lock", e))?;

        debug!(path = %path.display(), holder = %holder.describe(), "acquired library lock");
        Ok(FileLock {
            library_path: path.to_path_buf(),
            lock_path,
            _handle: handle,
            holder,
        })
    }

    /// The live holder of `path`, if any, without taking the lock.
    pub fn holder_of(path: &Path) -> Option<LockHolder> {
        live_holder(&lock_path_for(path))
    }

    pub fn holder(&self) -> &LockHolder {
        &self.holder
    }

    pub fn library_path(&self) -> &Path {
        &self.library_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `prepregs.plib` locks through `prepregs.plib.lock`.
fn lock_path_for(library_path: &Path) -> PathBuf {
    let mut name = library_path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn live_holder(lock_path: &Path) -> Option<LockHolder> {
    let contents = fs::read_to_string(lock_path).ok()?;
    let holder: LockHolder = serde_json::from_str(&contents).ok()?;
    (!holder.is_stale()).then_some(holder)
}

fn locked_by(path: &Path, holder: &LockHolder) -> PlyError {
    PlyError::file_locked(
        path.display().to_string(),
        holder.describe(),
        holder.locked_at.to_rfc3339(),
    )
}

fn read_to_string(path: &Path, operation: &str) -> PlyResult<String> {
    let mut file = File::open(path)
        .map_err(|e| PlyError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| PlyError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Save a library with atomic write semantics.
///
/// Serializes to JSON, writes `<path>.tmp`, syncs it, then renames it over
/// `path`. An interrupted save leaves the previous file intact.
pub fn save_library(library: &MaterialLibrary, path: &Path) -> PlyResult<()> {
    let json = serde_json::to_string_pretty(library)?;

    let tmp_path = path.with_extension("plib.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        PlyError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        PlyError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        PlyError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        PlyError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(path = %path.display(), materials = library.material_count(), "saved material library");
    Ok(())
}

/// Load a library from a file.
///
/// Errors: `FileError` on I/O, `SerializationError` for invalid JSON or a
/// material that fails validation, `VersionMismatch` for an incompatible
/// schema, `InvalidFormat` for broken cross-references.
pub fn load_library(path: &Path) -> PlyResult<MaterialLibrary> {
    let contents = read_to_string(path, "open")?;

    let library: MaterialLibrary =
        serde_json::from_str(&contents).map_err(|e| PlyError::SerializationError {
            reason: format!("Invalid library in {}: {}", path.display(), e),
        })?;

    validate_version(&library.meta.version)?;
    library.validate()?;

    info!(path = %path.display(), materials = library.material_count(), "loaded material library");
    Ok(library)
}

/// Load a library for reading, reporting who holds its edit lock, if anyone.
pub fn load_library_with_lock_check(path: &Path) -> PlyResult<(MaterialLibrary, Option<LockHolder>)> {
    let library = load_library(path)?;
    Ok((library, FileLock::holder_of(path)))
}

/// Major versions must match; within 0.x a newer minor is rejected.
fn validate_version(file_version: &str) -> PlyResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || PlyError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    if file_parts.is_empty() || current_parts.is_empty() || file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}
