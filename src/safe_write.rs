//! Atomic, traversal-safe persistence for generated job files and configs.
//!
//! A destination must resolve under the writer's base directory. Content is
//! staged in a temporary file next to the destination, flushed and synced,
//! then renamed over it. Dropping a [`StagedWrite`] without committing it
//! removes the temporary file and leaves the destination alone.

use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

use crate::error::{AutomapError, Result};

#[derive(Clone, Debug)]
pub struct SafeWriter {
    base: PathBuf,
    overwrite: bool,
}

impl SafeWriter {
    /// Writer rooted at `base`. Existing files are not replaced unless
    /// [`SafeWriter::overwrite`] is enabled.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            overwrite: false,
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Resolve `requested` against the base, rejecting anything that escapes
    /// it. Nothing on disk is touched.
    pub fn resolve(&self, requested: &Path) -> Result<PathBuf> {
        let traversal = || AutomapError::PathTraversal {
            path: requested.display().to_string(),
            base: self.base.clone(),
        };

        let base = absolute(&self.base)?;
        let lexical_base = normalize(&base);
        let candidate = normalize(&lexical_base.join(requested));
        if candidate == lexical_base || !candidate.starts_with(&lexical_base) {
            return Err(traversal());
        }

        // Symlinked parents must not lead outside the base either.
        let (Some(parent), Some(file_name)) = (candidate.parent(), candidate.file_name()) else {
            return Err(traversal());
        };
        if let (Ok(real_parent), Ok(real_base)) = (fs::canonicalize(parent), fs::canonicalize(&base))
        {
            if !real_parent.starts_with(&real_base) {
                return Err(traversal());
            }
            return Ok(real_parent.join(file_name));
        }
        Ok(candidate)
    }

    /// Stage `content` for `requested` without touching the destination yet.
    pub fn stage(&self, requested: &Path, content: &[u8]) -> Result<StagedWrite> {
        let destination = self.resolve(requested)?;
        if !self.overwrite && destination.exists() {
            return Err(AutomapError::AlreadyExists(destination));
        }
        let dir = destination
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base.clone());
        let prefix = format!(
            ".{}.",
            destination
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        );

        let mut temp = Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|err| AutomapError::io(format!("creating temp file in {}", dir.display()), err))?;
        temp.write_all(content)
            .and_then(|()| temp.flush())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|err| AutomapError::io(format!("writing {}", temp.path().display()), err))?;
        debug!("staged {} bytes at {}", content.len(), temp.path().display());

        Ok(StagedWrite { temp, destination })
    }

    /// Stage and commit in one step; returns the final path.
    pub fn write(&self, requested: &Path, content: &[u8]) -> Result<PathBuf> {
        self.stage(requested, content)?.commit()
    }
}

/// Content synced to a temporary file, waiting to be renamed into place.
#[derive(Debug)]
pub struct StagedWrite {
    temp: NamedTempFile,
    destination: PathBuf,
}

impl StagedWrite {
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Atomically replace the destination with the staged content.
    pub fn commit(self) -> Result<PathBuf> {
        let StagedWrite { temp, destination } = self;
        temp.persist(&destination).map_err(|err| {
            AutomapError::io(format!("replacing {}", destination.display()), err.error)
        })?;
        debug!("wrote {}", destination.display());
        Ok(destination)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .map_err(|err| AutomapError::io("reading current directory", err))?;
    Ok(cwd.join(path))
}

/// Lexically collapse `.` and `..` without consulting the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            // `..` above the root stays at the root; relative paths keep it.
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}
