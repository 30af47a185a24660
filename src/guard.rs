use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Outcome of resolving a caller-supplied path against the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Admitted(PathBuf),
    Rejected(PathBuf),
}

/// Confines every path handed to the file service to a canonical root.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    pub fn new(root: &Path) -> anyhow::Result<Self> {
        let root = dunce::canonicalize(root)
            .map_err(|e| anyhow::anyhow!("project root {} is not accessible: {e}", root.display()))?;
        if !root.is_dir() {
            anyhow::bail!("project root is not a directory: {}", root.display());
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `relative` against the root, following symlinks for every
    /// component that exists on disk. Components that do not exist yet are
    /// appended lexically so write targets can be checked before creation.
    pub fn resolve(&self, relative: &str) -> Resolution {
        let joined = self.root.join(relative);
        let mut resolved = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(name) => {
                    let candidate = resolved.join(name);
                    if fs::symlink_metadata(&candidate).is_ok() {
                        match dunce::canonicalize(&candidate) {
                            Ok(canonical) => resolved = canonical,
                            // dangling symlink: its target cannot be checked
                            Err(_) => return Resolution::Rejected(candidate),
                        }
                    } else {
                        resolved = candidate;
                    }
                }
            }
        }
        if resolved.starts_with(&self.root) {
            Resolution::Admitted(resolved)
        } else {
            Resolution::Rejected(resolved)
        }
    }

    /// Like [`PathGuard::resolve`], but turns a rejection into
    /// [`AppError::PathOutsideRoot`] and records it in the audit log.
    pub fn admit(&self, relative: &str) -> AppResult<PathBuf> {
        match self.resolve(relative) {
            Resolution::Admitted(path) => Ok(path),
            Resolution::Rejected(path) => {
                tracing::warn!(requested = relative, resolved = %path.display(), "path outside root rejected");
                Err(AppError::PathOutsideRoot(relative.to_string()))
            }
        }
    }

    /// Root-relative form of an admitted path, always with `/` separators.
    pub fn relative_display(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}
