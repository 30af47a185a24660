use crate::{
    errors::{AppError, AppResult},
    guard::Resolution,
    protocol::registry::Tool,
    tools::{parse_params, to_output, FileService, EXCLUDED_DIRS, EXCLUDED_FILES},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{path::Component, sync::Arc};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListFilesParams {
    #[serde(default = "default_directory")]
    pub directory: String,
}
fn default_directory() -> String { ".".to_string() }

#[derive(Debug, Serialize)]
pub struct ListFilesOutput {
    pub files: Vec<String>,
}

impl FileService {
    /// Every file under `directory`, relative to the root, sorted ascending.
    pub fn list_files(&self, directory: &str) -> AppResult<ListFilesOutput> {
        let target = self.guard().admit(directory)?;
        if !target.is_dir() {
            return Err(AppError::NotADirectory(directory.to_string()));
        }
        let rel = target.strip_prefix(self.guard().root()).unwrap_or(&target);
        if rel.components().any(|c| matches!(c, Component::Normal(n) if is_excluded_dir(&n.to_string_lossy()))) {
            return Ok(ListFilesOutput { files: Vec::new() });
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&target)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !(e.file_type().is_dir() && is_excluded_dir(&e.file_name().to_string_lossy()))
            });
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_name().to_str().is_some_and(|n| EXCLUDED_FILES.contains(&n)) {
                continue;
            }
            if let Some(path) = self.listed_path(&entry) {
                files.push(path);
            }
        }
        files.sort();
        Ok(ListFilesOutput { files })
    }

    fn listed_path(&self, entry: &DirEntry) -> Option<String> {
        let file_type = entry.file_type();
        if file_type.is_file() {
            return self.guard().relative_display(entry.path());
        }
        if file_type.is_symlink() {
            let rel = self.guard().relative_display(entry.path())?;
            return match self.guard().resolve(&rel) {
                Resolution::Admitted(target) if target.is_file() => Some(rel),
                _ => None,
            };
        }
        None
    }
}

fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.contains(&name)
}

pub struct ListFilesTool { service: Arc<FileService> }

impl ListFilesTool { pub fn new(service: Arc<FileService>) -> Self { Self { service } } }

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &'static str { "list_files" }
    async fn call(&self, params: serde_json::Value) -> Result<serde_json::Value, AppError> {
        let p: ListFilesParams = parse_params(self.name(), params)?;
        to_output(&self.service.list_files(&p.directory)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::PathGuard;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use serde_json::json;

    fn fixture() -> (TempDir, FileService) {
        let tmp = TempDir::new().unwrap();
        tmp.child("a.txt").write_str("hello\nworld\n").unwrap();
        tmp.child("dir/b.txt").write_str("line1\nTODO: fix\n").unwrap();
        tmp.child(".git/ignored").write_str("x").unwrap();
        tmp.child("node_modules/pkg.js").write_str("x").unwrap();
        tmp.child("deep/er/__pycache__/m.pyc").write_str("x").unwrap();
        tmp.child("deep/er/.DS_Store").write_str("x").unwrap();
        tmp.child("deep/er/keep.rs").write_str("fn main() {}").unwrap();
        let service = FileService::new(PathGuard::new(tmp.path()).unwrap());
        (tmp, service)
    }

    #[test]
    fn lists_sorted_and_prunes_exclusions() {
        let (_tmp, service) = fixture();
        let out = service.list_files(".").unwrap();
        assert_eq!(out.files, vec!["a.txt", "deep/er/keep.rs", "dir/b.txt"]);
    }

    #[test]
    fn subdirectory_paths_stay_root_relative() {
        let (_tmp, service) = fixture();
        assert_eq!(service.list_files("dir").unwrap().files, vec!["dir/b.txt"]);
        assert_eq!(service.list_files("deep/./er").unwrap().files, vec!["deep/er/keep.rs"]);
    }

    #[test]
    fn listing_inside_an_excluded_directory_is_empty() {
        let (_tmp, service) = fixture();
        assert!(service.list_files(".git").unwrap().files.is_empty());
    }

    #[test]
    fn rejects_outside_missing_and_file_targets() {
        let (_tmp, service) = fixture();
        assert!(matches!(service.list_files(".."), Err(AppError::PathOutsideRoot(_))));
        assert!(matches!(service.list_files("nope"), Err(AppError::NotADirectory(_))));
        assert!(matches!(service.list_files("a.txt"), Err(AppError::NotADirectory(_))));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_listed_only_when_they_stay_inside() {
        let parent = TempDir::new().unwrap();
        parent.child("root/real.txt").write_str("r").unwrap();
        parent.child("outside/secret.txt").write_str("s").unwrap();
        let root = parent.path().join("root");
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("alias.txt")).unwrap();
        std::os::unix::fs::symlink(parent.path().join("outside/secret.txt"), root.join("leak.txt")).unwrap();
        std::os::unix::fs::symlink(parent.path().join("outside"), root.join("linked_dir")).unwrap();
        let service = FileService::new(PathGuard::new(&root).unwrap());
        assert_eq!(service.list_files(".").unwrap().files, vec!["alias.txt", "real.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn outward_linked_directory_cannot_be_listed() {
        let parent = TempDir::new().unwrap();
        parent.child("root/a.txt").write_str("a").unwrap();
        parent.child("outside/secret.txt").write_str("s").unwrap();
        let root = parent.path().join("root");
        std::os::unix::fs::symlink(parent.path().join("outside"), root.join("escape")).unwrap();
        let service = FileService::new(PathGuard::new(&root).unwrap());
        assert!(matches!(service.list_files("escape"), Err(AppError::PathOutsideRoot(_))));
        assert!(matches!(service.list_files("escape/."), Err(AppError::PathOutsideRoot(_))));
    }

    #[tokio::test]
    async fn tool_defaults_directory_to_root() {
        let (_tmp, service) = fixture();
        let tool = ListFilesTool::new(Arc::new(service));
        let out = tool.call(serde_json::Value::Null).await.unwrap();
        assert_eq!(out, json!({"files": ["a.txt", "deep/er/keep.rs", "dir/b.txt"]}));
        assert!(tool.call(json!({"dir": "."})).await.is_err());
    }
}
