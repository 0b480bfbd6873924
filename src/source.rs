use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::ViewerError;
use crate::model::{FileDescriptor, TreeNode};

pub const DEFAULT_SUFFIX: &str = ".tree.json";

/// Where the file list and the per-file trees come from.
#[async_trait]
pub trait TreeSource: Send + Sync {
    async fn list_files(&self) -> Result<Vec<FileDescriptor>, ViewerError>;

    async fn load_tree(&self, filename: &str) -> Result<TreeNode, ViewerError>;
}

#[async_trait]
impl<T: TreeSource + ?Sized> TreeSource for Box<T> {
    async fn list_files(&self) -> Result<Vec<FileDescriptor>, ViewerError> {
        (**self).list_files().await
    }

    async fn load_tree(&self, filename: &str) -> Result<TreeNode, ViewerError> {
        (**self).load_tree(filename).await
    }
}

/// Tree files read straight from a directory of builder output.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    suffix: String,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    fn scan(&self) -> Result<Vec<FileDescriptor>, ViewerError> {
        if !self.root.is_dir() {
            return Err(ViewerError::InvalidPath(format!(
                "not a directory: {}",
                self.root.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if name.ends_with(&self.suffix) {
                files.push(FileDescriptor { filename: name });
            }
        }
        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        debug!(root = %self.root.display(), count = files.len(), "scanned tree directory");
        Ok(files)
    }

    fn path_for(&self, filename: &str) -> Result<PathBuf, ViewerError> {
        let relative = Path::new(filename);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if filename.is_empty() || escapes {
            return Err(ViewerError::InvalidPath(filename.to_string()));
        }
        Ok(self.root.join(relative))
    }

    fn read(&self, filename: &str) -> Result<TreeNode, ViewerError> {
        let path = self.path_for(filename)?;
        let file = File::open(&path)?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ViewerError::Parse {
            url: path.display().to_string(),
            source,
        })
    }
}

#[async_trait]
impl TreeSource for DirSource {
    async fn list_files(&self) -> Result<Vec<FileDescriptor>, ViewerError> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.scan())
            .await
            .map_err(|err| ViewerError::Io(std::io::Error::other(err)))?
    }

    async fn load_tree(&self, filename: &str) -> Result<TreeNode, ViewerError> {
        let source = self.clone();
        let filename = filename.to_string();
        tokio::task::spawn_blocking(move || source.read(&filename))
            .await
            .map_err(|err| ViewerError::Io(std::io::Error::other(err)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }

    #[tokio::test]
    async fn lists_matching_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "weather.data.tree.json", "{}");
        write(dir.path(), "alpha.data.tree.json", "{}");
        write(dir.path(), "alpha.data.json", "{}");
        write(dir.path(), "nested/beta.data.tree.json", "{}");

        let files = DirSource::new(dir.path()).list_files().await.unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(
            names,
            [
                "alpha.data.tree.json",
                "nested/beta.data.tree.json",
                "weather.data.tree.json"
            ]
        );
    }

    #[tokio::test]
    async fn custom_suffix() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.data.tree.json", "{}");
        write(dir.path(), "b.json", "{}");
        let files = DirSource::new(dir.path())
            .with_suffix(".json")
            .list_files()
            .await
            .unwrap();
        assert_eq!(files.len(), 2);
    }

    #[tokio::test]
    async fn loads_tree_by_relative_name() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "a.tree.json",
            r#"{"Label":"outlook","Children":[{"Label":"yes","Terminal":true}]}"#,
        );
        let tree = DirSource::new(dir.path()).load_tree("a.tree.json").await.unwrap();
        assert_eq!(tree.label, "outlook");
        assert_eq!(tree.count_nodes(), 2);
    }

    #[tokio::test]
    async fn rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(dir.path());
        for name in ["../secret.tree.json", "/etc/passwd", ""] {
            let err = source.load_tree(name).await.unwrap_err();
            assert!(matches!(err, ViewerError::InvalidPath(_)), "{name}");
        }
    }

    #[tokio::test]
    async fn bad_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken.tree.json", "{not json");
        let err = DirSource::new(dir.path())
            .load_tree("broken.tree.json")
            .await
            .unwrap_err();
        assert!(matches!(err, ViewerError::Parse { .. }));
    }

    #[tokio::test]
    async fn missing_root_is_reported() {
        let err = DirSource::new("/definitely/not/here")
            .list_files()
            .await
            .unwrap_err();
        assert!(matches!(err, ViewerError::InvalidPath(_)));
    }
}
