use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 1] = [".twig"];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Turn a user-supplied path into the repository-relative form snapshots
    /// are keyed by
    ///
    /// `.` components are dropped. Absolute paths, `..`, anything under
    /// `.twig` and names with control characters are refused.
    pub fn relative_path(&self, input: &str) -> anyhow::Result<PathBuf> {
        let invalid = || RepositoryError::InvalidPath(input.to_string());

        if input.chars().any(char::is_control) {
            anyhow::bail!(invalid());
        }

        let mut relative = PathBuf::new();
        for component in Path::new(input).components() {
            match component {
                Component::CurDir => {}
                Component::Normal(name) => relative.push(name),
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    anyhow::bail!(invalid())
                }
            }
        }

        if relative.as_os_str().is_empty() || Self::is_ignored_root(&relative) {
            anyhow::bail!(invalid());
        }

        Ok(relative)
    }

    pub fn parse_blob(&self, path: &Path) -> anyhow::Result<Blob> {
        if !self.file_exists(path) {
            anyhow::bail!(RepositoryError::FileNotFound);
        }

        Ok(Blob::new(self.read_file(path)?))
    }

    pub fn file_exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn is_directory(&self, dir_path: &Path) -> bool {
        self.path.join(dir_path).is_dir()
    }

    /// Every working file under `root` (the whole tree when `None`), relative
    /// to the workspace root and sorted
    pub fn list_files(&self, root: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
        let root = match root {
            Some(p) => self.path.join(p),
            None => self.path.to_path_buf(),
        };

        if !root.exists() {
            return Ok(vec![]);
        }

        let mut files = WalkDir::new(&root)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(PathBuf::from)
            })
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(path: &Path) -> bool {
        path.file_name()
            .map(|name| IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()))
            .unwrap_or(false)
    }

    fn is_ignored_root(relative: &Path) -> bool {
        relative
            .iter()
            .next()
            .is_some_and(|first| IGNORED_PATHS.contains(&first.to_string_lossy().as_ref()))
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(file_path);

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(Bytes::from(content))
    }

    /// Create or overwrite a working file, creating missing parent directories
    pub fn write_file(&self, file_path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if path.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove existing directory: {:?}", file_path))?;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create parent directories for: {:?}", file_path)
            })?;
        }

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))
    }

    /// Delete a working file and prune the directories it leaves empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }
        self.prune_empty_parent_dirs(&path)
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.is_dir()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    // The order of applying migrations is important:
    // deleting first frees the places that written files and their parent
    // directories may need.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for (file_path, _) in migration.actions_of(ActionType::Delete) {
            self.remove_file(file_path)?;
        }

        for (file_path, oid) in migration.actions_of(ActionType::Write) {
            let oid = oid
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("Invalid action and entry combination"))?;
            let data = migration.load_blob_data(oid)?;

            self.write_file(file_path, &data)?;
        }

        Ok(())
    }
}
