use crate::domain::model::TextFile;
use crate::domain::ports::Delivery;
use crate::utils::error::{Result, SaveError};
use crate::utils::validation::validate_file_name;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const STAGING_PREFIX: &str = ".text-saver-";

/// Writes each file into a directory on the local filesystem.
///
/// Content is staged in a temporary file next to the target and renamed
/// into place, so readers never see a half-written file and a failed write
/// leaves nothing behind.
#[derive(Debug, Clone)]
pub struct LocalDirectory {
    root: PathBuf,
    overwrite: bool,
}

impl LocalDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            overwrite: true,
        }
    }

    /// When false, delivering a name that already exists fails with
    /// [`SaveError::AlreadyExists`].
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

fn write_staged(root: &Path, target: &Path, content: &[u8], overwrite: bool) -> Result<()> {
    std::fs::create_dir_all(root)?;

    let mut staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempfile_in(root)?;
    staged.write_all(content)?;
    staged.as_file().sync_all()?;

    persist(staged, target, overwrite)
}

fn persist(staged: NamedTempFile, target: &Path, overwrite: bool) -> Result<()> {
    let persisted = if overwrite {
        staged.persist(target)
    } else {
        staged.persist_noclobber(target)
    };

    // On error the staged file is dropped with the PersistError, which removes it.
    persisted.map(|_| ()).map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            SaveError::AlreadyExists {
                path: target.display().to_string(),
            }
        } else {
            SaveError::Io(e.error)
        }
    })
}

#[async_trait]
impl Delivery for LocalDirectory {
    async fn deliver(&self, file: &TextFile) -> Result<()> {
        validate_file_name(&file.name)?;

        let root = self.root.clone();
        let target = self.path_for(&file.name);
        let content = file.content.clone().into_bytes();
        let overwrite = self.overwrite;

        tracing::debug!("Staging {} bytes for {}", content.len(), target.display());
        tokio::task::spawn_blocking(move || write_staged(&root, &target, &content, overwrite))
            .await
            .map_err(|e| SaveError::Delivery {
                file: file.name.clone(),
                message: format!("write task failed: {}", e),
            })??;

        tracing::debug!("Wrote {}", self.path_for(&file.name).display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
