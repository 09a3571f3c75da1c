use crate::{
    domain::Board,
    error::Result,
    storage::{BoardCache, PersistedSession},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Board cache kept as a JSON file named after the storage key
pub struct FileCache {
    root_path: PathBuf,
    key: String,
}

impl FileCache {
    /// Creates a cache under `root` for the given storage key
    pub fn new(root: impl AsRef<Path>, key: impl Into<String>) -> Self {
        Self {
            root_path: root.as_ref().to_path_buf(),
            key: key.into(),
        }
    }

    pub fn file_path(&self) -> PathBuf {
        self.root_path.join(format!("{}.json", self.key))
    }

    /// Each write gets its own temp file so overlapping saves never rename
    /// each other's output
    fn temp_path(&self) -> PathBuf {
        self.root_path
            .join(format!(".{}.{}.json.tmp", self.key, Uuid::new_v4().simple()))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BoardCache for FileCache {
    async fn load(&self) -> Result<Option<Board>> {
        let file_path = self.file_path();

        if !file_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path).await?;
        Ok(Some(PersistedSession::from_json(&contents)?.into_board()))
    }

    async fn save(&self, board: &Board) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        // Write then rename so a crash never leaves a half-written session
        let json = PersistedSession::new(board).to_json()?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, json).await?;
        if let Err(err) = fs::rename(&temp_path, self.file_path()).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(err.into());
        }

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let file_path = self.file_path();

        if file_path.exists() {
            fs::remove_file(file_path).await?;
        }
        Ok(())
    }
}
