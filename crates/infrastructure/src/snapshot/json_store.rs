use async_trait::async_trait;
use lancache_sync_application::ports::SnapshotStore;
use lancache_sync_domain::{CacheSnapshot, DomainError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Snapshot persisted as pretty-printed JSON.
///
/// Writes go to a sibling `.tmp` file first and are renamed into place, so a
/// crash mid-write leaves the previous snapshot intact.
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, action: &str, e: std::io::Error) -> DomainError {
        DomainError::Snapshot(format!("{} {}: {}", action, self.path.display(), e))
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<CacheSnapshot>, DomainError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache snapshot yet");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error("cannot read", e)),
        };

        serde_json::from_str(&raw).map(Some).map_err(|e| {
            DomainError::Snapshot(format!("corrupt snapshot {}: {}", self.path.display(), e))
        })
    }

    #[instrument(skip(self, snapshot), fields(path = %self.path.display()))]
    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error("cannot create directory for", e))?;
        }

        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| DomainError::Snapshot(e.to_string()))?;

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| self.io_error("cannot write", e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error("cannot replace", e))?;

        debug!(entries = snapshot.rewrites.len(), "Snapshot saved");
        Ok(())
    }
}
