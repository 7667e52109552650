//! Pre-transaction snapshots of configuration files

use std::path::{Path, PathBuf};

use log::debug;

use ifcfg_network_config::FileStore;
use ifcfg_network_core::error::SystemError;
use ifcfg_network_core::{NetworkError, Result};

/// Exact bytes of a configuration file taken right before a transaction.
///
/// Owned by a single transaction and only used to put the file back when the
/// interface fails to come up with the new configuration.
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
    contents: Vec<u8>,
    checksum: String,
}

impl Snapshot {
    /// Read the current file contents
    pub async fn capture(store: &dyn FileStore, path: &Path) -> Result<Self> {
        let contents = store.read(path).await?;
        let checksum = checksum(&contents);

        debug!(
            "Captured snapshot of {:?} ({} bytes, md5 {})",
            path,
            contents.len(),
            checksum
        );

        Ok(Self {
            path: path.to_path_buf(),
            contents,
            checksum,
        })
    }

    /// Write the snapshot back
    pub async fn restore(&self, store: &dyn FileStore) -> Result<()> {
        store.write(&self.path, &self.contents).await?;
        debug!("Restored {:?} from snapshot", self.path);
        Ok(())
    }

    /// Check that the file on disk matches the snapshot
    pub async fn verify(&self, store: &dyn FileStore) -> Result<()> {
        let restored = store.read(&self.path).await?;
        if checksum(&restored) != self.checksum {
            return Err(NetworkError::System(SystemError::SnapshotMismatch {
                path: self.path.display().to_string(),
            }));
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// md5 of the snapshot contents
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

fn checksum(contents: &[u8]) -> String {
    format!("{:x}", md5::compute(contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifcfg_network_config::LocalFileStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_capture_and_restore() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ifcfg-eth0");
        std::fs::write(&path, "DEVICE=eth0\n# keep me\n").unwrap();
        let store = LocalFileStore::new();

        let snapshot = Snapshot::capture(&store, &path).await.unwrap();
        assert_eq!(snapshot.contents(), b"DEVICE=eth0\n# keep me\n");
        assert_eq!(snapshot.checksum().len(), 32);

        std::fs::write(&path, "DEVICE=eth0\nBOOTPROTO=static").unwrap();
        snapshot.restore(&store).await.unwrap();
        snapshot.verify(&store).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "DEVICE=eth0\n# keep me\n"
        );
    }

    #[tokio::test]
    async fn test_verify_detects_changed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ifcfg-eth0");
        std::fs::write(&path, "DEVICE=eth0\n").unwrap();
        let store = LocalFileStore::new();

        let snapshot = Snapshot::capture(&store, &path).await.unwrap();
        std::fs::write(&path, "DEVICE=eth1\n").unwrap();

        match snapshot.verify(&store).await {
            Err(NetworkError::System(SystemError::SnapshotMismatch { path: reported })) => {
                assert_eq!(reported, path.display().to_string())
            }
            other => panic!("expected snapshot mismatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_capture_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new();

        let result = Snapshot::capture(&store, &temp_dir.path().join("ifcfg-none")).await;
        assert!(matches!(result, Err(NetworkError::Io(_))));
    }
}
