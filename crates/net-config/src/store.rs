//! Raw file access for ifcfg files

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use tokio::fs;

use ifcfg_network_core::Result;

/// Byte-level access to configuration files
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;

    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
}

/// File store backed by the local filesystem.
///
/// Writes go to a temporary sibling that is renamed over the target, so the
/// file is either the old or the new contents, never a mix. Symlinks are
/// followed and the link target is replaced. Files with several hard links
/// are rewritten in place so every link sees the new contents.
#[derive(Debug, Default, Clone)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }

    fn temp_path(path: &Path) -> PathBuf {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("ifcfg");
        path.with_file_name(format!(".{}.tmp-{}", file_name, std::process::id()))
    }

    async fn replace(
        temp_path: &Path,
        target: &Path,
        metadata: Option<&std::fs::Metadata>,
    ) -> std::io::Result<()> {
        if let Some(metadata) = metadata {
            copy_attributes(temp_path, metadata).await?;
        }
        fs::rename(temp_path, target).await
    }

    /// Resolve symlinks, keeping `path` as is when it does not exist yet
    async fn target_path(path: &Path) -> Result<PathBuf> {
        match fs::canonicalize(path).await {
            Ok(resolved) => Ok(resolved),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn is_hard_linked(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    metadata.nlink() > 1
}

#[cfg(not(unix))]
fn is_hard_linked(_metadata: &std::fs::Metadata) -> bool {
    false
}

/// Give `temp_path` the mode and owner of the file it replaces
async fn copy_attributes(temp_path: &Path, metadata: &std::fs::Metadata) -> std::io::Result<()> {
    fs::set_permissions(temp_path, metadata.permissions()).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        std::os::unix::fs::chown(temp_path, Some(metadata.uid()), Some(metadata.gid()))?;
    }

    Ok(())
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(fs::read(path).await?)
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let target = Self::target_path(path).await?;
        let metadata = fs::metadata(&target).await.ok();

        if metadata.as_ref().is_some_and(is_hard_linked) {
            fs::write(&target, contents).await?;
            debug!(
                "Wrote {} bytes in place to hard-linked {:?}",
                contents.len(),
                target
            );
            return Ok(());
        }

        let temp_path = Self::temp_path(&target);
        fs::write(&temp_path, contents).await?;

        if let Err(e) = Self::replace(&temp_path, &target, metadata.as_ref()).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!("Wrote {} bytes to {:?}", contents.len(), target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ifcfg-eth0");
        let store = LocalFileStore::new();

        assert!(!store.exists(&path).await);
        store.write(&path, b"DEVICE=eth0").await.unwrap();
        assert!(store.exists(&path).await);
        store.write(&path, b"DEVICE=eth1").await.unwrap();

        assert_eq!(store.read(&path).await.unwrap(), b"DEVICE=eth1");
        assert!(!LocalFileStore::temp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFileStore::new();

        let err = store
            .read(&temp_dir.path().join("ifcfg-none"))
            .await
            .unwrap_err();
        assert!(matches!(err, ifcfg_network_core::NetworkError::Io(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_keeps_permissions() {
        use std::os::unix::fs::{MetadataExt, PermissionsExt};

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ifcfg-eth0");
        std::fs::write(&path, "DEVICE=eth0").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).unwrap();

        LocalFileStore::new().write(&path, b"DEVICE=eth0\nONBOOT=yes").await.unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
        assert_eq!(metadata.uid(), std::fs::metadata(temp_dir.path()).unwrap().uid());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_through_symlink_updates_target() {
        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("real-ifcfg-eth0");
        let link = temp_dir.path().join("ifcfg-eth0");
        std::fs::write(&real, "DEVICE=eth0").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let store = LocalFileStore::new();
        store.write(&link, b"DEVICE=eth0\nONBOOT=yes").await.unwrap();

        assert!(std::fs::symlink_metadata(&link)
            .unwrap()
            .file_type()
            .is_symlink());
        assert_eq!(std::fs::read_to_string(&real).unwrap(), "DEVICE=eth0\nONBOOT=yes");
        assert_eq!(store.read(&link).await.unwrap(), b"DEVICE=eth0\nONBOOT=yes");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_keeps_hard_links_shared() {
        use std::os::unix::fs::MetadataExt;

        let temp_dir = TempDir::new().unwrap();
        let devices = temp_dir.path().join("devices-ifcfg-eth0");
        let scripts = temp_dir.path().join("ifcfg-eth0");
        std::fs::write(&devices, "DEVICE=eth0").unwrap();
        std::fs::hard_link(&devices, &scripts).unwrap();

        LocalFileStore::new()
            .write(&scripts, b"DEVICE=eth0\nBOOTPROTO=dhcp")
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&devices).unwrap(),
            "DEVICE=eth0\nBOOTPROTO=dhcp"
        );
        assert_eq!(std::fs::metadata(&scripts).unwrap().nlink(), 2);
    }
}
