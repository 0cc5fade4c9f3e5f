//! Shared volume service
//!
//! Lets several async callers use one volume. Every operation holds the
//! volume lock for its whole duration, so at most one mount change, listing
//! or entry creation is in flight per mount point.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::entries::{CreatedEntries, EntryNames};
use crate::error::{EntryError, EnumError, MountError};
use crate::fs::{DirEntry, FileSystem};
use crate::mount::{MountState, Volume};

/// Cloneable handle to a volume behind an async lock
pub struct VolumeService<F: FileSystem> {
    volume: Arc<Mutex<Volume<F>>>,
}

impl<F: FileSystem> Clone for VolumeService<F> {
    fn clone(&self) -> Self {
        Self {
            volume: Arc::clone(&self.volume),
        }
    }
}

impl<F: FileSystem> VolumeService<F> {
    pub fn new(volume: Volume<F>) -> Self {
        Self {
            volume: Arc::new(Mutex::new(volume)),
        }
    }

    pub async fn state(&self) -> MountState {
        self.volume.lock().await.state()
    }

    pub async fn mount(&self) -> Result<(), MountError> {
        self.volume.lock().await.mount()
    }

    pub async fn unmount(&self) -> Result<(), MountError> {
        self.volume.lock().await.unmount()
    }

    pub async fn verify_remount(&self) -> Result<(), MountError> {
        self.volume.lock().await.verify_remount()
    }

    pub async fn list_directory(&self, path: &str) -> Result<u32, EnumError> {
        self.volume.lock().await.list_directory(path)
    }

    /// Lists `path` and returns the entries seen.
    pub async fn collect_directory(&self, path: &str) -> Result<Vec<DirEntry>, EnumError> {
        let mut entries = Vec::new();
        self.volume
            .lock()
            .await
            .list_directory_with(path, |entry| entries.push(entry.clone()))?;
        Ok(entries)
    }

    pub async fn create_entries(
        &self,
        base_path: &str,
        names: &EntryNames,
        capacity: usize,
    ) -> Result<CreatedEntries, EntryError> {
        self.volume
            .lock()
            .await
            .create_entries(base_path, names, capacity)
    }

    /// Returns the volume if this is the last handle to it.
    pub fn into_inner(self) -> Option<Volume<F>> {
        Arc::try_unwrap(self.volume).ok().map(Mutex::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{FsType, MemFs};
    use crate::mount::{MountFlags, MountPoint, StorageTarget};

    fn service() -> VolumeService<MemFs> {
        VolumeService::new(Volume::new(
            MemFs::formatted(),
            MountPoint::new(
                FsType::Fat,
                "/SD:",
                StorageTarget::new("SD"),
                MountFlags::default(),
            ),
        ))
    }

    #[tokio::test]
    async fn test_concurrent_listings_are_serialized() {
        let service = service();
        service.mount().await.unwrap();
        service
            .create_entries("/SD:", &EntryNames::default(), 128)
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            tasks.push(tokio::spawn(async move {
                service.list_directory("/SD:").await
            }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap(), Ok(2));
        }

        let volume = service.into_inner().unwrap();
        assert_eq!(volume.driver().stats().dir_opens, 8);
        assert_eq!(volume.driver().stats().dir_closes, 8);
        assert_eq!(volume.driver().open_handles(), 0);
    }

    #[tokio::test]
    async fn test_lifecycle_through_service() {
        let service = service();
        assert_eq!(service.state().await, MountState::Unmounted);

        service.mount().await.unwrap();
        service.verify_remount().await.unwrap();
        assert_eq!(service.state().await, MountState::Mounted);

        let entries = service.collect_directory("/SD:").await.unwrap();
        assert!(entries.is_empty());

        service.unmount().await.unwrap();
        assert!(service.list_directory("/SD:").await.is_err());
    }

    #[test]
    fn test_into_inner_needs_last_handle() {
        let service = service();
        let other = service.clone();
        assert!(service.into_inner().is_none());
        assert!(other.into_inner().is_some());
    }
}
