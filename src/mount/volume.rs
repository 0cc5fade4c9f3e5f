//! Volume
//!
//! Owns a filesystem driver together with the single mount point bound to
//! it. `Volume::new` and `Volume::teardown` are the init/teardown pair; all
//! mount, listing and entry operations go through `&mut Volume`.

use log::{info, warn};

use crate::entries::{self, CreatedEntries, EntryNames};
use crate::error::{EntryError, EnumError, MountError};
use crate::fs::{DirEntry, FileSystem};
use crate::listing;
use crate::mount::{MountPoint, MountState, controller};

pub struct Volume<F: FileSystem> {
    fs: F,
    mount_point: MountPoint,
}

impl<F: FileSystem> Volume<F> {
    pub fn new(fs: F, mount_point: MountPoint) -> Self {
        Self { fs, mount_point }
    }

    pub fn mount_point(&self) -> &MountPoint {
        &self.mount_point
    }

    pub fn state(&self) -> MountState {
        self.mount_point.state()
    }

    pub fn driver(&self) -> &F {
        &self.fs
    }

    pub fn driver_mut(&mut self) -> &mut F {
        &mut self.fs
    }

    pub fn mount(&mut self) -> Result<(), MountError> {
        controller::mount(&mut self.fs, &mut self.mount_point)
    }

    pub fn unmount(&mut self) -> Result<(), MountError> {
        controller::unmount(&mut self.fs, &mut self.mount_point)
    }

    pub fn verify_remount(&mut self) -> Result<(), MountError> {
        controller::verify_remount(&mut self.fs, &mut self.mount_point)
    }

    pub fn list_directory(&mut self, path: &str) -> Result<u32, EnumError> {
        listing::list_directory(&mut self.fs, &self.mount_point, path)
    }

    pub fn list_directory_with<V: FnMut(&DirEntry)>(
        &mut self,
        path: &str,
        visit: V,
    ) -> Result<u32, EnumError> {
        listing::list_directory_with(&mut self.fs, &self.mount_point, path, visit)
    }

    pub fn create_entries(
        &mut self,
        base_path: &str,
        names: &EntryNames,
        capacity: usize,
    ) -> Result<CreatedEntries, EntryError> {
        entries::create_entries(&mut self.fs, &self.mount_point, base_path, names, capacity)
    }

    /// Unmounts if currently mounted. Failures are logged.
    pub fn shutdown(&mut self) {
        if !self.mount_point.is_mounted() {
            return;
        }
        if let Err(e) = self.unmount() {
            warn!("Unmount during shutdown failed: {}", e);
        }
    }

    /// Shuts the volume down and hands back the driver.
    pub fn teardown(mut self) -> F {
        self.shutdown();
        info!(
            "Released mount point {} ({})",
            self.mount_point.path(),
            self.mount_point.state()
        );
        self.fs
    }
}
