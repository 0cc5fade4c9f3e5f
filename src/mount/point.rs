//! Mount point descriptor
//!
//! Describes what gets mounted where, and tracks the lifecycle state the
//! mount controller drives it through.

use std::fmt;

use crate::fs::FsType;

/// Name of the physical block device backing a mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageTarget(String);

impl StorageTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flags handed to the driver at mount time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MountFlags {
    /// Do not format the media if no valid filesystem is found.
    pub no_format: bool,
}

/// Lifecycle state of a mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState {
    Unmounted,
    Mounted,
    /// A driver call failed. Only a fresh mount attempt leaves this state.
    Failed,
}

impl fmt::Display for MountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountState::Unmounted => write!(f, "unmounted"),
            MountState::Mounted => write!(f, "mounted"),
            MountState::Failed => write!(f, "failed"),
        }
    }
}

/// A filesystem type bound to a storage target at a mount path.
#[derive(Debug, Clone)]
pub struct MountPoint {
    fs_type: FsType,
    path: String,
    storage: StorageTarget,
    flags: MountFlags,
    state: MountState,
}

impl MountPoint {
    pub fn new(
        fs_type: FsType,
        path: impl Into<String>,
        storage: StorageTarget,
        flags: MountFlags,
    ) -> Self {
        Self {
            fs_type,
            path: path.into(),
            storage,
            flags,
            state: MountState::Unmounted,
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn fs_type(&self) -> FsType {
        self.fs_type
    }

    /// Mount path, e.g. `/SD:` or `/ext`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn storage(&self) -> &StorageTarget {
        &self.storage
    }

    pub fn flags(&self) -> MountFlags {
        self.flags
    }

    pub fn state(&self) -> MountState {
        self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.state == MountState::Mounted
    }

    pub(crate) fn set_state(&mut self, state: MountState) {
        self.state = state;
    }
}
