//! Filesystem driver interface
//!
//! Defines the boundary between the mount/listing workflow and the
//! filesystem driver that actually understands the on-media format.
//! Every driver status is an `FsCode`; callers compare it against
//! `FsCode::OK` and nothing else.

pub mod file;
pub mod memfs;

pub use file::OpenFile;
pub use memfs::{FsFaults, FsStats, MemFs};

use serde::Deserialize;
use std::fmt;

use crate::mount::MountPoint;

/// Status code returned by a filesystem driver.
///
/// Negative values follow the errno convention used by embedded
/// filesystem stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FsCode(pub i32);

impl FsCode {
    /// The single canonical success value.
    pub const OK: FsCode = FsCode(0);
    pub const NOT_FOUND: FsCode = FsCode(-2);
    pub const IO: FsCode = FsCode(-5);
    pub const BAD_HANDLE: FsCode = FsCode(-9);
    pub const BUSY: FsCode = FsCode(-16);
    pub const EXISTS: FsCode = FsCode(-17);
    pub const NO_DEVICE: FsCode = FsCode(-19);
    pub const NOT_DIR: FsCode = FsCode(-20);
    pub const IS_DIR: FsCode = FsCode(-21);
    pub const INVALID: FsCode = FsCode(-22);

    /// Returns whether this is the canonical success code.
    pub fn is_ok(self) -> bool {
        self == FsCode::OK
    }

    /// Converts the code into a `Result`, keeping the failing code as the error.
    pub fn into_result(self) -> Result<(), FsCode> {
        if self.is_ok() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Filesystem type tag carried by a mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FsType {
    /// FAT volume (ELM FatFs style drive naming)
    Fat,
    /// ext2 volume
    Ext2,
}

impl FsType {
    /// Default storage device name for this filesystem type.
    pub fn default_drive_name(self) -> &'static str {
        match self {
            FsType::Fat => "SD",
            FsType::Ext2 => "SDMMC",
        }
    }

    /// Default mount point for this filesystem type.
    ///
    /// FAT drivers can only mount volume strings of the form `/<drive>:`.
    pub fn default_mount_point(self) -> &'static str {
        match self {
            FsType::Fat => "/SD:",
            FsType::Ext2 => "/ext",
        }
    }

    /// Whether mounts of this type suppress formatting unless told otherwise.
    pub fn suppresses_format(self) -> bool {
        matches!(self, FsType::Ext2)
    }
}

impl fmt::Display for FsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsType::Fat => write!(f, "fatfs"),
            FsType::Ext2 => write!(f, "ext2"),
        }
    }
}

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A single entry pulled from a directory stream.
///
/// An entry with an empty name is the end-of-stream marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
}

impl DirEntry {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            size,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            size: 0,
        }
    }

    /// The end-of-stream marker.
    pub fn end() -> Self {
        Self::file(String::new(), 0)
    }

    pub fn is_end(&self) -> bool {
        self.name.is_empty()
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

impl fmt::Display for DirEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntryKind::Directory => write!(f, "[DIR ] {}", self.name),
            EntryKind::File => write!(f, "[FILE] {} (size = {})", self.name, self.size),
        }
    }
}

/// Opaque handle to an open directory stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirHandle(pub u32);

/// Opaque handle to an open file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileHandle(pub u32);

/// Flags used when opening a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenFlags {
    pub read: bool,
    pub write: bool,
    pub create: bool,
}

impl OpenFlags {
    /// Create the file if missing, no data access.
    pub const fn create() -> Self {
        Self {
            read: false,
            write: false,
            create: true,
        }
    }

    pub const fn read_only() -> Self {
        Self {
            read: true,
            write: false,
            create: false,
        }
    }

    pub const fn read_write() -> Self {
        Self {
            read: true,
            write: true,
            create: false,
        }
    }
}

/// Operations a filesystem driver exposes to the workflow.
///
/// Paths are absolute and include the mount point prefix.
pub trait FileSystem {
    fn mount(&mut self, mount_point: &MountPoint) -> FsCode;

    fn unmount(&mut self, mount_point: &MountPoint) -> FsCode;

    fn open_dir(&mut self, path: &str) -> Result<DirHandle, FsCode>;

    /// Pulls the next entry. Returns `DirEntry::end()` once exhausted.
    fn read_dir(&mut self, dir: DirHandle) -> Result<DirEntry, FsCode>;

    fn close_dir(&mut self, dir: DirHandle) -> FsCode;

    fn open(&mut self, path: &str, flags: OpenFlags) -> Result<FileHandle, FsCode>;

    fn read(&mut self, file: FileHandle, buf: &mut [u8]) -> Result<usize, FsCode>;

    fn write(&mut self, file: FileHandle, data: &[u8]) -> Result<usize, FsCode>;

    fn close(&mut self, file: FileHandle) -> FsCode;

    fn mkdir(&mut self, path: &str) -> FsCode;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_zero_is_success() {
        assert!(FsCode::OK.is_ok());
        assert!(!FsCode::IO.is_ok());
        assert!(!FsCode(1).is_ok());
        assert_eq!(FsCode::BUSY.into_result(), Err(FsCode::BUSY));
        assert_eq!(FsCode::OK.into_result(), Ok(()));
    }

    #[test]
    fn test_entry_lines() {
        assert_eq!(DirEntry::directory("some").to_string(), "[DIR ] some");
        assert_eq!(
            DirEntry::file("some.dat", 12).to_string(),
            "[FILE] some.dat (size = 12)"
        );
        assert!(DirEntry::end().is_end());
        assert!(!DirEntry::directory("a").is_end());
    }

    #[test]
    fn test_fs_type_defaults() {
        assert_eq!(FsType::Fat.default_mount_point(), "/SD:");
        assert_eq!(FsType::Fat.default_drive_name(), "SD");
        assert_eq!(FsType::Ext2.default_mount_point(), "/ext");
        assert!(FsType::Ext2.suppresses_format());
        assert!(!FsType::Fat.suppresses_format());
    }
}
