//! Error types
//!
//! Defines domain-specific error types for each stage of the storage sample.

use std::fmt;

use crate::fs::FsCode;
use crate::mount::MountState;

/// Block device probe errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    InitFailed { device: String, reason: String },
    QueryFailed {
        device: String,
        query: &'static str,
        reason: String,
    },
    DeinitFailed { device: String, reason: String },
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::InitFailed { device, reason } => {
                write!(f, "Storage init failed on {}: {}", device, reason)
            }
            DeviceError::QueryFailed {
                device,
                query,
                reason,
            } => write!(f, "Unable to get {} of {}: {}", query, device, reason),
            DeviceError::DeinitFailed { device, reason } => {
                write!(f, "Storage deinit failed on {}: {}", device, reason)
            }
        }
    }
}

impl std::error::Error for DeviceError {}

/// Mount controller errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    /// The request does not apply to the mount point's current state.
    InvalidState { path: String, state: MountState },
    MountFailed { path: String, code: FsCode },
    UnmountFailed { path: String, code: FsCode },
    RemountFailed { path: String, code: FsCode },
}

impl MountError {
    /// Driver status behind the error, if a driver call failed.
    pub fn code(&self) -> Option<FsCode> {
        match self {
            MountError::InvalidState { .. } => None,
            MountError::MountFailed { code, .. }
            | MountError::UnmountFailed { code, .. }
            | MountError::RemountFailed { code, .. } => Some(*code),
        }
    }
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::InvalidState { path, state } => {
                write!(f, "Mount point {} is {}", path, state)
            }
            MountError::MountFailed { path, code } => {
                write!(f, "Error mounting disk at {} [{}]", path, code)
            }
            MountError::UnmountFailed { path, code } => {
                write!(f, "Error unmounting disk at {} [{}]", path, code)
            }
            MountError::RemountFailed { path, code } => {
                write!(f, "Error remounting disk at {} [{}]", path, code)
            }
        }
    }
}

impl std::error::Error for MountError {}

/// Directory listing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumError {
    NotMounted { path: String, state: MountState },
    OpenFailed { path: String, code: FsCode },
    /// The stream ended on a failed read after `listed` entries.
    ReadFailed {
        path: String,
        code: FsCode,
        listed: u32,
    },
}

impl EnumError {
    pub fn code(&self) -> Option<FsCode> {
        match self {
            EnumError::NotMounted { .. } => None,
            EnumError::OpenFailed { code, .. } | EnumError::ReadFailed { code, .. } => Some(*code),
        }
    }
}

impl fmt::Display for EnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumError::NotMounted { path, state } => {
                write!(f, "Cannot list {}: mount point is {}", path, state)
            }
            EnumError::OpenFailed { path, code } => {
                write!(f, "Error opening dir {} [{}]", path, code)
            }
            EnumError::ReadFailed { path, code, listed } => write!(
                f,
                "Error reading dir {} after {} entries [{}]",
                path, listed, code
            ),
        }
    }
}

impl std::error::Error for EnumError {}

/// Path composition errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// `required` bytes (terminator included) do not fit in `capacity`.
    TooLong { required: usize, capacity: usize },
    InvalidName(String),
    /// No child path has been composed yet.
    NoBase,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::TooLong { required, capacity } => write!(
                f,
                "Path needs {} bytes but the buffer holds {}",
                required, capacity
            ),
            PathError::InvalidName(name) => write!(f, "Invalid entry name: {:?}", name),
            PathError::NoBase => write!(f, "No base path set"),
        }
    }
}

impl std::error::Error for PathError {}

/// Entry creation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    NotMounted { path: String, state: MountState },
    Path(PathError),
    CreateFile { path: String, code: FsCode },
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryError::NotMounted { path, state } => {
                write!(f, "Cannot create entries in {}: mount point is {}", path, state)
            }
            EntryError::Path(e) => write!(f, "Not enough concatenation buffer: {}", e),
            EntryError::CreateFile { path, code } => {
                write!(f, "Failed to create file {} [{}]", path, code)
            }
        }
    }
}

impl std::error::Error for EntryError {}

impl From<PathError> for EntryError {
    fn from(error: PathError) -> Self {
        EntryError::Path(error)
    }
}

/// General sample error that encompasses all error types
#[derive(Debug)]
pub enum SampleError {
    Config(config::ConfigError),
    Device(DeviceError),
    Mount(MountError),
    Enum(EnumError),
    Entry(EntryError),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::Config(e) => write!(f, "Configuration error: {}", e),
            SampleError::Device(e) => write!(f, "Device error: {}", e),
            SampleError::Mount(e) => write!(f, "Mount error: {}", e),
            SampleError::Enum(e) => write!(f, "Listing error: {}", e),
            SampleError::Entry(e) => write!(f, "Entry error: {}", e),
        }
    }
}

impl std::error::Error for SampleError {}

// Implement conversions from specific errors to SampleError
impl From<config::ConfigError> for SampleError {
    fn from(error: config::ConfigError) -> Self {
        SampleError::Config(error)
    }
}

impl From<DeviceError> for SampleError {
    fn from(error: DeviceError) -> Self {
        SampleError::Device(error)
    }
}

impl From<MountError> for SampleError {
    fn from(error: MountError) -> Self {
        SampleError::Mount(error)
    }
}

impl From<EnumError> for SampleError {
    fn from(error: EnumError) -> Self {
        SampleError::Enum(error)
    }
}

impl From<EntryError> for SampleError {
    fn from(error: EntryError) -> Self {
        SampleError::Entry(error)
    }
}
