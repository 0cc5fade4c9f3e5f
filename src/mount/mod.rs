//! Mount management
//!
//! Handles the mount point descriptor, the mount/unmount/remount lifecycle,
//! and the volume that ties a driver to its mount point.

pub mod controller;
pub mod point;
pub mod volume;

pub use controller::{mount, unmount, verify_remount};
pub use point::{MountFlags, MountPoint, MountState, StorageTarget};
pub use volume::Volume;
