//! RAX FS Sample
//!
//! Block storage bring-up: probe a raw block device, mount a filesystem on
//! it, check that it survives an unmount/remount cycle, and list and
//! populate its root directory through bounded paths.

pub mod app;
pub mod config;
pub mod disk;
pub mod entries;
pub mod error;
pub mod fs;
pub mod listing;
pub mod mount;
pub mod path;
pub mod service;
pub mod utils;

pub use mount::Volume;
