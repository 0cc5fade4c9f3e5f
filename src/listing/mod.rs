//! Directory listing
//!
//! Streams directory contents from a mounted filesystem, one entry at a
//! time, and counts what it saw.

mod operations;
mod stream;

pub use operations::{list_directory, list_directory_with};
pub use stream::DirStream;
