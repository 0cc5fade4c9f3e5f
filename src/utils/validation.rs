//! Name validation utilities
//!
//! Checks applied to entry names and mount paths before they reach a driver.

/// Longest entry name accepted, in bytes.
pub const MAX_NAME_LEN: usize = 255;

/// Validate that a single path component is usable as an entry name
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\0')
}

/// Validate that a mount path is absolute and has no empty or NUL components
pub fn is_valid_mount_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.contains('\0')
        && (path == "/" || !path.ends_with('/'))
        && !path.contains("//")
}
