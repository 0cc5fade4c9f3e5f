//! Fixed-capacity path buffer
//!
//! Paths are composed as `base` + `/` + `leaf` into a buffer whose capacity
//! counts a trailing terminator, the way an on-stack C path buffer would.
//! Nothing is written unless the whole result fits.

use std::fmt;

use crate::error::PathError;
use crate::utils::validation::is_valid_name;

pub const SEPARATOR: char = '/';

/// Bytes needed to hold `base/leaf` plus the terminator.
pub fn required_len(base: &str, leaf: &str) -> usize {
    base.len()
        .saturating_add(leaf.len())
        .saturating_add(2)
}

/// Checks that `base/leaf` is a valid child path that fits `capacity`.
pub fn check_fits(base: &str, leaf: &str, capacity: usize) -> Result<(), PathError> {
    if !is_valid_name(leaf) {
        return Err(PathError::InvalidName(leaf.to_string()));
    }
    let required = required_len(base, leaf);
    if required > capacity {
        return Err(PathError::TooLong { required, capacity });
    }
    Ok(())
}

/// Composes `base/leaf` into a new buffer of the given capacity.
pub fn compose_child_path(base: &str, leaf: &str, capacity: usize) -> Result<PathBuffer, PathError> {
    let mut path = PathBuffer::with_capacity(capacity);
    path.set_child(base, leaf)?;
    Ok(path)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBuffer {
    text: String,
    capacity: usize,
    /// Length of the base plus separator, once a child path is set.
    leaf_offset: Option<usize>,
}

impl PathBuffer {
    /// An empty buffer. `capacity` includes the terminator and only bounds
    /// the content; storage grows with the path actually held.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::new(),
            capacity,
            leaf_offset: None,
        }
    }

    /// Replaces the content with `base/leaf`.
    ///
    /// On error the previous content is left as it was.
    pub fn set_child(&mut self, base: &str, leaf: &str) -> Result<(), PathError> {
        check_fits(base, leaf, self.capacity)?;

        self.text.clear();
        self.text.push_str(base);
        self.text.push(SEPARATOR);
        self.leaf_offset = Some(self.text.len());
        self.text.push_str(leaf);
        Ok(())
    }

    /// Swaps the leaf of the current child path for another, keeping the base.
    pub fn replace_leaf(&mut self, leaf: &str) -> Result<(), PathError> {
        let offset = self.leaf_offset.ok_or(PathError::NoBase)?;
        let base = &self.text[..offset - SEPARATOR.len_utf8()];
        check_fits(base, leaf, self.capacity)?;

        self.text.truncate(offset);
        self.text.push_str(leaf);
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Capacity in bytes, terminator included.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for PathBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
