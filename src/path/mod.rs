//! Bounded path composition

mod buffer;

pub use buffer::{PathBuffer, SEPARATOR, check_fits, compose_child_path, required_len};
