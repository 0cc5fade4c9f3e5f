//! Directory stream
//!
//! Scoped cursor over a directory: the driver handle is closed exactly
//! once, by `close()` or on drop.

use log::warn;

use crate::fs::{DirEntry, DirHandle, FileSystem, FsCode};

pub struct DirStream<'a, F: FileSystem + ?Sized> {
    fs: &'a mut F,
    handle: DirHandle,
    path: String,
    open: bool,
}

impl<'a, F: FileSystem + ?Sized> DirStream<'a, F> {
    /// Opens a stream at `path`. Nothing needs closing if this fails.
    pub fn open(fs: &'a mut F, path: &str) -> Result<Self, FsCode> {
        let handle = fs.open_dir(path)?;
        Ok(Self {
            fs,
            handle,
            path: path.to_string(),
            open: true,
        })
    }

    /// Pulls the next entry. `Ok(None)` once the end marker is reached.
    pub fn next_entry(&mut self) -> Result<Option<DirEntry>, FsCode> {
        let entry = self.fs.read_dir(self.handle)?;
        if entry.is_end() {
            Ok(None)
        } else {
            Ok(Some(entry))
        }
    }

    /// Closes the stream and returns the driver status.
    pub fn close(mut self) -> FsCode {
        self.open = false;
        self.fs.close_dir(self.handle)
    }
}

impl<F: FileSystem + ?Sized> Drop for DirStream<'_, F> {
    fn drop(&mut self) {
        if self.open {
            let code = self.fs.close_dir(self.handle);
            if !code.is_ok() {
                warn!("Failed to close dir {} [{}]", self.path, code);
            }
        }
    }
}
