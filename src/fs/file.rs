//! Scoped file handle
//!
//! `OpenFile` pairs a driver `open` with exactly one `close`, either an
//! explicit `close()` or the one issued when the guard is dropped.

use log::warn;

use crate::fs::{FileHandle, FileSystem, FsCode, OpenFlags};

pub struct OpenFile<'a, F: FileSystem + ?Sized> {
    fs: &'a mut F,
    handle: FileHandle,
    path: String,
    open: bool,
}

impl<'a, F: FileSystem + ?Sized> OpenFile<'a, F> {
    /// Opens `path` on the driver with the given flags.
    pub fn open(fs: &'a mut F, path: &str, flags: OpenFlags) -> Result<Self, FsCode> {
        let handle = fs.open(path, flags)?;
        Ok(Self {
            fs,
            handle,
            path: path.to_string(),
            open: true,
        })
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsCode> {
        self.fs.read(self.handle, buf)
    }

    pub fn write(&mut self, data: &[u8]) -> Result<usize, FsCode> {
        self.fs.write(self.handle, data)
    }

    /// Writes the whole buffer, failing if the driver stops short.
    pub fn write_all(&mut self, mut data: &[u8]) -> Result<(), FsCode> {
        while !data.is_empty() {
            let n = self.write(data)?;
            if n == 0 {
                return Err(FsCode::IO);
            }
            data = &data[n..];
        }
        Ok(())
    }

    /// Reads until the driver reports end of file.
    pub fn read_to_end(&mut self, out: &mut Vec<u8>) -> Result<usize, FsCode> {
        let mut chunk = [0u8; 64];
        let mut total = 0;
        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                return Ok(total);
            }
            out.extend_from_slice(&chunk[..n]);
            total += n;
        }
    }

    /// Closes the file and returns the driver status.
    pub fn close(mut self) -> FsCode {
        self.open = false;
        self.fs.close(self.handle)
    }
}

impl<F: FileSystem + ?Sized> Drop for OpenFile<'_, F> {
    fn drop(&mut self) {
        if self.open {
            let code = self.fs.close(self.handle);
            if !code.is_ok() {
                warn!("Failed to close file {} [{}]", self.path, code);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{FsType, MemFs};
    use crate::mount::{MountFlags, MountPoint, StorageTarget};

    fn mounted() -> MemFs {
        let mut fs = MemFs::formatted();
        let mp = MountPoint::new(
            FsType::Fat,
            "/SD:",
            StorageTarget::new("SD"),
            MountFlags::default(),
        );
        assert_eq!(fs.mount(&mp), FsCode::OK);
        fs
    }

    #[test]
    fn test_write_then_read_back() {
        let mut fs = mounted();

        let flags = OpenFlags {
            create: true,
            ..OpenFlags::read_write()
        };
        let mut file = OpenFile::open(&mut fs, "/SD:/text.txt", flags).unwrap();
        file.write_all(b"Line 1\n").unwrap();
        assert_eq!(file.close(), FsCode::OK);

        let mut file = OpenFile::open(&mut fs, "/SD:/text.txt", OpenFlags::read_only()).unwrap();
        let mut data = Vec::new();
        assert_eq!(file.read_to_end(&mut data).unwrap(), 7);
        assert_eq!(data, b"Line 1\n");
        drop(file);

        assert_eq!(fs.stats().file_opens, 2);
        assert_eq!(fs.stats().file_closes, 2);
    }

    #[test]
    fn test_drop_closes_once() {
        let mut fs = mounted();
        {
            let _file = OpenFile::open(&mut fs, "/SD:/a.bin", OpenFlags::create()).unwrap();
        }
        assert_eq!(fs.stats().file_closes, 1);
        assert_eq!(fs.open_handles(), 0);
    }

    #[test]
    fn test_open_missing_without_create_fails() {
        let mut fs = mounted();
        let result = OpenFile::open(&mut fs, "/SD:/missing", OpenFlags::read_only());
        assert_eq!(result.err(), Some(FsCode::NOT_FOUND));
        assert_eq!(fs.stats().file_closes, 0);
    }
}
