//! RAM-backed filesystem driver
//!
//! Keeps a directory tree in memory that survives unmount/remount the way
//! media contents would. Used to run the sample on a host and to drive the
//! workflow through failure paths (see `FsFaults`).

use log::{debug, info};
use std::collections::{BTreeMap, HashMap};

use crate::fs::{DirEntry, DirHandle, FileHandle, FileSystem, FsCode, OpenFlags};
use crate::mount::MountPoint;

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
}

#[derive(Debug)]
struct DirCursor {
    entries: Vec<DirEntry>,
    pos: usize,
}

#[derive(Debug)]
struct OpenNode {
    key: String,
    pos: usize,
    flags: OpenFlags,
}

/// Failures to inject into driver calls.
#[derive(Debug, Clone, Default)]
pub struct FsFaults {
    /// Every mount returns this code.
    pub mount: Option<FsCode>,
    /// Only the nth mount call (1-based) fails, with `FsCode::IO`.
    pub mount_attempt: Option<u32>,
    pub unmount: Option<FsCode>,
    pub open_dir: Option<FsCode>,
    /// Reading the entry at this index of a stream fails with `FsCode::IO`.
    pub read_at: Option<usize>,
    /// Creating a new file fails with this code.
    pub create_file: Option<FsCode>,
    pub mkdir: Option<FsCode>,
}

/// Driver call counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FsStats {
    pub mount_calls: u32,
    pub unmount_calls: u32,
    pub dir_opens: u32,
    pub dir_closes: u32,
    pub file_opens: u32,
    pub file_closes: u32,
    pub files_created: u32,
    pub mkdir_calls: u32,
}

#[derive(Debug, Default)]
pub struct MemFs {
    /// `None` until the volume is formatted.
    volume: Option<BTreeMap<String, Node>>,
    mounted_at: Option<String>,
    dirs: HashMap<u32, DirCursor>,
    files: HashMap<u32, OpenNode>,
    next_handle: u32,
    faults: FsFaults,
    stats: FsStats,
}

impl MemFs {
    /// An unformatted volume.
    pub fn blank() -> Self {
        Self::default()
    }

    /// An empty, formatted volume.
    pub fn formatted() -> Self {
        Self {
            volume: Some(BTreeMap::new()),
            ..Self::default()
        }
    }

    pub fn with_faults(mut self, faults: FsFaults) -> Self {
        self.faults = faults;
        self
    }

    pub fn faults_mut(&mut self) -> &mut FsFaults {
        &mut self.faults
    }

    pub fn stats(&self) -> &FsStats {
        &self.stats
    }

    pub fn is_formatted(&self) -> bool {
        self.volume.is_some()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted_at.is_some()
    }

    /// Number of directory streams and files currently open.
    pub fn open_handles(&self) -> usize {
        self.dirs.len() + self.files.len()
    }

    /// Seeds a file at a volume-relative path (no mount prefix).
    pub fn insert_file(&mut self, path: &str, data: &[u8]) {
        let key = normalize(path);
        self.volume
            .get_or_insert_with(BTreeMap::new)
            .insert(key, Node::File(data.to_vec()));
    }

    /// Seeds a directory at a volume-relative path (no mount prefix).
    pub fn insert_dir(&mut self, path: &str) {
        let key = normalize(path);
        self.volume
            .get_or_insert_with(BTreeMap::new)
            .insert(key, Node::Dir);
    }

    /// Whether a volume-relative path exists, and is a directory.
    pub fn lookup(&self, path: &str) -> Option<bool> {
        let key = normalize(path);
        match self.volume.as_ref()?.get(&key)? {
            Node::Dir => Some(true),
            Node::File(_) => Some(false),
        }
    }

    fn next_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Maps an absolute path under the mount point to a volume key.
    fn resolve(&self, path: &str) -> Result<String, FsCode> {
        let root = self.mounted_at.as_deref().ok_or(FsCode::NO_DEVICE)?;
        let rest = path
            .strip_prefix(root.trim_end_matches('/'))
            .ok_or(FsCode::NOT_FOUND)?;
        if rest.is_empty() {
            return Ok(String::new());
        }
        let rest = rest.strip_prefix('/').ok_or(FsCode::NOT_FOUND)?;
        Ok(normalize(rest))
    }

    fn volume(&self) -> Result<&BTreeMap<String, Node>, FsCode> {
        self.volume.as_ref().ok_or(FsCode::NO_DEVICE)
    }

    fn volume_mut(&mut self) -> Result<&mut BTreeMap<String, Node>, FsCode> {
        self.volume.as_mut().ok_or(FsCode::NO_DEVICE)
    }

    fn parent_is_dir(&self, key: &str) -> Result<bool, FsCode> {
        let volume = self.volume()?;
        Ok(match key.rsplit_once('/') {
            None => true,
            Some((parent, _)) => matches!(volume.get(parent), Some(Node::Dir)),
        })
    }
}

fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn children(volume: &BTreeMap<String, Node>, dir: &str) -> Vec<DirEntry> {
    volume
        .iter()
        .filter_map(|(key, node)| {
            let name = if dir.is_empty() {
                key.as_str()
            } else {
                key.strip_prefix(dir)?.strip_prefix('/')?
            };
            if name.contains('/') {
                return None;
            }
            Some(match node {
                Node::File(data) => DirEntry::file(name, data.len() as u64),
                Node::Dir => DirEntry::directory(name),
            })
        })
        .collect()
}

impl FileSystem for MemFs {
    fn mount(&mut self, mount_point: &MountPoint) -> FsCode {
        self.stats.mount_calls += 1;

        if self.mounted_at.is_some() {
            return FsCode::BUSY;
        }
        if let Some(code) = self.faults.mount {
            return code;
        }
        if self.faults.mount_attempt == Some(self.stats.mount_calls) {
            return FsCode::IO;
        }

        if self.volume.is_none() {
            if mount_point.flags().no_format {
                return FsCode::NO_DEVICE;
            }
            info!(
                "Formatting {} as {}",
                mount_point.storage(),
                mount_point.fs_type()
            );
            self.volume = Some(BTreeMap::new());
        }

        self.mounted_at = Some(mount_point.path().to_string());
        FsCode::OK
    }

    fn unmount(&mut self, _mount_point: &MountPoint) -> FsCode {
        self.stats.unmount_calls += 1;

        if self.mounted_at.is_none() {
            return FsCode::INVALID;
        }
        if let Some(code) = self.faults.unmount {
            return code;
        }
        if self.open_handles() > 0 {
            return FsCode::BUSY;
        }

        self.mounted_at = None;
        FsCode::OK
    }

    fn open_dir(&mut self, path: &str) -> Result<DirHandle, FsCode> {
        if let Some(code) = self.faults.open_dir {
            return Err(code);
        }
        let key = self.resolve(path)?;
        let volume = self.volume()?;

        if !key.is_empty() {
            match volume.get(&key) {
                Some(Node::Dir) => {}
                Some(Node::File(_)) => return Err(FsCode::NOT_DIR),
                None => return Err(FsCode::NOT_FOUND),
            }
        }

        let entries = children(volume, &key);
        let id = self.next_handle();
        self.dirs.insert(id, DirCursor { entries, pos: 0 });
        self.stats.dir_opens += 1;
        debug!("Opened dir {} as handle {}", path, id);
        Ok(DirHandle(id))
    }

    fn read_dir(&mut self, dir: DirHandle) -> Result<DirEntry, FsCode> {
        let fail_at = self.faults.read_at;
        let cursor = self.dirs.get_mut(&dir.0).ok_or(FsCode::BAD_HANDLE)?;

        if fail_at == Some(cursor.pos) {
            return Err(FsCode::IO);
        }

        match cursor.entries.get(cursor.pos) {
            Some(entry) => {
                cursor.pos += 1;
                Ok(entry.clone())
            }
            None => Ok(DirEntry::end()),
        }
    }

    fn close_dir(&mut self, dir: DirHandle) -> FsCode {
        self.stats.dir_closes += 1;
        match self.dirs.remove(&dir.0) {
            Some(_) => FsCode::OK,
            None => FsCode::BAD_HANDLE,
        }
    }

    fn open(&mut self, path: &str, flags: OpenFlags) -> Result<FileHandle, FsCode> {
        let key = self.resolve(path)?;
        if key.is_empty() {
            return Err(FsCode::IS_DIR);
        }

        let is_dir = self
            .volume()?
            .get(&key)
            .map(|node| matches!(node, Node::Dir));
        match is_dir {
            Some(true) => return Err(FsCode::IS_DIR),
            Some(false) => {}
            None if !flags.create => return Err(FsCode::NOT_FOUND),
            None => {
                if let Some(code) = self.faults.create_file {
                    return Err(code);
                }
                if !self.parent_is_dir(&key)? {
                    return Err(FsCode::NOT_FOUND);
                }
                self.volume_mut()?.insert(key.clone(), Node::File(Vec::new()));
                self.stats.files_created += 1;
            }
        }

        let id = self.next_handle();
        self.files.insert(id, OpenNode { key, pos: 0, flags });
        self.stats.file_opens += 1;
        Ok(FileHandle(id))
    }

    fn read(&mut self, file: FileHandle, buf: &mut [u8]) -> Result<usize, FsCode> {
        let open = self.files.get_mut(&file.0).ok_or(FsCode::BAD_HANDLE)?;
        if !open.flags.read {
            return Err(FsCode::INVALID);
        }
        let data = match self.volume.as_ref().and_then(|v| v.get(&open.key)) {
            Some(Node::File(data)) => data,
            _ => return Err(FsCode::IO),
        };

        let start = open.pos.min(data.len());
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        open.pos += n;
        Ok(n)
    }

    fn write(&mut self, file: FileHandle, data: &[u8]) -> Result<usize, FsCode> {
        let open = self.files.get_mut(&file.0).ok_or(FsCode::BAD_HANDLE)?;
        if !open.flags.write {
            return Err(FsCode::INVALID);
        }
        let contents = match self.volume.as_mut().and_then(|v| v.get_mut(&open.key)) {
            Some(Node::File(contents)) => contents,
            _ => return Err(FsCode::IO),
        };

        let end = open.pos + data.len();
        if contents.len() < end {
            contents.resize(end, 0);
        }
        contents[open.pos..end].copy_from_slice(data);
        open.pos = end;
        Ok(data.len())
    }

    fn close(&mut self, file: FileHandle) -> FsCode {
        self.stats.file_closes += 1;
        match self.files.remove(&file.0) {
            Some(_) => FsCode::OK,
            None => FsCode::BAD_HANDLE,
        }
    }

    fn mkdir(&mut self, path: &str) -> FsCode {
        self.stats.mkdir_calls += 1;

        if let Some(code) = self.faults.mkdir {
            return code;
        }
        let key = match self.resolve(path) {
            Ok(key) if key.is_empty() => return FsCode::EXISTS,
            Ok(key) => key,
            Err(code) => return code,
        };
        match self.parent_is_dir(&key) {
            Ok(true) => {}
            Ok(false) => return FsCode::NOT_FOUND,
            Err(code) => return code,
        }

        match self.volume_mut() {
            Ok(volume) if volume.contains_key(&key) => FsCode::EXISTS,
            Ok(volume) => {
                volume.insert(key, Node::Dir);
                FsCode::OK
            }
            Err(code) => code,
        }
    }
}
