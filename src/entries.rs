//! Sample entry creation
//!
//! Creates a file and a directory side by side under a base path, composing
//! both paths in one bounded buffer.

use log::{error, info, warn};

use crate::error::EntryError;
use crate::fs::{FileSystem, OpenFile, OpenFlags};
use crate::mount::MountPoint;
use crate::path::{PathBuffer, check_fits};

/// Names of the entries created by `create_entries`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryNames {
    pub file_name: String,
    pub dir_name: String,
}

impl Default for EntryNames {
    fn default() -> Self {
        Self {
            file_name: "some.dat".to_string(),
            dir_name: "some".to_string(),
        }
    }
}

/// Paths of the entries that were actually created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEntries {
    pub file_path: String,
    /// `None` when the directory could not be created.
    pub dir_path: Option<String>,
}

/// Creates `base/<file_name>` and then `base/<dir_name>`.
///
/// Both paths are checked against `capacity` before anything is created.
/// The file is required; if the directory cannot be created the failure is
/// logged and the call still succeeds, since the file already exists.
pub fn create_entries<F: FileSystem + ?Sized>(
    fs: &mut F,
    mp: &MountPoint,
    base_path: &str,
    names: &EntryNames,
    capacity: usize,
) -> Result<CreatedEntries, EntryError> {
    if !mp.is_mounted() {
        return Err(EntryError::NotMounted {
            path: base_path.to_string(),
            state: mp.state(),
        });
    }

    for leaf in [&names.file_name, &names.dir_name] {
        if let Err(e) = check_fits(base_path, leaf, capacity) {
            error!("Not enough concatenation buffer to create file paths: {}", e);
            return Err(EntryError::Path(e));
        }
    }

    info!("Creating some dir entries in {}", base_path);
    let mut path = PathBuffer::with_capacity(capacity);
    path.set_child(base_path, &names.file_name)?;

    let file = OpenFile::open(fs, path.as_str(), OpenFlags::create()).map_err(|code| {
        error!("Failed to create file {} [{}]", path, code);
        EntryError::CreateFile {
            path: path.to_string(),
            code,
        }
    })?;
    let code = file.close();
    if !code.is_ok() {
        warn!("Failed to close file {} [{}]", path, code);
    }
    let file_path = path.to_string();

    path.replace_leaf(&names.dir_name)?;
    let code = fs.mkdir(path.as_str());
    let dir_path = if code.is_ok() {
        Some(path.into_string())
    } else {
        error!("Failed to create dir {} [{}]", path, code);
        None
    };

    Ok(CreatedEntries {
        file_path,
        dir_path,
    })
}
