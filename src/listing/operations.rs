//! Directory listing operations

use log::{error, info, warn};

use crate::error::EnumError;
use crate::fs::{DirEntry, FileSystem};
use crate::listing::DirStream;
use crate::mount::MountPoint;

/// Lists a directory on a mounted filesystem, logging one line per entry.
///
/// Returns the number of entries listed.
pub fn list_directory<F: FileSystem + ?Sized>(
    fs: &mut F,
    mp: &MountPoint,
    path: &str,
) -> Result<u32, EnumError> {
    list_directory_with(fs, mp, path, |_| {})
}

/// Same as `list_directory`, also handing every entry to `visit`.
///
/// The loop stops on the end marker or on a failed read alike. A failed
/// read is reported as `EnumError::ReadFailed` instead of the count; the
/// stream is closed exactly once either way.
pub fn list_directory_with<F, V>(
    fs: &mut F,
    mp: &MountPoint,
    path: &str,
    mut visit: V,
) -> Result<u32, EnumError>
where
    F: FileSystem + ?Sized,
    V: FnMut(&DirEntry),
{
    if !mp.is_mounted() {
        return Err(EnumError::NotMounted {
            path: path.to_string(),
            state: mp.state(),
        });
    }

    let mut stream = DirStream::open(fs, path).map_err(|code| {
        error!("Error opening dir {} [{}]", path, code);
        EnumError::OpenFailed {
            path: path.to_string(),
            code,
        }
    })?;

    info!("Listing dir {} ...", path);
    let mut count = 0u32;
    let outcome = loop {
        match stream.next_entry() {
            Ok(Some(entry)) => {
                info!("{}", entry);
                visit(&entry);
                count += 1;
            }
            Ok(None) => break Ok(()),
            Err(code) => break Err(code),
        }
    };
    info!("Total: {} entries", count);

    let close_code = stream.close();
    if !close_code.is_ok() {
        warn!("Failed to close dir {} [{}]", path, close_code);
    }
    info!("Closed dir {}", path);

    match outcome {
        Ok(()) => Ok(count),
        Err(code) => Err(EnumError::ReadFailed {
            path: path.to_string(),
            code,
            listed: count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{EntryKind, FsCode, FsFaults, FsType, MemFs};
    use crate::mount::{self, MountFlags, MountState, StorageTarget};

    fn setup(fs: &mut MemFs) -> MountPoint {
        let mut mp = MountPoint::new(
            FsType::Fat,
            "/mnt",
            StorageTarget::new("SD"),
            MountFlags::default(),
        );
        mount::mount(fs, &mut mp).unwrap();
        mp
    }

    #[test]
    fn test_empty_directory() {
        let mut fs = MemFs::formatted();
        let mp = setup(&mut fs);

        assert_eq!(list_directory(&mut fs, &mp, "/mnt").unwrap(), 0);
        assert_eq!(fs.stats().dir_opens, 1);
        assert_eq!(fs.stats().dir_closes, 1);
    }

    #[test]
    fn test_mixed_entries_counted_and_classified() {
        let mut fs = MemFs::formatted();
        fs.insert_file("a.txt", b"abc");
        fs.insert_dir("logs");
        fs.insert_file("z.bin", &[0u8; 10]);
        let mp = setup(&mut fs);

        let mut seen = Vec::new();
        let count = list_directory_with(&mut fs, &mp, "/mnt", |entry| {
            seen.push((entry.name.clone(), entry.kind, entry.size));
        })
        .unwrap();

        assert_eq!(count, 3);
        assert_eq!(
            seen,
            vec![
                ("a.txt".to_string(), EntryKind::File, 3),
                ("logs".to_string(), EntryKind::Directory, 0),
                ("z.bin".to_string(), EntryKind::File, 10),
            ]
        );
        assert_eq!(fs.stats().dir_closes, 1);
    }

    #[test]
    fn test_read_failure_mid_stream_closes_once() {
        let mut fs = MemFs::formatted().with_faults(FsFaults {
            read_at: Some(2),
            ..FsFaults::default()
        });
        for name in ["a", "b", "c", "d"] {
            fs.insert_file(name, b"");
        }
        let mp = setup(&mut fs);

        let err = list_directory(&mut fs, &mp, "/mnt").unwrap_err();
        assert_eq!(
            err,
            EnumError::ReadFailed {
                path: "/mnt".into(),
                code: FsCode::IO,
                listed: 2,
            }
        );
        assert_eq!(fs.stats().dir_opens, 1);
        assert_eq!(fs.stats().dir_closes, 1);
        assert_eq!(fs.open_handles(), 0);
    }

    #[test]
    fn test_open_failure_has_nothing_to_close() {
        let mut fs = MemFs::formatted();
        let mp = setup(&mut fs);

        let err = list_directory(&mut fs, &mp, "/mnt/missing").unwrap_err();
        assert_eq!(
            err,
            EnumError::OpenFailed {
                path: "/mnt/missing".into(),
                code: FsCode::NOT_FOUND,
            }
        );
        assert_eq!(fs.stats().dir_closes, 0);
    }

    #[test]
    fn test_listing_requires_mount() {
        let mut fs = MemFs::formatted();
        let mut mp = setup(&mut fs);
        mount::unmount(&mut fs, &mut mp).unwrap();

        let err = list_directory(&mut fs, &mp, "/mnt").unwrap_err();
        assert_eq!(
            err,
            EnumError::NotMounted {
                path: "/mnt".into(),
                state: MountState::Unmounted,
            }
        );
        assert_eq!(fs.stats().dir_opens, 0);
    }
}
