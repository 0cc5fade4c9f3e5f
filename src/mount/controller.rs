//! Mount controller
//!
//! Drives a `MountPoint` through mount, unmount and the unmount/remount
//! self-test. Every driver status is compared against `FsCode::OK`; any
//! other code moves the mount point to `MountState::Failed`.

use log::{error, info};

use crate::error::MountError;
use crate::fs::{FileSystem, FsCode};
use crate::mount::{MountPoint, MountState};

/// Mounts the filesystem. Allowed from `Unmounted` or `Failed`.
pub fn mount<F: FileSystem + ?Sized>(fs: &mut F, mp: &mut MountPoint) -> Result<(), MountError> {
    if mp.state() == MountState::Mounted {
        return Err(MountError::InvalidState {
            path: mp.path().to_string(),
            state: mp.state(),
        });
    }

    let code = fs.mount(mp);
    if code != FsCode::OK {
        error!("Error mounting disk {} at {} [{}]", mp.storage(), mp.path(), code);
        mp.set_state(MountState::Failed);
        return Err(MountError::MountFailed {
            path: mp.path().to_string(),
            code,
        });
    }

    mp.set_state(MountState::Mounted);
    info!("Disk {} mounted at {} ({})", mp.storage(), mp.path(), mp.fs_type());
    Ok(())
}

/// Unmounts the filesystem. Only allowed from `Mounted`.
pub fn unmount<F: FileSystem + ?Sized>(fs: &mut F, mp: &mut MountPoint) -> Result<(), MountError> {
    if mp.state() != MountState::Mounted {
        return Err(MountError::InvalidState {
            path: mp.path().to_string(),
            state: mp.state(),
        });
    }

    let code = fs.unmount(mp);
    if code != FsCode::OK {
        error!("Error unmounting disk at {} [{}]", mp.path(), code);
        mp.set_state(MountState::Failed);
        return Err(MountError::UnmountFailed {
            path: mp.path().to_string(),
            code,
        });
    }

    mp.set_state(MountState::Unmounted);
    info!("Disk unmounted from {}", mp.path());
    Ok(())
}

/// Unmounts and remounts a mounted filesystem to check that the driver
/// releases and reacquires its state cleanly.
///
/// On failure the mount point is left `Failed` and the filesystem must be
/// treated as unavailable.
pub fn verify_remount<F: FileSystem + ?Sized>(
    fs: &mut F,
    mp: &mut MountPoint,
) -> Result<(), MountError> {
    if mp.state() != MountState::Mounted {
        return Err(MountError::InvalidState {
            path: mp.path().to_string(),
            state: mp.state(),
        });
    }

    unmount(fs, mp)?;

    let code = fs.mount(mp);
    if code != FsCode::OK {
        error!("Error remounting disk at {} [{}]", mp.path(), code);
        mp.set_state(MountState::Failed);
        return Err(MountError::RemountFailed {
            path: mp.path().to_string(),
            code,
        });
    }

    mp.set_state(MountState::Mounted);
    info!("Disk remounted at {}", mp.path());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{FsFaults, FsType, MemFs};
    use crate::mount::{MountFlags, StorageTarget};

    fn fresh() -> MountPoint {
        MountPoint::new(
            FsType::Fat,
            "/mnt",
            StorageTarget::new("SD"),
            MountFlags::default(),
        )
    }

    #[test]
    fn test_mount_unmount_mount() {
        let mut fs = MemFs::formatted();
        let mut mp = fresh();

        mount(&mut fs, &mut mp).unwrap();
        unmount(&mut fs, &mut mp).unwrap();
        mount(&mut fs, &mut mp).unwrap();

        assert_eq!(mp.state(), MountState::Mounted);
        assert_eq!(fs.stats().mount_calls, 2);
        assert_eq!(fs.stats().unmount_calls, 1);
    }

    #[test]
    fn test_double_mount_rejected_without_driver_call() {
        let mut fs = MemFs::formatted();
        let mut mp = fresh();
        mount(&mut fs, &mut mp).unwrap();

        let err = mount(&mut fs, &mut mp).unwrap_err();
        assert!(matches!(err, MountError::InvalidState { state: MountState::Mounted, .. }));
        assert_eq!(fs.stats().mount_calls, 1);
        assert_eq!(mp.state(), MountState::Mounted);
    }

    #[test]
    fn test_unmount_while_unmounted_rejected() {
        let mut fs = MemFs::formatted();
        let mut mp = fresh();

        let err = unmount(&mut fs, &mut mp).unwrap_err();
        assert!(matches!(err, MountError::InvalidState { state: MountState::Unmounted, .. }));
        assert_eq!(fs.stats().unmount_calls, 0);
    }

    #[test]
    fn test_mount_failure_is_terminal_until_fresh_mount() {
        let mut fs = MemFs::formatted().with_faults(FsFaults {
            mount_attempt: Some(1),
            ..FsFaults::default()
        });
        let mut mp = fresh();

        let err = mount(&mut fs, &mut mp).unwrap_err();
        assert_eq!(err.code(), Some(FsCode::IO));
        assert_eq!(mp.state(), MountState::Failed);

        assert!(unmount(&mut fs, &mut mp).is_err());
        assert!(verify_remount(&mut fs, &mut mp).is_err());

        mount(&mut fs, &mut mp).unwrap();
        assert_eq!(mp.state(), MountState::Mounted);
    }

    #[test]
    fn test_verify_remount_round_trips() {
        let mut fs = MemFs::formatted();
        let mut mp = fresh();
        mount(&mut fs, &mut mp).unwrap();

        verify_remount(&mut fs, &mut mp).unwrap();

        assert_eq!(mp.state(), MountState::Mounted);
        assert_eq!(fs.stats().mount_calls, 2);
        assert_eq!(fs.stats().unmount_calls, 1);
    }

    #[test]
    fn test_verify_remount_requires_mount() {
        let mut fs = MemFs::formatted();
        let mut mp = fresh();
        assert!(verify_remount(&mut fs, &mut mp).is_err());
        assert_eq!(fs.stats().unmount_calls, 0);
    }

    #[test]
    fn test_verify_remount_unmount_failure() {
        let mut fs = MemFs::formatted();
        let mut mp = fresh();
        mount(&mut fs, &mut mp).unwrap();
        fs.faults_mut().unmount = Some(FsCode::IO);

        let err = verify_remount(&mut fs, &mut mp).unwrap_err();
        assert!(matches!(err, MountError::UnmountFailed { code: FsCode::IO, .. }));
        assert_eq!(mp.state(), MountState::Failed);
        assert_eq!(fs.stats().mount_calls, 1);
    }

    #[test]
    fn test_verify_remount_remount_failure_leaves_unavailable() {
        let mut fs = MemFs::formatted().with_faults(FsFaults {
            mount_attempt: Some(2),
            ..FsFaults::default()
        });
        let mut mp = fresh();
        mount(&mut fs, &mut mp).unwrap();

        let err = verify_remount(&mut fs, &mut mp).unwrap_err();
        assert!(matches!(err, MountError::RemountFailed { code: FsCode::IO, .. }));
        assert_eq!(mp.state(), MountState::Failed);
        assert!(!fs.is_mounted());
    }
}
