//! Error handlers
//!
//! Provides error reporting and status code mapping.

use crate::error::types::{EntryError, SampleError};
use crate::fs::FsCode;
use log::error;

const EIO: i32 = -5;
const EINVAL: i32 = -22;
const ENAMETOOLONG: i32 = -36;

/// Handle a sample error
pub fn handle_error(err: &SampleError) {
    error!("Storage sample error: {}", err);
}

/// Convert error to a negative errno-style status code
pub fn error_to_status(err: &SampleError) -> i32 {
    match err {
        SampleError::Config(_) => EINVAL,
        SampleError::Device(_) => EIO,
        SampleError::Mount(e) => e.code().map_or(EINVAL, code_or_io),
        SampleError::Enum(e) => e.code().map_or(EINVAL, code_or_io),
        SampleError::Entry(EntryError::NotMounted { .. }) => EINVAL,
        SampleError::Entry(EntryError::Path(_)) => ENAMETOOLONG,
        SampleError::Entry(EntryError::CreateFile { code, .. }) => code_or_io(*code),
    }
}

// Drivers may report positive codes; keep the status negative.
fn code_or_io(code: FsCode) -> i32 {
    if code.0 < 0 { code.0 } else { EIO }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MountError, PathError};
    use crate::mount::MountState;

    #[test]
    fn test_status_codes() {
        let remount = SampleError::Mount(MountError::RemountFailed {
            path: "/SD:".into(),
            code: FsCode::BUSY,
        });
        assert_eq!(error_to_status(&remount), -16);

        let state = SampleError::Mount(MountError::InvalidState {
            path: "/SD:".into(),
            state: MountState::Failed,
        });
        assert_eq!(error_to_status(&state), EINVAL);

        let path = SampleError::Entry(EntryError::Path(PathError::TooLong {
            required: 200,
            capacity: 128,
        }));
        assert_eq!(error_to_status(&path), ENAMETOOLONG);

        let positive = SampleError::Mount(MountError::MountFailed {
            path: "/SD:".into(),
            code: FsCode(3),
        });
        assert_eq!(error_to_status(&positive), EIO);
    }
}
