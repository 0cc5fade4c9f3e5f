//! Storage sample workflow
//!
//! Probes the block device, mounts the filesystem, proves it survives an
//! unmount/remount cycle, lists the mount point and, when it is empty,
//! populates it with a file and a directory before listing again.

use log::{error, info};
use std::time::Duration;

use crate::config::SampleConfig;
use crate::disk::{self, DiskAccess, DiskGeometry};
use crate::entries::CreatedEntries;
use crate::error::SampleError;
use crate::fs::FileSystem;
use crate::mount::Volume;

/// What a completed run observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleReport {
    /// `None` when the probe failed.
    pub geometry: Option<DiskGeometry>,
    /// `None` when the first listing failed.
    pub initial_count: Option<u32>,
    pub created: Option<CreatedEntries>,
    pub final_count: Option<u32>,
}

/// Builds the volume described by the configuration around `fs`.
pub fn build_volume<F: FileSystem>(config: &SampleConfig, fs: F) -> Volume<F> {
    Volume::new(fs, config.build_mount_point())
}

/// Runs the sample against `disk` and `volume`.
///
/// Only mount failures are returned as errors; probe, listing and entry
/// failures are logged and reflected in the report. The volume is
/// unmounted on the way out if it is still mounted.
pub fn run<D, F>(
    config: &SampleConfig,
    disk: &mut D,
    volume: &mut Volume<F>,
) -> Result<SampleReport, SampleError>
where
    D: DiskAccess + ?Sized,
    F: FileSystem,
{
    let geometry = match disk::query(disk) {
        Ok(geometry) => Some(geometry),
        Err(e) => {
            error!("{}", e);
            None
        }
    };

    let outcome = exercise(config, volume, geometry);
    volume.shutdown();
    outcome
}

fn exercise<F: FileSystem>(
    config: &SampleConfig,
    volume: &mut Volume<F>,
    geometry: Option<DiskGeometry>,
) -> Result<SampleReport, SampleError> {
    let mut report = SampleReport {
        geometry,
        ..SampleReport::default()
    };

    volume.mount()?;
    volume.verify_remount()?;

    let mount_path = volume.mount_point().path().to_string();
    report.initial_count = list_logged(volume, &mount_path);

    if report.initial_count == Some(0) && config.create_entries {
        info!("Creating some entries");
        match volume.create_entries(&mount_path, &config.entry_names(), config.max_path) {
            Ok(created) => {
                report.created = Some(created);
                report.final_count = list_logged(volume, &mount_path);
            }
            Err(e) => error!("{}", e),
        }
    }

    Ok(report)
}

fn list_logged<F: FileSystem>(volume: &mut Volume<F>, path: &str) -> Option<u32> {
    match volume.list_directory(path) {
        Ok(count) => Some(count),
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

/// Parks the process. Used after the run so a failed mount does not turn
/// into a restart loop.
pub async fn idle(interval: Duration) {
    info!("Sample finished, idling");
    loop {
        tokio::time::sleep(interval).await;
    }
}
