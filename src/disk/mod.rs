//! Raw block device access
//!
//! A one-shot probe of the storage controller: bring it up, read the
//! sector geometry, bring it back down.

pub mod ram;

pub use ram::{DiskStep, RamDisk, RamDiskError};

use log::{error, info};
use std::fmt;

use crate::error::DeviceError;

/// Control operations a block device driver exposes.
pub trait DiskAccess {
    type Error: fmt::Display;

    /// Device name, e.g. `SD`.
    fn name(&self) -> &str;

    fn ctrl_init(&mut self) -> Result<(), Self::Error>;

    fn sector_count(&mut self) -> Result<u32, Self::Error>;

    fn sector_size(&mut self) -> Result<u32, Self::Error>;

    fn ctrl_deinit(&mut self) -> Result<(), Self::Error>;
}

/// Sector geometry reported by a block device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskGeometry {
    pub sector_count: u32,
    pub sector_size: u32,
}

impl DiskGeometry {
    /// Total capacity, computed in 64 bits.
    pub fn capacity_bytes(&self) -> u64 {
        u64::from(self.sector_count) * u64::from(self.sector_size)
    }

    /// Total capacity in whole MiB.
    pub fn capacity_mb(&self) -> u64 {
        self.capacity_bytes() >> 20
    }
}

/// An initialized controller. Deinitialized on drop unless released.
struct Controller<'a, D: DiskAccess + ?Sized> {
    disk: &'a mut D,
    active: bool,
}

impl<'a, D: DiskAccess + ?Sized> Controller<'a, D> {
    fn init(disk: &'a mut D) -> Result<Self, DeviceError> {
        disk.ctrl_init().map_err(|e| DeviceError::InitFailed {
            device: disk.name().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { disk, active: true })
    }

    fn sector_count(&mut self) -> Result<u32, DeviceError> {
        self.disk.sector_count().map_err(|e| DeviceError::QueryFailed {
            device: self.disk.name().to_string(),
            query: "sector count",
            reason: e.to_string(),
        })
    }

    fn sector_size(&mut self) -> Result<u32, DeviceError> {
        self.disk.sector_size().map_err(|e| DeviceError::QueryFailed {
            device: self.disk.name().to_string(),
            query: "sector size",
            reason: e.to_string(),
        })
    }

    fn release(mut self) -> Result<(), DeviceError> {
        self.active = false;
        self.disk.ctrl_deinit().map_err(|e| DeviceError::DeinitFailed {
            device: self.disk.name().to_string(),
            reason: e.to_string(),
        })
    }
}

impl<D: DiskAccess + ?Sized> Drop for Controller<'_, D> {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = self.disk.ctrl_deinit() {
                error!("Storage deinit failed on {}: {}", self.disk.name(), e);
            }
        }
    }
}

/// Probes a block device for its geometry.
///
/// A deinit failure is logged but does not discard the geometry already read.
pub fn query<D: DiskAccess + ?Sized>(disk: &mut D) -> Result<DiskGeometry, DeviceError> {
    let mut controller = Controller::init(disk)?;

    let sector_count = controller.sector_count()?;
    info!("Block count {}", sector_count);

    let sector_size = controller.sector_size()?;
    info!("Sector size {}", sector_size);

    let geometry = DiskGeometry {
        sector_count,
        sector_size,
    };
    info!("Memory Size(MB) {}", geometry.capacity_mb());

    if let Err(e) = controller.release() {
        error!("{}", e);
    }

    Ok(geometry)
}
