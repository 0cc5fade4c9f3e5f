//! RAM-backed block device
//!
//! Reports a fixed geometry through the control interface. One step can be
//! set to fail so probe error paths can be exercised.

use std::fmt;

use crate::disk::DiskAccess;

/// A control step of the probe sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskStep {
    Init,
    SectorCount,
    SectorSize,
    Deinit,
}

impl fmt::Display for DiskStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiskStep::Init => write!(f, "init"),
            DiskStep::SectorCount => write!(f, "sector count"),
            DiskStep::SectorSize => write!(f, "sector size"),
            DiskStep::Deinit => write!(f, "deinit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RamDiskError {
    Fault(DiskStep),
    NotInitialized,
}

impl fmt::Display for RamDiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RamDiskError::Fault(step) => write!(f, "controller {} failed", step),
            RamDiskError::NotInitialized => write!(f, "controller not initialized"),
        }
    }
}

impl std::error::Error for RamDiskError {}

#[derive(Debug)]
pub struct RamDisk {
    name: String,
    sector_count: u32,
    sector_size: u32,
    initialized: bool,
    failing: Option<DiskStep>,
    init_calls: u32,
    deinit_calls: u32,
}

impl RamDisk {
    pub fn new(name: impl Into<String>, sector_count: u32, sector_size: u32) -> Self {
        Self {
            name: name.into(),
            sector_count,
            sector_size,
            initialized: false,
            failing: None,
            init_calls: 0,
            deinit_calls: 0,
        }
    }

    /// Makes the given step fail every time it is issued.
    pub fn failing_at(mut self, step: DiskStep) -> Self {
        self.failing = Some(step);
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn init_calls(&self) -> u32 {
        self.init_calls
    }

    pub fn deinit_calls(&self) -> u32 {
        self.deinit_calls
    }

    fn check(&self, step: DiskStep) -> Result<(), RamDiskError> {
        if self.failing == Some(step) {
            return Err(RamDiskError::Fault(step));
        }
        if step != DiskStep::Init && !self.initialized {
            return Err(RamDiskError::NotInitialized);
        }
        Ok(())
    }
}

impl DiskAccess for RamDisk {
    type Error = RamDiskError;

    fn name(&self) -> &str {
        &self.name
    }

    fn ctrl_init(&mut self) -> Result<(), RamDiskError> {
        self.init_calls += 1;
        self.check(DiskStep::Init)?;
        self.initialized = true;
        Ok(())
    }

    fn sector_count(&mut self) -> Result<u32, RamDiskError> {
        self.check(DiskStep::SectorCount)?;
        Ok(self.sector_count)
    }

    fn sector_size(&mut self) -> Result<u32, RamDiskError> {
        self.check(DiskStep::SectorSize)?;
        Ok(self.sector_size)
    }

    fn ctrl_deinit(&mut self) -> Result<(), RamDiskError> {
        self.deinit_calls += 1;
        let result = self.check(DiskStep::Deinit);
        // the controller is powered down even when the driver reports an error
        self.initialized = false;
        result
    }
}
