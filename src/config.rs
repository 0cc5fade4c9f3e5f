//! Configuration management for the storage sample
//!
//! Values come from built-in defaults, an optional `config.toml`, and
//! `RAX_FS_*` environment overrides, in increasing priority.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;

use crate::entries::EntryNames;
use crate::fs::FsType;
use crate::mount::{MountFlags, MountPoint, StorageTarget};
use crate::path::required_len;
use crate::utils::validation::{is_valid_mount_path, is_valid_name};

const CONFIG_PATHS: [&str; 2] = [
    "rax-fs-sample/config", // packaged layout: ./rax-fs-sample/config.toml
    "config",               // local development: ./config.toml
];

/// Complete sample configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SampleConfig {
    // ═══ MOUNT ═══
    /// Filesystem type: `fat` or `ext2`
    pub fs_type: FsType,

    /// Storage device name; defaults per filesystem type
    pub drive_name: Option<String>,

    /// Mount path; defaults per filesystem type
    pub mount_point: Option<String>,

    /// Refuse to format unformatted media; defaults per filesystem type
    pub no_format: Option<bool>,

    // ═══ ENTRIES ═══
    /// Path buffer capacity in bytes, terminator included
    pub max_path: usize,

    /// Create sample entries when the mount point is empty
    pub create_entries: bool,

    pub file_name: String,
    pub dir_name: String,

    // ═══ RAM DISK GEOMETRY ═══
    pub sector_count: u32,
    pub sector_size: u32,

    // ═══ PROCESS ═══
    /// Stay alive after the run instead of exiting
    pub idle: bool,

    pub idle_interval_ms: u64,
}

impl SampleConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = defaults()?;
        for path in CONFIG_PATHS {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        let settings = builder
            .add_source(Environment::with_prefix("RAX_FS").try_parsing(true))
            .build()?;
        Self::from_settings(settings)
    }

    /// Load configuration from TOML text layered over the defaults
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings = defaults()?
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        let config: SampleConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        let mount_point = self.mount_point();
        if !is_valid_mount_path(&mount_point) {
            return Err(ConfigError::Message(format!(
                "mount_point must be an absolute path, got {:?}",
                mount_point
            )));
        }

        if self.drive_name().is_empty() {
            return Err(ConfigError::Message("drive_name cannot be empty".into()));
        }

        for name in [&self.file_name, &self.dir_name] {
            if !is_valid_name(name) {
                return Err(ConfigError::Message(format!(
                    "invalid entry name {:?}",
                    name
                )));
            }
        }

        let longest = required_len(&mount_point, &self.file_name)
            .max(required_len(&mount_point, &self.dir_name));
        if longest > self.max_path {
            return Err(ConfigError::Message(format!(
                "max_path {} is too small, entry paths need {} bytes",
                self.max_path, longest
            )));
        }

        if self.sector_size == 0 {
            return Err(ConfigError::Message(
                "sector_size must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn drive_name(&self) -> String {
        self.drive_name
            .clone()
            .unwrap_or_else(|| self.fs_type.default_drive_name().to_string())
    }

    pub fn mount_point(&self) -> String {
        self.mount_point
            .clone()
            .unwrap_or_else(|| self.fs_type.default_mount_point().to_string())
    }

    pub fn mount_flags(&self) -> MountFlags {
        MountFlags {
            no_format: self
                .no_format
                .unwrap_or_else(|| self.fs_type.suppresses_format()),
        }
    }

    /// Build the mount point descriptor described by this configuration
    pub fn build_mount_point(&self) -> MountPoint {
        MountPoint::new(
            self.fs_type,
            self.mount_point(),
            StorageTarget::new(self.drive_name()),
            self.mount_flags(),
        )
    }

    pub fn entry_names(&self) -> EntryNames {
        EntryNames {
            file_name: self.file_name.clone(),
            dir_name: self.dir_name.clone(),
        }
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("fs_type", "fat")?
        .set_default("max_path", 128_i64)?
        .set_default("create_entries", true)?
        .set_default("file_name", "some.dat")?
        .set_default("dir_name", "some")?
        .set_default("sector_count", 65_536_i64)?
        .set_default("sector_size", 512_i64)?
        .set_default("idle", true)?
        .set_default("idle_interval_ms", 1_000_i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_fat_sample() {
        let config = SampleConfig::from_toml("").unwrap();

        assert_eq!(config.fs_type, FsType::Fat);
        assert_eq!(config.drive_name(), "SD");
        assert_eq!(config.mount_point(), "/SD:");
        assert!(!config.mount_flags().no_format);
        assert_eq!(config.max_path, 128);
        assert_eq!(config.entry_names(), EntryNames::default());
        assert_eq!(config.idle_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_ext2_defaults() {
        let config = SampleConfig::from_toml("fs_type = \"ext2\"").unwrap();

        let mp = config.build_mount_point();
        assert_eq!(mp.path(), "/ext");
        assert_eq!(mp.storage().name(), "SDMMC");
        assert!(mp.flags().no_format);
    }

    #[test]
    fn test_explicit_values_override_type_defaults() {
        let config = SampleConfig::from_toml(
            r#"
            fs_type = "ext2"
            mount_point = "/mnt"
            drive_name = "EMMC"
            no_format = false
            "#,
        )
        .unwrap();

        let mp = config.build_mount_point();
        assert_eq!(mp.path(), "/mnt");
        assert_eq!(mp.storage().name(), "EMMC");
        assert!(!mp.flags().no_format);
    }

    #[test]
    fn test_rejects_relative_mount_point() {
        let err = SampleConfig::from_toml("mount_point = \"mnt\"").unwrap_err();
        assert!(err.to_string().contains("mount_point"));
    }

    #[test]
    fn test_rejects_small_path_buffer() {
        let err = SampleConfig::from_toml("max_path = 8").unwrap_err();
        assert!(err.to_string().contains("max_path"));
    }

    #[test]
    fn test_rejects_bad_entry_name() {
        let err = SampleConfig::from_toml("dir_name = \"a/b\"").unwrap_err();
        assert!(err.to_string().contains("invalid entry name"));
    }

    #[test]
    fn test_accepts_huge_path_buffer() {
        let config = SampleConfig::from_toml("max_path = 9223372036854775807").unwrap();
        assert_eq!(config.max_path, i64::MAX as usize);
    }

    #[test]
    fn test_load_applies_env_overrides() {
        // SAFETY: no other test touches RAX_FS_* variables
        unsafe {
            std::env::set_var("RAX_FS_FS_TYPE", "ext2");
            std::env::set_var("RAX_FS_MAX_PATH", "256");
        }
        let loaded = SampleConfig::load();
        unsafe {
            std::env::remove_var("RAX_FS_FS_TYPE");
            std::env::remove_var("RAX_FS_MAX_PATH");
        }

        let config = loaded.unwrap();
        assert_eq!(config.fs_type, FsType::Ext2);
        assert_eq!(config.max_path, 256);
        assert_eq!(config.mount_point(), "/ext");
        assert!(config.mount_flags().no_format);
    }

    #[test]
    fn test_rejects_zero_sector_size() {
        assert!(SampleConfig::from_toml("sector_size = 0").is_err());
    }
}
