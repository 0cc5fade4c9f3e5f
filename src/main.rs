//! RAX FS Sample - Entry Point
//!
//! Runs the storage bring-up sequence against a RAM disk and an in-memory
//! filesystem driver.

use log::{error, info};

use rax_fs_sample::app;
use rax_fs_sample::config::SampleConfig;
use rax_fs_sample::disk::RamDisk;
use rax_fs_sample::error::SampleError;
use rax_fs_sample::error::handlers::{error_to_status, handle_error};
use rax_fs_sample::fs::MemFs;
use rax_fs_sample::utils::logging::setup_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize the logger (defaults to info, RUST_LOG overrides)
    setup_logging();

    info!("Launching storage sample...");

    let config = match SampleConfig::load() {
        Ok(config) => config,
        Err(e) => {
            let err = SampleError::from(e);
            handle_error(&err);
            std::process::exit(error_to_status(&err).abs());
        }
    };

    let mut disk = RamDisk::new(config.drive_name(), config.sector_count, config.sector_size);
    let mut volume = app::build_volume(&config, MemFs::blank());

    let status = match app::run(&config, &mut disk, &mut volume) {
        Ok(report) => {
            info!(
                "Sample complete: {} entries before, {} after",
                report.initial_count.unwrap_or(0),
                report.final_count.or(report.initial_count).unwrap_or(0)
            );
            0
        }
        Err(e) => {
            handle_error(&e);
            error_to_status(&e)
        }
    };

    let _driver = volume.teardown();

    if config.idle {
        app::idle(config.idle_interval()).await;
    }

    if status != 0 {
        error!("Exiting with status {}", status);
    }
    std::process::exit(status.abs());
}
