use directories::ProjectDirs;
use log::LevelFilter;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::lib::error::{ConfigError, Result};

/// Initialize the logger
///
/// # Arguments
///
/// * `verbose` - Enable debug level logging
/// * `quiet` - Suppress console output (the log file is still written)
/// * `log_file` - Also append log lines to `kubestat.log`
///
/// Console output goes to stderr; stdout carries the rendered tables.
/// `RUST_LOG` overrides the level selected by `verbose`.
///
/// # Platform-specific log locations
///
/// * **macOS**: `~/Library/Application Support/com.kubestat.kubestat/kubestat.log`
/// * **Linux**: `~/.local/share/kubestat/kubestat.log`
/// * **Windows**: `C:\Users\<User>\AppData\Local\kubestat\kubestat\data\kubestat.log`
///
pub fn init_logger(verbose: bool, quiet: bool, log_file: bool) -> Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(log_level).format_timestamp_secs();
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    let file = if log_file {
        let path = log_path()?;
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| ConfigError::InvalidValue(format!("Failed to open log file: {}", e)))?;
        Some((path, file))
    } else {
        None
    };

    match (file, quiet) {
        (None, true) => {
            builder.filter_level(LevelFilter::Off);
        }
        (None, false) => {
            builder.target(env_logger::Target::Stderr);
        }
        (Some((_, file)), true) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        (Some((path, file)), false) => {
            // Write to both stderr and file
            struct MultiWriter {
                stderr: std::io::Stderr,
                file: fs::File,
            }

            impl Write for MultiWriter {
                fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                    self.stderr.write_all(buf)?;
                    self.file.write_all(buf)?;
                    Ok(buf.len())
                }

                fn flush(&mut self) -> std::io::Result<()> {
                    self.stderr.flush()?;
                    self.file.flush()?;
                    Ok(())
                }
            }

            builder.target(env_logger::Target::Pipe(Box::new(MultiWriter {
                stderr: std::io::stderr(),
                file,
            })));
            builder.init();
            log::debug!("Logging to: {}", path.display());
            return Ok(());
        }
    }

    builder.init();
    Ok(())
}

/// Platform data directory, falling back to the current directory
fn log_path() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "kubestat", "kubestat") {
        let log_dir = proj_dirs.data_local_dir();
        fs::create_dir_all(log_dir).map_err(|e| {
            ConfigError::InvalidValue(format!("Failed to create log directory: {}", e))
        })?;
        Ok(log_dir.join("kubestat.log"))
    } else {
        Ok(std::env::current_dir()
            .map_err(|e| {
                ConfigError::InvalidValue(format!("Failed to get current directory: {}", e))
            })?
            .join("kubestat.log"))
    }
}
