//! Config downloader: save a configuration as `tpn.conf`.
//!
//! The text is written to `tpn.conf.part` next to the destination, synced,
//! then renamed into place. The temp file never outlives the call.

use crate::error::ApiError;
use crate::reporter::{report_error, Reporter};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "tpn.conf";
pub const CONFIG_MIME: &str = "text/plain";
pub const DOWNLOADED_MESSAGE: &str = "Config downloaded successfully!";

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Saves `config` as [`CONFIG_FILENAME`] in `dir` and notifies success.
///
/// No network I/O. Filesystem failures are reported through `reporter` like
/// request failures; nothing is returned either way.
pub fn download_config(config: &str, dir: &Path, reporter: &dyn Reporter) {
    match save_config(config, dir) {
        Ok(path) => {
            tracing::info!(
                path = %path.display(),
                bytes = config.len(),
                mime = CONFIG_MIME,
                "config saved"
            );
            reporter.notify_success(DOWNLOADED_MESSAGE);
        }
        Err(e) => {
            report_error(reporter, "download config", &e);
        }
    }
}

/// Destination path of the saved config inside `dir`.
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILENAME)
}

fn save_config(config: &str, dir: &Path) -> Result<PathBuf, ApiError> {
    let final_path = config_path(dir);
    let part = PartFile::create(temp_path(&final_path))?;
    part.write_all(config.as_bytes())?;
    part.finalize(&final_path)?;
    Ok(final_path)
}

/// Appends `.part` to the final path (`tpn.conf` → `tpn.conf.part`).
fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Temp file removed on drop unless it was renamed into place.
struct PartFile {
    file: Option<File>,
    path: PathBuf,
}

impl PartFile {
    fn create(path: PathBuf) -> Result<Self, ApiError> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        Ok(PartFile {
            file: Some(file),
            path,
        })
    }

    fn write_all(&self, data: &[u8]) -> Result<(), ApiError> {
        if let Some(mut f) = self.file.as_ref() {
            f.write_all(data)?;
            f.sync_all()?;
        }
        Ok(())
    }

    fn finalize(mut self, final_path: &Path) -> Result<(), ApiError> {
        // Close before rename.
        drop(self.file.take());
        std::fs::rename(&self.path, final_path)?;
        self.path = PathBuf::new();
        Ok(())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if self.path.as_os_str().is_empty() {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::debug!(path = %self.path.display(), error = %e, "temp file cleanup failed");
        }
    }
}
