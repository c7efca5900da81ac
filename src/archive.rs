//! Commit-log archive properties, written alongside the tuned document.

use crate::document;
use crate::error::TunerError;
use crate::source::ConfigSource;
use tracing::{debug, info};

/// Relative path of the archive properties file under the installation root.
pub const COMMITLOG_ARCHIVE_PROPERTIES: &str = "conf/commitlog_archiving.properties";

/// Write the four commit-log archival keys when commit-log backup is enabled;
/// otherwise leave any existing file alone.
///
/// Prior content is overwritten wholesale. A write failure is fatal to the
/// bootstrap sequence.
pub fn write_commitlog_archive_properties(source: &dyn ConfigSource) -> Result<(), TunerError> {
    if !source.commitlog_backup_enabled() {
        debug!("commit log backup disabled, skipping archive properties");
        return Ok(());
    }

    let path = source.install_dir().join(COMMITLOG_ARCHIVE_PROPERTIES);

    let mut text = String::from("# commit log archive properties, written at node bootstrap\n");
    text.push_str(&format!(
        "archive_command={}\n",
        source.commitlog_archive_command()
    ));
    text.push_str(&format!(
        "restore_command={}\n",
        source.commitlog_restore_command()
    ));
    text.push_str(&format!(
        "restore_directories={}\n",
        source.commitlog_restore_directories()
    ));
    text.push_str(&format!(
        "restore_point_in_time={}\n",
        source.commitlog_restore_point_in_time()
    ));

    document::write_atomic(&path, text.as_bytes()).map_err(|e| TunerError::Archive {
        path: path.clone(),
        source: e,
    })?;

    info!(path = %path.display(), "wrote commit log archive properties");
    Ok(())
}
