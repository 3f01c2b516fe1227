use std::path::Path;

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};

use crate::ext::PathExt;

/// Reads the whole snapshot file at `path`.
pub async fn read_snapshot_file(path: &Path) -> Result<Vec<u8>, SnapshotFileError> {
    debug!("Reading snapshot from {}", path.best_effort_display());
    let bytes = fs::read(path).await.context(ReadSnafu {
        file_path: path.best_effort_display(),
    })?;
    debug!("Read {} bytes of snapshot", bytes.len());
    Ok(bytes)
}

/// Writes `bytes` to `path` through a temporary sibling file that is renamed into place,
/// so a failed write never leaves a partial snapshot behind.
pub async fn write_snapshot_file(path: &Path, bytes: Vec<u8>) -> Result<(), SnapshotFileError> {
    let temp_path = path.temporary_sibling();
    debug!(
        "Writing {} bytes of snapshot to {}",
        bytes.len(),
        temp_path.best_effort_display()
    );

    if let Err(err) = fs::write(&temp_path, bytes).await.0 {
        discard(&temp_path).await;
        return Err(err).context(WriteSnafu {
            file_path: temp_path.best_effort_display(),
        });
    }

    if let Err(err) = fs::rename(&temp_path, path).await {
        discard(&temp_path).await;
        return Err(err).context(RenameSnafu {
            from: temp_path.best_effort_display(),
            to: path.best_effort_display(),
        });
    }

    debug!("Snapshot written to {}", path.best_effort_display());
    Ok(())
}

async fn discard(temp_path: &Path) {
    if let Err(err) = fs::remove_file(temp_path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            warn!(
                "Failed to remove temporary file {}: {}",
                temp_path.best_effort_display(),
                err
            );
        }
    }
}

#[derive(Debug, Snafu)]
pub enum SnapshotFileError {
    #[snafu(display("Failed to read the snapshot file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write the snapshot file: {}", file_path))]
    WriteError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to move the snapshot from {} to {}", from, to))]
    RenameError {
        from: String,
        to: String,
        source: std::io::Error,
    },
}
