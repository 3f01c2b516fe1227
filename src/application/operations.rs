use std::path::Path;

use snafu::{ResultExt, Snafu};
use tracing::{info, warn};

use crate::ext::PathExt;
use crate::session::Session;
use crate::snapshot::{self, DecodeError, EncodeError, SnapshotFileError};
use crate::traversal::{self, ReadError, WriteError};
use crate::znode::ZnodePath;

/// Reads the subtree at `root` and stores it in `file`. Returns the number of nodes dumped.
///
/// Nothing is written to `file` unless the whole subtree was read and encoded.
pub async fn dump<S: Session + ?Sized>(
    session: &S,
    root: &ZnodePath,
    file: &Path,
) -> Result<usize, OperationError> {
    let tree = traversal::read_tree(session, root.as_str())
        .inspect_err(|err| warn!("Dump aborted at {}, no file written", err.path()))
        .context(ReadSnafu)?;
    let bytes = snapshot::encode(&tree).context(EncodeSnafu)?;
    snapshot::write_snapshot_file(file, bytes)
        .await
        .context(SnapshotFileSnafu)?;

    let count = tree.count();
    info!(
        "Dumped {} nodes from {} to {}",
        count,
        root,
        file.best_effort_display()
    );
    Ok(count)
}

/// Upserts the snapshot stored in `file` under `root`. Returns the number of nodes written.
///
/// The file is fully decoded before the first remote call.
pub async fn load<S: Session + ?Sized>(
    session: &S,
    root: &ZnodePath,
    file: &Path,
) -> Result<usize, OperationError> {
    let bytes = snapshot::read_snapshot_file(file)
        .await
        .context(SnapshotFileSnafu)?;
    let tree = snapshot::decode(&bytes).context(DecodeSnafu)?;

    let count = traversal::write_tree(session, &tree, root.as_str())
        .inspect_err(|err| {
            warn!(
                "Load aborted at {}, nodes written before it are kept",
                err.path()
            )
        })
        .context(WriteSnafu)?;
    info!(
        "Loaded {} nodes from {} into {}",
        count,
        file.best_effort_display(),
        root
    );
    Ok(count)
}

#[derive(Debug, Snafu)]
pub enum OperationError {
    #[snafu(display("Failed to read the remote tree"))]
    ReadError { source: ReadError },
    #[snafu(display("Failed to write the remote tree"))]
    WriteError { source: WriteError },
    #[snafu(display("Failed to encode the snapshot"))]
    EncodeError { source: EncodeError },
    #[snafu(display("Failed to decode the snapshot"))]
    DecodeError { source: DecodeError },
    #[snafu(display("Failed to access the snapshot file"))]
    SnapshotFileError { source: SnapshotFileError },
}
