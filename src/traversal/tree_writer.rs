use snafu::{OptionExt, ResultExt, Snafu};
use tracing::{debug, warn};

use crate::session::{Session, SessionError};
use crate::znode::{Node, path};

/// Recreates `node` and its descendants at `target`, returning the number of nodes written.
///
/// Nodes are upserted: created when absent, overwritten when present. Remote
/// children that are not part of the snapshot are left untouched. Writes are not
/// transactional, so nodes written before a failure stay on the remote tree.
/// A child that would land on the server's reserved `/zookeeper` node is skipped.
pub fn write_tree<S: Session + ?Sized>(
    session: &S,
    node: &Node,
    target: &str,
) -> Result<usize, WriteError> {
    let written = write_node(session, node, target.to_string())?;
    debug!("Wrote {} nodes under {}", written, target);
    Ok(written)
}

fn write_node<S: Session + ?Sized>(
    session: &S,
    node: &Node,
    target: String,
) -> Result<usize, WriteError> {
    upsert(session, &target, &node.data)?;

    let mut written = 1;
    for child in &node.children {
        let name = child.name().context(InvalidChildPathSnafu {
            path: child.path.clone(),
        })?;
        let child_target = path::join(&target, name);
        if child_target == path::RESERVED {
            warn!("Skipping reserved subtree {}", child_target);
            continue;
        }
        written += write_node(session, child, child_target)?;
    }
    Ok(written)
}

fn upsert<S: Session + ?Sized>(session: &S, target: &str, data: &[u8]) -> Result<(), WriteError> {
    match session.create(target, data) {
        Ok(()) => {
            debug!("Created {} ({} bytes)", target, data.len());
            Ok(())
        }
        Err(SessionError::NodeExists) => {
            session
                .set_data(target, data)
                .context(SetDataSnafu { path: target })?;
            debug!("Overwrote {} ({} bytes)", target, data.len());
            Ok(())
        }
        Err(source) => Err(source).context(CreateSnafu { path: target }),
    }
}

#[derive(Debug, Snafu)]
pub enum WriteError {
    #[snafu(display("Failed to create node {path}"))]
    CreateError { path: String, source: SessionError },
    #[snafu(display("Failed to overwrite data of node {path}"))]
    SetDataError { path: String, source: SessionError },
    #[snafu(display("Cannot derive a child name from path '{path}'"))]
    InvalidChildPath { path: String },
}

impl WriteError {
    /// The path whose write failed.
    pub fn path(&self) -> &str {
        match self {
            WriteError::CreateError { path, .. }
            | WriteError::SetDataError { path, .. }
            | WriteError::InvalidChildPath { path } => path,
        }
    }
}
