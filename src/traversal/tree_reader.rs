use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::session::{Session, SessionError};
use crate::znode::{Node, path};

/// Recursively reads the subtree rooted at `root` into memory.
///
/// Any failing call aborts the whole read; no partial tree is ever returned.
/// The read is not a point-in-time snapshot: concurrent changes to the remote
/// tree may be partially observed. The server's reserved `/zookeeper` subtree
/// is skipped when it shows up as a child.
pub fn read_tree<S: Session + ?Sized>(session: &S, root: &str) -> Result<Node, ReadError> {
    let tree = read_node(session, root.to_string())?;
    debug!("Read {} nodes under {}", tree.count(), root);
    Ok(tree)
}

fn read_node<S: Session + ?Sized>(session: &S, node_path: String) -> Result<Node, ReadError> {
    let (data, metadata) = session.get(&node_path).context(FetchSnafu {
        path: node_path.clone(),
    })?;
    debug!(
        "Fetched {} ({} bytes, {} children)",
        node_path,
        data.len(),
        metadata.num_children
    );

    if metadata.num_children == 0 {
        return Ok(Node::new(node_path, data));
    }

    let names = session.list_children(&node_path).context(ListChildrenSnafu {
        path: node_path.clone(),
    })?;

    let children = names
        .iter()
        .map(|name| path::join(&node_path, name))
        .filter(|child_path| {
            let reserved = child_path == path::RESERVED;
            if reserved {
                debug!("Skipping reserved subtree {}", child_path);
            }
            !reserved
        })
        .map(|child_path| read_node(session, child_path))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Node::new(node_path, data).with_children(children))
}

#[derive(Debug, Snafu)]
pub enum ReadError {
    #[snafu(display("Failed to fetch node {path}"))]
    FetchError { path: String, source: SessionError },
    #[snafu(display("Failed to list children of {path}"))]
    ListChildrenError { path: String, source: SessionError },
}

impl ReadError {
    /// The path whose read failed.
    pub fn path(&self) -> &str {
        match self {
            ReadError::FetchError { path, .. } | ReadError::ListChildrenError { path, .. } => path,
        }
    }
}
