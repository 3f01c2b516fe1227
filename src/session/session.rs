use snafu::Snafu;

/// Metadata returned alongside a node's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeMetadata {
    pub num_children: usize,
}

/// The four primitives the traversal needs from a connected coordination service.
///
/// Implementations own their timeout and retry policy; callers never retry.
pub trait Session {
    /// Fetches the payload and metadata of the node at `path`.
    fn get(&self, path: &str) -> Result<(Vec<u8>, NodeMetadata), SessionError>;

    /// Lists the names (not full paths) of the children of `path`.
    fn list_children(&self, path: &str) -> Result<Vec<String>, SessionError>;

    /// Creates a persistent node. Fails with [`SessionError::NodeExists`] if it is already there.
    fn create(&self, path: &str, data: &[u8]) -> Result<(), SessionError>;

    /// Overwrites the payload of an existing node regardless of its version.
    fn set_data(&self, path: &str, data: &[u8]) -> Result<(), SessionError>;
}

#[derive(Debug, Snafu)]
pub enum SessionError {
    #[snafu(display("Node does not exist"))]
    NoNode,
    #[snafu(display("Node already exists"))]
    NodeExists,
    #[snafu(display("Lost connection to the coordination service"))]
    ConnectionLoss,
    #[snafu(display("Coordination service rejected the request"))]
    Remote { source: zookeeper::ZkError },
}

