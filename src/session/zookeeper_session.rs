use std::time::Duration;

use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};
use zookeeper::{Acl, CreateMode, WatchedEvent, Watcher, ZkError, ZooKeeper};

use crate::session::{NodeMetadata, Session, SessionError};

/// A live ZooKeeper session.
///
/// The inner `ZooKeeper` handle closes the session when it is dropped, so there
/// is no explicit `close` here; calling it too would close the session twice.
pub struct ZkSession {
    zk: ZooKeeper,
    address: String,
}

impl ZkSession {
    /// Connects to `address` and verifies the session by checking the root node exists.
    pub fn connect(address: &str, timeout: Duration) -> Result<Self, ConnectError> {
        debug!("Connecting to {} with a {:?} timeout", address, timeout);
        let zk = ZooKeeper::connect(address, timeout, LoggingWatcher).context(ConnectSnafu {
            address: address.to_string(),
        })?;

        zk.exists("/", false).context(ConnectSnafu {
            address: address.to_string(),
        })?;
        debug!("Session established with {}", address);

        Ok(ZkSession {
            zk,
            address: address.to_string(),
        })
    }
}

impl Session for ZkSession {
    fn get(&self, path: &str) -> Result<(Vec<u8>, NodeMetadata), SessionError> {
        let (data, stat) = self.zk.get_data(path, false).map_err(map_zk_error)?;
        let metadata = NodeMetadata {
            num_children: usize::try_from(stat.num_children).unwrap_or_default(),
        };
        Ok((data, metadata))
    }

    fn list_children(&self, path: &str) -> Result<Vec<String>, SessionError> {
        let mut names = self.zk.get_children(path, false).map_err(map_zk_error)?;
        // ZooKeeper enumerates children in no particular order
        names.sort();
        Ok(names)
    }

    fn create(&self, path: &str, data: &[u8]) -> Result<(), SessionError> {
        self.zk
            .create(
                path,
                data.to_vec(),
                Acl::open_unsafe().clone(),
                CreateMode::Persistent,
            )
            .map(|_| ())
            .map_err(map_zk_error)
    }

    fn set_data(&self, path: &str, data: &[u8]) -> Result<(), SessionError> {
        self.zk
            .set_data(path, data.to_vec(), None)
            .map(|_| ())
            .map_err(map_zk_error)
    }
}

impl Drop for ZkSession {
    fn drop(&mut self) {
        debug!("Releasing session with {}", self.address);
    }
}

fn map_zk_error(err: ZkError) -> SessionError {
    match err {
        ZkError::NoNode => SessionError::NoNode,
        ZkError::NodeExists => SessionError::NodeExists,
        ZkError::ConnectionLoss | ZkError::SessionExpired | ZkError::OperationTimeout => {
            SessionError::ConnectionLoss
        }
        source => SessionError::Remote { source },
    }
}

struct LoggingWatcher;

impl Watcher for LoggingWatcher {
    fn handle(&self, event: WatchedEvent) {
        debug!("Session event: {:?}", event);
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Failed to establish a session with {address}"))]
pub struct ConnectError {
    address: String,
    source: ZkError,
}
