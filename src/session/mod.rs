//! Access to the coordination service that holds the live tree.

#[cfg(test)]
mod memory_session;
mod session;
mod zookeeper_session;

#[cfg(test)]
pub use memory_session::MemorySession;
pub use session::{NodeMetadata, Session, SessionError};
pub use zookeeper_session::{ConnectError, ZkSession};
