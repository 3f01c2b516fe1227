//! Recursive, sequential traversal between a live tree and a [`Node`](crate::znode::Node).

mod tree_reader;
mod tree_writer;

pub use tree_reader::{ReadError, read_tree};
pub use tree_writer::{WriteError, write_tree};
