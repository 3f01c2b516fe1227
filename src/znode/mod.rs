//! In-memory representation of a znode subtree.
//!
//! A snapshot is a single rooted tree of [`Node`]s. Paths are plain absolute
//! strings; [`ZnodePath`] is the validated form accepted from the command line.

mod node;
pub mod path;

pub use node::Node;
pub use path::{InvalidPathError, ZnodePath};
