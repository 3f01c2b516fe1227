//! The portable snapshot file: a YAML document describing one rooted tree.

mod snapshot_codec;
mod snapshot_file;

pub use snapshot_codec::{DecodeError, EncodeError, decode, encode};
pub use snapshot_file::{SnapshotFileError, read_snapshot_file, write_snapshot_file};
