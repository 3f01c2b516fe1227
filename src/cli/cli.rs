use std::path::PathBuf;

use clap::Parser;

use crate::application::data::{LogLevel, Operation};
use crate::znode::ZnodePath;

/// Dump a ZooKeeper subtree to a file, or load one back.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Operation to perform
    #[clap(value_enum)]
    pub operation: Operation,

    /// ZooKeeper to connect to
    #[clap(long, default_value = "localhost:2181", value_name = "HOST:PORT")]
    pub zk: String,

    /// Root path to dump from or load into
    #[clap(long = "rootPath", alias = "root-path", default_value = "/")]
    pub root_path: ZnodePath,

    /// File to write the snapshot to, or read it from
    #[clap(long)]
    pub file: PathBuf,

    /// Session timeout in seconds, applied to every remote call
    #[clap(long, default_value_t = 10, value_name = "SECONDS")]
    pub timeout: u64,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}
