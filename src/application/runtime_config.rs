use std::path::PathBuf;
use std::time::Duration;

use crate::application::data::Operation;
use crate::cli::Cli;
use crate::znode::ZnodePath;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub operation: Operation,
    pub address: String,
    pub root_path: ZnodePath,
    pub file: PathBuf,
    pub timeout: Duration,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            operation: cli.operation,
            address: cli.zk,
            root_path: cli.root_path,
            file: cli.file,
            timeout: Duration::from_secs(cli.timeout),
        }
    }
}
