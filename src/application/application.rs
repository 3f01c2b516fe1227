use snafu::Snafu;
use snafu::prelude::*;
use tracing::debug;

use crate::application::RuntimeConfig;
use crate::application::data::Operation;
use crate::application::operations::{self, OperationError};
use crate::session::{ConnectError, ZkSession};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        debug!("Runtime config: {:?}", app_config);

        // Closed when dropped at the end of this scope, whatever the outcome.
        let session =
            ZkSession::connect(&app_config.address, app_config.timeout).context(ConnectionSnafu)?;

        let root = &app_config.root_path;
        let file = app_config.file.as_path();
        let outcome = match app_config.operation {
            Operation::Dump => operations::dump(&session, root, file).await,
            Operation::Load => operations::load(&session, root, file).await,
        };
        let count = outcome.context(OperationSnafu {
            operation: app_config.operation,
        })?;
        debug!("{} finished after {} nodes", app_config.operation, count);

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Could not connect to the coordination service"))]
    ConnectionError { source: ConnectError },
    #[snafu(display("Critical failure encountered during {operation}"))]
    OperationError {
        operation: Operation,
        source: OperationError,
    },
}
