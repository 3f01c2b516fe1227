mod log_level;
mod operation;

pub use log_level::LogLevel;
pub use operation::Operation;
