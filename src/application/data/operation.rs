use clap::ValueEnum;
use derive_more::Display;

/// The two things this tool can do with a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
pub enum Operation {
    /// Dump a subtree to a snapshot file
    #[display("dump")]
    Dump,
    /// Load a snapshot file into a subtree
    #[display("load")]
    Load,
}
