//! CLI subcommand definitions

use clap::Subcommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub(crate) enum Commands {
    /// Collect counters for every due concept (default)
    Run,
    /// Show last fetch and next due date per concept
    Status,
    /// Show quota units charged per Pacific day
    Quota,
}
