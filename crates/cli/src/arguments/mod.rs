//! Argument processing for the ezpipe CLI.
//!
//! This module handles the argument shapes that are not covered by the
//! clap-derived [`crate::cli_args::Args`]:
//! - **Template variables**: given as repeated `-v key=value` flags
//! - **Option specs**: ad-hoc `{short, long, has_value}` definitions parsed
//!   into a map from long name to the values collected for it

// Export public items from submodules
pub mod options;
pub mod processing;

// Re-exports for convenience
pub use options::{read_cli, read_process_cli, OptionSpec};
pub use processing::parse_variables;
