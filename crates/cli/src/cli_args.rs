//! Command-line argument parsing for the `ezpipe` binary.
//!
//! This module defines the command-line interface structure using the
//! `clap` crate.

use clap::{Parser, Subcommand};
use ezdatapipe_core::data_file::FormatTag;

/// Command-line arguments for the ezpipe CLI tool.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use ezdatapipe_cli::cli_args::Args;
///
/// let args = Args::parse_from(["ezpipe", "run", "echo", "hello"]);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(name = "ezpipe", term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Format of documents printed to stdout.
    ///
    /// If not provided, `EZPIPE_OUTPUT_FORMAT` is used, then YAML.
    #[arg(long, short = 'o', global = true)]
    pub output_format: Option<FormatTag>,

    /// Indent JSON output and use TOML's pretty printer.
    #[arg(long, global = true, action)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Operation,
}

#[derive(Subcommand, Debug)]
pub enum Operation {
    /// Read a data file and write it again, possibly in another format.
    Convert {
        /// File to read.
        input: String,

        /// File to write.
        output: String,

        /// Format of the input, instead of the one its extension names.
        #[arg(long)]
        from: Option<FormatTag>,

        /// Format of the output, instead of the one its extension names.
        #[arg(long)]
        to: Option<FormatTag>,
    },

    /// Print the nodes of a data file whose path matches a pattern.
    ///
    /// Paths look like `key3[1].key4`; patterns are regular expressions that
    /// may match anywhere in the path. TOML output puts the matches under a
    /// `matches` key.
    Filter {
        /// File to read.
        input: String,

        /// Pattern to match node paths against. May be repeated.
        #[arg(long = "pattern", short = 'p', required = true, action = clap::ArgAction::Append)]
        patterns: Vec<String>,

        /// Format of the input, instead of the one its extension names.
        #[arg(long, short = 'f')]
        format: Option<FormatTag>,

        /// Print each node together with its path.
        #[arg(long, short = 'w', action)]
        with_paths: bool,
    },

    /// Deep merge data files, later files overriding earlier ones.
    Merge {
        /// Files to merge, in order of increasing precedence.
        #[arg(num_args(2..), required = true)]
        inputs: Vec<String>,

        /// Write the result to this file instead of printing it.
        #[arg(long, short = 't')]
        target: Option<String>,

        /// Format of the target file, instead of the one its extension names.
        #[arg(long, short = 'f')]
        format: Option<FormatTag>,
    },

    /// Run a command and print its captured result.
    Run {
        /// The command and its arguments.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },

    /// Render a template into a script and run it.
    Template {
        /// Path to the template file, or the template itself with `--inline`.
        template: String,

        /// Template variables in the format key=value. May be repeated.
        #[arg(long = "var", short = 'v', action = clap::ArgAction::Append)]
        variables: Vec<String>,

        /// Treat the template argument as the template text.
        #[arg(long, short = 'i', action)]
        inline: bool,

        /// Keep the generated script instead of removing it after the run.
        #[arg(long, short = 'k', action)]
        keep_temp_file: bool,

        /// Print the rendered script but do not run it.
        #[arg(long, short = 'd', action)]
        dry_run: bool,
    },
}
