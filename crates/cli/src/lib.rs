//! ezdatapipe CLI Library
//!
//! This crate provides the command-line interface for ezdatapipe. It parses
//! arguments, drives the core library, and prints results as YAML, JSON or
//! TOML documents.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing for the `ezpipe` binary
//! - [`arguments`]: Template variable parsing and ad-hoc option specs
//!
//! # Examples
//!
//! ```bash
//! # Convert a YAML file to JSON
//! ezpipe convert settings.yml settings.json
//!
//! # Print every `host` value of an inventory, with its path
//! ezpipe filter inventory.toml -p '\.host$' --with-paths
//!
//! # Merge an overlay onto a base file
//! ezpipe merge base.yml overlay.json -t merged.yml
//!
//! # Render a script template and run it
//! ezpipe template deploy.tpl -v env=prod -v region=eu
//! ```

pub mod arguments;
pub mod cli_args;
