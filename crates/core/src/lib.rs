//! ezdatapipe Core Library
//!
//! This crate provides the building blocks of ezdatapipe, a small toolkit for
//! moving structured data between files and processes.
//!
//! # Key Features
//!
//! - **Data Files**: Read and write YAML, JSON and TOML through one value type,
//!   with the format picked by file extension or given explicitly
//! - **Path Filtering**: Select nodes of a data tree by regular expressions
//!   over their `key[0].child` paths
//! - **Merging**: Deep merge of mappings
//! - **Process Execution**: Run commands or generated scripts and capture
//!   their output
//! - **Templating**: Render `{placeholder}` templates into scripts
//!
//! # Examples
//!
//! Loading a data file and selecting nodes from it:
//!
//! ```no_run
//! use ezdatapipe_core::data_file::read_data_file;
//! use ezdatapipe_core::path_filter::PathFilter;
//!
//! let data = read_data_file("inventory.yml", None)?;
//! let hosts = PathFilter::new([r"\.host$"])?.filter(&data);
//! for host in hosts {
//!     println!("{:?}", host);
//! }
//! # Ok::<(), ezdatapipe_core::error::Error>(())
//! ```

pub mod config;
pub mod data_file;
pub mod error;
pub mod execution;
pub mod file_handling;
pub mod interpolation;
pub mod path_filter;
pub mod value;
