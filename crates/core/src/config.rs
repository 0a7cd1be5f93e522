//! Configuration defaults and path utilities for ezdatapipe.
//!
//! This module holds the names and defaults shared by the library and the
//! `ezpipe` binary, and expands shell variables like `~` in user-given paths.

use crate::data_file::FormatTag;

/// Template variable that, when present, keeps the generated script on disk
pub const KEEP_TEMP_FILE_VAR: &str = "keepTempFile";

/// File name prefix of generated scripts
pub const TEMP_SCRIPT_PREFIX: &str = "ezpipe-";

/// Environment variable selecting the format printed documents are written in
pub const OUTPUT_FORMAT_ENV: &str = "EZPIPE_OUTPUT_FORMAT";

/// Format of printed documents when neither an argument nor the environment
/// selects one
pub const DEFAULT_OUTPUT_FORMAT: FormatTag = FormatTag::Yaml;

/// Expands shell variables in a user-given path.
///
/// `~` and `$VAR`/`${VAR}` are resolved. If any variable is unset, only
/// `~` is expanded and the variables are left as written.
///
/// # Examples
///
/// ```
/// use ezdatapipe_core::config::expand_path;
///
/// let expanded = expand_path("~/data/settings.yml");
/// assert!(!expanded.starts_with('~'));
/// assert!(expanded.ends_with("data/settings.yml"));
/// ```
pub fn expand_path(path: &str) -> String {
    match shellexpand::full(path) {
        Ok(expanded) => expanded.to_string(),
        Err(_) => shellexpand::tilde(path).to_string(),
    }
}

/// Picks the format printed documents are written in.
///
/// An explicit argument wins, then a parseable `env_value` (the contents of
/// [`OUTPUT_FORMAT_ENV`]), then [`DEFAULT_OUTPUT_FORMAT`].
pub fn resolve_output_format(arg: Option<FormatTag>, env_value: Option<String>) -> FormatTag {
    if let Some(format) = arg {
        return format;
    }

    env_value
        .and_then(|value| match value.parse::<FormatTag>() {
            Ok(format) => Some(format),
            Err(e) => {
                log::warn!("Ignoring {}: {}", OUTPUT_FORMAT_ENV, e);
                None
            }
        })
        .unwrap_or(DEFAULT_OUTPUT_FORMAT)
}
