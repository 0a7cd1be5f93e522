//! Placeholder templates for generated scripts.
//!
//! Templates use `leon` syntax: `{name}` is replaced by the variable `name`
//! and `\{` writes a literal brace.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use indexmap::IndexSet;
use leon::Template;
use log::debug;

use crate::error::{Error, Result};
use crate::file_handling;

/// Renders a template string with the given variables.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed placeholders and [`Error::Render`]
/// if a placeholder has no variable.
pub fn render_template_string<S: std::hash::BuildHasher>(
    template: &str,
    variables: &HashMap<String, String, S>,
) -> Result<String> {
    let template = Template::parse(template)?;
    Ok(template.render(variables)?)
}

/// Reads a template file and renders it with the given variables.
///
/// # Errors
///
/// Returns [`Error::TemplateNotFound`] if the file does not exist, otherwise
/// the errors of [`render_template_string`] or of reading the file.
pub fn render_template_file<S: std::hash::BuildHasher>(
    path: impl AsRef<Path>,
    variables: &HashMap<String, String, S>,
) -> Result<String> {
    let path = path.as_ref();
    debug!("Rendering template file `{}`", path.display());

    let source = file_handling::read_to_string("template", path).map_err(|e| match e {
        Error::Io { original, .. } if original.kind() == ErrorKind::NotFound => {
            Error::TemplateNotFound {
                path: path.display().to_string(),
            }
        }
        other => other,
    })?;

    render_template_string(&source, variables)
}

/// Finds the placeholder names of a template, in order of first appearance.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed placeholders.
pub fn get_template_keys(template: &str) -> Result<IndexSet<String>> {
    let template = Template::parse(template)?;
    Ok(template.keys().map(|key| (*key).to_string()).collect())
}
