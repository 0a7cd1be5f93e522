use leon::{ParseError, RenderError};
use thiserror::Error;

use crate::data_file::FormatTag;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing or unsupported format for data file at `{}`", .path)]
    UnsupportedFormat { path: String },

    #[error("Error parsing {} data file at `{}`: {}", .format, .path, .message)]
    DataFileParse {
        format: FormatTag,
        path: String,
        message: String,
    },

    #[error("Error writing {} data file at `{}`: {}", .format, .path, .message)]
    DataFileWrite {
        format: FormatTag,
        path: String,
        message: String,
    },

    #[error("Data file at `{}` does not hold a mapping at its root", .path)]
    NotAMapping { path: String },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Error with sub process: {}", _0)]
    SubProcess(#[from] std::io::Error),

    #[error("No command was given to run.")]
    EmptyCommand,

    #[error("Template file not found at `{}`", .path)]
    TemplateNotFound { path: String },

    #[error("Error parsing placeholder string: {}", .0)]
    Parse(#[from] ParseError),

    #[error("Error rendering placeholder template string: {}", .0)]
    Render(#[from] RenderError),

    #[error("Invalid path pattern: {}", .0)]
    Pattern(#[from] regex::Error),

    #[error("Error parsing command line options: {}", .0)]
    OptionParse(String),

    #[error("Invalid template variable `{}`: expected the format key=value", .0)]
    VariableFormat(String),
}

impl Error {
    pub fn unsupported_format(path: String) -> Self {
        Self::UnsupportedFormat { path }
    }

    pub fn data_file_parse(format: FormatTag, path: String, message: impl ToString) -> Self {
        Self::DataFileParse {
            format,
            path,
            message: message.to_string(),
        }
    }

    pub fn data_file_write(format: FormatTag, path: String, message: impl ToString) -> Self {
        Self::DataFileWrite {
            format,
            path,
            message: message.to_string(),
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    /// Short name of the failure, as reported in process diagnostics.
    ///
    /// I/O failures report their [`std::io::ErrorKind`] (`NotFound`,
    /// `PermissionDenied`, ...); everything else reports its variant name.
    pub fn kind_name(&self) -> String {
        match self {
            Self::SubProcess(original) | Self::Io { original, .. } => {
                format!("{:?}", original.kind())
            }
            Self::UnsupportedFormat { .. } => "UnsupportedFormat".to_string(),
            Self::DataFileParse { .. } => "DataFileParse".to_string(),
            Self::DataFileWrite { .. } => "DataFileWrite".to_string(),
            Self::NotAMapping { .. } => "NotAMapping".to_string(),
            Self::EmptyCommand => "EmptyCommand".to_string(),
            Self::TemplateNotFound { .. } => "TemplateNotFound".to_string(),
            Self::Parse(_) => "TemplateSyntaxError".to_string(),
            Self::Render(_) => "TemplateRenderError".to_string(),
            Self::Pattern(_) => "PatternError".to_string(),
            Self::OptionParse(_) => "OptionParse".to_string(),
            Self::VariableFormat(_) => "VariableFormat".to_string(),
        }
    }

    /// Diagnostic placed in a failed process result's stderr.
    pub fn exception_message(&self) -> String {
        format!(
            "An exception of type {} occurred. Arguments:\n{}",
            self.kind_name(),
            self
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_kind_name_for_io_errors() {
        let error = Error::SubProcess(std::io::Error::new(ErrorKind::NotFound, "gone"));
        assert_eq!(error.kind_name(), "NotFound");
    }

    #[test]
    fn test_exception_message_format() {
        let error = Error::TemplateNotFound {
            path: "/nowhere/template".to_string(),
        };
        assert_eq!(
            error.exception_message(),
            "An exception of type TemplateNotFound occurred. Arguments:\nTemplate file not found at `/nowhere/template`"
        );
    }

    #[test]
    fn test_data_file_parse_display_names_format_and_path() {
        let error = Error::data_file_parse(FormatTag::Json, "/tmp/x.json".to_string(), "eof");
        let message = error.to_string();
        assert!(message.contains("json"));
        assert!(message.contains("/tmp/x.json"));
        assert!(message.ends_with("eof"));
    }
}
