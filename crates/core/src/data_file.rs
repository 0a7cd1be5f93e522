//! Format-agnostic reading and writing of YAML, JSON and TOML data files.
//!
//! A file's format is either given explicitly or resolved from its
//! extension; the resolved [`FormatTag`] then selects the codec that reads
//! or writes a [`DataValue`].

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::DataValue;

/// Path reported for parse failures of in-memory text.
const TEXT_SOURCE: &str = "<text>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Yaml,
    Json,
    Toml,
}

/// Known file extensions, lowercase and including the dot.
pub const EXTENSION_FORMATS: [(&str, FormatTag); 5] = [
    (".yml", FormatTag::Yaml),
    (".yaml", FormatTag::Yaml),
    (".json", FormatTag::Json),
    (".jsn", FormatTag::Json),
    (".toml", FormatTag::Toml),
];

impl FormatTag {
    /// Looks up an extension such as `.json`; the match is case-insensitive.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_lowercase();
        EXTENSION_FORMATS
            .iter()
            .find(|(known, _)| *known == extension)
            .map(|(_, format)| *format)
    }

    pub fn for_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        Self::from_extension(&format!(".{extension}"))
    }

    pub fn name(self) -> &'static str {
        match self {
            FormatTag::Yaml => "yaml",
            FormatTag::Json => "json",
            FormatTag::Toml => "toml",
        }
    }
}

impl Display for FormatTag {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for FormatTag {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(FormatTag::Yaml),
            "json" | "jsn" => Ok(FormatTag::Json),
            "toml" => Ok(FormatTag::Toml),
            other => Err(format!(
                "unknown format `{other}`, expected one of yaml, json or toml"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
}

/// Writer settings shared by all formats.
///
/// YAML is always written in block style, one key per line. `pretty`
/// indents JSON output (compact separators otherwise) and selects TOML's
/// pretty printer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub pretty: bool,
}

pub type ReadFn = fn(&Path) -> Result<DataValue>;
pub type WriteFn = fn(&Path, &DataValue, &WriteOptions) -> Result<()>;

/// A codec function bound to one format.
#[derive(Clone, Copy)]
pub enum Accessor {
    Read(ReadFn),
    Write(WriteFn),
}

impl std::fmt::Debug for Accessor {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Accessor::Read(_) => formatter.write_str("Accessor::Read"),
            Accessor::Write(_) => formatter.write_str("Accessor::Write"),
        }
    }
}

/// Picks the format for `path`: the explicit one if given, otherwise the
/// one registered for the file's extension.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] if no format is given and the
/// extension is unknown or missing.
pub fn resolve_format(path: &Path, format: Option<FormatTag>) -> Result<FormatTag> {
    if let Some(format) = format {
        return Ok(format);
    }

    FormatTag::for_path(path)
        .ok_or_else(|| Error::unsupported_format(path.display().to_string()))
}

/// Resolves the codec function that performs `action` on `path`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] if the format cannot be resolved.
pub fn resolve(path: &Path, action: Action, format: Option<FormatTag>) -> Result<Accessor> {
    let format = resolve_format(path, format)?;
    debug!("Resolved {} as {format} for {action:?}", path.display());

    Ok(match action {
        Action::Read => Accessor::Read(reader(format)),
        Action::Write => Accessor::Write(writer(format)),
    })
}

pub fn reader(format: FormatTag) -> ReadFn {
    match format {
        FormatTag::Yaml => read_yaml_file,
        FormatTag::Json => read_json_file,
        FormatTag::Toml => read_toml_file,
    }
}

pub fn writer(format: FormatTag) -> WriteFn {
    match format {
        FormatTag::Yaml => write_yaml_file,
        FormatTag::Json => write_json_file,
        FormatTag::Toml => write_toml_file,
    }
}

/// Reads a data file into a [`DataValue`].
///
/// # Errors
///
/// Returns an error if:
/// - The format cannot be resolved ([`Error::UnsupportedFormat`])
/// - The file cannot be read ([`Error::Io`])
/// - The contents are not valid for the format ([`Error::DataFileParse`])
///
/// # Examples
///
/// ```no_run
/// use ezdatapipe_core::data_file::read_data_file;
///
/// let settings = read_data_file("settings.toml", None)?;
/// println!("{:?}", settings.get("name"));
/// # Ok::<(), ezdatapipe_core::error::Error>(())
/// ```
pub fn read_data_file(path: impl AsRef<Path>, format: Option<FormatTag>) -> Result<DataValue> {
    let path = path.as_ref();
    let Accessor::Read(read) = resolve(path, Action::Read, format)? else {
        return Err(Error::unsupported_format(path.display().to_string()));
    };
    read(path)
}

/// Serializes `value` and overwrites the data file with it.
///
/// The value is serialized before the file is touched, so a value the
/// format cannot represent leaves an existing file as it was.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] if the format cannot be resolved and
/// [`Error::DataFileWrite`] if serialization or writing fails.
pub fn write_data_file(
    path: impl AsRef<Path>,
    value: &DataValue,
    format: Option<FormatTag>,
    options: &WriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let Accessor::Write(write) = resolve(path, Action::Write, format)? else {
        return Err(Error::unsupported_format(path.display().to_string()));
    };
    write(path, value, options)
}

/// Parses text in the given format.
///
/// # Errors
///
/// Returns [`Error::DataFileParse`] if the text is not valid for the format.
pub fn parse_str(text: &str, format: FormatTag) -> Result<DataValue> {
    parse_source(text, format, TEXT_SOURCE)
}

/// Serializes `value` as text in the given format.
///
/// # Errors
///
/// Returns [`Error::DataFileWrite`] if the format cannot represent the value,
/// e.g. a null or a non-table root in TOML.
pub fn to_string(value: &DataValue, format: FormatTag, options: &WriteOptions) -> Result<String> {
    serialize(value, format, options).map_err(|message| {
        Error::data_file_write(format, TEXT_SOURCE.to_string(), message)
    })
}

fn parse_source(text: &str, format: FormatTag, source: &str) -> Result<DataValue> {
    let parsed = match format {
        FormatTag::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        FormatTag::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        FormatTag::Toml => toml::from_str(text).map_err(|e| e.to_string()),
    };

    parsed.map_err(|message| Error::data_file_parse(format, source.to_string(), message))
}

fn serialize(
    value: &DataValue,
    format: FormatTag,
    options: &WriteOptions,
) -> std::result::Result<String, String> {
    match format {
        FormatTag::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        FormatTag::Json if options.pretty => {
            serde_json::to_string_pretty(value).map_err(|e| e.to_string())
        }
        FormatTag::Json => serde_json::to_string(value).map_err(|e| e.to_string()),
        FormatTag::Toml if options.pretty => {
            toml::to_string_pretty(value).map_err(|e| e.to_string())
        }
        FormatTag::Toml => toml::to_string(value).map_err(|e| e.to_string()),
    }
}

fn read_file(path: &Path, format: FormatTag) -> Result<DataValue> {
    let source = path.display().to_string();
    let bytes = fs::read(path)
        .map_err(|e| Error::io_error(format!("{format} data"), source.clone(), e))?;
    let text =
        String::from_utf8(bytes).map_err(|e| Error::data_file_parse(format, source.clone(), e))?;

    parse_source(&text, format, &source)
}

fn write_file(
    path: &Path,
    value: &DataValue,
    format: FormatTag,
    options: &WriteOptions,
) -> Result<()> {
    let write_error = |message: String| {
        Error::data_file_write(format, path.display().to_string(), message)
    };

    let text = serialize(value, format, options).map_err(write_error)?;
    fs::write(path, text).map_err(|e| write_error(e.to_string()))
}

fn read_yaml_file(path: &Path) -> Result<DataValue> {
    read_file(path, FormatTag::Yaml)
}

fn write_yaml_file(path: &Path, value: &DataValue, options: &WriteOptions) -> Result<()> {
    write_file(path, value, FormatTag::Yaml, options)
}

fn read_json_file(path: &Path) -> Result<DataValue> {
    read_file(path, FormatTag::Json)
}

fn write_json_file(path: &Path, value: &DataValue, options: &WriteOptions) -> Result<()> {
    write_file(path, value, FormatTag::Json, options)
}

fn read_toml_file(path: &Path) -> Result<DataValue> {
    read_file(path, FormatTag::Toml)
}

fn write_toml_file(path: &Path, value: &DataValue, options: &WriteOptions) -> Result<()> {
    write_file(path, value, FormatTag::Toml, options)
}
