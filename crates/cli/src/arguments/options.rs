//! Parsing of ad-hoc option definitions.
//!
//! Scripts that drive ezdatapipe describe their options as a list of
//! [`OptionSpec`]s instead of a derived clap struct. [`read_cli`] builds a
//! clap command from those specs and collects every occurrence of every
//! option under its long name.

use std::ffi::OsString;

use clap::{Arg, ArgAction, Command};
use ezdatapipe_core::error::Error::OptionParse;
use ezdatapipe_core::error::Result;
use indexmap::IndexMap;
use log::debug;

/// Hidden positional that swallows everything after the first non-option.
const REMAINDER_ID: &str = "__remainder";

/// One option definition: `-s`/`--long`, optionally taking a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub short: char,
    pub long: String,
    pub has_value: bool,
}

impl OptionSpec {
    pub fn new(short: char, long: &str, has_value: bool) -> Self {
        Self {
            short,
            long: long.to_string(),
            has_value,
        }
    }
}

fn build_command(specs: &[OptionSpec]) -> Command {
    let mut command = Command::new("ezpipe")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new(REMAINDER_ID)
                .num_args(0..)
                .trailing_var_arg(true)
                .hide(true),
        );

    for spec in specs {
        let arg = Arg::new(spec.long.clone())
            .short(spec.short)
            .long(spec.long.clone());

        let arg = if spec.has_value {
            arg.action(ArgAction::Append).num_args(1)
        } else {
            arg.action(ArgAction::Count)
        };

        command = command.arg(arg);
    }

    command
}

/// Parses `args` (program name first) against the option specs.
///
/// Every occurrence of an option, in short or long form, appends its value
/// under the option's long name; options without a value append an empty
/// string per occurrence. Options that never occur are absent from the map.
/// Option parsing stops at the first positional argument.
///
/// # Errors
///
/// Returns [`OptionParse`] for unknown options or missing values.
///
/// # Examples
///
/// ```rust
/// use ezdatapipe_cli::arguments::{read_cli, OptionSpec};
///
/// let specs = [OptionSpec::new('o', "opt", true)];
/// let options = read_cli(&specs, ["prog", "--opt", "a", "-o", "b"])?;
/// assert_eq!(options["opt"], vec!["a", "b"]);
/// # Ok::<(), ezdatapipe_core::error::Error>(())
/// ```
pub fn read_cli<I, T>(specs: &[OptionSpec], args: I) -> Result<IndexMap<String, Vec<String>>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command(specs)
        .try_get_matches_from(args)
        .map_err(|e| OptionParse(e.to_string()))?;

    let mut options = IndexMap::new();
    for spec in specs {
        let values: Vec<String> = if spec.has_value {
            matches
                .get_many::<String>(spec.long.as_str())
                .map(|values| values.cloned().collect())
                .unwrap_or_default()
        } else {
            vec![String::new(); usize::from(matches.get_count(spec.long.as_str()))]
        };

        if !values.is_empty() {
            options.insert(spec.long.clone(), values);
        }
    }

    debug!("Parsed options: {:?}", options);
    Ok(options)
}

/// Applies [`read_cli`] to the arguments of the running process.
///
/// # Errors
///
/// See [`read_cli`].
pub fn read_process_cli(specs: &[OptionSpec]) -> Result<IndexMap<String, Vec<String>>> {
    read_cli(specs, std::env::args_os())
}
