use clap::Parser;
use ezdatapipe_cli::arguments::parse_variables;
use ezdatapipe_cli::cli_args::{Args, Operation};
use ezdatapipe_core::config::{self, KEEP_TEMP_FILE_VAR, OUTPUT_FORMAT_ENV};
use ezdatapipe_core::data_file::{self, FormatTag, WriteOptions};
use ezdatapipe_core::error::{Error, Result};
use ezdatapipe_core::execution::{self, ProcessResult};
use ezdatapipe_core::path_filter::PathFilter;
use ezdatapipe_core::value::{merge, DataValue, Mapping};
use ezdatapipe_core::{file_handling, interpolation};
use itertools::Itertools;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

/// Where and how documents are printed
struct Printer {
    format: FormatTag,
    options: WriteOptions,
}

impl Printer {
    fn from_args(args: &Args) -> Self {
        Self {
            format: config::resolve_output_format(
                args.output_format,
                env::var(OUTPUT_FORMAT_ENV).ok(),
            ),
            options: WriteOptions { pretty: args.pretty },
        }
    }

    fn print(&self, value: &DataValue) -> Result<()> {
        let text = data_file::to_string(value, self.format, &self.options)?;
        if text.ends_with('\n') {
            print!("{text}");
        } else {
            println!("{text}");
        }
        Ok(())
    }

    /// Prints a process result and reports whether the process succeeded.
    fn print_process_result(&self, result: &ProcessResult) -> Result<bool> {
        self.print(&result.to_data_value())?;
        Ok(result.success())
    }
}

fn convert(
    input: &str,
    output: &str,
    from: Option<FormatTag>,
    to: Option<FormatTag>,
    options: &WriteOptions,
) -> Result<()> {
    let input = config::expand_path(input);
    let output = config::expand_path(output);

    let value = data_file::read_data_file(&input, from)?;
    data_file::write_data_file(&output, &value, to, options)?;

    info!("Converted `{}` to `{}`", input, output);
    Ok(())
}

fn filter(
    printer: &Printer,
    input: &str,
    patterns: &[String],
    format: Option<FormatTag>,
    with_paths: bool,
) -> Result<()> {
    // Compile patterns before touching the file
    let path_filter = PathFilter::new(patterns)?;
    let value = data_file::read_data_file(config::expand_path(input), format)?;

    let matches: Vec<DataValue> = if with_paths {
        path_filter
            .filter_with_paths(&value)
            .into_iter()
            .map(|(path, node)| {
                DataValue::from_iter([("path", DataValue::from(path)), ("value", node.clone())])
            })
            .collect()
    } else {
        path_filter.filter(&value).into_iter().cloned().collect()
    };

    debug!("{} node(s) matched", matches.len());
    printer.print(&filter_document(matches, printer.format))
}

/// TOML documents need a table at the root, so matches go under `matches`.
fn filter_document(matches: Vec<DataValue>, format: FormatTag) -> DataValue {
    let matches = DataValue::Sequence(matches);
    match format {
        FormatTag::Toml => DataValue::from_iter([("matches", matches)]),
        FormatTag::Yaml | FormatTag::Json => matches,
    }
}

fn merge_files(
    printer: &Printer,
    inputs: &[String],
    target: Option<&str>,
    format: Option<FormatTag>,
) -> Result<()> {
    let mut merged = Mapping::new();

    for input in inputs {
        let input = config::expand_path(input);
        match data_file::read_data_file(&input, None)? {
            DataValue::Mapping(mapping) => merge(&mapping, &mut merged),
            _ => return Err(Error::NotAMapping { path: input }),
        }
    }

    let merged = DataValue::Mapping(merged);
    match target {
        Some(target) => {
            let target = config::expand_path(target);
            data_file::write_data_file(&target, &merged, format, &printer.options)?;
            info!("Merged {} file(s) into `{}`", inputs.len(), target);
            Ok(())
        }
        None => printer.print(&merged),
    }
}

fn print_variables(variables: &HashMap<String, String>) {
    if variables.is_empty() {
        return;
    }

    debug!("With template variables:");
    for (key, value) in variables.iter().sorted() {
        debug!("\t\"{key}\": \"{value}\"");
    }
}

fn dry_run_template(template: &str, inline: bool, variables: &HashMap<String, String>) -> Result<()> {
    let source = if inline {
        template.to_string()
    } else {
        file_handling::read_to_string("template", config::expand_path(template))?
    };

    let missing = interpolation::get_template_keys(&source)?
        .into_iter()
        .filter(|key| !variables.contains_key(key))
        .join(", ");
    if !missing.is_empty() {
        warn!("No value given for template variable(s): {}", missing);
    }

    println!("{}", interpolation::render_template_string(&source, variables)?);
    println!("Dry run is specified, exiting without executing.");
    Ok(())
}

fn run_template(
    printer: &Printer,
    template: &str,
    variables: &[String],
    inline: bool,
    keep_temp_file: bool,
    dry_run: bool,
) -> Result<bool> {
    let mut variables = parse_variables(variables)?;
    if keep_temp_file {
        variables.insert(KEEP_TEMP_FILE_VAR.to_string(), "true".to_string());
    }
    print_variables(&variables);

    if dry_run {
        dry_run_template(template, inline, &variables)?;
        return Ok(true);
    }

    let result = if inline {
        execution::run_process_from_template_string(template, &variables)
    } else {
        execution::run_process_from_template(config::expand_path(template), &variables)
    };

    printer.print_process_result(&result)
}

/// Runs the selected operation; `Ok(false)` means a child process failed.
fn execute() -> Result<bool> {
    let args = Args::parse();
    let printer = Printer::from_args(&args);
    debug!("Printing documents as {}", printer.format);

    match &args.command {
        Operation::Convert {
            input,
            output,
            from,
            to,
        } => convert(input, output, *from, *to, &printer.options).map(|()| true),
        Operation::Filter {
            input,
            patterns,
            format,
            with_paths,
        } => filter(&printer, input, patterns, *format, *with_paths).map(|()| true),
        Operation::Merge {
            inputs,
            target,
            format,
        } => merge_files(&printer, inputs, target.as_deref(), *format).map(|()| true),
        Operation::Run { command } => printer.print_process_result(&execution::run_process(command)),
        Operation::Template {
            template,
            variables,
            inline,
            keep_temp_file,
            dry_run,
        } => run_template(
            &printer,
            template,
            variables,
            *inline,
            *keep_temp_file,
            *dry_run,
        ),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
