//! Running processes and generated scripts with captured output.
//!
//! None of these functions return an error: failures to start a process
//! or to render a script are reported in the [`ProcessResult`] itself, with
//! `returncode` 1 and a diagnostic in `stderr`.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use log::{debug, info, warn};
use serde::Serialize;
use tempfile::TempPath;

use crate::config::{KEEP_TEMP_FILE_VAR, TEMP_SCRIPT_PREFIX};
use crate::error::{Error, Result};
use crate::interpolation;
use crate::value::{DataValue, Mapping};

/// Captured outcome of a process run.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessResult {
    pub returncode: i32,
    pub stdout: String,
    pub stderr: String,
    pub cmd: Vec<String>,
    /// Script text the process was generated from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_text: Option<String>,
}

impl ProcessResult {
    fn new(cmd: Vec<String>) -> Self {
        Self {
            cmd,
            ..Self::default()
        }
    }

    fn failed(cmd: Vec<String>, error: &Error) -> Self {
        Self {
            returncode: 1,
            stderr: error.exception_message(),
            cmd,
            ..Self::default()
        }
    }

    pub fn success(&self) -> bool {
        self.returncode == 0
    }

    /// Converts the result into a mapping, e.g. to print it through a data
    /// file codec.
    pub fn to_data_value(&self) -> DataValue {
        let mut mapping = Mapping::new();
        mapping.insert("returncode".to_string(), i64::from(self.returncode).into());
        mapping.insert("stdout".to_string(), self.stdout.clone().into());
        mapping.insert("stderr".to_string(), self.stderr.clone().into());
        mapping.insert(
            "cmd".to_string(),
            DataValue::Sequence(self.cmd.iter().map(|arg| arg.as_str().into()).collect()),
        );
        if let Some(command_text) = &self.command_text {
            mapping.insert("command_text".to_string(), command_text.clone().into());
        }
        DataValue::Mapping(mapping)
    }
}

/// Runs `cmd[0]` with the remaining arguments and captures its output.
///
/// Standard input is inherited. A process killed by a signal reports
/// returncode -1.
pub fn run_process(cmd: &[String]) -> ProcessResult {
    let Some((program, arguments)) = cmd.split_first() else {
        return ProcessResult::failed(Vec::new(), &Error::EmptyCommand);
    };

    info!("Running process: {:?}", cmd);
    let output = Command::new(program)
        .args(arguments)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    match output {
        Ok(output) => {
            let mut result = ProcessResult::new(cmd.to_vec());
            result.returncode = output.status.code().unwrap_or(-1);
            result.stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            result.stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            debug!("Process exited with {}", result.returncode);
            result
        }
        Err(e) => ProcessResult::failed(cmd.to_vec(), &Error::SubProcess(e)),
    }
}

/// Renders a template file; the rendered text is returned in `stdout`.
pub fn process_template<S: std::hash::BuildHasher>(
    template_file: impl AsRef<Path>,
    variables: &HashMap<String, String, S>,
) -> ProcessResult {
    match interpolation::render_template_file(template_file, variables) {
        Ok(rendered) => ProcessResult {
            stdout: rendered,
            ..ProcessResult::default()
        },
        Err(e) => ProcessResult::failed(Vec::new(), &e),
    }
}

/// Writes `cmd_text` to an executable temporary file and runs it.
///
/// The file is removed afterwards unless `keep_temp_file` is set.
pub fn run_process_from_string(cmd_text: &str, keep_temp_file: bool) -> ProcessResult {
    let script = match write_script(cmd_text) {
        Ok(script) => script,
        Err(e) => {
            let mut result = ProcessResult::failed(Vec::new(), &e);
            result.command_text = Some(cmd_text.to_string());
            return result;
        }
    };

    let mut result = run_process(&[script.to_string_lossy().into_owned()]);
    result.command_text = Some(cmd_text.to_string());

    if keep_temp_file {
        match script.keep() {
            Ok(path) => info!("Kept generated script at `{}`", path.display()),
            Err(e) => warn!("Could not keep generated script: {}", e),
        }
    } else if let Err(e) = script.close() {
        warn!("Could not remove generated script: {}", e);
    }

    result
}

/// Renders a template file and runs the result as a script.
///
/// The script is kept when `variables` contains [`KEEP_TEMP_FILE_VAR`].
pub fn run_process_from_template<S: std::hash::BuildHasher>(
    template_file: impl AsRef<Path>,
    variables: &HashMap<String, String, S>,
) -> ProcessResult {
    let template_file = template_file.as_ref();
    let mut rendered = process_template(template_file, variables);

    if rendered.success() {
        run_process_from_string(&rendered.stdout, variables.contains_key(KEEP_TEMP_FILE_VAR))
    } else {
        let mut names: Vec<&String> = variables.keys().collect();
        names.sort();
        rendered.cmd = vec![format!(
            "process_template({}, {:?})",
            template_file.display(),
            names
        )];
        rendered
    }
}

/// Renders a template string and runs the result as a script.
///
/// The script is kept when `variables` contains [`KEEP_TEMP_FILE_VAR`].
pub fn run_process_from_template_string<S: std::hash::BuildHasher>(
    template: &str,
    variables: &HashMap<String, String, S>,
) -> ProcessResult {
    match interpolation::render_template_string(template, variables) {
        Ok(cmd_text) => {
            run_process_from_string(&cmd_text, variables.contains_key(KEEP_TEMP_FILE_VAR))
        }
        Err(e) => ProcessResult::failed(Vec::new(), &e),
    }
}

fn write_script(cmd_text: &str) -> Result<TempPath> {
    let script_error = |e: std::io::Error| {
        Error::io_error("generated script".to_string(), "<temporary>".to_string(), e)
    };

    let mut file = tempfile::Builder::new()
        .prefix(TEMP_SCRIPT_PREFIX)
        .tempfile()
        .map_err(script_error)?;
    file.write_all(cmd_text.as_bytes()).map_err(script_error)?;

    // The write handle must be closed before the script can be executed.
    let path = file.into_temp_path();
    set_executable(&path).map_err(|e| {
        Error::io_error("generated script".to_string(), path.display().to_string(), e)
    })?;

    Ok(path)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o500))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_run_process_captures_stdout() {
        let cmd = args(&["echo", "test"]);
        let result = run_process(&cmd);
        assert_eq!(
            result,
            ProcessResult {
                returncode: 0,
                stdout: "test\n".to_string(),
                stderr: String::new(),
                cmd,
                command_text: None,
            }
        );
    }

    #[test]
    fn test_run_process_reports_exit_code() {
        let result = run_process(&args(&["sh", "-c", "echo oops >&2; exit 3"]));
        assert_eq!(result.returncode, 3);
        assert_eq!(result.stderr, "oops\n");
        assert!(!result.success());
    }

    #[test]
    fn test_run_process_missing_executable() {
        let result = run_process(&args(&["/this/program/does/not/exist"]));
        assert_eq!(result.returncode, 1);
        assert!(result
            .stderr
            .starts_with("An exception of type NotFound occurred. Arguments:\n"));
        assert!(result.stdout.is_empty());
    }

    #[test]
    fn test_run_process_empty_command() {
        let result = run_process(&[]);
        assert_eq!(result.returncode, 1);
        assert!(result.stderr.contains("EmptyCommand"));
    }

    #[test]
    fn test_run_process_from_template_string() {
        let variables: HashMap<String, String> =
            [("instring".to_string(), "test".to_string())].into_iter().collect();
        let result = run_process_from_template_string("#!/bin/sh\necho {instring}", &variables);

        assert_eq!(result.returncode, 0);
        assert_eq!(result.stdout, "test\n");
        assert_eq!(result.command_text.as_deref(), Some("#!/bin/sh\necho test"));
    }

    #[test]
    fn test_run_process_from_template_string_bad_template() {
        let variables: HashMap<String, String> =
            [("instringaaa".to_string(), "test".to_string())].into_iter().collect();
        let result = run_process_from_template_string("echo {instring}", &variables);

        assert_ne!(result.returncode, 0);
        assert!(result.stderr.contains("exception"));
    }

    #[test]
    fn test_temp_script_removed_unless_kept() {
        let removed = run_process_from_string("#!/bin/sh\necho $0", false);
        let removed_path = removed.cmd[0].clone();
        assert!(!Path::new(&removed_path).exists());

        let kept = run_process_from_string("#!/bin/sh\necho $0", true);
        let kept_path = kept.cmd[0].clone();
        assert!(Path::new(&kept_path).exists());
        std::fs::remove_file(kept_path).unwrap();
    }

    #[test]
    fn test_process_template_missing_file() {
        let variables: HashMap<String, String> = HashMap::new();
        let result = process_template("/this/template/does/not/exist", &variables);
        assert_eq!(result.returncode, 1);
        assert!(result
            .stderr
            .starts_with("An exception of type TemplateNotFound occurred. Arguments:\n"));
    }

    #[test]
    fn test_to_data_value() {
        let result = ProcessResult {
            returncode: 2,
            stdout: "out".to_string(),
            stderr: String::new(),
            cmd: args(&["false"]),
            command_text: None,
        };
        let value = result.to_data_value();
        assert_eq!(value.get("returncode"), Some(&DataValue::from(2i64)));
        assert_eq!(value.get("stdout"), Some(&DataValue::from("out")));
        assert!(value.get("command_text").is_none());
    }
}
