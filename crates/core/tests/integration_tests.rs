//! Integration tests for ezdatapipe-core
//!
//! These tests verify that the core functionality works together correctly
//! by testing complete workflows end-to-end.

use ezdatapipe_core::{
    data_file::{
        parse_str, read_data_file, resolve, write_data_file, Accessor, Action, FormatTag,
        WriteOptions,
    },
    error::Error,
    execution::{run_process_from_template, ProcessResult},
    path_filter::PathFilter,
    value::{merge, DataValue},
};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn test_dict() -> DataValue {
    parse_str(
        r#"{"key1": "val1", "key2": "val2", "key3": ["text", "text2"]}"#,
        FormatTag::Json,
    )
    .unwrap()
}

/// Test writing a mapping to every supported extension and reading it back
#[test]
fn test_read_write_data_file_round_trip() {
    let dir = tempdir().unwrap();
    let data = test_dict();

    for name in ["test.yml", "test.yaml", "test.json", "test.jsn", "test.toml"] {
        let path = dir.path().join(name);
        write_data_file(&path, &data, None, &WriteOptions::default()).unwrap();
        assert_eq!(read_data_file(&path, None).unwrap(), data, "round trip of {name}");
    }
}

/// Test round trips of nested and mixed values with pretty output
#[test]
fn test_round_trip_nested_values() {
    let dir = tempdir().unwrap();
    let data = parse_str(
        r#"
servers:
  - name: alpha
    port: 8080
    weight: 0.5
    enabled: true
  - name: beta
    port: 8081
    weight: 1.5
    enabled: false
owner:
  name: ops
  tags: [a, b]
"#,
        FormatTag::Yaml,
    )
    .unwrap();

    for (name, pretty) in [
        ("nested.yml", false),
        ("nested.json", false),
        ("nested.json", true),
        ("nested.toml", false),
        ("nested.toml", true),
    ] {
        let path = dir.path().join(name);
        write_data_file(&path, &data, None, &WriteOptions { pretty }).unwrap();
        assert_eq!(read_data_file(&path, None).unwrap(), data, "round trip of {name}");
    }
}

/// Test that an explicit format is used regardless of the extension
#[test]
fn test_explicit_format_with_unknown_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.txt");
    let data = test_dict();

    let result = write_data_file(&path, &data, None, &WriteOptions::default());
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
    assert!(!path.exists());

    write_data_file(&path, &data, Some(FormatTag::Json), &WriteOptions::default()).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        r#"{"key1":"val1","key2":"val2","key3":["text","text2"]}"#
    );
    assert_eq!(read_data_file(&path, Some(FormatTag::Json)).unwrap(), data);
}

/// Test resolving codec functions and calling them directly
#[test]
fn test_resolved_accessors_read_and_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("accessor.yaml");
    let data = test_dict();

    let Accessor::Write(write) = resolve(&path, Action::Write, None).unwrap() else {
        panic!("Expected a writer");
    };
    write(&path, &data, &WriteOptions::default()).unwrap();

    let Accessor::Read(read) = resolve(&path, Action::Read, None).unwrap() else {
        panic!("Expected a reader");
    };
    assert_eq!(read(&path).unwrap(), data);
}

/// Test that a malformed file fails with a parse error and is left unchanged
#[test]
fn test_invalid_file_parse_error() {
    let cases = [
        ("bad.yml", "invalid: yaml: content: ["),
        ("bad.json", "{\"key\": "),
        ("bad.toml", "key = = value"),
    ];

    for (name, content) in cases {
        let mut temp_file = tempfile::Builder::new().suffix(name).tempfile().unwrap();
        write!(temp_file, "{content}").unwrap();
        let path = temp_file.path().to_path_buf();

        let result = read_data_file(&path, None);
        match result {
            Err(Error::DataFileParse { path: reported, .. }) => {
                assert_eq!(reported, path.display().to_string());
            }
            other => panic!("Expected DataFileParse for {name}, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    let mut temp_file = tempfile::Builder::new().suffix("bad.json").tempfile().unwrap();
    temp_file.write_all(b"{\"a\": \"\xff\xfe\"}").unwrap();
    match read_data_file(temp_file.path(), None) {
        Err(Error::DataFileParse { format, path, .. }) => {
            assert_eq!(format, FormatTag::Json);
            assert_eq!(path, temp_file.path().display().to_string());
        }
        other => panic!("Expected DataFileParse for invalid UTF-8, got {other:?}"),
    }
}

/// Test converting a TOML datetime to formats without a datetime type
#[test]
fn test_convert_toml_datetime() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("event.toml");
    fs::write(&source, "when = 1979-05-27T07:32:00Z\n").unwrap();

    let value = read_data_file(&source, None).unwrap();
    assert_eq!(value.get("when"), Some(&DataValue::from("1979-05-27T07:32:00Z")));

    let json = dir.path().join("event.json");
    write_data_file(&json, &value, None, &WriteOptions::default()).unwrap();
    assert_eq!(
        fs::read_to_string(&json).unwrap(),
        r#"{"when":"1979-05-27T07:32:00Z"}"#
    );

    let yaml = dir.path().join("event.yml");
    write_data_file(&yaml, &value, None, &WriteOptions::default()).unwrap();
    let yaml_text = fs::read_to_string(&yaml).unwrap();
    assert!(!yaml_text.contains("toml_private"));
    assert_eq!(read_data_file(&yaml, None).unwrap(), value);
}

/// Test loading a file and filtering it by path
#[test]
fn test_read_then_filter_workflow() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("filter.toml");
    fs::write(
        &path,
        r#"
title = "inventory"

[[hosts]]
name = "web"
address = "10.0.0.1"

[[hosts]]
name = "db"
address = "10.0.0.2"
"#,
    )
    .unwrap();

    let data = read_data_file(&path, None).unwrap();
    let filter = PathFilter::new([r"^hosts\[\d+\]\.address$"]).unwrap();

    let addresses: Vec<&str> = filter
        .filter(&data)
        .into_iter()
        .filter_map(DataValue::as_str)
        .collect();
    assert_eq!(addresses, vec!["10.0.0.1", "10.0.0.2"]);

    let with_paths = filter.filter_with_paths(&data);
    assert_eq!(with_paths[1].0, "hosts[1].address");
}

/// Test merging an overlay file onto a base file
#[test]
fn test_merge_files_workflow() {
    let dir = tempdir().unwrap();
    let base_path = dir.path().join("base.yml");
    let overlay_path = dir.path().join("overlay.json");

    fs::write(&base_path, "server:\n  host: localhost\n  port: 80\nname: base\n").unwrap();
    fs::write(&overlay_path, r#"{"server": {"port": 8080}}"#).unwrap();

    let mut base = read_data_file(&base_path, None).unwrap();
    let overlay = read_data_file(&overlay_path, None).unwrap();

    if let (DataValue::Mapping(base), Some(overlay)) = (&mut base, overlay.as_mapping()) {
        merge(overlay, base);
    } else {
        panic!("Expected mappings at the root of both files");
    }

    let server = base.get("server").unwrap();
    assert_eq!(server.get("host"), Some(&DataValue::from("localhost")));
    assert_eq!(server.get("port"), Some(&DataValue::from(8080i64)));
    assert_eq!(base.get("name"), Some(&DataValue::from("base")));
}

/// Test generating a script from a template file and running it
#[test]
fn test_run_process_from_template_workflow() {
    let mut template = NamedTempFile::new().unwrap();
    write!(template, "#!/bin/sh\necho {{instring}}").unwrap();

    let variables: HashMap<String, String> =
        [("instring".to_string(), "test".to_string())].into_iter().collect();
    let mut result = run_process_from_template(template.path(), &variables);
    result.cmd.clear();

    assert_eq!(
        result,
        ProcessResult {
            returncode: 0,
            stdout: "test\n".to_string(),
            stderr: String::new(),
            cmd: Vec::new(),
            command_text: Some("#!/bin/sh\necho test".to_string()),
        }
    );
}

/// Test that a missing template reports a failed result instead of running
#[test]
fn test_run_process_from_missing_template() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("runProcessFromTemplateTest_not_here");

    let variables: HashMap<String, String> =
        [("instring".to_string(), "test".to_string())].into_iter().collect();
    let result = run_process_from_template(&missing, &variables);

    assert_eq!(result.returncode, 1);
    assert!(result.stdout.is_empty());
    assert!(result
        .stderr
        .starts_with("An exception of type TemplateNotFound occurred. Arguments:\n"));
    assert_eq!(result.cmd.len(), 1);
    assert!(result.cmd[0].starts_with("process_template("));
    assert!(result.command_text.is_none());
}
