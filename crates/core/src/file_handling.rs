//! Plain text file helpers.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Error, Result};

fn get_reader(file_description: &str, path: &Path) -> Result<File> {
    match File::open(path) {
        Ok(reader) => Ok(reader),
        Err(e) => Err(Error::io_error(
            file_description.to_string(),
            path.display().to_string(),
            e,
        )),
    }
}

/// Reads a whole file as text.
///
/// # Errors
///
/// Returns [`Error::Io`] naming `file_description` if the file cannot be
/// opened or is not valid UTF-8.
pub fn read_to_string(file_description: &str, path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mut reader = get_reader(file_description, path)?;

    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(|e| {
        Error::io_error(file_description.to_string(), path.display().to_string(), e)
    })?;

    Ok(text)
}

/// Creates or overwrites `path` with `text`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written to.
pub fn save_to_file(text: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let f = File::create(path);

    let Ok(mut f) = f else {
        return Err(Error::io_error(
            "output".to_string(),
            path.display().to_string(),
            f.unwrap_err(),
        ));
    };

    f.write_all(text.as_bytes())
        .map_err(|e| Error::io_error("output".to_string(), path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        save_to_file("first", &path).unwrap();
        save_to_file("second", &path).unwrap();

        assert_eq!(read_to_string("test", &path).unwrap(), "second");
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_to_string("template", "/this/path/does/not/exist.txt");
        match result {
            Err(Error::Io {
                file_description, ..
            }) => assert_eq!(file_description, "template"),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_save_into_missing_directory() {
        let result = save_to_file("text", "/this/path/does/not/exist/out.txt");
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
