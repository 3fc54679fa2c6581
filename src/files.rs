//! Helpers for reading user-supplied files.
//!
//! File access goes through `cap-std` so reads are rooted at an explicitly
//! opened directory rather than raw ambient paths.

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

/// Expands a leading `~/` prefix to the user's home directory.
///
/// If the `HOME` environment variable is not set, the input is returned
/// unchanged; callers that need the home directory should treat the
/// subsequent read failure as the error.
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return format!("{}/{rest}", home.to_string_lossy());
    }
    path.to_owned()
}

/// Reads a file to a string via an ambient directory handle.
///
/// Relative paths are resolved against the current directory.
///
/// # Errors
///
/// Returns a human-readable message when the directory cannot be opened or
/// the file cannot be read.
pub fn read_to_string_ambient(path: &Utf8Path) -> Result<String, String> {
    let (dir_path, file_path) = if path.is_absolute() {
        let parent = path
            .parent()
            .ok_or_else(|| format!("path has no parent directory: {path}"))?;
        let file_name = path
            .file_name()
            .ok_or_else(|| format!("path has no file name: {path}"))?;
        (parent, Utf8Path::new(file_name))
    } else {
        (Utf8Path::new("."), path)
    };

    let dir =
        Dir::open_ambient_dir(dir_path, ambient_authority()).map_err(|err| err.to_string())?;
    dir.read_to_string(file_path).map_err(|err| err.to_string())
}
