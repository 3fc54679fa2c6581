//! Default remote-auth credential lookup.
//!
//! The `remote` auth mode falls back to a single-line credential file in the
//! caller's home directory when no `--key` flag is given. A missing file is
//! not an error by itself; the CLI only rejects the invocation when neither
//! source provides a key.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;

/// File name of the credential file inside the home directory.
pub const CREDENTIAL_FILE_NAME: &str = ".vmlease_key";

/// Errors raised while reading the credential file.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CredentialError {
    /// Raised when the home directory cannot be determined.
    #[error("HOME is not set; cannot locate {CREDENTIAL_FILE_NAME}")]
    NoHome,
    /// Raised when the credential file exists but cannot be read.
    #[error("failed to read {path}: {message}")]
    Read {
        /// Path that failed to read.
        path: Utf8PathBuf,
        /// Underlying error message.
        message: String,
    },
}

/// Reads the default remote key from `~/.vmlease_key`.
///
/// Returns `Ok(None)` when the file does not exist or holds only
/// whitespace; the first line is trimmed and returned otherwise.
///
/// # Errors
///
/// Returns [`CredentialError`] when `HOME` is unset or the file exists but
/// cannot be read.
pub fn default_remote_key() -> Result<Option<String>, CredentialError> {
    let home = std::env::var_os("HOME").ok_or(CredentialError::NoHome)?;
    let home_path = Utf8PathBuf::from(home.to_string_lossy().into_owned());
    read_key_from(&home_path)
}

/// Reads the credential file from an explicit directory.
pub(crate) fn read_key_from(dir_path: &Utf8Path) -> Result<Option<String>, CredentialError> {
    let dir = match Dir::open_ambient_dir(dir_path, ambient_authority()) {
        Ok(dir) => dir,
        Err(err) => {
            return Err(CredentialError::Read {
                path: dir_path.join(CREDENTIAL_FILE_NAME),
                message: err.to_string(),
            });
        }
    };

    match dir.read_to_string(CREDENTIAL_FILE_NAME) {
        Ok(content) => {
            let key = content.lines().next().unwrap_or_default().trim();
            if key.is_empty() {
                Ok(None)
            } else {
                Ok(Some(key.to_owned()))
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(CredentialError::Read {
            path: dir_path.join(CREDENTIAL_FILE_NAME),
            message: err.to_string(),
        }),
    }
}
