//! Inventory rendering for the downstream automation tool.
//!
//! Connection details are substituted into a host-inventory template by
//! replacing five fixed placeholder tokens. Substitution is textual and
//! sequential, one whole-string replacement after another in a fixed order;
//! a value substituted early is therefore visible to the replacements that
//! follow it. That ordering is observable output and must not be collapsed
//! into a single simultaneous pass.


use camino::Utf8Path;
use thiserror::Error;

use crate::api::{ConnectionInfo, InstanceId};

/// Built-in inventory template used when no template file is supplied.
pub const DEFAULT_TEMPLATE: &str = "\
[windows]
windows # @instance_id

[windows:vars]
ansible_host=@ansible_host
ansible_port=@ansible_port
ansible_user=@ansible_user
ansible_password=@ansible_password
ansible_connection=winrm
ansible_winrm_transport=ntlm
ansible_winrm_server_cert_validation=ignore
";

/// Errors raised while loading a user-supplied template.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TemplateError {
    /// Raised when a template path is empty or only whitespace.
    #[error("template path must not be empty")]
    EmptyPath,
    /// Raised when the template file cannot be read.
    #[error("failed to read template `{path}`: {message}")]
    Read {
        /// Expanded path that failed to read.
        path: String,
        /// Underlying error message.
        message: String,
    },
}

/// Substitutes connection details into `template`.
///
/// The five placeholder tokens are replaced in this order: `@instance_id`,
/// `@ansible_host`, `@ansible_port`, `@ansible_user`, `@ansible_password`.
/// Port defaults to 22 and password to the empty string when absent. No
/// escaping is performed.
#[must_use]
pub fn render(template: &str, connection: &ConnectionInfo, instance_id: &InstanceId) -> String {
    let port = connection.port_or_default().to_string();
    let mut document = template.replace("@instance_id", instance_id.as_str());
    document = document.replace("@ansible_host", &connection.hostname);
    document = document.replace("@ansible_port", &port);
    document = document.replace("@ansible_user", &connection.username);
    document.replace("@ansible_password", connection.password_or_default())
}

/// Reads a template file verbatim; no syntax validation is performed.
///
/// A leading `~/` is expanded to the caller's home directory.
///
/// # Errors
///
/// Returns [`TemplateError`] when the path is empty or the file cannot be
/// read.
pub fn load_template(path: &str) -> Result<String, TemplateError> {
    if path.trim().is_empty() {
        return Err(TemplateError::EmptyPath);
    }
    let expanded = crate::files::expand_tilde(path);
    crate::files::read_to_string_ambient(Utf8Path::new(&expanded)).map_err(|message| {
        TemplateError::Read {
            path: expanded,
            message,
        }
    })
}
