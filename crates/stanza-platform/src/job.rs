//! Upstart job file rendering.
//!
//! Every job follows the same template: start with the filesystem or a
//! multi-user runlevel, stop when leaving them, interrupt on stop, respawn
//! with a rate limit, and refuse to start if the executable has gone away.

use std::borrow::Cow;
use std::path::Path;

use stanza_core::{RespawnLimit, Result, ServiceConfig, ServiceError};

/// Revision of the job template. Bumped whenever the rendered text changes.
pub const JOB_TEMPLATE_VERSION: u32 = 1;

/// Indentation Upstart job files use for the `description` directive value.
const DIRECTIVE_WIDTH: usize = 16;

/// Substitution fields of the job template.
#[derive(Debug, Clone, Copy)]
pub struct JobSpec<'a> {
    /// Value of the `description` directive.
    pub display: &'a str,
    /// Leading comment.
    pub description: &'a str,
    /// Absolute executable path for `exec` and the pre-start guard.
    pub path: &'a Path,
    /// Respawn rate limit.
    pub respawn: RespawnLimit,
}

impl<'a> JobSpec<'a> {
    /// Builds the fields from a service descriptor and a resolved executable.
    #[must_use]
    pub fn from_config(config: &'a ServiceConfig, path: &'a Path) -> Self {
        Self {
            display: &config.display_name,
            description: &config.description,
            path,
            respawn: config.respawn,
        }
    }
}

/// Renders a job file.
///
/// # Errors
/// Returns [`ServiceError::Render`] if a field cannot be placed in a stanza
/// without changing its meaning: line breaks in the texts, or an executable
/// path that is relative, not UTF-8, or contains control characters.
///
/// Paths with characters the job shell would interpret (spaces, quotes,
/// `$`, non-ASCII) are single-quoted.
#[allow(clippy::format_push_string)]
pub fn render_job(fields: &JobSpec<'_>) -> Result<String> {
    let path = exec_path(fields.path)?;
    let description = single_line("description", fields.description)?;
    let display = escape_quoted(single_line("display name", fields.display)?);

    let mut job = String::new();

    job.push_str(&format!("# {description}\n\n"));
    job.push_str(&format!(
        "{:<width$}\"{display}\"\n\n",
        "description",
        width = DIRECTIVE_WIDTH
    ));

    job.push_str("start on filesystem or runlevel [2345]\n");
    job.push_str("stop on runlevel [!2345]\n\n");

    job.push_str("kill signal INT\n\n");

    job.push_str("respawn\n");
    job.push_str(&format!(
        "respawn limit {} {}\n",
        fields.respawn.count,
        fields.respawn.interval.as_secs()
    ));
    job.push_str("umask 022\n\n");

    job.push_str("console none\n\n");

    job.push_str("pre-start script\n");
    job.push_str(&format!("    test -x {path} || {{ stop; exit 0; }}\n"));
    job.push_str("end script\n\n");

    job.push_str("# Start\n");
    job.push_str(&format!("exec {path}\n"));

    Ok(job)
}

fn exec_path(path: &Path) -> Result<Cow<'_, str>> {
    let text = path
        .to_str()
        .ok_or_else(|| ServiceError::render(format!("executable path is not UTF-8: {path:?}")))?;
    if !path.is_absolute() {
        return Err(ServiceError::render(format!(
            "executable path must be absolute: {text}"
        )));
    }
    if text.chars().any(char::is_control) {
        return Err(ServiceError::render(format!(
            "executable path contains control characters: {text:?}"
        )));
    }
    if text.chars().all(is_shell_safe) {
        return Ok(Cow::Borrowed(text));
    }
    Ok(Cow::Owned(format!("'{}'", text.replace('\'', r"'\''"))))
}

const fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | '@' | ':' | ',' | '=' | '%')
}

fn single_line<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.contains(['\n', '\r']) {
        return Err(ServiceError::render(format!(
            "{field} must not contain line breaks"
        )));
    }
    Ok(value)
}

fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
