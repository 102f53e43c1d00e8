//! Input handling helpers for the master password and note bodies.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use dialoguer::Password;
use secrecy::SecretString;
use zeroize::Zeroizing;

use crate::constants::env_vars;
use crate::errors::CliError;

/// Read the master password from SECRET_DIARY_PASSWORD, or prompt for it.
pub fn prompt_password(interactive: bool) -> anyhow::Result<SecretString> {
    if let Some(value) = env_password()? {
        return Ok(value);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No password provided and no TTY available. Set {}.",
            env_vars::PASSWORD
        ))
        .into());
    }
    let entered = Password::new()
        .with_prompt("Master password")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
    Ok(SecretString::from(entered))
}

/// Password from the environment, if the variable is set at all.
///
/// An empty value is a valid password.
pub(crate) fn env_password() -> anyhow::Result<Option<SecretString>> {
    password_from_env(std::env::var_os(env_vars::PASSWORD))
}

fn password_from_env(value: Option<OsString>) -> anyhow::Result<Option<SecretString>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    match raw.into_string() {
        Ok(password) => Ok(Some(SecretString::from(password))),
        Err(_) => Err(CliError::invalid_input(format!(
            "{} is not valid UTF-8",
            env_vars::PASSWORD
        ))
        .into()),
    }
}

/// Read a note body from `--body`, piped stdin, or an editor, in that order.
///
/// An empty body is accepted from `--body` and stdin. `--no-input` refuses
/// to open the editor.
pub fn read_note_body(
    no_input: bool,
    body: Option<String>,
    editor_override: Option<&str>,
) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = body {
        return Ok(Zeroizing::new(value));
    }

    if !io::stdin().is_terminal() {
        let mut buffer = Zeroizing::new(String::new());
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(strip_final_newline(buffer));
    }

    if no_input {
        return Err(
            CliError::invalid_input("--no-input requires --body or content on stdin").into(),
        );
    }

    read_body_from_editor(editor_override)
}

fn resolve_editor(editor_override: Option<&str>) -> Option<String> {
    editor_override
        .map(str::to_string)
        .or_else(|| std::env::var("VISUAL").ok())
        .or_else(|| std::env::var("EDITOR").ok())
        .filter(|value| !value.trim().is_empty())
}

fn read_body_from_editor(editor_override: Option<&str>) -> anyhow::Result<Zeroizing<String>> {
    let editor = resolve_editor(editor_override).ok_or_else(|| {
        CliError::invalid_input("$EDITOR is not set; use --body or pipe content via stdin")
    })?;
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| CliError::invalid_input("Editor command is empty"))?;
    let extra_args: Vec<&str> = parts.collect();

    let path = create_private_temp()?;
    let result = run_editor(program, &extra_args, &path);
    let _ = std::fs::remove_file(&path);
    result
}

fn run_editor(program: &str, args: &[&str], path: &Path) -> anyhow::Result<Zeroizing<String>> {
    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to launch editor {}: {}", program, e))?;
    if !status.success() {
        return Err(anyhow::anyhow!("Editor exited with failure"));
    }
    let contents = Zeroizing::new(
        std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read temp file: {}", e))?,
    );
    Ok(strip_final_newline(contents))
}

/// Drop the single line ending that editors and `echo` append.
fn strip_final_newline(mut text: Zeroizing<String>) -> Zeroizing<String> {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

/// Create an empty temp file only the current user can read.
fn create_private_temp() -> anyhow::Result<PathBuf> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("System time error: {}", e))?
        .as_nanos();
    let path = std::env::temp_dir().join(format!(
        "secret_diary_note_{}_{}.md",
        std::process::id(),
        nanos
    ));

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(&path)
        .map_err(|e| anyhow::anyhow!("Failed to create temp file: {}", e))?;
    file.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_flag_wins_and_may_be_empty() {
        let body = read_note_body(true, Some(String::new()), None).unwrap();
        assert_eq!(body.as_str(), "");
        let body = read_note_body(true, Some("hello".to_string()), None).unwrap();
        assert_eq!(body.as_str(), "hello");
    }

    #[test]
    fn test_only_one_final_newline_is_stripped() {
        let strip = |raw: &str| strip_final_newline(Zeroizing::new(raw.to_string()));
        assert_eq!(strip("line\n").as_str(), "line");
        assert_eq!(strip("line\r\n").as_str(), "line");
        assert_eq!(strip("para\n\n").as_str(), "para\n");
        assert_eq!(strip("indented  \t").as_str(), "indented  \t");
        assert_eq!(strip("").as_str(), "");
    }

    #[test]
    fn test_empty_env_password_counts_as_set() {
        use secrecy::ExposeSecret;

        assert!(password_from_env(None).unwrap().is_none());
        let empty = password_from_env(Some(OsString::new())).unwrap().unwrap();
        assert_eq!(empty.expose_secret(), "");
        let set = password_from_env(Some(OsString::from("pw"))).unwrap().unwrap();
        assert_eq!(set.expose_secret(), "pw");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_env_password_is_rejected() {
        use std::os::unix::ffi::OsStringExt;

        let err = password_from_env(Some(OsString::from_vec(vec![0xff]))).unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }

    #[test]
    fn test_editor_override_takes_precedence() {
        assert_eq!(
            resolve_editor(Some("nano -w")).as_deref(),
            Some("nano -w")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_private_temp_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let path = create_private_temp().unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(mode & 0o777, 0o600);
    }
}
