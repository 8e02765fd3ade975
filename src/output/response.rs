//! CLI response formatting and output.
//!
//! Provides the JSON envelope, plain-text printing, and exit code mapping.

use serde::Serialize;
use tagfix::error::Hint;
use tagfix::{Error, ErrorCode, Result};

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn write_stdout(payload: &str) -> Result<()> {
    use std::io::{self, Write};

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    write_stdout(&response.to_json()?)
}

pub fn print_json_result(result: Result<serde_json::Value>) -> Result<()> {
    match result {
        Ok(data) => print_response(&CliResponse::success(data)),
        Err(err) => print_response(&CliResponse::<()>::from_error(&err)),
    }
}

/// Print one plain-text line to stdout.
pub fn print_text(line: &str) -> Result<()> {
    write_stdout(line)
}

/// Print an error and its hints to stderr.
pub fn print_error_text(err: &Error) {
    eprintln!("Error: {}", err.describe());
    for hint in &err.hints {
        eprintln!("  hint: {}", hint.message);
    }
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            (Err(err), exit_code)
        }
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagfix::RewriteSummary;

    fn summary() -> RewriteSummary {
        RewriteSummary {
            element: "FooterCached".to_string(),
            root: ".".to_string(),
            pattern: "app/**/*.tsx".to_string(),
            dry_run: false,
            files_scanned: 4,
            files_changed: 1,
            replacements: 2,
            changed: vec!["app/page.tsx".to_string()],
        }
    }

    #[test]
    fn success_envelope_uses_camel_case_fields() {
        let json = CliResponse::success(summary()).to_json().unwrap();

        assert!(json.contains("\"success\": true"));
        assert!(json.contains("\"filesChanged\": 1"));
        assert!(json.contains("\"dryRun\": false"));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn error_envelope_carries_code_and_hints() {
        let err = Error::validation_invalid_argument("element", "bad name", None)
            .with_hint("Try FooterCached");
        let json = CliResponse::<()>::from_error(&err).to_json().unwrap();

        assert!(json.contains("\"success\": false"));
        assert!(json.contains("\"code\": \"validation.invalid_argument\""));
        assert!(json.contains("Try FooterCached"));
    }

    #[test]
    fn validation_errors_map_to_exit_code_2() {
        let err = Error::config_invalid_value("pattern", None, "empty");
        let (_value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(err));

        assert_eq!(exit_code, 2);
    }

    #[test]
    fn io_errors_map_to_exit_code_1() {
        let err = Error::internal_io("denied", None);
        let (_value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(err));

        assert_eq!(exit_code, 1);
    }

    #[test]
    fn completed_run_keeps_its_exit_code() {
        let (value, exit_code) = map_cmd_result_to_json(Ok((summary(), 0)));

        assert_eq!(exit_code, 0);
        assert_eq!(value.unwrap()["changed"][0], "app/page.tsx");
    }
}
