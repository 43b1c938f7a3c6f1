//! output formatting utilities for scriptable CLI output
//!
//! uses JSON-RPC 2.0 format for machine-readable output:
//! - success: {"jsonrpc": "2.0", "result": {...}, "id": null}
//! - error: {"jsonrpc": "2.0", "error": {"code": N, "message": "...", "data": {...}}, "id": null}

use serde::Serialize;
use std::io::IsTerminal;

use crate::binding::{DirectiveFailure, UpdateReport};

/// JSON-RPC version constant
const JSONRPC_VERSION: &str = "2.0";

/// output mode determines how results are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// human-readable text output
    Text,
    /// machine-readable JSON-RPC 2.0 output
    Json,
    /// no output on success (errors still go to stderr)
    Quiet,
}

impl OutputMode {
    /// determine output mode from CLI flags and environment
    ///
    /// priority: quiet > json > no_json > auto-detect
    pub fn from_flags(json: bool, no_json: bool, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        if json {
            return Self::Json;
        }
        if no_json {
            return Self::Text;
        }
        // auto-detect: JSON when stdout is not a TTY (piped)
        if !std::io::stdout().is_terminal() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// JSON-RPC 2.0 success response
#[derive(Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub result: T,
    /// null for CLI responses (no request id)
    pub id: Option<String>,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result,
            id: None,
        }
    }
}

/// JSON-RPC 2.0 error response
#[derive(Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub error: RpcError,
    pub id: Option<String>,
}

/// JSON-RPC 2.0 error object
#[derive(Serialize)]
pub struct RpcError {
    /// error code (formfx exit codes, offset by -32000 for app-specific errors)
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

/// additional error data
#[derive(Serialize)]
pub struct ErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl JsonRpcError {
    /// create error with standard JSON-RPC error code range
    /// formfx uses -32000 to -32099 for application errors (per JSON-RPC spec)
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            error: RpcError {
                code: to_jsonrpc_code(code),
                message: message.into(),
                data: None,
            },
            id: None,
        }
    }

    pub fn with_data(
        code: i32,
        message: impl Into<String>,
        suggestions: Vec<String>,
        details: Option<String>,
    ) -> Self {
        let suggestions = if suggestions.is_empty() {
            None
        } else {
            Some(suggestions)
        };
        let mut error = Self::new(code, message);
        if suggestions.is_some() || details.is_some() {
            error.error.data = Some(ErrorData {
                suggestions,
                details,
            });
        }
        error
    }
}

/// convert formfx exit code to JSON-RPC error code
/// JSON-RPC reserves -32000 to -32099 for server/application errors
fn to_jsonrpc_code(code: i32) -> i32 {
    -32000 - code
}

// ============================================================================
// Result data structures for different commands
// ============================================================================

/// result data for eval
#[derive(Serialize)]
pub struct EvalData {
    /// condition as parsed, normalized
    pub condition: String,
    pub result: bool,
    pub references: Vec<String>,
}

/// result data for refs
#[derive(Serialize)]
pub struct RefsData {
    pub condition: String,
    pub references: Vec<String>,
}

/// a directive that failed to apply
#[derive(Serialize)]
pub struct FailureData {
    pub node: usize,
    pub directive: &'static str,
    pub message: String,
}

impl From<&DirectiveFailure> for FailureData {
    fn from(failure: &DirectiveFailure) -> Self {
        Self {
            node: failure.node.index(),
            directive: failure.kind.attribute(),
            message: failure.error.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ReportData {
    pub applied: usize,
    pub failures: Vec<FailureData>,
}

impl From<&UpdateReport> for ReportData {
    fn from(report: &UpdateReport) -> Self {
        Self {
            applied: report.applied,
            failures: report.failures.iter().map(FailureData::from).collect(),
        }
    }
}

/// result data for mount
#[derive(Serialize)]
pub struct MountData {
    pub report: ReportData,
    pub listeners: usize,
    pub html: String,
}

/// one replayed simulate step
#[derive(Serialize)]
pub struct StepData {
    pub step: String,
    pub report: ReportData,
}

/// result data for simulate
#[derive(Serialize)]
pub struct SimulateData {
    pub mount: ReportData,
    pub steps: Vec<StepData>,
    pub html: String,
}

/// print JSON-RPC success response to stdout
pub fn print_json<T: Serialize>(data: &T) {
    let response = JsonRpcResponse::new(data);
    if let Ok(json) = serde_json::to_string(&response) {
        println!("{}", json);
    }
}

/// report an error in the current output mode and exit with `code`
pub fn exit_with_error(
    mode: OutputMode,
    code: i32,
    message: &str,
    suggestions: Vec<String>,
    details: Option<String>,
) -> ! {
    if mode.is_json() {
        let error = JsonRpcError::with_data(code, message, suggestions, details);
        if let Ok(json) = serde_json::to_string(&error) {
            println!("{}", json);
        }
    } else {
        eprintln!("Error: {}", message);
        for line in details.iter().flat_map(|d| d.lines()) {
            eprintln!("  {}", line);
        }
    }
    std::process::exit(code);
}
