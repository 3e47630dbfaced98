//! Test error rendering and stack-trace extraction.
//!
//! Errors raised by a scenario or step travel inside completion outcomes
//! and end up under the report node's error object as an ordered list of
//! frames, innermost first. Frames captured in-process come from
//! `std::backtrace`; errors arriving from elsewhere can hand over their
//! raw stack text and go through the same parser.

use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;

/// One resolved stack frame.
///
/// `declaring_class` falls back to the function name when the frame has
/// no enclosing type or module, and to an empty string when the symbol
/// could not be resolved at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    pub declaring_class: String,
    pub method_name: String,
    pub file_name: String,
    /// 1-based source line, 0 when unknown
    pub line_number: u32,
}

/// An error raised during scenario or step execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestError {
    pub error_type: String,
    pub message: String,

    #[serde(
        rename = "stackTrace",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub frames: Vec<StackFrame>,
}

impl TestError {
    /// An error with no stack information
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            frames: Vec::new(),
        }
    }

    /// An error with pre-resolved frames
    pub fn with_frames(
        error_type: impl Into<String>,
        message: impl Into<String>,
        frames: Vec<StackFrame>,
    ) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            frames,
        }
    }

    /// Capture the current call stack for an error raised in-process
    pub fn capture(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        let backtrace = Backtrace::force_capture();
        Self::from_raw_stack(error_type, message, &backtrace.to_string())
    }

    /// Parse frames out of raw stack text in the std backtrace format
    pub fn from_raw_stack(
        error_type: impl Into<String>,
        message: impl Into<String>,
        raw: &str,
    ) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            frames: parse_frames(raw),
        }
    }
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}

impl std::error::Error for TestError {}

/// Parse the `N: symbol` / `at file:line:col` line pairs emitted by the
/// std backtrace renderer. Lines that do not match are skipped, so a
/// trace with no usable information yields an empty frame list.
pub fn parse_frames(raw: &str) -> Vec<StackFrame> {
    let mut frames = Vec::new();
    let mut lines = raw.lines().peekable();

    while let Some(line) = lines.next() {
        let Some((index, symbol)) = line.trim_start().split_once(": ") else {
            continue;
        };
        if index.parse::<usize>().is_err() {
            continue;
        }

        let mut file_name = String::new();
        let mut line_number = 0u32;
        if let Some(next) = lines.peek() {
            if let Some(location) = next.trim_start().strip_prefix("at ") {
                (file_name, line_number) = parse_location(location);
                lines.next();
            }
        }

        let (declaring_class, method_name) = split_symbol(symbol.trim());
        frames.push(StackFrame {
            declaring_class,
            method_name,
            file_name,
            line_number,
        });
    }

    frames
}

/// Split `path::to::Type::method` into declaring class and method name,
/// dropping the trailing mangling hash the compiler appends to symbols.
fn split_symbol(symbol: &str) -> (String, String) {
    let mut segments: Vec<&str> = symbol.split("::").collect();
    if let Some(last) = segments.last() {
        if is_symbol_hash(last) && segments.len() > 1 {
            segments.pop();
        }
    }

    match segments.as_slice() {
        [] => (String::new(), String::new()),
        [only] => ((*only).to_string(), (*only).to_string()),
        [class @ .., method] => (class.join("::"), (*method).to_string()),
    }
}

fn is_symbol_hash(segment: &str) -> bool {
    segment.len() == 17
        && segment.starts_with('h')
        && segment[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Parse `path/to/file.rs:line:col` (or `path:line`) into base file name
/// and 1-based line number
fn parse_location(location: &str) -> (String, u32) {
    let mut parts = location.rsplitn(3, ':');
    let first = parts.next().unwrap_or_default();
    let second = parts.next();
    let third = parts.next();

    // With a trailing column the line is the middle component
    let (path, line) = match (second, third) {
        (Some(line), Some(path)) if first.parse::<u32>().is_ok() => (path, line),
        (Some(path), None) => (path, first),
        _ => (location, ""),
    };

    let file_name = path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
        .to_string();
    (file_name, line.parse().unwrap_or(0))
}
