use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::fmt::Write as _;

use crate::config::MonitorConfig;
use crate::monitor::{RequestSnapshot, ResponseSnapshot};
use crate::style::{style_for_method, style_for_status, underline, Style};

/// Encodes any serializable value for display, falling back to its `Debug`
/// form when the encoder refuses it. Display encoding never fails.
pub fn encode<T: Serialize + fmt::Debug>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value))
}

/// Renders a JSON value for interpolation: primitives pass through raw
/// (no quoting), composites are JSON-encoded via [`encode`].
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        composite => encode(composite),
    }
}

fn format_timestamp(timestamp: &DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", timestamp.format(pattern)).is_err() {
        return timestamp.to_rfc3339();
    }
    out
}

/// Builds the main summary line for a request, in fixed field order:
/// `(requestId) formattedDate, origin METHOD [query] [params] [headers]
/// [payload] path`. Bracketed segments appear only when their toggle is on.
pub fn format_main(snapshot: &RequestSnapshot, config: &MonitorConfig) -> String {
    let method = snapshot.method.to_uppercase();
    let mut message = String::new();

    message.push_str(&format!(
        "{} {},",
        Style::BrightCyan.paint(format!("({})", snapshot.id)),
        format_timestamp(&snapshot.received, &config.date_format),
    ));
    message.push_str(&format!(" {}", Style::BrightBlack.paint(&snapshot.origin)));
    message.push_str(&format!(
        " {}",
        style_for_method(&method, &config.colors).paint(&method)
    ));
    if config.show_inline_query {
        message.push_str(&format!(" {}", stringify(&snapshot.query)));
    }
    if config.show_inline_params {
        message.push_str(&format!(" {}", stringify(&snapshot.params)));
    }
    if config.show_inline_headers {
        message.push_str(&format!(" {}", stringify(&snapshot.headers)));
    }
    if config.show_inline_payload {
        message.push_str(&format!(" {}", stringify(&snapshot.payload)));
    }
    message.push_str(&format!(" {}", underline(&snapshot.path)));

    message
}

/// Builds the suffix appended to the main line once the response completes:
/// status code / error / body segments joined with `", "`, preceded by a
/// `" - "` separator when any of them is enabled.
///
/// The status code is only rendered together with the error segment; with
/// the error display off, no code/error segment is emitted at all.
pub fn format_main_addons(status: i64, source: &Value, config: &MonitorConfig) -> String {
    let mut message = String::new();
    let mut segments: Vec<String> = Vec::new();

    if config.show_inline_response_code
        || config.show_inline_response
        || config.show_inline_response_error
    {
        message.push_str(" - ");
    }

    let status_style = style_for_status(status, &config.colors);
    if config.show_inline_response_error {
        let error = source
            .get("error")
            .filter(|e| !e.is_null() && e.as_str() != Some(""));
        let error_text = match error {
            Some(error) => stringify(error),
            None => "OK".to_string(),
        };
        if config.show_inline_response_code {
            segments.push(format!(
                "{} {}",
                status_style.paint(status),
                status_style.paint(error_text)
            ));
        } else {
            segments.push(status_style.paint(error_text));
        }
    }

    if config.show_inline_response {
        segments.push(stringify(source));
    }

    message.push_str(&segments.join(", "));
    message
}

/// Multi-line `[Response]` detail block: status code, headers and body.
pub fn format_response_detail(snapshot: &ResponseSnapshot, config: &MonitorConfig) -> String {
    let mut message = String::new();
    message.push_str(&Style::BrightCyan.paint("[Response]"));
    message.push_str(&format!(
        "\n    {} {}",
        Style::BrightBlack.paint("--statusCode:"),
        style_for_status(snapshot.status, &config.colors).paint(snapshot.status)
    ));
    message.push_str(&format!(
        "\n    {} {}",
        Style::BrightBlack.paint("--headers:"),
        stringify(&snapshot.headers)
    ));
    message.push_str(&format!(
        "\n    {} {}",
        Style::BrightBlack.paint("--response:"),
        stringify(&snapshot.source)
    ));
    message
}

/// Multi-line `[Request]` detail block: headers, query, params and payload.
pub fn format_request_detail(snapshot: &RequestSnapshot) -> String {
    let mut message = String::new();
    message.push_str(&Style::BrightCyan.paint("[Request]"));
    message.push_str(&format!(
        "\n    {} {}",
        Style::BrightBlack.paint("--headers:"),
        stringify(&snapshot.headers)
    ));
    message.push_str(&format!(
        "\n    {} {}",
        Style::BrightBlack.paint("--query:"),
        stringify(&snapshot.query)
    ));
    message.push_str(&format!(
        "\n    {} {}",
        Style::BrightBlack.paint("--params:"),
        stringify(&snapshot.params)
    ));
    message.push_str(&format!(
        "\n    {} {}",
        Style::BrightBlack.paint("--payload:"),
        stringify(&snapshot.payload)
    ));
    message
}
