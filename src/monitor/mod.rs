use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;
use uuid::Uuid;

use crate::config::MonitorConfig;
use crate::format;

pub mod capture;
pub mod middleware;

/// Immutable view of a request captured at entry time.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub id: Uuid,
    pub method: String,
    /// Scheme and authority, e.g. `http://localhost:3000`.
    pub origin: String,
    pub path: String,
    pub headers: Value,
    pub query: Value,
    pub params: Value,
    pub payload: Value,
    pub received: DateTime<Utc>,
}

/// View of a response captured at completion time. `source` is the response
/// body, or the error payload when the handler produced one (an object with
/// an `error` member takes the error role in the main-line suffix).
#[derive(Debug, Clone)]
pub struct ResponseSnapshot {
    pub status: i64,
    pub headers: Value,
    pub source: Value,
    pub completed: DateTime<Utc>,
}

/// Override hook replacing the default request-entry formatting.
pub type RequestHook =
    Arc<dyn Fn(&RequestSnapshot, &MonitorConfig) -> Vec<String> + Send + Sync>;
/// Override hook augmenting the default response-completion formatting.
pub type ResponseHook =
    Arc<dyn Fn(&ResponseSnapshot, &MonitorConfig) -> Vec<String> + Send + Sync>;

type Sink = Arc<dyn Fn(&str) + Send + Sync>;

/// One in-flight request: the lines built so far plus the entry timestamp.
/// `lines[0]` is the main line both lifecycle phases append to.
struct InFlight {
    received: DateTime<Utc>,
    lines: Vec<String>,
}

/// Correlates the two lifecycle events of a request (entry, completion) into
/// one console write.
///
/// In-flight state is keyed by request id, so overlapping requests never
/// share a buffer: each entry inserts or overwrites its own slot and each
/// completion removes, finalizes and flushes exactly that slot. A completion
/// with no matching slot is skipped with a warning.
///
/// Cloning is cheap; clones share the same in-flight table and sink.
#[derive(Clone)]
pub struct ConsoleMonitor {
    config: Arc<MonitorConfig>,
    in_flight: Arc<Mutex<HashMap<Uuid, InFlight>>>,
    on_request: Option<RequestHook>,
    on_response: Option<ResponseHook>,
    sink: Sink,
}

impl ConsoleMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config: Arc::new(config),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            on_request: None,
            on_response: None,
            sink: Arc::new(|output| println!("{}", output)),
        }
    }

    /// Replaces the default request-entry formatting with a custom hook.
    pub fn with_request_hook(
        mut self,
        hook: impl Fn(&RequestSnapshot, &MonitorConfig) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.on_request = Some(Arc::new(hook));
        self
    }

    /// Appends custom lines on completion instead of the default suffix and
    /// response detail block.
    pub fn with_response_hook(
        mut self,
        hook: impl Fn(&ResponseSnapshot, &MonitorConfig) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.on_response = Some(Arc::new(hook));
        self
    }

    /// Redirects flushed output away from stdout.
    pub fn with_sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Whether snapshotting needs the request body buffered.
    pub(crate) fn captures_request_payload(&self) -> bool {
        self.config.show_inline_payload
            || self.config.show_request_info
            || self.on_request.is_some()
    }

    /// Whether snapshotting needs the response body buffered. The inline
    /// error segment reads `source.error`, so it needs the body too.
    pub(crate) fn captures_response_source(&self) -> bool {
        self.config.show_inline_response
            || self.config.show_response_info
            || self.config.show_inline_response_error
            || self.on_response.is_some()
    }

    /// Request-entry phase: builds the line buffer for this request and
    /// stores it under the request id. Firing again for the same id (the
    /// host may invoke entry hooks more than once per request) overwrites
    /// the previous buffer wholesale.
    pub fn record_entry(&self, snapshot: &RequestSnapshot) {
        let lines = match &self.on_request {
            Some(hook) => hook(snapshot, &self.config),
            None => {
                let mut lines = vec![format::format_main(snapshot, &self.config)];
                if self.config.show_request_info {
                    lines.push(format::format_request_detail(snapshot));
                }
                lines
            }
        };

        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.insert(
                snapshot.id,
                InFlight {
                    received: snapshot.received,
                    lines,
                },
            );
        }
    }

    /// Response-completion phase: removes the request's buffer, extends the
    /// main line with timing and status/error/body segments, optionally adds
    /// the response detail block, then flushes the joined buffer to the sink
    /// once. Returns the flushed text, or `None` when no entry was recorded
    /// for this id.
    pub fn complete(&self, id: Uuid, response: &ResponseSnapshot) -> Option<String> {
        let entry = match self.in_flight.lock() {
            Ok(mut in_flight) => in_flight.remove(&id),
            Err(_) => None,
        };
        let Some(mut entry) = entry else {
            warn!(request_id = %id, "response completed without an in-flight entry, skipping");
            return None;
        };

        if let Some(hook) = &self.on_response {
            entry.lines.extend(hook(response, &self.config));
        } else {
            if entry.lines.is_empty() {
                entry.lines.push(String::new());
            }
            if self.config.show_response_time {
                let elapsed = (response.completed - entry.received).num_milliseconds();
                entry.lines[0].push_str(&format!(" ({}ms)", elapsed));
            }
            entry.lines[0].push_str(&format::format_main_addons(
                response.status,
                &response.source,
                &self.config,
            ));
            if self.config.show_response_info {
                entry
                    .lines
                    .push(format::format_response_detail(response, &self.config));
            }
        }

        let output = entry.lines.join("\n");
        (self.sink)(&output);
        Some(output)
    }

    /// Number of requests currently awaiting completion.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().map(|m| m.len()).unwrap_or(0)
    }
}
