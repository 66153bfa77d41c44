use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use uuid::Uuid;

use axum_console_monitor::{
    format, ConsoleMonitor, MonitorConfig, RequestSnapshot, ResponseSnapshot,
};

fn request_snapshot() -> RequestSnapshot {
    RequestSnapshot {
        id: Uuid::new_v4(),
        method: "POST".to_string(),
        origin: "http://localhost:3000".to_string(),
        path: "/v1/items".to_string(),
        headers: json!({"content-type": "application/json"}),
        query: json!({"limit": "5"}),
        params: json!({}),
        payload: json!({"name": "alpha", "tags": [1, 2, 3]}),
        received: Utc.with_ymd_and_hms(2026, 8, 26, 10, 0, 0).unwrap(),
    }
}

fn response_snapshot(snapshot: &RequestSnapshot) -> ResponseSnapshot {
    ResponseSnapshot {
        status: 201,
        headers: json!({"content-type": "application/json"}),
        source: json!({"id": "42"}),
        completed: snapshot.received + Duration::milliseconds(12),
    }
}

fn format_main_benchmark(c: &mut Criterion) {
    let config = MonitorConfig::default();
    let snapshot = request_snapshot();

    c.bench_function("format_main", |b| {
        b.iter(|| black_box(format::format_main(&snapshot, &config)))
    });
}

fn format_main_addons_benchmark(c: &mut Criterion) {
    let config = MonitorConfig::default();
    let source = json!({"error": "Bad Request"});

    c.bench_function("format_main_addons", |b| {
        b.iter(|| black_box(format::format_main_addons(400, &source, &config)))
    });
}

fn correlate_benchmark(c: &mut Criterion) {
    let monitor = ConsoleMonitor::new(MonitorConfig::default()).with_sink(|_| {});
    let snapshot = request_snapshot();
    let response = response_snapshot(&snapshot);

    c.bench_function("entry_and_complete", |b| {
        b.iter(|| {
            monitor.record_entry(&snapshot);
            black_box(monitor.complete(snapshot.id, &response))
        })
    });
}

criterion_group!(
    benches,
    format_main_benchmark,
    format_main_addons_benchmark,
    correlate_benchmark
);
criterion_main!(benches);
