//! Log forwarding under concurrent callers.

use std::collections::HashSet;
use std::sync::Arc;

use stanza_core::{MemorySink, Service, ServiceConfig, Severity};
use stanza_platform::UpstartService;

#[test]
fn concurrent_log_calls_keep_messages_intact() {
    let sink = Arc::new(MemorySink::new());
    let config = ServiceConfig::new("myd", "My Daemon", "does things");
    let service = Arc::new(UpstartService::with_sink(config, sink.clone()).unwrap());

    const THREADS: usize = 8;
    const PER_THREAD: usize = 100;

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let message = format!("worker={t} seq={i} payload={}", "x".repeat(64));
                    let logged = match i % 3 {
                        0 => service.log_info(&message),
                        1 => service.log_warning(&message),
                        _ => service.log_error(&message),
                    };
                    logged.unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let records = sink.records();
    assert_eq!(records.len(), THREADS * PER_THREAD);

    let mut seen = HashSet::new();
    for record in &records {
        let expected_payload = format!("payload={}", "x".repeat(64));
        assert!(record.message.ends_with(&expected_payload), "{}", record.message);

        let seq: usize = record
            .message
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.strip_prefix("seq="))
            .and_then(|s| s.parse().ok())
            .unwrap();
        let expected_severity = match seq % 3 {
            0 => Severity::Info,
            1 => Severity::Warning,
            _ => Severity::Error,
        };
        assert_eq!(record.severity, expected_severity);
        assert!(seen.insert(record.message.clone()), "duplicate {}", record.message);
    }
}

#[test]
fn formatted_messages_reach_sink() {
    let sink = Arc::new(MemorySink::new());
    let config = ServiceConfig::new("myd", "My Daemon", "does things");
    let service = UpstartService::with_sink(config, sink.clone()).unwrap();

    let port = 8080;
    service
        .log_fmt(Severity::Warning, format_args!("listening on {port}"))
        .unwrap();

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message, "listening on 8080");
    assert_eq!(records[0].severity, Severity::Warning);
}
