//! Run contract through the Upstart adapter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use stanza_core::{Hooks, Service, ServiceError, Signal, shutdown_channel};

use super::myd_service;

#[tokio::test]
async fn start_error_is_returned_and_stop_never_runs() {
    let dir = tempfile::tempdir().unwrap();
    let service = myd_service(dir.path());
    let (_handle, listener) = shutdown_channel();

    let stops = Arc::new(AtomicU32::new(0));
    let stop_counter = Arc::clone(&stops);
    let mut hooks = Hooks::new(
        || Err(ServiceError::runtime("bind: address in use")),
        move || {
            stop_counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        },
    );

    let result = tokio::time::timeout(Duration::from_secs(5), service.run(&mut hooks, listener))
        .await
        .expect("run must not wait for shutdown after a failed start");

    match result {
        Err(ServiceError::Runtime(msg)) => assert_eq!(msg, "bind: address in use"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(stops.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn termination_runs_stop_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(myd_service(dir.path()));
    let (handle, listener) = shutdown_channel();

    let starts = Arc::new(AtomicU32::new(0));
    let stops = Arc::new(AtomicU32::new(0));

    let run = {
        let service = Arc::clone(&service);
        let starts = Arc::clone(&starts);
        let stops = Arc::clone(&stops);
        tokio::spawn(async move {
            let mut hooks = Hooks::new(
                move || {
                    starts.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
                move || {
                    stops.fetch_add(1, Ordering::SeqCst);
                    Err(ServiceError::runtime("stop result"))
                },
            );
            service.run(&mut hooks, listener).await
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(starts.load(Ordering::SeqCst), 1);
    assert_eq!(stops.load(Ordering::SeqCst), 0, "run returned before shutdown");
    assert!(!run.is_finished());

    handle.request(Signal::Term).await.unwrap();
    let result = run.await.unwrap();

    assert_eq!(result.unwrap_err().to_string(), "runtime error: stop result");
    assert_eq!(stops.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn interrupt_returns_stop_success() {
    let dir = tempfile::tempdir().unwrap();
    let service = myd_service(dir.path());
    let (handle, listener) = shutdown_channel();

    handle.request(Signal::Int).await.unwrap();
    let mut hooks = Hooks::new(|| Ok(()), || Ok(()));
    service.run(&mut hooks, listener).await.unwrap();
}

#[tokio::test]
async fn run_does_not_require_install() {
    let dir = tempfile::tempdir().unwrap();
    let service = myd_service(dir.path());
    let (handle, listener) = shutdown_channel();

    handle.shutdown().await.unwrap();
    let mut hooks = Hooks::new(|| Ok(()), || Ok(()));
    service.run(&mut hooks, listener).await.unwrap();

    assert!(!service.is_installed().await.unwrap());
}

#[tokio::test]
async fn services_in_one_process_shut_down_independently() {
    let dir = tempfile::tempdir().unwrap();
    let first = Arc::new(myd_service(dir.path()));
    let second = Arc::new(myd_service(dir.path()));
    let (first_handle, first_listener) = shutdown_channel();
    let (_second_handle, second_listener) = shutdown_channel();

    let first_run = {
        let svc = Arc::clone(&first);
        tokio::spawn(async move {
            let mut hooks = Hooks::new(|| Ok(()), || Ok(()));
            svc.run(&mut hooks, first_listener).await
        })
    };
    let second_run = {
        let svc = Arc::clone(&second);
        tokio::spawn(async move {
            let mut hooks = Hooks::new(|| Ok(()), || Ok(()));
            svc.run(&mut hooks, second_listener).await
        })
    };

    first_handle.shutdown().await.unwrap();
    first_run.await.unwrap().unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!second_run.is_finished());
    second_run.abort();
}
