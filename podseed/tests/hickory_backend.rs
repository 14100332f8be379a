//! HickoryBackend driven from plain threads and from inside a tokio runtime.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use podseed::dns::HickoryBackend;
use podseed::{AddressFinder, CoreError, DnsSrvResolver, SrvFinder};

const TIMEOUT: Duration = Duration::from_millis(300);

/// Finder whose DNS server never answers (discard port on loopback).
fn unreachable_finder() -> SrvFinder {
    let server: SocketAddr = "127.0.0.1:9".parse().unwrap();
    let backend = HickoryBackend::with_name_servers(&[server], TIMEOUT).unwrap();
    let finder = SrvFinder::with_dns(
        DnsSrvResolver::builder()
            .dns_lookup_timeout(TIMEOUT)
            .backend(backend),
    );
    finder.set_service_name("my-service.invalid.").unwrap();
    finder.set_container_port_name("discovery").unwrap();
    finder
}

#[test]
fn lookup_from_plain_thread_reports_failure() {
    let finder = unreachable_finder();
    let started = Instant::now();
    match finder.registered_addresses() {
        Err(CoreError::Lookup { query, .. }) => {
            assert_eq!(query, "_discovery._tcp.my-service.invalid.")
        }
        other => panic!("expected Lookup error, got {:?}", other),
    }
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn lookup_from_async_task_does_not_panic() {
    let finder = unreachable_finder();
    let result = finder.registered_addresses();
    assert!(matches!(result, Err(CoreError::Lookup { .. })));
    drop(finder);
}

#[tokio::test]
async fn backend_built_and_dropped_inside_runtime() {
    let server: SocketAddr = "127.0.0.1:9".parse().unwrap();
    let backend = HickoryBackend::with_name_servers(&[server], TIMEOUT).unwrap();
    drop(backend);
}
